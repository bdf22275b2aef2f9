// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered key-value store backing a [`Resolver`](crate::service::Resolver).
//!
//! Values are looked up through these layers, highest first:
//!
//! 1. environment variables explicitly bound to the key, in bind order
//! 2. the automatic variable `<PREFIX>_<KEY>` (when enabled)
//! 3. the structured config file
//! 4. values `set` by the caller
//! 5. defaults
//!
//! Environment layers only match non-empty values. Override files are not a
//! layer of their own: they write into the environment before lookup.

use crate::domain::{ConfigKey, ConfigValue};
use crate::ports::Environment;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// An explicitly bound environment variable.
    BoundEnv,
    /// The automatic `<PREFIX>_<KEY>` environment variable.
    AutomaticEnv,
    /// The structured config file.
    ConfigFile,
    /// A value set by the caller.
    Override,
    /// A default.
    Default,
}

/// The layered store.
#[derive(Debug)]
pub struct ValueStore {
    env: Arc<dyn Environment>,
    env_prefix: String,
    automatic_env: bool,
    env_bindings: HashMap<String, Vec<String>>,
    config: BTreeMap<String, ConfigValue>,
    overrides: BTreeMap<String, ConfigValue>,
    defaults: BTreeMap<String, ConfigValue>,
}

impl ValueStore {
    /// Creates an empty store reading variables from `env`, with no prefix
    /// and automatic environment lookup enabled.
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            env_prefix: String::new(),
            automatic_env: true,
            env_bindings: HashMap::new(),
            config: BTreeMap::new(),
            overrides: BTreeMap::new(),
            defaults: BTreeMap::new(),
        }
    }

    /// Returns the environment this store reads from.
    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.env
    }

    /// Sets the prefix for automatic variables. A trailing `_` is dropped.
    pub fn set_env_prefix(&mut self, prefix: &str) {
        self.env_prefix = prefix.trim_end_matches('_').to_string();
    }

    /// Returns the automatic variable prefix.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Enables or disables `<PREFIX>_<KEY>` lookup.
    pub fn set_automatic_env(&mut self, enabled: bool) {
        self.automatic_env = enabled;
    }

    /// Binds `key` to the given variable names, replacing any earlier
    /// binding. With no names the key's automatic variable name is bound.
    pub fn bind_env(&mut self, key: &ConfigKey, names: &[&str]) {
        let names = if names.is_empty() {
            vec![key.env_var_name(Some(&self.env_prefix))]
        } else {
            names.iter().map(|n| n.to_string()).collect()
        };
        self.env_bindings.insert(key.as_str().to_string(), names);
    }

    /// Replaces the config file layer with the leaves of `tree`.
    pub fn set_config(&mut self, tree: ConfigValue) {
        self.config = tree.flatten();
    }

    /// Sets a value in the override layer.
    pub fn set(&mut self, key: &ConfigKey, value: ConfigValue) {
        insert_leaves(&mut self.overrides, key, value);
    }

    /// Sets a value in the default layer.
    pub fn set_default(&mut self, key: &ConfigKey, value: ConfigValue) {
        insert_leaves(&mut self.defaults, key, value);
    }

    fn env_value(&self, name: &str) -> Option<ConfigValue> {
        self.env
            .var(name)
            .filter(|v| !v.is_empty())
            .map(ConfigValue::String)
    }

    /// Resolves a leaf key, reporting which layer supplied it.
    pub fn find_leaf(&self, key: &ConfigKey) -> Option<(ConfigValue, Layer)> {
        if let Some(names) = self.env_bindings.get(key.as_str()) {
            if let Some(value) = names.iter().find_map(|name| self.env_value(name)) {
                return Some((value, Layer::BoundEnv));
            }
        }

        if self.automatic_env {
            let name = key.env_var_name(Some(&self.env_prefix));
            if let Some(value) = self.env_value(&name) {
                return Some((value, Layer::AutomaticEnv));
            }
        }

        [
            (&self.config, Layer::ConfigFile),
            (&self.overrides, Layer::Override),
            (&self.defaults, Layer::Default),
        ]
        .into_iter()
        .find_map(|(layer, source)| layer.get(key.as_str()).map(|v| (v.clone(), source)))
    }

    /// Resolves `key`. A key with no value of its own but with known
    /// children (`database` when `database.host` exists) yields a `Map` of
    /// the resolved children.
    pub fn find(&self, key: &ConfigKey) -> Option<ConfigValue> {
        if let Some((value, _)) = self.find_leaf(key) {
            return Some(value);
        }

        let prefix = format!("{}.", key.as_str());
        let mut children = BTreeMap::new();
        for child in self.known_keys() {
            if let Some(rest) = child.strip_prefix(&prefix) {
                if let Some((value, _)) = self.find_leaf(&ConfigKey::from(child.as_str())) {
                    ConfigValue::insert_path(&mut children, rest, value);
                }
            }
        }

        if children.is_empty() {
            None
        } else {
            Some(ConfigValue::Map(children))
        }
    }

    /// Returns `true` if `key` resolves to a value in any layer.
    pub fn is_set(&self, key: &ConfigKey) -> bool {
        self.find(key).is_some()
    }

    fn known_keys(&self) -> BTreeSet<String> {
        self.config
            .keys()
            .chain(self.overrides.keys())
            .chain(self.defaults.keys())
            .chain(self.env_bindings.keys())
            .cloned()
            .collect()
    }

    /// Returns every known leaf key, sorted.
    pub fn all_keys(&self) -> Vec<String> {
        self.known_keys().into_iter().collect()
    }

    /// Resolves every known key into one nested map.
    pub fn all_settings(&self) -> ConfigValue {
        let mut root = BTreeMap::new();
        for key in self.known_keys() {
            if let Some((value, _)) = self.find_leaf(&ConfigKey::from(key.as_str())) {
                ConfigValue::insert_path(&mut root, &key, value);
            }
        }
        ConfigValue::Map(root)
    }
}

fn insert_leaves(layer: &mut BTreeMap<String, ConfigValue>, key: &ConfigKey, value: ConfigValue) {
    match value {
        ConfigValue::Map(_) => {
            for (child, leaf) in value.flatten() {
                layer.insert(format!("{}.{}", key, child), leaf);
            }
        }
        leaf => {
            layer.insert(key.as_str().to_string(), leaf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryEnv;

    fn store_with(vars: &[(&str, &str)]) -> ValueStore {
        let env = MemoryEnv::with_vars(vars.iter().copied());
        let mut store = ValueStore::new(Arc::new(env));
        store.set_env_prefix("APP");
        store
    }

    fn key(s: &str) -> ConfigKey {
        ConfigKey::from(s)
    }

    #[test]
    fn test_layer_order() {
        let mut store = store_with(&[]);
        let k = key("layer.test");

        store.set_default(&k, "default".into());
        assert_eq!(store.find_leaf(&k).unwrap().1, Layer::Default);

        store.set(&k, "set".into());
        assert_eq!(store.find_leaf(&k).unwrap().1, Layer::Override);

        let mut tree = BTreeMap::new();
        let mut inner = BTreeMap::new();
        inner.insert("test".to_string(), ConfigValue::from("file"));
        tree.insert("layer".to_string(), ConfigValue::Map(inner));
        store.set_config(ConfigValue::Map(tree));
        assert_eq!(
            store.find_leaf(&k),
            Some((ConfigValue::from("file"), Layer::ConfigFile))
        );

        store.environment().set_var("APP_LAYER_TEST", "auto");
        assert_eq!(store.find_leaf(&k).unwrap().1, Layer::AutomaticEnv);

        store.bind_env(&k, &["LAYER_BOUND"]);
        store.environment().set_var("LAYER_BOUND", "bound");
        assert_eq!(
            store.find_leaf(&k),
            Some((ConfigValue::from("bound"), Layer::BoundEnv))
        );
    }

    #[test]
    fn test_bound_names_checked_in_order() {
        let mut store = store_with(&[("DB_DATABASE", "alias"), ("DB_NAME", "primary")]);
        let k = key("database.database");
        store.bind_env(&k, &["DB_NAME", "DB_DATABASE"]);
        assert_eq!(store.find(&k), Some(ConfigValue::from("primary")));

        store.bind_env(&k, &["DB_MISSING", "DB_DATABASE"]);
        assert_eq!(store.find(&k), Some(ConfigValue::from("alias")));
    }

    #[test]
    fn test_empty_env_values_are_skipped() {
        let mut store = store_with(&[("PRIMARY", ""), ("ALIAS", "used")]);
        let k = key("some.key");
        store.bind_env(&k, &["PRIMARY", "ALIAS"]);
        assert_eq!(store.find(&k), Some(ConfigValue::from("used")));
    }

    #[test]
    fn test_bind_without_names_uses_prefixed_name() {
        let mut store = store_with(&[("APP_SERVER_READ_TIMEOUT", "5s")]);
        let k = key("server.read-timeout");
        store.set_automatic_env(false);
        store.bind_env(&k, &[]);
        assert_eq!(store.find(&k), Some(ConfigValue::from("5s")));
    }

    #[test]
    fn test_automatic_env_can_be_disabled() {
        let mut store = store_with(&[("APP_PORT", "9000")]);
        store.set_automatic_env(false);
        assert!(store.find(&key("port")).is_none());
    }

    #[test]
    fn test_prefix_trailing_underscore_trimmed() {
        let mut store = store_with(&[("MY_NAME", "x")]);
        store.set_env_prefix("MY_");
        assert_eq!(store.env_prefix(), "MY");
        assert_eq!(store.find(&key("name")), Some(ConfigValue::from("x")));
    }

    #[test]
    fn test_empty_prefix_uses_bare_name() {
        let mut store = store_with(&[("NAME", "bare")]);
        store.set_env_prefix("");
        assert_eq!(store.find(&key("name")), Some(ConfigValue::from("bare")));
    }

    #[test]
    fn test_parent_key_assembles_children() {
        let mut store = store_with(&[("DB_HOST", "db.internal")]);
        store.set_default(&key("database.port"), 5432.into());
        store.bind_env(&key("database.host"), &["DB_HOST"]);

        let mut expected = BTreeMap::new();
        expected.insert("host".to_string(), ConfigValue::from("db.internal"));
        expected.insert("port".to_string(), ConfigValue::Integer(5432));
        assert_eq!(store.find(&key("database")), Some(ConfigValue::Map(expected)));
        assert!(store.is_set(&key("database")));
        assert!(!store.is_set(&key("data")));
    }

    #[test]
    fn test_set_map_is_stored_as_leaves() {
        let mut store = store_with(&[]);
        let mut map = BTreeMap::new();
        map.insert("Host".to_string(), ConfigValue::from("h"));
        store.set(&key("server"), ConfigValue::Map(map));
        assert_eq!(store.all_keys(), vec!["server.host".to_string()]);
    }

    #[test]
    fn test_all_keys_sorted_union() {
        let mut store = store_with(&[]);
        store.set(&key("b.key"), "1".into());
        store.set_default(&key("a.key"), "2".into());
        store.bind_env(&key("c.key"), &["C_KEY"]);
        assert_eq!(store.all_keys(), vec!["a.key", "b.key", "c.key"]);
    }

    #[test]
    fn test_all_settings_skips_unresolved_bindings() {
        let mut store = store_with(&[]);
        store.set(&key("app.name"), "demo".into());
        store.bind_env(&key("app.secret"), &["APP_SECRET_UNSET"]);

        let settings = store.all_settings().flatten();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get("app.name"), Some(&ConfigValue::from("demo")));
    }
}
