// SPDX-License-Identifier: MIT OR Apache-2.0

//! The precedence resolver.
//!
//! A [`Resolver`] owns a [`ValueStore`] and assembles it from ordered
//! [`ResolverOption`]s: an environment prefix, a structured config file,
//! config file search settings, and override (`.env`) files. After the
//! options run, `.env` in the working directory is loaded on a best-effort
//! basis unless [`ResolverOption::WithoutEnvFile`] was given.
//!
//! # Concurrency
//!
//! Override files write to the environment the resolver was built with,
//! which by default is the process table. Build resolvers on one thread
//! during startup, before spawning workers that read the environment. The
//! resolver itself is `Send + Sync` and does no internal locking.

use crate::adapters::config_file::{default_config_dir, find_config_file, read_config_file};
use crate::adapters::dotenv_file::{apply_env_file, DEFAULT_ENV_FILE};
use crate::adapters::ProcessEnv;
use crate::domain::value_de::from_value_at;
use crate::domain::{ConfigError, ConfigKey, ConfigValue, Duration, Result};
use crate::ports::Environment;
use crate::service::store::ValueStore;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prefix used for automatic environment variables unless overridden.
pub const DEFAULT_ENV_PREFIX: &str = "APP";

/// File name searched by [`Resolver::read_in_config`] when none was set.
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// A construction directive, applied in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverOption {
    /// Sets the automatic environment variable prefix.
    EnvPrefix(String),
    /// Reads a structured config file immediately. Failure aborts construction.
    ConfigFile(PathBuf),
    /// Sets the file name (without extension) for [`Resolver::read_in_config`].
    ConfigName(String),
    /// Sets the config file format, overriding the file extension.
    ConfigType(String),
    /// Adds directories for [`Resolver::read_in_config`] to search.
    ConfigPaths(Vec<PathBuf>),
    /// Loads an override file immediately. Failure aborts construction.
    EnvFile(PathBuf),
    /// Disables the best-effort load of `.env` from the working directory.
    WithoutEnvFile,
}

impl ResolverOption {
    /// Shorthand for [`ResolverOption::EnvPrefix`].
    pub fn env_prefix(prefix: impl Into<String>) -> Self {
        ResolverOption::EnvPrefix(prefix.into())
    }

    /// Shorthand for [`ResolverOption::ConfigFile`].
    pub fn config_file(path: impl Into<PathBuf>) -> Self {
        ResolverOption::ConfigFile(path.into())
    }

    /// Shorthand for [`ResolverOption::ConfigName`].
    pub fn config_name(name: impl Into<String>) -> Self {
        ResolverOption::ConfigName(name.into())
    }

    /// Shorthand for [`ResolverOption::ConfigType`].
    pub fn config_type(config_type: impl Into<String>) -> Self {
        ResolverOption::ConfigType(config_type.into())
    }

    /// Shorthand for [`ResolverOption::ConfigPaths`].
    pub fn config_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ResolverOption::ConfigPaths(paths.into_iter().map(Into::into).collect())
    }

    /// Shorthand for [`ResolverOption::EnvFile`].
    pub fn env_file(path: impl Into<PathBuf>) -> Self {
        ResolverOption::EnvFile(path.into())
    }
}

/// Layered configuration view with typed accessors.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::MemoryEnv;
/// use layercfg::service::{Resolver, ResolverOption};
/// use std::sync::Arc;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let env = Arc::new(MemoryEnv::with_vars([("MYAPP_SERVER_PORT", "9090")]));
/// let mut resolver = Resolver::with_environment(
///     env,
///     [ResolverOption::env_prefix("MYAPP"), ResolverOption::WithoutEnvFile],
/// )?;
///
/// resolver.set_default("server.port", 8080);
/// assert_eq!(resolver.get_int("server.port"), 9090);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Resolver {
    store: ValueStore,
    config_file: Option<PathBuf>,
    config_name: Option<String>,
    config_type: Option<String>,
    config_paths: Vec<PathBuf>,
}

impl Resolver {
    /// Builds a resolver over the process environment.
    ///
    /// # Errors
    ///
    /// Returns a load error (see [`ConfigError::is_load_error`]) when an
    /// explicitly requested config file or override file cannot be read or
    /// parsed.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ResolverOption>,
    {
        Self::with_environment(Arc::new(ProcessEnv), options)
    }

    /// Builds a resolver over an injected environment.
    pub fn with_environment<I>(env: Arc<dyn Environment>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ResolverOption>,
    {
        let mut store = ValueStore::new(env);
        store.set_env_prefix(DEFAULT_ENV_PREFIX);
        store.set_automatic_env(true);

        let mut resolver = Self {
            store,
            config_file: None,
            config_name: None,
            config_type: None,
            config_paths: Vec::new(),
        };

        let options: Vec<ResolverOption> = options.into_iter().collect();
        let load_default_env_file = !options.contains(&ResolverOption::WithoutEnvFile);

        for option in options {
            resolver.apply(option)?;
        }

        if load_default_env_file {
            resolver.load_default_env_file();
        }

        Ok(resolver)
    }

    /// Creates a builder for fluent construction.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    fn apply(&mut self, option: ResolverOption) -> Result<()> {
        tracing::debug!(?option, "Applying resolver option");
        match option {
            ResolverOption::EnvPrefix(prefix) => self.store.set_env_prefix(&prefix),
            ResolverOption::ConfigFile(path) => {
                let tree = read_config_file(&path, self.config_type.as_deref())?;
                self.store.set_config(tree);
                self.config_file = Some(path);
            }
            ResolverOption::ConfigName(name) => self.config_name = Some(name),
            ResolverOption::ConfigType(config_type) => self.config_type = Some(config_type),
            ResolverOption::ConfigPaths(paths) => self.config_paths.extend(paths),
            ResolverOption::EnvFile(path) => {
                apply_env_file(self.store.environment().as_ref(), &path)?;
            }
            ResolverOption::WithoutEnvFile => {}
        }
        Ok(())
    }

    fn load_default_env_file(&self) {
        let path = Path::new(DEFAULT_ENV_FILE);
        if !path.exists() {
            return;
        }
        if let Err(e) = apply_env_file(self.store.environment().as_ref(), path) {
            tracing::debug!(error = %e, "Ignoring unreadable default override file");
        }
    }

    /// Searches the configured paths for the configured file name and loads
    /// the first match, replacing any previously loaded file.
    ///
    /// Without a configured name, a file set through
    /// [`ResolverOption::ConfigFile`] is re-read; otherwise the name defaults
    /// to `config`. Without configured paths the working directory is searched.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ConfigFileNotFound`] if no candidate exists, or
    /// [`ConfigError::LoadError`] if the file found cannot be parsed.
    pub fn read_in_config(&mut self) -> Result<()> {
        let path = match (&self.config_name, &self.config_file) {
            (None, Some(file)) => file.clone(),
            (name, _) => {
                let name = name.as_deref().unwrap_or(DEFAULT_CONFIG_NAME);
                let paths = if self.config_paths.is_empty() {
                    vec![PathBuf::from(".")]
                } else {
                    self.config_paths.clone()
                };
                find_config_file(name, self.config_type.as_deref(), &paths).ok_or_else(|| {
                    ConfigError::ConfigFileNotFound {
                        name: name.to_string(),
                        paths,
                    }
                })?
            }
        };

        let tree = read_config_file(&path, self.config_type.as_deref())?;
        self.store.set_config(tree);
        self.config_file = Some(path);
        Ok(())
    }

    /// Returns the structured config file currently loaded, if any.
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Returns the automatic environment variable prefix.
    pub fn env_prefix(&self) -> &str {
        self.store.env_prefix()
    }

    /// Returns the environment this resolver reads and writes.
    pub fn environment(&self) -> Arc<dyn Environment> {
        Arc::clone(self.store.environment())
    }

    /// Returns the raw resolved value for `key`.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.store.find(&ConfigKey::from(key))
    }

    fn get_with<T: Default>(
        &self,
        key: &str,
        convert: impl FnOnce(&ConfigValue, &str) -> Result<T>,
    ) -> T {
        let Some(value) = self.get(key) else {
            return T::default();
        };
        convert(&value, key).unwrap_or_else(|e| {
            tracing::debug!(key, error = %e, "Using zero value for unconvertible setting");
            T::default()
        })
    }

    /// Returns `key` as a string, or `""` when unset.
    ///
    /// Lists render comma-separated; a key holding nested settings yields `""`.
    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(ConfigValue::Map(_)) | None => String::new(),
            Some(value) => value.as_string(),
        }
    }

    /// Returns `key` as an integer, or `0` when unset or unconvertible.
    pub fn get_int(&self, key: &str) -> i64 {
        self.get_with(key, ConfigValue::as_i64)
    }

    /// Returns `key` as a `u32`, or `0` when unset, negative or unconvertible.
    pub fn get_u32(&self, key: &str) -> u32 {
        self.get_with(key, ConfigValue::as_u32)
    }

    /// Returns `key` as a float, or `0.0` when unset or unconvertible.
    pub fn get_float(&self, key: &str) -> f64 {
        self.get_with(key, ConfigValue::as_f64)
    }

    /// Returns `key` as a boolean, or `false` when unset or unconvertible.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get_with(key, ConfigValue::as_bool)
    }

    /// Returns `key` as a duration, or zero when unset or unconvertible.
    pub fn get_duration(&self, key: &str) -> Duration {
        self.get_with(key, ConfigValue::as_duration)
    }

    /// Sets an explicit value. Ranks above defaults and below the config
    /// file and the environment.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.store.set(&ConfigKey::from(key), value.into());
    }

    /// Sets the lowest-precedence value for `key`.
    pub fn set_default(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.store.set_default(&ConfigKey::from(key), value.into());
    }

    /// Binds `key` to environment variables, checked in order; the first one
    /// with a non-empty value wins. With no names, binds `<PREFIX>_<KEY>`.
    ///
    /// ```rust
    /// use layercfg::adapters::MemoryEnv;
    /// use layercfg::service::{Resolver, ResolverOption};
    /// use std::sync::Arc;
    ///
    /// let env = Arc::new(MemoryEnv::with_vars([("DB_USERNAME", "alias")]));
    /// let mut resolver = Resolver::with_environment(env, [ResolverOption::WithoutEnvFile]).unwrap();
    /// resolver.bind_env("database.user", &["DB_USER", "DB_USERNAME"]);
    /// assert_eq!(resolver.get_string("database.user"), "alias");
    /// ```
    pub fn bind_env(&mut self, key: &str, env_vars: &[&str]) {
        self.store.bind_env(&ConfigKey::from(key), env_vars);
    }

    /// Returns `true` if `key` resolves to a value in any layer.
    pub fn is_set(&self, key: &str) -> bool {
        self.store.is_set(&ConfigKey::from(key))
    }

    /// Returns every known leaf key, sorted.
    pub fn all_keys(&self) -> Vec<String> {
        self.store.all_keys()
    }

    /// Returns every resolved setting as one nested map.
    pub fn all_settings(&self) -> ConfigValue {
        self.store.all_settings()
    }

    /// Decodes all resolved settings into `T`.
    ///
    /// Values are converted weakly, so `"5432"` decodes into an integer
    /// field and `"a,b"` into a `Vec<String>`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unmarshal`] naming the offending path.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        from_value_at(self.all_settings(), "")
    }

    /// Decodes the settings under `key` into `T`. A missing key decodes from
    /// an empty map, so `#[serde(default)]` fields still apply.
    pub fn unmarshal_key<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .get(key)
            .unwrap_or_else(|| ConfigValue::Map(BTreeMap::new()));
        from_value_at(value, &ConfigKey::from(key).into_string())
    }
}

/// Fluent construction of a [`Resolver`]. Calls are applied in order.
///
/// ```rust,no_run
/// use layercfg::service::Resolver;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let resolver = Resolver::builder()
///     .with_env_prefix("MYAPP")
///     .with_config_name("settings")
///     .with_config_paths(["/etc/myapp", "."])
///     .without_env_file()
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ResolverBuilder {
    env: Option<Arc<dyn Environment>>,
    options: Vec<ResolverOption>,
}

impl ResolverBuilder {
    /// Creates a builder with no options over the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an arbitrary option.
    pub fn with_option(mut self, option: ResolverOption) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the automatic environment variable prefix.
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_option(ResolverOption::env_prefix(prefix))
    }

    /// Reads a structured config file during `build`.
    pub fn with_config_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_option(ResolverOption::config_file(path))
    }

    /// Sets the file name for [`Resolver::read_in_config`].
    pub fn with_config_name(self, name: impl Into<String>) -> Self {
        self.with_option(ResolverOption::config_name(name))
    }

    /// Sets the config file format.
    pub fn with_config_type(self, config_type: impl Into<String>) -> Self {
        self.with_option(ResolverOption::config_type(config_type))
    }

    /// Adds search directories for [`Resolver::read_in_config`].
    pub fn with_config_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.with_option(ResolverOption::config_paths(paths))
    }

    /// Adds the OS-appropriate config directory for the application to the
    /// search paths. Skipped when no home directory can be determined.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn with_default_config_dir(self, app_name: &str, qualifier: &str) -> Self {
        match default_config_dir(app_name, qualifier) {
            Some(dir) => self.with_config_paths([dir]),
            None => {
                tracing::debug!(app_name, "No default config directory available");
                self
            }
        }
    }

    /// Loads an override file during `build`.
    pub fn with_env_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_option(ResolverOption::env_file(path))
    }

    /// Disables the best-effort `.env` load.
    pub fn without_env_file(self) -> Self {
        self.with_option(ResolverOption::WithoutEnvFile)
    }

    /// Uses `env` instead of the process environment.
    pub fn with_environment(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = Some(env);
        self
    }

    /// Builds the resolver, applying options in the order they were added.
    pub fn build(self) -> Result<Resolver> {
        let env = self.env.unwrap_or_else(|| Arc::new(ProcessEnv));
        Resolver::with_environment(env, self.options)
    }
}
