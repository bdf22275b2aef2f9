// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! Values arrive from very different places: environment variables and
//! `.env` files only ever produce strings, structured files produce typed
//! scalars and nested maps, and callers `set` whatever they like. The
//! `ConfigValue` enum holds all of them and converts between kinds on demand.

use crate::domain::duration::Duration;
use crate::domain::errors::{ConfigError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically-typed configuration value.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{ConfigValue, Duration};
///
/// let value = ConfigValue::from("42");
/// assert_eq!(value.as_i64("test.key").unwrap(), 42);
///
/// let value = ConfigValue::from("1m30s");
/// assert_eq!(value.as_duration("test.key").unwrap(), Duration::from_secs(90));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A string, as read from the environment or a file.
    String(String),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A span of time.
    Duration(Duration),
    /// An ordered list of values.
    List(Vec<ConfigValue>),
    /// A nested table of values keyed by lower-case segment.
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Returns a short name for the kind of value held.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::Boolean(_) => "boolean",
            ConfigValue::Duration(_) => "duration",
            ConfigValue::List(_) => "list",
            ConfigValue::Map(_) => "map",
        }
    }

    /// Returns the inner string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner map if this is a `Map` value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Renders the value as a string. Scalars render as written; lists are
    /// comma-joined.
    ///
    /// ```
    /// use layercfg::domain::ConfigValue;
    ///
    /// assert_eq!(ConfigValue::from(8080).as_string(), "8080");
    /// assert_eq!(ConfigValue::from(true).as_string(), "true");
    /// ```
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Converts the value to a boolean.
    ///
    /// Strings are recognised case-insensitively:
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    ///
    /// Numbers are `true` when non-zero.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            ConfigValue::Boolean(b) => Ok(*b),
            ConfigValue::Integer(i) => Ok(*i != 0),
            ConfigValue::Float(f) => Ok(*f != 0.0),
            ConfigValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                other => other
                    .parse::<bool>()
                    .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
            },
            other => Err(ConfigError::incompatible(key, "boolean", other.kind())),
        }
    }

    /// Converts the value to an `i64`.
    ///
    /// Floats are truncated toward zero, booleans map to 0 and 1, durations
    /// yield nanoseconds.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match self {
            ConfigValue::Integer(i) => Ok(*i),
            ConfigValue::Float(f) => Ok(f.trunc() as i64),
            ConfigValue::Boolean(b) => Ok(i64::from(*b)),
            ConfigValue::Duration(d) => Ok(d.as_nanos()),
            ConfigValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
            other => Err(ConfigError::incompatible(key, "integer", other.kind())),
        }
    }

    /// Converts the value to a `u32`.
    pub fn as_u32(&self, key: &str) -> Result<u32> {
        let value = self.as_i64(key)?;
        u32::try_from(value).map_err(|e| ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: "u32".to_string(),
            source: Box::new(e),
        })
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(i) => Ok(*i as f64),
            ConfigValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            ConfigValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e)),
            other => Err(ConfigError::incompatible(key, "float", other.kind())),
        }
    }

    /// Converts the value to a [`Duration`].
    ///
    /// Strings use the `1h30m` syntax; a string with no unit letters and bare
    /// numbers are read as nanoseconds.
    ///
    /// ```
    /// use layercfg::domain::{ConfigValue, Duration};
    ///
    /// assert_eq!(ConfigValue::from("60s").as_duration("k").unwrap(), Duration::from_secs(60));
    /// assert_eq!(ConfigValue::from("500").as_duration("k").unwrap(), Duration::from_nanos(500));
    /// ```
    pub fn as_duration(&self, key: &str) -> Result<Duration> {
        match self {
            ConfigValue::Duration(d) => Ok(*d),
            ConfigValue::Integer(i) => Ok(Duration::from_nanos(*i)),
            ConfigValue::Float(f) => Ok(Duration::from_nanos(f.trunc() as i64)),
            ConfigValue::String(s) => {
                let s = s.trim();
                let has_unit = s.contains(|c: char| "nsuµμmh".contains(c));
                let parsed = if has_unit {
                    s.parse::<Duration>()
                } else {
                    format!("{}ns", s).parse::<Duration>()
                };
                parsed.map_err(|e| ConfigError::from_parse_duration_error(key.to_string(), e))
            }
            other => Err(ConfigError::incompatible(key, "duration", other.kind())),
        }
    }

    /// Flattens nested maps into dotted leaf keys. Lists and scalars are leaves.
    ///
    /// ```
    /// use layercfg::domain::ConfigValue;
    /// use std::collections::BTreeMap;
    ///
    /// let mut db = BTreeMap::new();
    /// db.insert("host".to_string(), ConfigValue::from("localhost"));
    /// let mut root = BTreeMap::new();
    /// root.insert("database".to_string(), ConfigValue::Map(db));
    ///
    /// let flat = ConfigValue::Map(root).flatten();
    /// assert_eq!(flat.get("database.host"), Some(&ConfigValue::from("localhost")));
    /// ```
    pub fn flatten(self) -> BTreeMap<String, ConfigValue> {
        let mut result = BTreeMap::new();
        Self::flatten_into(self, "", &mut result);
        result
    }

    fn flatten_into(value: ConfigValue, prefix: &str, result: &mut BTreeMap<String, ConfigValue>) {
        match value {
            ConfigValue::Map(map) => {
                for (key, val) in map {
                    let key = key.to_lowercase();
                    let path = if prefix.is_empty() {
                        key
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    Self::flatten_into(val, &path, result);
                }
            }
            leaf => {
                if !prefix.is_empty() {
                    result.insert(prefix.to_string(), leaf);
                }
            }
        }
    }

    /// Inserts `value` at the dotted `path` inside a nested map, creating
    /// intermediate maps as needed. A scalar sitting where a map is needed is
    /// replaced.
    pub(crate) fn insert_path(map: &mut BTreeMap<String, ConfigValue>, path: &str, value: ConfigValue) {
        match path.split_once('.') {
            None => {
                map.insert(path.to_string(), value);
            }
            Some((head, tail)) => {
                let entry = map
                    .entry(head.to_string())
                    .or_insert_with(|| ConfigValue::Map(BTreeMap::new()));
                if !matches!(entry, ConfigValue::Map(_)) {
                    *entry = ConfigValue::Map(BTreeMap::new());
                }
                if let ConfigValue::Map(inner) = entry {
                    Self::insert_path(inner, tail, value);
                }
            }
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<u32> for ConfigValue {
    fn from(i: u32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<u16> for ConfigValue {
    fn from(i: u16) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

impl From<Duration> for ConfigValue {
    fn from(d: Duration) -> Self {
        ConfigValue::Duration(d)
    }
}

impl From<std::time::Duration> for ConfigValue {
    fn from(d: std::time::Duration) -> Self {
        ConfigValue::Duration(Duration::from(d))
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(map: BTreeMap<String, ConfigValue>) -> Self {
        ConfigValue::Map(map)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Duration(d) => write!(f, "{}", d),
            ConfigValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            ConfigValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_string_for_scalars() {
        assert_eq!(ConfigValue::from("test").as_string(), "test");
        assert_eq!(ConfigValue::from(42).as_string(), "42");
        assert_eq!(ConfigValue::from(0.7).as_string(), "0.7");
        assert_eq!(ConfigValue::from(false).as_string(), "false");
        assert_eq!(
            ConfigValue::from(Duration::from_secs(5)).as_string(),
            "5s"
        );
        assert_eq!(ConfigValue::from(vec!["a", "b"]).as_string(), "a,b");
    }

    #[test]
    fn test_as_bool_true_variants() {
        for val in ["true", "True", "TRUE", "yes", "Yes", "YES", "1", "on", "On", "ON"] {
            let value = ConfigValue::from(val);
            assert!(value.as_bool("test.key").unwrap(), "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_as_bool_false_variants() {
        for val in ["false", "False", "FALSE", "no", "No", "NO", "0", "off", "Off", "OFF"] {
            let value = ConfigValue::from(val);
            assert!(!value.as_bool("test.key").unwrap(), "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_as_bool_invalid() {
        assert!(ConfigValue::from("invalid").as_bool("test.key").is_err());
        assert!(ConfigValue::from(vec![1, 2]).as_bool("test.key").is_err());
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(ConfigValue::from("42").as_i64("k").unwrap(), 42);
        assert_eq!(ConfigValue::from(" -42 ").as_i64("k").unwrap(), -42);
        assert_eq!(ConfigValue::from(3.9).as_i64("k").unwrap(), 3);
        assert_eq!(ConfigValue::from(true).as_i64("k").unwrap(), 1);
    }

    #[test]
    fn test_as_i64_invalid() {
        let err = ConfigValue::from("3.14").as_i64("test.key").unwrap_err();
        assert!(err.to_string().contains("test.key"));
        assert!(ConfigValue::from("not_a_number").as_i64("k").is_err());
    }

    #[test]
    fn test_as_u32() {
        assert_eq!(ConfigValue::from("4294967295").as_u32("k").unwrap(), u32::MAX);
        assert!(ConfigValue::from("-42").as_u32("k").is_err());
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(ConfigValue::from("0.5").as_f64("k").unwrap(), 0.5);
        assert_eq!(ConfigValue::from(2).as_f64("k").unwrap(), 2.0);
        assert!(ConfigValue::from("warm").as_f64("k").is_err());
    }

    #[test]
    fn test_as_duration() {
        assert_eq!(
            ConfigValue::from("2s").as_duration("k").unwrap(),
            Duration::from_secs(2)
        );
        assert_eq!(
            ConfigValue::from(std::time::Duration::from_secs(5))
                .as_duration("k")
                .unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(
            ConfigValue::from(1_000).as_duration("k").unwrap(),
            Duration::from_nanos(1_000)
        );
        assert!(ConfigValue::from("soon").as_duration("k").is_err());
    }

    #[test]
    fn test_flatten_nested_maps() {
        let mut conn = BTreeMap::new();
        conn.insert("Host".to_string(), ConfigValue::from("localhost"));
        conn.insert("port".to_string(), ConfigValue::from(5432));
        let mut app = BTreeMap::new();
        app.insert("connection".to_string(), ConfigValue::Map(conn));
        app.insert("servers".to_string(), ConfigValue::from(vec!["a", "b"]));
        let mut root = BTreeMap::new();
        root.insert("app".to_string(), ConfigValue::Map(app));

        let flat = ConfigValue::Map(root).flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(
            flat.get("app.connection.host"),
            Some(&ConfigValue::from("localhost"))
        );
        assert_eq!(flat.get("app.connection.port"), Some(&ConfigValue::from(5432)));
        assert_eq!(
            flat.get("app.servers"),
            Some(&ConfigValue::from(vec!["a", "b"]))
        );
    }

    #[test]
    fn test_insert_path_builds_nested_maps() {
        let mut root = BTreeMap::new();
        ConfigValue::insert_path(&mut root, "database.host", ConfigValue::from("db"));
        ConfigValue::insert_path(&mut root, "database.port", ConfigValue::from(5432));
        ConfigValue::insert_path(&mut root, "name", ConfigValue::from("app"));

        let db = root.get("database").and_then(ConfigValue::as_map).unwrap();
        assert_eq!(db.get("host"), Some(&ConfigValue::from("db")));
        assert_eq!(db.get("port"), Some(&ConfigValue::from(5432)));
        assert_eq!(root.get("name"), Some(&ConfigValue::from("app")));
    }

    #[test]
    fn test_empty_string() {
        let value = ConfigValue::from("");
        assert_eq!(value.as_str(), Some(""));
    }
}
