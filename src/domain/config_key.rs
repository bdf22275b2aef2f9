// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for type-safe key handling.
//!
//! Keys are dotted, case-insensitive paths such as `database.max_conns`. The
//! `ConfigKey` type normalises them on construction so that `Database.Host`
//! and `database.host` address the same setting, and knows how to derive the
//! matching environment variable name.

use std::fmt;

/// A normalised configuration key.
///
/// # Examples
///
/// ```
/// use layercfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("Database.Max-Conns");
/// assert_eq!(key.as_str(), "database.max-conns");
/// assert_eq!(key.env_var_name(Some("APP")), "APP_DATABASE_MAX_CONNS");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey`, lower-casing and trimming the input.
    ///
    /// ```
    /// use layercfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::new("  App.Name ".to_string());
    /// assert_eq!(key.as_str(), "app.name");
    /// ```
    pub fn new(key: String) -> Self {
        ConfigKey(key.trim().to_lowercase())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Derives the environment variable name for this key.
    ///
    /// `.` and `-` become `_`, the result is upper-cased, and the prefix (if
    /// any and non-empty) is joined with `_`.
    pub fn env_var_name(&self, prefix: Option<&str>) -> String {
        let name = self.0.replace(['.', '-'], "_").to_uppercase();
        match prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix.to_uppercase(), name),
            _ => name,
        }
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey::new(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey::new(s.to_string())
    }
}

impl From<&ConfigKey> for ConfigKey {
    fn from(key: &ConfigKey) -> Self {
        key.clone()
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
