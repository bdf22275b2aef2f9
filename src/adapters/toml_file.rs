// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML configuration file parser.

use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// TOML parser implementation.
///
/// Datetimes have no [`ConfigValue`] counterpart and are kept as their
/// RFC 3339 string form.
///
/// ```rust
/// use layercfg::adapters::TomlParser;
/// use layercfg::domain::ConfigValue;
/// use layercfg::ports::ConfigParser;
///
/// let flat = TomlParser::new()
///     .parse("[server]\nhost = \"0.0.0.0\"\n")
///     .unwrap()
///     .flatten();
/// assert_eq!(flat.get("server.host"), Some(&ConfigValue::from("0.0.0.0")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlParser;

impl TomlParser {
    /// Creates a new TOML parser.
    pub fn new() -> Self {
        TomlParser
    }

    fn convert(value: toml::Value) -> ConfigValue {
        match value {
            toml::Value::String(s) => ConfigValue::String(s),
            toml::Value::Integer(i) => ConfigValue::Integer(i),
            toml::Value::Float(f) => ConfigValue::Float(f),
            toml::Value::Boolean(b) => ConfigValue::Boolean(b),
            toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(Self::convert).collect())
            }
            toml::Value::Table(table) => ConfigValue::Map(Self::convert_table(table)),
        }
    }

    fn convert_table(table: toml::Table) -> BTreeMap<String, ConfigValue> {
        table
            .into_iter()
            .map(|(k, v)| (k, Self::convert(v)))
            .collect()
    }
}

impl ConfigParser for TomlParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let table = content
            .parse::<toml::Table>()
            .map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse TOML: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(ConfigValue::Map(Self::convert_table(table)))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["toml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parser_tables() {
        let toml = r#"
[database]
host = "localhost"
port = 5432

[resilience]
multiplier = 2.0
"#;
        let flat = TomlParser::new().parse(toml).unwrap().flatten();

        assert_eq!(flat.get("database.host"), Some(&ConfigValue::from("localhost")));
        assert_eq!(flat.get("database.port"), Some(&ConfigValue::Integer(5432)));
        assert_eq!(flat.get("resilience.multiplier"), Some(&ConfigValue::Float(2.0)));
    }

    #[test]
    fn test_toml_parser_datetime_as_string() {
        let flat = TomlParser::new()
            .parse("released = 1979-05-27T07:32:00Z\n")
            .unwrap()
            .flatten();
        assert_eq!(
            flat.get("released"),
            Some(&ConfigValue::from("1979-05-27T07:32:00Z"))
        );
    }

    #[test]
    fn test_toml_parser_invalid() {
        let result = TomlParser::new().parse("key = ");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
