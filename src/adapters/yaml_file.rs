// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML configuration file parser.

use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// YAML parser implementation.
///
/// This parser converts YAML documents into a nested [`ConfigValue`] tree.
/// Scalars keep their YAML type; `null` entries are dropped so they read as
/// unset rather than as an empty string.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::YamlParser;
/// use layercfg::domain::ConfigValue;
/// use layercfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let flat = parser.parse(yaml_content).unwrap().flatten();
/// assert_eq!(flat.get("database.host"), Some(&ConfigValue::from("localhost")));
/// assert_eq!(flat.get("database.port"), Some(&ConfigValue::Integer(5432)));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Converts a YAML value, returning `None` for nulls.
    fn convert(value: serde_yaml::Value) -> Option<ConfigValue> {
        match value {
            serde_yaml::Value::Null => None,
            serde_yaml::Value::Bool(b) => Some(ConfigValue::Boolean(b)),
            serde_yaml::Value::Number(n) => Some(match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or_default()),
            }),
            serde_yaml::Value::String(s) => Some(ConfigValue::String(s)),
            serde_yaml::Value::Sequence(seq) => Some(ConfigValue::List(
                seq.into_iter().filter_map(Self::convert).collect(),
            )),
            serde_yaml::Value::Mapping(map) => Some(ConfigValue::Map(Self::convert_mapping(map))),
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    fn convert_mapping(map: serde_yaml::Mapping) -> BTreeMap<String, ConfigValue> {
        let mut result = BTreeMap::new();
        for (key, val) in map {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                other => {
                    tracing::debug!(key = ?other, "Skipping YAML entry with non-scalar key");
                    continue;
                }
            };
            if let Some(val) = Self::convert(val) {
                result.insert(key, val);
            }
        }
        result
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match value {
            // An empty document is an empty configuration.
            serde_yaml::Value::Null => Ok(ConfigValue::Map(BTreeMap::new())),
            serde_yaml::Value::Mapping(map) => Ok(ConfigValue::Map(Self::convert_mapping(map))),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "YAML document must be a mapping at the top level, found {:?}",
                    other
                ),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
