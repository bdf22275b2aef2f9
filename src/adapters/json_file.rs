// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON configuration file parser.

use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// JSON parser implementation.
///
/// ```rust
/// use layercfg::adapters::JsonParser;
/// use layercfg::domain::ConfigValue;
/// use layercfg::ports::ConfigParser;
///
/// let flat = JsonParser::new()
///     .parse(r#"{"server": {"port": 9090}}"#)
///     .unwrap()
///     .flatten();
/// assert_eq!(flat.get("server.port"), Some(&ConfigValue::Integer(9090)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }

    fn convert(value: serde_json::Value) -> Option<ConfigValue> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(ConfigValue::Boolean(b)),
            serde_json::Value::Number(n) => Some(match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or_default()),
            }),
            serde_json::Value::String(s) => Some(ConfigValue::String(s)),
            serde_json::Value::Array(items) => Some(ConfigValue::List(
                items.into_iter().filter_map(Self::convert).collect(),
            )),
            serde_json::Value::Object(map) => Some(ConfigValue::Map(
                map.into_iter()
                    .filter_map(|(k, v)| Self::convert(v).map(|v| (k, v)))
                    .collect::<BTreeMap<_, _>>(),
            )),
        }
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;

        match value {
            serde_json::Value::Object(_) => {
                Ok(Self::convert(value).unwrap_or_else(|| ConfigValue::Map(BTreeMap::new())))
            }
            _ => Err(ConfigError::ParseError {
                message: "JSON document must be an object at the top level".to_string(),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
