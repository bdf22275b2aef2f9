// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weakly-typed serde deserialisation of [`ConfigValue`] trees.
//!
//! Environment variables are always strings, so decoding `"5432"` into a
//! `u16` field or `"true"` into a `bool` has to succeed. The deserializer
//! converts between scalar kinds on request and tracks the dotted path of the
//! value being decoded so errors point at the offending key.

use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use std::collections::btree_map;
use std::vec;

/// Decodes a [`ConfigValue`] into any deserialisable type.
///
/// ```
/// use layercfg::domain::{value_de, ConfigValue};
/// use serde::Deserialize;
/// use std::collections::BTreeMap;
///
/// #[derive(Deserialize)]
/// struct Pool {
///     max_conns: u32,
///     enabled: bool,
/// }
///
/// let mut map = BTreeMap::new();
/// map.insert("max_conns".to_string(), ConfigValue::from("25"));
/// map.insert("enabled".to_string(), ConfigValue::from("on"));
///
/// let pool: Pool = value_de::from_value(ConfigValue::Map(map)).unwrap();
/// assert_eq!(pool.max_conns, 25);
/// assert!(pool.enabled);
/// ```
pub fn from_value<T: DeserializeOwned>(value: ConfigValue) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value, String::new()))
}

/// Decodes a value that lives at `path`, used in error messages.
pub(crate) fn from_value_at<T: DeserializeOwned>(value: ConfigValue, path: &str) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value, path.to_string()))
}

/// A serde `Deserializer` over an owned [`ConfigValue`].
#[derive(Debug)]
pub struct ValueDeserializer {
    value: ConfigValue,
    path: String,
}

impl ValueDeserializer {
    /// Wraps a value found at the dotted `path` (empty for the root).
    pub fn new(value: ConfigValue, path: String) -> Self {
        Self { value, path }
    }

    fn key(&self) -> &str {
        if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        }
    }

    fn unmarshal_error(&self, err: ConfigError) -> ConfigError {
        match err {
            ConfigError::Unmarshal { .. } => err,
            other => ConfigError::Unmarshal {
                message: other.to_string(),
            },
        }
    }
}

impl<'de> IntoDeserializer<'de, ConfigError> for ConfigValue {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> Self::Deserializer {
        ValueDeserializer::new(self, String::new())
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = ConfigError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            ConfigValue::String(s) => visitor.visit_string(s),
            ConfigValue::Integer(i) => visitor.visit_i64(i),
            ConfigValue::Float(f) => visitor.visit_f64(f),
            ConfigValue::Boolean(b) => visitor.visit_bool(b),
            ConfigValue::Duration(d) => visitor.visit_string(d.to_string()),
            ConfigValue::List(items) => visitor.visit_seq(SeqAccess::new(items, self.path)),
            ConfigValue::Map(map) => visitor.visit_map(MapAccess::new(map, self.path)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let b = self
            .value
            .as_bool(self.key())
            .map_err(|e| self.unmarshal_error(e))?;
        visitor.visit_bool(b)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let i = self
            .value
            .as_i64(self.key())
            .map_err(|e| self.unmarshal_error(e))?;
        visitor.visit_i64(i)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let i = self
            .value
            .as_i64(self.key())
            .map_err(|e| self.unmarshal_error(e))?;
        let u = u64::try_from(i).map_err(|_| ConfigError::Unmarshal {
            message: format!("{} must not be negative, got {}", self.key(), i),
        })?;
        visitor.visit_u64(u)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let f = self
            .value
            .as_f64(self.key())
            .map_err(|e| self.unmarshal_error(e))?;
        visitor.visit_f64(f)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if matches!(self.value, ConfigValue::List(_) | ConfigValue::Map(_)) {
            return Err(ConfigError::Unmarshal {
                message: format!(
                    "{} expected a string, found a {}",
                    self.key(),
                    self.value.kind()
                ),
            });
        }
        match self.value {
            ConfigValue::String(s) => visitor.visit_string(s),
            scalar => visitor.visit_string(scalar.as_string()),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            ConfigValue::List(items) => visitor.visit_seq(SeqAccess::new(items, self.path)),
            ConfigValue::String(s) => {
                let items = if s.trim().is_empty() {
                    Vec::new()
                } else {
                    s.split(',')
                        .map(|part| ConfigValue::String(part.trim().to_string()))
                        .collect()
                };
                visitor.visit_seq(SeqAccess::new(items, self.path))
            }
            scalar => visitor.visit_seq(SeqAccess::new(vec![scalar], self.path)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            ConfigValue::String(s) => visitor.visit_enum(
                <String as IntoDeserializer<'de, ConfigError>>::into_deserializer(s),
            ),
            other => Err(ConfigError::Unmarshal {
                message: format!(
                    "{} expected an enum variant name, found a {}",
                    if self.path.is_empty() { "<root>" } else { &self.path },
                    other.kind()
                ),
            }),
        }
    }

    forward_to_deserialize_any! {
        bytes byte_buf unit_struct tuple tuple_struct map struct identifier ignored_any
    }
}

struct SeqAccess {
    items: vec::IntoIter<ConfigValue>,
    path: String,
    index: usize,
}

impl SeqAccess {
    fn new(items: Vec<ConfigValue>, path: String) -> Self {
        Self {
            items: items.into_iter(),
            path,
            index: 0,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqAccess {
    type Error = ConfigError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.items.next() {
            Some(value) => {
                let path = if self.path.is_empty() {
                    self.index.to_string()
                } else {
                    format!("{}.{}", self.path, self.index)
                };
                self.index += 1;
                seed.deserialize(ValueDeserializer::new(value, path)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct MapAccess {
    entries: btree_map::IntoIter<String, ConfigValue>,
    pending: Option<(String, ConfigValue)>,
    path: String,
}

impl MapAccess {
    fn new(map: std::collections::BTreeMap<String, ConfigValue>, path: String) -> Self {
        Self {
            entries: map.into_iter(),
            pending: None,
            path,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapAccess {
    type Error = ConfigError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.entries.next() {
            Some((key, value)) => {
                let parsed = seed.deserialize(
                    <String as IntoDeserializer<'de, ConfigError>>::into_deserializer(key.clone()),
                )?;
                self.pending = Some((key, value));
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (key, value) = self.pending.take().ok_or_else(|| ConfigError::Unmarshal {
            message: "value requested before key".to_string(),
        })?;
        let path = if self.path.is_empty() {
            key
        } else {
            format!("{}.{}", self.path, key)
        };
        seed.deserialize(ValueDeserializer::new(value, path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Duration;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn map(entries: &[(&str, ConfigValue)]) -> ConfigValue {
        ConfigValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        #[serde(rename = "read_timeout")]
        read: Duration,
        #[serde(default)]
        tags: Vec<String>,
        debug: Option<bool>,
    }

    #[test]
    fn test_weakly_typed_struct() {
        let value = map(&[
            ("host", ConfigValue::from("0.0.0.0")),
            ("port", ConfigValue::from("9000")),
            ("read_timeout", ConfigValue::from("30s")),
            ("tags", ConfigValue::from("a, b")),
            ("debug", ConfigValue::from("yes")),
        ]);

        let server: Server = from_value(value).unwrap();
        assert_eq!(
            server,
            Server {
                host: "0.0.0.0".to_string(),
                port: 9000,
                read: Duration::from_secs(30),
                tags: vec!["a".to_string(), "b".to_string()],
                debug: Some(true),
            }
        );
    }

    #[test]
    fn test_native_values_and_lists() {
        let value = map(&[
            ("host", ConfigValue::from("h")),
            ("port", ConfigValue::from(80)),
            ("read_timeout", ConfigValue::from(Duration::from_millis(1500))),
            ("tags", ConfigValue::from(vec!["x"])),
        ]);

        let server: Server = from_value(value).unwrap();
        assert_eq!(server.port, 80);
        assert_eq!(server.read, Duration::from_millis(1500));
        assert_eq!(server.tags, vec!["x".to_string()]);
        assert_eq!(server.debug, None);
    }

    #[test]
    fn test_error_names_the_path() {
        let value = map(&[(
            "server",
            map(&[
                ("host", ConfigValue::from("h")),
                ("port", ConfigValue::from("eighty")),
                ("read_timeout", ConfigValue::from("1s")),
            ]),
        )]);

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Root {
            server: Server,
        }

        let err = from_value::<Root>(value).unwrap_err();
        assert!(matches!(err, ConfigError::Unmarshal { .. }));
        assert!(err.to_string().contains("server.port"), "{}", err);
    }

    #[test]
    fn test_negative_into_unsigned_fails() {
        let err = from_value_at::<u32>(ConfigValue::from(-1), "pool.size").unwrap_err();
        assert!(err.to_string().contains("pool.size"));
    }

    #[test]
    fn test_unit_enum_from_string() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "kebab-case")]
        enum SslMode {
            Disable,
            VerifyFull,
        }

        let mode: SslMode = from_value(ConfigValue::from("verify-full")).unwrap();
        assert_eq!(mode, SslMode::VerifyFull);
        assert!(from_value::<SslMode>(ConfigValue::from(3)).is_err());
    }
}
