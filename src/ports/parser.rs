// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing structured configuration files in different formats (YAML, TOML, JSON).

use crate::domain::{ConfigValue, Result};

/// A trait for parsing structured configuration files.
///
/// Parsers turn raw file content into a [`ConfigValue::Map`] tree. Nesting is
/// preserved; the value store flattens it into dotted keys itself. For
/// example:
///
/// ```yaml
/// database:
///   host: localhost
///   port: 5432
/// ```
///
/// becomes a map with a `database` entry that is itself a map holding
/// `host` (a string) and `port` (an integer). Keys are kept as written;
/// lower-casing happens when the tree is flattened.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::ConfigParser;
/// use layercfg::domain::{ConfigValue, Result};
/// use std::collections::BTreeMap;
///
/// struct KeyValueParser;
///
/// impl ConfigParser for KeyValueParser {
///     fn parse(&self, content: &str) -> Result<ConfigValue> {
///         let mut map = BTreeMap::new();
///         for line in content.lines() {
///             if let Some((k, v)) = line.split_once('=') {
///                 map.insert(k.trim().to_string(), ConfigValue::from(v.trim()));
///             }
///         }
///         Ok(ConfigValue::Map(map))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["kv"]
///     }
/// }
///
/// let parsed = KeyValueParser.parse("name = demo").unwrap();
/// assert_eq!(parsed.flatten().get("name"), Some(&ConfigValue::from("demo")));
/// ```
pub trait ConfigParser {
    /// Parses configuration content into a nested map.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigValue::Map(..))` - The parsed configuration tree
    /// * `Err(ConfigError::ParseError)` - The content is malformed or its
    ///   top level is not a table
    fn parse(&self, content: &str) -> Result<ConfigValue>;

    /// Returns the file extensions supported by this parser.
    ///
    /// These double as the accepted config type names, without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct NestingParser;

    impl ConfigParser for NestingParser {
        fn parse(&self, _content: &str) -> Result<ConfigValue> {
            let mut database = BTreeMap::new();
            database.insert("host".to_string(), ConfigValue::from("localhost"));
            database.insert("port".to_string(), ConfigValue::from(5432));
            let mut root = BTreeMap::new();
            root.insert("database".to_string(), ConfigValue::Map(database));
            root.insert("App".to_string(), ConfigValue::from("MyApp"));
            Ok(ConfigValue::Map(root))
        }

        fn supported_extensions(&self) -> &[&str] {
            &["test", "tst"]
        }
    }

    #[test]
    fn test_parser_supported_extensions() {
        let extensions = NestingParser.supported_extensions();
        assert_eq!(extensions, &["test", "tst"]);
    }

    #[test]
    fn test_parsed_tree_flattens_to_dotted_keys() {
        let flat = NestingParser.parse("").unwrap().flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat.get("database.host"), Some(&ConfigValue::from("localhost")));
        assert_eq!(flat.get("database.port"), Some(&ConfigValue::Integer(5432)));
        assert_eq!(flat.get("app"), Some(&ConfigValue::from("MyApp")));
    }
}
