// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured configuration file discovery and loading.
//!
//! Picks a parser from an explicit config type or the file extension, guards
//! against oversized files, and searches directories for `name.<ext>`.

use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::ConfigParser;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for structured configuration files (10MB)
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

fn parsers() -> Vec<Box<dyn ConfigParser>> {
    #[allow(unused_mut)]
    let mut parsers: Vec<Box<dyn ConfigParser>> = Vec::new();
    #[cfg(feature = "yaml")]
    parsers.push(Box::new(crate::adapters::YamlParser::new()));
    #[cfg(feature = "json")]
    parsers.push(Box::new(crate::adapters::JsonParser::new()));
    #[cfg(feature = "toml")]
    parsers.push(Box::new(crate::adapters::TomlParser::new()));
    parsers
}

/// Returns the parser registered for `config_type` (`yaml`, `yml`, `json`,
/// `toml`), if its cargo feature is enabled.
pub fn parser_for(config_type: &str) -> Option<Box<dyn ConfigParser>> {
    let config_type = config_type.trim_start_matches('.').to_lowercase();
    parsers()
        .into_iter()
        .find(|p| p.supported_extensions().contains(&config_type.as_str()))
}

/// Returns every config type name the enabled parsers accept, in search order.
///
/// ```rust
/// use layercfg::adapters::config_file::supported_types;
///
/// # #[cfg(feature = "yaml")]
/// assert!(supported_types().contains(&"yaml".to_string()));
/// ```
pub fn supported_types() -> Vec<String> {
    parsers()
        .iter()
        .flat_map(|p| p.supported_extensions().iter().map(|e| e.to_string()))
        .collect()
}

fn load_error(path: &Path, message: impl Into<String>) -> ConfigError {
    ConfigError::LoadError {
        path: path.to_path_buf(),
        message: message.into(),
        source: None,
    }
}

/// Reads and parses a structured configuration file.
///
/// The format comes from `config_type` when given, otherwise from the file
/// extension. Every failure is reported as [`ConfigError::LoadError`].
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::config_file::read_config_file;
/// use std::path::Path;
///
/// let err = read_config_file(Path::new("/nonexistent/config.yaml"), None).unwrap_err();
/// assert!(err.is_load_error());
/// ```
pub fn read_config_file(path: &Path, config_type: Option<&str>) -> Result<ConfigValue> {
    let config_type = match config_type.filter(|t| !t.is_empty()) {
        Some(t) => t.to_string(),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string)
            .ok_or_else(|| load_error(path, "cannot determine config type from file name"))?,
    };

    let parser = parser_for(&config_type)
        .ok_or_else(|| load_error(path, format!("unsupported config type \"{}\"", config_type)))?;

    let metadata = fs::metadata(path).map_err(|e| ConfigError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    if !metadata.is_file() {
        return Err(load_error(path, "not a regular file"));
    }

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(load_error(
            path,
            format!(
                "configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    let value = parser.parse(&content).map_err(|e| ConfigError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    tracing::debug!(path = %path.display(), format = %config_type, "Read config file");
    Ok(value)
}

/// Searches `paths` in order for `name.<ext>` and returns the first match.
///
/// With a `config_type` only that extension is tried; otherwise every
/// supported extension is tried in turn within each directory.
pub fn find_config_file(
    name: &str,
    config_type: Option<&str>,
    paths: &[PathBuf],
) -> Option<PathBuf> {
    let extensions = match config_type.filter(|t| !t.is_empty()) {
        Some(t) => vec![t.trim_start_matches('.').to_lowercase()],
        None => supported_types(),
    };

    for dir in paths {
        for ext in &extensions {
            let candidate = dir.join(format!("{}.{}", name, ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Returns the OS-appropriate configuration directory for an application.
///
/// # Arguments
///
/// * `app_name` - The application name (e.g., "myapp")
/// * `qualifier` - The organization/qualifier (e.g., "com.example")
pub fn default_config_dir(app_name: &str, qualifier: &str) -> Option<PathBuf> {
    ProjectDirs::from(qualifier, "", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    #[cfg(feature = "yaml")]
    fn test_read_yaml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 9000").unwrap();

        let flat = read_config_file(file.path(), None).unwrap().flatten();
        assert_eq!(flat.get("server.port"), Some(&ConfigValue::Integer(9000)));
    }

    #[test]
    #[cfg(feature = "json")]
    fn test_explicit_type_overrides_extension() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "svc"}}"#).unwrap();

        let flat = read_config_file(file.path(), Some("json")).unwrap().flatten();
        assert_eq!(flat.get("name"), Some(&ConfigValue::from("svc")));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = read_config_file(Path::new("/nonexistent/dir/config.yaml"), None).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError { .. }));
    }

    #[test]
    fn test_unknown_extension_is_load_error() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = read_config_file(file.path(), None).unwrap_err();
        assert!(err.to_string().contains("unsupported config type"));
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_malformed_file_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "key: [unclosed").unwrap();

        let err = read_config_file(file.path(), None).unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("Failed to parse YAML"));
    }

    #[test]
    #[cfg(feature = "toml")]
    fn test_find_config_file_respects_path_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("app.toml"), "a = 1\n").unwrap();
        fs::write(first.path().join("app.toml"), "a = 2\n").unwrap();

        let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = find_config_file("app", Some("toml"), &paths).unwrap();
        assert_eq!(found, first.path().join("app.toml"));
    }

    #[test]
    fn test_find_config_file_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file("absent", None, &[dir.path().to_path_buf()]).is_none());
    }

    #[test]
    fn test_parser_for_is_case_insensitive() {
        #[cfg(feature = "yaml")]
        assert!(parser_for("YML").is_some());
        assert!(parser_for("ini").is_none());
    }
}
