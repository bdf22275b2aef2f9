// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! Loading problems and validation failures are kept apart: [`ConfigError`]
//! covers everything that can go wrong while assembling a resolver or reading
//! values, while [`ValidationError`] is what a typed config's `validate()`
//! returns. A `ValidationError` converts into `ConfigError` so both can flow
//! through `?` in application code.

use crate::domain::duration::ParseDurationError;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// # Examples
///
/// ```
/// use layercfg::domain::errors::ConfigError;
///
/// let err = ConfigError::LoadError {
///     path: "/etc/app/config.yaml".into(),
///     message: "file not found".to_string(),
///     source: None,
/// };
/// assert!(err.is_load_error());
/// assert!(err.to_string().contains("failed to read config file"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An explicitly requested structured config file could not be read or parsed.
    #[error("failed to read config file {}: {message}", .path.display())]
    LoadError {
        /// The file that was requested
        path: PathBuf,
        /// What went wrong
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An explicitly requested override (`.env`) file could not be read or parsed.
    #[error("failed to load .env file {}: {message}", .path.display())]
    EnvFileError {
        /// The file that was requested
        path: PathBuf,
        /// What went wrong
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No config file matching the configured name was found in the search paths.
    #[error("config file \"{name}\" not found in {paths:?}")]
    ConfigFileNotFound {
        /// The file name searched for, without extension
        name: String,
        /// The directories that were searched
        paths: Vec<PathBuf>,
    },

    /// Failed to parse configuration content.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Decoding the resolved settings into a caller-supplied type failed.
    #[error("failed to unmarshal config: {message}")]
    Unmarshal {
        /// The error message, naming the offending path where known
        message: String,
    },

    /// A typed config failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseDurationError.
    pub fn from_parse_duration_error(key: String, err: ParseDurationError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "duration".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError for a value whose kind cannot be converted at all.
    pub(crate) fn incompatible(key: &str, target_type: &str, found: &str) -> Self {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: target_type.to_string(),
            source: format!("cannot convert a {} value", found).into(),
        }
    }

    /// Returns `true` for failures to honour an explicit file request
    /// (structured config file or override file).
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ConfigError::LoadError { .. }
                | ConfigError::EnvFileError { .. }
                | ConfigError::ConfigFileNotFound { .. }
        )
    }
}

impl serde::de::Error for ConfigError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ConfigError::Unmarshal {
            message: msg.to_string(),
        }
    }
}

/// A field or cross-field rule rejected a typed config.
///
/// Displays as `"<field> <constraint>"`, followed by `", got <value>"` when the
/// offending value is recorded.
///
/// ```
/// use layercfg::domain::errors::ValidationError;
///
/// let err = ValidationError::new("server.port", "must be between 1 and 65535").with_value(0);
/// assert_eq!(err.to_string(), "server.port must be between 1 and 65535, got 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the field that failed
    pub field: String,
    /// Human-readable description of the violated constraint
    pub constraint: String,
    /// The offending value, when meaningful
    pub value: Option<String>,
}

impl ValidationError {
    /// Creates a validation error without a recorded value.
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            value: None,
        }
    }

    /// Records the offending value.
    pub fn with_value(mut self, value: impl fmt::Display) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.constraint)?;
        if let Some(value) = &self.value {
            write!(f, ", got {}", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_conversion_error() {
        let source_error = "invalid value".parse::<i32>().unwrap_err();
        let error = ConfigError::TypeConversionError {
            key: "test.key".to_string(),
            target_type: "i32".to_string(),
            source: Box::new(source_error),
        };
        assert!(error.to_string().contains("test.key"));
        assert!(error.to_string().contains("i32"));
    }

    #[test]
    fn test_load_error_display() {
        let error = ConfigError::LoadError {
            path: PathBuf::from("/nonexistent/config.yaml"),
            message: "No such file or directory".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "failed to read config file /nonexistent/config.yaml: No such file or directory"
        );
        assert!(error.is_load_error());
    }

    #[test]
    fn test_env_file_error_display() {
        let error = ConfigError::EnvFileError {
            path: PathBuf::from("/nonexistent/.env"),
            message: "missing".to_string(),
            source: None,
        };
        assert!(error.to_string().contains("failed to load .env file"));
        assert!(error.is_load_error());
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
        assert!(!error.is_load_error());
    }

    #[test]
    fn test_validation_error_conversion_is_transparent() {
        let error = ConfigError::from(ValidationError::new("database.host", "is required"));
        assert_eq!(error.to_string(), "database.host is required");
        assert!(matches!(error, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validation_error_with_value() {
        let error = ValidationError::new("test.port", "must be between 1 and 65535").with_value(-1);
        assert_eq!(error.field, "test.port");
        assert_eq!(error.value.as_deref(), Some("-1"));
        assert_eq!(
            error.to_string(),
            "test.port must be between 1 and 65535, got -1"
        );
    }

    #[test]
    fn test_serde_custom_error() {
        let error = <ConfigError as serde::de::Error>::custom("missing field `host`");
        assert_eq!(
            error.to_string(),
            "failed to unmarshal config: missing field `host`"
        );
    }

    #[test]
    fn test_from_parse_int_error() {
        let parse_err = "not_a_number".parse::<i32>().unwrap_err();
        let error = ConfigError::from_parse_int_error("test.key".to_string(), parse_err);
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("integer"));
    }

    #[test]
    fn test_from_parse_float_error() {
        let parse_err = "not_a_float".parse::<f64>().unwrap_err();
        let error = ConfigError::from_parse_float_error("test.key".to_string(), parse_err);
        assert!(error.to_string().contains("float"));
    }

    #[test]
    fn test_from_parse_bool_error() {
        let parse_err = "not_a_bool".parse::<bool>().unwrap_err();
        let error = ConfigError::from_parse_bool_error("test.key".to_string(), parse_err);
        assert!(error.to_string().contains("boolean"));
    }
}
