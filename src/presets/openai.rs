// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI API client settings.

use crate::domain::{
    validate_duration, validate_positive, validate_range, validate_required, Duration, Validate,
    ValidationResult,
};
use crate::service::Resolver;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings for a chat completion client.
///
/// | Variable             | Key                  | Default          |
/// |----------------------|----------------------|------------------|
/// | `OPENAI_API_KEY`     | `openai.api_key`     | required         |
/// | `OPENAI_MODEL`       | `openai.model`       | `gpt-3.5-turbo`  |
/// | `OPENAI_TEMPERATURE` | `openai.temperature` | `0.7`            |
/// | `OPENAI_MAX_TOKENS`  | `openai.max_tokens`  | `2000`           |
/// | `OPENAI_TIMEOUT`     | `openai.timeout`     | `30s`            |
///
/// `Debug` output redacts the API key.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens in a response
    pub max_tokens: i64,
    /// Request timeout
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Binds the `OPENAI_*` variables and reads the settings, filling in
    /// defaults for anything left at its zero value.
    pub fn from_resolver(resolver: &mut Resolver) -> Self {
        resolver.bind_env("openai.api_key", &["OPENAI_API_KEY"]);
        resolver.bind_env("openai.model", &["OPENAI_MODEL"]);
        resolver.bind_env("openai.temperature", &["OPENAI_TEMPERATURE"]);
        resolver.bind_env("openai.max_tokens", &["OPENAI_MAX_TOKENS"]);
        resolver.bind_env("openai.timeout", &["OPENAI_TIMEOUT"]);

        Self {
            api_key: resolver.get_string("openai.api_key"),
            model: resolver.get_string("openai.model"),
            temperature: resolver.get_float("openai.temperature"),
            max_tokens: resolver.get_int("openai.max_tokens"),
            timeout: resolver.get_duration("openai.timeout"),
        }
        .with_defaults()
    }

    /// Replaces zero-valued fields with their defaults. The API key has no
    /// default.
    pub fn with_defaults(mut self) -> Self {
        self.apply_defaults();
        self
    }

    fn apply_defaults(&mut self) {
        if self.model.is_empty() {
            self.model = "gpt-3.5-turbo".to_string();
        }
        // A temperature of exactly 0.0 cannot be requested here.
        if self.temperature == 0.0 {
            self.temperature = 0.7;
        }
        if self.max_tokens == 0 {
            self.max_tokens = 2000;
        }
        if self.timeout.is_zero() {
            self.timeout = Duration::from_secs(30);
        }
    }
}

impl Validate for OpenAiConfig {
    fn validate(&self) -> ValidationResult {
        validate_required("openai.api_key", &self.api_key)?;
        validate_required("openai.model", &self.model)?;
        validate_range("openai.temperature", self.temperature, 0.0, 2.0)?;
        validate_positive("openai.max_tokens", self.max_tokens)?;
        validate_duration("openai.timeout", self.timeout)?;
        Ok(())
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OpenAiConfig {
        OpenAiConfig {
            api_key: "sk-test".to_string(),
            ..OpenAiConfig::default()
        }
        .with_defaults()
    }

    #[test]
    fn test_defaults() {
        let config = valid();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_required() {
        let err = OpenAiConfig::default().with_defaults().validate().unwrap_err();
        assert_eq!(err.to_string(), "openai.api_key is required");
    }

    #[test]
    fn test_temperature_bounds() {
        let hot = OpenAiConfig {
            temperature: 2.5,
            ..valid()
        };
        assert_eq!(hot.validate().unwrap_err().field, "openai.temperature");

        let max = OpenAiConfig {
            temperature: 2.0,
            ..valid()
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_negative_max_tokens() {
        let config = OpenAiConfig {
            max_tokens: -10,
            ..valid()
        };
        assert_eq!(config.validate().unwrap_err().field, "openai.max_tokens");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("sk-test"));
    }
}
