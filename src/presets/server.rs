// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server endpoint settings.

use crate::domain::{validate_duration, validate_port, validate_required, Duration};
use crate::domain::{Validate, ValidationResult};
use crate::service::Resolver;
use serde::{Deserialize, Serialize};

/// Where and how an HTTP server listens.
///
/// | Variable               | Key                     | Default     |
/// |------------------------|-------------------------|-------------|
/// | `SERVER_HOST`          | `server.host`           | `localhost` |
/// | `SERVER_PORT`          | `server.port`           | `8080`      |
/// | `SERVER_READ_TIMEOUT`  | `server.read_timeout`   | `15s`       |
/// | `SERVER_WRITE_TIMEOUT` | `server.write_timeout`  | `15s`       |
/// | `SERVER_IDLE_TIMEOUT`  | `server.idle_timeout`   | `60s`       |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface or host name to bind
    pub host: String,
    /// TCP port
    pub port: i64,
    /// Maximum time to read a request
    pub read_timeout: Duration,
    /// Maximum time to write a response
    pub write_timeout: Duration,
    /// Keep-alive idle timeout
    pub idle_timeout: Duration,
}

impl ServerConfig {
    /// Binds the server variables and reads the settings, filling in
    /// defaults for anything left at its zero value.
    ///
    /// ```rust
    /// use layercfg::adapters::MemoryEnv;
    /// use layercfg::presets::ServerConfig;
    /// use layercfg::service::{Resolver, ResolverOption};
    /// use std::sync::Arc;
    ///
    /// let env = Arc::new(MemoryEnv::with_vars([("SERVER_PORT", "9000")]));
    /// let mut resolver = Resolver::with_environment(env, [ResolverOption::WithoutEnvFile]).unwrap();
    ///
    /// let server = ServerConfig::from_resolver(&mut resolver);
    /// assert_eq!(server.address(), "localhost:9000");
    /// ```
    pub fn from_resolver(resolver: &mut Resolver) -> Self {
        resolver.bind_env("server.host", &["SERVER_HOST"]);
        resolver.bind_env("server.port", &["SERVER_PORT"]);
        resolver.bind_env("server.read_timeout", &["SERVER_READ_TIMEOUT"]);
        resolver.bind_env("server.write_timeout", &["SERVER_WRITE_TIMEOUT"]);
        resolver.bind_env("server.idle_timeout", &["SERVER_IDLE_TIMEOUT"]);

        Self {
            host: resolver.get_string("server.host"),
            port: resolver.get_int("server.port"),
            read_timeout: resolver.get_duration("server.read_timeout"),
            write_timeout: resolver.get_duration("server.write_timeout"),
            idle_timeout: resolver.get_duration("server.idle_timeout"),
        }
        .with_defaults()
    }

    /// Replaces zero-valued fields with their defaults.
    pub fn with_defaults(mut self) -> Self {
        self.apply_defaults();
        self
    }

    fn apply_defaults(&mut self) {
        if self.host.is_empty() {
            self.host = "localhost".to_string();
        }
        if self.port == 0 {
            self.port = 8080;
        }
        if self.read_timeout.is_zero() {
            self.read_timeout = Duration::from_secs(15);
        }
        if self.write_timeout.is_zero() {
            self.write_timeout = Duration::from_secs(15);
        }
        if self.idle_timeout.is_zero() {
            self.idle_timeout = Duration::from_secs(60);
        }
    }

    /// Returns `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ValidationResult {
        validate_required("server.host", &self.host)?;
        validate_port("server.port", self.port)?;
        validate_duration("server.read_timeout", self.read_timeout)?;
        validate_duration("server.write_timeout", self.write_timeout)?;
        validate_duration("server.idle_timeout", self.idle_timeout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServerConfig {
        ServerConfig::default().with_defaults()
    }

    #[test]
    fn test_defaults() {
        let config = valid();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.read_timeout, Duration::from_secs(15));
        assert_eq!(config.write_timeout, Duration::from_secs(15));
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_is_replaced_by_default() {
        let config = ServerConfig {
            port: 0,
            ..valid()
        }
        .with_defaults();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let config = ServerConfig {
            port: 70000,
            ..valid()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "server.port");
    }

    #[test]
    fn test_negative_timeout() {
        let config = ServerConfig {
            write_timeout: Duration::from_secs(-1),
            ..valid()
        };
        assert_eq!(config.validate().unwrap_err().field, "server.write_timeout");
    }

    #[test]
    fn test_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 443,
            ..valid()
        };
        assert_eq!(config.address(), "0.0.0.0:443");
    }
}
