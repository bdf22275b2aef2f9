// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry and circuit breaker policy.

use crate::domain::{
    validate_duration, validate_positive, validate_range, Duration, Validate, ValidationError,
    ValidationResult,
};
use crate::service::Resolver;
use serde::{Deserialize, Serialize};

/// Exponential backoff retry settings plus circuit breaker thresholds.
///
/// | Variable                       | Key                            | Default |
/// |--------------------------------|--------------------------------|---------|
/// | `RESILIENCE_MAX_RETRIES`       | `resilience.max_retries`       | `3`     |
/// | `RESILIENCE_INITIAL_DELAY`     | `resilience.initial_delay`     | `1s`    |
/// | `RESILIENCE_MAX_DELAY`         | `resilience.max_delay`         | `30s`   |
/// | `RESILIENCE_MULTIPLIER`        | `resilience.multiplier`        | `2.0`   |
/// | `RESILIENCE_MAX_REQUESTS`      | `resilience.max_requests`      | `10`    |
/// | `RESILIENCE_INTERVAL`          | `resilience.interval`          | `10s`   |
/// | `RESILIENCE_TIMEOUT`           | `resilience.timeout`           | `60s`   |
/// | `RESILIENCE_FAILURE_THRESHOLD` | `resilience.failure_threshold` | `0.6`   |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Retries after the first attempt
    pub max_retries: i64,
    /// Backoff before the first retry
    pub initial_delay: Duration,
    /// Upper bound on backoff
    pub max_delay: Duration,
    /// Backoff growth factor
    pub multiplier: f64,

    /// Probe requests allowed while half-open
    pub max_requests: u32,
    /// Rolling window for failure counts while closed
    pub interval: Duration,
    /// Time spent open before probing
    pub timeout: Duration,
    /// Failure ratio that trips the breaker
    pub failure_threshold: f64,
}

impl ResilienceConfig {
    /// Binds the `RESILIENCE_*` variables and reads the settings, filling in
    /// defaults for anything left at its zero value.
    pub fn from_resolver(resolver: &mut Resolver) -> Self {
        resolver.bind_env("resilience.max_retries", &["RESILIENCE_MAX_RETRIES"]);
        resolver.bind_env("resilience.initial_delay", &["RESILIENCE_INITIAL_DELAY"]);
        resolver.bind_env("resilience.max_delay", &["RESILIENCE_MAX_DELAY"]);
        resolver.bind_env("resilience.multiplier", &["RESILIENCE_MULTIPLIER"]);
        resolver.bind_env("resilience.max_requests", &["RESILIENCE_MAX_REQUESTS"]);
        resolver.bind_env("resilience.interval", &["RESILIENCE_INTERVAL"]);
        resolver.bind_env("resilience.timeout", &["RESILIENCE_TIMEOUT"]);
        resolver.bind_env("resilience.failure_threshold", &["RESILIENCE_FAILURE_THRESHOLD"]);

        Self {
            max_retries: resolver.get_int("resilience.max_retries"),
            initial_delay: resolver.get_duration("resilience.initial_delay"),
            max_delay: resolver.get_duration("resilience.max_delay"),
            multiplier: resolver.get_float("resilience.multiplier"),
            max_requests: resolver.get_u32("resilience.max_requests"),
            interval: resolver.get_duration("resilience.interval"),
            timeout: resolver.get_duration("resilience.timeout"),
            failure_threshold: resolver.get_float("resilience.failure_threshold"),
        }
        .with_defaults()
    }

    /// Replaces zero-valued fields with their defaults.
    pub fn with_defaults(mut self) -> Self {
        self.apply_defaults();
        self
    }

    fn apply_defaults(&mut self) {
        // Retry
        if self.max_retries == 0 {
            self.max_retries = 3;
        }
        if self.initial_delay.is_zero() {
            self.initial_delay = Duration::from_secs(1);
        }
        if self.max_delay.is_zero() {
            self.max_delay = Duration::from_secs(30);
        }
        if self.multiplier == 0.0 {
            self.multiplier = 2.0;
        }

        // Circuit breaker
        if self.max_requests == 0 {
            self.max_requests = 10;
        }
        if self.interval.is_zero() {
            self.interval = Duration::from_secs(10);
        }
        if self.timeout.is_zero() {
            self.timeout = Duration::from_secs(60);
        }
        if self.failure_threshold == 0.0 {
            self.failure_threshold = 0.6;
        }
    }
}

impl Validate for ResilienceConfig {
    fn validate(&self) -> ValidationResult {
        validate_range("resilience.max_retries", self.max_retries, 0, 10)?;
        validate_duration("resilience.initial_delay", self.initial_delay)?;
        validate_duration("resilience.max_delay", self.max_delay)?;
        if self.max_delay < self.initial_delay {
            return Err(ValidationError::new(
                "resilience.max_delay",
                format!(
                    "must be greater than or equal to initial_delay ({})",
                    self.initial_delay
                ),
            )
            .with_value(self.max_delay));
        }
        validate_range("resilience.multiplier", self.multiplier, 1.0, 10.0)?;

        validate_positive("resilience.max_requests", i64::from(self.max_requests))?;
        validate_duration("resilience.interval", self.interval)?;
        validate_duration("resilience.timeout", self.timeout)?;
        validate_range("resilience.failure_threshold", self.failure_threshold, 0.0, 1.0)?;
        Ok(())
    }
}
