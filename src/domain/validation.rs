// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reusable field validators.
//!
//! Each validator is a pure function over a single value. It takes the dotted
//! field path so the resulting [`ValidationError`] can name the offending
//! setting. Typed configs compose these in [`Validate::validate`] and stop at
//! the first failure.

use crate::domain::duration::Duration;
use crate::domain::errors::ValidationError;
use std::fmt::Display;

/// Result of a single validation step.
pub type ValidationResult = std::result::Result<(), ValidationError>;

/// Implemented by typed configs that can check their own invariants.
///
/// # Examples
///
/// ```
/// use layercfg::domain::validation::{validate_port, Validate, ValidationResult};
///
/// struct Listener {
///     port: i64,
/// }
///
/// impl Validate for Listener {
///     fn validate(&self) -> ValidationResult {
///         validate_port("listener.port", self.port)
///     }
/// }
///
/// assert!(Listener { port: 8080 }.validate().is_ok());
/// assert!(Listener { port: 0 }.validate().is_err());
/// ```
pub trait Validate {
    /// Checks every field and cross-field rule, returning the first failure.
    fn validate(&self) -> ValidationResult;
}

/// Fails if `value` is empty.
pub fn validate_required(field: &str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Fails unless `port` lies in `[1, 65535]`.
///
/// ```
/// use layercfg::domain::validation::validate_port;
///
/// assert!(validate_port("server.port", 65535).is_ok());
/// let err = validate_port("server.port", 65536).unwrap_err();
/// assert_eq!(err.to_string(), "server.port must be between 1 and 65535, got 65536");
/// ```
pub fn validate_port(field: &str, port: i64) -> ValidationResult {
    if !(1..=65535).contains(&port) {
        return Err(ValidationError::new(field, "must be between 1 and 65535").with_value(port));
    }
    Ok(())
}

/// Fails if `duration` is strictly negative. Zero is accepted.
pub fn validate_duration(field: &str, duration: Duration) -> ValidationResult {
    if duration.is_negative() {
        return Err(ValidationError::new(field, "must not be negative").with_value(duration));
    }
    Ok(())
}

/// Fails unless `value > 0`.
pub fn validate_positive(field: &str, value: i64) -> ValidationResult {
    if value <= 0 {
        return Err(ValidationError::new(field, "must be positive").with_value(value));
    }
    Ok(())
}

/// Fails unless `min <= value <= max`.
///
/// Works for any ordered type, so the same validator covers integer counts
/// and floating point ratios.
///
/// ```
/// use layercfg::domain::validation::validate_range;
///
/// assert!(validate_range("resilience.multiplier", 1.0, 1.0, 10.0).is_ok());
/// assert!(validate_range("database.retry_attempts", 11, 0, 10).is_err());
/// ```
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult
where
    T: PartialOrd + Display,
{
    // NaN compares false both ways, so it is rejected here too.
    if !(value >= min && value <= max) {
        return Err(
            ValidationError::new(field, format!("must be between {} and {}", min, max))
                .with_value(value),
        );
    }
    Ok(())
}

/// Fails unless `value` is one of `allowed`.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> ValidationResult {
    if !allowed.contains(&value) {
        return Err(
            ValidationError::new(field, format!("must be one of: {}", allowed.join(", ")))
                .with_value(format!("{:?}", value)),
        );
    }
    Ok(())
}
