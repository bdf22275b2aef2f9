// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types for the configuration crate:
//! normalised keys, dynamically-typed values, a signed duration, the error
//! types and the field validators. It knows nothing about files or the
//! process environment.

pub mod config_key;
pub mod config_value;
pub mod duration;
pub mod errors;
pub mod validation;
pub mod value_de;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::ConfigValue;
pub use duration::{Duration, ParseDurationError};
pub use errors::{ConfigError, Result, ValidationError};
pub use validation::{
    validate_duration, validate_one_of, validate_port, validate_positive, validate_range,
    validate_required, Validate, ValidationResult,
};
pub use value_de::from_value;
