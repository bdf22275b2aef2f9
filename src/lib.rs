// SPDX-License-Identifier: MIT OR Apache-2.0

//! A layered, validated configuration crate.
//!
//! `layercfg` resolves settings from environment variables, `.env` override
//! files, structured config files (YAML, JSON, TOML) and in-code defaults,
//! then turns them into typed structs that can validate themselves.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigKey`, `ConfigValue`, `Duration`), errors and validators
//! - **Ports**: Trait definitions that define interfaces (`Environment`, `ConfigParser`)
//! - **Adapters**: Process and in-memory environments, file parsers, `.env` loading
//! - **Service**: The layered store and the `Resolver` that assembles it
//! - **Presets**: Typed configs for servers, databases, the OpenAI API and resilience policies
//!
//! # Precedence
//!
//! Highest first:
//!
//! 1. Environment variables bound to the key, in bind order
//! 2. `<PREFIX>_<KEY>` (prefix `APP` by default; `.` and `-` become `_`)
//! 3. Variables from override files, which never replace a variable that is already set
//! 4. The structured config file
//! 5. Values `set` in code
//! 6. Defaults
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `json`: Enable JSON file support (default)
//! - `toml`: Enable TOML file support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use layercfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut resolver = Resolver::new([ResolverOption::env_prefix("MYAPP")])?;
//!
//! let db = DatabaseConfig::from_resolver(&mut resolver);
//! db.validate()?;
//! println!("connecting to {}", db.connection_string());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod presets;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{load_override_file, MemoryEnv, ProcessEnv};
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigValue, Duration, Result, Validate, ValidationError,
    };
    pub use crate::ports::{ConfigParser, Environment};
    pub use crate::presets::{DatabaseConfig, OpenAiConfig, ResilienceConfig, ServerConfig};
    pub use crate::service::{Resolver, ResolverBuilder, ResolverOption};
}
