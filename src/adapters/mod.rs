// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing concrete implementations of the ports.
//!
//! This module provides the environment tables (`ProcessEnv`, `MemoryEnv`),
//! the structured file parsers, config file discovery, and override file
//! loading. Each parser is gated behind its cargo feature.

pub mod config_file;
pub mod dotenv_file;
pub mod env_var;
#[cfg(feature = "json")]
pub mod json_file;
#[cfg(feature = "toml")]
pub mod toml_file;
#[cfg(feature = "yaml")]
pub mod yaml_file;

pub use dotenv_file::{
    load_default_override_file, load_override_file, load_override_file_into, DEFAULT_ENV_FILE,
};
pub use env_var::{MemoryEnv, ProcessEnv};

// Re-export parsers based on feature flags
#[cfg(feature = "json")]
pub use json_file::JsonParser;
#[cfg(feature = "toml")]
pub use toml_file::TomlParser;
#[cfg(feature = "yaml")]
pub use yaml_file::YamlParser;
