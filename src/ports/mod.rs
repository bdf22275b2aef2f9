// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! the resolver depends on: the environment variable table it reads and
//! writes, and the parsers for structured config files. These traits are
//! implemented by adapters in the adapters layer.

pub mod environment;
pub mod parser;

// Re-export commonly used types
pub use environment::Environment;
pub use parser::ConfigParser;
