// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the layered store and the precedence resolver.
//!
//! [`ValueStore`] holds the layers; [`Resolver`] assembles them from options
//! and exposes the typed accessors the presets and applications use.

pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use resolver::{
    Resolver, ResolverBuilder, ResolverOption, DEFAULT_CONFIG_NAME, DEFAULT_ENV_PREFIX,
};
pub use store::{Layer, ValueStore};
