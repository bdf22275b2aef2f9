// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ready-made typed configs for common application concerns.
//!
//! Each preset binds its keys to conventional environment variable names,
//! reads them through a [`Resolver`](crate::service::Resolver), and fills
//! any field left at its zero value with a documented default. Building
//! never fails; call [`Validate::validate`](crate::domain::Validate::validate)
//! before use.
//!
//! A zero value is indistinguishable from "unset": `DB_RETRY_ATTEMPTS=0`
//! yields the default of 3. Use [`Resolver::unmarshal_key`] when an explicit
//! zero must be honoured.
//!
//! [`Resolver::unmarshal_key`]: crate::service::Resolver::unmarshal_key

pub mod database;
pub mod openai;
pub mod resilience;
pub mod server;

pub use database::DatabaseConfig;
pub use openai::OpenAiConfig;
pub use resilience::ResilienceConfig;
pub use server::ServerConfig;
