// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable table adapters.
//!
//! [`ProcessEnv`] reads and writes the real process environment and is what
//! a resolver uses by default. [`MemoryEnv`] keeps variables in a private
//! map so tests can run in isolation without mutating process state.

use crate::ports::Environment;
use std::collections::HashMap;
use std::env;
use std::sync::{PoisonError, RwLock};

/// The real process environment.
///
/// Writes through this adapter are visible to the whole process, including
/// other threads and child processes. Load override files during startup,
/// before worker threads are spawned.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::ProcessEnv;
/// use layercfg::ports::Environment;
///
/// let env = ProcessEnv;
/// assert!(env.var("LAYERCFG_DOC_SURELY_UNSET").is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        // Variables that are not valid unicode are treated as absent.
        env::var(name).ok()
    }

    fn set_var(&self, name: &str, value: &str) {
        env::set_var(name, value);
    }

    fn contains(&self, name: &str) -> bool {
        env::var_os(name).is_some()
    }
}

/// An isolated, in-memory environment.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::MemoryEnv;
/// use layercfg::ports::Environment;
///
/// let env = MemoryEnv::with_vars([("DB_HOST", "db.internal")]);
/// assert_eq!(env.var("DB_HOST").as_deref(), Some("db.internal"));
/// assert!(!env.contains("DB_PORT"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment pre-populated with `vars`.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    /// Sets a variable, returning `self` for chaining.
    pub fn insert(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self
    }

    /// Returns the number of variables held.
    pub fn len(&self) -> usize {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no variables are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_vars(iter)
    }
}

impl Environment for MemoryEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_var(&self, name: &str, value: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());
    }
}
