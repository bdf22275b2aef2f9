// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use layercfg::adapters::MemoryEnv;
use layercfg::service::{Resolver, ResolverOption};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sets process environment variables and restores the previous values on drop.
///
/// Tests using this must be `#[serial]`.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        EnvGuard { saved: Vec::new() }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.remember(key);
        env::set_var(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.remember(key);
        env::remove_var(key);
    }

    fn remember(&mut self, key: &str) {
        if !self.saved.iter().any(|(k, _)| k == key) {
            self.saved.push((key.to_string(), env::var(key).ok()));
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

/// Switches the working directory and switches back on drop.
///
/// Tests using this must be `#[serial]`.
pub struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().unwrap();
        env::set_current_dir(dir).unwrap();
        CwdGuard { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Builds an isolated in-memory environment.
pub fn memory_env(vars: &[(&str, &str)]) -> Arc<MemoryEnv> {
    Arc::new(MemoryEnv::with_vars(vars.iter().copied()))
}

/// Builds a resolver over an isolated environment with the `.env` load disabled.
pub fn memory_resolver(vars: &[(&str, &str)]) -> Resolver {
    Resolver::with_environment(memory_env(vars), [ResolverOption::WithoutEnvFile]).unwrap()
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
