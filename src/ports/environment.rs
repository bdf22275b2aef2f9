// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable table trait definition.
//!
//! The resolver reads bound and prefixed variables through this port, and
//! override files write through it. Production code uses the real process
//! table; tests inject an isolated in-memory table instead.

use std::fmt::Debug;

/// A key-value table of environment variables.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Note that the process table itself
/// is shared by every thread; writing to it while other threads read it is
/// the caller's responsibility to serialise.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::Environment;
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// #[derive(Debug, Default)]
/// struct Fixed(Mutex<HashMap<String, String>>);
///
/// impl Environment for Fixed {
///     fn var(&self, name: &str) -> Option<String> {
///         self.0.lock().unwrap().get(name).cloned()
///     }
///
///     fn set_var(&self, name: &str, value: &str) {
///         self.0.lock().unwrap().insert(name.to_string(), value.to_string());
///     }
/// }
///
/// let env = Fixed::default();
/// env.set_var("APP_NAME", "demo");
/// assert_eq!(env.var("APP_NAME").as_deref(), Some("demo"));
/// assert!(env.contains("APP_NAME"));
/// ```
pub trait Environment: Send + Sync + Debug {
    /// Returns the value of `name`, or `None` if it is not present.
    ///
    /// A present but empty variable yields `Some("")`.
    fn var(&self, name: &str) -> Option<String>;

    /// Sets `name` to `value`, replacing any previous value.
    fn set_var(&self, name: &str, value: &str);

    /// Returns `true` if `name` is present, even with an empty value.
    fn contains(&self, name: &str) -> bool {
        self.var(name).is_some()
    }
}
