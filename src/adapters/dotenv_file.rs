// SPDX-License-Identifier: MIT OR Apache-2.0

//! Override (`.env`) file loading.
//!
//! An override file holds `KEY=value` lines. Loading it copies each variable
//! into an [`Environment`] unless that variable is already present, so a
//! value exported by the shell always beats the file. Parsing is done by
//! `dotenvy`, which also understands comments, quoting and `export` prefixes.

use crate::adapters::env_var::ProcessEnv;
use crate::domain::{ConfigError, Result};
use crate::ports::Environment;
use std::path::{Path, PathBuf};

/// Name of the override file loaded when no path is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Parses `path` completely, then applies every variable not already
/// present in `env`. Returns the number of variables written.
///
/// Nothing is applied if any line fails to parse.
pub(crate) fn apply_env_file(env: &dyn Environment, path: &Path) -> Result<usize> {
    let env_file_error = |e: dotenvy::Error| ConfigError::EnvFileError {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    };

    let entries = dotenvy::from_path_iter(path)
        .map_err(env_file_error)?
        .collect::<std::result::Result<Vec<(String, String)>, _>>()
        .map_err(env_file_error)?;

    let mut applied = 0;
    for (name, value) in entries {
        if env.contains(&name) {
            tracing::trace!(var = %name, "Keeping existing environment variable");
            continue;
        }
        env.set_var(&name, &value);
        applied += 1;
    }

    tracing::debug!(path = %path.display(), applied, "Loaded override file");
    Ok(applied)
}

/// Loads the first existing file among `paths` into `env`.
///
/// An empty `paths` means [`DEFAULT_ENV_FILE`] in the working directory. If
/// none of the paths exists this is a no-op. A file that exists but cannot be
/// parsed yields [`ConfigError::EnvFileError`].
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::{load_override_file_into, MemoryEnv};
/// use layercfg::ports::Environment;
/// use std::io::Write;
///
/// let mut file = tempfile::NamedTempFile::new().unwrap();
/// writeln!(file, "DB_HOST=from_file\nDB_PORT=6543").unwrap();
///
/// let env = MemoryEnv::with_vars([("DB_HOST", "from_shell")]);
/// load_override_file_into(&env, &[file.path()]).unwrap();
///
/// assert_eq!(env.var("DB_HOST").as_deref(), Some("from_shell"));
/// assert_eq!(env.var("DB_PORT").as_deref(), Some("6543"));
/// ```
pub fn load_override_file_into<P: AsRef<Path>>(env: &dyn Environment, paths: &[P]) -> Result<()> {
    let candidates: Vec<PathBuf> = if paths.is_empty() {
        vec![PathBuf::from(DEFAULT_ENV_FILE)]
    } else {
        paths.iter().map(|p| p.as_ref().to_path_buf()).collect()
    };

    match candidates.iter().find(|p| p.exists()) {
        Some(path) => apply_env_file(env, path).map(|_| ()),
        None => {
            tracing::debug!(?candidates, "No override file found");
            Ok(())
        }
    }
}

/// Loads the first existing file among `paths` into the process environment.
///
/// See [`load_override_file_into`] for the rules. This writes to the
/// process-wide table; call it before spawning threads.
pub fn load_override_file<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    load_override_file_into(&ProcessEnv, paths)
}

/// Loads `.env` from the working directory into the process environment,
/// if it exists.
pub fn load_default_override_file() -> Result<()> {
    load_override_file(&[DEFAULT_ENV_FILE])
}
