//! Configuration module
//!
//! Resolves the run configuration from the environment and validates it
//! before any fixture is touched.

pub mod env;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use env::{EnvBuilder, EnvConfig, EnvGuard, COMPILER_BINARY_VAR, SUITE_ROOT_VAR};

/// Serializes tests that mutate the process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Fatal configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Set the {var} environment variable")]
    Unset { var: &'static str },

    #[error("The {var} environment variable must point to a directory (got {})", path.display())]
    NotADirectory { var: &'static str, path: PathBuf },

    #[error("The {var} environment variable must point to a file (got {})", path.display())]
    NotAFile { var: &'static str, path: PathBuf },

    #[error("Failed to resolve working directory: {0}")]
    Io(#[from] io::Error),
}

/// Validated configuration for one run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Absolute path of the fixture tree
    pub suite_root: PathBuf,
    /// Absolute path of the compiler under test
    pub compiler_binary: PathBuf,
}

impl RunConfiguration {
    /// Read and validate both variables from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(EnvConfig::load())
    }

    /// Validate raw environment values
    ///
    /// The suite root is checked first, then the compiler binary. Both are
    /// made absolute because the child process may not share our working
    /// directory.
    pub fn resolve(env: EnvConfig) -> Result<Self, ConfigError> {
        let suite_root = resolve_suite_root(env.suite_root)?;

        let compiler_binary = env.compiler_binary.ok_or(ConfigError::Unset {
            var: COMPILER_BINARY_VAR,
        })?;
        if !compiler_binary.is_file() {
            return Err(ConfigError::NotAFile {
                var: COMPILER_BINARY_VAR,
                path: compiler_binary,
            });
        }
        let compiler_binary = absolutize(&compiler_binary)?;

        debug!(
            "Resolved suite root {} and compiler {}",
            suite_root.display(),
            compiler_binary.display()
        );

        Ok(Self {
            suite_root,
            compiler_binary,
        })
    }
}

/// Resolve only the suite root, for commands that never spawn the compiler
pub fn suite_root_from_env() -> Result<PathBuf, ConfigError> {
    resolve_suite_root(EnvConfig::load().suite_root)
}

fn resolve_suite_root(raw: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    let suite_root = raw.ok_or(ConfigError::Unset {
        var: SUITE_ROOT_VAR,
    })?;
    if !suite_root.is_dir() {
        return Err(ConfigError::NotADirectory {
            var: SUITE_ROOT_VAR,
            path: suite_root,
        });
    }
    Ok(absolutize(&suite_root)?)
}

/// Join relative paths onto the current directory without touching symlinks
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
