//! Environment variable configuration
//!
//! Reads the raw runner settings from the process environment.

use std::env;
use std::path::PathBuf;

/// Directory containing the fixture tree
pub const SUITE_ROOT_VAR: &str = "TEST_SUITE_ROOT";

/// Executable under test
pub const COMPILER_BINARY_VAR: &str = "COMPILER_BINARY";

/// Raw configuration captured from environment variables
///
/// Nothing is validated here; see [`super::RunConfiguration::resolve`].
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Suite root from TEST_SUITE_ROOT
    pub suite_root: Option<PathBuf>,
    /// Compiler binary from COMPILER_BINARY
    pub compiler_binary: Option<PathBuf>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            suite_root: get_env_path(SUITE_ROOT_VAR),
            compiler_binary: get_env_path(COMPILER_BINARY_VAR),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.suite_root.is_some() || self.compiler_binary.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {SUITE_ROOT_VAR}:  {:?}", self.suite_root);
        println!("  {COMPILER_BINARY_VAR}:  {:?}", self.compiler_binary);
    }
}

/// An empty value counts as unset.
fn get_env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, Option<String>)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set the suite root
    pub fn suite_root(mut self, path: impl Into<String>) -> Self {
        self.vars.push((SUITE_ROOT_VAR.to_string(), Some(path.into())));
        self
    }

    /// Set the compiler binary
    pub fn compiler_binary(mut self, path: impl Into<String>) -> Self {
        self.vars
            .push((COMPILER_BINARY_VAR.to_string(), Some(path.into())));
        self
    }

    /// Remove a variable for the lifetime of the guard
    pub fn unset(mut self, name: impl Into<String>) -> Self {
        self.vars.push((name.into(), None));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.iter().rev() {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print the environment variables the runner reads
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {SUITE_ROOT_VAR}   Directory holding the .flang fixture tree (required)");
    println!("  {COMPILER_BINARY_VAR}   Compiler executable under test (required)");
    println!("  RUST_LOG          Log filter override (e.g. flang_conformance=debug)");
    println!();
    println!("Example:");
    println!("  export {SUITE_ROOT_VAR}=./tests/suite");
    println!("  export {COMPILER_BINARY_VAR}=./build/flang");
    println!("  flang-conformance run");
}
