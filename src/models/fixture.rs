//! Fixture model
//!
//! A fixture is one source file fed to the compiler under test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::discovery::skip;

/// One discovered test input
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    /// Absolute path handed to the compiler
    pub path: PathBuf,
    /// Path relative to the suite root, `/`-separated
    pub id: String,
}

impl Fixture {
    /// Create a fixture for `path` discovered under `root`
    pub fn new(path: impl Into<PathBuf>, root: &Path) -> Self {
        let path = path.into();
        let id = Self::identify(&path, root);
        Self { path, id }
    }

    /// Stable identifier of `path` relative to `root`
    ///
    /// Components are joined with `/` on every platform so CI and local
    /// output name a fixture the same way. A path outside `root` keeps its
    /// full form.
    pub fn identify(path: &Path, root: &Path) -> String {
        let relative = path.strip_prefix(root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// File name of the fixture
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether the file name carries the skip marker
    pub fn is_skipped(&self) -> bool {
        skip::is_skipped(&self.file_name())
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
