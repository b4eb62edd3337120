//! Fixture discovery
//!
//! Walks the suite root and collects every fixture file before anything
//! runs. At each directory level files come first, then subdirectories,
//! both in name order, so repeated runs see the same sequence.

pub mod skip;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::models::Fixture;

pub use skip::{is_skipped, SKIP_MARKER, SKIP_REASON};

/// Extension of flang source fixtures
pub const FIXTURE_EXTENSION: &str = "flang";

/// Fatal discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("No tests collected under {}", root.display())]
    NoTestsCollected { root: PathBuf },
}

/// Discover all `.flang` fixtures under `root`
pub fn discover(root: &Path) -> Result<Vec<Fixture>, DiscoveryError> {
    discover_with_extension(root, FIXTURE_EXTENSION)
}

/// Discover fixtures with a custom extension
///
/// An empty result means the suite is misconfigured, so it is an error
/// rather than an empty run.
pub fn discover_with_extension(
    root: &Path,
    extension: &str,
) -> Result<Vec<Fixture>, DiscoveryError> {
    let fixtures = collect_fixtures(root, extension);
    if fixtures.is_empty() {
        return Err(DiscoveryError::NoTestsCollected {
            root: root.to_path_buf(),
        });
    }

    debug!(
        "Collected {} fixtures under {}",
        fixtures.len(),
        root.display()
    );
    Ok(fixtures)
}

/// Collect fixtures without the non-empty check
///
/// Entries that cannot be read are logged and skipped.
pub fn collect_fixtures(root: &Path, extension: &str) -> Vec<Fixture> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by(files_before_dirs);

    let mut fixtures = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if is_fixture(&entry, extension) {
            fixtures.push(Fixture::new(entry.into_path(), root));
        }
    }

    fixtures
}

fn is_fixture(entry: &DirEntry, extension: &str) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .map(|e| e == extension)
            .unwrap_or(false)
}

fn files_before_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Keep fixtures whose identifier contains any of `patterns`
///
/// No patterns keeps everything.
pub fn filter_fixtures(fixtures: Vec<Fixture>, patterns: &[String]) -> Vec<Fixture> {
    if patterns.is_empty() {
        return fixtures;
    }
    fixtures
        .into_iter()
        .filter(|f| patterns.iter().any(|p| f.id.contains(p.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "print(1)\n").unwrap();
    }

    fn ids(fixtures: &[Fixture]) -> Vec<&str> {
        fixtures.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_discovers_every_depth() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "top.flang");
        touch(dir.path(), "a/one.flang");
        touch(dir.path(), "a/b/c/deep.flang");
        touch(dir.path(), "a/notes.txt");
        touch(dir.path(), "a/b/flang");
        touch(dir.path(), "z/readme.md");

        let fixtures = discover(dir.path()).unwrap();
        assert_eq!(
            ids(&fixtures),
            vec!["top.flang", "a/one.flang", "a/b/c/deep.flang"]
        );
        assert!(fixtures.iter().all(|f| f.path.is_absolute()));
    }

    #[test]
    fn test_files_before_subdirectories() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a/inner.flang");
        touch(dir.path(), "b.flang");
        touch(dir.path(), "c/inner.flang");
        touch(dir.path(), "d.flang");

        let fixtures = discover(dir.path()).unwrap();
        assert_eq!(
            ids(&fixtures),
            vec!["b.flang", "d.flang", "a/inner.flang", "c/inner.flang"]
        );
    }

    #[test]
    fn test_skip_fixtures_are_still_discovered() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "ok.flang");
        touch(dir.path(), "broken.skip.flang");

        let fixtures = discover(dir.path()).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures.iter().filter(|f| f.is_skipped()).count(), 1);
    }

    #[test]
    fn test_hidden_entries_are_not_special() {
        let dir = tempdir().unwrap();
        touch(dir.path(), ".hidden/visible.flang");
        touch(dir.path(), "x.flang");

        let fixtures = discover(dir.path()).unwrap();
        assert_eq!(ids(&fixtures), vec!["x.flang", ".hidden/visible.flang"]);
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "upper.FLANG");
        touch(dir.path(), "lower.flang");

        let fixtures = discover(dir.path()).unwrap();
        assert_eq!(ids(&fixtures), vec!["lower.flang"]);
    }

    #[test]
    fn test_empty_suite_is_an_error() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "sub/readme.md");

        let err = discover(dir.path()).unwrap_err();
        assert!(matches!(err, DiscoveryError::NoTestsCollected { .. }));
        assert!(err.to_string().starts_with("No tests collected"));
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.fl");
        touch(dir.path(), "b.flang");

        let fixtures = discover_with_extension(dir.path(), "fl").unwrap();
        assert_eq!(ids(&fixtures), vec!["a.fl"]);
    }

    #[test]
    fn test_rediscovery_is_deterministic() {
        let dir = tempdir().unwrap();
        for name in ["m.flang", "a/x.flang", "a/y.flang", "b/c/z.flang", "k.flang"] {
            touch(dir.path(), name);
        }

        let first = discover(dir.path()).unwrap();
        let second = discover(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_fixtures() {
        let root = Path::new("/suite");
        let fixtures = vec![
            Fixture::new("/suite/loops/for.flang", root),
            Fixture::new("/suite/loops/while.flang", root),
            Fixture::new("/suite/funcs/call.flang", root),
        ];

        let all = filter_fixtures(fixtures.clone(), &[]);
        assert_eq!(all.len(), 3);

        let loops = filter_fixtures(fixtures, &["loops/".to_string(), "nothing".to_string()]);
        assert_eq!(ids(&loops), vec!["loops/for.flang", "loops/while.flang"]);
    }
}
