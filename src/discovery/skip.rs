//! Skip annotations
//!
//! A fixture is disabled by adding a `.skip` segment to its file name,
//! e.g. `closures.skip.flang`. The check is a pure function of the name.

/// Suffix segment that disables a fixture
pub const SKIP_MARKER: &str = "skip";

/// Reason attached to skipped outcomes
pub const SKIP_REASON: &str = "annotated with skip marker";

/// Whether `file_name` carries the skip marker among its suffix segments
///
/// Leading dots belong to the stem (`.skip.flang` is a hidden file named
/// `.skip`), and the match is case-sensitive.
pub fn is_skipped(file_name: &str) -> bool {
    file_name
        .trim_start_matches('.')
        .split('.')
        .skip(1)
        .any(|segment| segment == SKIP_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_suffix() {
        assert!(is_skipped("closures.skip.flang"));
        assert!(is_skipped("a.b.skip.flang"));
    }

    #[test]
    fn test_plain_fixture() {
        assert!(!is_skipped("closures.flang"));
        assert!(!is_skipped("flang"));
        assert!(!is_skipped(""));
    }

    #[test]
    fn test_stem_is_not_a_suffix() {
        assert!(!is_skipped("skip.flang"));
        assert!(!is_skipped(".skip.flang"));
        assert!(!is_skipped("skipping.flang"));
        assert!(!is_skipped("noskip.flang"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_skipped("closures.SKIP.flang"));
        assert!(!is_skipped("closures.Skip.flang"));
    }

    #[test]
    fn test_segment_must_match_exactly() {
        assert!(!is_skipped("closures.skipped.flang"));
        assert!(!is_skipped("closures.skip-me.flang"));
    }
}
