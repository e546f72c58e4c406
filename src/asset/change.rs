//! Change detection between the previous concatenation and the new temp artifact.
//!
//! The comparison is a heuristic: equal sizes fall back to the short
//! fingerprint, so two different files of the same size whose fingerprints
//! collide are reported unchanged. That false negative is accepted.

use std::fs;
use std::path::Path;

use crate::freshness::FileHasher;

/// Whether `candidate` differs from `previous`.
///
/// - no previous artifact: changed (first build)
/// - sizes differ: changed, contents are not read
/// - otherwise: fingerprints differ
pub fn has_changed(previous: &Path, candidate: &Path, hasher: &FileHasher) -> bool {
    let Ok(old) = fs::metadata(previous) else {
        return true;
    };
    let Ok(new) = fs::metadata(candidate) else {
        return true;
    };
    if old.len() != new.len() {
        return true;
    }

    hasher.fingerprint(previous) != hasher.fingerprint(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_build_is_changed() {
        let dir = TempDir::new().unwrap();
        let tmp = dir.path().join("site-all.css.tmp");
        fs::write(&tmp, "a{}").unwrap();

        let hasher = FileHasher::new();
        assert!(has_changed(&dir.path().join("site-all.css"), &tmp, &hasher));
    }

    #[test]
    fn test_identical_files_unchanged() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("site-all.css");
        let tmp = dir.path().join("site-all.css.tmp");
        fs::write(&old, "AB").unwrap();
        fs::write(&tmp, "AB").unwrap();

        assert!(!has_changed(&old, &tmp, &FileHasher::new()));
    }

    #[test]
    fn test_size_difference_skips_hashing() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("site-all.css");
        let tmp = dir.path().join("site-all.css.tmp");
        fs::write(&old, "AB").unwrap();
        fs::write(&tmp, "ABC").unwrap();

        let hasher = FileHasher::new();
        assert!(has_changed(&old, &tmp, &hasher));
        assert!(hasher.is_empty());
    }

    #[test]
    fn test_same_size_different_content_changed() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("app-all.js");
        let tmp = dir.path().join("app-all.js.tmp");
        fs::write(&old, "var a=1;").unwrap();
        fs::write(&tmp, "var b=1;").unwrap();

        assert!(has_changed(&old, &tmp, &FileHasher::new()));
    }

    #[test]
    fn test_primed_fingerprint_is_used() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("site-all.css");
        let tmp = dir.path().join("site-all.css.tmp");
        fs::write(&old, "AB").unwrap();
        fs::write(&tmp, "AB").unwrap();

        let hasher = FileHasher::new();
        hasher.record(&tmp, "0000000");
        assert!(has_changed(&old, &tmp, &hasher));
    }
}
