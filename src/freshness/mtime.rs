//! Mtime-based freshness detection for generated files.
//!
//! Timestamps are reliable here because both sides of the comparison are
//! regular project files: a source under `app/` and the artifact the
//! pipeline wrote for it.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file.
///
/// Returns `None` if the file doesn't exist or mtime cannot be read.
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B.
///
/// Returns `false` if either file doesn't exist or times can't be compared.
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

/// Check if `output` exists and is at least as new as `source`.
///
/// When true the file needs no reprocessing.
pub fn is_up_to_date(source: &Path, output: &Path) -> bool {
    output.exists() && !is_newer_than(source, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        assert!(!is_newer_than(&a, &b));
        assert!(!is_up_to_date(&a, &b));
    }

    #[test]
    fn test_up_to_date() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let output = dir.path().join("output");
        fs::write(&source, "s").unwrap();
        fs::write(&output, "o").unwrap();

        // Output written after source
        assert!(is_up_to_date(&source, &output));
    }

    #[test]
    fn test_stale_output() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let output = dir.path().join("output");
        fs::write(&output, "o").unwrap();
        fs::write(&source, "s").unwrap();

        let newer = std::time::SystemTime::now() + std::time::Duration::from_secs(10);
        let file = fs::File::open(&source).unwrap();
        file.set_modified(newer).unwrap();

        assert!(is_newer_than(&source, &output));
        assert!(!is_up_to_date(&source, &output));
    }
}
