//! Directory walking helpers for glob-style file collection.
//!
//! Tasks select their inputs as "directory + extension set" rather than
//! textual glob patterns; these helpers centralize that.

use jwalk::WalkDir;
use std::path::{Path, PathBuf};

/// List top-level files of `dir` with one of the given extensions, sorted.
///
/// Returns an empty list if the directory does not exist.
pub fn top_level_with_ext(dir: &Path, exts: &[&str]) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_ext(p, exts))
        .collect();
    files.sort();
    files
}

/// List all top-level files of `dir` (including dotfiles), sorted.
pub fn top_level_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

/// Recursively list all files under `dir`, sorted for determinism.
pub fn files_recursive(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// Recursively list files under `dir` with one of the given extensions, sorted.
pub fn files_recursive_with_ext(dir: &Path, exts: &[&str]) -> Vec<PathBuf> {
    let mut files = files_recursive(dir);
    files.retain(|p| has_ext(p, exts));
    files
}

/// Check file extension against a lowercase extension set.
pub fn has_ext(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| exts.contains(&e.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_top_level_with_ext() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.scss"), "").unwrap();
        fs::write(dir.path().join("other.less"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested.scss"), "").unwrap();

        let scss = top_level_with_ext(dir.path(), &["scss"]);
        assert_eq!(scss.len(), 1);
        assert!(scss[0].ends_with("main.scss"));

        let both = top_level_with_ext(dir.path(), &["scss", "less"]);
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn test_top_level_missing_dir() {
        assert!(top_level_with_ext(Path::new("/nonexistent"), &["scss"]).is_empty());
        assert!(top_level_files(Path::new("/nonexistent")).is_empty());
    }

    #[test]
    fn test_top_level_files_includes_dotfiles() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".htaccess"), "").unwrap();
        fs::write(dir.path().join("robots.txt"), "").unwrap();

        let files = top_level_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_files_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/2.js"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();

        let files = files_recursive(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.js"));
        assert!(files[1].ends_with("b/2.js"));
    }

    #[test]
    fn test_has_ext_case_insensitive() {
        assert!(has_ext(Path::new("photo.JPG"), &["jpg", "jpeg"]));
        assert!(!has_ext(Path::new("photo.png"), &["jpg"]));
        assert!(!has_ext(Path::new("noext"), &["jpg"]));
    }
}
