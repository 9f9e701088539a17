//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `relative_from` - lexical relative path between two absolute paths

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Compute a lexical relative path from `base` (a directory) to `target`.
///
/// Both paths must be absolute. Used to rewrite vendor imports in style
/// sources, where the import path is relative to the style file's directory.
pub fn relative_from(target: &Path, base: &Path) -> PathBuf {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for part in &target_parts[common..] {
        result.push(part);
    }
    result
}

/// Check if a decoded request path tries to escape the served root.
pub fn is_traversal(rel: &str) -> bool {
    Path::new(rel)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_relative_from_sibling() {
        let rel = relative_from(Path::new("/root/vendor"), Path::new("/root/app/styles"));
        assert_eq!(rel, PathBuf::from("../../vendor"));
    }

    #[test]
    fn test_relative_from_child() {
        let rel = relative_from(Path::new("/root/app/styles/x"), Path::new("/root/app/styles"));
        assert_eq!(rel, PathBuf::from("x"));
    }

    #[test]
    fn test_is_traversal() {
        assert!(is_traversal("../etc/passwd"));
        assert!(is_traversal("styles/../../secret"));
        assert!(!is_traversal("styles/main.css"));
    }
}
