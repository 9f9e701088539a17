//! Global freshness cache for file content hashes.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::ContentHash;

/// Global cache for file content hashes (thread-safe).
pub struct FreshnessCache {
    hashes: DashMap<PathBuf, ContentHash>,
}

impl FreshnessCache {
    pub fn new() -> Self {
        Self {
            hashes: DashMap::new(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<ContentHash> {
        let canonical = path.canonicalize().ok()?;
        self.hashes.get(&canonical).map(|r| *r)
    }

    pub fn set(&self, path: &Path, hash: ContentHash) {
        if let Ok(canonical) = path.canonicalize() {
            self.hashes.insert(canonical, hash);
        }
    }

    pub fn clear(&self) {
        self.hashes.clear();
    }
}

impl Default for FreshnessCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Global freshness cache instance.
static FRESHNESS_CACHE: LazyLock<FreshnessCache> = LazyLock::new(FreshnessCache::new);

/// Get cached hash for a file.
#[inline]
pub fn get_cached_hash(path: &Path) -> Option<ContentHash> {
    FRESHNESS_CACHE.get(path)
}

/// Store hash in global cache.
#[inline]
pub fn set_cached_hash(path: &Path, hash: ContentHash) {
    FRESHNESS_CACHE.set(path, hash);
}

/// Clear the global freshness cache.
#[inline]
pub fn clear_cache() {
    FRESHNESS_CACHE.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cache_get_set() {
        let cache = FreshnessCache::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("img.png");
        fs::write(&path, "content").unwrap();

        let hash = ContentHash::new([1; 32]);
        cache.set(&path, hash);

        assert_eq!(cache.get(&path), Some(hash));
    }

    #[test]
    fn test_cache_miss_for_missing_file() {
        let cache = FreshnessCache::new();
        let dir = TempDir::new().unwrap();
        assert_eq!(cache.get(&dir.path().join("nope")), None);
    }
}
