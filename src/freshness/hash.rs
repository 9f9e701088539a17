//! Content hashing using blake3.
//!
//! Watch-mode re-runs of the images task consult hashes to skip files
//! whose content didn't actually change, regardless of mtime churn.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::cache::{get_cached_hash, set_cached_hash};

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// A hash representing "no content" (all zeros).
    #[inline]
    pub const fn empty() -> Self {
        Self([0; 32])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 32]
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 16 hex chars are plenty for log output
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Compute blake3 hash of file contents.
///
/// Returns the empty hash if the file can't be read.
pub fn hash_file(path: &Path) -> ContentHash {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return ContentHash::empty(),
    };

    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return ContentHash::empty(),
        }
    }

    ContentHash::new(*hasher.finalize().as_bytes())
}

/// Check whether a source changed since it was last marked processed.
///
/// Unknown or unreadable sources count as dirty.
pub fn is_source_dirty(path: &Path) -> bool {
    let current = hash_file(path);
    if current.is_empty() {
        return true;
    }
    get_cached_hash(path) != Some(current)
}

/// Record the current content of `path` as processed.
pub fn mark_processed(path: &Path) {
    let hash = hash_file(path);
    if !hash.is_empty() {
        set_cached_hash(path, hash);
    }
}
