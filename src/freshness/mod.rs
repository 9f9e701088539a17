//! Freshness detection: content-hash (blake3) for sources, mtime for outputs.

mod cache;
mod hash;
pub mod mtime;

pub use cache::clear_cache;
pub use hash::{ContentHash, hash_file, is_source_dirty, mark_processed};
pub use mtime::{is_newer_than, is_up_to_date};
