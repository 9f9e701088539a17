//! Request path resolution for the dev server.
//!
//! Each serve target maps URLs onto an ordered list of base directories
//! plus prefix routes for trees outside those bases (vendor packages,
//! staged scripts for the test harness). The first hit wins, which lets
//! staged output shadow sources the same way the dev overlay does on
//! disk.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::{
    cli::ServeTarget,
    config::PipelineConfig,
    utils::path::is_traversal,
};

pub struct ServeRoots {
    bases: Vec<PathBuf>,
    /// URL prefix (no slashes) mapped onto a directory.
    routes: Vec<(&'static str, PathBuf)>,
}

impl ServeRoots {
    pub fn for_target(config: &PipelineConfig, target: ServeTarget) -> Self {
        let paths = &config.paths;
        match target {
            ServeTarget::Dev => Self {
                bases: vec![paths.staging.clone(), paths.app.clone()],
                routes: vec![("vendor", paths.vendor.clone())],
            },
            ServeTarget::Dist => Self {
                bases: vec![paths.dist.clone()],
                routes: vec![],
            },
            ServeTarget::Test => Self {
                bases: vec![paths.test.clone()],
                routes: vec![
                    ("scripts", paths.staging.join("scripts")),
                    ("vendor", paths.vendor.clone()),
                ],
            },
        }
    }

    /// Resolve a raw request URL to a file on disk.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let rel = decode_url(url)?;

        for (prefix, dir) in &self.routes {
            if let Some(rest) = route_suffix(&rel, prefix) {
                if let Some(path) = resolve_in(dir, rest) {
                    return Some(path);
                }
            }
        }

        self.bases.iter().find_map(|base| resolve_in(base, &rel))
    }
}

/// Strip query/fragment, percent-decode and reject traversal.
///
/// Returns the path relative to the served root, without leading slash.
fn decode_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let rel = decoded.trim_start_matches('/').to_string();

    if rel.contains('\0') || is_traversal(&rel) {
        return None;
    }
    Some(rel)
}

/// Remainder of `rel` after a route prefix, if it matches.
fn route_suffix<'a>(rel: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = rel.strip_prefix(prefix)?;
    match rest.strip_prefix('/') {
        Some(suffix) => Some(suffix),
        None => rest.is_empty().then_some(""),
    }
}

/// Resolve a decoded relative path inside one base directory.
///
/// Directories fall back to their `index.html`. The canonicalized result
/// must stay inside the base, so symlinks cannot escape the served tree.
fn resolve_in(base: &Path, rel: &str) -> Option<PathBuf> {
    let mut path = if rel.is_empty() {
        base.to_path_buf()
    } else {
        base.join(rel)
    };

    if path.is_dir() {
        path = path.join("index.html");
    }

    let canonical = path.canonicalize().ok()?;
    let base_canonical = base.canonicalize().ok()?;
    if !canonical.starts_with(&base_canonical) {
        return None;
    }
    canonical.is_file().then_some(canonical)
}

// ============================================================================
// tests
// ============================================================================
