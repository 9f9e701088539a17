//! `[paths]` section configuration.
//!
//! Declares the three directory trees the pipeline moves files between,
//! plus the vendor tree and dependency manifest.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! app = "app"              # source tree (author-maintained)
//! staging = ".tmp"         # intermediate compiled output
//! dist = "dist"            # final distribution tree
//! vendor = "vendor"        # installed front-end packages
//! manifest = "vendor.json" # dependency manifest
//! test = "test"            # test harness directory
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::path::normalize_path;

/// Directory layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Source asset tree. Never written to by the pipeline, except by inject.
    pub app: PathBuf,

    /// Intermediate scratch tree. Safe to delete at any time.
    pub staging: PathBuf,

    /// Final distribution tree.
    pub dist: PathBuf,

    /// Vendored front-end packages directory.
    pub vendor: PathBuf,

    /// Dependency manifest file.
    pub manifest: PathBuf,

    /// Test harness directory (served by `serve --target test`).
    pub test: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app: PathBuf::from("app"),
            staging: PathBuf::from(".tmp"),
            dist: PathBuf::from("dist"),
            vendor: PathBuf::from("vendor"),
            manifest: PathBuf::from("vendor.json"),
            test: PathBuf::from("test"),
        }
    }
}

impl PathsConfig {
    /// Resolve all paths to absolute form relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.app = normalize_path(&root.join(&self.app));
        self.staging = normalize_path(&root.join(&self.staging));
        self.dist = normalize_path(&root.join(&self.dist));
        self.vendor = normalize_path(&root.join(&self.vendor));
        self.manifest = normalize_path(&root.join(&self.manifest));
        self.test = normalize_path(&root.join(&self.test));
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.app.join("styles")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.app.join("scripts")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.app.join("images")
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.app.join("fonts")
    }

    pub fn images_out_dir(&self) -> PathBuf {
        self.dist.join("images")
    }

    pub fn fonts_out_dir(&self) -> PathBuf {
        self.dist.join("fonts")
    }
}
