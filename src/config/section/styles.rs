//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! targets = ["> 1%", "last 2 versions", "Firefox ESR"]
//! load_paths = ["."]
//! less_command = ["lessc"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Style compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Browserslist queries used for vendor prefixing.
    pub targets: Vec<String>,

    /// Additional sass load paths, relative to the project root.
    pub load_paths: Vec<PathBuf>,

    /// Command used to compile LESS sources (first element is looked up
    /// on PATH; e.g. `["lessc"]` or `["npx", "lessc"]`).
    pub less_command: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                "> 1%".into(),
                "last 2 versions".into(),
                "Firefox ESR".into(),
            ],
            load_paths: vec![PathBuf::from(".")],
            less_command: vec!["lessc".into()],
        }
    }
}
