//! Pipeline configuration management for `aspen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── images     # [images]
//! │   ├── paths      # [paths]
//! │   ├── scripts    # [scripts]
//! │   ├── serve      # [serve]
//! │   └── styles     # [styles]
//! ├── handle.rs      # Global config handle
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[paths]`   | Source, staging, dist, vendor and test locations |
//! | `[styles]`  | Browser targets, sass load paths, lessc command  |
//! | `[scripts]` | Transpile target, source maps                    |
//! | `[images]`  | JPEG quality, cache, SVG id handling             |
//! | `[build]`   | Minification                                     |
//! | `[serve]`   | Development server (port, interface, watch)      |
//!
//! The config file is optional: a project with no `aspen.toml` runs
//! entirely on defaults, rooted at the working directory.

pub mod handle;
pub mod section;

pub use handle::{cfg, init_config};
pub use section::{
    BuildConfig, ImagesConfig, PathsConfig, ScriptsConfig, ServeConfig, StylesConfig,
};

use crate::{
    cli::{BuildArgs, Cli, Commands, ServeArgs},
    log,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing aspen.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Directory layout
    pub paths: PathsConfig,

    /// Style compilation settings
    pub styles: StylesConfig,

    /// Script transpilation settings
    pub scripts: ScriptsConfig,

    /// Image optimization settings
    pub images: ImagesConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Development server settings
    pub serve: ServeConfig,
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root
    /// is its parent directory. When no config file exists, defaults are
    /// used and the working directory becomes the root.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;

        let (mut config, root, config_path) = match find_config_file(&cli.config) {
            Some(path) => {
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (Self::from_path(&path)?, root, path)
            }
            None => (Self::default(), cwd.clone(), cwd.join(&cli.config)),
        };

        config.config_path = config_path;
        config.root = root.clone();
        config.cli = Some(cli);
        config.normalize_paths(&root);
        config.apply_command_options(cli);

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "unknown fields in {}, ignoring:", display_path);
            for field in &ignored {
                eprintln!("- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Make all configured directories absolute under the project root.
    fn normalize_paths(&mut self, root: &Path) {
        self.paths.normalize(root);
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command() {
            Commands::Build { build_args } => {
                self.apply_build_args(build_args);
            }
            Commands::Serve { serve_args } => {
                self.apply_serve_args(serve_args);
            }
            Commands::Clean | Commands::Inject => {}
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        self.build.clean = args.clean;
    }

    /// Apply serve arguments from CLI.
    fn apply_serve_args(&mut self, args: &ServeArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.serve.watch, args.watch.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

/// Find config file by searching upward from the current directory.
///
/// Returns the absolute path to the config file if found.
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// test helpers
// ============================================================================

/// Parse a config snippet, asserting no unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
