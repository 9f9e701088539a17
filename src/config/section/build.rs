//! `[build]` section configuration.

use serde::{Deserialize, Serialize};

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Minify bundled JS/CSS and output HTML.
    pub minify: bool,

    /// Clean staging and dist before building (set by `--clean`).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            minify: true,
            clean: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert!(config.build.minify);
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_minify_off() {
        let config = test_parse_config("[build]\nminify = false");
        assert!(!config.build.minify);
    }
}
