//! `[scripts]` section configuration.

use serde::{Deserialize, Serialize};

/// Script transpilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// ECMAScript version scripts are down-leveled to (e.g. "es2015").
    pub target: String,

    /// Emit `.map` source maps next to transpiled files.
    pub source_maps: bool,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            target: "es2015".into(),
            source_maps: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_scripts_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.scripts.target, "es2015");
        assert!(config.scripts.source_maps);
    }

    #[test]
    fn test_scripts_override() {
        let config = test_parse_config("[scripts]\ntarget = \"es2018\"\nsource_maps = false");
        assert_eq!(config.scripts.target, "es2018");
        assert!(!config.scripts.source_maps);
    }
}
