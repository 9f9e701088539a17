//! `[images]` section configuration.

use serde::{Deserialize, Serialize};

/// Image optimization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,

    /// Skip files whose output is already up to date.
    pub cache: bool,

    /// Preserve `id` attributes when minifying SVG.
    ///
    /// IDs are often used as hooks for embedding and styling.
    pub keep_svg_ids: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            cache: true,
            keep_svg_ids: true,
        }
    }
}
