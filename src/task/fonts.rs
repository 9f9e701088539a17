//! Fonts task: gather font files from vendor packages and `app/fonts`.
//!
//! Vendor fonts come from the packages listed in the dependency
//! manifest and land flat in the destination, since package-internal
//! layouts carry no meaning. Local fonts keep their relative paths.
//!
//! Fonts always land in staging so dev pages resolve them; a build
//! additionally writes them to dist.

use std::fs;

use anyhow::Result;

use crate::{
    config::PipelineConfig,
    log,
    manifest::{FONT_EXTENSIONS, VendorManifest},
    utils::walk::files_recursive_with_ext,
};

use super::Report;

pub fn run(config: &PipelineConfig) -> Result<Report> {
    let report = run_into(config, &config.paths.staging.join("fonts"))?;

    let serve_mode = config.cli.is_some_and(|cli| cli.is_serve());
    if serve_mode {
        return Ok(report);
    }
    run_into(config, &config.paths.fonts_out_dir())
}

fn run_into(config: &PipelineConfig, dest: &std::path::Path) -> Result<Report> {
    let manifest = VendorManifest::load(&config.paths.manifest)?;
    let vendor_fonts = manifest.font_files(&config.paths.vendor);

    let local_dir = config.paths.fonts_dir();
    let local_fonts = files_recursive_with_ext(&local_dir, FONT_EXTENSIONS);

    if vendor_fonts.is_empty() && local_fonts.is_empty() {
        return Ok(Report::default());
    }
    fs::create_dir_all(dest)?;

    let mut report = Report::default();

    // Vendor fonts are flattened on their file name
    for font in &vendor_fonts {
        let Some(name) = font.file_name() else {
            continue;
        };
        fs::copy(font, dest.join(name))?;
        report.processed += 1;
    }

    for font in &local_fonts {
        let rel = font.strip_prefix(&local_dir).unwrap_or(font);
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(font, target)?;
        report.processed += 1;
    }

    log!("fonts"; "{} font file(s) -> {}", report.processed, config.root_relative(dest).display());
    Ok(report)
}

// ============================================================================
// tests
// ============================================================================
