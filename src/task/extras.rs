//! Extras task: copy loose root files of `app/` into dist.
//!
//! Everything directly under `app/` that isn't an HTML page travels
//! verbatim: favicons, robots.txt, manifests, dotfiles like `.htaccess`.
//! HTML pages belong to the html task, which rewrites them.

use std::fs;

use anyhow::Result;

use crate::{config::PipelineConfig, log, utils::walk::top_level_files};

use super::Report;

pub fn run(config: &PipelineConfig) -> Result<Report> {
    let files: Vec<_> = top_level_files(&config.paths.app)
        .into_iter()
        .filter(|path| !crate::utils::walk::has_ext(path, &["html"]))
        .collect();

    if files.is_empty() {
        return Ok(Report::default());
    }
    fs::create_dir_all(&config.paths.dist)?;

    for file in &files {
        let Some(name) = file.file_name() else {
            continue;
        };
        fs::copy(file, config.paths.dist.join(name))?;
    }

    log!("extras"; "{} file(s) copied", files.len());
    Ok(Report::processed(files.len()))
}

// ============================================================================
// tests
// ============================================================================
