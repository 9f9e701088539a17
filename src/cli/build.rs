//! Production build: compile everything into `dist`.
//!
//! Stage order matters only across stages: pages pull bundles from the
//! staging output of styles and scripts, so those finish first. Within
//! a stage, tasks touch disjoint trees and run in parallel.

use std::time::Instant;

use anyhow::Result;

use crate::{
    config::PipelineConfig,
    log,
    task::{self, Report, Task},
    utils::walk::files_recursive,
};

pub fn run(config: &PipelineConfig) -> Result<()> {
    let started = Instant::now();

    if config.build.clean {
        task::clean::run(config)?;
    }

    // Stage 1: styles and scripts into staging
    let (styles, scripts) = rayon::join(
        || -> Result<Report> {
            let (sass, less) = rayon::join(
                || Task::StylesSass.run_with(config),
                || Task::StylesLess.run_with(config),
            );
            Ok(sass? + less?)
        },
        || Task::Scripts.run_with(config),
    );
    let stage_one = styles? + scripts?;

    // Stage 2: everything that lands in dist
    let ((html, images), (fonts, extras)) = rayon::join(
        || {
            rayon::join(
                || Task::Html.run_with(config),
                || Task::Images.run_with(config),
            )
        },
        || {
            rayon::join(
                || Task::Fonts.run_with(config),
                || Task::Extras.run_with(config),
            )
        },
    );
    let stage_two = html? + images? + fonts? + extras?;

    let total = stage_one + stage_two;
    let elapsed = started.elapsed().as_secs_f64();
    log!(
        "build";
        "{} file(s) in {:.2}s -> {} ({})",
        total.processed,
        elapsed,
        config.root_relative(&config.paths.dist).display(),
        format_size(dist_size(config)),
    );

    if !total.is_clean() {
        log!("warning"; "{} file(s) failed, see output above", total.failed);
    }

    Ok(())
}

/// Total bytes under dist.
fn dist_size(config: &PipelineConfig) -> u64 {
    files_recursive(&config.paths.dist)
        .iter()
        .filter_map(|p| p.metadata().ok())
        .map(|m| m.len())
        .sum()
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
