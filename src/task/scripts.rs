//! Scripts task: transpile `app/scripts` into staging.
//!
//! Every `.js` under the scripts tree is down-leveled to the configured
//! ECMAScript target, preserving its relative path. A script that fails
//! to parse is logged and skipped; its last good staged copy stays in
//! place, which keeps watch sessions alive while the author fixes it.

use std::{fs, path::Path};

use anyhow::Result;

use crate::{
    config::PipelineConfig,
    log,
    transform::js::transpile_js,
    utils::walk::files_recursive_with_ext,
};

use super::Report;

pub fn run(config: &PipelineConfig) -> Result<Report> {
    let src_dir = config.paths.scripts_dir();
    let out_dir = config.paths.staging.join("scripts");

    let sources = files_recursive_with_ext(&src_dir, &["js"]);
    let mut report = Report::default();

    for source in sources {
        let rel = source.strip_prefix(&src_dir).unwrap_or(&source);
        match transpile_one(config, &source, rel, &out_dir) {
            Ok(()) => {
                log!("scripts"; "{}", config.root_relative(&source).display());
                report.processed += 1;
            }
            Err(err) => {
                log!("error"; "{}: {err:#}", config.root_relative(&source).display());
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

fn transpile_one(
    config: &PipelineConfig,
    source: &Path,
    rel: &Path,
    out_dir: &Path,
) -> Result<()> {
    let dest = out_dir.join(rel);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let code = fs::read_to_string(source)?;
    let out = transpile_js(&code, rel, &config.scripts.target, config.scripts.source_maps)?;

    let mut code = out.code;
    if let Some(map) = out.map {
        let map_name = format!(
            "{}.map",
            dest.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        code.push_str(&format!("\n//# sourceMappingURL={map_name}\n"));
        fs::write(dest.with_file_name(map_name), map)?;
    }
    fs::write(&dest, code)?;
    Ok(())
}

// ============================================================================
// tests
// ============================================================================
