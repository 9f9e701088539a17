//! Styles task: compile sass and LESS sources into staging CSS.
//!
//! Top-level files of `app/styles` are the entry points; underscore
//! partials only participate through imports. Compiled output is lowered
//! and vendor-prefixed for the configured browser targets, with a source
//! map written alongside.
//!
//! A broken stylesheet never aborts the task: the error is logged and
//! the remaining entries still compile, keeping watch sessions alive.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};

use crate::{
    config::PipelineConfig,
    log,
    transform::css::process_css,
    utils::{exec::Cmd, walk::top_level_with_ext},
};

use super::Report;

pub fn run_sass(config: &PipelineConfig) -> Result<Report> {
    compile_entries(config, &["scss", "sass"], compile_sass)
}

pub fn run_less(config: &PipelineConfig) -> Result<Report> {
    let program = &config.styles.less_command[0];
    if which::which(program).is_err() {
        if entry_files(config, &["less"]).is_empty() {
            return Ok(Report::default());
        }
        return Err(anyhow!(
            "`{program}` not found on PATH, required to compile LESS sources"
        ));
    }

    compile_entries(config, &["less"], compile_less)
}

/// Compile every entry of the given extensions through `compile`.
fn compile_entries(
    config: &PipelineConfig,
    exts: &[&str],
    compile: impl Fn(&PipelineConfig, &Path) -> Result<String>,
) -> Result<Report> {
    let out_dir = config.paths.staging.join("styles");
    fs::create_dir_all(&out_dir)?;

    let mut report = Report::default();

    for entry in entry_files(config, exts) {
        let name = entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match compile(config, &entry)
            .and_then(|css| postprocess(config, &entry, &css, &out_dir, &name))
        {
            Ok(()) => {
                log!("styles"; "{}", config.root_relative(&entry).display());
                report.processed += 1;
            }
            Err(err) => {
                log!("error"; "{}: {err:#}", config.root_relative(&entry).display());
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Top-level style sources, minus underscore partials.
fn entry_files(config: &PipelineConfig, exts: &[&str]) -> Vec<PathBuf> {
    top_level_with_ext(&config.paths.styles_dir(), exts)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('_'))
        })
        .collect()
}

/// Prefix, map and write compiled CSS to `<out_dir>/<name>.css`.
fn postprocess(
    config: &PipelineConfig,
    source: &Path,
    css: &str,
    out_dir: &Path,
    name: &str,
) -> Result<()> {
    let filename = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let out = process_css(css, &filename, &config.styles.targets, false, true)?;

    let css_path = out_dir.join(format!("{name}.css"));
    let map_name = format!("{name}.css.map");

    let mut code = out.code;
    if let Some(map) = out.map {
        code.push_str(&format!("\n/*# sourceMappingURL={map_name} */\n"));
        fs::write(out_dir.join(&map_name), map)?;
    }
    fs::write(&css_path, code)?;

    Ok(())
}

fn compile_sass(config: &PipelineConfig, entry: &Path) -> Result<String> {
    let mut options = grass::Options::default();
    for load_path in &config.styles.load_paths {
        options = options.load_path(config.root_join(load_path));
    }

    grass::from_path(entry, &options).map_err(|err| anyhow!("{err}"))
}

fn compile_less(config: &PipelineConfig, entry: &Path) -> Result<String> {
    let output = Cmd::from_slice(&config.styles.less_command)
        .arg(entry)
        .cwd(&config.root)
        .run()
        .context("LESS compilation failed")?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.root = dir.path().to_path_buf();
        config.paths.normalize(dir.path());
        fs::create_dir_all(dir.path().join("app/styles")).unwrap();
        config
    }

    #[test]
    fn test_sass_entry_compiled() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(
            dir.path().join("app/styles/main.scss"),
            "$c: red;\nbody { color: $c; }\n",
        )
        .unwrap();

        let report = run_sass(&config).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 0);

        let css = fs::read_to_string(dir.path().join(".tmp/styles/main.css")).unwrap();
        assert!(css.contains("color"));
        assert!(css.contains("sourceMappingURL=main.css.map"));
        assert!(dir.path().join(".tmp/styles/main.css.map").exists());
    }

    #[test]
    fn test_sass_partials_skipped() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(dir.path().join("app/styles/_vars.scss"), "$c: red;").unwrap();
        fs::write(
            dir.path().join("app/styles/main.scss"),
            "@import \"vars\";\nbody { color: $c; }\n",
        )
        .unwrap();

        let report = run_sass(&config).unwrap();
        assert_eq!(report.processed, 1);
        assert!(!dir.path().join(".tmp/styles/_vars.css").exists());
    }

    #[test]
    fn test_sass_error_does_not_abort() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(
            dir.path().join("app/styles/bad.scss"),
            "body { color: $nope; }",
        )
        .unwrap();
        fs::write(
            dir.path().join("app/styles/good.scss"),
            "body { margin: 0; }",
        )
        .unwrap();

        let report = run_sass(&config).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
        assert!(dir.path().join(".tmp/styles/good.css").exists());
    }

    #[test]
    fn test_no_entries_is_noop() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        assert_eq!(run_sass(&config).unwrap(), Report::default());
    }

    #[test]
    fn test_less_missing_compiler_without_sources() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.styles.less_command = vec!["definitely-not-a-real-lessc".into()];

        // No .less entries: silently a no-op even without the compiler
        assert_eq!(run_less(&config).unwrap(), Report::default());
    }

    #[test]
    fn test_less_missing_compiler_with_sources() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        fs::write(
            dir.path().join("app/styles/main.less"),
            "body { margin: 0; }",
        )
        .unwrap();
        config.styles.less_command = vec!["definitely-not-a-real-lessc".into()];

        assert!(run_less(&config).is_err());
    }
}
