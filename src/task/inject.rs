//! Inject task: wire vendor package references into sources.
//!
//! Pages and stylesheets declare marker blocks that this task rewrites
//! in place, in manifest order:
//!
//! ```html
//! <!-- vendor:js -->
//! <script src="/vendor/jquery/dist/jquery.js"></script>
//! <!-- endvendor -->
//! ```
//!
//! ```scss
//! // vendor:scss
//! @import "../../vendor/normalize/normalize.css";
//! // endvendor
//! ```
//!
//! Markers survive rewriting, so the task is idempotent and re-runs
//! whenever the manifest changes. Files without markers are untouched.

use std::{fs, path::Path, sync::LazyLock};

use anyhow::Result;
use regex::{Captures, Regex};

use crate::{
    config::PipelineConfig,
    log,
    manifest::{VendorManifest, VendorPackage},
    utils::{
        path::relative_from,
        walk::{has_ext, top_level_with_ext},
    },
};

use super::Report;

static HTML_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)([ \t]*)<!--\s*vendor:(js|css)\s*-->.*?<!--\s*endvendor\s*-->")
        .expect("valid regex")
});

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)([ \t]*)//\s*vendor:(scss|less|css)\s*\n.*?//\s*endvendor")
        .expect("valid regex")
});

pub fn run(config: &PipelineConfig) -> Result<Report> {
    let manifest = VendorManifest::load(&config.paths.manifest)?;
    let packages = manifest.packages(&config.paths.vendor);

    let mut report = Report::default();

    for page in top_level_with_ext(&config.paths.app, &["html"]) {
        report = report + inject_file(config, &page, &packages, inject_html_blocks)?;
    }
    for style in top_level_with_ext(&config.paths.styles_dir(), &["scss", "sass", "less"]) {
        report = report + inject_file(config, &style, &packages, inject_style_blocks)?;
    }

    Ok(report)
}

fn inject_file(
    config: &PipelineConfig,
    path: &Path,
    packages: &[VendorPackage],
    rewrite: impl Fn(&PipelineConfig, &Path, &str, &[VendorPackage]) -> String,
) -> Result<Report> {
    let source = fs::read_to_string(path)?;
    let rewritten = rewrite(config, path, &source, packages);

    if rewritten == source {
        return Ok(Report {
            skipped: 1,
            ..Report::default()
        });
    }

    fs::write(path, rewritten)?;
    log!("inject"; "{}", config.root_relative(path).display());
    Ok(Report::processed(1))
}

fn inject_html_blocks(
    config: &PipelineConfig,
    _path: &Path,
    source: &str,
    packages: &[VendorPackage],
) -> String {
    HTML_BLOCK
        .replace_all(source, |caps: &Captures| {
            let indent = &caps[1];
            let kind = &caps[2];
            let tags: Vec<String> = mains_with_ext(packages, &[kind])
                .map(|main| {
                    let rel = main
                        .strip_prefix(&config.paths.vendor)
                        .unwrap_or(main)
                        .display();
                    match kind {
                        "js" => format!("{indent}<script src=\"/vendor/{rel}\"></script>"),
                        _ => format!("{indent}<link rel=\"stylesheet\" href=\"/vendor/{rel}\">"),
                    }
                })
                .collect();

            render_block(
                indent,
                &format!("<!-- vendor:{kind} -->"),
                &tags,
                "<!-- endvendor -->",
            )
        })
        .into_owned()
}

fn inject_style_blocks(
    config: &PipelineConfig,
    path: &Path,
    source: &str,
    packages: &[VendorPackage],
) -> String {
    let base = path.parent().unwrap_or(&config.root);

    STYLE_BLOCK
        .replace_all(source, |caps: &Captures| {
            let indent = &caps[1];
            let kind = &caps[2];
            // Stylesheet blocks also accept plain CSS mains
            let imports: Vec<String> = mains_with_ext(packages, &[kind, "css"])
                .map(|main| {
                    let rel = relative_from(main, base);
                    format!("{indent}@import \"{}\";", rel.display())
                })
                .collect();

            render_block(indent, &format!("// vendor:{kind}"), &imports, "// endvendor")
        })
        .into_owned()
}

fn mains_with_ext<'a>(
    packages: &'a [VendorPackage],
    exts: &'a [&str],
) -> impl Iterator<Item = &'a std::path::PathBuf> {
    packages
        .iter()
        .flat_map(|pkg| pkg.mains.iter())
        .filter(move |main| has_ext(main, exts))
}

fn render_block(indent: &str, open: &str, lines: &[String], close: &str) -> String {
    let mut block = format!("{indent}{open}\n");
    for line in lines {
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(indent);
    block.push_str(close);
    block
}

// ============================================================================
// tests
// ============================================================================
