//! Html task: bundle build blocks and emit dist pages.
//!
//! Pages at the top level of `app/` are scanned for build blocks:
//!
//! ```html
//! <!-- build:js scripts/vendor.js -->
//! <script src="/vendor/jquery/dist/jquery.js"></script>
//! <script src="scripts/plugins.js"></script>
//! <!-- endbuild -->
//! ```
//!
//! Every referenced file is resolved against staging, then `app/`, then
//! the project root, concatenated into one bundle at the block's target
//! path, and the whole block collapses to a single tag. Bundles and the
//! page itself are minified unless minification is disabled.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result, anyhow};
use regex::{Captures, Regex};

use crate::{
    config::PipelineConfig,
    log,
    transform::{css::minify_css, html::minify_html, js::minify_js},
    utils::walk::top_level_with_ext,
};

use super::Report;

static BUILD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*build:(js|css)\s+(\S+)\s*-->(.*?)<!--\s*endbuild\s*-->")
        .expect("valid regex")
});

static ASSET_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:src|href)\s*=\s*["']([^"']+)["']"#).expect("valid regex"));

/// Kind of a build block, from its `build:` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BundleKind {
    Js,
    Css,
}

pub fn run(config: &PipelineConfig) -> Result<Report> {
    let pages = top_level_with_ext(&config.paths.app, &["html"]);
    if pages.is_empty() {
        return Ok(Report::default());
    }
    fs::create_dir_all(&config.paths.dist)?;

    let mut report = Report::default();
    for page in pages {
        process_page(config, &page)
            .with_context(|| format!("{}", config.root_relative(&page).display()))?;
        log!("html"; "{}", config.root_relative(&page).display());
        report.processed += 1;
    }

    Ok(report)
}

fn process_page(config: &PipelineConfig, page: &Path) -> Result<()> {
    let source = fs::read_to_string(page)?;

    // Replacement happens in a second pass so bundle errors can propagate
    let mut bundles = Vec::new();
    for caps in BUILD_BLOCK.captures_iter(&source) {
        let kind = match &caps[1] {
            "js" => BundleKind::Js,
            _ => BundleKind::Css,
        };
        let target = caps[2].to_string();
        let content = write_bundle(config, kind, &target, &caps[3])?;
        bundles.push(content);
    }

    let mut iter = bundles.into_iter();
    let rewritten = BUILD_BLOCK.replace_all(&source, |_: &Captures| {
        iter.next().unwrap_or_default()
    });

    let output = if config.build.minify {
        minify_html(&rewritten)
    } else {
        rewritten.into_owned()
    };

    let name = page.file_name().ok_or_else(|| anyhow!("invalid page path"))?;
    fs::write(config.paths.dist.join(name), output)?;
    Ok(())
}

/// Concatenate a block's referenced files into `dist/<target>`.
///
/// Returns the tag replacing the block.
fn write_bundle(
    config: &PipelineConfig,
    kind: BundleKind,
    target: &str,
    block: &str,
) -> Result<String> {
    let mut bundle = String::new();
    for caps in ASSET_REF.captures_iter(block) {
        let reference = &caps[1];
        let resolved = resolve_reference(config, reference)
            .ok_or_else(|| anyhow!("unresolved asset reference '{reference}'"))?;
        bundle.push_str(&fs::read_to_string(&resolved)?);
        bundle.push('\n');
    }

    let code = if config.build.minify {
        match kind {
            BundleKind::Js => minify_js(&bundle)
                .ok_or_else(|| anyhow!("failed to minify bundle '{target}'"))?,
            BundleKind::Css => minify_css(&bundle)
                .ok_or_else(|| anyhow!("failed to minify bundle '{target}'"))?,
        }
    } else {
        bundle
    };

    let dest = config.paths.dist.join(target);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, code)?;

    Ok(match kind {
        BundleKind::Js => format!(r#"<script src="{target}"></script>"#),
        BundleKind::Css => format!(r#"<link rel="stylesheet" href="{target}">"#),
    })
}

/// Resolve a block reference against staging, app, then the project root.
fn resolve_reference(config: &PipelineConfig, reference: &str) -> Option<PathBuf> {
    let rel = reference.trim_start_matches('/');
    [&config.paths.staging, &config.paths.app, &config.root]
        .iter()
        .map(|base| base.join(rel))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.root = dir.path().to_path_buf();
        config.paths.normalize(dir.path());
        fs::create_dir_all(dir.path().join("app")).unwrap();
        config
    }

    #[test]
    fn test_js_block_bundled_and_replaced() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        fs::create_dir_all(dir.path().join(".tmp/scripts")).unwrap();
        fs::write(dir.path().join(".tmp/scripts/main.js"), "var a = 1;\n").unwrap();
        fs::create_dir_all(dir.path().join("app/scripts")).unwrap();
        fs::write(dir.path().join("app/scripts/plugins.js"), "var b = 2;\n").unwrap();

        fs::write(
            dir.path().join("app/index.html"),
            concat!(
                "<html><body>\n",
                "<!-- build:js scripts/app.js -->\n",
                "<script src=\"scripts/main.js\"></script>\n",
                "<script src=\"scripts/plugins.js\"></script>\n",
                "<!-- endbuild -->\n",
                "</body></html>\n",
            ),
        )
        .unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.processed, 1);

        let page = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
        assert!(page.contains(r#"<script src="scripts/app.js"></script>"#));
        assert!(!page.contains("build:js"));

        // Staging copy wins over app copy, both land in the bundle
        let bundle = fs::read_to_string(dir.path().join("dist/scripts/app.js")).unwrap();
        assert!(!bundle.is_empty());
    }

    #[test]
    fn test_css_block() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        fs::create_dir_all(dir.path().join(".tmp/styles")).unwrap();
        fs::write(
            dir.path().join(".tmp/styles/main.css"),
            "body {\n  margin: 0;\n}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("app/index.html"),
            concat!(
                "<!-- build:css styles/main.css -->\n",
                "<link rel=\"stylesheet\" href=\"styles/main.css\">\n",
                "<!-- endbuild -->\n",
            ),
        )
        .unwrap();

        run(&config).unwrap();
        let page = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
        assert!(page.contains(r#"<link rel="stylesheet" href="styles/main.css">"#));

        let bundle = fs::read_to_string(dir.path().join("dist/styles/main.css")).unwrap();
        assert!(bundle.len() < "body {\n  margin: 0;\n}\n".len());
    }

    #[test]
    fn test_vendor_reference_resolved_from_root() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        fs::create_dir_all(dir.path().join("vendor/jquery/dist")).unwrap();
        fs::write(
            dir.path().join("vendor/jquery/dist/jquery.js"),
            "var jq = 1;\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("app/index.html"),
            concat!(
                "<!-- build:js scripts/vendor.js -->\n",
                "<script src=\"/vendor/jquery/dist/jquery.js\"></script>\n",
                "<!-- endbuild -->\n",
            ),
        )
        .unwrap();

        run(&config).unwrap();
        assert!(dir.path().join("dist/scripts/vendor.js").exists());
    }

    #[test]
    fn test_unresolved_reference_fails() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        fs::write(
            dir.path().join("app/index.html"),
            concat!(
                "<!-- build:js scripts/app.js -->\n",
                "<script src=\"scripts/missing.js\"></script>\n",
                "<!-- endbuild -->\n",
            ),
        )
        .unwrap();

        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("missing.js"));
    }

    #[test]
    fn test_page_without_blocks_copied_minified() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        fs::write(
            dir.path().join("app/about.html"),
            "<html>\n  <body>\n    <p>hi</p>\n  </body>\n</html>\n",
        )
        .unwrap();

        run(&config).unwrap();
        let page = fs::read_to_string(dir.path().join("dist/about.html")).unwrap();
        assert!(!page.contains("\n  "));
    }

    #[test]
    fn test_minify_disabled_keeps_content() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.build.minify = false;

        fs::create_dir_all(dir.path().join(".tmp/scripts")).unwrap();
        fs::write(
            dir.path().join(".tmp/scripts/main.js"),
            "var answer = 42;\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("app/index.html"),
            concat!(
                "<!-- build:js scripts/app.js -->\n",
                "<script src=\"scripts/main.js\"></script>\n",
                "<!-- endbuild -->\n",
            ),
        )
        .unwrap();

        run(&config).unwrap();
        let bundle = fs::read_to_string(dir.path().join("dist/scripts/app.js")).unwrap();
        assert!(bundle.contains("answer"));
    }
}
