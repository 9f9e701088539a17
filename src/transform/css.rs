//! CSS processing via lightningcss.
//!
//! Compiled stylesheets are lowered and vendor-prefixed for the configured
//! browserslist targets. Bundle minification for HTML builds goes through
//! [`minify_css`], which needs no target information since prefixing already
//! happened during the styles task.

use anyhow::{Result, anyhow};
use lightningcss::{
    stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet},
    targets::{Browsers, Targets},
};
use parcel_sourcemap::SourceMap;

/// Result of a CSS processing pass.
pub struct CssOutput {
    pub code: String,
    /// Source map JSON, present when requested.
    pub map: Option<String>,
}

/// Lower and vendor-prefix a stylesheet for the given browserslist queries.
///
/// `filename` is recorded in the source map and error messages.
pub fn process_css(
    source: &str,
    filename: &str,
    targets: &[String],
    minify: bool,
    source_map: bool,
) -> Result<CssOutput> {
    let browsers = Browsers::from_browserslist(targets.iter().map(String::as_str))
        .map_err(|err| anyhow!("invalid browserslist query: {err}"))?;
    let targets = Targets::from(browsers.unwrap_or_default());

    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|err| anyhow!("{filename}: {err}"))?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|err| anyhow!("{filename}: {err}"))?;

    let mut map = source_map.then(|| {
        let mut map = SourceMap::new("/");
        let idx = map.add_source(filename);
        let _ = map.set_source_content(idx as usize, source);
        map
    });

    let result = stylesheet
        .to_css(PrinterOptions {
            minify,
            targets,
            source_map: map.as_mut(),
            ..PrinterOptions::default()
        })
        .map_err(|err| anyhow!("{filename}: {err}"))?;

    let map_json = match map {
        Some(mut map) => Some(map.to_json(None)?),
        None => None,
    };

    Ok(CssOutput {
        code: result.code,
        map: map_json,
    })
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<String> {
        vec!["> 1%".into(), "last 2 versions".into(), "Firefox ESR".into()]
    }

    #[test]
    fn test_process_css_plain() {
        let out = process_css(".a { color: red; }", "main.css", &targets(), false, false).unwrap();
        assert!(out.code.contains("color"));
        assert!(out.map.is_none());
    }

    #[test]
    fn test_process_css_source_map() {
        let out = process_css(".a { color: red; }", "main.css", &targets(), false, true).unwrap();
        let map = out.map.unwrap();
        assert!(map.contains("\"main.css\""));
    }

    #[test]
    fn test_process_css_invalid_query() {
        let err = process_css(".a {}", "x.css", &["no such browser".into()], false, false);
        assert!(err.is_err());
    }

    #[test]
    fn test_process_css_parse_error() {
        assert!(process_css(".a { color: }", "x.css", &targets(), false, false).is_err());
    }

    #[test]
    fn test_minify_css() {
        let out = minify_css(".a {\n  color: #ff0000;\n}\n").unwrap();
        assert!(out.len() < ".a {\n  color: #ff0000;\n}\n".len());
        assert!(out.contains(".a"));
    }

    #[test]
    fn test_minify_css_invalid() {
        assert!(minify_css(".a { color: }").is_none());
    }
}
