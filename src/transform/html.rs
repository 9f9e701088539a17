//! Whitespace-collapsing HTML minifier.
//!
//! Runs of whitespace outside raw-text elements collapse to a single
//! space. Content of `pre`, `textarea`, `script` and `style` is copied
//! verbatim since whitespace is significant there.

/// Elements whose text content must not be touched.
const RAW_TEXT_ELEMENTS: &[&str] = &["pre", "textarea", "script", "style"];

/// Collapse whitespace in an HTML document.
pub fn minify_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let bytes = source.as_bytes();
    let mut i = 0;
    let mut pending_space = false;

    while i < bytes.len() {
        let ch = bytes[i];

        if ch == b'<' {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }

            // Comments pass through untouched (conditional comments matter)
            if source[i..].starts_with("<!--") {
                let end = source[i..].find("-->").map_or(source.len(), |p| i + p + 3);
                out.push_str(&source[i..end]);
                i = end;
                continue;
            }

            let tag_end = source[i..].find('>').map_or(source.len(), |p| i + p + 1);
            let tag = &source[i..tag_end];
            out.push_str(tag);
            i = tag_end;

            if let Some(name) = raw_text_open(tag) {
                let close = format!("</{name}");
                let content_end = source[i..]
                    .to_ascii_lowercase()
                    .find(&close)
                    .map_or(source.len(), |p| i + p);
                out.push_str(&source[i..content_end]);
                i = content_end;
            }
        } else if ch.is_ascii_whitespace() {
            pending_space = true;
            i += 1;
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            // Copy the whole UTF-8 character
            let len = utf8_len(ch);
            out.push_str(&source[i..i + len]);
            i += len;
        }
    }

    out
}

/// If `tag` opens a raw-text element, return its name.
fn raw_text_open(tag: &str) -> Option<&'static str> {
    let inner = tag.trim_start_matches('<');
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS
        .iter()
        .find(|&&e| e == name && !tag.ends_with("/>"))
        .copied()
}

fn utf8_len(first: u8) -> usize {
    match first {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs() {
        let html = "<div>\n    <p>hello   world</p>\n</div>";
        assert_eq!(minify_html(html), "<div> <p>hello world</p> </div>");
    }

    #[test]
    fn test_preserves_pre() {
        let html = "<pre>\n  indented\n    more\n</pre>";
        assert_eq!(minify_html(html), html);
    }

    #[test]
    fn test_preserves_script() {
        let html = "<script>\nvar a = 1;\n</script>";
        assert_eq!(minify_html(html), html);
    }

    #[test]
    fn test_keeps_inline_spacing() {
        let html = "<b>a</b> <b>b</b>";
        assert_eq!(minify_html(html), html);
    }

    #[test]
    fn test_keeps_comments() {
        let html = "<!--[if IE]>  x  <![endif]-->";
        assert_eq!(minify_html(html), html);
    }

    #[test]
    fn test_multibyte_text() {
        let html = "<p>héllo   wörld</p>";
        assert_eq!(minify_html(html), "<p>héllo wörld</p>");
    }
}
