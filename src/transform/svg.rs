//! SVG minification via quick-xml.
//!
//! Drops comments and inter-element whitespace and rewrites the markup
//! compactly. Attribute values are otherwise untouched. `id` attributes
//! are kept by default since they serve as embedding and styling hooks.

use anyhow::Result;
use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
};

/// Minify an SVG document.
///
/// `keep_ids = false` additionally strips `id` attributes.
pub fn minify_svg(source: &str, keep_ids: bool) -> Result<String> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Comment(_) => {}
            Event::Start(e) => {
                writer.write_event(Event::Start(filter_attributes(&e, keep_ids)?))?;
            }
            Event::Empty(e) => {
                writer.write_event(Event::Empty(filter_attributes(&e, keep_ids)?))?;
            }
            event => writer.write_event(event)?,
        }
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn filter_attributes<'a>(elem: &BytesStart<'a>, keep_ids: bool) -> Result<BytesStart<'a>> {
    if keep_ids {
        return Ok(elem.to_owned());
    }

    let name = String::from_utf8(elem.name().as_ref().to_vec())?;
    let mut filtered = BytesStart::new(name);
    for attr in elem.attributes() {
        let attr = attr?;
        if attr.key.as_ref() != b"id" {
            filtered.push_attribute(attr);
        }
    }
    Ok(filtered.into_owned())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_comments_and_whitespace() {
        let svg = "<svg>\n  <!-- a comment -->\n  <rect width=\"1\"/>\n</svg>";
        assert_eq!(minify_svg(svg, true).unwrap(), "<svg><rect width=\"1\"/></svg>");
    }

    #[test]
    fn test_keeps_ids() {
        let svg = "<svg><g id=\"icon\"/></svg>";
        assert_eq!(minify_svg(svg, true).unwrap(), svg);
    }

    #[test]
    fn test_strips_ids_when_asked() {
        let svg = "<svg><g id=\"icon\" fill=\"red\"/></svg>";
        assert_eq!(
            minify_svg(svg, false).unwrap(),
            "<svg><g fill=\"red\"/></svg>"
        );
    }

    #[test]
    fn test_keeps_text_content() {
        let svg = "<svg><text>hi</text></svg>";
        assert_eq!(minify_svg(svg, true).unwrap(), svg);
    }

    #[test]
    fn test_invalid_xml() {
        assert!(minify_svg("<svg><unclosed></svg>", true).is_err());
    }
}
