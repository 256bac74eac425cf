//! HTML5 parser using html5ever
//!
//! html5ever implements the WHATWG parsing algorithm, so malformed markup
//! (unclosed tags, misnesting, stray end tags) is repaired the same way a
//! browser would repair it. Parsing a string therefore never fails.
//!
//! # Examples
//!
//! ```rust
//! use text_codec_kit::parser::{parse_html, parse_html_bytes};
//!
//! let dom = parse_html("<html><body><h1>Hello");
//!
//! // Legacy bytes are transcoded to UTF-8 first
//! let dom = parse_html_bytes(b"<p>Caf\xE9</p>", Some("iso-8859-1"))?;
//! # Ok::<(), text_codec_kit::CodecError>(())
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

use crate::error::CodecError;
use crate::utf8;

/// Parse an HTML string into a DOM tree
///
/// Scripting is disabled; `<script>` contents are kept as inert text nodes
/// and dropped later by the converter.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Parse HTML bytes, decoding them with `charset` (UTF-8 when `None`)
///
/// # Errors
///
/// - `CodecError::InvalidInput`: unknown charset label
/// - `CodecError::InvalidUtf8`: bytes are invalid in the charset
pub fn parse_html_bytes(html: &[u8], charset: Option<&str>) -> Result<RcDom, CodecError> {
    let text = match charset {
        Some(label) => utf8::from_bytes_with_charset(html, label)?,
        None => utf8::from_bytes(html)?,
    };
    Ok(parse_html(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::MarkdownConverter;
    use proptest::prelude::*;

    fn to_markdown(dom: &RcDom) -> String {
        MarkdownConverter::new()
            .convert(dom)
            .expect("Converted Markdown should be produced")
    }

    #[test]
    fn test_parse_malformed_html() {
        let dom = parse_html("<html><body><h1>Hello");
        assert_eq!(to_markdown(&dom), "# Hello\n");
    }

    #[test]
    fn test_parse_empty_input() {
        let dom = parse_html("");
        assert_eq!(to_markdown(&dom), "");
    }

    #[test]
    fn test_parse_misnested_tags() {
        let dom = parse_html("<b><i>text</b></i>");
        assert!(to_markdown(&dom).contains("text"));
    }

    #[test]
    fn test_parse_entities_are_decoded() {
        let dom = parse_html("<p>&lt;tag&gt; &amp; &quot;quotes&quot;</p>");
        assert!(to_markdown(&dom).contains("<tag> & \"quotes\""));
    }

    #[test]
    fn test_parse_bytes_utf8_default() {
        let dom = parse_html_bytes("<p>\u{2713} Check</p>".as_bytes(), None)
            .expect("UTF-8 content parsed");
        assert!(to_markdown(&dom).contains("✓ Check"));
    }

    #[test]
    fn test_parse_bytes_invalid_utf8() {
        let result = parse_html_bytes(b"\xFF\xFE<p>Invalid</p>", None);
        assert!(matches!(result, Err(CodecError::InvalidUtf8(_))));
    }

    #[test]
    fn test_parse_bytes_iso_8859_1_transcodes() {
        let dom = parse_html_bytes(b"<p>Caf\xE9</p>", Some("ISO-8859-1"))
            .expect("Should transcode ISO-8859-1 input");
        assert!(to_markdown(&dom).contains("Café"));
    }

    #[test]
    fn test_parse_bytes_windows_1252_euro() {
        let dom = parse_html_bytes(b"<p>Price \x80 10</p>", Some("windows-1252"))
            .expect("Should transcode windows-1252 input");
        assert!(to_markdown(&dom).contains("€"));
    }

    #[test]
    fn test_parse_bytes_unknown_charset() {
        let result = parse_html_bytes(b"<p>Hello</p>", Some("x-unknown-test"));
        assert!(matches!(result, Err(CodecError::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn prop_malformed_html_converts(
            tag in prop::sample::select(vec!["div", "p", "span", "h1", "ul", "li", "table", "tr", "td"]),
            content in "[a-zA-Z0-9 ]{0,100}",
            close_tag in prop::bool::ANY,
            add_invalid_nesting in prop::bool::ANY,
        ) {
            let mut html = format!("<{}>{}", tag, content);
            if close_tag {
                html.push_str(&format!("</{}>", tag));
            }
            if add_invalid_nesting {
                html.push_str("<p><div>Invalid nesting</div></p>");
            }

            let dom = parse_html(&html);
            prop_assert!(MarkdownConverter::new().convert(&dom).is_ok());
        }

        #[test]
        fn prop_broken_attributes_handled(
            tag in prop::sample::select(vec!["div", "p", "a", "img"]),
            attr_name in "[a-z]{1,10}",
            attr_value in "[a-zA-Z0-9]{0,20}",
            broken in prop::bool::ANY,
        ) {
            let html = if broken {
                format!("<{} {}=\"{}>Content</{}>", tag, attr_name, attr_value, tag)
            } else {
                format!("<{} {}>Content</{}>", tag, attr_name, tag)
            };

            let dom = parse_html(&html);
            prop_assert!(MarkdownConverter::new().convert(&dom).is_ok());
        }
    }
}
