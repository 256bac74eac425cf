//! JSON validation, beautifying and minifying
//!
//! Object key order is preserved through a round trip. Indentation follows
//! `JSON.stringify`: widths above 10 are clamped and a width of 0 produces
//! compact output.
//!
//! Numbers are carried through as written: `1.0` stays `1.0`, `1e400` is
//! accepted and kept, and integers wider than 64 bits keep every digit.
//! `JSON.stringify` would instead print `1`, `null` and a rounded value.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::CodecError;

/// Widest indentation accepted by [`beautify_json`]
pub const MAX_INDENT: usize = 10;

/// Output layout for [`format_json`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// One member per line, indented
    #[default]
    Beautify,
    /// No insignificant whitespace
    Minify,
}

/// Options for [`format_json`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormatOptions {
    pub style: JsonStyle,
    /// Spaces per nesting level when beautifying
    pub indent: usize,
}

impl Default for JsonFormatOptions {
    fn default() -> Self {
        Self {
            style: JsonStyle::Beautify,
            indent: 2,
        }
    }
}

fn parse(input: &str) -> Result<Value, CodecError> {
    // serde_json messages end with "at line L column C"
    serde_json::from_str(input).map_err(|e| CodecError::InvalidJson(e.to_string()))
}

/// Check that `input` is a single well-formed JSON document
pub fn validate_json(input: &str) -> Result<(), CodecError> {
    parse(input).map(|_| ())
}

/// Re-serialize `input` without insignificant whitespace
pub fn minify_json(input: &str) -> Result<String, CodecError> {
    let value = parse(input)?;
    serde_json::to_string(&value).map_err(|e| CodecError::InternalError(e.to_string()))
}

/// Re-serialize `input` with `indent` spaces per level
pub fn beautify_json(input: &str, indent: usize) -> Result<String, CodecError> {
    let indent = indent.min(MAX_INDENT);
    if indent == 0 {
        return minify_json(input);
    }

    let value = parse(input)?;
    let spaces = vec![b' '; indent];
    let mut buffer = Vec::with_capacity(input.len() * 2);
    let formatter = PrettyFormatter::with_indent(&spaces);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| CodecError::InternalError(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| CodecError::InternalError(e.to_string()))
}

/// Format `input` according to `options`
pub fn format_json(input: &str, options: &JsonFormatOptions) -> Result<String, CodecError> {
    match options.style {
        JsonStyle::Beautify => beautify_json(input, options.indent),
        JsonStyle::Minify => minify_json(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"name":"Ada","tags":["math","code"],"age":36,"nested":{"z":1,"a":null}}"#;

    #[test]
    fn test_validate() {
        assert!(validate_json(SAMPLE).is_ok());
        assert!(validate_json("  [1, 2, 3]  ").is_ok());
        assert!(validate_json("\"text\"").is_ok());
    }

    #[test]
    fn test_validate_reports_position() {
        let err = validate_json("{\n  \"a\": 1,\n  \"b\": \n}").unwrap_err();
        let CodecError::InvalidJson(reason) = &err else {
            panic!("expected InvalidJson, got {err:?}");
        };
        assert!(reason.contains("line 4 column 1"), "{reason}");
    }

    #[test]
    fn test_validate_rejects_trailing_content() {
        assert!(validate_json("{} {}").is_err());
        assert!(validate_json("").is_err());
        assert!(validate_json("{'a': 1}").is_err());
    }

    #[test]
    fn test_beautify_two_spaces() {
        let pretty = beautify_json(r#"{"a":[1,2],"b":{}}"#, 2).unwrap();
        assert_eq!(pretty, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}");
    }

    #[test]
    fn test_beautify_preserves_key_order() {
        let pretty = beautify_json(SAMPLE, 4).unwrap();
        let name = pretty.find("\"name\"").unwrap();
        let tags = pretty.find("\"tags\"").unwrap();
        let z = pretty.find("\"z\"").unwrap();
        let a = pretty.find("\"a\"").unwrap();
        assert!(name < tags);
        assert!(z < a);
        assert!(pretty.contains("\n    \"name\": \"Ada\""));
    }

    #[test]
    fn test_indent_is_clamped() {
        let wide = beautify_json(r#"{"a":1}"#, 40).unwrap();
        assert_eq!(wide, format!("{{\n{}\"a\": 1\n}}", " ".repeat(MAX_INDENT)));
    }

    #[test]
    fn test_zero_indent_minifies() {
        assert_eq!(
            beautify_json("{ \"a\" : [ 1 , 2 ] }", 0).unwrap(),
            r#"{"a":[1,2]}"#
        );
    }

    #[test]
    fn test_minify_round_trip() {
        let pretty = beautify_json(SAMPLE, 2).unwrap();
        assert_eq!(minify_json(&pretty).unwrap(), SAMPLE);
    }

    #[test]
    fn test_format_json_options() {
        let minified = format_json(
            "[ 1 ]",
            &JsonFormatOptions {
                style: JsonStyle::Minify,
                indent: 8,
            },
        )
        .unwrap();
        assert_eq!(minified, "[1]");

        let pretty = format_json("[1]", &JsonFormatOptions::default()).unwrap();
        assert_eq!(pretty, "[\n  1\n]");
    }

    #[test]
    fn test_numbers_keep_their_spelling() {
        assert!(validate_json("1e400").is_ok());
        assert_eq!(
            minify_json("[ 1.0, 1e400, 12345678901234567890123 ]").unwrap(),
            "[1.0,1e400,12345678901234567890123]"
        );
        assert_eq!(beautify_json("{\"n\": 2.50}", 2).unwrap(), "{\n  \"n\": 2.50\n}");
    }

    #[test]
    fn test_invalid_json_from_every_entry_point() {
        for result in [
            minify_json("{"),
            beautify_json("{", 2),
            format_json("{", &JsonFormatOptions::default()),
        ] {
            assert!(matches!(result, Err(CodecError::InvalidJson(_))));
        }
    }
}
