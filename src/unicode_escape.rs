//! `\uXXXX` escape codec
//!
//! Escaping works on UTF-16 code units: every unit becomes `\u` followed by
//! four lowercase hex digits, so characters above U+FFFF are written as a
//! surrogate pair of two escapes (`😀` → `\ud83d\ude00`). This keeps output
//! compatible with JavaScript and JSON string literals.
//!
//! Unescaping is a substitution pass rather than a grammar: `\uXXXX` tokens
//! (either hex case) are replaced and every other character is copied through.
//! A `\u` that is not followed by four hex digits is an error, as is a
//! sequence of escapes that leaves an unpaired surrogate.
//!
//! ```rust
//! use text_codec_kit::unicode_escape::{unicode_escape, unicode_unescape};
//!
//! assert_eq!(unicode_escape("Hi"), "\\u0048\\u0069");
//! assert_eq!(unicode_unescape("caf\\u00E9!").unwrap(), "café!");
//! assert!(unicode_unescape("\\u12").is_err());
//! ```

use std::fmt::Write as _;

use crate::error::CodecError;
use crate::utf8;

/// Escape every UTF-16 code unit of `input` as `\uXXXX`
pub fn unicode_escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 6);
    for unit in input.encode_utf16() {
        // Writing into a String cannot fail
        let _ = write!(output, "\\u{:04x}", unit);
    }
    output
}

/// Replace `\uXXXX` escapes in `input` with the characters they denote
///
/// # Errors
///
/// Returns `CodecError::InvalidUnicodeEscape` when a `\u` is not followed by
/// exactly four hex digits, or when the escapes produce an unpaired surrogate.
pub fn unicode_unescape(input: &str) -> Result<String, CodecError> {
    let mut units: Vec<u16> = Vec::with_capacity(input.len());
    let mut chars = input.char_indices();

    while let Some((index, ch)) = chars.next() {
        if ch == '\\' && input[index + 1..].starts_with('u') {
            let unit = parse_escape_digits(input, index)?;
            units.push(unit);
            // Skip 'u' and the four digits, all ASCII
            for _ in 0..5 {
                chars.next();
            }
        } else {
            let mut buf = [0u16; 2];
            units.extend_from_slice(ch.encode_utf16(&mut buf));
        }
    }

    utf8::from_utf16(&units)
}

/// Parse the four hex digits of the escape starting at byte `index`
fn parse_escape_digits(input: &str, index: usize) -> Result<u16, CodecError> {
    let digits = input
        .get(index + 2..index + 6)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()));

    let Some(digits) = digits else {
        return Err(CodecError::InvalidUnicodeEscape(format!(
            "'\\u' at position {} is not followed by four hex digits",
            index
        )));
    };

    u16::from_str_radix(digits, 16).map_err(|e| {
        CodecError::InvalidUnicodeEscape(format!("escape at position {}: {}", index, e))
    })
}
