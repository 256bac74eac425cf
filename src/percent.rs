//! Percent (URL component) codec
//!
//! Encoding escapes every UTF-8 byte outside the URI-component unreserved set
//! as `%XX` with uppercase hex. The unreserved set is `A-Z a-z 0-9 - _ . ~`
//! plus the marks `! * ' ( )`, matching what browsers leave untouched when
//! encoding a single URL component.
//!
//! Decoding is strict: every `%` must introduce two hex digits, and the
//! resulting bytes must form valid UTF-8. `+` is a literal plus, not a space.
//!
//! ```rust
//! use text_codec_kit::percent::{url_decode, url_encode};
//!
//! assert_eq!(url_encode("Hello World!"), "Hello%20World!");
//! assert_eq!(url_decode("caf%C3%A9").unwrap(), "café");
//! assert!(url_decode("100%").is_err());
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::CodecError;

/// Bytes escaped by [`url_encode`]: everything except alphanumerics and `-_.!~*'()`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string as a URL component
pub fn url_encode(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Decode a percent-encoded URL component
///
/// # Errors
///
/// Returns `CodecError::InvalidPercentEncoding` when a `%` is not followed by
/// exactly two hex digits, or when the decoded bytes are not valid UTF-8.
pub fn url_decode(input: &str) -> Result<String, CodecError> {
    validate_escapes(input)?;

    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            CodecError::InvalidPercentEncoding(format!(
                "decoded bytes are not valid UTF-8 (valid up to byte {})",
                e.valid_up_to()
            ))
        })
}

/// Check that every `%` introduces a two-digit hex escape
fn validate_escapes(input: &str) -> Result<(), CodecError> {
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let digits = bytes.get(i + 1..i + 3);
            match digits {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => {
                    return Err(CodecError::InvalidPercentEncoding(format!(
                        "'%' at position {} is not followed by two hex digits",
                        i
                    )));
                }
            }
        } else {
            i += 1;
        }
    }

    Ok(())
}
