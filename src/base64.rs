//! Base64 codec
//!
//! Encodes bytes with the standard alphabet (`A–Z a–z 0–9 + /`) and `=`
//! padding, and decodes strictly: wrong length, stray characters, padding in
//! the middle of the input and non-zero trailing bits are all rejected.
//!
//! # Whitespace
//!
//! Input containing whitespace is rejected unless
//! [`WhitespacePolicy::Strip`] is selected, in which case every ASCII
//! whitespace character is removed before decoding (useful for line-wrapped
//! MIME payloads).
//!
//! # Examples
//!
//! ```rust
//! use text_codec_kit::base64::{base64_decode, base64_encode, base64_encode_text};
//!
//! assert_eq!(base64_encode_text("Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
//! assert_eq!(base64_decode("SGk=").unwrap(), b"Hi");
//! assert!(base64_decode("A").is_err());
//! assert_eq!(base64_encode(&[0xFF]), "/w==");
//! ```

use ::base64::Engine as _;
use ::base64::engine::general_purpose::{STANDARD, URL_SAFE};

use crate::error::CodecError;
use crate::utf8;

/// How whitespace inside the encoded input is treated on decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespacePolicy {
    /// Any whitespace is an alphabet violation
    #[default]
    Reject,
    /// Remove all ASCII whitespace before decoding
    Strip,
}

/// Base64 alphabet selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base64Alphabet {
    /// RFC 4648 section 4: `+` and `/`
    #[default]
    Standard,
    /// RFC 4648 section 5: `-` and `_`
    UrlSafe,
}

/// Base64 codec options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Base64Options {
    /// Whitespace handling on decode
    pub whitespace: WhitespacePolicy,
    /// Alphabet used for both directions
    pub alphabet: Base64Alphabet,
}

/// Encode bytes as padded standard Base64
pub fn base64_encode(bytes: &[u8]) -> String {
    base64_encode_with(bytes, &Base64Options::default())
}

/// Encode bytes with the configured alphabet
pub fn base64_encode_with(bytes: &[u8], options: &Base64Options) -> String {
    match options.alphabet {
        Base64Alphabet::Standard => STANDARD.encode(bytes),
        Base64Alphabet::UrlSafe => URL_SAFE.encode(bytes),
    }
}

/// Decode padded standard Base64, rejecting whitespace
pub fn base64_decode(input: &str) -> Result<Vec<u8>, CodecError> {
    base64_decode_with(input, &Base64Options::default())
}

/// Decode Base64 with explicit options
///
/// # Errors
///
/// Returns `CodecError::InvalidBase64` when:
/// - the (whitespace-adjusted) length is not a multiple of 4
/// - a character outside the alphabet or `=` appears
/// - padding appears anywhere but the end of the final group
/// - the final symbol carries non-zero trailing bits
pub fn base64_decode_with(input: &str, options: &Base64Options) -> Result<Vec<u8>, CodecError> {
    let stripped;
    let input = match options.whitespace {
        WhitespacePolicy::Reject => input,
        WhitespacePolicy::Strip => {
            stripped = input
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect::<String>();
            stripped.as_str()
        }
    };

    if input.is_empty() {
        return Ok(Vec::new());
    }

    if input.len() % 4 != 0 {
        return Err(CodecError::InvalidBase64(format!(
            "length {} is not a multiple of 4",
            input.len()
        )));
    }

    let result = match options.alphabet {
        Base64Alphabet::Standard => STANDARD.decode(input),
        Base64Alphabet::UrlSafe => URL_SAFE.decode(input),
    };

    result.map_err(|e| CodecError::InvalidBase64(e.to_string()))
}

/// Encode the UTF-8 bytes of `text`
pub fn base64_encode_text(text: &str) -> String {
    base64_encode(&utf8::to_bytes(text))
}

/// Decode Base64 and interpret the bytes as UTF-8 text
pub fn base64_decode_text(input: &str) -> Result<String, CodecError> {
    base64_decode_text_with(input, &Base64Options::default())
}

/// Decode Base64 with options and interpret the bytes as UTF-8 text
pub fn base64_decode_text_with(input: &str, options: &Base64Options) -> Result<String, CodecError> {
    let bytes = base64_decode_with(input, options)?;
    utf8::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_hello_world() {
        assert_eq!(base64_encode(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    }

    #[test]
    fn test_padding_rules() {
        assert_eq!(base64_encode(b""), "");
        assert_eq!(base64_encode(b"f"), "Zg==");
        assert_eq!(base64_encode(b"fo"), "Zm8=");
        assert_eq!(base64_encode(b"foo"), "Zm9v");
        assert_eq!(base64_encode(b"foob"), "Zm9vYg==");
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(base64_decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_single_char_fails() {
        let err = base64_decode("A").unwrap_err();
        assert!(matches!(err, CodecError::InvalidBase64(_)));
    }

    #[test]
    fn test_decode_missing_padding_fails() {
        assert!(base64_decode("Zg").is_err());
        assert!(base64_decode("Zm8").is_err());
    }

    #[test]
    fn test_decode_invalid_alphabet() {
        let err = base64_decode("Zm9v!A==").unwrap_err();
        assert!(matches!(err, CodecError::InvalidBase64(_)));
    }

    #[test]
    fn test_decode_padding_before_final_group() {
        assert!(base64_decode("Zg==Zm9v").is_err());
        assert!(base64_decode("Z=g=").is_err());
    }

    #[test]
    fn test_decode_non_canonical_trailing_bits() {
        // "Zh==" carries non-zero bits after the single decoded byte
        assert!(base64_decode("Zh==").is_err());
    }

    #[test]
    fn test_whitespace_rejected_by_default() {
        assert!(base64_decode("Zm9v\nYmFy").is_err());
        assert!(base64_decode(" Zm9v").is_err());
    }

    #[test]
    fn test_whitespace_stripped_when_enabled() {
        let options = Base64Options {
            whitespace: WhitespacePolicy::Strip,
            ..Default::default()
        };
        assert_eq!(base64_decode_with("Zm9v\r\nYmFy\n", &options).unwrap(), b"foobar");
        assert_eq!(base64_decode_with("  \t\n", &options).unwrap(), b"");
    }

    #[test]
    fn test_url_safe_alphabet() {
        let options = Base64Options {
            alphabet: Base64Alphabet::UrlSafe,
            ..Default::default()
        };
        let bytes = [0xFB, 0xFF, 0xBF];
        assert_eq!(base64_encode(&bytes), "+/+/");
        assert_eq!(base64_encode_with(&bytes, &options), "-_-_");
        assert_eq!(base64_decode_with("-_-_", &options).unwrap(), bytes);
        assert!(base64_decode_with("+/+/", &options).is_err());
    }

    #[test]
    fn test_decode_text_unicode() {
        let encoded = base64_encode_text("héllo 世界");
        assert_eq!(base64_decode_text(&encoded).unwrap(), "héllo 世界");
    }

    #[test]
    fn test_decode_text_invalid_utf8() {
        // 0xFF 0xFE is valid Base64 payload but not UTF-8
        let encoded = base64_encode(&[0xFF, 0xFE]);
        let err = base64_decode_text(&encoded).unwrap_err();
        assert!(matches!(err, CodecError::InvalidUtf8(_)));
    }

    proptest! {
        #[test]
        fn prop_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let encoded = base64_encode(&bytes);
            prop_assert_eq!(encoded.len() % 4, 0);
            prop_assert_eq!(base64_decode(&encoded).unwrap(), bytes);
        }

        #[test]
        fn prop_double_encode_double_decode(text in any::<String>()) {
            let twice = base64_encode_text(&base64_encode_text(&text));
            let once = base64_decode_text(&twice).unwrap();
            prop_assert_eq!(base64_decode_text(&once).unwrap(), text);
        }

        #[test]
        fn prop_encoding_changes_non_empty_value(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
            prop_assert_ne!(base64_encode(&bytes).into_bytes(), bytes);
        }
    }
}
