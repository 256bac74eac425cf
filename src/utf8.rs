//! UTF-8 byte transcoding
//!
//! Leaf module converting between Unicode strings and their byte forms. The
//! Base64, hex and percent codecs use it to validate decoded bytes before
//! handing text back to the caller.
//!
//! # Examples
//!
//! ```rust
//! use text_codec_kit::utf8::{from_bytes, to_bytes};
//!
//! let bytes = to_bytes("héllo");
//! assert_eq!(bytes, b"h\xC3\xA9llo");
//! assert_eq!(from_bytes(&bytes).unwrap(), "héllo");
//!
//! // Overlong encoding of '/' is rejected
//! assert!(from_bytes(&[0xC0, 0xAF]).is_err());
//! ```

use crate::error::CodecError;

/// Encode a string as UTF-8 bytes. Byte order is preserved and no BOM is added.
pub fn to_bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decode UTF-8 bytes into a string
///
/// Fails with `CodecError::InvalidUtf8` for malformed or overlong sequences,
/// encoded surrogates (U+D800..U+DFFF), and sequences above U+10FFFF. A leading
/// BOM is kept as U+FEFF.
pub fn from_bytes(bytes: &[u8]) -> Result<String, CodecError> {
    std::str::from_utf8(bytes)
        .map(ToOwned::to_owned)
        .map_err(|e| {
            CodecError::InvalidUtf8(format!(
                "invalid byte sequence at position {}: {}",
                e.valid_up_to(),
                e
            ))
        })
}

/// Decode bytes using a WHATWG encoding label (e.g. `"windows-1252"`, `"shift_jis"`)
///
/// UTF-8 labels take the strict [`from_bytes`] path. Other labels are decoded
/// through `encoding_rs` without BOM sniffing and without U+FFFD replacement,
/// so any unmappable byte sequence is an error rather than a silent substitution.
///
/// # Errors
///
/// - `CodecError::InvalidInput` if the label is not a known encoding
/// - `CodecError::InvalidUtf8` if the bytes are invalid for the encoding
///
/// # Examples
///
/// ```rust
/// use text_codec_kit::utf8::from_bytes_with_charset;
///
/// // 0xE9 is 'é' in windows-1252 but invalid as standalone UTF-8
/// assert_eq!(from_bytes_with_charset(&[0x63, 0x61, 0x66, 0xE9], "windows-1252").unwrap(), "café");
/// assert!(from_bytes_with_charset(&[0xE9], "utf-8").is_err());
/// ```
pub fn from_bytes_with_charset(bytes: &[u8], label: &str) -> Result<String, CodecError> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("UTF-8") || label.eq_ignore_ascii_case("UTF8") {
        return from_bytes(bytes);
    }

    let encoding = encoding_rs::Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        CodecError::InvalidInput(format!("unsupported charset '{}'", label))
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            CodecError::InvalidUtf8(format!(
                "invalid byte sequence for charset '{}'",
                encoding.name()
            ))
        })
}

/// Split a string into UTF-16 code units
pub fn to_utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Join UTF-16 code units into a string, rejecting unpaired surrogates
pub fn from_utf16(units: &[u16]) -> Result<String, CodecError> {
    String::from_utf16(units).map_err(|_| {
        let position = char::decode_utf16(units.iter().copied())
            .position(|unit| unit.is_err())
            .unwrap_or(0);
        CodecError::InvalidUnicodeEscape(format!(
            "unpaired surrogate at UTF-16 position {}",
            position
        ))
    })
}
