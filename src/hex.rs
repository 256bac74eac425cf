//! Hex codec
//!
//! Each byte becomes exactly two lowercase hex digits. Decoding accepts either
//! case but rejects odd lengths and anything outside `0-9a-fA-F`.
//!
//! ```rust
//! use text_codec_kit::hex::{hex_decode, hex_encode};
//!
//! assert_eq!(hex_encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
//! assert_eq!(hex_decode("FF").unwrap(), vec![255]);
//! assert!(hex_decode("0").is_err());
//! ```

use crate::error::CodecError;
use crate::utf8;

/// Encode bytes as lowercase hex, `2 * bytes.len()` characters long
pub fn hex_encode(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Decode a hex string (case-insensitive) into bytes
pub fn hex_decode(input: &str) -> Result<Vec<u8>, CodecError> {
    ::hex::decode(input).map_err(|e| match e {
        ::hex::FromHexError::OddLength => CodecError::InvalidHex(format!(
            "odd number of digits ({})",
            input.len()
        )),
        other => CodecError::InvalidHex(other.to_string()),
    })
}

/// Encode the UTF-8 bytes of `text` as hex
pub fn hex_encode_text(text: &str) -> String {
    hex_encode(&utf8::to_bytes(text))
}

/// Decode hex and interpret the bytes as UTF-8 text
pub fn hex_decode_text(input: &str) -> Result<String, CodecError> {
    let bytes = hex_decode(input)?;
    utf8::from_bytes(&bytes)
}

/// Decode hex and interpret the bytes in a legacy charset
///
/// `hex_decode_text_with_charset("e9", "windows-1252")` yields `"é"`,
/// matching tools that treat each byte as one character.
pub fn hex_decode_text_with_charset(input: &str, charset: &str) -> Result<String, CodecError> {
    let bytes = hex_decode(input)?;
    utf8::from_bytes_with_charset(&bytes, charset)
}
