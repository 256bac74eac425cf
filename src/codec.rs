//! Text-level codec dispatch
//!
//! Selects a codec and direction at runtime, as needed by the FFI layer and
//! by hosts that expose the codecs behind a single "encode/decode" switch.
//! Base64 and hex work on the UTF-8 bytes of the input text and decode back
//! to UTF-8 text.

use std::fmt;
use std::str::FromStr;

use crate::base64::{self, Base64Options};
use crate::error::CodecError;
use crate::{hex, percent, unicode_escape};

/// The codecs available through [`convert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Base64,
    Hex,
    Url,
    UnicodeEscape,
}

impl CodecKind {
    /// All codecs in a stable order
    pub const ALL: [CodecKind; 4] = [
        CodecKind::Base64,
        CodecKind::Hex,
        CodecKind::Url,
        CodecKind::UnicodeEscape,
    ];

    /// Canonical tag, accepted back by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Base64 => "base64",
            CodecKind::Hex => "hex",
            CodecKind::Url => "url",
            CodecKind::UnicodeEscape => "unicode",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(CodecKind::Base64),
            "hex" => Ok(CodecKind::Hex),
            "url" | "percent" => Ok(CodecKind::Url),
            "unicode" | "unicode-escape" => Ok(CodecKind::UnicodeEscape),
            _ => Err(CodecError::InvalidInput(format!("unknown codec '{}'", s))),
        }
    }
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encode,
    Decode,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encode" => Ok(Direction::Encode),
            "decode" => Ok(Direction::Decode),
            _ => Err(CodecError::InvalidInput(format!("unknown direction '{}'", s))),
        }
    }
}

/// Per-codec options for [`convert_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecOptions {
    /// Base64 alphabet and whitespace handling
    pub base64: Base64Options,
}

/// Convert `input` with default options
pub fn convert(kind: CodecKind, direction: Direction, input: &str) -> Result<String, CodecError> {
    convert_with_options(kind, direction, input, &CodecOptions::default())
}

/// Convert `input` with the given codec, direction and options
///
/// Encoding never fails. Decoding returns the codec's error variant.
pub fn convert_with_options(
    kind: CodecKind,
    direction: Direction,
    input: &str,
    options: &CodecOptions,
) -> Result<String, CodecError> {
    let result = match (kind, direction) {
        (CodecKind::Base64, Direction::Encode) => Ok(base64::base64_encode_with(
            input.as_bytes(),
            &options.base64,
        )),
        (CodecKind::Base64, Direction::Decode) => {
            base64::base64_decode_text_with(input, &options.base64)
        }
        (CodecKind::Hex, Direction::Encode) => Ok(hex::hex_encode_text(input)),
        (CodecKind::Hex, Direction::Decode) => hex::hex_decode_text(input),
        (CodecKind::Url, Direction::Encode) => Ok(percent::url_encode(input)),
        (CodecKind::Url, Direction::Decode) => percent::url_decode(input),
        (CodecKind::UnicodeEscape, Direction::Encode) => Ok(unicode_escape::unicode_escape(input)),
        (CodecKind::UnicodeEscape, Direction::Decode) => unicode_escape::unicode_unescape(input),
    };

    if let Err(ref err) = result {
        tracing::debug!(codec = %kind, input_len = input.len(), %err, "decode failed");
    }

    result
}
