//! Error types for codec, formatting and conversion operations

use std::fmt;

/// Errors that can occur while decoding, formatting or converting text
///
/// Every variant carries a human-readable reason. Encoding never fails, so
/// all variants originate from decode-family operations, pattern compilation,
/// or the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Byte sequence is not valid UTF-8 (or not valid in the requested charset)
    InvalidUtf8(String),
    /// Malformed Base64: bad alphabet, bad padding, or bad length
    InvalidBase64(String),
    /// Odd-length hex or non-hex character
    InvalidHex(String),
    /// `%` not followed by two hex digits, or decoded bytes are not UTF-8
    InvalidPercentEncoding(String),
    /// `\u` not followed by four hex digits, or unpaired surrogate
    InvalidUnicodeEscape(String),
    /// Regex failed to compile, or flags are not recognized
    InvalidPattern(String),
    /// JSON document failed to parse
    InvalidJson(String),
    /// Ciphertext lacks the salt header, or the passphrase does not fit it
    DecryptionFailed(String),
    /// Invalid input data (NULL pointers, unsupported MIME type, excessive nesting)
    InvalidInput(String),
    /// Internal error
    InternalError(String),
}

impl CodecError {
    /// Get numeric error code for FFI
    pub fn code(&self) -> u32 {
        match self {
            CodecError::InvalidUtf8(_) => 1,
            CodecError::InvalidBase64(_) => 2,
            CodecError::InvalidHex(_) => 3,
            CodecError::InvalidPercentEncoding(_) => 4,
            CodecError::InvalidUnicodeEscape(_) => 5,
            CodecError::InvalidPattern(_) => 6,
            CodecError::InvalidJson(_) => 7,
            CodecError::InvalidInput(_) => 8,
            CodecError::DecryptionFailed(_) => 9,
            CodecError::InternalError(_) => 99,
        }
    }

    /// Reason text without the category prefix
    pub fn reason(&self) -> &str {
        match self {
            CodecError::InvalidUtf8(msg)
            | CodecError::InvalidBase64(msg)
            | CodecError::InvalidHex(msg)
            | CodecError::InvalidPercentEncoding(msg)
            | CodecError::InvalidUnicodeEscape(msg)
            | CodecError::InvalidPattern(msg)
            | CodecError::InvalidJson(msg)
            | CodecError::InvalidInput(msg)
            | CodecError::DecryptionFailed(msg)
            | CodecError::InternalError(msg) => msg,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidUtf8(msg) => write!(f, "Invalid UTF-8: {}", msg),
            CodecError::InvalidBase64(msg) => write!(f, "Invalid Base64: {}", msg),
            CodecError::InvalidHex(msg) => write!(f, "Invalid hex: {}", msg),
            CodecError::InvalidPercentEncoding(msg) => {
                write!(f, "Invalid percent-encoding: {}", msg)
            }
            CodecError::InvalidUnicodeEscape(msg) => write!(f, "Invalid Unicode escape: {}", msg),
            CodecError::InvalidPattern(msg) => write!(f, "Invalid pattern: {}", msg),
            CodecError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            CodecError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CodecError::DecryptionFailed(msg) => write!(f, "Decryption failed: {}", msg),
            CodecError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CodecError::InvalidHex("odd number of digits".to_string()).to_string(),
            "Invalid hex: odd number of digits"
        );
        assert_eq!(
            CodecError::InvalidPattern("unclosed group".to_string()).to_string(),
            "Invalid pattern: unclosed group"
        );
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            CodecError::InvalidUtf8(String::new()),
            CodecError::InvalidBase64(String::new()),
            CodecError::InvalidHex(String::new()),
            CodecError::InvalidPercentEncoding(String::new()),
            CodecError::InvalidUnicodeEscape(String::new()),
            CodecError::InvalidPattern(String::new()),
            CodecError::InvalidJson(String::new()),
            CodecError::InvalidInput(String::new()),
            CodecError::DecryptionFailed(String::new()),
            CodecError::InternalError(String::new()),
        ];

        let mut codes: Vec<u32> = errors.iter().map(CodecError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0), "0 is reserved for success");
    }

    #[test]
    fn test_reason_strips_prefix() {
        let err = CodecError::InvalidBase64("length 1 is not a multiple of 4".to_string());
        assert_eq!(err.reason(), "length 1 is not a multiple of 4");
    }
}
