//! FFI (Foreign Function Interface) layer for C integration
//!
//! Exposes the text codecs, passphrase encryption, the regex match collector
//! and HTML → Markdown conversion to C callers.
//!
//! # String Representation
//!
//! **All strings use UTF-8 bytes + length (NOT NUL-terminated C strings).**
//!
//! Inputs are passed as `(pointer, length)` pairs; a NULL pointer is allowed
//! only together with length 0. Outputs are written to a [`CodecResult`]
//! whose `_len` fields hold exact byte counts. C code must never call
//! `strlen()` on result pointers.
//!
//! ```c
//! codec_result_t result;
//! text_codec_convert(TEXT_CODEC_BASE64, TEXT_CODEC_ENCODE,
//!                    (const uint8_t *)"Hi", 2, 0, &result);
//! if (result.error_code == 0) {
//!     fwrite(result.output, 1, result.output_len, stdout);   /* SGk= */
//! }
//! text_codec_result_free(&result);
//! ```
//!
//! # Memory Management
//!
//! - Rust allocates every output buffer as a `Box<[u8]>`
//! - C must release a result with `text_codec_result_free()`, never `free()`
//! - Freeing is idempotent; freed pointers are reset to NULL
//!
//! # Error Contract
//!
//! On success `error_code == 0` and the error fields are NULL/0. On failure
//! `error_code` is one of the `ERROR_*` constants, `error_message` holds a
//! UTF-8 description, and `output` is NULL. An empty successful output
//! (such as encoding an empty string) is reported with a NULL `output` and
//! `output_len == 0`.
//!
//! # Panic Safety
//!
//! Every entry point runs inside `catch_unwind`; a panic is reported as
//! `ERROR_INTERNAL` and never unwinds into C.
//!
//! # Thread Safety
//!
//! All entry points are stateless and may be called concurrently, provided
//! each call uses its own `CodecResult`.

use std::panic;
use std::ptr;
use std::slice;

use crate::base64::{Base64Options, WhitespacePolicy};
use crate::cipher::{CipherAlgorithm, decrypt_text, encrypt_text};
use crate::codec::{CodecKind, CodecOptions, Direction, convert_with_options};
use crate::converter::html_to_markdown;
use crate::error::CodecError;
use crate::matcher::find_all_matches;

// ============================================================================
// Error Code Constants
// ============================================================================

/// Success - no error occurred
pub const ERROR_SUCCESS: u32 = 0;

/// Bytes are not valid UTF-8
pub const ERROR_INVALID_UTF8: u32 = 1;

/// Malformed Base64 input
pub const ERROR_INVALID_BASE64: u32 = 2;

/// Malformed hex input
pub const ERROR_INVALID_HEX: u32 = 3;

/// Malformed percent-encoding
pub const ERROR_INVALID_PERCENT_ENCODING: u32 = 4;

/// Malformed `\uXXXX` escape or unpaired surrogate
pub const ERROR_INVALID_UNICODE_ESCAPE: u32 = 5;

/// Regex pattern or flags rejected
pub const ERROR_INVALID_PATTERN: u32 = 6;

/// JSON document rejected
pub const ERROR_INVALID_JSON: u32 = 7;

/// Invalid input data (NULL pointers, unknown codec or direction)
pub const ERROR_INVALID_INPUT: u32 = 8;

/// Ciphertext header missing, wrong passphrase, or plaintext not UTF-8
pub const ERROR_DECRYPTION_FAILED: u32 = 9;

/// Internal error (unexpected condition, panic caught)
pub const ERROR_INTERNAL: u32 = 99;

// ============================================================================
// Selector Constants
// ============================================================================

pub const TEXT_CODEC_BASE64: u32 = 0;
pub const TEXT_CODEC_HEX: u32 = 1;
pub const TEXT_CODEC_URL: u32 = 2;
pub const TEXT_CODEC_UNICODE_ESCAPE: u32 = 3;

pub const TEXT_CODEC_ENCODE: u32 = 0;
pub const TEXT_CODEC_DECODE: u32 = 1;

pub const TEXT_CODEC_CIPHER_AES: u32 = 0;
pub const TEXT_CODEC_CIPHER_DES: u32 = 1;

// ============================================================================
// FFI Data Structures
// ============================================================================

/// Result of an FFI call
///
/// **Success state (`error_code == 0`):**
/// - `output` points to `output_len` UTF-8 bytes (NULL when empty)
/// - `error_message` is NULL, `error_len` is 0
///
/// **Error state (`error_code != 0`):**
/// - `output` is NULL, `output_len` is 0
/// - `error_message` points to `error_len` UTF-8 bytes
///
/// The caller owns the struct itself; Rust owns the buffers it points to
/// until `text_codec_result_free()` is called.
#[repr(C)]
#[derive(Debug)]
pub struct CodecResult {
    /// Output text (UTF-8 bytes, NOT NUL-terminated)
    pub output: *mut u8,
    /// Length of output in bytes
    pub output_len: usize,
    /// Error code: 0=success, non-zero=error (see ERROR_* constants)
    pub error_code: u32,
    /// Error message (UTF-8 bytes, NULL on success)
    pub error_message: *mut u8,
    /// Length of error message in bytes
    pub error_len: usize,
}

impl CodecResult {
    /// An empty result, suitable for initializing storage before a call
    pub const fn empty() -> Self {
        Self {
            output: ptr::null_mut(),
            output_len: 0,
            error_code: ERROR_SUCCESS,
            error_message: ptr::null_mut(),
            error_len: 0,
        }
    }
}

impl Default for CodecResult {
    fn default() -> Self {
        Self::empty()
    }
}

fn reset_result(result: &mut CodecResult) {
    *result = CodecResult::empty();
}

fn set_error_result(result: &mut CodecResult, error_code: u32, error_message: String) {
    let error_bytes = error_message.into_bytes().into_boxed_slice();
    result.error_code = error_code;
    result.error_len = error_bytes.len();
    result.error_message = Box::into_raw(error_bytes) as *mut u8;
}

fn set_success_result(result: &mut CodecResult, output: String) {
    result.error_code = ERROR_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;

    if output.is_empty() {
        result.output = ptr::null_mut();
        result.output_len = 0;
        return;
    }

    let output_bytes = output.into_bytes().into_boxed_slice();
    result.output_len = output_bytes.len();
    result.output = Box::into_raw(output_bytes) as *mut u8;
}

fn required_utf8<'a>(ptr: *const u8, len: usize, name: &str) -> Result<&'a str, CodecError> {
    if len == 0 {
        return Ok("");
    }

    if ptr.is_null() {
        return Err(CodecError::InvalidInput(format!(
            "{name}_len > 0 with NULL {name} pointer"
        )));
    }

    // SAFETY: Pointer is non-NULL and caller guarantees `len` readable bytes
    // for the duration of this call.
    let bytes = unsafe { slice::from_raw_parts(ptr, len) };

    std::str::from_utf8(bytes).map_err(|e| {
        CodecError::InvalidUtf8(format!(
            "{name} is not valid UTF-8 at byte {}",
            e.valid_up_to()
        ))
    })
}

fn codec_kind(codec: u32) -> Result<CodecKind, CodecError> {
    match codec {
        TEXT_CODEC_BASE64 => Ok(CodecKind::Base64),
        TEXT_CODEC_HEX => Ok(CodecKind::Hex),
        TEXT_CODEC_URL => Ok(CodecKind::Url),
        TEXT_CODEC_UNICODE_ESCAPE => Ok(CodecKind::UnicodeEscape),
        other => Err(CodecError::InvalidInput(format!("unknown codec selector {other}"))),
    }
}

fn cipher_algorithm(cipher: u32) -> Result<CipherAlgorithm, CodecError> {
    match cipher {
        TEXT_CODEC_CIPHER_AES => Ok(CipherAlgorithm::Aes256),
        TEXT_CODEC_CIPHER_DES => Ok(CipherAlgorithm::Des),
        other => Err(CodecError::InvalidInput(format!("unknown cipher selector {other}"))),
    }
}

fn direction(direction: u32) -> Result<Direction, CodecError> {
    match direction {
        TEXT_CODEC_ENCODE => Ok(Direction::Encode),
        TEXT_CODEC_DECODE => Ok(Direction::Decode),
        other => Err(CodecError::InvalidInput(format!(
            "unknown direction selector {other}"
        ))),
    }
}

/// Run `operation` behind the result contract shared by every entry point
///
/// # Safety
///
/// `result` must be NULL or point to a writable `CodecResult`.
unsafe fn run_into_result<F>(result: *mut CodecResult, operation_name: &str, operation: F)
where
    F: FnOnce() -> Result<String, CodecError> + panic::UnwindSafe,
{
    if result.is_null() {
        // Cannot report anything without somewhere to write it
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    reset_result(result_ref);

    match panic::catch_unwind(operation) {
        Ok(Ok(output)) => set_success_result(result_ref, output),
        Ok(Err(e)) => {
            tracing::debug!(operation = operation_name, code = e.code(), %e, "FFI call failed");
            set_error_result(result_ref, e.code(), e.to_string());
        }
        Err(_) => {
            tracing::warn!(operation = operation_name, "panic caught at FFI boundary");
            set_error_result(
                result_ref,
                ERROR_INTERNAL,
                format!("Internal panic during {operation_name}"),
            );
        }
    }
}

fn free_buffer(ptr_field: &mut *mut u8, len_field: &mut usize) {
    if (*ptr_field).is_null() {
        return;
    }

    let raw = ptr::slice_from_raw_parts_mut(*ptr_field, *len_field);
    // SAFETY: `raw` was allocated by `Box<[u8]>` via `Box::into_raw`.
    let _ = unsafe { Box::from_raw(raw) };
    *ptr_field = ptr::null_mut();
    *len_field = 0;
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Encode or decode text with one of the codecs
///
/// * `codec` - `TEXT_CODEC_BASE64`, `TEXT_CODEC_HEX`, `TEXT_CODEC_URL` or
///   `TEXT_CODEC_UNICODE_ESCAPE`
/// * `direction` - `TEXT_CODEC_ENCODE` or `TEXT_CODEC_DECODE`
/// * `input`, `input_len` - UTF-8 input text
/// * `strip_whitespace` - non-zero to drop whitespace before Base64 decoding
/// * `result` - written on return
///
/// # Safety
///
/// - `input` must point to `input_len` readable bytes (or be NULL with length 0)
/// - `result` must be NULL or point to a writable `CodecResult`
/// - A previous result stored in `*result` must already have been freed
#[unsafe(no_mangle)]
pub unsafe extern "C" fn text_codec_convert(
    codec: u32,
    direction_selector: u32,
    input: *const u8,
    input_len: usize,
    strip_whitespace: u8,
    result: *mut CodecResult,
) {
    let operation = move || {
        let kind = codec_kind(codec)?;
        let direction = direction(direction_selector)?;
        let text = required_utf8(input, input_len, "input")?;

        let options = CodecOptions {
            base64: Base64Options {
                whitespace: if strip_whitespace != 0 {
                    WhitespacePolicy::Strip
                } else {
                    WhitespacePolicy::Reject
                },
                ..Default::default()
            },
        };

        convert_with_options(kind, direction, text, &options)
    };

    // SAFETY: forwarded from this function's contract.
    unsafe { run_into_result(result, "codec conversion", operation) };
}

/// Encrypt or decrypt text under a passphrase
///
/// Encryption output is Base64 in the OpenSSL `enc` salted format with a
/// fresh random salt, so two calls with the same input differ. Decryption
/// accepts that format (line breaks allowed) and fails with
/// `ERROR_DECRYPTION_FAILED` on a wrong passphrase.
///
/// * `cipher` - `TEXT_CODEC_CIPHER_AES` or `TEXT_CODEC_CIPHER_DES`
/// * `direction` - `TEXT_CODEC_ENCODE` to encrypt, `TEXT_CODEC_DECODE` to decrypt
///
/// # Safety
///
/// Every `(pointer, length)` pair must describe readable memory (or be NULL
/// with length 0), and `result` must be NULL or point to a writable
/// `CodecResult` that holds no unfreed buffers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn text_codec_cipher(
    cipher: u32,
    direction_selector: u32,
    input: *const u8,
    input_len: usize,
    passphrase: *const u8,
    passphrase_len: usize,
    result: *mut CodecResult,
) {
    let operation = move || {
        let algorithm = cipher_algorithm(cipher)?;
        let direction = direction(direction_selector)?;
        let text = required_utf8(input, input_len, "input")?;
        let passphrase = required_utf8(passphrase, passphrase_len, "passphrase")?;

        match direction {
            Direction::Encode => Ok(encrypt_text(algorithm, text, passphrase)),
            Direction::Decode => decrypt_text(algorithm, text, passphrase),
        }
    };

    // SAFETY: forwarded from this function's contract.
    unsafe { run_into_result(result, "cipher", operation) };
}

/// Collect regex matches, returned as a JSON array of match records
///
/// Each record has the shape
/// `{"text": str, "start": int, "end": int, "utf16_start": int, "utf16_end": int, "groups": [{"name": str|null, "value": str|null, "start": int|null}]}`
/// where `start`/`end` are byte offsets into the subject and the `utf16_`
/// fields are UTF-16 code-unit indices.
///
/// # Safety
///
/// Every `(pointer, length)` pair must describe readable memory (or be NULL
/// with length 0), and `result` must be NULL or point to a writable
/// `CodecResult` that holds no unfreed buffers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn text_codec_find_matches(
    pattern: *const u8,
    pattern_len: usize,
    flags: *const u8,
    flags_len: usize,
    subject: *const u8,
    subject_len: usize,
    result: *mut CodecResult,
) {
    let operation = move || {
        let pattern = required_utf8(pattern, pattern_len, "pattern")?;
        let flags = required_utf8(flags, flags_len, "flags")?;
        let subject = required_utf8(subject, subject_len, "subject")?;

        let matches = find_all_matches(pattern, flags, subject)?;
        serde_json::to_string(&matches).map_err(|e| CodecError::InternalError(e.to_string()))
    };

    // SAFETY: forwarded from this function's contract.
    unsafe { run_into_result(result, "match collection", operation) };
}

/// Convert UTF-8 HTML to Markdown
///
/// # Safety
///
/// `html` must point to `html_len` readable bytes (or be NULL with length 0),
/// and `result` must be NULL or point to a writable `CodecResult` that holds
/// no unfreed buffers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn text_codec_html_to_markdown(
    html: *const u8,
    html_len: usize,
    result: *mut CodecResult,
) {
    let operation = move || {
        let html = required_utf8(html, html_len, "html")?;
        html_to_markdown(html)
    };

    // SAFETY: forwarded from this function's contract.
    unsafe { run_into_result(result, "HTML conversion", operation) };
}

/// Release the buffers held by a result
///
/// Safe to call repeatedly and on a result that holds no buffers.
///
/// # Safety
///
/// `result` must be NULL or point to a `CodecResult` filled by this library.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn text_codec_result_free(result: *mut CodecResult) {
    if result.is_null() {
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    free_buffer(&mut result_ref.output, &mut result_ref.output_len);
    // error_message is a length-delimited byte buffer, not a CString
    free_buffer(&mut result_ref.error_message, &mut result_ref.error_len);
    result_ref.error_code = ERROR_SUCCESS;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_str(result: &CodecResult) -> &str {
        if result.output.is_null() {
            return "";
        }
        // SAFETY: test-only view of a buffer produced by this module.
        let bytes = unsafe { slice::from_raw_parts(result.output, result.output_len) };
        std::str::from_utf8(bytes).expect("output is UTF-8")
    }

    #[test]
    fn test_error_codes_match_error_enum() {
        assert_eq!(CodecError::InvalidUtf8(String::new()).code(), ERROR_INVALID_UTF8);
        assert_eq!(CodecError::InvalidBase64(String::new()).code(), ERROR_INVALID_BASE64);
        assert_eq!(CodecError::InvalidHex(String::new()).code(), ERROR_INVALID_HEX);
        assert_eq!(
            CodecError::InvalidPercentEncoding(String::new()).code(),
            ERROR_INVALID_PERCENT_ENCODING
        );
        assert_eq!(
            CodecError::InvalidUnicodeEscape(String::new()).code(),
            ERROR_INVALID_UNICODE_ESCAPE
        );
        assert_eq!(CodecError::InvalidPattern(String::new()).code(), ERROR_INVALID_PATTERN);
        assert_eq!(CodecError::InvalidJson(String::new()).code(), ERROR_INVALID_JSON);
        assert_eq!(CodecError::InvalidInput(String::new()).code(), ERROR_INVALID_INPUT);
        assert_eq!(
            CodecError::DecryptionFailed(String::new()).code(),
            ERROR_DECRYPTION_FAILED
        );
        assert_eq!(CodecError::InternalError(String::new()).code(), ERROR_INTERNAL);
    }

    #[test]
    fn test_reset_and_free_are_consistent() {
        let mut result = CodecResult::empty();
        set_success_result(&mut result, "abc".to_string());
        assert_eq!(output_str(&result), "abc");

        unsafe { text_codec_result_free(&mut result) };
        assert!(result.output.is_null());
        assert_eq!(result.output_len, 0);

        set_error_result(&mut result, ERROR_INVALID_HEX, "bad".to_string());
        unsafe { text_codec_result_free(&mut result) };
        assert!(result.error_message.is_null());
        assert_eq!(result.error_code, ERROR_SUCCESS);
    }

    #[test]
    fn test_panic_is_reported_as_internal_error() {
        let mut result = CodecResult::empty();
        unsafe {
            run_into_result(&mut result, "test", || -> Result<String, CodecError> {
                panic!("boom")
            })
        };
        assert_eq!(result.error_code, ERROR_INTERNAL);
        assert!(result.output.is_null());
        assert!(result.error_len > 0);
        unsafe { text_codec_result_free(&mut result) };
    }

    #[test]
    fn test_unknown_selectors() {
        assert!(matches!(codec_kind(7), Err(CodecError::InvalidInput(_))));
        assert!(matches!(direction(2), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn test_required_utf8() {
        assert_eq!(required_utf8(ptr::null(), 0, "input").unwrap(), "");
        assert!(matches!(
            required_utf8(ptr::null(), 3, "input"),
            Err(CodecError::InvalidInput(_))
        ));
        let bad = [0xffu8, 0xfe];
        assert!(matches!(
            required_utf8(bad.as_ptr(), bad.len(), "input"),
            Err(CodecError::InvalidUtf8(_))
        ));
    }
}
