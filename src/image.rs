//! Image bytes to `data:` URLs
//!
//! Produces `data:<mime>;base64,<payload>` strings suitable for inlining
//! images into HTML or CSS, and parses them back.

use crate::base64::{base64_decode, base64_encode};
use crate::error::CodecError;

/// Build a Base64 data URL for image bytes with a known MIME type
///
/// # Errors
///
/// Returns `CodecError::InvalidInput` when `mime` is not an `image/*` type or
/// when `bytes` is empty.
pub fn image_to_data_url(mime: &str, bytes: &[u8]) -> Result<String, CodecError> {
    let mime = mime.trim().to_ascii_lowercase();

    let subtype = mime.strip_prefix("image/").unwrap_or_default();
    if subtype.is_empty() || subtype.contains(|c: char| c.is_ascii_whitespace() || c == ',') {
        return Err(CodecError::InvalidInput(format!(
            "'{}' is not an image MIME type",
            mime
        )));
    }

    if bytes.is_empty() {
        return Err(CodecError::InvalidInput("image data is empty".to_string()));
    }

    Ok(format!("data:{};base64,{}", mime, base64_encode(bytes)))
}

/// Guess an image MIME type from leading magic bytes
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"BM", "image/bmp"),
        (b"\x00\x00\x01\x00", "image/x-icon"),
    ];

    for (magic, mime) in SIGNATURES {
        if bytes.starts_with(magic) {
            return Some(*mime);
        }
    }

    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    if looks_like_svg(bytes) {
        return Some("image/svg+xml");
    }

    None
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    // The window may split a multi-byte character
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or_default(),
    };
    svg_prefix(text)
}

fn svg_prefix(text: &str) -> bool {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("<svg") {
        return true;
    }
    trimmed.starts_with("<?xml") && trimmed.contains("<svg")
}

/// Sniff the MIME type and build a data URL
///
/// # Errors
///
/// Returns `CodecError::InvalidInput` when the bytes are not a recognized image.
pub fn bytes_to_data_url(bytes: &[u8]) -> Result<String, CodecError> {
    let mime = sniff_image_mime(bytes).ok_or_else(|| {
        CodecError::InvalidInput("unrecognized image format".to_string())
    })?;
    image_to_data_url(mime, bytes)
}

/// Split a `data:<mime>;base64,<payload>` URL into MIME type and bytes
///
/// Parameters between the MIME type and `;base64` (such as `charset=`) are
/// ignored. Non-Base64 data URLs are rejected.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), CodecError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| CodecError::InvalidInput("missing 'data:' scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CodecError::InvalidInput("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(CodecError::InvalidInput(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    let mime = if mime.is_empty() {
        "text/plain".to_string()
    } else {
        mime
    };

    Ok((mime, base64_decode(payload)?))
}
