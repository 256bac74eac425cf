//! Text Codec Kit - text transcoding, encoding and matching utilities
//!
//! A small toolkit for moving text between representations:
//!
//! - `utf8`: UTF-8 transcoding, legacy charsets, UTF-16 code units
//! - `base64`, `hex`, `percent`, `unicode_escape`: reversible text codecs
//! - `codec`: tag-based dispatch over the codecs
//! - `matcher`: regex match collection with zero-width match handling
//! - `digest`: MD5/SHA/BLAKE3 digests
//! - `cipher`: AES-256/DES passphrase encryption, OpenSSL salted format
//! - `image`: image sniffing and `data:` URLs
//! - `json_format`: JSON validation, minify and beautify
//! - `parser`, `converter`, `security`: sanitizing HTML → Markdown
//! - `renderer`: Markdown → HTML
//! - `ffi`: C-compatible entry points
//!
//! # Example
//!
//! ```
//! use text_codec_kit::{base64_encode, find_all_matches, url_encode};
//!
//! assert_eq!(base64_encode(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
//! assert_eq!(url_encode("Hello World!"), "Hello%20World!");
//!
//! let matches = find_all_matches(r"\d+", "g", "a1 b22 c333")?;
//! assert_eq!(matches.len(), 3);
//! # Ok::<(), text_codec_kit::CodecError>(())
//! ```
//!
//! # Safety
//!
//! Only the `ffi` module contains `unsafe` code. Memory it hands to C must be
//! released through `text_codec_result_free`.

pub mod base64;
pub mod cipher;
pub mod codec;
pub mod converter;
pub mod digest;
pub mod error;
pub mod ffi;
pub mod hex;
pub mod image;
pub mod json_format;
pub mod matcher;
pub mod parser;
pub mod percent;
pub mod renderer;
pub mod security;
pub mod unicode_escape;
pub mod utf8;

pub use crate::base64::{base64_decode, base64_encode};
pub use crate::codec::{CodecKind, Direction, convert};
pub use crate::converter::{MarkdownConverter, html_to_markdown};
pub use crate::error::CodecError;
pub use crate::ffi::CodecResult;
pub use crate::hex::{hex_decode, hex_encode};
pub use crate::matcher::{CompiledPattern, MatchRecord, find_all_matches};
pub use crate::parser::parse_html;
pub use crate::percent::{url_decode, url_encode};
pub use crate::renderer::markdown_to_html;
pub use crate::unicode_escape::{unicode_escape, unicode_unescape};
