//! End-to-end behavior of the text codecs
//!
//! Covers the documented boundary cases, the reference scenarios and the
//! round-trip laws for every codec through both the direct functions and the
//! tag-based dispatcher.

use proptest::prelude::*;
use text_codec_kit::codec::{CodecKind, Direction, convert};
use text_codec_kit::{
    CodecError, base64_decode, base64_encode, hex_decode, hex_encode, unicode_escape,
    unicode_unescape, url_decode, url_encode,
};

#[test]
fn test_reference_scenarios() {
    assert_eq!(base64_encode("Hello, World!".as_bytes()), "SGVsbG8sIFdvcmxkIQ==");
    assert_eq!(url_encode("Hello World!"), "Hello%20World!");
    assert_eq!(hex_encode("Hi".as_bytes()), "4869");
    assert_eq!(unicode_escape("é"), "\\u00e9");
}

#[test]
fn test_base64_boundaries() {
    assert_eq!(base64_decode("").expect("empty input is valid"), Vec::<u8>::new());
    assert!(matches!(base64_decode("A"), Err(CodecError::InvalidBase64(_))));
    assert!(matches!(base64_decode("SGVsbG8"), Err(CodecError::InvalidBase64(_))));
    assert!(matches!(base64_decode("SGV*bG8="), Err(CodecError::InvalidBase64(_))));
}

#[test]
fn test_hex_boundaries() {
    assert!(matches!(hex_decode("0"), Err(CodecError::InvalidHex(_))));
    assert!(matches!(hex_decode("zz"), Err(CodecError::InvalidHex(_))));
    assert_eq!(hex_decode("FF").expect("valid hex"), vec![255]);
    assert_eq!(hex_decode("").expect("empty hex"), Vec::<u8>::new());
}

#[test]
fn test_url_boundaries() {
    assert_eq!(url_decode("a+b").expect("plus is literal"), "a+b");
    assert!(matches!(url_decode("%zz"), Err(CodecError::InvalidPercentEncoding(_))));
    assert!(matches!(url_decode("%ff"), Err(CodecError::InvalidPercentEncoding(_))));
    assert_eq!(url_encode("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
}

#[test]
fn test_unicode_escape_surrogate_pairs() {
    assert_eq!(unicode_escape("😀"), "\\ud83d\\ude00");
    assert_eq!(unicode_unescape("\\uD83D\\uDE00").expect("valid pair"), "😀");
    assert!(matches!(
        unicode_unescape("\\ud83d"),
        Err(CodecError::InvalidUnicodeEscape(_))
    ));
    assert_eq!(unicode_unescape("plain text").expect("no escapes"), "plain text");
}

#[test]
fn test_dispatch_matches_direct_functions() {
    let text = "Grüße, 世界! a+b=c";

    assert_eq!(
        convert(CodecKind::Base64, Direction::Encode, text).unwrap(),
        base64_encode(text.as_bytes())
    );
    assert_eq!(
        convert(CodecKind::Hex, Direction::Encode, text).unwrap(),
        hex_encode(text.as_bytes())
    );
    assert_eq!(convert(CodecKind::Url, Direction::Encode, text).unwrap(), url_encode(text));
    assert_eq!(
        convert(CodecKind::UnicodeEscape, Direction::Encode, text).unwrap(),
        unicode_escape(text)
    );
}

#[test]
fn test_decode_to_invalid_utf8_text_fails() {
    // Valid Base64 and hex, but the bytes are not UTF-8 text
    assert!(matches!(
        convert(CodecKind::Base64, Direction::Decode, "/w=="),
        Err(CodecError::InvalidUtf8(_))
    ));
    assert!(matches!(
        convert(CodecKind::Hex, Direction::Decode, "ff"),
        Err(CodecError::InvalidUtf8(_))
    ));
}

proptest! {
    #[test]
    fn prop_base64_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(base64_decode(&base64_encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn prop_hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = hex_encode(&bytes);
        prop_assert_eq!(encoded.len(), bytes.len() * 2);
        prop_assert_eq!(hex_decode(&encoded).unwrap(), bytes);
        prop_assert_eq!(hex_decode(&encoded.to_uppercase()).unwrap(), hex_decode(&encoded).unwrap());
    }

    #[test]
    fn prop_text_round_trip(text in "\\PC{0,64}") {
        prop_assert_eq!(url_decode(&url_encode(&text)).unwrap(), text.clone());
        prop_assert_eq!(unicode_unescape(&unicode_escape(&text)).unwrap(), text);
    }

    #[test]
    fn prop_double_encode_double_decode(
        text in "\\PC{1,32}",
        kind in prop::sample::select(CodecKind::ALL.to_vec()),
    ) {
        let once = convert(kind, Direction::Encode, &text).unwrap();
        let twice = convert(kind, Direction::Encode, &once).unwrap();

        let back = convert(kind, Direction::Decode, &twice).unwrap();
        prop_assert_eq!(&back, &once);
        prop_assert_eq!(convert(kind, Direction::Decode, &back).unwrap(), text);
    }
}
