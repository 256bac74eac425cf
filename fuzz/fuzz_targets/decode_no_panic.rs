#![no_main]

use libfuzzer_sys::fuzz_target;
use text_codec_kit::codec::{CodecKind, Direction, convert};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for kind in CodecKind::ALL {
        let _ = convert(kind, Direction::Decode, text);

        let encoded = convert(kind, Direction::Encode, text).expect("encoding is infallible");
        let decoded = convert(kind, Direction::Decode, &encoded).expect("encoded text decodes");
        assert_eq!(decoded, text, "{kind} round trip");
    }
});
