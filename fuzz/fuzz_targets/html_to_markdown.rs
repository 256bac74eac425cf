#![no_main]

use libfuzzer_sys::fuzz_target;
use text_codec_kit::parser::parse_html_bytes;
use text_codec_kit::converter::MarkdownConverter;

fuzz_target!(|data: &[u8]| {
    let Ok(dom) = parse_html_bytes(data, None) else {
        return;
    };

    let _ = MarkdownConverter::new().convert(&dom);
});
