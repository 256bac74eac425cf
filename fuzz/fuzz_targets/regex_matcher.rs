#![no_main]

use libfuzzer_sys::fuzz_target;
use text_codec_kit::matcher::find_all_matches;

// Input layout: pattern, NUL, flags, NUL, subject
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.splitn(3, '\0');
    let (Some(pattern), Some(flags), Some(subject)) = (parts.next(), parts.next(), parts.next())
    else {
        return;
    };

    let Ok(matches) = find_all_matches(pattern, flags, subject) else {
        return;
    };

    let mut last_end = 0;
    for record in &matches {
        assert!(record.start <= record.end);
        assert!(record.start >= last_end);
        assert!(subject.is_char_boundary(record.start));
        assert!(subject.is_char_boundary(record.end));
        assert_eq!(&subject[record.start..record.end], record.text);
        last_end = record.end;
    }
});
