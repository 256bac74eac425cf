use std::hint::black_box;

use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use text_codec_kit::codec::{CodecKind, Direction, convert};
use text_codec_kit::converter::html_to_markdown;
use text_codec_kit::matcher::find_all_matches;

fn sample_text(repeat: usize) -> String {
    let mut s = String::new();
    for i in 0..repeat {
        s.push_str(&format!(
            "Line {i}: café ✓ 日本語 contact user{i}@example.com ?q=a&b=c\n"
        ));
    }
    s
}

fn sample_html(sections: usize) -> String {
    let mut s = String::from("<html><body>");
    for i in 0..sections {
        s.push_str(&format!(
            "<h2>Section {i}</h2><p>Some <strong>bold</strong> and <a href=\"/p/{i}\">link</a>.</p>\
             <ul><li>one</li><li>two</li></ul><pre><code class=\"language-rust\">let x = {i};</code></pre>"
        ));
    }
    s.push_str("</body></html>");
    s
}

fn bench_codecs(c: &mut Criterion) {
    let text = sample_text(200);

    for kind in CodecKind::ALL {
        let encoded = convert(kind, Direction::Encode, &text).expect("encode never fails");

        c.bench_function(&format!("{kind}_encode"), |b| {
            b.iter(|| convert(kind, Direction::Encode, black_box(&text)))
        });
        c.bench_function(&format!("{kind}_decode"), |b| {
            b.iter(|| convert(kind, Direction::Decode, black_box(&encoded)))
        });
    }
}

fn bench_matcher(c: &mut Criterion) {
    let text = sample_text(200);

    c.bench_function("find_all_matches_email", |b| {
        b.iter(|| find_all_matches(r"[\w.]+@[\w.]+", "g", black_box(&text)))
    });
    c.bench_function("find_all_matches_zero_width", |b| {
        b.iter(|| find_all_matches(r"\b", "g", black_box(&text)))
    });
}

fn bench_html_to_markdown(c: &mut Criterion) {
    let html = sample_html(100);

    c.bench_function("html_to_markdown", |b| {
        b.iter(|| html_to_markdown(black_box(&html)))
    });
}

criterion_group!(benches, bench_codecs, bench_matcher, bench_html_to_markdown);
criterion_main!(benches);
