use criterion::{criterion_group, criterion_main, Criterion};
use webdex::tokenizer::words;

fn synthetic_page() -> String {
    let mut body = String::new();
    for i in 0..500 {
        body.push_str(&format!(
            "<p>Paragraph {i} talks about computer science and the dartmouth campus.</p>\n"
        ));
    }
    format!("<html><head><title>Benchmark Page</title></head><body>{body}</body></html>")
}

fn bench_words(c: &mut Criterion) {
    let html = synthetic_page();
    c.bench_function("tokenize_page", |b| b.iter(|| words(&html)));
}

criterion_group!(benches, bench_words);
criterion_main!(benches);
