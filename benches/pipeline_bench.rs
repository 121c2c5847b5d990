use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glossa::{get_profile, segment, tokenize, Pipeline, Term, TermStatus, VocabularySnapshot};
use std::sync::Arc;

const PARAGRAPH: &str = "Mr. Brown looked up the word in the dictionary. \
He was in the U.S.A. at 3.14 p.m. and did not know it! \"Is it late?\" she asked. \
Nobody answered; the clock kept ticking: tick, tock.\n";

fn corpus(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn english_pipeline() -> Pipeline {
    let english = get_profile("en").expect("built-in profile");
    let mut terms = vec![
        Term::new(1, "en", "look up", TermStatus::Level3),
        Term::new(2, "en", "looked up", TermStatus::Level2),
        Term::new(3, "en", "the clock", TermStatus::Level1),
        Term::new(4, "en", "did not know", TermStatus::Level4),
    ];
    // Pad the snapshot to a realistic key count
    terms.extend((0..5_000u64).map(|i| Term::new(100 + i, "en", &format!("filler{i}"), TermStatus::Level1)));
    let snapshot = VocabularySnapshot::for_profile(terms, &english);
    Pipeline::new(english, Arc::new(snapshot))
}

fn bench_segmentation(c: &mut Criterion) {
    let english = get_profile("en").expect("built-in profile");
    let mut group = c.benchmark_group("segmentation");

    for paragraphs in [10, 100, 1_000] {
        let text = corpus(paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("segment", paragraphs), &text, |b, text| {
            b.iter(|| black_box(segment(text, &english)))
        });
    }
    group.finish();
}

fn bench_tokenization(c: &mut Criterion) {
    let english = get_profile("en").expect("built-in profile");
    let japanese = get_profile("ja").expect("built-in profile");
    let english_text = corpus(100);
    let japanese_text = "私は日本語を勉強します。毎日、練習！".repeat(200);

    let mut group = c.benchmark_group("tokenization");
    group.throughput(Throughput::Bytes(english_text.len() as u64));
    group.bench_function("english", |b| b.iter(|| black_box(tokenize(&english_text, &english))));
    group.throughput(Throughput::Bytes(japanese_text.len() as u64));
    group.bench_function("japanese_per_char", |b| {
        b.iter(|| black_box(tokenize(&japanese_text, &japanese)))
    });
    group.finish();
}

fn bench_reading_view(c: &mut Criterion) {
    let pipeline = english_pipeline();
    let text = corpus(200);

    let mut group = c.benchmark_group("reading_view");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("read_text", |b| b.iter(|| black_box(pipeline.read_text(&text))));

    let view = pipeline.read_text(&text);
    group.bench_function("encode_annotation", |b| b.iter(|| black_box(view.annotation())));
    let document = view.annotation().to_string();
    group.bench_function("decode_annotation", |b| {
        b.iter(|| black_box(glossa::decode_annotation(&document, &view.sentences)))
    });
    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_tokenization, bench_reading_view);
criterion_main!(benches);
