// Criterion benchmarks for orthophon-ortho.
//
// Run:
//   cargo bench -p orthophon-ortho

use criterion::{Criterion, criterion_group, criterion_main};
use orthophon_ortho::languages::{GOTHIC_TOML, gothic};
use orthophon_ortho::parse_language_toml;

const WORDS: &[&str] = &[
    "drigkan", "tuggo", "giban", "hlaifs", "wisan", "þata", "hwas", "leik", "hatiz", "qiman",
    "saiso", "hunds", "siuns", "namo", "atta", "unsar", "þu", "in", "himinam", "weihnai",
];

/// Load and compile the bundled definition.
fn bench_parse_language(c: &mut Criterion) {
    c.bench_function("parse_gothic_toml", |b| {
        b.iter(|| std::hint::black_box(parse_language_toml(GOTHIC_TOML)));
    });
}

/// Tokenize only, no rules.
fn bench_tokenize(c: &mut Criterion) {
    let lang = gothic();
    c.bench_function("tokenize_20_words", |b| {
        b.iter(|| {
            for word in WORDS {
                std::hint::black_box(lang.tokenize(word).ok());
            }
        });
    });
}

/// Full pipeline over the word list, one call per word.
fn bench_transcribe_words(c: &mut Criterion) {
    let lang = gothic();
    c.bench_function("transcribe_20_words", |b| {
        b.iter(|| {
            for word in WORDS {
                std::hint::black_box(lang.transcribe(word).ok());
            }
        });
    });
}

/// Full pipeline over one long text.
fn bench_transcribe_text(c: &mut Criterion) {
    let lang = gothic();
    let text = WORDS.repeat(25).join(" ");
    c.bench_function("transcribe_500_word_text", |b| {
        b.iter(|| std::hint::black_box(lang.transcribe(&text).ok()));
    });
}

criterion_group!(
    benches,
    bench_parse_language,
    bench_tokenize,
    bench_transcribe_words,
    bench_transcribe_text,
);
criterion_main!(benches);
