use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyword_sniffer::{
    extract_keywords_from_text, KeywordLookup, KeywordsChief, LookupConfig, ScoringRegistry,
    StemmerRegistry,
};

const TEXT: &str = "Requests is an elegant and simple HTTP library for Python, built for human beings. \
                    It supports HTTP/1.1 connection pooling, JSON decoding and command line tooling. \
                    Use it together with Django, Flask or any other web framework, and bring \
                    machine learning models into production with Docker and Kubernetes.";

fn benchmark_extract_keywords(c: &mut Criterion) {
    let chief = KeywordsChief::default_chief().unwrap();

    c.bench_function("extract_keywords", |b| {
        b.iter(|| extract_keywords_from_text(black_box(TEXT), black_box(&chief)))
    });
}

fn benchmark_stemmed_lookup(c: &mut Criterion) {
    let config = LookupConfig {
        stemmer: Some("EnglishStemmer".to_string()),
        lemmatize: true,
        scorer: Some("RelativeUsage".to_string()),
        ..LookupConfig::default()
    };
    let lookup = KeywordLookup::new(
        &config,
        &StemmerRegistry::with_defaults(),
        &ScoringRegistry::with_defaults(),
    )
    .unwrap();

    c.bench_function("stemmed_lookup", |b| {
        b.iter(|| lookup.lookup_text(black_box(TEXT)))
    });
}

criterion_group!(benches, benchmark_extract_keywords, benchmark_stemmed_lookup);
criterion_main!(benches);
