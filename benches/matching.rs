//! Benchmarks for serial matching and tag sequencing.
//!
//! Both run once per candidate record, so a brand-wide monitor search (up to
//! 500 records) multiplies their cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sniper::matching::{clean_model_name, model_name_matches, serials_match};
use sniper::tagging::NamingPattern;

fn bench_serials_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("serials_match");
    for (name, a, b) in [
        ("identical", "3CM2233B068", "3CM2233B068"),
        ("padding", "3CM2233B68", "3CM2233B068"),
        ("different", "CN41111111", "CN42222222"),
        ("segment_count", "ABC123", "ABC12X3"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(a, b), |bench, (a, b)| {
            bench.iter(|| serials_match(black_box(a), black_box(b)))
        });
    }
    group.finish();
}

fn bench_candidate_scan(c: &mut Criterion) {
    let serials: Vec<String> = (0..500).map(|i| format!("3CM22{:04}B{:03}", i, i % 97)).collect();
    c.bench_function("scan_500_candidates", |b| {
        b.iter(|| {
            serials
                .iter()
                .find(|s| serials_match(s, black_box("3CM220499B14")))
                .is_some()
        })
    });
}

fn bench_model_names(c: &mut Criterion) {
    c.bench_function("clean_and_match_model", |b| {
        b.iter(|| {
            let clean = clean_model_name(black_box("Philips"), black_box("PHL 275V8"));
            model_name_matches(&clean, black_box("Philips 275V8"))
        })
    });
}

fn bench_next_tag(c: &mut Criterion) {
    let pattern = NamingPattern::parse("IT-N").unwrap();
    let mut group = c.benchmark_group("next_tag");
    for count in [10usize, 100, 500] {
        let existing: Vec<String> = (1..=count).map(|i| format!("IT-{:04}", i)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &existing, |b, existing| {
            b.iter(|| pattern.next_tag(black_box(existing)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_serials_match,
    bench_candidate_scan,
    bench_model_names,
    bench_next_tag
);
criterion_main!(benches);
