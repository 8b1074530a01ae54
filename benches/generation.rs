use chrono::{TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use ctxfy::generator::{formatter, identifier, normalize};
use std::hint::black_box;

const REQUIREMENTS: &str = "User needs a dashboard for metrics, with an API for exporting \
    quarterly reports (CSV; JSON) and alerts when métricas cross thresholds! @team #ops";

pub fn criterion_benchmark(c: &mut Criterion) {
    let created_at = Utc
        .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid timestamp");
    let normalized = normalize::normalize(REQUIREMENTS);

    c.bench_function("normalize", |b| {
        b.iter(|| normalize::normalize(black_box(REQUIREMENTS)))
    });
    c.bench_function("derive", |b| {
        b.iter(|| {
            (
                identifier::derive_id(black_box(&normalized)),
                identifier::derive_filename(black_box(&normalized)),
            )
        })
    });
    c.bench_function("format_json", |b| {
        b.iter(|| formatter::format_at(black_box(&normalized), created_at).to_json())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
