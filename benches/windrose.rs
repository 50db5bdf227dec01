use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use windrose::{aggregate, HourlyRecord, CALM_THRESHOLD_KNOTS};

fn synthetic_month(years: i64) -> Vec<HourlyRecord> {
    let start = Utc.with_ymd_and_hms(2020, 8, 1, 0, 0, 0).unwrap();
    (0..years * 31 * 24)
        .map(|i| {
            HourlyRecord::new(
                start + Duration::hours(i),
                7200,
                (i % 29) as f64 * 0.85,
                (i * 37 % 360) as f64,
            )
        })
        .collect()
}

fn bench_windrose(c: &mut Criterion) {
    let start = Utc.with_ymd_and_hms(2020, 8, 1, 0, 0, 0).unwrap();
    c.bench_function("hourly_record_new", |b| {
        b.iter(|| HourlyRecord::new(black_box(start), 7200, black_box(12.3), black_box(200.0)))
    });

    let records = synthetic_month(5);
    c.bench_function("aggregate_five_years", |b| {
        b.iter(|| aggregate(black_box(&records), CALM_THRESHOLD_KNOTS))
    });
}

criterion_group!(benches, bench_windrose);
criterion_main!(benches);
