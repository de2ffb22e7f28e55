use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use manytomany::similarity::{infallible_group, infallible_pairwise};
use manytomany::{group_mentors, MatchConfig, Matcher, Record, RecordTable};

fn cohort(prefix: &str, size: usize) -> RecordTable {
    RecordTable::from_records((0..size).map(|i| {
        Record::new(format!("{}{}", prefix, i))
            .with("seniority", ((i * 37) % 100) as i64)
            .with("track", ["backend", "frontend", "data"][i % 3])
    }))
    .unwrap()
}

fn seniority(record: &Record) -> f64 {
    record.get("seniority").and_then(|v| v.as_number()).unwrap_or(0.0)
}

fn mentor_distance(a: &Record, b: &Record) -> f64 {
    let track = if a.get("track") == b.get("track") { 0.0 } else { 25.0 };
    (seniority(a) - seniority(b)).abs() + track
}

fn group_distance(group: &[&Record], mentee: &Record) -> f64 {
    group
        .iter()
        .map(|m| (seniority(m) - seniority(mentee) - 10.0).abs())
        .sum()
}

/// Benchmark balanced mentor grouping
fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mentor_grouping");
    group.sample_size(10);

    for size in [30, 90, 180].iter() {
        let mentors = cohort("m", *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let groups =
                    group_mentors(&mentors, 3, infallible_pairwise(mentor_distance)).unwrap();
                criterion::black_box(groups.len());
            });
        });
    }
    group.finish();
}

/// Benchmark grouping plus two assignment rounds
fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);

    for size in [30, 90, 180].iter() {
        let mentors = cohort("m", *size);
        let mentees = cohort("e", *size);
        let matcher = Matcher::new(MatchConfig::new(3, 2));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let report = matcher
                    .run(
                        &mentors,
                        &mentees,
                        infallible_group(group_distance),
                        infallible_pairwise(mentor_distance),
                    )
                    .unwrap();
                criterion::black_box(report.by_mentee().rows.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grouping, bench_full_run);
criterion_main!(benches);
