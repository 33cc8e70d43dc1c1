use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::encode_visits;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crowd_notifier::{
    scan::{scan, MatchConfig},
    time::SECONDS_PER_HOUR,
};
use test_utils::fixtures::{Authority, START_OF_TEST_DAY};

fn scan_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let authority = Authority::new(&mut rng);
    let venue = authority.venue(&mut rng, "Stadium");
    let other_venue = authority.venue(&mut rng, "Station");
    let config = MatchConfig::default();

    // Number of stored records, one per visit, and none of them at the released venue
    let visit_count_range = [10, 50, 100];
    let visits_range = visit_count_range
        .iter()
        .map(|count| encode_visits!(rng, other_venue, *count, START_OF_TEST_DAY, 60))
        .collect::<Vec<_>>();
    let released = authority.release(
        &mut rng,
        &venue,
        START_OF_TEST_DAY,
        START_OF_TEST_DAY + 10 * SECONDS_PER_HOUR - 1,
        "Please get tested",
    );

    let mut scan_group = c.benchmark_group("Scan without match");
    for (i, count) in visit_count_range.iter().enumerate() {
        scan_group.bench_with_input(BenchmarkId::from_parameter(*count), &i, |b, &i| {
            b.iter(|| scan(black_box(&released), black_box(&visits_range[i]), &config));
        });
    }
    scan_group.finish();

    let matching = encode_visits!(rng, venue, 10, START_OF_TEST_DAY, 4 * SECONDS_PER_HOUR);
    c.bench_function("Scan 10 matching visits", |b| {
        b.iter(|| scan(black_box(&released), black_box(&matching), &config));
    });
}

criterion_group!(benches, scan_benchmark);
criterion_main!(benches);
