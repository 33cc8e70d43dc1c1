use ark_std::rand::{rngs::StdRng, SeedableRng};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crowd_notifier::{
    time::SECONDS_PER_HOUR,
    visit::{encode, VisitId},
};
use test_utils::fixtures::{Authority, START_OF_TEST_DAY};

fn check_in_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let authority = Authority::new(&mut rng);
    let venue = authority.venue(&mut rng, "Concert hall");
    let id = VisitId::new(&mut rng);

    // Number of hour buckets a visit touches
    let hours_range = [1, 2, 4, 8];

    let mut encode_group = c.benchmark_group("Encode check-in");
    for hours in hours_range {
        let departure = START_OF_TEST_DAY + hours * SECONDS_PER_HOUR - 1;
        encode_group.bench_with_input(BenchmarkId::from_parameter(hours), &hours, |b, _| {
            b.iter(|| {
                encode(
                    &mut rng,
                    black_box(&venue),
                    id,
                    black_box(START_OF_TEST_DAY),
                    black_box(departure),
                )
                .unwrap()
            });
        });
    }
    encode_group.finish();

    c.bench_function("Release secret", |b| {
        b.iter(|| {
            authority.release(
                &mut rng,
                black_box(&venue),
                START_OF_TEST_DAY,
                START_OF_TEST_DAY + 10,
                "Please get tested",
            )
        });
    });
}

criterion_group!(benches, check_in_benchmark);
criterion_main!(benches);
