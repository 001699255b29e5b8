use benchmarks::sample_trips;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use porter_fare::fare::{Corpus, EstimatorSettings, FareEstimator};

fn bench_corpus_generation(c: &mut Criterion) {
    for size in [200, 2_000, 20_000].iter() {
        c.bench_with_input(BenchmarkId::new("corpus_generate", size), size, |b, &n| {
            b.iter(|| black_box(Corpus::generate(black_box(n))));
        });
    }
}

fn bench_fit(c: &mut Criterion) {
    let corpus = Corpus::generate(200);
    let mut group = c.benchmark_group("estimator_fit");
    group.sample_size(10);

    for n_estimators in [10, 100].iter() {
        let settings = EstimatorSettings {
            n_estimators: *n_estimators,
            ..EstimatorSettings::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(n_estimators),
            &settings,
            |b, settings| {
                b.iter(|| FareEstimator::fit(black_box(&corpus), settings).expect("fit"));
            },
        );
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let estimator = FareEstimator::fit(&Corpus::generate(200), &EstimatorSettings::default())
        .expect("Failed to fit estimator");
    let trips = sample_trips(1_000);

    c.bench_function("predict_single", |b| {
        b.iter(|| black_box(estimator.predict(black_box(&trips[0])).expect("predict")));
    });

    c.bench_function("predict_1000", |b| {
        b.iter(|| {
            for trip in &trips {
                black_box(estimator.predict(trip).expect("predict"));
            }
        });
    });
}

criterion_group!(benches, bench_corpus_generation, bench_fit, bench_predict);
criterion_main!(benches);
