use criterion::{criterion_group, criterion_main, Criterion};
use enzkin::prelude::*;
use std::hint::black_box;

fn bench_nonlinear_fit(c: &mut Criterion) {
    let pairs = velocity_pairs(0.5, 2.0, &[0.5, 1.0, 2.0, 5.0, 10.0, 20.0]);
    let fitter = MichaelisMentenFitter::default();

    c.bench_function("nonlinear_fit", |b| {
        b.iter(|| fitter.fit(black_box(&pairs)).unwrap())
    });
}

fn bench_linearizations(c: &mut Criterion) {
    let pairs = velocity_pairs(0.5, 2.0, &[0.5, 1.0, 2.0, 5.0, 10.0, 20.0]);

    let mut group = c.benchmark_group("linearizations");
    for method in LinearizationMethod::ALL {
        group.bench_function(format!("{method:?}"), |b| {
            b.iter(|| {
                LinearizationFitter::new(method)
                    .fit(black_box(&pairs))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_session_pipeline(c: &mut Criterion) {
    c.bench_function("session_pipeline", |b| {
        b.iter(|| {
            let mut session = KineticsSession::default();
            session
                .load_samples(black_box(series_from_model(
                    0.5,
                    2.0,
                    &[0.5, 1.0, 2.0, 5.0, 10.0, 20.0],
                )))
                .unwrap();
            session.run().unwrap().clone()
        })
    });
}

criterion_group!(
    benches,
    bench_nonlinear_fit,
    bench_linearizations,
    bench_session_pipeline
);
criterion_main!(benches);
