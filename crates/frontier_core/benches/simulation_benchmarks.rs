//! Criterion benchmarks for frontier_core simulation
//!
//! Run with: cargo bench -p frontier_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use frontier_core::{
    CovarianceMatrix, MarketInputs, SimulationConfig, WeightSampling, evaluate_weights, simulate,
};

fn create_inputs(num_assets: usize) -> MarketInputs {
    let rows: Vec<Vec<f64>> = (0..num_assets)
        .map(|i| {
            (0..num_assets)
                .map(|j| {
                    let vol_i = 0.10 + 0.02 * i as f64;
                    let vol_j = 0.10 + 0.02 * j as f64;
                    let corr = if i == j { 1.0 } else { 0.25 };
                    corr * vol_i * vol_j
                })
                .collect()
        })
        .collect();
    let means = (0..num_assets).map(|i| 0.04 + 0.01 * i as f64).collect();

    MarketInputs::unnamed(means, CovarianceMatrix::from_rows(&rows).unwrap()).unwrap()
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");

    for num_assets in [2, 5, 20] {
        let inputs = create_inputs(num_assets);
        let config = SimulationConfig::new(20_000, 0.02, 42);
        group.bench_with_input(
            BenchmarkId::new("uniform_20k", num_assets),
            &inputs,
            |b, inputs| b.iter(|| simulate(black_box(inputs), black_box(&config))),
        );
    }

    let inputs = create_inputs(5);
    let config = SimulationConfig::new(20_000, 0.02, 42).with_sampling(WeightSampling::Dirichlet);
    group.bench_function("dirichlet_20k_5_assets", |b| {
        b.iter(|| simulate(black_box(&inputs), black_box(&config)))
    });

    group.finish();
}

fn bench_evaluate_weights(c: &mut Criterion) {
    let inputs = create_inputs(20);
    let weights = vec![1.0 / 20.0; 20];

    c.bench_function("evaluate_weights_20_assets", |b| {
        b.iter(|| evaluate_weights(black_box(&inputs), black_box(weights.clone()), 0.02))
    });
}

criterion_group!(benches, bench_simulate, bench_evaluate_weights);
criterion_main!(benches);
