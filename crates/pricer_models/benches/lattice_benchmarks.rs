//! Criterion benchmarks for the lattice engines.
//!
//! The rollback cost is O(N²) in the step count; these benches track both
//! engines across the step counts the service typically runs with.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::{ExerciseStyle, LatticeSpec, MarketParams, OptionType};
use pricer_models::lattice::{binomial, trinomial};

fn standard_params() -> MarketParams {
    MarketParams::new(100.0, 100.0, 1.0, 0.02, 0.20, 0.0).unwrap()
}

fn bench_binomial_price(c: &mut Criterion) {
    let params = standard_params();
    let mut group = c.benchmark_group("binomial_price");

    for steps in [100_usize, 250, 500, 1000] {
        let spec =
            LatticeSpec::new(params, steps, OptionType::Put, ExerciseStyle::American).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(steps), &spec, |b, spec| {
            b.iter(|| binomial::price(black_box(spec)))
        });
    }

    group.finish();
}

fn bench_trinomial_price(c: &mut Criterion) {
    let params = standard_params();
    let mut group = c.benchmark_group("trinomial_price");

    for steps in [100_usize, 250, 500, 1000] {
        let spec =
            LatticeSpec::new(params, steps, OptionType::Put, ExerciseStyle::American).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(steps), &spec, |b, spec| {
            b.iter(|| trinomial::price(black_box(spec)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_binomial_price, bench_trinomial_price);
criterion_main!(benches);
