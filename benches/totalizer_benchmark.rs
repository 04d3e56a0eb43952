// ============================================================================
// Totalizer Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Accumulator primitives - add_scalar with and without carry/borrow
// 2. Affine transform - schoolbook multiply on small and large totals
// 3. Totalization - directional combination and average flow
// 4. Totalizer - end-to-end recording through the event handler
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flow_totalizer::prelude::*;
use std::hint::black_box;
use std::sync::Arc;

const THRESHOLD: f32 = 1_000_000.0;

// ============================================================================
// Accumulator Primitive Benchmarks
// ============================================================================

fn benchmark_add_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_scalar");

    // Pulse-sized increments: no carry on almost every call
    group.bench_function("small_increment", |b| {
        let mut total = BigFloat::from_parts(4_000, 12.5);
        b.iter(|| {
            let _ = black_box(&mut total).add_scalar(black_box(0.001), THRESHOLD);
        });
    });

    // Increments that carry many units at once
    group.bench_function("carry", |b| {
        b.iter(|| {
            let mut total = BigFloat::from_parts(4_000, 999_999.0);
            black_box(total.add_scalar(black_box(5_000_000.5), THRESHOLD))
        });
    });

    // Negative increments that borrow back across the unit boundary
    group.bench_function("borrow", |b| {
        b.iter(|| {
            let mut total = BigFloat::from_parts(4_000, 0.25);
            black_box(total.add_scalar(black_box(-3_500_000.0), THRESHOLD))
        });
    });

    group.finish();
}

// ============================================================================
// Affine Transform Benchmarks
// ============================================================================

fn benchmark_affine_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("affine_transform");

    for units in [0u32, 1_000, 1_000_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(units), units, |b, &units| {
            b.iter(|| {
                let mut total = BigFloat::from_parts(units, 123_456.75);
                black_box(total.affine_transform(black_box(1.0025), black_box(-0.5), THRESHOLD))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Totalization Benchmarks
// ============================================================================

fn benchmark_totalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("totalization");
    let forward = BigFloat::from_parts(5_000, 250_000.0);
    let reverse = BigFloat::from_parts(2_000, 750_000.0);

    for mode in [
        TotalizationMode::AOnly,
        TotalizationMode::AMinusB,
        TotalizationMode::BMinusA,
    ] {
        group.bench_with_input(
            BenchmarkId::new("combine_directional", format!("{:?}", mode)),
            &mode,
            |b, &mode| {
                b.iter(|| {
                    black_box(combine_directional(
                        black_box(&forward),
                        black_box(&reverse),
                        mode,
                        THRESHOLD,
                    ))
                });
            },
        );
    }

    group.bench_function("average_flow", |b| {
        b.iter(|| {
            black_box(average_flow(
                black_box(&reverse),
                black_box(&forward),
                THRESHOLD,
                black_box(3600.0),
            ))
        });
    });

    group.finish();
}

// ============================================================================
// Totalizer Benchmarks
// ============================================================================

fn benchmark_totalizer_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("totalizer_record");

    for num_pulses in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_pulses),
            num_pulses,
            |b, &num_pulses| {
                b.iter(|| {
                    let mut totalizer = BidirectionalTotalizer::new(
                        AccumulatorConfig::small_line(),
                        Arc::new(NoOpEventHandler),
                    )
                    .unwrap();
                    for i in 0..num_pulses {
                        let delta = if i % 10 == 0 { -0.75 } else { 2.5 };
                        let _ = totalizer.record(black_box(delta));
                    }
                    black_box(totalizer.net(TotalizationMode::AMinusB))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_add_scalar,
    benchmark_affine_transform,
    benchmark_totalization,
    benchmark_totalizer_record,
);
criterion_main!(benches);
