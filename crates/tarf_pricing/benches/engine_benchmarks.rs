//! Criterion benchmarks for tarf_pricing Monte Carlo simulation.
//!
//! Benchmarks cover:
//! - Normal stream generation (1K, 10K, 100K draws)
//! - Full engine runs with varying path counts
//! - Proxy-surface construction overhead on top of plain pricing
//! - Surface evaluation throughput (the fast repricing path)

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tarf_core::market_data::FlatCurve;
use tarf_core::types::Date;
use tarf_models::instruments::fx::{CouponType, FxTarf, TarfContract};
use tarf_models::instruments::payoff::{OptionType, StrikedPayoff};
use tarf_models::models::{GbmProcess, SharedCurve, StochasticProcess};
use tarf_models::schedules::FixingSchedule;
use tarf_pricing::mc::{McEngineConfig, McTarfEngine, RunningStatistics};
use tarf_pricing::rng::{PseudoRandomSource, RandomSource};

fn flat(rate: f64) -> SharedCurve {
    Arc::new(FlatCurve::new(rate))
}

fn standard_contract() -> Arc<dyn TarfContract> {
    let schedule = FixingSchedule::monthly(Date::from_ymd(2026, 2, 16).unwrap(), 12, 2).unwrap();
    Arc::new(
        FxTarf::new(
            schedule,
            StrikedPayoff::new(OptionType::Call, 1.10).unwrap(),
            StrikedPayoff::new(OptionType::Put, 1.10).unwrap(),
            0.10,
            0.0,
            1_000_000.0,
            CouponType::Capped,
        )
        .unwrap(),
    )
}

fn standard_process() -> Arc<dyn StochasticProcess> {
    Arc::new(GbmProcess::new(1.15, 0.12, flat(0.02), flat(0.01)).unwrap())
}

fn build_engine(config: McEngineConfig) -> McTarfEngine {
    McTarfEngine::new(
        standard_process(),
        flat(0.02),
        standard_contract(),
        Arc::new(PseudoRandomSource::new()),
        Box::new(RunningStatistics::new()),
        Date::from_ymd(2026, 1, 15).unwrap(),
        config,
    )
    .unwrap()
}

fn fixed_config(samples: usize) -> McEngineConfig {
    McEngineConfig {
        steps: Some(24),
        samples: Some(samples),
        ..McEngineConfig::default()
    }
}

/// Benchmark normal stream generation (foundation for path sampling).
fn bench_stream_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_generation");

    for n_draws in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("fill_normal", n_draws),
            &n_draws,
            |b, &n| {
                let source = PseudoRandomSource::new();
                let mut buffer = vec![0.0; n];
                b.iter(|| {
                    let mut stream = source.stream_for_path(42, 0);
                    stream.fill_normal(&mut buffer);
                    black_box(buffer.iter().sum::<f64>())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark full engine runs with varying path counts.
fn bench_engine_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_pricing");
    group.sample_size(20);

    for n_paths in [1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("capped_tarf", n_paths),
            &n_paths,
            |b, &n| {
                let mut engine = build_engine(fixed_config(n));
                b.iter(|| black_box(engine.calculate().unwrap().value()));
            },
        );
    }

    // Variance-reduction variants at a fixed path count
    group.bench_function("antithetic_10k", |b| {
        let mut engine = build_engine(McEngineConfig {
            antithetic: true,
            ..fixed_config(10_000)
        });
        b.iter(|| black_box(engine.calculate().unwrap().value()));
    });

    group.bench_function("brownian_bridge_10k", |b| {
        let mut engine = build_engine(McEngineConfig {
            brownian_bridge: true,
            ..fixed_config(10_000)
        });
        b.iter(|| black_box(engine.calculate().unwrap().value()));
    });

    group.finish();
}

/// Benchmark proxy construction overhead on top of plain pricing.
fn bench_proxy_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("proxy_overhead");
    group.sample_size(20);

    group.bench_function("pricing_only", |b| {
        let mut engine = build_engine(McEngineConfig {
            generate_proxy: false,
            ..fixed_config(10_000)
        });
        b.iter(|| black_box(engine.calculate().unwrap().value()));
    });

    group.bench_function("pricing_with_surface", |b| {
        let mut engine = build_engine(fixed_config(10_000));
        b.iter(|| black_box(engine.calculate().unwrap().value()));
    });

    group.finish();
}

/// Benchmark surface evaluation throughput.
///
/// The surface exists to make repricing cheap; this measures a sweep of
/// spot and accumulated-amount queries against one fitted surface.
fn bench_surface_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_evaluation");

    let surface = build_engine(fixed_config(10_000))
        .calculate()
        .unwrap()
        .into_proxy()
        .unwrap();
    let date = Date::from_ymd(2026, 5, 1).unwrap();

    group.bench_function("evaluate_at_sweep", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..100 {
                let spot = 0.95 + 0.004 * i as f64;
                for j in 0..10 {
                    let accumulated = 0.01 * j as f64;
                    sum += surface.evaluate_at(date, accumulated, spot).unwrap();
                }
            }
            black_box(sum)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_stream_generation,
    bench_engine_pricing,
    bench_proxy_overhead,
    bench_surface_evaluation
);
criterion_main!(benches);
