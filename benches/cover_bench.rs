//! Criterion benchmarks for u-cover.
//!
//! Uses synthetic item/element tables to measure fitness evaluation and
//! full GA runs independent of any real dataset.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_cover::cover::{analyze_combinations, rank_items, CoverageEvaluator, CoverageProblem};
use u_cover::dataset::Dataset;
use u_cover::ga::{GaConfig, GaRunner};
use u_cover::progress::NoProgress;

/// `items` items, each covering up to `span` of `elements` elements.
fn synthetic(items: usize, elements: usize, span: usize) -> Dataset {
    let mut rng = u_numflow::random::create_rng(7);
    let pairs: Vec<(String, String)> = (0..items)
        .flat_map(|i| {
            let n = rng.random_range(1..=span);
            (0..n)
                .map(|_| (format!("d{i}"), format!("t{}", rng.random_range(0..elements))))
                .collect::<Vec<_>>()
        })
        .collect();
    Dataset::from_pairs(pairs).expect("non-empty")
}

// ===========================================================================
// Fitness evaluation
// ===========================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage_evaluate");

    for items in [100usize, 1_000, 5_000] {
        let ds = synthetic(items, items * 2, 20);
        let eval = CoverageEvaluator::new(ds.coverage());
        let mut rng = u_numflow::random::create_rng(42);
        let genes: Vec<bool> = (0..items).map(|_| rng.random_bool(0.5)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(items), &genes, |b, g| {
            b.iter(|| black_box(eval.evaluate(black_box(g))))
        });
    }
    group.finish();
}

// ===========================================================================
// Full GA run + ranking
// ===========================================================================

fn bench_ga_cover(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_cover");
    group.sample_size(10);

    for (items, pop, gen) in [(100usize, 100usize, 20usize), (500, 300, 40), (2_000, 300, 40)] {
        let ds = synthetic(items, items * 2, 20);
        let config = GaConfig {
            population_size: pop,
            max_generations: gen,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}_g{}", items, pop, gen), items),
            &(ds, config),
            |b, (ds, config)| {
                b.iter(|| {
                    let problem = CoverageProblem::new(ds);
                    let result = GaRunner::new(config.clone())
                        .run(black_box(&problem), &NoProgress)
                        .expect("valid config");
                    let ranked = rank_items(&result.population, 10, ds).expect("top_k > 0");
                    black_box(analyze_combinations(&ranked))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_ga_cover);
criterion_main!(benches);
