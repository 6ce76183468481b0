//! GA generational loop execution.
//!
//! [`GaRunner`] orchestrates the evolutionary process:
//! initialization → evaluation → (selection → crossover → mutation →
//! re-evaluation → replacement → progress) × generations.

use super::config::GaConfig;
use super::operators::{CrossoverOperator, FlipBitMutation, MutationOperator, TwoPointCrossover};
use super::types::{Fitness, GaProblem, Individual};
use crate::error::{CoverError, Result};
use crate::progress::{Progress, ProgressSink};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use u_numflow::random::create_rng;

/// Per-generation population statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Best fitness in the population.
    pub best_fitness: f64,
    /// Mean fitness of the population.
    pub mean_fitness: f64,
    /// Individuals evaluated to produce this population.
    pub evaluations: usize,
}

/// Result of a GA run.
///
/// `population` is the final generation exactly as the loop left it: no
/// sorting or filtering is applied.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The final population, in population order.
    pub population: Vec<I>,

    /// The best individual seen in any generation.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Statistics for the initial population and each generation.
    pub history: Vec<GenerationStats>,
}

impl<I: Individual> GaResult<I> {
    /// Total number of fitness evaluations performed.
    pub fn evaluations(&self) -> usize {
        self.history.iter().map(|s| s.evaluations).sum()
    }
}

/// Executes the generational GA loop.
///
/// Selection is configured through [`GaConfig::selection`]; crossover and
/// mutation are strategy objects supplied with
/// [`with_crossover`](GaRunner::with_crossover) and
/// [`with_mutation`](GaRunner::with_mutation). The defaults are
/// [`TwoPointCrossover`] and [`FlipBitMutation`] with a 5% per-bit rate.
///
/// # Usage
///
/// ```ignore
/// let runner = GaRunner::new(GaConfig::default().with_seed(42));
/// let result = runner.run(&problem, &NoProgress)?;
/// println!("best fitness: {:?}", result.best_fitness);
/// ```
#[derive(Debug, Clone)]
pub struct GaRunner<C = TwoPointCrossover, M = FlipBitMutation> {
    config: GaConfig,
    crossover: C,
    mutation: M,
}

impl GaRunner {
    /// Creates a runner with the default operators.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            crossover: TwoPointCrossover,
            mutation: FlipBitMutation::default(),
        }
    }
}

impl<C, M> GaRunner<C, M> {
    /// Replaces the crossover strategy.
    pub fn with_crossover<C2>(self, crossover: C2) -> GaRunner<C2, M> {
        GaRunner {
            config: self.config,
            crossover,
            mutation: self.mutation,
        }
    }

    /// Replaces the mutation strategy.
    pub fn with_mutation<M2>(self, mutation: M2) -> GaRunner<C, M2> {
        GaRunner {
            config: self.config,
            crossover: self.crossover,
            mutation,
        }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA to completion.
    ///
    /// Emits [`Progress::Generation`] after every generation. Fails with
    /// [`CoverError::InvalidConfig`] before doing any work if the
    /// configuration or an operator parameter is invalid, or the problem
    /// produces empty genotypes.
    pub fn run<P, S>(&self, problem: &P, progress: &S) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        C: CrossoverOperator<<P::Individual as Individual>::Gene>,
        M: MutationOperator<<P::Individual as Individual>::Gene>,
        S: ProgressSink + ?Sized,
    {
        self.run_with_cancel(problem, progress, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked only at generation boundaries. When it is set
    /// the run stops and returns the population of the last completed
    /// generation with `cancelled = true`.
    pub fn run_with_cancel<P, S>(
        &self,
        problem: &P,
        progress: &S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        C: CrossoverOperator<<P::Individual as Individual>::Gene>,
        M: MutationOperator<<P::Individual as Individual>::Gene>,
        S: ProgressSink + ?Sized,
    {
        let config = &self.config;
        config.validate()?;
        self.crossover.validate()?;
        self.mutation.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);

        // 1. Initialize population
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        if population[0].genes().is_empty() {
            return Err(CoverError::InvalidConfig(
                "problem produced an empty genotype".into(),
            ));
        }
        info!(
            population = config.population_size,
            generations = config.max_generations,
            genes = population[0].genes().len(),
            seed,
            "starting GA run"
        );

        // 2. Evaluate initial population
        let evaluations = evaluate_stale(problem, &mut population, config.parallel);

        // 3. Track best
        let mut best = find_best(&population).clone();
        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(stats(0, &population, evaluations));

        let mut generations = 0usize;
        let mut cancelled = false;

        // 4. Generational loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Selection
            let mut offspring =
                config
                    .selection
                    .select_pool(&population, config.population_size, &mut rng);

            // Crossover on consecutive pairs
            for pair in offspring.chunks_exact_mut(2) {
                if rng.random_bool(config.crossover_rate) {
                    let (left, right) = pair.split_at_mut(1);
                    let (a, b) = (&mut left[0], &mut right[0]);
                    if self.crossover.crossover(a.genes_mut(), b.genes_mut(), &mut rng) {
                        a.invalidate_fitness();
                        b.invalidate_fitness();
                    }
                }
            }

            // Mutation
            for child in offspring.iter_mut() {
                if rng.random_bool(config.mutation_rate)
                    && self.mutation.mutate(child.genes_mut(), &mut rng)
                {
                    child.invalidate_fitness();
                }
            }

            // Re-evaluation and generational replacement
            let evaluations = evaluate_stale(problem, &mut offspring, config.parallel);
            population = offspring;
            generations = gen + 1;

            let gen_best = find_best(&population);
            if gen_best.fitness() > best.fitness() {
                best = gen_best.clone();
            }

            let gen_stats = stats(generations, &population, evaluations);
            debug!(
                generation = generations,
                best = gen_stats.best_fitness,
                mean = gen_stats.mean_fitness,
                evaluations,
                "generation complete"
            );
            history.push(gen_stats);

            problem.on_generation(generations, best.fitness());
            progress.emit(Progress::Generation {
                generation: generations,
                total: config.max_generations,
            });
        }

        info!(
            generations,
            cancelled,
            best = best.fitness().to_f64(),
            "GA run finished"
        );

        Ok(GaResult {
            population,
            best_fitness: best.fitness(),
            best,
            generations,
            cancelled,
            history,
        })
    }
}

/// Evaluates every individual whose cached fitness is stale.
///
/// Returns the number of evaluations performed.
fn evaluate_stale<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) -> usize {
    #[cfg(feature = "parallel")]
    if parallel {
        return population
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .map(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            })
            .count();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut count = 0;
    for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
        count += 1;
    }
    count
}

/// Finds the individual with the best (highest) fitness; ties go to the first.
fn find_best<I: Individual>(population: &[I]) -> &I {
    let mut best = &population[0];
    for ind in &population[1..] {
        if ind.fitness() > best.fitness() {
            best = ind;
        }
    }
    best
}

fn stats<I: Individual>(generation: usize, population: &[I], evaluations: usize) -> GenerationStats {
    let total: f64 = population.iter().map(|ind| ind.fitness().to_f64()).sum();
    GenerationStats {
        generation,
        best_fitness: find_best(population).fitness().to_f64(),
        mean_fitness: total / population.len() as f64,
        evaluations,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaConfig, OnePointCrossover, Selection, UniformCrossover};
    use crate::progress::NoProgress;
    use std::sync::Mutex;

    // ---- OneMax problem: maximize the number of true bits ----

    #[derive(Clone, Debug, PartialEq)]
    struct BitString {
        bits: Vec<bool>,
        fitness: Option<usize>,
    }

    impl Individual for BitString {
        type Fitness = usize;
        type Gene = bool;
        fn genes(&self) -> &[bool] {
            &self.bits
        }
        fn genes_mut(&mut self) -> &mut [bool] {
            &mut self.bits
        }
        fn fitness(&self) -> usize {
            self.fitness.unwrap_or(0)
        }
        fn is_evaluated(&self) -> bool {
            self.fitness.is_some()
        }
        fn set_fitness(&mut self, f: usize) {
            self.fitness = Some(f);
        }
        fn invalidate_fitness(&mut self) {
            self.fitness = None;
        }
    }

    struct OneMaxProblem {
        n: usize,
    }

    impl GaProblem for OneMaxProblem {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            BitString {
                bits: (0..self.n).map(|_| rng.random_bool(0.5)).collect(),
                fitness: None,
            }
        }

        fn evaluate(&self, ind: &BitString) -> usize {
            ind.bits.iter().filter(|&&b| b).count()
        }
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(50)
            .with_max_generations(30)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_onemax_improves() {
        let problem = OneMaxProblem { n: 30 };
        let result = GaRunner::new(small_config()).run(&problem, &NoProgress).unwrap();

        let initial_best = result.history[0].best_fitness;
        assert!(
            result.best_fitness as f64 > initial_best,
            "expected improvement over {initial_best}, got {}",
            result.best_fitness
        );
        assert!(result.best_fitness >= 22, "got {}", result.best_fitness);
    }

    #[test]
    fn test_population_size_constant() {
        let problem = OneMaxProblem { n: 10 };
        let config = small_config().with_population_size(21);
        let result = GaRunner::new(config).run(&problem, &NoProgress).unwrap();
        assert_eq!(result.population.len(), 21);
        assert!(result.population.iter().all(|ind| ind.is_evaluated()));
        assert!(result.population.iter().all(|ind| ind.bits.len() == 10));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let problem = OneMaxProblem { n: 25 };
        let runner = GaRunner::new(small_config());
        let a = runner.run(&problem, &NoProgress).unwrap();
        let b = runner.run(&problem, &NoProgress).unwrap();
        assert_eq!(a.population, b.population);
        assert_eq!(a.history, b.history);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = OneMaxProblem { n: 25 };
        let seq = GaRunner::new(small_config())
            .run(&problem, &NoProgress)
            .unwrap();
        let par = GaRunner::new(small_config().with_parallel(true))
            .run(&problem, &NoProgress)
            .unwrap();
        assert_eq!(seq.population, par.population);
    }

    #[test]
    fn test_progress_per_generation() {
        let problem = OneMaxProblem { n: 10 };
        let seen = Mutex::new(Vec::new());
        let sink = |p: Progress| seen.lock().unwrap().push(p.percent());
        GaRunner::new(small_config().with_max_generations(4))
            .run(&problem, &sink)
            .unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_history_length() {
        let problem = OneMaxProblem { n: 10 };
        let result = GaRunner::new(small_config()).run(&problem, &NoProgress).unwrap();
        // initial + each generation
        assert_eq!(result.history.len(), 31);
        assert_eq!(result.generations, 30);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_no_variation_reuses_cached_fitness() {
        let problem = OneMaxProblem { n: 10 };
        let config = small_config().with_crossover_rate(0.0);
        let result = GaRunner::new(config)
            .with_mutation(FlipBitMutation::new(0.0))
            .run(&problem, &NoProgress)
            .unwrap();
        // only the initial population is ever evaluated
        assert_eq!(result.evaluations(), 50);
    }

    #[test]
    fn test_cancellation_before_start() {
        let problem = OneMaxProblem { n: 10 };
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::new(small_config())
            .run_with_cancel(&problem, &NoProgress, Some(cancel))
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.population.len(), 50);
    }

    #[test]
    fn test_cancellation_from_progress() {
        let problem = OneMaxProblem { n: 10 };
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();
        let sink = move |p: Progress| {
            if let Progress::Generation { generation: 3, .. } = p {
                flag.store(true, Ordering::Relaxed);
            }
        };
        let result = GaRunner::new(small_config())
            .run_with_cancel(&problem, &sink, Some(cancel))
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_empty_genotype_rejected() {
        let problem = OneMaxProblem { n: 0 };
        let err = GaRunner::new(small_config())
            .run(&problem, &NoProgress)
            .unwrap_err();
        assert!(matches!(err, CoverError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = OneMaxProblem { n: 10 };
        let err = GaRunner::new(small_config().with_population_size(0))
            .run(&problem, &NoProgress)
            .unwrap_err();
        assert!(matches!(err, CoverError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_operator_rejected_before_run() {
        let problem = OneMaxProblem { n: 10 };
        let events = Mutex::new(0usize);
        let sink = |_: Progress| *events.lock().unwrap() += 1;

        let err = GaRunner::new(small_config())
            .with_mutation(FlipBitMutation::new(f64::NAN))
            .run(&problem, &sink)
            .unwrap_err();
        assert!(matches!(err, CoverError::InvalidConfig(_)));

        let err = GaRunner::new(small_config())
            .with_crossover(UniformCrossover::new(f64::NAN))
            .run(&problem, &sink)
            .unwrap_err();
        assert!(matches!(err, CoverError::InvalidConfig(_)));
        assert_eq!(*events.lock().unwrap(), 0);
    }

    #[test]
    fn test_pluggable_strategies() {
        let problem = OneMaxProblem { n: 20 };
        for selection in [Selection::Tournament(2), Selection::Roulette, Selection::Rank] {
            let config = small_config().with_selection(selection);
            let one_point = GaRunner::new(config.clone())
                .with_crossover(OnePointCrossover)
                .run(&problem, &NoProgress)
                .unwrap();
            let uniform = GaRunner::new(config)
                .with_crossover(UniformCrossover::default())
                .with_mutation(FlipBitMutation::new(0.02))
                .run(&problem, &NoProgress)
                .unwrap();
            assert!(one_point.best_fitness >= 12, "{selection:?}");
            assert!(uniform.best_fitness >= 12, "{selection:?}");
        }
    }

    #[test]
    fn test_find_best_first_on_tie() {
        let pop = vec![
            BitString {
                bits: vec![false],
                fitness: Some(2),
            },
            BitString {
                bits: vec![true],
                fitness: Some(3),
            },
            BitString {
                bits: vec![false, true],
                fitness: Some(3),
            },
        ];
        assert_eq!(find_best(&pop).bits, vec![true]);
    }
}
