//! Selection strategies for the GA.
//!
//! Selection determines which individuals enter the parent pool. Every
//! strategy assumes **maximization** (higher fitness = better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::{Fitness, Individual};
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_cover::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Linear rank selection
/// let sel = Selection::Rank;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Tournament selection: sample `k` individuals uniformly with
    /// replacement and keep the fittest. Ties go to the one sampled first.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Falls back to uniform choice when every fitness is zero.
    ///
    /// # Complexity
    /// O(n) per selection
    Roulette,

    /// Linear rank selection: the best of `n` individuals gets weight `n`,
    /// the worst weight 1. Equal fitness keeps population order.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
        }
    }

    /// Builds a parent pool of `count` clones drawn from `population`.
    ///
    /// Clones keep their cached fitness, so pure carry-overs are never
    /// re-evaluated.
    pub fn select_pool<I: Individual, R: Rng>(
        &self,
        population: &[I],
        count: usize,
        rng: &mut R,
    ) -> Vec<I> {
        (0..count)
            .map(|_| population[self.select(population, rng)].clone())
            .collect()
    }
}

/// Returns the `k` fittest individuals, best first.
///
/// Equal fitness keeps population order. Returns the whole population
/// (sorted) when `k` exceeds its size.
pub fn select_best<I: Individual>(population: &[I], k: usize) -> Vec<&I> {
    let mut sorted: Vec<&I> = population.iter().collect();
    sorted.sort_by(|a, b| b.fitness().cmp(&a.fitness()));
    sorted.truncate(k);
    sorted
}

/// Tournament selection: pick k random individuals, return the first best.
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() > population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection with weights equal to fitness.
fn roulette<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let weights: Vec<f64> = population
        .iter()
        .map(|ind| ind.fitness().to_f64().max(0.0))
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking.
fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    // Best first; stable so equal fitness keeps population order.
    let mut indexed: Vec<usize> = (0..n).collect();
    indexed.sort_by(|&a, &b| population[b].fitness().cmp(&population[a].fitness()));

    // weight_i = n - rank_i
    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &original_idx) in indexed.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed[n - 1] // fallback
}
