//! Variation operators for fixed-length genotypes.
//!
//! Operators are strategy objects injected into
//! [`GaRunner`](super::GaRunner). They work on gene slices, so any
//! [`Individual`](super::Individual) exposing its genotype can use them.
//!
//! # Crossover Operators
//!
//! - [`TwoPointCrossover`]: swap the segment between two cut points
//! - [`OnePointCrossover`]: swap everything after one cut point
//! - [`UniformCrossover`]: swap each position independently
//!
//! # Mutation Operators
//!
//! - [`FlipBitMutation`]: flip each bit independently with a fixed probability
//!
//! # References
//!
//! - Spears & De Jong (1991), "An Analysis of Multi-Point Crossover"
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use crate::error::{CoverError, Result};
use rand::Rng;

/// Recombines two equal-length genotypes in place.
pub trait CrossoverOperator<G>: Send + Sync {
    /// Recombines `a` and `b` in place.
    ///
    /// Returns `true` if the operator was applied, meaning both genotypes
    /// may have changed and their cached fitness is stale.
    fn crossover<R: Rng>(&self, a: &mut [G], b: &mut [G], rng: &mut R) -> bool;

    /// Checks the operator's parameters. Called by the runner before any
    /// work is done.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Perturbs one genotype in place.
pub trait MutationOperator<G>: Send + Sync {
    /// Mutates `genes` in place. Returns `true` if any gene changed.
    fn mutate<R: Rng>(&self, genes: &mut [G], rng: &mut R) -> bool;

    /// Checks the operator's parameters. Called by the runner before any
    /// work is done.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(CoverError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {p}"
        )))
    }
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Two-point crossover.
///
/// Picks two distinct cut points `1 <= c1 < c2 <= n` uniformly and swaps
/// `a[c1..c2]` with `b[c1..c2]`. Genotypes shorter than 2 are left alone.
///
/// # Complexity
/// O(n)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoPointCrossover;

impl<G: Send + Sync> CrossoverOperator<G> for TwoPointCrossover {
    fn crossover<R: Rng>(&self, a: &mut [G], b: &mut [G], rng: &mut R) -> bool {
        let n = a.len().min(b.len());
        if n < 2 {
            return false;
        }
        let (start, end) = cut_points(n, rng);
        a[start..end].swap_with_slice(&mut b[start..end]);
        true
    }
}

/// One-point crossover.
///
/// Picks a cut point `1 <= c < n` and swaps the tails `a[c..]` and `b[c..]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnePointCrossover;

impl<G: Send + Sync> CrossoverOperator<G> for OnePointCrossover {
    fn crossover<R: Rng>(&self, a: &mut [G], b: &mut [G], rng: &mut R) -> bool {
        let n = a.len().min(b.len());
        if n < 2 {
            return false;
        }
        let cut = rng.random_range(1..n);
        a[cut..n].swap_with_slice(&mut b[cut..n]);
        true
    }
}

/// Uniform crossover: each position is swapped with probability `swap_probability`.
///
/// Out-of-range values are clamped to `[0, 1]`; NaN is kept and rejected
/// by [`validate`](CrossoverOperator::validate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformCrossover {
    swap_probability: f64,
}

impl UniformCrossover {
    pub fn new(swap_probability: f64) -> Self {
        Self {
            swap_probability: swap_probability.clamp(0.0, 1.0),
        }
    }

    pub fn swap_probability(&self) -> f64 {
        self.swap_probability
    }
}

impl Default for UniformCrossover {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl<G: Send + Sync> CrossoverOperator<G> for UniformCrossover {
    fn crossover<R: Rng>(&self, a: &mut [G], b: &mut [G], rng: &mut R) -> bool {
        let n = a.len().min(b.len());
        if n == 0 {
            return false;
        }
        for i in 0..n {
            if rng.random_bool(self.swap_probability) {
                std::mem::swap(&mut a[i], &mut b[i]);
            }
        }
        true
    }

    fn validate(&self) -> Result<()> {
        check_probability("swap probability", self.swap_probability)
    }
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Flip-bit mutation: each bit flips independently with `probability`.
///
/// Out-of-range values are clamped to `[0, 1]`; NaN is kept and rejected
/// by [`validate`](MutationOperator::validate).
///
/// # Complexity
/// O(n)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipBitMutation {
    probability: f64,
}

impl FlipBitMutation {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for FlipBitMutation {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl MutationOperator<bool> for FlipBitMutation {
    fn mutate<R: Rng>(&self, genes: &mut [bool], rng: &mut R) -> bool {
        let mut changed = false;
        for bit in genes.iter_mut() {
            if rng.random_bool(self.probability) {
                *bit = !*bit;
                changed = true;
            }
        }
        changed
    }

    fn validate(&self) -> Result<()> {
        check_probability("flip probability", self.probability)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Two distinct cut points `1 <= start < end <= n`, for `n >= 2`.
fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(1..=n);
    let b = rng.random_range(1..n);
    if b >= a {
        (a, b + 1)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
