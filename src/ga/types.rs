//! Core trait definitions for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] define the contract between the
//! generational loop and a concrete problem such as maximum coverage.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Higher fitness is better (maximization). Fitness must be totally
/// ordered so ties can be broken deterministically by position.
///
/// Built-in implementations exist for `usize`, `u32` and `u64`.
pub trait Fitness: Ord + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The worst possible fitness, used for unevaluated individuals.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

macro_rules! impl_unsigned_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                fn worst() -> Self {
                    0
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_unsigned_fitness!(usize, u32, u64);

/// A candidate solution in the GA population.
///
/// An individual is a fixed-length genotype plus a cached fitness. The
/// cache is cleared by [`invalidate_fitness`](Individual::invalidate_fitness)
/// whenever an operator changes the genotype; the runner only re-evaluates
/// individuals whose cache is empty.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Bits {
///     genes: Vec<bool>,
///     fitness: Option<usize>,
/// }
///
/// impl Individual for Bits {
///     type Fitness = usize;
///     type Gene = bool;
///     fn genes(&self) -> &[bool] { &self.genes }
///     fn genes_mut(&mut self) -> &mut [bool] { &mut self.genes }
///     fn fitness(&self) -> usize { self.fitness.unwrap_or(0) }
///     fn is_evaluated(&self) -> bool { self.fitness.is_some() }
///     fn set_fitness(&mut self, f: usize) { self.fitness = Some(f); }
///     fn invalidate_fitness(&mut self) { self.fitness = None; }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// The gene type of the genotype.
    type Gene: Clone + Send + Sync;

    /// The genotype.
    fn genes(&self) -> &[Self::Gene];

    /// Mutable access to the genotype.
    ///
    /// Callers that change genes must call
    /// [`invalidate_fitness`](Individual::invalidate_fitness) afterwards.
    fn genes_mut(&mut self) -> &mut [Self::Gene];

    /// Returns the cached fitness, or [`Fitness::worst`] if not evaluated.
    fn fitness(&self) -> Self::Fitness;

    /// Whether the cached fitness is valid for the current genotype.
    fn is_evaluated(&self) -> bool;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: Self::Fitness);

    /// Clears the cached fitness.
    fn invalidate_fitness(&mut self);
}

/// Defines a GA optimization problem.
///
/// The problem supplies random initialization and evaluation. Variation
/// (crossover, mutation) and parent selection are strategies injected into
/// the runner, see [`GaRunner`](super::GaRunner).
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel using rayon.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    ///
    /// Must be a pure function of the genotype. The runner may call this in
    /// parallel across the population.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Called at the end of each generation with the current best fitness.
    ///
    /// The default implementation is a no-op.
    fn on_generation(
        &self,
        _generation: usize,
        _best_fitness: <Self::Individual as Individual>::Fitness,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_is_zero() {
        assert_eq!(<usize as Fitness>::worst(), 0);
        assert_eq!(<u64 as Fitness>::worst(), 0);
    }

    #[test]
    fn test_to_f64() {
        assert!((7usize.to_f64() - 7.0).abs() < 1e-12);
        assert!((3u32.to_f64() - 3.0).abs() < 1e-12);
    }
}
