//! Coverage as a GA problem.
//!
//! A [`Candidate`] is a bitstring over the dataset's items (index-aligned
//! with [`Dataset::items`]); its fitness is the number of distinct
//! elements covered by the flagged items, computed by [`CoverageEvaluator`].

use crate::dataset::{CoverageMap, Dataset};
use crate::ga::{GaProblem, Individual};
use rand::Rng;
use tracing::trace;

/// A candidate selection of items with a cached coverage count.
///
/// Equality compares genotypes only.
#[derive(Debug, Clone)]
pub struct Candidate {
    genes: Vec<bool>,
    fitness: Option<usize>,
}

impl Candidate {
    /// Creates an unevaluated candidate from a bit per item.
    pub fn new(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Indices of the selected items, ascending.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
    }

    /// Cached coverage count, if evaluated.
    pub fn cached_fitness(&self) -> Option<usize> {
        self.fitness
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for Candidate {}

impl Individual for Candidate {
    type Fitness = usize;
    type Gene = bool;

    fn genes(&self) -> &[bool] {
        &self.genes
    }

    fn genes_mut(&mut self) -> &mut [bool] {
        &mut self.genes
    }

    fn fitness(&self) -> usize {
        self.fitness.unwrap_or(0)
    }

    fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    fn set_fitness(&mut self, fitness: usize) {
        self.fitness = Some(fitness);
    }

    fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }
}

/// Counts the distinct elements covered by a selection of items.
///
/// Pure function of the genotype and the coverage map.
#[derive(Debug, Clone, Copy)]
pub struct CoverageEvaluator<'a> {
    coverage: &'a CoverageMap,
}

impl<'a> CoverageEvaluator<'a> {
    pub fn new(coverage: &'a CoverageMap) -> Self {
        Self { coverage }
    }

    /// Size of the union of the covered sets of every flagged item.
    ///
    /// An all-false selection covers nothing and returns 0.
    pub fn evaluate(&self, genes: &[bool]) -> usize {
        debug_assert_eq!(genes.len(), self.coverage.len(), "genotype length mismatch");

        let mut covered = vec![false; self.coverage.num_elements()];
        let mut count = 0;
        for (item, _) in genes.iter().enumerate().filter(|&(_, &on)| on) {
            for &element in self.coverage.covered(item) {
                if !covered[element] {
                    covered[element] = true;
                    count += 1;
                }
            }
        }
        count
    }
}

/// Maximum-coverage selection over a [`Dataset`].
///
/// Each gene is drawn uniformly from `{true, false}` at initialization.
#[derive(Debug, Clone, Copy)]
pub struct CoverageProblem<'a> {
    dataset: &'a Dataset,
    evaluator: CoverageEvaluator<'a>,
}

impl<'a> CoverageProblem<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            evaluator: CoverageEvaluator::new(dataset.coverage()),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn evaluator(&self) -> CoverageEvaluator<'a> {
        self.evaluator
    }
}

impl GaProblem for CoverageProblem<'_> {
    type Individual = Candidate;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Candidate {
        Candidate::new(
            (0..self.dataset.num_items())
                .map(|_| rng.random_bool(0.5))
                .collect(),
        )
    }

    fn evaluate(&self, individual: &Candidate) -> usize {
        self.evaluator.evaluate(individual.genes())
    }

    fn on_generation(&self, generation: usize, best_fitness: usize) {
        trace!(
            generation,
            covered = best_fitness,
            universe = self.dataset.num_elements(),
            "coverage progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    fn sample() -> Dataset {
        Dataset::from_pairs([
            ("A", "t1"),
            ("A", "t2"),
            ("B", "t2"),
            ("B", "t3"),
            ("C", "t4"),
        ])
        .unwrap()
    }

    #[test]
    fn test_all_false_is_zero() {
        let ds = sample();
        let eval = CoverageEvaluator::new(ds.coverage());
        assert_eq!(eval.evaluate(&[false, false, false]), 0);
    }

    #[test]
    fn test_union_counts_shared_once() {
        let ds = sample();
        let eval = CoverageEvaluator::new(ds.coverage());
        assert_eq!(eval.evaluate(&[true, false, false]), 2);
        assert_eq!(eval.evaluate(&[true, true, false]), 3);
        assert_eq!(eval.evaluate(&[true, true, true]), 4);
        assert_eq!(eval.evaluate(&[false, false, true]), 1);
    }

    #[test]
    fn test_overlapping_items() {
        // "Z" adds nothing beyond "A"
        let ds = Dataset::from_pairs([("A", "t1"), ("Z", "t1")]).unwrap();
        let eval = CoverageEvaluator::new(ds.coverage());
        assert_eq!(eval.evaluate(&[false, true]), 1);
        assert_eq!(eval.evaluate(&[true, true]), 1);
    }

    #[test]
    fn test_candidate_individual() {
        let mut c = Candidate::new(vec![true, false, true]);
        assert!(!c.is_evaluated());
        assert_eq!(c.fitness(), 0);
        c.set_fitness(3);
        assert_eq!(c.cached_fitness(), Some(3));
        c.invalidate_fitness();
        assert_eq!(c.cached_fitness(), None);
        assert_eq!(c.selected().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_candidate_equality_ignores_fitness() {
        let a = Candidate::new(vec![true, false]);
        let mut b = Candidate::new(vec![true, false]);
        b.set_fitness(9);
        assert_eq!(a, b);
        assert_ne!(a, Candidate::new(vec![false, true]));
    }

    #[test]
    fn test_problem_creates_aligned_genotypes() {
        let ds = sample();
        let problem = CoverageProblem::new(&ds);
        let mut rng = create_rng(42);
        for _ in 0..20 {
            let c = problem.create_individual(&mut rng);
            assert_eq!(c.genes().len(), 3);
            assert!(!c.is_evaluated());
            assert!(problem.evaluate(&c) <= 4);
        }
    }
}
