//! End-to-end coverage runs.
//!
//! A [`CoverageSession`] validates its inputs, runs the GA over a
//! [`Dataset`], ranks the result and hands back a [`CoverageReport`]. The
//! report owns the ranked items; combination analysis is a method on the
//! report, so it can only happen after a completed run.

use super::combination::{analyze_combinations, Combination};
use super::problem::{Candidate, CoverageProblem};
use super::ranker::{rank_items, RankedItem};
use crate::dataset::{Columns, Dataset};
use crate::error::{CoverError, Result};
use crate::ga::{
    CrossoverOperator, GaConfig, GaRunner, GenerationStats, Individual, MutationOperator,
};
use crate::progress::{Progress, ProgressSink};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a completed coverage run.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Ranked items, best first.
    pub ranked: Vec<RankedItem>,
    /// Final GA population.
    pub population: Vec<Candidate>,
    /// Best union coverage reached by any candidate during the run.
    pub best_coverage: usize,
    /// Number of distinct elements in the dataset.
    pub universe: usize,
    /// Generations executed.
    pub generations: usize,
    /// Per-generation statistics.
    pub history: Vec<GenerationStats>,
}

impl CoverageReport {
    /// Pairwise shared coverage among the ranked items.
    pub fn combinations(&self) -> Vec<Combination> {
        analyze_combinations(&self.ranked)
    }

    /// Distinct elements covered by the ranked items together.
    pub fn ranked_coverage(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for item in &self.ranked {
            seen.extend(item.elements.iter().map(String::as_str));
        }
        seen.len()
    }
}

/// Configured coverage run: GA settings, operators, and result size.
///
/// # Usage
///
/// ```ignore
/// let dataset = Dataset::from_path("drugs.csv", &Columns::default())?;
/// let report = CoverageSession::new(5).run(&dataset, &NoProgress)?;
/// for item in &report.ranked {
///     println!("{item}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CoverageSession<C = crate::ga::TwoPointCrossover, M = crate::ga::FlipBitMutation> {
    runner: GaRunner<C, M>,
    top_k: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl CoverageSession {
    /// Session with the default GA configuration reporting `top_k` items.
    pub fn new(top_k: usize) -> Self {
        Self::with_config(top_k, GaConfig::default())
    }

    pub fn with_config(top_k: usize, config: GaConfig) -> Self {
        Self {
            runner: GaRunner::new(config),
            top_k,
            cancel: None,
        }
    }
}

impl<C, M> CoverageSession<C, M>
where
    C: CrossoverOperator<bool>,
    M: MutationOperator<bool>,
{
    /// Uses a custom runner, e.g. one with different operators.
    pub fn with_runner<C2, M2>(self, runner: GaRunner<C2, M2>) -> CoverageSession<C2, M2> {
        CoverageSession {
            runner,
            top_k: self.top_k,
            cancel: self.cancel,
        }
    }

    /// Stops the run at the next generation boundary once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn config(&self) -> &GaConfig {
        self.runner.config()
    }

    /// Runs search and ranking over `dataset`.
    ///
    /// Emits [`Progress::Completed`] on success and [`Progress::Aborted`]
    /// on any failure. Parameters are validated before the search starts.
    pub fn run<S>(&self, dataset: &Dataset, progress: &S) -> Result<CoverageReport>
    where
        S: ProgressSink + ?Sized,
    {
        let result = self.run_inner(dataset, progress);
        match &result {
            Ok(_) => progress.emit(Progress::Completed),
            Err(e) => {
                warn!(error = %e, "coverage run aborted");
                progress.emit(Progress::Aborted);
            }
        }
        result
    }

    /// Loads a CSV file and runs over it.
    ///
    /// Load failures are reported like any other precondition failure,
    /// including the [`Progress::Aborted`] notification.
    pub fn run_path<S>(
        &self,
        path: impl AsRef<Path>,
        columns: &Columns,
        progress: &S,
    ) -> Result<CoverageReport>
    where
        S: ProgressSink + ?Sized,
    {
        match Dataset::from_path(path, columns) {
            Ok(dataset) => self.run(&dataset, progress),
            Err(e) => {
                warn!(error = %e, "could not load dataset");
                progress.emit(Progress::Aborted);
                Err(e)
            }
        }
    }

    fn run_inner<S>(&self, dataset: &Dataset, progress: &S) -> Result<CoverageReport>
    where
        S: ProgressSink + ?Sized,
    {
        if self.top_k == 0 {
            return Err(CoverError::InvalidConfig("top_k must be at least 1".into()));
        }
        self.runner.config().validate()?;

        let problem = CoverageProblem::new(dataset);
        let result = self
            .runner
            .run_with_cancel(&problem, progress, self.cancel.clone())?;
        if result.cancelled {
            return Err(CoverError::Cancelled);
        }

        let ranked = rank_items(&result.population, self.top_k, dataset)?;
        info!(
            ranked = ranked.len(),
            best_coverage = result.best.fitness(),
            universe = dataset.num_elements(),
            "coverage run complete"
        );

        Ok(CoverageReport {
            ranked,
            best_coverage: result.best_fitness,
            universe: dataset.num_elements(),
            generations: result.generations,
            history: result.history,
            population: result.population,
        })
    }
}
