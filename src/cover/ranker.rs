//! Top-k extraction and item ranking.
//!
//! Ranking works on the final population of a run:
//!
//! 1. take the `top_k` fittest candidates (stable on ties)
//! 2. collect every item any of them selects, keeping first occurrence
//! 3. order those items by how many elements each covers on its own
//! 4. keep at most `top_k` items
//!
//! Step 3 sorts by *individual* coverage, not by the marginal contribution
//! of an item to the union covered by the top-k candidates.

use super::problem::Candidate;
use crate::dataset::Dataset;
use crate::error::{CoverError, Result};
use crate::ga::{select_best, Individual};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// An item chosen by the search, with the elements it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedItem {
    /// Item identifier.
    pub item: String,
    /// Elements covered by this item alone, in dataset order.
    pub elements: Vec<String>,
    /// `elements.len()`.
    pub count: usize,
}

impl fmt::Display for RankedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} covers {} targets: {}",
            self.item,
            self.count,
            self.elements.join(", ")
        )
    }
}

/// Ranks the items selected by the best `top_k` candidates of `population`.
///
/// Returns fewer than `top_k` items only when fewer distinct items are
/// selected. Fails with [`CoverError::InvalidTopK`] when `top_k` is 0 and
/// with [`CoverError::InvalidConfig`] when a candidate's genotype length
/// differs from the dataset's item count.
pub fn rank_items(
    population: &[Candidate],
    top_k: usize,
    dataset: &Dataset,
) -> Result<Vec<RankedItem>> {
    if top_k == 0 {
        return Err(CoverError::InvalidTopK(top_k));
    }
    if let Some(bad) = population
        .iter()
        .find(|c| c.genes().len() != dataset.num_items())
    {
        return Err(CoverError::InvalidConfig(format!(
            "candidate has {} genes but the dataset has {} items",
            bad.genes().len(),
            dataset.num_items()
        )));
    }

    let best = select_best(population, top_k);

    let mut seen = vec![false; dataset.num_items()];
    let mut candidates = Vec::new();
    for candidate in &best {
        for item in candidate.selected() {
            if !seen[item] {
                seen[item] = true;
                candidates.push(item);
            }
        }
    }

    let coverage = dataset.coverage();
    candidates.sort_by(|&a, &b| coverage.count(b).cmp(&coverage.count(a)));
    candidates.truncate(top_k);

    debug!(
        individuals = best.len(),
        ranked = candidates.len(),
        top_k,
        "ranked items"
    );

    Ok(candidates
        .into_iter()
        .map(|item| RankedItem {
            item: dataset.item(item).to_string(),
            elements: dataset.covered_elements(item),
            count: coverage.count(item),
        })
        .collect())
}
