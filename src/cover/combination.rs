//! Pairwise overlap between ranked items.

use super::ranker::RankedItem;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Two ranked items and the elements they both cover.
///
/// `first` always precedes `second` in the ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combination {
    pub first: String,
    pub second: String,
    /// Shared elements, in the order `first` lists them.
    pub shared: Vec<String>,
    /// `shared.len()`.
    pub count: usize,
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {} collectively target: {}",
            self.first,
            self.second,
            self.shared.join(", ")
        )
    }
}

/// Computes every pair of ranked items with at least one shared element.
///
/// Pairs are visited as `i` in ranked order, then `j > i`, and sorted by
/// shared count descending with that visiting order breaking ties. Fewer
/// than two items yield an empty list.
pub fn analyze_combinations(ranked: &[RankedItem]) -> Vec<Combination> {
    let sets: Vec<HashSet<&str>> = ranked
        .iter()
        .map(|r| r.elements.iter().map(String::as_str).collect())
        .collect();

    let mut combinations = Vec::new();
    for (i, a) in ranked.iter().enumerate() {
        for (j, b) in ranked.iter().enumerate().skip(i + 1) {
            let shared: Vec<String> = a
                .elements
                .iter()
                .filter(|e| sets[j].contains(e.as_str()))
                .cloned()
                .collect();
            if shared.is_empty() {
                continue;
            }
            combinations.push(Combination {
                first: a.item.clone(),
                second: b.item.clone(),
                count: shared.len(),
                shared,
            });
        }
    }

    combinations.sort_by(|x, y| y.count.cmp(&x.count));
    combinations
}
