//! Maximum-coverage selection.
//!
//! Given items that each cover part of a universe of elements, search for
//! a small set of items that together cover as much as possible, rank the
//! items found, and report which pairs of them overlap.
//!
//! # Pipeline
//!
//! 1. [`CoverageProblem`]: items as a bitstring, fitness = union size
//!    ([`CoverageEvaluator`])
//! 2. [`GaRunner`](crate::ga::GaRunner): generational search producing a
//!    final population of [`Candidate`]s
//! 3. [`rank_items`]: best `top_k` candidates → ranked [`RankedItem`]s
//! 4. [`analyze_combinations`]: ranked items → overlapping pairs
//!
//! [`CoverageSession`] runs steps 1–3 and returns a [`CoverageReport`]
//! from which step 4 is available.

mod combination;
mod problem;
mod ranker;
mod session;

pub use combination::{analyze_combinations, Combination};
pub use problem::{Candidate, CoverageEvaluator, CoverageProblem};
pub use ranker::{rank_items, RankedItem};
pub use session::{CoverageReport, CoverageSession};
