//! Maximum-coverage subset selection with a genetic algorithm.
//!
//! Given a dataset of `(item, element)` pairs (typically drugs and the
//! targets they act on), find a small set of items that together cover as
//! much of the element universe as possible, rank the items found, and
//! report which of them share coverage.
//!
//! - **Dataset**: immutable item/element table with a precomputed coverage map
//! - **GA**: generic generational genetic algorithm with pluggable
//!   selection, crossover and mutation strategies
//! - **Cover**: coverage fitness, top-k ranking, and pairwise combination
//!   analysis on top of the GA
//! - **Progress**: one-way progress notifications from a run to its caller
//! - **Report**: CSV export of ranked items and combinations
//!
//! # Example
//!
//! ```
//! use u_cover::cover::CoverageSession;
//! use u_cover::dataset::Dataset;
//! use u_cover::ga::GaConfig;
//! use u_cover::progress::NoProgress;
//!
//! let dataset = Dataset::from_pairs([
//!     ("A", "t1"), ("A", "t2"),
//!     ("B", "t2"), ("B", "t3"),
//!     ("C", "t4"),
//! ]).unwrap();
//!
//! let config = GaConfig::default().with_population_size(50).with_max_generations(10);
//! let report = CoverageSession::with_config(2, config).run(&dataset, &NoProgress).unwrap();
//! assert!(report.ranked.len() <= 2);
//! ```

pub mod cover;
pub mod dataset;
pub mod error;
pub mod ga;
pub mod progress;
pub mod report;

pub use error::{CoverError, Result};
