//! Error types for u-cover.
//!
//! Every failure is detected before or at the start of the stage that
//! would be affected, so no stage ever leaves partial output behind.

use thiserror::Error;

/// Errors raised while loading data, configuring, or running a coverage search.
#[derive(Debug, Error)]
pub enum CoverError {
    /// A required column is missing from the tabular input.
    #[error("missing required column '{column}'")]
    Schema { column: String },

    /// The input produced no items after parsing.
    #[error("dataset contains no items")]
    EmptyDataset,

    /// A run parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `top_k` must be at least 1 when ranking.
    #[error("top_k must be positive, got {0}")]
    InvalidTopK(usize),

    /// File extension the loader does not read.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// The run was cancelled at a generation boundary.
    #[error("run cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoverError>;
