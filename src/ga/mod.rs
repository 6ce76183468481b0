//! Genetic Algorithm engine.
//!
//! A generic generational GA built on trait-based abstractions. A problem
//! implements [`GaProblem`] (random initialization and evaluation); parent
//! selection, crossover and mutation are pluggable strategies.
//!
//! # Core Traits
//!
//! - [`Individual`]: A fixed-length genotype with a cached fitness
//! - [`GaProblem`]: Problem definition: initialization and evaluation
//! - [`CrossoverOperator`] / [`MutationOperator`]: variation strategies
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, seed)
//! - [`Selection`]: Parent selection strategy
//! - [`GaRunner`]: Executes the generational loop
//! - [`GaResult`]: Final population and run statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use operators::{
    CrossoverOperator, FlipBitMutation, MutationOperator, OnePointCrossover, TwoPointCrossover,
    UniformCrossover,
};
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use selection::{select_best, Selection};
pub use types::{Fitness, GaProblem, Individual};
