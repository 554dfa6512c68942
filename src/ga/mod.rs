//! Genetic Algorithm.
//!
//! A generic GA engine built on trait-based abstractions, plus the walk
//! encoding that applies it to environments. A problem implements
//! [`GaProblem`], which specifies how to create, evaluate, recombine and
//! mutate individuals.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, selection, rates)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`Genome`]: Gene choices replayed as a walk from the initial state
//! - [`PathFitness`]: Reached goal, then heuristic at the walk's end, then cost
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod runner;
mod selection;
mod types;
mod walk;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual, PathFitness};
pub use walk::Genome;
