//! Steepest-descent hill climbing on the environment heuristic.
//!
//! Keeps a single current state and always moves to its best neighbour.
//! Sideways moves let the climb cross plateaus; without them the run stops
//! at the first state no neighbour improves on.
//!
//! # References
//!
//! - Russell & Norvig, *Artificial Intelligence: A Modern Approach*, ch. 4.1

mod config;
mod runner;

pub use config::HillConfig;
pub use runner::HillRunner;
