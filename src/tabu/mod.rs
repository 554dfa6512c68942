//! Tabu Search (TS).
//!
//! A single-state trajectory method that uses a short-term memory (the tabu
//! list of recently left states) to forbid moving back, preventing cycling
//! and pushing the walk across plateaus and out of local minima.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search, Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;

pub use config::TabuConfig;
pub use runner::TabuRunner;
