//! Simulated Annealing (SA).
//!
//! A single-state trajectory method inspired by the physical annealing
//! process. The environment heuristic plays the role of energy: worsening
//! moves are accepted with a probability that decreases with the
//! temperature, so the walk can escape local optima early on and settles
//! as it cools.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::SaRunner;
