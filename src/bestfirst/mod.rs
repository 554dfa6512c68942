//! Best-first graph search: BFS, DFS, uniform-cost, A* and greedy.
//!
//! All five share one loop over an open list of node ids
//! and a parent-pointer [`SearchTree`](crate::frontier::SearchTree); only
//! the frontier discipline and the duplicate policy differ.
//!
//! | strategy | pops first | duplicates |
//! |----------|------------|------------|
//! | BFS | oldest | once; again if reached shallower under `max_depth` |
//! | DFS | newest (first transition explored first) | once; again if reached shallower under `max_depth` |
//! | UCS | lowest `g` | best-`g` map, stale entries skipped, closed set |
//! | A* | lowest `g + w*h` | as UCS |
//! | greedy | lowest `h` | as BFS |
//!
//! Ties pop in insertion order. The goal test runs when a node is popped.
//!
//! A* returns cost-optimal paths when the heuristic is admissible and
//! consistent and `weight <= 1`. Closed states are never reopened, so an
//! inconsistent heuristic may yield a suboptimal (but valid) path.
//!
//! # References
//!
//! - Hart, Nilsson & Raphael (1968), "A Formal Basis for the Heuristic
//!   Determination of Minimum Cost Paths"
//! - Pohl (1970), "Heuristic Search Viewed as Path Finding in a Graph"

mod config;
mod runner;
mod types;

pub use config::BestFirstConfig;
pub use runner::BestFirstRunner;
pub use types::Strategy;
