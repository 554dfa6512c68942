//! State-space search benchmarking harness.
//!
//! Runs one search algorithm against one environment and reports whether a
//! goal was reached, the action path, its cost, the nodes expanded and
//! generated, and the elapsed time.
//!
//! - **Best-first family**: breadth-first, depth-first, uniform-cost, A*
//!   (optionally weighted) and greedy best-first, sharing one loop over a
//!   priority frontier and a parent-pointer tree.
//! - **Hill Climbing**: steepest descent on the heuristic with optional
//!   sideways moves.
//! - **Simulated Annealing (SA)**: random moves under Metropolis acceptance
//!   with pluggable cooling schedules.
//! - **Tabu Search (TS)**: best admissible neighbour with a short-term
//!   memory of recently left states.
//! - **Genetic Algorithm (GA)**: fixed-length genomes decoded as walks from
//!   the initial state.
//!
//! Environments implement [`Environment`]; graphs, grid worlds and sliding
//! puzzles ship with the crate and can be loaded from JSON. Algorithms are
//! configured through a [`SearchContext`] of `key=value` parameters.
//!
//! # Example
//!
//! ```
//! use u_search::{Algorithm, AlgorithmKind, GraphEnvironment, SearchContext};
//!
//! let env = GraphEnvironment::romania();
//! let result = AlgorithmKind::AStar.run(&SearchContext::new(), &env).unwrap();
//! assert!(result.success);
//! assert_eq!(result.cost, 418.0);
//! ```

pub mod algorithm;
pub mod bestfirst;
pub mod budget;
pub mod context;
pub mod environment;
pub mod error;
pub mod frontier;
pub mod ga;
pub mod hill;
pub mod plan;
pub mod registry;
pub mod result;
pub mod sa;
pub mod tabu;
pub mod trajectory;

pub use algorithm::{Algorithm, AlgorithmKind};
pub use context::SearchContext;
pub use environment::{
    load_environment, load_environment_file, AnyEnvironment, Cost, Environment, GraphEnvironment,
    GridWorld, SlidingPuzzle, Transition,
};
pub use error::{LoadError, ParameterError, SearchError, ValidationError};
pub use plan::{BenchmarkPlan, PlanError, PlanSummary};
pub use registry::Registry;
pub use result::{SearchReport, SearchResult, Termination};
