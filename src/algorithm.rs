//! The algorithm contract and the closed set of shipped algorithms.
//!
//! [`AlgorithmKind`] reads its configuration from a [`SearchContext`] and
//! dispatches to the matching runner. Runners can also be called directly
//! with a typed config.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::bestfirst::{BestFirstConfig, BestFirstRunner, Strategy};
use crate::context::SearchContext;
use crate::environment::Environment;
use crate::error::SearchError;
use crate::ga::{GaConfig, GaRunner};
use crate::hill::{HillConfig, HillRunner};
use crate::result::SearchResult;
use crate::sa::{SaConfig, SaRunner};
use crate::tabu::{TabuConfig, TabuRunner};

/// A search algorithm that can run on any environment.
pub trait Algorithm {
    /// Name used in reports and registry lookups.
    fn name(&self) -> &'static str;

    /// Runs the algorithm on `env`, configured from `ctx`.
    ///
    /// Not finding a goal is `Ok` with `success == false`; `Err` is reserved
    /// for bad parameters and violated preconditions.
    fn run<E: Environment>(
        &self,
        ctx: &SearchContext,
        env: &E,
    ) -> Result<SearchResult<E::Action>, SearchError>;
}

/// Every algorithm this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    AStar,
    Greedy,
    HillClimbing,
    SimulatedAnnealing,
    Tabu,
    Genetic,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 9] = [
        AlgorithmKind::BreadthFirst,
        AlgorithmKind::DepthFirst,
        AlgorithmKind::UniformCost,
        AlgorithmKind::AStar,
        AlgorithmKind::Greedy,
        AlgorithmKind::HillClimbing,
        AlgorithmKind::SimulatedAnnealing,
        AlgorithmKind::Tabu,
        AlgorithmKind::Genetic,
    ];

    /// The best-first strategy behind this kind, if it is one.
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            AlgorithmKind::BreadthFirst => Some(Strategy::BreadthFirst),
            AlgorithmKind::DepthFirst => Some(Strategy::DepthFirst),
            AlgorithmKind::UniformCost => Some(Strategy::UniformCost),
            AlgorithmKind::AStar => Some(Strategy::AStar),
            AlgorithmKind::Greedy => Some(Strategy::Greedy),
            _ => None,
        }
    }

    /// Whether the algorithm fails with `MissingCapability` on an
    /// environment without a heuristic.
    pub fn needs_heuristic(self) -> bool {
        match self.strategy() {
            Some(strategy) => strategy.needs_heuristic(),
            None => true,
        }
    }

    /// Looks up a kind by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl Algorithm for AlgorithmKind {
    fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::BreadthFirst => Strategy::BreadthFirst.name(),
            AlgorithmKind::DepthFirst => Strategy::DepthFirst.name(),
            AlgorithmKind::UniformCost => Strategy::UniformCost.name(),
            AlgorithmKind::AStar => Strategy::AStar.name(),
            AlgorithmKind::Greedy => Strategy::Greedy.name(),
            AlgorithmKind::HillClimbing => "hill-climbing",
            AlgorithmKind::SimulatedAnnealing => "simulated-annealing",
            AlgorithmKind::Tabu => "tabu",
            AlgorithmKind::Genetic => "genetic",
        }
    }

    fn run<E: Environment>(
        &self,
        ctx: &SearchContext,
        env: &E,
    ) -> Result<SearchResult<E::Action>, SearchError> {
        let best_first = |strategy: Strategy| -> Result<SearchResult<E::Action>, SearchError> {
            let config = BestFirstConfig::from_context(strategy, ctx)?;
            BestFirstRunner::run(env, strategy, &config)
        };
        match self {
            AlgorithmKind::BreadthFirst => best_first(Strategy::BreadthFirst),
            AlgorithmKind::DepthFirst => best_first(Strategy::DepthFirst),
            AlgorithmKind::UniformCost => best_first(Strategy::UniformCost),
            AlgorithmKind::AStar => best_first(Strategy::AStar),
            AlgorithmKind::Greedy => best_first(Strategy::Greedy),
            AlgorithmKind::HillClimbing => HillRunner::run(env, &HillConfig::from_context(ctx)?),
            AlgorithmKind::SimulatedAnnealing => SaRunner::run(env, &SaConfig::from_context(ctx)?),
            AlgorithmKind::Tabu => TabuRunner::run(env, &TabuConfig::from_context(ctx)?),
            AlgorithmKind::Genetic => GaRunner::run(env, &GaConfig::from_context(ctx)?),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The generator for one randomised run.
///
/// Without a seed one is drawn from the thread RNG and logged, so the run
/// can be repeated with `seed=<value>`.
pub(crate) fn seeded_rng(algorithm: &str, seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| {
        let drawn: u64 = rand::random();
        info!(algorithm, seed = drawn, "no seed given, drew one");
        drawn
    });
    StdRng::seed_from_u64(seed)
}
