//! Frontier disciplines of the best-first family.

use crate::environment::Cost;
use crate::frontier::Frontier;

/// Which node the frontier hands out next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Shallowest first (FIFO).
    BreadthFirst,
    /// Deepest first (LIFO).
    DepthFirst,
    /// Cheapest `g` first.
    UniformCost,
    /// Cheapest `g + w * h` first.
    AStar,
    /// Cheapest `h` first.
    Greedy,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::UniformCost => "ucs",
            Strategy::AStar => "astar",
            Strategy::Greedy => "greedy",
        }
    }

    pub fn needs_heuristic(self) -> bool {
        matches!(self, Strategy::AStar | Strategy::Greedy)
    }

    /// Cost-ordered strategies keep a best-`g` map and a closed set; the
    /// others admit each state to the frontier at most once.
    pub(crate) fn tracks_path_cost(self) -> bool {
        matches!(self, Strategy::UniformCost | Strategy::AStar)
    }

    pub(crate) fn frontier(self) -> Frontier {
        match self {
            Strategy::BreadthFirst => Frontier::fifo(),
            Strategy::DepthFirst => Frontier::lifo(),
            Strategy::UniformCost | Strategy::AStar | Strategy::Greedy => Frontier::priority(),
        }
    }

    /// Frontier priority of a node with path cost `g` and estimate `h`.
    pub(crate) fn priority(self, g: Cost, h: Cost, weight: f64) -> f64 {
        match self {
            Strategy::BreadthFirst | Strategy::DepthFirst => 0.0,
            Strategy::UniformCost => g,
            Strategy::AStar => g + weight * h,
            Strategy::Greedy => h,
        }
    }
}
