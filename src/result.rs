//! Search diagnostics.
//!
//! [`SearchResult`] is produced once per algorithm run and is immutable
//! afterwards. [`SearchReport`] is its type-erased, printable form: action
//! labels become strings and the environment/algorithm names are attached.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::environment::Cost;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// A state satisfying the goal test was reached.
    GoalReached,
    /// Every reachable state (within the depth limit, if any) was expanded.
    FrontierExhausted,
    /// The frontier emptied but some nodes were cut off by `max_depth`.
    DepthLimit,
    /// `max_expansions` was reached.
    ExpansionLimit,
    /// `time_limit_ms` elapsed.
    TimeLimit,
    /// `max_iterations` or `max_generations` was reached.
    IterationLimit,
    /// No neighbour improves on the current state.
    LocalOptimum,
    /// The current state has no transitions.
    DeadEnd,
    /// No improvement within the stagnation window.
    Stagnation,
    /// The annealing temperature dropped below its floor.
    Frozen,
}

impl Termination {
    pub fn as_str(self) -> &'static str {
        match self {
            Termination::GoalReached => "goal-reached",
            Termination::FrontierExhausted => "frontier-exhausted",
            Termination::DepthLimit => "depth-limit",
            Termination::ExpansionLimit => "expansion-limit",
            Termination::TimeLimit => "time-limit",
            Termination::IterationLimit => "iteration-limit",
            Termination::LocalOptimum => "local-optimum",
            Termination::DeadEnd => "dead-end",
            Termination::Stagnation => "stagnation",
            Termination::Frozen => "frozen",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one algorithm run.
///
/// On failure `path` is empty and `cost` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<A> {
    pub success: bool,
    /// Actions from the initial state to the goal, in order.
    pub path: Vec<A>,
    /// Sum of the step costs along `path`.
    pub cost: Cost,
    /// States whose goal test ran and whose transitions were requested.
    pub expanded: usize,
    /// The initial state plus every successor produced by a transition.
    pub generated: usize,
    pub elapsed: Duration,
    pub termination: Termination,
}

impl<A> SearchResult<A> {
    pub fn success(
        path: Vec<A>,
        cost: Cost,
        expanded: usize,
        generated: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            path,
            cost,
            expanded,
            generated,
            elapsed,
            termination: Termination::GoalReached,
        }
    }

    pub fn failure(
        termination: Termination,
        expanded: usize,
        generated: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: false,
            path: Vec::new(),
            cost: 0.0,
            expanded,
            generated,
            elapsed,
            termination,
        }
    }

    /// Replaces every action by its display label.
    pub fn labeled(&self) -> SearchResult<String>
    where
        A: fmt::Display,
    {
        SearchResult {
            success: self.success,
            path: self.path.iter().map(ToString::to_string).collect(),
            cost: self.cost,
            expanded: self.expanded,
            generated: self.generated,
            elapsed: self.elapsed,
            termination: self.termination,
        }
    }
}

/// Printable diagnostics for one run.
///
/// The `Display` form is one `key: value` line per field, in a fixed order,
/// so reports can be grepped and diffed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub environment: String,
    pub algorithm: String,
    pub success: bool,
    pub path: Vec<String>,
    pub cost: Cost,
    pub expanded: usize,
    pub generated: usize,
    pub elapsed_ms: f64,
    pub termination: Termination,
}

impl SearchReport {
    pub fn new(
        environment: impl Into<String>,
        algorithm: impl Into<String>,
        result: SearchResult<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            algorithm: algorithm.into(),
            success: result.success,
            path: result.path,
            cost: result.cost,
            expanded: result.expanded,
            generated: result.generated,
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
            termination: result.termination,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "environment: {}", self.environment)?;
        writeln!(f, "algorithm: {}", self.algorithm)?;
        writeln!(f, "success: {}", self.success)?;
        if self.path.is_empty() {
            writeln!(f, "path: -")?;
        } else {
            writeln!(f, "path: {}", self.path.join(" -> "))?;
        }
        writeln!(f, "steps: {}", self.path.len())?;
        writeln!(f, "cost: {}", self.cost)?;
        writeln!(f, "expanded: {}", self.expanded)?;
        writeln!(f, "generated: {}", self.generated)?;
        writeln!(f, "elapsed_ms: {:.3}", self.elapsed_ms)?;
        write!(f, "termination: {}", self.termination)
    }
}
