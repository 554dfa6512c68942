//! Best-first search configuration.

use super::types::Strategy;
use crate::context::SearchContext;
use crate::error::ParameterError;

/// Limits and weighting for a best-first run.
///
/// # Examples
///
/// ```
/// use u_search::bestfirst::BestFirstConfig;
///
/// let config = BestFirstConfig::default()
///     .with_max_expansions(10_000)
///     .with_weight(1.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BestFirstConfig {
    /// Stop after this many expansions. `None` = unbounded.
    pub max_expansions: Option<usize>,

    /// Nodes at this depth are goal-tested but not expanded.
    pub max_depth: Option<usize>,

    /// Wall-clock cap in milliseconds.
    pub time_limit_ms: Option<u64>,

    /// Heuristic weight for A*. Values above 1 trade optimality for speed.
    pub weight: f64,
}

impl Default for BestFirstConfig {
    fn default() -> Self {
        Self {
            max_expansions: None,
            max_depth: None,
            time_limit_ms: None,
            weight: 1.0,
        }
    }
}

const KEYS: &[&str] = &["max_expansions", "max_depth", "time_limit_ms"];
const ASTAR_KEYS: &[&str] = &["max_expansions", "max_depth", "time_limit_ms", "weight"];

impl BestFirstConfig {
    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = Some(n);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Reads the keys `strategy` understands and warns about the rest.
    pub fn from_context(strategy: Strategy, ctx: &SearchContext) -> Result<Self, ParameterError> {
        let known = if strategy == Strategy::AStar {
            ASTAR_KEYS
        } else {
            KEYS
        };
        ctx.warn_unknown(strategy.name(), known);

        let mut config = Self {
            max_expansions: ctx.get_usize("max_expansions")?,
            max_depth: ctx.get_usize("max_depth")?,
            time_limit_ms: ctx.get_u64("time_limit_ms")?,
            ..Self::default()
        };
        if strategy == Strategy::AStar {
            config.weight = ctx.float_or("weight", 1.0)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.weight <= 0.0 || !self.weight.is_finite() {
            return Err(ParameterError::out_of_range(
                "weight",
                format!("must be finite and positive, got {}", self.weight),
            ));
        }
        Ok(())
    }
}
