//! Hill climbing configuration.

use crate::context::SearchContext;
use crate::error::ParameterError;

/// Configuration for steepest-descent hill climbing.
///
/// # Examples
///
/// ```
/// use u_search::hill::HillConfig;
///
/// let config = HillConfig::default()
///     .with_max_iterations(500)
///     .with_max_sideways(20);
/// assert_eq!(config.max_sideways, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HillConfig {
    /// Maximum number of examined states.
    pub max_iterations: usize,

    /// Consecutive moves to an equally good neighbour allowed on a plateau.
    pub max_sideways: usize,

    /// Wall-clock cap in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for HillConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_sideways: 0,
            time_limit_ms: None,
        }
    }
}

impl HillConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_sideways(mut self, n: usize) -> Self {
        self.max_sideways = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn from_context(ctx: &SearchContext) -> Result<Self, ParameterError> {
        ctx.warn_unknown(
            "hill-climbing",
            &["max_iterations", "max_sideways", "time_limit_ms"],
        );
        let defaults = Self::default();
        let config = Self {
            max_iterations: ctx.usize_or("max_iterations", defaults.max_iterations)?,
            max_sideways: ctx.usize_or("max_sideways", defaults.max_sideways)?,
            time_limit_ms: ctx.get_u64("time_limit_ms")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_iterations == 0 {
            return Err(ParameterError::out_of_range(
                "max_iterations",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
