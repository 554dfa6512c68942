//! Tabu search limits and memory size.

use crate::context::SearchContext;
use crate::error::ParameterError;

/// ```
/// use u_search::tabu::TabuConfig;
///
/// let config = TabuConfig::default().with_tabu_tenure(12).with_aspiration(false);
/// assert_eq!(config.max_iterations, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TabuConfig {
    /// Moves before ending `IterationLimit`.
    pub max_iterations: usize,
    /// How many recently left states stay forbidden.
    pub tabu_tenure: usize,
    /// Whether a tabu state may be entered when its heuristic beats the
    /// best seen so far.
    pub aspiration: bool,
    /// Moves without a new best heuristic before ending `Stagnation`.
    pub max_no_improve: usize,
    /// Wall-clock cap in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tabu_tenure: 7,
            aspiration: true,
            max_no_improve: 200,
            time_limit_ms: None,
        }
    }
}

impl TabuConfig {
    /// Parameter keys read by [`from_context`](Self::from_context).
    pub const KEYS: &'static [&'static str] = &[
        "max_iterations",
        "tabu_tenure",
        "aspiration",
        "max_no_improve",
        "time_limit_ms",
    ];

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn from_context(ctx: &SearchContext) -> Result<Self, ParameterError> {
        ctx.warn_unknown("tabu", Self::KEYS);
        let defaults = Self::default();
        let config = Self {
            max_iterations: ctx.usize_or("max_iterations", defaults.max_iterations)?,
            tabu_tenure: ctx.usize_or("tabu_tenure", defaults.tabu_tenure)?,
            aspiration: ctx.bool_or("aspiration", defaults.aspiration)?,
            max_no_improve: ctx.usize_or("max_no_improve", defaults.max_no_improve)?,
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
        if self.max_no_improve == 0 {
            return Err(ParameterError::out_of_range(
                "max_no_improve",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_not_a_tabu_parameter() {
        let ctx = SearchContext::parse("seed=9,tabu_tenure=4").unwrap();
        assert_eq!(ctx.unknown_keys(TabuConfig::KEYS), vec!["seed"]);
        let config = TabuConfig::from_context(&ctx).unwrap();
        assert_eq!(config.tabu_tenure, 4);
    }

    #[test]
    fn test_tabu_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.max_iterations, 500);
        assert_eq!(config.tabu_tenure, 7);
        assert!(config.aspiration);
        assert_eq!(config.max_no_improve, 200);
    }

    #[test]
    fn test_tabu_config_builder() {
        let config = TabuConfig::default()
            .with_max_iterations(1000)
            .with_tabu_tenure(10)
            .with_aspiration(false)
            .with_max_no_improve(50);

        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tabu_tenure, 10);
        assert!(!config.aspiration);
        assert_eq!(config.max_no_improve, 50);
    }

    #[test]
    fn test_from_context() {
        let ctx = SearchContext::parse("tabu_tenure=3,aspiration=false").unwrap();
        let config = TabuConfig::from_context(&ctx).unwrap();
        assert_eq!(config.tabu_tenure, 3);
        assert!(!config.aspiration);

        let ctx = SearchContext::parse("aspiration=maybe").unwrap();
        assert!(TabuConfig::from_context(&ctx).is_err());
    }
}
