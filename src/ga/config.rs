//! Parameters of the walk-evolving genetic algorithm.

use super::selection::Selection;
use crate::context::SearchContext;
use crate::error::ParameterError;

const KEYS: &[&str] = &[
    "population_size",
    "max_generations",
    "genome_length",
    "selection",
    "tournament_size",
    "elite_ratio",
    "crossover_rate",
    "mutation_rate",
    "stagnation_limit",
    "stop_on_goal",
    "seed",
    "time_limit_ms",
    "parallel",
];

/// Genetic algorithm settings, built from defaults or a [`SearchContext`].
///
/// ```
/// use u_search::ga::{GaConfig, Selection};
/// use u_search::SearchContext;
///
/// let ctx = SearchContext::parse("population_size=40,selection=rank,seed=3").unwrap();
/// let config = GaConfig::from_context(&ctx).unwrap();
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.selection, Selection::Rank);
/// assert_eq!(config.genome_length, 64);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    pub population_size: usize,

    /// The run ends `IterationLimit` after this many generations.
    pub max_generations: usize,

    /// Genes per genome, i.e. the longest walk an individual can encode.
    pub genome_length: usize,

    pub selection: Selection,

    /// Fraction of the population copied unchanged to the next generation.
    pub elite_ratio: f64,

    /// Chance that two parents are recombined; otherwise they are copied.
    pub crossover_rate: f64,

    /// Chance that a child has one gene redrawn.
    pub mutation_rate: f64,

    /// Generations without a strictly better best before ending
    /// `Stagnation`. `0` disables the check.
    pub stagnation_limit: usize,

    /// Stop as soon as the best individual reaches a goal.
    pub stop_on_goal: bool,

    /// Evaluate individuals with rayon. Ignored without the `parallel`
    /// feature.
    pub parallel: bool,

    /// `None` draws a seed and logs it.
    pub seed: Option<u64>,

    /// Checked between generations, so a run can overshoot by one
    /// generation.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            genome_length: 64,
            selection: Selection::default(),
            elite_ratio: 0.1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            stagnation_limit: 50,
            stop_on_goal: true,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_genome_length(mut self, n: usize) -> Self {
        self.genome_length = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_stop_on_goal(mut self, stop: bool) -> Self {
        self.stop_on_goal = stop;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Reads a configuration from search context keys, falling back to the
    /// defaults for absent keys. Rates are range-checked rather than clamped.
    pub fn from_context(ctx: &SearchContext) -> Result<Self, ParameterError> {
        ctx.warn_unknown("genetic", KEYS);
        let defaults = Self::default();

        let tournament_size = ctx.usize_or("tournament_size", 3)?;
        let selection = match ctx.get_string("selection") {
            None => Selection::Tournament(tournament_size),
            Some(name) => Selection::from_name(name, tournament_size).ok_or_else(|| {
                ParameterError::Invalid {
                    key: "selection".to_string(),
                    value: name.to_string(),
                    expected: "one of tournament, roulette, rank",
                }
            })?,
        };

        let config = Self {
            population_size: ctx.usize_or("population_size", defaults.population_size)?,
            max_generations: ctx.usize_or("max_generations", defaults.max_generations)?,
            genome_length: ctx.usize_or("genome_length", defaults.genome_length)?,
            selection,
            elite_ratio: ctx.float_or("elite_ratio", defaults.elite_ratio)?,
            crossover_rate: ctx.float_or("crossover_rate", defaults.crossover_rate)?,
            mutation_rate: ctx.float_or("mutation_rate", defaults.mutation_rate)?,
            stagnation_limit: ctx.usize_or("stagnation_limit", defaults.stagnation_limit)?,
            stop_on_goal: ctx.bool_or("stop_on_goal", defaults.stop_on_goal)?,
            parallel: ctx.bool_or("parallel", defaults.parallel)?,
            seed: ctx.get_u64("seed")?,
            time_limit_ms: ctx.get_u64("time_limit_ms")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.population_size < 2 {
            return Err(ParameterError::out_of_range(
                "population_size",
                "must be at least 2",
            ));
        }
        if self.max_generations == 0 {
            return Err(ParameterError::out_of_range(
                "max_generations",
                "must be at least 1",
            ));
        }
        if self.genome_length == 0 {
            return Err(ParameterError::out_of_range(
                "genome_length",
                "must be at least 1",
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(ParameterError::out_of_range(
                "tournament_size",
                "must be at least 1",
            ));
        }
        for (key, value) in [
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParameterError::out_of_range(
                    key,
                    format!("must lie in [0, 1], got {value}"),
                ));
            }
        }
        let elite_count = (self.population_size as f64 * self.elite_ratio) as usize;
        if elite_count >= self.population_size {
            return Err(ParameterError::out_of_range(
                "elite_ratio",
                "elites fill the entire population",
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ParameterError::out_of_range(
                "time_limit_ms",
                "must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert!((config.elite_ratio - 0.1).abs() < 1e-10);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 50);
        assert!(config.stop_on_goal);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_max_generations(1000)
            .with_genome_length(12)
            .with_selection(Selection::Rank)
            .with_elite_ratio(0.2)
            .with_mutation_rate(0.05)
            .with_stop_on_goal(false)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.genome_length, 12);
        assert_eq!(config.selection, Selection::Rank);
        assert!((config.elite_ratio - 0.2).abs() < 1e-10);
        assert!(!config.stop_on_goal);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_elite_ratio(1.5)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);

        assert!((config.elite_ratio - 1.0).abs() < 1e-10);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(GaConfig::default().validate().is_ok());
        assert!(GaConfig::default().with_population_size(1).validate().is_err());
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
        assert!(GaConfig::default().with_genome_length(0).validate().is_err());
        assert!(GaConfig::default().with_tournament_size(0).validate().is_err());
        assert!(GaConfig::default().with_time_limit_ms(0).validate().is_err());
        let elites = GaConfig::default()
            .with_population_size(10)
            .with_elite_ratio(1.0);
        assert!(elites.validate().is_err());
    }

    #[test]
    fn test_from_context() {
        let ctx = SearchContext::parse(
            "population_size=30,selection=roulette,genome_length=8,seed=5,stop_on_goal=no",
        )
        .unwrap();
        let config = GaConfig::from_context(&ctx).unwrap();
        assert_eq!(config.population_size, 30);
        assert_eq!(config.selection, Selection::Roulette);
        assert_eq!(config.genome_length, 8);
        assert_eq!(config.seed, Some(5));
        assert!(!config.stop_on_goal);

        let ctx = SearchContext::parse("tournament_size=6").unwrap();
        let config = GaConfig::from_context(&ctx).unwrap();
        assert_eq!(config.selection, Selection::Tournament(6));
    }

    #[test]
    fn test_from_context_errors() {
        let bad = |s: &str| GaConfig::from_context(&SearchContext::parse(s).unwrap());
        assert!(matches!(
            bad("selection=lottery"),
            Err(ParameterError::Invalid { .. })
        ));
        assert!(matches!(
            bad("mutation_rate=1.5"),
            Err(ParameterError::OutOfRange { .. })
        ));
        assert!(matches!(
            bad("population_size=many"),
            Err(ParameterError::Invalid { .. })
        ));
    }
}
