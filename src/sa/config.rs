//! Annealing parameters and the temperature schedules they select.

use crate::context::SearchContext;
use crate::error::ParameterError;

/// How the temperature falls between plateaus.
///
/// Selected with `cooling=geometric|linear|lundy-mees`. Lundy-Mees follows
/// Lundy & Mees (1986).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoolingSchedule {
    /// `T <- alpha * T` after each plateau.
    Geometric {
        /// In `(0, 1)`; values near 1 anneal slowly.
        alpha: f64,
    },

    /// Equal decrements reaching the floor after `max_iterations` moves
    /// (or a fixed number of plateaus when uncapped).
    Linear,

    /// `T <- T / (1 + beta * T)` after every single move.
    LundyMees {
        /// Derived from the temperatures and the iteration cap when the
        /// context omits it.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

impl CoolingSchedule {
    pub fn name(&self) -> &'static str {
        match self {
            CoolingSchedule::Geometric { .. } => "geometric",
            CoolingSchedule::Linear => "linear",
            CoolingSchedule::LundyMees { .. } => "lundy-mees",
        }
    }
}

/// Iteration budget assumed when deriving a Lundy-Mees `beta` without a
/// `max_iterations` cap.
const LUNDY_MEES_DEFAULT_ITERATIONS: usize = 10_000;

/// Configuration for simulated annealing over an environment.
///
/// The heuristic is the energy: moving from `h` to `h'` is accepted with
/// probability `min(1, exp(-(h' - h) / T))`.
///
/// # Examples
///
/// ```
/// use u_search::sa::{SaConfig, CoolingSchedule};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50.0)
///     .with_min_temperature(0.01)
///     .with_cooling(CoolingSchedule::LundyMees { beta: 0.002 })
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SaConfig {
    pub initial_temperature: f64,

    /// The run ends `Frozen` once the temperature reaches this floor.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Proposals per plateau. Lundy-Mees cools after every proposal and
    /// ignores this.
    pub iterations_per_temperature: usize,

    /// Cap on proposals; `0` leaves only the temperature floor.
    pub max_iterations: usize,

    /// `None` draws a seed and logs it.
    pub seed: Option<u64>,

    /// Wall-clock cap in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 100,
            max_iterations: 0,
            seed: None,
            time_limit_ms: None,
        }
    }
}

const KEYS: &[&str] = &[
    "initial_temperature",
    "min_temperature",
    "cooling",
    "alpha",
    "beta",
    "iterations_per_temperature",
    "max_iterations",
    "seed",
    "time_limit_ms",
];

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
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

    /// Reads the annealing keys from `ctx`.
    ///
    /// `cooling` is `geometric` (with `alpha`), `linear`, or `lundy-mees`
    /// (with `beta`; derived from the temperatures and `max_iterations`
    /// when absent).
    pub fn from_context(ctx: &SearchContext) -> Result<Self, ParameterError> {
        ctx.warn_unknown("simulated-annealing", KEYS);
        let defaults = Self::default();

        let mut config = Self {
            initial_temperature: ctx.float_or("initial_temperature", defaults.initial_temperature)?,
            min_temperature: ctx.float_or("min_temperature", defaults.min_temperature)?,
            cooling: defaults.cooling,
            iterations_per_temperature: ctx
                .usize_or("iterations_per_temperature", defaults.iterations_per_temperature)?,
            max_iterations: ctx.usize_or("max_iterations", defaults.max_iterations)?,
            seed: ctx.get_u64("seed")?,
            time_limit_ms: ctx.get_u64("time_limit_ms")?,
        };

        config.cooling = match ctx.get_string("cooling").unwrap_or("geometric") {
            "geometric" => CoolingSchedule::Geometric {
                alpha: ctx.float_or("alpha", 0.95)?,
            },
            "linear" => CoolingSchedule::Linear,
            "lundy-mees" | "lundy_mees" => {
                let beta = match ctx.get_float("beta")? {
                    Some(beta) => beta,
                    None => config.derived_beta(),
                };
                CoolingSchedule::LundyMees { beta }
            }
            other => {
                return Err(ParameterError::Invalid {
                    key: "cooling".to_string(),
                    value: other.to_string(),
                    expected: "one of geometric, linear, lundy-mees",
                })
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn derived_beta(&self) -> f64 {
        let iterations = if self.max_iterations > 0 {
            self.max_iterations
        } else {
            LUNDY_MEES_DEFAULT_ITERATIONS
        };
        let (t0, t_min) = (self.initial_temperature, self.min_temperature);
        (t0 - t_min) / (iterations as f64 * t0 * t_min)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.initial_temperature <= 0.0 {
            return Err(ParameterError::out_of_range(
                "initial_temperature",
                "must be positive",
            ));
        }
        if self.min_temperature <= 0.0 {
            return Err(ParameterError::out_of_range("min_temperature", "must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(ParameterError::out_of_range(
                "min_temperature",
                "must be less than initial_temperature",
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(ParameterError::out_of_range(
                "iterations_per_temperature",
                "must be at least 1",
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(ParameterError::out_of_range(
                        "alpha",
                        format!("geometric alpha must be in (0, 1), got {alpha}"),
                    ));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(ParameterError::out_of_range(
                        "beta",
                        format!("lundy-mees beta must be positive, got {beta}"),
                    ));
                }
            }
            CoolingSchedule::Linear => {}
        }
        Ok(())
    }
}
