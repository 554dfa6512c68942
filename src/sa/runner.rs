//! SA execution loop.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::config::{CoolingSchedule, SaConfig};
use crate::algorithm::seeded_rng;
use crate::budget::Budget;
use crate::environment::{checked_heuristic, require_heuristic, Environment, Transition};
use crate::error::SearchError;
use crate::result::{SearchResult, Termination};
use crate::trajectory::Trajectory;

/// Executes simulated annealing over an environment.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from the initial state.
    ///
    /// Each iteration examines the current state: if it is a goal the run
    /// ends, otherwise one of its transitions is drawn uniformly and accepted
    /// by the Metropolis criterion on the heuristic difference.
    pub fn run<E: Environment>(
        env: &E,
        config: &SaConfig,
    ) -> Result<SearchResult<E::Action>, SearchError> {
        config.validate()?;
        require_heuristic(env)?;

        let mut rng = seeded_rng("simulated-annealing", config.seed);
        let budget = Budget::new(None, config.time_limit_ms.map(Duration::from_millis));
        debug!(
            environment = env.name(),
            cooling = config.cooling.name(),
            initial_temperature = config.initial_temperature,
            "search start"
        );

        let mut current = env.initial_state();
        let mut current_h = checked_heuristic(env, &current)?;
        let mut trajectory = Trajectory::new(current.clone());
        // Transitions of `current`, dropped whenever the state changes.
        let mut neighbours: Option<Vec<Transition<E::State, E::Action>>> = None;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut expanded = 0usize;
        let mut generated = 1usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let linear_max_steps = compute_linear_steps(config);
        let mut step = 0usize;

        let termination = 'outer: loop {
            if temperature <= config.min_temperature {
                break Termination::Frozen;
            }

            let inner_iters = match config.cooling {
                CoolingSchedule::LundyMees { .. } => 1,
                _ => config.iterations_per_temperature,
            };

            for _ in 0..inner_iters {
                if config.max_iterations > 0 && iterations >= config.max_iterations {
                    break 'outer Termination::IterationLimit;
                }
                if let Some(reason) = budget.exhausted(expanded) {
                    break 'outer reason;
                }
                iterations += 1;

                // A state is expanded once, when the walk first stands on it.
                if neighbours.is_none() {
                    expanded += 1;
                    if env.is_goal(&current) {
                        let (path, cost) = trajectory.into_path();
                        let result = SearchResult::success(
                            path,
                            cost,
                            expanded,
                            generated,
                            budget.elapsed(),
                        );
                        log_end(env, &result, iterations, accepted_moves, improving_moves);
                        return Ok(result);
                    }
                }
                let candidates = neighbours.get_or_insert_with(|| {
                    let t = env.transitions(&current);
                    generated += t.len();
                    t
                });
                if candidates.is_empty() {
                    break 'outer Termination::DeadEnd;
                }

                let pick = rng.random_range(0..candidates.len());
                let next_h = checked_heuristic(env, &candidates[pick].state)?;
                let delta = next_h - current_h;

                // Metropolis acceptance criterion
                let accept = if delta < 0.0 {
                    improving_moves += 1;
                    true
                } else {
                    let probability = (-delta / temperature).exp();
                    rng.random_range(0.0..1.0) < probability
                };

                if accept {
                    if let Some(mut moves) = neighbours.take() {
                        let chosen = moves.swap_remove(pick);
                        trajectory.push(chosen.action, chosen.state.clone(), chosen.cost);
                        current = chosen.state;
                        current_h = next_h;
                        accepted_moves += 1;
                    }
                }
            }

            temperature = cool(temperature, config, step, linear_max_steps);
            step += 1;
        };

        // The last accepted move may have landed on a goal.
        if neighbours.is_none() && env.is_goal(&current) {
            let (path, cost) = trajectory.into_path();
            let result =
                SearchResult::success(path, cost, expanded + 1, generated, budget.elapsed());
            log_end(env, &result, iterations, accepted_moves, improving_moves);
            return Ok(result);
        }

        let result = SearchResult::failure(termination, expanded, generated, budget.elapsed());
        log_end(env, &result, iterations, accepted_moves, improving_moves);
        Ok(result)
    }
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &SaConfig, step: usize, linear_max_steps: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if linear_max_steps == 0 {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

/// Estimate the number of temperature steps for linear cooling.
fn compute_linear_steps(config: &SaConfig) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => {
            if config.max_iterations > 0 && config.iterations_per_temperature > 0 {
                config.max_iterations / config.iterations_per_temperature
            } else {
                1000
            }
        }
        _ => 0,
    }
}

fn log_end<E: Environment>(
    env: &E,
    result: &SearchResult<E::Action>,
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
) {
    info!(
        event = "search_end",
        algorithm = "simulated-annealing",
        environment = env.name(),
        success = result.success,
        cost = result.cost,
        expanded = result.expanded,
        generated = result.generated,
        iterations,
        accepted_moves,
        improving_moves,
        termination = %result.termination,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::testing::Line;
    use crate::environment::{replay_path, GraphEnvironment};

    #[test]
    fn test_sa_line_geometric() {
        let env = Line::new(20, 0, 15);
        let config = SaConfig::default()
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.95 })
            .with_iterations_per_temperature(50)
            .with_seed(42);

        let result = SaRunner::run(&env, &config).unwrap();

        assert!(result.success);
        let (end, cost) = replay_path(&env, &result.path).unwrap();
        assert_eq!(end, 15);
        assert!((cost - result.cost).abs() < 1e-12);
        assert!(result.expanded <= result.generated);
    }

    #[test]
    fn test_sa_romania_reaches_bucharest() {
        let env = GraphEnvironment::romania();
        let config = SaConfig::default().with_seed(7);
        let result = SaRunner::run(&env, &config).unwrap();
        assert!(result.success);
        let (end, _) = replay_path(&env, &result.path).unwrap();
        assert!(env.is_goal(&end));
    }

    #[test]
    fn test_sa_lundy_mees() {
        let t0 = 100.0;
        let t_min = 0.001;
        let max_iter = 5000;
        let beta = (t0 - t_min) / (max_iter as f64 * t0 * t_min);

        let env = Line::new(10, 0, 10);
        let config = SaConfig::default()
            .with_initial_temperature(t0)
            .with_min_temperature(t_min)
            .with_cooling(CoolingSchedule::LundyMees { beta })
            .with_max_iterations(max_iter)
            .with_seed(42);

        let result = SaRunner::run(&env, &config).unwrap();
        assert!(result.success);
    }

    #[test]
    fn test_sa_max_iterations_limit() {
        let env = Line::new(1000, 0, 1000);
        let config = SaConfig::default()
            .with_initial_temperature(1e10)
            .with_min_temperature(1e-15)
            .with_iterations_per_temperature(10)
            .with_max_iterations(100)
            .with_seed(42);

        let result = SaRunner::run(&env, &config).unwrap();

        assert!(!result.success);
        assert!(result.expanded <= 100);
        assert!(result.expanded <= result.generated);
        assert_eq!(result.termination, Termination::IterationLimit);
    }

    #[test]
    fn test_sa_freezes() {
        let env = Line::new(100, 0, 100);
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(0.5)
            .with_iterations_per_temperature(1)
            .with_seed(1);
        let result = SaRunner::run(&env, &config).unwrap();
        assert!(!result.success);
        assert_eq!(result.termination, Termination::Frozen);
    }

    #[test]
    fn test_sa_requires_heuristic() {
        let env = GraphEnvironment::disconnected();
        let config = SaConfig::default().with_seed(1);
        assert!(matches!(
            SaRunner::run(&env, &config),
            Err(SearchError::MissingCapability { .. })
        ));
    }

    #[test]
    fn test_sa_is_deterministic_with_seed() {
        let env = GraphEnvironment::romania();
        let config = SaConfig::default().with_seed(11);
        let a = SaRunner::run(&env, &config).unwrap();
        let b = SaRunner::run(&env, &config).unwrap();
        assert_eq!(a.path, b.path);
        assert_eq!(a.expanded, b.expanded);
        assert_eq!(a.generated, b.generated);
    }
}
