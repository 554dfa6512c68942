//! Steepest-descent loop.

use std::time::Duration;

use tracing::{debug, info};

use super::config::HillConfig;
use crate::budget::Budget;
use crate::environment::{checked_heuristic, require_heuristic, Cost, Environment};
use crate::error::SearchError;
use crate::result::{SearchResult, Termination};
use crate::trajectory::Trajectory;

/// Executes hill climbing.
pub struct HillRunner;

impl HillRunner {
    /// Climbs down the heuristic from the initial state.
    ///
    /// At each state the neighbour with the lowest heuristic is taken (the
    /// first one on ties). A strictly better neighbour is always accepted; an
    /// equal one only while the sideways allowance lasts.
    pub fn run<E: Environment>(
        env: &E,
        config: &HillConfig,
    ) -> Result<SearchResult<E::Action>, SearchError> {
        config.validate()?;
        require_heuristic(env)?;
        let budget = Budget::new(None, config.time_limit_ms.map(Duration::from_millis));
        debug!(environment = env.name(), max_sideways = config.max_sideways, "search start");

        let mut current = env.initial_state();
        let mut current_h = checked_heuristic(env, &current)?;
        let mut trajectory = Trajectory::new(current.clone());
        let mut expanded = 0usize;
        let mut generated = 1usize;
        let mut sideways = 0usize;
        // Whether `current` still awaits its goal test.
        let mut pending = true;

        let termination = loop {
            if let Some(reason) = budget.exhausted(expanded) {
                break reason;
            }
            if expanded >= config.max_iterations {
                break Termination::IterationLimit;
            }
            expanded += 1;
            pending = false;

            if env.is_goal(&current) {
                let (path, cost) = trajectory.into_path();
                let result = SearchResult::success(path, cost, expanded, generated, budget.elapsed());
                log_end(env, &result);
                return Ok(result);
            }

            let successors = env.transitions(&current);
            generated += successors.len();
            if successors.is_empty() {
                break Termination::DeadEnd;
            }

            let mut best: Option<(usize, Cost)> = None;
            for (i, t) in successors.iter().enumerate() {
                let h = checked_heuristic(env, &t.state)?;
                if best.is_none_or(|(_, best_h)| h < best_h) {
                    best = Some((i, h));
                }
            }
            let Some((index, best_h)) = best else {
                break Termination::DeadEnd;
            };

            if best_h < current_h {
                sideways = 0;
            } else if best_h == current_h && sideways < config.max_sideways {
                sideways += 1;
            } else {
                break Termination::LocalOptimum;
            }

            let step = successors.into_iter().nth(index);
            if let Some(step) = step {
                trajectory.push(step.action, step.state.clone(), step.cost);
                current = step.state;
                current_h = best_h;
                pending = true;
            }
        };

        if pending && env.is_goal(&current) {
            let (path, cost) = trajectory.into_path();
            let result =
                SearchResult::success(path, cost, expanded + 1, generated, budget.elapsed());
            log_end(env, &result);
            return Ok(result);
        }

        let result = SearchResult::failure(termination, expanded, generated, budget.elapsed());
        log_end(env, &result);
        Ok(result)
    }
}

fn log_end<E: Environment>(env: &E, result: &SearchResult<E::Action>) {
    info!(
        event = "search_end",
        algorithm = "hill-climbing",
        environment = env.name(),
        success = result.success,
        cost = result.cost,
        expanded = result.expanded,
        generated = result.generated,
        termination = %result.termination,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::testing::{Line, Plateau};
    use crate::environment::{replay_path, GraphEnvironment};

    #[test]
    fn test_line_descends_to_goal() {
        let env = Line::new(10, 2, 7);
        let result = HillRunner::run(&env, &HillConfig::default()).unwrap();
        assert!(result.success);
        assert_eq!(result.path, vec![3, 4, 5, 6, 7]);
        assert!((result.cost - 5.0).abs() < 1e-12);
        assert_eq!(result.expanded, 6);
    }

    #[test]
    fn test_plateau_needs_sideways_moves() {
        let env = Plateau { width: 5 };
        let stuck = HillRunner::run(&env, &HillConfig::default()).unwrap();
        assert!(!stuck.success);
        assert_eq!(stuck.termination, Termination::LocalOptimum);

        let config = HillConfig::default().with_max_sideways(10);
        let crossed = HillRunner::run(&env, &config).unwrap();
        assert!(crossed.success);
        assert_eq!(crossed.path.len(), 5);
    }

    #[test]
    fn test_romania_greedy_descent() {
        let env = GraphEnvironment::romania();
        let result = HillRunner::run(&env, &HillConfig::default()).unwrap();
        assert!(result.success);
        let (end, cost) = replay_path(&env, &result.path).unwrap();
        assert!(env.is_goal(&end));
        assert!((cost - result.cost).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_limit() {
        let env = Line::new(100, 0, 100);
        let config = HillConfig::default().with_max_iterations(3);
        let result = HillRunner::run(&env, &config).unwrap();
        assert!(!result.success);
        assert_eq!(result.expanded, 3);
        assert_eq!(result.termination, Termination::IterationLimit);
    }

    #[test]
    fn test_requires_heuristic() {
        let env = GraphEnvironment::disconnected();
        assert!(matches!(
            HillRunner::run(&env, &HillConfig::default()),
            Err(SearchError::MissingCapability { .. })
        ));
    }
}
