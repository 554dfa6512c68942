//! Tabu search over environment states.
//!
//! Each move goes to the successor with the lowest heuristic that is not
//! in the tabu list, even when that is uphill. The state being left joins
//! the list for `tabu_tenure` moves. With aspiration, a tabu successor is
//! allowed when it beats the best heuristic seen so far.
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Glover, F. (1990). "Tabu Search, Part II", *ORSA Journal on Computing* 2(1), 4-32.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use tracing::{debug, info};

use super::config::TabuConfig;
use crate::budget::Budget;
use crate::environment::{checked_heuristic, require_heuristic, Cost, Environment};
use crate::error::SearchError;
use crate::result::{SearchResult, Termination};
use crate::trajectory::Trajectory;

pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search on `env`. Deterministic: ties go to the first
    /// transition offered.
    pub fn run<E: Environment>(
        env: &E,
        config: &TabuConfig,
    ) -> Result<SearchResult<E::Action>, SearchError> {
        config.validate()?;
        require_heuristic(env)?;
        let budget = Budget::new(None, config.time_limit_ms.map(Duration::from_millis));
        debug!(
            environment = env.name(),
            tabu_tenure = config.tabu_tenure,
            "search start"
        );

        let mut current = env.initial_state();
        let mut best_h = checked_heuristic(env, &current)?;
        let mut trajectory = Trajectory::new(current.clone());

        // Tabu list: FIFO queue of states with set for O(1) lookup
        let mut tabu_queue: VecDeque<E::State> = VecDeque::new();
        let mut tabu_set: HashSet<E::State> = HashSet::new();

        let mut expanded = 0usize;
        let mut generated = 1usize;
        let mut no_improve_count = 0usize;
        let mut best_iteration = 0usize;
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
                log_end(env, &result, best_h, best_iteration);
                return Ok(result);
            }

            let neighbors = env.transitions(&current);
            generated += neighbors.len();
            if neighbors.is_empty() {
                break Termination::DeadEnd;
            }

            // Find best admissible move
            let mut scored = Vec::with_capacity(neighbors.len());
            for t in &neighbors {
                scored.push(checked_heuristic(env, &t.state)?);
            }
            let mut best_move: Option<(usize, Cost)> = None;
            for (i, (t, &h)) in neighbors.iter().zip(&scored).enumerate() {
                let is_tabu = tabu_set.contains(&t.state);
                // Aspiration: override tabu if this produces a new global best
                if is_tabu && !(config.aspiration && h < best_h) {
                    continue;
                }
                if best_move.is_none_or(|(_, best)| h < best) {
                    best_move = Some((i, h));
                }
            }

            // All moves are tabu and none meets aspiration: pick least bad
            if best_move.is_none() {
                for (i, &h) in scored.iter().enumerate() {
                    if best_move.is_none_or(|(_, best)| h < best) {
                        best_move = Some((i, h));
                    }
                }
            }
            let Some((index, move_h)) = best_move else {
                break Termination::DeadEnd;
            };

            if config.tabu_tenure > 0 {
                if tabu_queue.len() >= config.tabu_tenure {
                    if let Some(old) = tabu_queue.pop_front() {
                        tabu_set.remove(&old);
                    }
                }
                tabu_queue.push_back(current.clone());
                tabu_set.insert(current.clone());
            }

            if let Some(step) = neighbors.into_iter().nth(index) {
                trajectory.push(step.action, step.state.clone(), step.cost);
                current = step.state;
                pending = true;
            }

            if move_h < best_h {
                best_h = move_h;
                best_iteration = expanded;
                no_improve_count = 0;
            } else {
                no_improve_count += 1;
            }

            // Stagnation check
            if no_improve_count >= config.max_no_improve {
                break Termination::Stagnation;
            }
        };

        if pending && env.is_goal(&current) {
            let (path, cost) = trajectory.into_path();
            let result =
                SearchResult::success(path, cost, expanded + 1, generated, budget.elapsed());
            log_end(env, &result, best_h, best_iteration);
            return Ok(result);
        }

        let result = SearchResult::failure(termination, expanded, generated, budget.elapsed());
        log_end(env, &result, best_h, best_iteration);
        Ok(result)
    }
}

fn log_end<E: Environment>(
    env: &E,
    result: &SearchResult<E::Action>,
    best_h: Cost,
    best_iteration: usize,
) {
    info!(
        event = "search_end",
        algorithm = "tabu",
        environment = env.name(),
        success = result.success,
        cost = result.cost,
        expanded = result.expanded,
        generated = result.generated,
        best_h,
        best_iteration,
        termination = %result.termination,
    );
}
