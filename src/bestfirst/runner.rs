//! The shared graph-search loop.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, info, trace};

use super::config::BestFirstConfig;
use super::types::Strategy;
use crate::budget::Budget;
use crate::environment::{checked_heuristic, require_heuristic, Cost, Environment};
use crate::error::SearchError;
use crate::frontier::SearchTree;
use crate::result::{SearchResult, Termination};

/// Executes one best-first search.
pub struct BestFirstRunner;

/// Duplicate detection for the two families of strategies.
enum Seen<S> {
    /// BFS, DFS, greedy: shallowest depth each state was admitted at.
    /// Without a depth limit a state is admitted once; with one it is
    /// admitted again when reached at a smaller depth, so a deep first
    /// visit cannot hide a goal that fits under the limit.
    Generated(HashMap<S, usize>),
    /// UCS, A*: cheapest known `g` per state, plus the expanded states.
    Costed {
        best_g: HashMap<S, Cost>,
        closed: HashSet<S>,
    },
}

impl BestFirstRunner {
    /// Runs `strategy` on `env`.
    ///
    /// Goal states are recognised when they are popped, not when they are
    /// generated, so UCS and A* return the cheapest path they know of.
    pub fn run<E: Environment>(
        env: &E,
        strategy: Strategy,
        config: &BestFirstConfig,
    ) -> Result<SearchResult<E::Action>, SearchError> {
        config.validate()?;
        if strategy.needs_heuristic() {
            require_heuristic(env)?;
        }

        let budget = Budget::new(
            config.max_expansions,
            config.time_limit_ms.map(Duration::from_millis),
        );
        debug!(
            algorithm = strategy.name(),
            environment = env.name(),
            max_expansions = ?config.max_expansions,
            max_depth = ?config.max_depth,
            "search start"
        );

        let start = env.initial_state();
        let start_h = estimate(env, strategy, &start)?;
        let (mut tree, root) = SearchTree::new(start.clone());
        let mut frontier = strategy.frontier();
        frontier.push(root, strategy.priority(0.0, start_h, config.weight));

        let mut seen = if strategy.tracks_path_cost() {
            Seen::Costed {
                best_g: HashMap::from([(start, 0.0)]),
                closed: HashSet::new(),
            }
        } else {
            Seen::Generated(HashMap::from([(start, 0)]))
        };

        let mut expanded = 0usize;
        let mut generated = 1usize;
        let mut cut_off = false;

        let termination = loop {
            if let Some(reason) = budget.exhausted(expanded) {
                break reason;
            }
            let Some(id) = frontier.pop() else {
                break if cut_off {
                    Termination::DepthLimit
                } else {
                    Termination::FrontierExhausted
                };
            };

            let node = tree.get(id);
            let (state, g, depth) = (node.state.clone(), node.g, node.depth);

            match &mut seen {
                Seen::Costed { best_g, closed } => {
                    let stale = best_g.get(&state).is_some_and(|&best| g > best);
                    if stale || !closed.insert(state.clone()) {
                        continue;
                    }
                }
                Seen::Generated(shallowest) => {
                    // Superseded by a shallower copy of the same state.
                    if shallowest.get(&state).is_some_and(|&d| depth > d) {
                        continue;
                    }
                }
            }

            expanded += 1;
            trace!(?state, g, depth, open = frontier.len(), "expand");

            if env.is_goal(&state) {
                let result =
                    SearchResult::success(tree.path_to(id), g, expanded, generated, budget.elapsed());
                log_end(env, strategy, &result);
                return Ok(result);
            }
            if config.max_depth.is_some_and(|max| depth >= max) {
                cut_off = true;
                continue;
            }

            let mut successors = env.transitions(&state);
            generated += successors.len();
            if strategy == Strategy::DepthFirst {
                // The stack pops last-pushed first.
                successors.reverse();
            }

            for t in successors {
                if !t.cost.is_finite() || t.cost < 0.0 {
                    return Err(SearchError::Runtime(format!(
                        "environment {:?} produced step cost {} from {:?}",
                        env.name(),
                        t.cost,
                        state
                    )));
                }
                let child_g = g + t.cost;
                match &mut seen {
                    Seen::Generated(shallowest) => {
                        let child_depth = depth + 1;
                        let admit = match shallowest.get(&t.state) {
                            None => true,
                            Some(&d) => config.max_depth.is_some() && child_depth < d,
                        };
                        if !admit {
                            continue;
                        }
                        shallowest.insert(t.state.clone(), child_depth);
                    }
                    Seen::Costed { best_g, closed } => {
                        if closed.contains(&t.state)
                            || best_g.get(&t.state).is_some_and(|&best| best <= child_g)
                        {
                            continue;
                        }
                        best_g.insert(t.state.clone(), child_g);
                    }
                }
                let h = estimate(env, strategy, &t.state)?;
                let child = tree.push(id, t.action, t.state, t.cost);
                frontier.push(child, strategy.priority(child_g, h, config.weight));
            }
        };

        let result = SearchResult::failure(termination, expanded, generated, budget.elapsed());
        log_end(env, strategy, &result);
        Ok(result)
    }
}

/// Heuristic value for strategies that use one; zero otherwise.
fn estimate<E: Environment>(
    env: &E,
    strategy: Strategy,
    state: &E::State,
) -> Result<Cost, SearchError> {
    if strategy.needs_heuristic() {
        checked_heuristic(env, state)
    } else {
        Ok(0.0)
    }
}

fn log_end<E: Environment>(env: &E, strategy: Strategy, result: &SearchResult<E::Action>) {
    info!(
        event = "search_end",
        algorithm = strategy.name(),
        environment = env.name(),
        success = result.success,
        cost = result.cost,
        expanded = result.expanded,
        generated = result.generated,
        termination = %result.termination,
        elapsed_ms = result.elapsed.as_secs_f64() * 1000.0,
    );
}
