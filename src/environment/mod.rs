//! State-space environments.
//!
//! An [`Environment`] defines an initial state, a goal test, a transition
//! model, and optionally a heuristic. Algorithms treat states and actions as
//! opaque tokens; each environment picks its own cheapest encoding.
//!
//! # Contract
//!
//! - Every method is a pure function of its arguments: two calls with the
//!   same state yield the same transitions in the same order. The same
//!   instance can therefore be reused across runs and shared across threads.
//! - `transitions` returns a finite list; an empty list at a non-goal state
//!   is a dead end, not an error.
//! - Step costs are finite and non-negative.
//! - `heuristic` returns `None` when the environment has no heuristic.
//!   Algorithms that need one probe the initial state and fail fast.
//!
//! # Shipped environments
//!
//! - [`GraphEnvironment`]: explicit weighted graph (road maps, chains)
//! - [`GridWorld`]: 4-connected grid with walls and weighted cells
//! - [`SlidingPuzzle`]: n x n sliding tile puzzle

mod erased;
mod graph;
mod grid;
pub mod loader;
mod puzzle;

pub use erased::AnyEnvironment;
pub use graph::{GraphDefinition, GraphEdge, GraphEnvironment};
pub use grid::{GridDefinition, GridMove, GridWorld};
pub use loader::{load_environment, load_environment_file, EnvironmentDefinition};
pub use puzzle::{PuzzleDefinition, SlidingPuzzle, TileMove};

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::{SearchError, ValidationError};

/// Path and step cost unit.
pub type Cost = f64;

/// One move offered by an environment from a given state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, A> {
    pub action: A,
    pub state: S,
    pub cost: Cost,
}

impl<S, A> Transition<S, A> {
    pub fn new(action: A, state: S, cost: Cost) -> Self {
        Self {
            action,
            state,
            cost,
        }
    }
}

/// A formally defined state space.
///
/// # Examples
///
/// ```
/// use u_search::environment::{Cost, Environment, Transition};
///
/// /// Count up from 0 to 3, one step at a time.
/// struct Counter;
///
/// impl Environment for Counter {
///     type State = u32;
///     type Action = u32;
///
///     fn name(&self) -> &str { "counter" }
///     fn initial_state(&self) -> u32 { 0 }
///     fn is_goal(&self, s: &u32) -> bool { *s == 3 }
///     fn transitions(&self, s: &u32) -> Vec<Transition<u32, u32>> {
///         if *s < 3 { vec![Transition::new(s + 1, s + 1, 1.0)] } else { vec![] }
///     }
///     fn heuristic(&self, s: &u32) -> Option<Cost> { Some(3u32.saturating_sub(*s) as f64) }
/// }
/// ```
pub trait Environment: Send + Sync {
    /// Opaque state token. Equality and hashing define state identity for
    /// visited/closed sets.
    type State: Clone + Eq + Hash + Debug + Send + Sync;

    /// Opaque action token. `Display` gives the label used in reports.
    type Action: Clone + Eq + Debug + Display + Send + Sync;

    fn name(&self) -> &str;

    fn initial_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    fn transitions(&self, state: &Self::State) -> Vec<Transition<Self::State, Self::Action>>;

    /// Non-negative estimate of the remaining cost to a goal.
    ///
    /// A* returns cost-optimal paths only when this never overestimates the
    /// true remaining cost and is consistent; that is a property of the
    /// implementation, not something the algorithms verify.
    fn heuristic(&self, _state: &Self::State) -> Option<Cost> {
        None
    }

    /// Checks internal consistency of the definition.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Whether `env` provides a heuristic (probed on the initial state).
pub fn has_heuristic<E: Environment>(env: &E) -> bool {
    env.heuristic(&env.initial_state()).is_some()
}

/// Fails with [`SearchError::MissingCapability`] unless `env` has a heuristic.
pub(crate) fn require_heuristic<E: Environment>(env: &E) -> Result<(), SearchError> {
    if has_heuristic(env) {
        Ok(())
    } else {
        Err(SearchError::MissingCapability {
            capability: "heuristic",
            environment: env.name().to_string(),
        })
    }
}

/// The heuristic at `state`, which must exist and be finite and non-negative.
pub(crate) fn checked_heuristic<E: Environment>(
    env: &E,
    state: &E::State,
) -> Result<Cost, SearchError> {
    match env.heuristic(state) {
        Some(h) if h.is_finite() && h >= 0.0 => Ok(h),
        Some(h) => Err(SearchError::Runtime(format!(
            "heuristic of {:?} returned {h} for {state:?}",
            env.name()
        ))),
        None => Err(SearchError::Runtime(format!(
            "heuristic of {:?} has no value for {state:?}",
            env.name()
        ))),
    }
}

/// Re-walks `actions` from the initial state.
///
/// Each action must match a transition offered from the preceding state;
/// the first matching transition is taken. Returns the reached state and
/// the summed step cost, or `None` if some action is not offered.
pub fn replay_path<E: Environment>(
    env: &E,
    actions: &[E::Action],
) -> Option<(E::State, Cost)> {
    let mut state = env.initial_state();
    let mut cost = 0.0;
    for action in actions {
        let step = env
            .transitions(&state)
            .into_iter()
            .find(|t| &t.action == action)?;
        cost += step.cost;
        state = step.state;
    }
    Some((state, cost))
}


#[cfg(test)]
mod tests {
    use super::testing::Line;
    use super::*;

    #[test]
    fn test_replay_accepts_offered_actions() {
        let env = Line::new(5, 0, 3);
        let (state, cost) = replay_path(&env, &[1, 2, 3]).unwrap();
        assert_eq!(state, 3);
        assert!((cost - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_replay_rejects_teleport() {
        let env = Line::new(5, 0, 3);
        assert!(replay_path(&env, &[1, 3]).is_none());
    }

    #[test]
    fn test_has_heuristic() {
        let mut env = Line::new(5, 0, 3);
        assert!(has_heuristic(&env));
        env.with_heuristic = false;
        assert!(!has_heuristic(&env));
    }
}
