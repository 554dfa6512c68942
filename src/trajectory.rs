//! Move history of a local search, turned into a path when a goal is hit.

use std::collections::HashMap;
use std::hash::Hash;

use crate::environment::Cost;

#[derive(Debug, Clone)]
struct Step<S, A> {
    action: A,
    state: S,
    cost: Cost,
}

/// The sequence of accepted moves from a start state.
#[derive(Debug, Clone)]
pub struct Trajectory<S, A> {
    start: S,
    steps: Vec<Step<S, A>>,
}

impl<S: Clone + Eq + Hash, A: Clone> Trajectory<S, A> {
    pub fn new(start: S) -> Self {
        Self {
            start,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, action: A, state: S, cost: Cost) {
        self.steps.push(Step {
            action,
            state,
            cost,
        });
    }

    /// The recorded moves with every cycle cut out, and their summed cost.
    ///
    /// Whenever a state reappears, the moves between its two visits are
    /// dropped. The result is still a walk from the start to the last state.
    pub fn into_path(self) -> (Vec<A>, Cost) {
        let mut kept: Vec<Step<S, A>> = Vec::with_capacity(self.steps.len());
        // State -> number of kept steps when it was reached.
        let mut position: HashMap<S, usize> = HashMap::from([(self.start, 0)]);

        for step in self.steps {
            if let Some(&at) = position.get(&step.state) {
                for dropped in kept.drain(at..) {
                    position.remove(&dropped.state);
                }
                continue;
            }
            position.insert(step.state.clone(), kept.len() + 1);
            kept.push(step);
        }

        let cost = kept.iter().map(|s| s.cost).sum();
        (kept.into_iter().map(|s| s.action).collect(), cost)
    }
}
