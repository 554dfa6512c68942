//! Expansion and wall-clock caps shared by every algorithm.

use std::time::{Duration, Instant};

use crate::result::Termination;

/// Resource caps polled between expansions.
#[derive(Debug, Clone)]
pub struct Budget {
    max_expansions: Option<usize>,
    time_limit: Option<Duration>,
    started: Instant,
}

impl Budget {
    /// Starts the clock now.
    pub fn new(max_expansions: Option<usize>, time_limit: Option<Duration>) -> Self {
        Self {
            max_expansions,
            time_limit,
            started: Instant::now(),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Returns the reason to stop, if any cap is reached.
    pub fn exhausted(&self, expanded: usize) -> Option<Termination> {
        if self.max_expansions.is_some_and(|max| expanded >= max) {
            return Some(Termination::ExpansionLimit);
        }
        if self.time_limit.is_some_and(|limit| self.started.elapsed() >= limit) {
            return Some(Termination::TimeLimit);
        }
        None
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
