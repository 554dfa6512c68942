//! Core trait definitions for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] define the contract between the generic
//! evolutionary loop and a concrete encoding. [`PathFitness`] is the fitness
//! of the walk encoding used for environments.

use std::cmp::Ordering;

use rand::Rng;

use crate::environment::Cost;

/// An ordered fitness value; the one that compares lowest wins.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Fitness of an individual that has not been evaluated yet.
    fn worst() -> Self;

    /// Scalar used by roulette selection and the fitness history. Should be
    /// monotone in the [`PartialOrd`] order.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A population member that caches its last evaluated fitness.
pub trait Individual: Clone + Send + Sync {
    type Fitness: Fitness;

    fn fitness(&self) -> Self::Fitness;

    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Encoding and operators for one evolutionary run.
///
/// `evaluate` takes `&self` and may run on several rayon workers at once.
pub trait GaProblem: Send + Sync {
    type Individual: Individual;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Fitness of `individual`; lower is better.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// One or two children of `parent1` and `parent2`. Without an override
    /// the first parent is copied.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Perturbs `individual` in place; a no-op unless overridden.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Whether `fitness` is good enough to stop evolving early.
    fn is_solved(&self, _fitness: <Self::Individual as Individual>::Fitness) -> bool {
        false
    }
}

/// Fitness of a decoded walk: reaching a goal beats everything, then a lower
/// heuristic at the walk's end, then a cheaper walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFitness {
    pub reached: bool,
    /// Heuristic at the end of the walk.
    pub h: Cost,
    /// Cost of the walk after cycle removal.
    pub cost: Cost,
}

impl PartialOrd for PathFitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            other
                .reached
                .cmp(&self.reached)
                .then(self.h.total_cmp(&other.h))
                .then(self.cost.total_cmp(&other.cost)),
        )
    }
}

impl Fitness for PathFitness {
    fn worst() -> Self {
        Self {
            reached: false,
            h: Cost::INFINITY,
            cost: Cost::INFINITY,
        }
    }

    /// Reached walks map into `[0, 1)` by cost; the rest to `1 + h`.
    fn to_f64(self) -> f64 {
        if self.reached {
            self.cost / (1.0 + self.cost)
        } else {
            1.0 + self.h
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(reached: bool, h: f64, cost: f64) -> PathFitness {
        PathFitness { reached, h, cost }
    }

    #[test]
    fn test_reaching_goal_dominates() {
        assert!(fit(true, 0.0, 900.0) < fit(false, 0.0, 1.0));
        assert!(fit(false, 3.0, 1.0) < PathFitness::worst());
    }

    #[test]
    fn test_lexicographic_order() {
        assert!(fit(false, 2.0, 50.0) < fit(false, 3.0, 1.0));
        assert!(fit(true, 0.0, 10.0) < fit(true, 0.0, 11.0));
    }

    #[test]
    fn test_to_f64_preserves_order() {
        let ordered = [
            fit(true, 0.0, 3.0),
            fit(true, 0.0, 30.0),
            fit(false, 1.0, 0.0),
            fit(false, 4.0, 0.0),
        ];
        for w in ordered.windows(2) {
            assert!(w[0] < w[1]);
            assert!(w[0].to_f64() < w[1].to_f64());
        }
    }
}
