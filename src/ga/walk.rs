//! Walk encoding: a genome is a list of gene choices replayed from the
//! initial state.
//!
//! At a state with `n` transitions, gene `g` picks transition `g % n`. The
//! walk stops early at a goal or a dead end, so trailing genes may be unused.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::Rng;

use super::types::{Fitness, GaProblem, Individual, PathFitness};
use crate::environment::{checked_heuristic, Environment};
use crate::error::SearchError;
use crate::trajectory::Trajectory;

/// A fixed-length genome and its cached fitness.
#[derive(Debug, Clone)]
pub struct Genome {
    pub genes: Vec<u32>,
    fitness: PathFitness,
}

impl Genome {
    pub fn new(genes: Vec<u32>) -> Self {
        Self {
            genes,
            fitness: PathFitness::worst(),
        }
    }
}

impl Individual for Genome {
    type Fitness = PathFitness;

    fn fitness(&self) -> PathFitness {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: PathFitness) {
        self.fitness = fitness;
    }
}

/// Outcome of replaying one genome.
pub(crate) struct Walk<S, A> {
    pub trajectory: Trajectory<S, A>,
    pub end: S,
    pub reached: bool,
    pub expanded: usize,
    pub generated: usize,
}

/// Replays `genes` from the initial state of `env`.
///
/// Every state the walk stands on is goal-tested and counted as expanded;
/// `generated` counts the initial state plus every transition requested.
pub(crate) fn decode<E: Environment>(env: &E, genes: &[u32]) -> Walk<E::State, E::Action> {
    let mut state = env.initial_state();
    let mut trajectory = Trajectory::new(state.clone());
    let mut expanded = 0;
    let mut generated = 1;

    for &gene in genes {
        expanded += 1;
        if env.is_goal(&state) {
            return Walk {
                trajectory,
                end: state,
                reached: true,
                expanded,
                generated,
            };
        }
        let mut moves = env.transitions(&state);
        generated += moves.len();
        if moves.is_empty() {
            return Walk {
                trajectory,
                end: state,
                reached: false,
                expanded,
                generated,
            };
        }
        let step = moves.swap_remove(gene as usize % moves.len());
        trajectory.push(step.action, step.state.clone(), step.cost);
        state = step.state;
    }

    expanded += 1;
    let reached = env.is_goal(&state);
    Walk {
        trajectory,
        end: state,
        reached,
        expanded,
        generated,
    }
}

/// Adapts an environment to [`GaProblem`] with the walk encoding.
///
/// Counters are shared across evaluation threads. The first heuristic
/// failure is kept and surfaced by [`WalkProblem::take_failure`].
pub(crate) struct WalkProblem<'a, E: Environment> {
    env: &'a E,
    genome_length: usize,
    expanded: AtomicUsize,
    generated: AtomicUsize,
    failure: Mutex<Option<SearchError>>,
}

impl<'a, E: Environment> WalkProblem<'a, E> {
    pub fn new(env: &'a E, genome_length: usize) -> Self {
        Self {
            env,
            genome_length,
            expanded: AtomicUsize::new(0),
            generated: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    pub fn expanded(&self) -> usize {
        self.expanded.load(Ordering::Relaxed)
    }

    pub fn generated(&self) -> usize {
        self.generated.load(Ordering::Relaxed)
    }

    pub fn take_failure(&self) -> Option<SearchError> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }

    fn record_failure(&self, err: SearchError) {
        if let Ok(mut slot) = self.failure.lock() {
            slot.get_or_insert(err);
        }
    }
}

impl<E: Environment> GaProblem for WalkProblem<'_, E> {
    type Individual = Genome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Genome {
        Genome::new((0..self.genome_length).map(|_| rng.random()).collect())
    }

    fn evaluate(&self, genome: &Genome) -> PathFitness {
        let walk = decode(self.env, &genome.genes);
        self.expanded.fetch_add(walk.expanded, Ordering::Relaxed);
        self.generated.fetch_add(walk.generated, Ordering::Relaxed);

        let h = if walk.reached {
            0.0
        } else {
            match checked_heuristic(self.env, &walk.end) {
                Ok(h) => h,
                Err(err) => {
                    self.record_failure(err);
                    return PathFitness::worst();
                }
            }
        };
        let (_, cost) = walk.trajectory.into_path();
        PathFitness {
            reached: walk.reached,
            h,
            cost,
        }
    }

    /// Single-point crossover producing both children.
    fn crossover<R: Rng>(&self, p1: &Genome, p2: &Genome, rng: &mut R) -> Vec<Genome> {
        let n = p1.genes.len().min(p2.genes.len());
        if n < 2 {
            return vec![p1.clone(), p2.clone()];
        }
        let point = rng.random_range(1..n);
        let mut c1 = p1.genes[..point].to_vec();
        c1.extend_from_slice(&p2.genes[point..]);
        let mut c2 = p2.genes[..point].to_vec();
        c2.extend_from_slice(&p1.genes[point..]);
        vec![Genome::new(c1), Genome::new(c2)]
    }

    /// Redraws one random gene.
    fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R) {
        if genome.genes.is_empty() {
            return;
        }
        let idx = rng.random_range(0..genome.genes.len());
        genome.genes[idx] = rng.random();
    }

    fn is_solved(&self, fitness: PathFitness) -> bool {
        fitness.reached
    }
}
