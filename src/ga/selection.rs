//! Parent selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use std::cmp::Ordering;
use std::fmt;

use rand::Rng;

use super::types::{Fitness, Individual};

/// How parents are drawn from an evaluated population.
///
/// Every scheme favours the individual whose fitness compares lowest.
///
/// # Examples
///
/// ```
/// use u_search::ga::Selection;
///
/// assert_eq!(Selection::from_name("tournament", 4), Some(Selection::Tournament(4)));
/// assert_eq!(Selection::from_name("rank", 4), Some(Selection::Rank));
/// assert_eq!(Selection::from_name("lottery", 4), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Pick `k` individuals at random (with replacement), keep the best.
    Tournament(usize),

    /// Fitness-proportionate selection on inverted [`Fitness::to_f64`].
    Roulette,

    /// Linear ranking: the i-th best of `n` gets weight `n - i`.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Parses `tournament`, `roulette` or `rank`.
    pub fn from_name(name: &str, tournament_size: usize) -> Option<Self> {
        match name {
            "tournament" => Some(Selection::Tournament(tournament_size)),
            "roulette" => Some(Selection::Roulette),
            "rank" => Some(Selection::Rank),
            _ => None,
        }
    }

    /// Index of the chosen parent.
    ///
    /// # Panics
    /// If `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from an empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Tournament(k) => write!(f, "tournament({k})"),
            Selection::Roulette => f.write_str("roulette"),
            Selection::Rank => f.write_str("rank"),
        }
    }
}

/// Best of `k` uniform draws (with replacement).
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    (1..k.max(1)).fold(rng.random_range(0..n), |winner, _| {
        let challenger = rng.random_range(0..n);
        if population[challenger].fitness() < population[winner].fitness() {
            challenger
        } else {
            winner
        }
    })
}

/// Spins a wheel with one slot per weight and returns the slot index.
fn spin<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let mut remaining = rng.random_range(0.0..total);
    for (slot, &w) in weights.iter().enumerate() {
        if remaining < w {
            return slot;
        }
        remaining -= w;
    }
    weights.len() - 1
}

/// Slot width is the distance below the worst scalar fitness, floored at a
/// small epsilon so the worst individual keeps a sliver.
fn roulette<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    const FLOOR: f64 = 1e-10;
    if population.len() == 1 {
        return 0;
    }

    let scalars: Vec<f64> = population.iter().map(|ind| ind.fitness().to_f64()).collect();
    let worst = scalars.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !worst.is_finite() {
        // Unevaluated individuals carry `worst()`; weights are meaningless.
        return rng.random_range(0..population.len());
    }
    let weights: Vec<f64> = scalars.iter().map(|&f| (worst - f).max(0.0) + FLOOR).collect();
    spin(&weights, rng)
}

fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut best_first: Vec<usize> = (0..n).collect();
    best_first.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .partial_cmp(&population[b].fitness())
            .unwrap_or(Ordering::Equal)
    });
    let weights: Vec<f64> = (0..n).map(|position| (n - position) as f64).collect();
    best_first[spin(&weights, rng)]
}
