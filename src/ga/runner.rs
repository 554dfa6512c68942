//! The generational loop and its environment entry point.
//!
//! [`GaRunner::evolve`] works on any [`GaProblem`]. [`GaRunner::run`] wraps
//! an environment in the walk encoding and turns the best genome back into
//! a path.

use std::cmp::Ordering;
use std::time::Duration;

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use super::walk::{decode, WalkProblem};
use crate::algorithm::seeded_rng;
use crate::budget::Budget;
use crate::environment::{require_heuristic, Environment};
use crate::error::{ParameterError, SearchError};
use crate::result::{SearchResult, Termination};

/// Outcome of [`GaRunner::evolve`].
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Best individual of any generation.
    pub best: I,

    pub best_fitness: I::Fitness,

    /// Generations bred after the initial population.
    pub generations: usize,

    /// Why the loop stopped. `GoalReached` means the problem reported the
    /// best individual as solved.
    pub termination: Termination,

    /// Best fitness after the initial population and after each generation.
    pub fitness_history: Vec<f64>,
}

pub struct GaRunner;

impl GaRunner {
    /// Evolves `problem` until a limit is hit, the best individual
    /// stagnates, or (with `stop_on_goal`) the problem reports it solved.
    pub fn evolve<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ParameterError> {
        config.validate()?;

        let mut rng = seeded_rng("genetic", config.seed);
        let budget = Budget::new(None, config.time_limit_ms.map(Duration::from_millis));

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate_all(problem, &mut population, config.parallel);

        let mut best = population[best_index(&population)].clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations.min(1024) + 1);
        fitness_history.push(best.fitness().to_f64());

        let solved = |best: &P::Individual| config.stop_on_goal && problem.is_solved(best.fitness());
        let elite_count = (config.population_size as f64 * config.elite_ratio) as usize;
        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut termination = Termination::IterationLimit;

        if solved(&best) {
            termination = Termination::GoalReached;
        }

        while termination != Termination::GoalReached && generations < config.max_generations {
            if let Some(reason) = budget.exhausted(0) {
                termination = reason;
                break;
            }

            // Best first, so the elites are the prefix.
            population.sort_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .unwrap_or(Ordering::Equal)
            });
            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let p1 = config.selection.select(&population, &mut rng);
                let p2 = config.selection.select(&population, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    vec![population[p1].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    next_gen.push(child);
                }
            }

            // Elites keep their fitness.
            evaluate_all(problem, &mut next_gen[elite_count..], config.parallel);
            population = next_gen;
            generations += 1;

            let gen_best = &population[best_index(&population)];
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            fitness_history.push(best.fitness().to_f64());
            trace!(generation = generations, best = best.fitness().to_f64(), "generation");

            if solved(&best) {
                termination = Termination::GoalReached;
            } else if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                termination = Termination::Stagnation;
                break;
            }
        }

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            termination,
            fitness_history,
        })
    }

    /// Searches `env` by evolving walks from its initial state.
    ///
    /// Succeeds when the best walk found ends on a goal. `expanded` and
    /// `generated` add up the work of every walk decoded during the run.
    pub fn run<E: Environment>(
        env: &E,
        config: &GaConfig,
    ) -> Result<SearchResult<E::Action>, SearchError> {
        config.validate()?;
        require_heuristic(env)?;
        let clock = Budget::unlimited();
        debug!(
            environment = env.name(),
            population_size = config.population_size,
            genome_length = config.genome_length,
            selection = %config.selection,
            "search start"
        );

        let problem = WalkProblem::new(env, config.genome_length);
        let outcome = Self::evolve(&problem, config)?;
        if let Some(err) = problem.take_failure() {
            return Err(err);
        }

        let (expanded, generated) = (problem.expanded(), problem.generated());
        let result = if outcome.best_fitness.reached {
            let (path, cost) = decode(env, &outcome.best.genes).trajectory.into_path();
            SearchResult::success(path, cost, expanded, generated, clock.elapsed())
        } else {
            SearchResult::failure(outcome.termination, expanded, generated, clock.elapsed())
        };

        info!(
            event = "search_end",
            algorithm = "genetic",
            environment = env.name(),
            success = result.success,
            cost = result.cost,
            expanded = result.expanded,
            generated = result.generated,
            generations = outcome.generations,
            best_h = outcome.best_fitness.h,
            termination = %result.termination,
        );
        Ok(result)
    }
}

fn evaluate_serial<P: GaProblem>(problem: &P, individuals: &mut [P::Individual]) {
    for ind in individuals.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], parallel: bool) {
    if parallel {
        individuals.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        evaluate_serial(problem, individuals);
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: GaProblem>(problem: &P, individuals: &mut [P::Individual], _parallel: bool) {
    evaluate_serial(problem, individuals);
}

/// Index of the individual with the lowest fitness; the first one on ties.
fn best_index<I: Individual>(population: &[I]) -> usize {
    let mut best = 0;
    for (i, ind) in population.iter().enumerate().skip(1) {
        if ind.fitness() < population[best].fitness() {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::testing::Line;
    use crate::environment::{replay_path, GraphEnvironment};
    use crate::ga::Selection;

    // OneMax: maximize the number of set bits (minimize the negative count).

    #[derive(Clone, Debug)]
    struct BitString {
        bits: Vec<bool>,
        fitness: f64,
    }

    impl Individual for BitString {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
        fn set_fitness(&mut self, f: f64) {
            self.fitness = f;
        }
    }

    struct OneMaxProblem {
        n: usize,
    }

    impl GaProblem for OneMaxProblem {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            BitString {
                bits: (0..self.n).map(|_| rng.random_bool(0.5)).collect(),
                fitness: f64::INFINITY,
            }
        }

        fn evaluate(&self, ind: &BitString) -> f64 {
            -(ind.bits.iter().filter(|&&b| b).count() as f64)
        }

        fn crossover<R: Rng>(&self, p1: &BitString, p2: &BitString, rng: &mut R) -> Vec<BitString> {
            let point = rng.random_range(0..self.n);
            let mut c1 = p1.bits[..point].to_vec();
            c1.extend_from_slice(&p2.bits[point..]);
            vec![BitString {
                bits: c1,
                fitness: f64::INFINITY,
            }]
        }

        fn mutate<R: Rng>(&self, ind: &mut BitString, rng: &mut R) {
            let idx = rng.random_range(0..self.n);
            ind.bits[idx] = !ind.bits[idx];
        }

        fn is_solved(&self, fitness: f64) -> bool {
            fitness <= -(self.n as f64)
        }
    }

    fn onemax_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(50)
            .with_max_generations(200)
            .with_mutation_rate(0.3)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_onemax_convergence() {
        let problem = OneMaxProblem { n: 20 };
        let config = onemax_config().with_stop_on_goal(false);
        let result = GaRunner::evolve(&problem, &config).unwrap();
        assert!(
            result.best_fitness <= -15.0,
            "expected fitness <= -15.0 for 20-bit OneMax, got {}",
            result.best_fitness
        );
    }

    #[test]
    fn test_stop_when_solved() {
        let problem = OneMaxProblem { n: 6 };
        let result = GaRunner::evolve(&problem, &onemax_config()).unwrap();
        assert_eq!(result.termination, Termination::GoalReached);
        assert_eq!(result.best_fitness, -6.0);
        assert_eq!(result.fitness_history.len(), result.generations + 1);
    }

    #[test]
    fn test_stagnation_termination() {
        let problem = OneMaxProblem { n: 5 };
        let config = onemax_config()
            .with_population_size(20)
            .with_max_generations(1000)
            .with_stagnation_limit(10)
            .with_stop_on_goal(false);
        let result = GaRunner::evolve(&problem, &config).unwrap();
        assert_eq!(result.termination, Termination::Stagnation);
        assert!(result.generations < 1000);
    }

    #[test]
    fn test_elite_preservation() {
        let problem = OneMaxProblem { n: 10 };
        let config = onemax_config()
            .with_population_size(20)
            .with_max_generations(50)
            .with_elite_ratio(0.2)
            .with_stop_on_goal(false);
        let result = GaRunner::evolve(&problem, &config).unwrap();
        for window in result.fitness_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_fitness_history_length() {
        let problem = OneMaxProblem { n: 10 };
        let config = onemax_config()
            .with_max_generations(30)
            .with_stagnation_limit(0)
            .with_stop_on_goal(false);
        let result = GaRunner::evolve(&problem, &config).unwrap();
        assert_eq!(result.termination, Termination::IterationLimit);
        assert_eq!(result.fitness_history.len(), 31);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = OneMaxProblem { n: 4 };
        let config = GaConfig::default().with_population_size(1);
        assert!(GaRunner::evolve(&problem, &config).is_err());
    }

    #[test]
    fn test_romania_walk_reaches_bucharest() {
        let env = GraphEnvironment::romania();
        for selection in [Selection::Tournament(3), Selection::Roulette, Selection::Rank] {
            let config = GaConfig::default().with_selection(selection).with_seed(42);
            let result = GaRunner::run(&env, &config).unwrap();
            assert!(result.success, "{selection} failed");
            let (end, cost) = replay_path(&env, &result.path).unwrap();
            assert!(env.is_goal(&end));
            assert!((cost - result.cost).abs() < 1e-9);
            assert!(result.expanded <= result.generated);
        }
    }

    #[test]
    fn test_line_walk() {
        let env = Line::new(20, 0, 12);
        let config = GaConfig::default().with_seed(9);
        let result = GaRunner::run(&env, &config).unwrap();
        assert!(result.success);
        assert_eq!(replay_path(&env, &result.path).map(|(s, _)| s), Some(12));
    }

    #[test]
    fn test_short_genome_stagnates() {
        let env = Line::new(100, 0, 100);
        let config = GaConfig::default()
            .with_genome_length(5)
            .with_population_size(20)
            .with_stagnation_limit(5)
            .with_seed(1);
        let result = GaRunner::run(&env, &config).unwrap();
        assert!(!result.success);
        assert_eq!(result.termination, Termination::Stagnation);
        assert!(result.path.is_empty());
        assert!(result.expanded <= result.generated);
    }

    #[test]
    fn test_generation_and_time_limits() {
        let env = Line::new(100, 0, 100);
        let capped = GaConfig::default()
            .with_genome_length(5)
            .with_max_generations(3)
            .with_stagnation_limit(0)
            .with_seed(1);
        let result = GaRunner::run(&env, &capped).unwrap();
        assert_eq!(result.termination, Termination::IterationLimit);

        let timed = capped
            .with_max_generations(usize::MAX)
            .with_time_limit_ms(1);
        let result = GaRunner::run(&env, &timed).unwrap();
        assert_eq!(result.termination, Termination::TimeLimit);
    }

    #[test]
    fn test_keeps_searching_past_goal() {
        let env = Line::new(10, 0, 3);
        let config = GaConfig::default()
            .with_stop_on_goal(false)
            .with_max_generations(20)
            .with_seed(4);
        let result = GaRunner::run(&env, &config).unwrap();
        assert!(result.success);
        assert_eq!(result.termination, Termination::GoalReached);
        assert_eq!(result.path, vec![1, 2, 3]);
    }

    #[test]
    fn test_requires_heuristic() {
        let env = GraphEnvironment::disconnected();
        let config = GaConfig::default().with_seed(1);
        assert!(matches!(
            GaRunner::run(&env, &config),
            Err(SearchError::MissingCapability { .. })
        ));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let env = GraphEnvironment::romania();
        let config = GaConfig::default().with_seed(17);
        let a = GaRunner::run(&env, &config).unwrap();
        let b = GaRunner::run(&env, &config).unwrap();
        assert_eq!(a.path, b.path);
        assert_eq!(a.expanded, b.expanded);
        assert_eq!(a.generated, b.generated);
    }
}
