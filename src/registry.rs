//! Name-to-constructor maps for environments and algorithms.
//!
//! A [`Registry`] is filled by explicit `register_*` calls and never changes
//! during a run. [`Registry::global`] is the process-wide instance holding
//! every shipped environment and algorithm.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::algorithm::{Algorithm, AlgorithmKind};
use crate::environment::{AnyEnvironment, GraphEnvironment, GridWorld, SlidingPuzzle};
use crate::error::SearchError;

type EnvironmentFactory = Box<dyn Fn() -> Box<dyn AnyEnvironment> + Send + Sync>;

/// Environment factories and algorithm kinds, keyed by name.
///
/// # Examples
///
/// ```
/// use u_search::{AlgorithmKind, Registry};
///
/// let registry = Registry::builtin();
/// assert_eq!(registry.algorithm("sa").unwrap(), AlgorithmKind::SimulatedAnnealing);
/// assert!(registry.environment("romania").is_ok());
/// assert!(registry.environment("atlantis").is_err());
/// ```
#[derive(Default)]
pub struct Registry {
    environments: BTreeMap<String, EnvironmentFactory>,
    algorithms: BTreeMap<String, AlgorithmKind>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every shipped environment preset and algorithm, plus the short
    /// aliases `hc`, `sa` and `ga`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_environment("chain", || Box::new(GraphEnvironment::abcd()));
        registry.register_environment("romania", || Box::new(GraphEnvironment::romania()));
        registry.register_environment("trivial", || Box::new(GraphEnvironment::trivial()));
        registry.register_environment("disconnected", || {
            Box::new(GraphEnvironment::disconnected())
        });
        registry.register_environment("maze", || Box::new(GridWorld::maze()));
        registry.register_environment("8-puzzle", || Box::new(SlidingPuzzle::eight_puzzle()));

        for kind in AlgorithmKind::ALL {
            registry.register_algorithm(kind.name(), kind);
        }
        registry.register_algorithm("hc", AlgorithmKind::HillClimbing);
        registry.register_algorithm("sa", AlgorithmKind::SimulatedAnnealing);
        registry.register_algorithm("ga", AlgorithmKind::Genetic);
        registry
    }

    /// The process-wide builtin registry, built on first use.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::builtin)
    }

    /// Registers (or replaces) an environment factory.
    pub fn register_environment<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn AnyEnvironment> + Send + Sync + 'static,
    {
        self.environments.insert(name.to_string(), Box::new(factory));
    }

    /// Registers (or replaces) an algorithm under `name`.
    pub fn register_algorithm(&mut self, name: &str, kind: AlgorithmKind) {
        self.algorithms.insert(name.to_string(), kind);
    }

    /// Builds a fresh instance of the named environment.
    pub fn environment(&self, name: &str) -> Result<Box<dyn AnyEnvironment>, SearchError> {
        self.environments
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SearchError::Lookup {
                kind: "environment",
                name: name.to_string(),
                known: self.environment_names(),
            })
    }

    pub fn algorithm(&self, name: &str) -> Result<AlgorithmKind, SearchError> {
        self.algorithms
            .get(name)
            .copied()
            .ok_or_else(|| SearchError::Lookup {
                kind: "algorithm",
                name: name.to_string(),
                known: self.algorithm_names(),
            })
    }

    /// Registered environment names, sorted.
    pub fn environment_names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }

    /// Registered algorithm names and aliases, sorted.
    pub fn algorithm_names(&self) -> Vec<String> {
        self.algorithms.keys().cloned().collect()
    }

    /// Canonical names only, i.e. the aliases filtered out.
    pub fn canonical_algorithm_names(&self) -> Vec<String> {
        self.algorithms
            .iter()
            .filter(|(name, kind)| kind.name() == name.as_str())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SearchContext;

    #[test]
    fn test_empty_registry_lookup_fails() {
        let registry = Registry::new();
        match registry.environment("romania") {
            Err(SearchError::Lookup { kind, name, known }) => {
                assert_eq!(kind, "environment");
                assert_eq!(name, "romania");
                assert!(known.is_empty());
            }
            _ => panic!("expected lookup error"),
        }
    }

    #[test]
    fn test_unknown_algorithm_lists_known_names() {
        let err = Registry::builtin().algorithm("dijkstra").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dijkstra"));
        assert!(message.contains("astar"));
        assert!(message.contains("tabu"));
    }

    #[test]
    fn test_builtin_presets_validate() {
        let registry = Registry::builtin();
        for name in registry.environment_names() {
            let env = registry.environment(&name).unwrap();
            assert_eq!(env.id(), name);
            assert!(env.check().is_ok(), "{name} does not validate");
        }
    }

    #[test]
    fn test_aliases() {
        let registry = Registry::builtin();
        assert_eq!(registry.algorithm("ga").unwrap(), AlgorithmKind::Genetic);
        assert_eq!(registry.algorithm("hc").unwrap(), AlgorithmKind::HillClimbing);
        assert_eq!(registry.canonical_algorithm_names().len(), AlgorithmKind::ALL.len());
        assert_eq!(registry.algorithm_names().len(), AlgorithmKind::ALL.len() + 3);
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = Registry::new();
        registry.register_environment("tiny", || {
            Box::new(GraphEnvironment::chain("tiny", &["X", "Y"], 2.0).unwrap())
        });
        registry.register_algorithm("breadth", AlgorithmKind::BreadthFirst);

        let env = registry.environment("tiny").unwrap();
        let kind = registry.algorithm("breadth").unwrap();
        let report = env.execute(kind, &SearchContext::new()).unwrap();
        assert!(report.success);
        assert_eq!(report.path, vec!["Y"]);
        assert_eq!(report.cost, 2.0);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Registry::global(), Registry::global()));
        assert!(Registry::global().environment("maze").is_ok());
    }
}
