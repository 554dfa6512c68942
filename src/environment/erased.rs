use super::{has_heuristic, Cost, Environment};
use crate::algorithm::{Algorithm, AlgorithmKind};
use crate::context::SearchContext;
use crate::error::{SearchError, ValidationError};
use crate::result::SearchReport;

/// Object-safe view of an [`Environment`], used wherever environments with
/// different state types must share a container (registry, plans, CLI).
pub trait AnyEnvironment: Send + Sync {
    fn id(&self) -> &str;

    fn check(&self) -> Result<(), ValidationError>;

    fn provides_heuristic(&self) -> bool;

    /// Validates the environment, runs `algorithm` on it and labels the result.
    fn execute(
        &self,
        algorithm: AlgorithmKind,
        ctx: &SearchContext,
    ) -> Result<SearchReport, SearchError>;

    /// Replays a labeled path from the initial state.
    ///
    /// Returns the summed cost if every label matches an offered transition
    /// and the walk ends at a goal.
    fn verify(&self, labels: &[String]) -> Option<Cost>;
}

impl<E: Environment> AnyEnvironment for E {
    fn id(&self) -> &str {
        self.name()
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.validate()
    }

    fn provides_heuristic(&self) -> bool {
        has_heuristic(self)
    }

    fn execute(
        &self,
        algorithm: AlgorithmKind,
        ctx: &SearchContext,
    ) -> Result<SearchReport, SearchError> {
        self.validate()?;
        let result = algorithm.run(ctx, self)?;
        Ok(SearchReport::new(self.name(), algorithm.name(), result.labeled()))
    }

    fn verify(&self, labels: &[String]) -> Option<Cost> {
        let mut state = self.initial_state();
        let mut cost = 0.0;
        for label in labels {
            let step = self
                .transitions(&state)
                .into_iter()
                .find(|t| t.action.to_string() == *label)?;
            cost += step.cost;
            state = step.state;
        }
        self.is_goal(&state).then_some(cost)
    }
}
