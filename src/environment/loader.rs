//! JSON environment definitions.
//!
//! ```json
//! { "kind": "graph", "name": "tiny", "nodes": ["A", "B"],
//!   "edges": [{ "from": "A", "to": "B", "cost": 2 }],
//!   "start": "A", "goals": ["B"] }
//! ```
//!
//! `kind` is one of `graph`, `grid` or `puzzle`; the remaining fields are
//! those of [`GraphDefinition`], [`GridDefinition`] or [`PuzzleDefinition`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    AnyEnvironment, GraphDefinition, GraphEnvironment, GridDefinition, GridWorld,
    PuzzleDefinition, SlidingPuzzle,
};
use crate::error::LoadError;

/// A serialized environment, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EnvironmentDefinition {
    Graph(GraphDefinition),
    Grid(GridDefinition),
    Puzzle(PuzzleDefinition),
}

impl EnvironmentDefinition {
    /// Validates the definition and builds the environment.
    pub fn build(self) -> Result<Box<dyn AnyEnvironment>, LoadError> {
        Ok(match self {
            EnvironmentDefinition::Graph(def) => Box::new(GraphEnvironment::from_definition(def)?),
            EnvironmentDefinition::Grid(def) => Box::new(GridWorld::from_definition(&def)?),
            EnvironmentDefinition::Puzzle(def) => Box::new(SlidingPuzzle::from_definition(&def)?),
        })
    }
}

/// Reads, validates and builds an environment from JSON.
pub fn load_environment<R: Read>(reader: R) -> Result<Box<dyn AnyEnvironment>, LoadError> {
    let definition: EnvironmentDefinition = serde_json::from_reader(reader)?;
    let env = definition.build()?;
    debug!(environment = env.id(), "loaded environment definition");
    Ok(env)
}

/// [`load_environment`] on a file.
pub fn load_environment_file(path: impl AsRef<Path>) -> Result<Box<dyn AnyEnvironment>, LoadError> {
    let file = File::open(path.as_ref())?;
    load_environment(BufReader::new(file))
}
