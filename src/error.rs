//! Error taxonomy for environments, parameters, and algorithm runs.
//!
//! A search that fails to reach a goal is *not* an error: it returns
//! `Ok(SearchResult)` with `success == false`. Everything here describes
//! inputs that prevent a run from starting (or, for
//! [`SearchError::Runtime`], an environment breaking its own contract
//! mid-search).

use thiserror::Error;

/// An environment failed its self-consistency checks.
///
/// `field` locates the offending part of the definition (for loaded
/// environments this is a path such as `edges[2].to`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A search context value could not be used by the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// An entry of a `key=value,...` list is not of the form `key=value`.
    #[error("malformed parameter entry {entry:?}: expected key=value")]
    Malformed { entry: String },

    /// The value cannot be converted to the type the algorithm needs.
    #[error("parameter {key:?}: cannot parse {value:?} as {expected}")]
    Invalid {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// The value parsed but lies outside the accepted range.
    #[error("parameter {key:?}: {message}")]
    OutOfRange { key: String, message: String },
}

impl ParameterError {
    pub fn out_of_range(key: &str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Failure while loading a serialized environment definition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid definition: {0}")]
    Validation(#[from] ValidationError),
}

/// Top-level error for everything below the driver.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Bad selection at the command boundary.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown environment or algorithm name.
    #[error("unknown {kind} {name:?} (known: {})", known.join(", "))]
    Lookup {
        kind: &'static str,
        name: String,
        known: Vec<String>,
    },

    #[error("invalid environment: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid parameter: {0}")]
    Parameter(#[from] ParameterError),

    /// The algorithm needs a capability the environment does not provide.
    #[error("{capability} is required but environment {environment:?} does not provide it")]
    MissingCapability {
        capability: &'static str,
        environment: String,
    },

    /// An algorithm precondition was violated during the run.
    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("could not load environment: {0}")]
    Load(#[from] LoadError),
}
