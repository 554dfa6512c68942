//! Batch benchmark plans.
//!
//! A plan is a TOML file listing runs; every run is an independent search
//! with its own environment instance, frontier and closed set.
//!
//! ```toml
//! name = "romania sweep"
//! parallel = false
//!
//! [defaults.params]
//! max_expansions = 10000
//!
//! [[runs]]
//! environment = "romania"
//! algorithm = "astar"
//!
//! [[runs]]
//! load = "envs/tiny.json"
//! algorithm = "sa"
//! params = { seed = 7 }
//! repeat = 3
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::SearchContext;
use crate::environment::{load_environment_file, AnyEnvironment};
use crate::error::SearchError;
use crate::registry::Registry;
use crate::result::SearchReport;

/// Plan loading error.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid plan: {0}")]
    Invalid(String),
}

/// Parameters applied to every run unless the run overrides them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDefaults {
    #[serde(default)]
    pub params: BTreeMap<String, toml::Value>,
}

/// One `[[runs]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanEntry {
    /// Registered environment name.
    #[serde(default)]
    pub environment: Option<String>,
    /// JSON environment definition, relative to the plan file.
    #[serde(default)]
    pub load: Option<PathBuf>,
    pub algorithm: String,
    #[serde(default)]
    pub params: BTreeMap<String, toml::Value>,
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_repeat() -> usize {
    1
}

impl PlanEntry {
    /// How the environment is named in the summary.
    pub fn label(&self) -> String {
        match (&self.environment, &self.load) {
            (Some(name), _) => name.clone(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

/// A sequence of runs read from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkPlan {
    #[serde(default)]
    pub name: Option<String>,
    /// Run entries on the rayon pool (needs the `parallel` feature).
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub defaults: PlanDefaults,
    #[serde(default)]
    pub runs: Vec<PlanEntry>,
    /// Directory that relative `load` paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl BenchmarkPlan {
    /// Loads a plan from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut plan = Self::from_toml_str(&contents)?;
        plan.base_dir = path.parent().map(Path::to_path_buf);
        Ok(plan)
    }

    /// Parses and validates a plan.
    pub fn from_toml_str(s: &str) -> Result<Self, PlanError> {
        let plan: Self = toml::from_str(s)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.runs.is_empty() {
            return Err(PlanError::Invalid("plan has no [[runs]]".into()));
        }
        to_context("defaults.params", &self.defaults.params)?;
        for (i, entry) in self.runs.iter().enumerate() {
            if entry.environment.is_some() == entry.load.is_some() {
                return Err(PlanError::Invalid(format!(
                    "runs[{i}]: exactly one of `environment` or `load` is required"
                )));
            }
            if entry.repeat == 0 {
                return Err(PlanError::Invalid(format!(
                    "runs[{i}].repeat: must be at least 1"
                )));
            }
            to_context(&format!("runs[{i}].params"), &entry.params)?;
        }
        Ok(())
    }

    /// Total number of searches, repeats included.
    pub fn run_count(&self) -> usize {
        self.runs.iter().map(|e| e.repeat).sum()
    }

    /// Runs every entry `repeat` times against `registry`.
    ///
    /// A failing run is recorded in its outcome; it does not stop the plan.
    pub fn execute(&self, registry: &Registry) -> PlanSummary {
        let jobs: Vec<(usize, usize)> = self
            .runs
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| (0..entry.repeat).map(move |r| (i, r)))
            .collect();
        info!(
            event = "plan_start",
            runs = jobs.len(),
            parallel = self.parallel,
        );

        let run = |&(index, repetition): &(usize, usize)| PlanOutcome {
            index,
            repetition,
            environment: self.runs[index].label(),
            algorithm: self.runs[index].algorithm.clone(),
            report: self.execute_entry(&self.runs[index], registry),
        };
        let outcomes = self.map_jobs(&jobs, run);

        PlanSummary {
            name: self.name.clone().unwrap_or_else(|| "plan".to_string()),
            outcomes,
        }
    }

    #[cfg(feature = "parallel")]
    fn map_jobs<F>(&self, jobs: &[(usize, usize)], run: F) -> Vec<PlanOutcome>
    where
        F: Fn(&(usize, usize)) -> PlanOutcome + Send + Sync,
    {
        if self.parallel {
            jobs.par_iter().map(run).collect()
        } else {
            jobs.iter().map(run).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn map_jobs<F>(&self, jobs: &[(usize, usize)], run: F) -> Vec<PlanOutcome>
    where
        F: Fn(&(usize, usize)) -> PlanOutcome,
    {
        jobs.iter().map(run).collect()
    }

    fn execute_entry(
        &self,
        entry: &PlanEntry,
        registry: &Registry,
    ) -> Result<SearchReport, SearchError> {
        let env = self.environment_for(entry, registry)?;
        let kind = registry.algorithm(&entry.algorithm)?;
        let defaults = to_context("defaults.params", &self.defaults.params)
            .map_err(|e| SearchError::Configuration(e.to_string()))?;
        let params = to_context("params", &entry.params)
            .map_err(|e| SearchError::Configuration(e.to_string()))?;
        let ctx = defaults.merged_with(&params);
        debug!(environment = env.id(), algorithm = %kind, "plan entry");
        env.execute(kind, &ctx)
    }

    fn environment_for(
        &self,
        entry: &PlanEntry,
        registry: &Registry,
    ) -> Result<Box<dyn AnyEnvironment>, SearchError> {
        match (&entry.environment, &entry.load) {
            (Some(name), _) => registry.environment(name),
            (None, Some(path)) => {
                let resolved = match &self.base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                Ok(load_environment_file(resolved)?)
            }
            (None, None) => Err(SearchError::Configuration(
                "plan entry names no environment".into(),
            )),
        }
    }
}

/// Converts TOML scalars to context strings. Arrays and tables are rejected.
fn to_context(
    section: &str,
    params: &BTreeMap<String, toml::Value>,
) -> Result<SearchContext, PlanError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        let text = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => {
                return Err(PlanError::Invalid(format!(
                    "{section}.{key}: expected a string, number or boolean, got {}",
                    other.type_str()
                )))
            }
        };
        pairs.push((key.clone(), text));
    }
    Ok(SearchContext::from_pairs(pairs))
}

/// The result of one run of a plan entry.
#[derive(Debug)]
pub struct PlanOutcome {
    /// Position of the entry in the plan.
    pub index: usize,
    pub repetition: usize,
    pub environment: String,
    pub algorithm: String,
    pub report: Result<SearchReport, SearchError>,
}

/// Every outcome of a plan, in plan order.
#[derive(Debug)]
pub struct PlanSummary {
    pub name: String,
    pub outcomes: Vec<PlanOutcome>,
}

impl PlanSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.report, Ok(r) if r.success))
            .count()
    }

    pub fn errors(&self) -> usize {
        self.outcomes.iter().filter(|o| o.report.is_err()).count()
    }

    /// The Markdown rendering, same as `Display`.
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Benchmark: {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- **Runs**: {}", self.outcomes.len())?;
        writeln!(f, "- **Succeeded**: {}", self.succeeded())?;
        writeln!(f, "- **Errors**: {}", self.errors())?;
        writeln!(f)?;
        writeln!(
            f,
            "| # | Environment | Algorithm | Run | Success | Cost | Steps | Expanded | Generated | Time (ms) | Termination |"
        )?;
        writeln!(
            f,
            "|---|-------------|-----------|-----|---------|------|-------|----------|-----------|-----------|-------------|"
        )?;
        for o in &self.outcomes {
            write!(
                f,
                "| {} | {} | {} | {} ",
                o.index + 1,
                o.environment,
                o.algorithm,
                o.repetition + 1
            )?;
            match &o.report {
                Ok(r) => writeln!(
                    f,
                    "| {} | {} | {} | {} | {} | {:.3} | {} |",
                    if r.success { "yes" } else { "no" },
                    r.cost,
                    r.path.len(),
                    r.expanded,
                    r.generated,
                    r.elapsed_ms,
                    r.termination
                )?,
                Err(e) => writeln!(f, "| error | - | - | - | - | - | {} |", escape_cell(&e.to_string()))?,
            }
        }
        Ok(())
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
