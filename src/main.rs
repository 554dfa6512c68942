//! `u-search` command-line driver.
//!
//! Resolves an environment and an algorithm by name, runs one search and
//! prints the report. Errors are printed to stderr as `error: ...` and exit
//! with status 1; only this file terminates the process.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use u_search::algorithm::Algorithm;
use u_search::{
    load_environment_file, AnyEnvironment, BenchmarkPlan, LoadError, ParameterError, PlanError,
    Registry, SearchContext, SearchError,
};

#[derive(Parser)]
#[command(name = "u-search", version, about = "Benchmark state-space search algorithms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one algorithm against one environment.
    Run(RunArgs),
    /// List registered environments and algorithms.
    List,
    /// Run a TOML benchmark plan and print a Markdown summary.
    Bench {
        /// Plan file.
        plan: PathBuf,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("environment").required(true).args(["on", "load"])))]
struct RunArgs {
    /// Registered environment name.
    #[arg(long, value_name = "ENV")]
    on: Option<String>,

    /// JSON environment definition.
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Algorithm name.
    #[arg(long = "with", value_name = "ALGORITHM")]
    algorithm: String,

    /// Algorithm parameters as `key=value,key=value`; may be repeated.
    #[arg(long, value_name = "PARAMS")]
    params: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Replay the reported path and check it reaches a goal at the reported cost.
    #[arg(long)]
    verify: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Load { path: String, source: LoadError },

    #[error("--params {input:?}: {source}")]
    Params {
        input: String,
        source: ParameterError,
    },

    #[error("{path}: {source}")]
    Plan { path: String, source: PlanError },

    #[error("reported path does not replay to a goal of {0:?} at the reported cost")]
    Verify(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Run(args) => run(args),
        Command::List => {
            list(Registry::global());
            Ok(())
        }
        Command::Bench { plan } => bench(plan),
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: RunArgs) -> Result<(), CliError> {
    let registry = Registry::global();
    let env: Box<dyn AnyEnvironment> = match (&args.on, &args.load) {
        (Some(name), _) => registry.environment(name)?,
        (None, Some(path)) => load_environment_file(path).map_err(|source| CliError::Load {
            path: path.display().to_string(),
            source,
        })?,
        (None, None) => {
            return Err(SearchError::Configuration("one of --on or --load is required".into()).into())
        }
    };
    let kind = registry.algorithm(&args.algorithm)?;

    let mut ctx = SearchContext::new();
    for input in &args.params {
        let parsed = SearchContext::parse(input).map_err(|source| CliError::Params {
            input: input.clone(),
            source,
        })?;
        ctx = ctx.merged_with(&parsed);
    }

    let report = env.execute(kind, &ctx)?;
    if args.verify && report.success {
        let replayed = env.verify(&report.path);
        if !replayed.is_some_and(|cost| (cost - report.cost).abs() <= 1e-9 * cost.max(1.0)) {
            return Err(CliError::Verify(env.id().to_string()));
        }
    }

    match args.format {
        Format::Text => {
            println!("{report}");
            if args.verify && report.success {
                println!("verified: true");
            }
        }
        Format::Json => println!("{}", report.to_json()?),
    }
    tracing::debug!(algorithm = kind.name(), "run complete");
    Ok(())
}

fn list(registry: &Registry) {
    println!("environments:");
    for name in registry.environment_names() {
        println!("  {name}");
    }
    println!("algorithms:");
    for name in registry.algorithm_names() {
        match registry.algorithm(&name) {
            Ok(kind) if kind.name() != name => println!("  {name} (alias of {kind})"),
            _ => println!("  {name}"),
        }
    }
}

fn bench(path: PathBuf) -> Result<(), CliError> {
    let plan = BenchmarkPlan::load(&path).map_err(|source| CliError::Plan {
        path: path.display().to_string(),
        source,
    })?;
    let summary = plan.execute(Registry::global());
    print!("{}", summary.to_markdown());
    Ok(())
}
