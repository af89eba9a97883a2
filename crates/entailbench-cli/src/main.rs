//! Command-line entry point.
//!
//! Loads `.env`, sets up logging, reads the run configuration and evaluates every
//! configured model on the EL and ELH benchmarks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use entailbench_config::{Credentials, RunConfig};
use entailbench_eval::{summarize_file, Evaluator, RunOutcome, Runner};
use entailbench_llm::{list_local_models, Dispatcher};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "entailbench", version, about = "Benchmark LLMs on EL/ELH entailment questions")]
struct Cli {
    /// JSON run configuration; built-in defaults are used when omitted.
    #[arg(short, long, env = "ENTAILBENCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the configured models (default).
    Run {
        /// Evaluate these models instead of the configured list.
        #[arg(short, long = "model")]
        models: Vec<String>,

        /// Disable the progress bar.
        #[arg(long)]
        no_progress: bool,
    },
    /// Print the accuracy report of an existing results file.
    Summarize { results: PathBuf },
    /// List models installed on the local Ollama server.
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command.unwrap_or(Command::Run { models: Vec::new(), no_progress: false }) {
        Command::Run { models, no_progress } => run(config, models, no_progress).await,
        Command::Summarize { results } => {
            let summary = summarize_file(&results)
                .with_context(|| format!("failed to summarize {}", results.display()))?;
            println!("{}", summary);
            Ok(())
        }
        Command::Models => models(&config).await,
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RunConfig> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Ok(RunConfig::from_file(path)?)
        }
        None => Ok(RunConfig::default()),
    }
}

async fn run(mut config: RunConfig, models: Vec<String>, no_progress: bool) -> Result<()> {
    if !models.is_empty() {
        config.models = models;
    }
    config.validate()?;

    let credentials = Credentials::from_env();
    let dispatcher = Dispatcher::from_config(&config, &credentials);

    for model in &config.models {
        if !dispatcher.registry().has(model) {
            warn!("No backend routes '{}'; every call will fail", model);
        }
    }
    info!("Evaluating {} model(s) on {} profile(s)", config.models.len(), config.profiles.len());

    let evaluator = Evaluator::new(dispatcher).with_progress(!no_progress);
    let outcomes = Runner::new(config, evaluator).run().await?;

    for outcome in &outcomes {
        match outcome {
            RunOutcome::Completed { model, profile, summary, .. } => {
                info!("{} on {}: {:.2}%", model, profile, summary.accuracy());
            }
            RunOutcome::Skipped { model, profile, .. } => {
                info!("{} on {}: skipped", model, profile);
            }
        }
    }
    Ok(())
}

async fn models(config: &RunConfig) -> Result<()> {
    let host = &config.backends.ollama.host;
    let installed = list_local_models(host).await?;

    println!("Models on {}:", host);
    for name in &installed {
        let routed = config.backends.ollama.models.contains(name);
        println!("  {} {}", if routed { "*" } else { " " }, name);
    }
    println!("(* = routed to Ollama by the current config)");
    Ok(())
}
