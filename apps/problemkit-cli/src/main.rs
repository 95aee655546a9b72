mod fixture;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use problemkit::{MessageCatalog, ProblemDispatcher, ProblemsConfig};

use crate::fixture::Fixture;

/// problemkit - classify failures into problem envelopes
#[derive(Parser)]
#[command(name = "problemkit")]
#[command(about = "problemkit - classify failures into problem envelopes")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a failure fixture and print its problem envelope as JSON
    Classify {
        /// YAML fixture describing the raised failure
        fixture: PathBuf,

        /// Pretty-print the envelope
        #[arg(long)]
        pretty: bool,
    },
    /// Validate configuration and exit
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (PROBLEMKIT__*)
    let config = ProblemsConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", serde_saphyr::to_string(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Classify { fixture, pretty } => classify(config, &fixture, pretty),
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &ProblemsConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", serde_saphyr::to_string(config)?);
    Ok(())
}

fn classify(config: ProblemsConfig, path: &Path, pretty: bool) -> Result<()> {
    let fixture = Fixture::load(path)?;
    let ctx = fixture.context();
    let failure = fixture.failure.build()?;

    let dispatcher = ProblemDispatcher::new(config, MessageCatalog::pt_br());
    let problem = dispatcher.dispatch(&*failure, &ctx);
    tracing::info!(
        status = problem.status().as_u16(),
        problem_type = problem.type_url(),
        "failure classified"
    );

    let out = if pretty {
        serde_json::to_string_pretty(&problem)?
    } else {
        serde_json::to_string(&problem)?
    };
    println!("{out}");
    Ok(())
}
