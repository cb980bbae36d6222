//! Legislative Deliberation Simulator
//!
//! Runs one bill through mingling, committee, lobbying, the floor and the
//! threshold vote, with a bounded revision loop after a KILLED outcome.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

use legis_core::config::{OracleKind, PopularVoteMode, SimConfig};
use legis_core::voting::feed_ballots;
use legis_core::{OllamaOracle, Oracle, ScriptedOracle, Simulation, SimulationError, TracingStatus};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "legis_sim")]
#[command(about = "LLM-backed legislative deliberation simulator")]
struct Args {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bill text file, overriding `paths.bill`
    #[arg(long)]
    bill: Option<PathBuf>,

    /// Loop-backs allowed after a KILLED vote
    #[arg(long)]
    max_revisions: Option<u32>,

    /// Directory for the run's artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Tie-break popular vote: disabled, stdin or timed
    #[arg(long, value_parser = parse_popular_vote)]
    popular_vote: Option<PopularVoteMode>,

    /// Use canned offline replies instead of a model
    #[arg(long)]
    offline: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn parse_popular_vote(value: &str) -> Result<PopularVoteMode, String> {
    match value.trim().to_lowercase().as_str() {
        "disabled" | "off" => Ok(PopularVoteMode::Disabled),
        "stdin" => Ok(PopularVoteMode::Stdin),
        "timed" => Ok(PopularVoteMode::Timed),
        other => Err(format!("unknown popular vote mode: {}", other)),
    }
}

fn load_config(args: &Args) -> Result<SimConfig, SimulationError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(bill) = &args.bill {
        config.paths.bill = bill.clone();
    }
    if let Some(max_revisions) = args.max_revisions {
        config.simulation.max_revisions = max_revisions;
    }
    if let Some(output_dir) = &args.output_dir {
        config.simulation.output_dir = output_dir.clone();
    }
    if let Some(mode) = args.popular_vote {
        config.popular_vote.mode = mode;
    }
    if args.offline {
        config.oracle.kind = OracleKind::Scripted;
    }
    config.validate()?;
    Ok(config)
}

fn build_oracle(config: &SimConfig) -> Result<Arc<dyn Oracle>, SimulationError> {
    Ok(match config.oracle.kind {
        OracleKind::Scripted => Arc::new(ScriptedOracle::offline()),
        OracleKind::Ollama => Arc::new(OllamaOracle::new(
            config.oracle.base_url.clone(),
            config.oracle.model.clone(),
            config.oracle.default_tokens,
            config.oracle.timeout(),
        )?),
    })
}

fn run(args: Args) -> Result<(), SimulationError> {
    let config = load_config(&args)?;
    info!(
        bill = %config.paths.bill.display(),
        oracle = ?config.oracle.kind,
        max_revisions = config.simulation.max_revisions,
        "simulator starting"
    );

    let oracle = build_oracle(&config)?;
    let mut simulation = Simulation::from_config(&config, oracle, Arc::new(TracingStatus))?;
    if config.popular_vote.mode == PopularVoteMode::Timed {
        if let Some(collector) = simulation.vote_collector() {
            info!("timed popular vote reads '<voter> yes|no' lines from stdin");
            thread::spawn(move || feed_ballots(std::io::stdin().lock(), collector));
        }
    }
    let mut state = simulation.load_state(&config)?;
    let summary = simulation.run(&mut state)?;

    println!();
    println!("Bill: {} ({})", summary.report.bill_title, summary.report.bill_id);
    println!(
        "Agency: {}",
        summary.report.selected_agency_id.as_deref().unwrap_or("(none)")
    );
    if let Some(votes) = &summary.report.vote_result {
        println!(
            "Floor vote: yes={}, no={}, abstain={}",
            votes.yes_count(),
            votes.no_count(),
            votes.abstain_count()
        );
    }
    println!("Revisions: {}", summary.report.revisions);
    println!("Outcome: {}", summary.report.outcome);
    println!("Artifacts: {}", simulation.output_dir().display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_default_config {
        return match SimConfig::default().to_toml() {
            Ok(toml) => {
                print!("{}", toml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
