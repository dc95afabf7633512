use std::path::PathBuf;

use clap::Parser;

use tute_bench::config::{ResolvedOutputs, SimulationConfig};
use tute_bench::logging::init_logging;
use tute_bench::runner::SimulationRunner;

/// Simulation harness pitting Tute policies against each other.
#[derive(Debug, Parser)]
#[command(
    name = "tute-bench",
    author,
    version,
    about = "Deterministic Tute simulation harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/simulation.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to play.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed for round generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of seat permutations per round.
    #[arg(long, value_name = "COUNT")]
    permutations: Option<usize>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(rounds) = cli.rounds {
        config.rounds.count = rounds;
    }
    if let Some(seed) = cli.seed {
        config.rounds.seed = Some(seed);
    }
    if let Some(permutations) = cli.permutations {
        config.rounds.permutations = permutations;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let rounds = config.rounds.count;
    let permutations = config.rounds.permutations;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({rounds} rounds, {permutations} permutations)",
        if agent_count == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SimulationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} rounds × {} permutations → {} rows at {}",
        summary.rounds_played,
        summary.permutations,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
