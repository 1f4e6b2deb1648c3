//! ASCII Lab headless runner
//!
//! Loads a world definition, steps the simulation until its step cap is
//! reached or every agent is exhausted, and reports at each checkpoint.

use clap::Parser;
use lab_core::config::DEFAULT_CONFIG_PATH;
use lab_core::events::EventLogger;
use lab_core::output::write_snapshot;
use lab_core::{Config, SimError, Simulation};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the runner
#[derive(Parser, Debug)]
#[command(name = "ascii_lab")]
#[command(about = "Grid-world agent simulation, headless")]
struct Args {
    /// World definition file; without it `lab.toml` is used if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Step cap, overriding the config
    #[arg(long)]
    steps: Option<u64>,

    /// Directory for JSON snapshots written at each checkpoint
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// JSONL file receiving every turn event
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ascii_lab=info,lab_core=info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(DEFAULT_CONFIG_PATH)?,
    };
    if let Some(seed) = args.seed {
        config.world.random_seed = Some(seed);
    }
    if let Some(steps) = args.steps {
        config.world.max_steps = Some(steps);
    }

    if args.dump_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut sim = Simulation::new(&config)?;
    let mut logger = match &args.events {
        Some(path) => EventLogger::new(path)?,
        None => EventLogger::null(),
    };

    tracing::info!(
        "Running '{}' with seed {} (max steps: {})",
        config.world.name,
        sim.seed(),
        config
            .world
            .max_steps
            .map_or_else(|| "none".to_string(), |m| m.to_string())
    );

    if sim.time_to_checkpoint() {
        checkpoint(&sim, args.snapshot_dir.as_ref())?;
    }

    while !sim.is_end() {
        if sim.all_inert() {
            tracing::info!("Every agent is exhausted at step {}", sim.steps());
            break;
        }

        sim.step()?;
        logger.log_batch(&sim.drain_events())?;

        if sim.time_to_checkpoint() {
            checkpoint(&sim, args.snapshot_dir.as_ref())?;
        }
    }

    let snapshot = sim.snapshot();
    if let Some(dir) = &args.snapshot_dir {
        let path = write_snapshot(dir, &snapshot)?;
        tracing::info!("Wrote final snapshot {}", path.display());
    }
    logger.flush()?;

    tracing::info!(
        "Simulation complete after {} steps: {} of {} agents still active, {} turn events",
        snapshot.steps,
        snapshot.live_agents(),
        snapshot.agents.len(),
        logger.event_count()
    );
    Ok(())
}

fn checkpoint(sim: &Simulation, snapshot_dir: Option<&PathBuf>) -> Result<(), SimError> {
    let snapshot = sim.snapshot();
    tracing::info!(
        "Step {}: {} agents active, total energy {}",
        snapshot.steps,
        snapshot.live_agents(),
        snapshot.total_energy()
    );
    if let Some(leader) = snapshot.agents.first() {
        tracing::debug!(
            "  highest energy: {} ({}) at {:?}",
            leader.agent_id,
            leader.energy,
            leader.position
        );
    }

    if let Some(dir) = snapshot_dir {
        let path = write_snapshot(dir, &snapshot)?;
        tracing::debug!("  wrote {}", path.display());
    }
    Ok(())
}
