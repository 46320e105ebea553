//! Microgrid simulator entry point: CLI wiring and config-driven model construction.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::io::export::{export_costs, export_trajectories};
use microgrid_sim::logging::init_logging;
use microgrid_sim::reporting::{render_json, render_report};
use microgrid_sim::{TrajectoryRecorder, simulate};

/// Technical and economic simulation of an islanded microgrid.
///
/// If no --scenario or --preset is given, the diesel_only preset is used.
#[derive(Debug, Parser)]
#[command(name = "microgrid-sim", version, about)]
struct Args {
    /// Load scenario from TOML config file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (diesel_only, pv_battery_diesel, wind_battery_diesel)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Override random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Export per-step trajectories to CSV
    #[arg(long, value_name = "PATH")]
    trajectory_out: Option<PathBuf>,

    /// Export the cost table to CSV
    #[arg(long, value_name = "PATH")]
    costs_out: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    let (mut cfg, base_dir) = match (&args.scenario, &args.preset) {
        (Some(path), _) => {
            let cfg = ScenarioConfig::from_toml_file(path)?;
            (cfg, path.parent().map(PathBuf::from))
        }
        (None, Some(name)) => (ScenarioConfig::from_preset(name)?, None),
        (None, None) => (ScenarioConfig::diesel_only(), None),
    };
    if let Some(seed) = args.seed {
        cfg.timeseries.seed = seed;
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("invalid scenario: {} error(s)", errors.len());
    }

    let microgrid = cfg.build(base_dir.as_deref())?;
    info!(
        steps = microgrid.steps(),
        sources = microgrid.nondispatchables.len(),
        "microgrid built"
    );

    let mut recorder = args
        .trajectory_out
        .as_ref()
        .map(|_| TrajectoryRecorder::for_operation(microgrid.steps()));
    let (stats, costs) = simulate(&microgrid, recorder.as_mut())?;

    if args.json {
        println!("{}", render_json(&stats, &costs)?);
    } else {
        print!("{}", render_report(&stats, &costs));
    }

    if let (Some(path), Some(rec)) = (&args.trajectory_out, &recorder) {
        export_trajectories(rec, microgrid.project.timestep, path)
            .with_context(|| format!("cannot write trajectories to {}", path.display()))?;
        info!(path = %path.display(), "trajectories exported");
    }
    if let Some(path) = &args.costs_out {
        export_costs(&costs, path)
            .with_context(|| format!("cannot write costs to {}", path.display()))?;
        info!(path = %path.display(), "costs exported");
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
