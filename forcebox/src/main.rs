use forcebox::{visualize_run, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "2D point-mass trajectories under selectable force laws")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate, render and store the runs of a scenario
    Simulate {
        /// Scenario file, looked up in `scenarios/` when not an existing path
        #[arg(short, default_value = "gravity.yaml")]
        file_name: String,
    },
    /// Plot trajectory and energy of a stored run
    Visualize {
        run_dir: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Box size used when the run has no parameters record
        #[arg(long, default_value_t = 10.0)]
        box_size: f64,
    },
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.is_file() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let scenario_cfg = ScenarioConfig::from_yaml_file(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Simulate { file_name } => {
            let scenario_cfg = load_scenario_from_yaml(&file_name)?;
            let scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;
            let dirs = scenario.run()?;
            info!("done, {} runs stored under {}", dirs.len(), scenario.store.root().display());
        }
        Command::Visualize { run_dir, out, box_size } => {
            let out = out.unwrap_or_else(|| run_dir.join("plots"));
            let report = visualize_run(&run_dir, &out, box_size)
                .with_context(|| format!("failed to visualize {}", run_dir.display()))?;
            info!("{} samples plotted to {}", report.samples, out.display());
        }
    }

    Ok(())
}
