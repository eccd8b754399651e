//! Offline inspection of a stored run
//!
//! Loads the coordinate arrays and (if present) the parameters record,
//! reconstructs the energy series and writes the trajectory and energy plots

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::Result;
use crate::storage::run_store::{load_coordinates, load_parameters};
use crate::visualization::energy::{reconstruct_energy, EnergyProfile};
use crate::visualization::plot::{plot_energy, plot_trajectory};

pub const TRAJECTORY_PLOT_FILE: &str = "trajectory.png";
pub const ENERGY_PLOT_FILE: &str = "energy.png";

const PLOT_SIZE: u32 = 512;

/// What `visualize_run` produced
#[derive(Debug, Clone)]
pub struct VisualizationReport {
    pub samples: usize,
    pub trajectory_plot: PathBuf,
    pub energy: Option<EnergyProfile>, // None when the run has no parameters record
    pub energy_plot: Option<PathBuf>,
}

/// Plot a stored run into `out_dir`
/// `default_box_size` frames the trajectory when the run carries no parameters
pub fn visualize_run(run_dir: &Path, out_dir: &Path, default_box_size: f64) -> Result<VisualizationReport> {
    let (x, y) = load_coordinates(run_dir)?;
    let params = load_parameters(run_dir)?;
    fs::create_dir_all(out_dir)?;

    let box_size = params.as_ref().map_or(default_box_size, |p| p.box_size);
    let trajectory_plot = out_dir.join(TRAJECTORY_PLOT_FILE);
    plot_trajectory(&x, &y, box_size, PLOT_SIZE).save(&trajectory_plot)?;

    let (energy, energy_plot) = match params {
        Some(params) => {
            let profile = reconstruct_energy(&x, &y, &params)?;
            let path = out_dir.join(ENERGY_PLOT_FILE);
            plot_energy(&profile, PLOT_SIZE * 2, PLOT_SIZE).save(&path)?;
            info!(
                "{}: {} energy samples, max relative drift {:.3e}",
                run_dir.display(),
                profile.len(),
                profile.max_relative_drift()
            );
            (Some(profile), Some(path))
        }
        None => {
            warn!("{} has no parameters record, skipping energy plot", run_dir.display());
            (None, None)
        }
    };

    Ok(VisualizationReport {
        samples: x.len(),
        trajectory_plot,
        energy,
        energy_plot,
    })
}
