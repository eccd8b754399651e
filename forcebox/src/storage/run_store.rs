//! Persistence of generated runs
//!
//! Each run gets its own directory under the store root:
//!
//! ```text
//! <root>/<run_name>/
//!     x_coords.json
//!     y_coords.json
//!     parameters.json
//!     simulation_snapshots/frame_<i>.png   (optional)
//!     simulation.gif                       (optional)
//! ```
//!
//! An existing run directory is never overwritten

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::info;

use crate::error::{Result, SimError};
use crate::simulation::params::SimulationParameters;
use crate::simulation::trajectory::Trajectory;
use crate::visualization::renderer::{save_frames, write_gif};

pub const X_COORDS_FILE: &str = "x_coords.json";
pub const Y_COORDS_FILE: &str = "y_coords.json";
pub const PARAMETERS_FILE: &str = "parameters.json";
pub const SNAPSHOTS_DIR: &str = "simulation_snapshots";
pub const GIF_FILE: &str = "simulation.gif";

/// Rendered output to store next to the coordinates
#[derive(Debug, Clone, Copy)]
pub struct RenderedRun<'a> {
    pub frames: &'a [RgbaImage],
    pub write_frames: bool,
    pub gif_delay_ms: Option<u32>, // None = no gif
}

#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run_dir(&self, run_name: &str) -> PathBuf {
        self.root.join(run_name)
    }

    /// Persist a trajectory (and optionally its frames / gif) under `run_name`
    /// Fails with `ResourceConflict` if the run directory already exists
    pub fn save_run(&self, run_name: &str, trajectory: &Trajectory, rendered: Option<RenderedRun<'_>>) -> Result<PathBuf> {
        if run_name.is_empty() || run_name.contains(&['/', '\\'][..]) || run_name == "." || run_name == ".." {
            return Err(SimError::invalid(
                "run_name",
                format!("a single non-empty path component (got `{run_name}`)"),
            ));
        }

        let dir = self.run_dir(run_name);
        if dir.exists() {
            return Err(SimError::ResourceConflict(dir));
        }
        fs::create_dir_all(&self.root)?;
        // fails if another writer created it in the meantime
        fs::create_dir(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => SimError::ResourceConflict(dir.clone()),
            _ => SimError::Io(e),
        })?;

        fs::write(dir.join(X_COORDS_FILE), serde_json::to_string(&trajectory.x)?)?;
        fs::write(dir.join(Y_COORDS_FILE), serde_json::to_string(&trajectory.y)?)?;
        fs::write(dir.join(PARAMETERS_FILE), trajectory.parameters.to_json()?)?;

        if let Some(rendered) = rendered {
            if rendered.write_frames {
                save_frames(rendered.frames, &dir.join(SNAPSHOTS_DIR))?;
            }
            if let Some(delay_ms) = rendered.gif_delay_ms {
                write_gif(rendered.frames, &dir.join(GIF_FILE), delay_ms)?;
            }
        }

        info!("saved run `{}` ({} samples) to {}", run_name, trajectory.len(), dir.display());
        Ok(dir)
    }
}

/// Load the coordinate pair of a stored run
pub fn load_coordinates(run_dir: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let x: Vec<f64> = serde_json::from_str(&fs::read_to_string(run_dir.join(X_COORDS_FILE))?)?;
    let y: Vec<f64> = serde_json::from_str(&fs::read_to_string(run_dir.join(Y_COORDS_FILE))?)?;
    if x.len() != y.len() {
        return Err(SimError::invalid(
            Y_COORDS_FILE,
            format!("as many samples as {X_COORDS_FILE} ({} != {})", y.len(), x.len()),
        ));
    }
    Ok((x, y))
}

/// Load the parameters record of a stored run, `None` when the run has none
pub fn load_parameters(run_dir: &Path) -> Result<Option<SimulationParameters>> {
    let path = run_dir.join(PARAMETERS_FILE);
    if !path.exists() {
        return Ok(None);
    }
    SimulationParameters::from_json(&fs::read_to_string(path)?).map(Some)
}
