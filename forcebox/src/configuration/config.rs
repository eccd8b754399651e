//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`SimulationConfig`] – force law, step size, step budget, box and body
//! - [`SamplerConfig`]    – bounds for the random initial conditions
//! - [`RenderConfig`]     – frame size, frame count and GIF settings
//! - [`OutputConfig`]     – where runs are persisted and how many to generate
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! simulation:
//!   force_type: gravity     # no_force | gravity | magnetic_field | harmonic_oscillator | regions
//!   time_step: 0.01
//!   max_simul_steps: 3000
//!   box_size: 10.0
//!   body_mass: 1.0
//!   boundary: terminate     # or "reflect"
//!   seed: 42                # optional, entropy-seeded when absent
//!
//! sampler:
//!   starting_position: [0.1, 0.9]   # fractions of box_size
//!   starting_velocity: [-1.0, 1.0]  # per axis
//!
//! render:
//!   image_pixel_size: 256
//!   frame_count: 100
//!   gif: true
//!   gif_delay_ms: 40
//!   sprite: null            # optional path to a PNG sprite
//!
//! output:
//!   directory: simulation_frames
//!   run_name: gravity_test
//!   number_of_trajectories: 1
//! ```
//!
//! Only `simulation` is required. The scenario builder maps this into the
//! runtime types, validating every range and vector length on the way.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::simulation::integrator::BoundaryPolicy;
use crate::simulation::params::ForceType;

/// Physical and numerical setup of the runs
#[derive(Deserialize, Debug, Clone)]
pub struct SimulationConfig {
    pub force_type: ForceType, // which force law acts on the body
    pub time_step: f64, // integration step dt
    pub max_simul_steps: usize, // upper bound on trajectory length
    pub box_size: f64, // side of the square domain
    #[serde(default = "default_body_mass")]
    pub body_mass: f64, // mass of the body
    #[serde(default)]
    pub boundary: BoundaryPolicy, // terminate on exit or reflect off the walls
    #[serde(default)]
    pub seed: Option<u64>, // deterministic seed, runs are reproducible when set
}

/// Bounds for the random initial conditions
/// Both entries are `[low, high]` pairs; length is checked when the scenario is built
#[derive(Deserialize, Debug, Clone)]
pub struct SamplerConfig {
    #[serde(default = "default_starting_position")]
    pub starting_position: Vec<f64>, // fraction of box_size for pos[1]
    #[serde(default = "default_starting_velocity")]
    pub starting_velocity: Vec<f64>, // per-axis initial velocity
}

/// Frame and GIF output
#[derive(Deserialize, Debug, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_image_pixel_size")]
    pub image_pixel_size: u32, // frames are square
    #[serde(default = "default_frame_count")]
    pub frame_count: usize, // frames sampled along the trajectory
    #[serde(default = "default_true")]
    pub frames: bool, // write PNG frames at all
    #[serde(default = "default_true")]
    pub gif: bool, // also encode an animated GIF
    #[serde(default = "default_gif_delay_ms")]
    pub gif_delay_ms: u32, // delay between GIF frames
    #[serde(default)]
    pub sprite: Option<PathBuf>, // PNG drawn at the body position, disc when absent
}

/// Persistence of generated runs
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf, // root holding one directory per run
    #[serde(default = "default_run_name")]
    pub run_name: String, // run directories are `<run_name>_<i>`
    #[serde(default = "default_number_of_trajectories")]
    pub number_of_trajectories: usize, // runs generated from this scenario
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig, // physics of every run
    #[serde(default)]
    pub sampler: SamplerConfig, // initial condition bounds
    #[serde(default)]
    pub render: RenderConfig, // frame and GIF output
    #[serde(default)]
    pub output: OutputConfig, // where runs go
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            starting_position: default_starting_position(),
            starting_velocity: default_starting_velocity(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_pixel_size: default_image_pixel_size(),
            frame_count: default_frame_count(),
            frames: true,
            gif: true,
            gif_delay_ms: default_gif_delay_ms(),
            sprite: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            run_name: default_run_name(),
            number_of_trajectories: default_number_of_trajectories(),
        }
    }
}

fn default_body_mass() -> f64 {
    1.0
}

fn default_starting_position() -> Vec<f64> {
    vec![0.1, 0.9]
}

fn default_starting_velocity() -> Vec<f64> {
    vec![-1.0, 1.0]
}

fn default_image_pixel_size() -> u32 {
    256
}

fn default_frame_count() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_gif_delay_ms() -> u32 {
    40
}

fn default_directory() -> PathBuf {
    PathBuf::from("simulation_frames")
}

fn default_run_name() -> String {
    "run".to_string()
}

fn default_number_of_trajectories() -> usize {
    1
}
