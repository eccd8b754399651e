//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - the trajectory generator (sampler bounds + boundary policy)
//! - the run request (force law, step size, budget, box, mass, seed)
//! - the frame renderer and render settings
//! - the run store the results are written to
//!
//! All ranges and vector lengths are validated here, before any run starts

use std::path::PathBuf;

use log::info;
use rand::RngCore;

use crate::configuration::config::{RenderConfig, ScenarioConfig};
use crate::error::{Result, SimError};
use crate::simulation::generator::TrajectoryGenerator;
use crate::simulation::params::{require_positive, ForceType};
use crate::simulation::sampler::InitialConditionSampler;
use crate::simulation::states::vec2_from_slice;
use crate::storage::run_store::{RenderedRun, RunStore};
use crate::visualization::renderer::{SimulationRenderer, Sprite};

/// Arguments of one `generate` call, shared by every run of a scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRequest {
    pub force_type: ForceType,
    pub time_step: f64,
    pub max_simul_steps: usize,
    pub box_size: f64,
    pub body_mass: f64,
    pub seed: u64,
}

/// Runtime bundle constructed from a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub generator: TrajectoryGenerator,
    pub request: RunRequest,
    pub renderer: SimulationRenderer,
    pub render: RenderConfig,
    pub store: RunStore,
    pub run_name: String,
    pub number_of_trajectories: usize,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Sampler: [low, high] pairs -> validated bounds
        let pos = vec2_from_slice("sampler.starting_position", &cfg.sampler.starting_position)?;
        let vel = vec2_from_slice("sampler.starting_velocity", &cfg.sampler.starting_velocity)?;
        let sampler = InitialConditionSampler::new(pos.x, pos.y, vel.x, vel.y)?;

        // Generator: sampler + boundary policy
        let s_cfg = cfg.simulation;
        let generator = TrajectoryGenerator::new(sampler, s_cfg.boundary);

        // Request: checked up front so a bad file fails before any work
        require_positive("simulation.time_step", s_cfg.time_step)?;
        require_positive("simulation.box_size", s_cfg.box_size)?;
        require_positive("simulation.body_mass", s_cfg.body_mass)?;
        let request = RunRequest {
            force_type: s_cfg.force_type,
            time_step: s_cfg.time_step,
            max_simul_steps: s_cfg.max_simul_steps,
            box_size: s_cfg.box_size,
            body_mass: s_cfg.body_mass,
            seed: s_cfg.seed.unwrap_or_else(|| rand::thread_rng().next_u64()),
        };

        // Renderer: disc sprite unless a sprite image is configured
        let r_cfg = cfg.render;
        let renderer = match &r_cfg.sprite {
            Some(path) => SimulationRenderer::with_sprite(r_cfg.image_pixel_size, Sprite::from_file(path)?)?,
            None => SimulationRenderer::new(r_cfg.image_pixel_size)?,
        };
        if r_cfg.frame_count == 0 {
            return Err(SimError::invalid("render.frame_count", "at least 1"));
        }

        let o_cfg = cfg.output;
        if o_cfg.number_of_trajectories == 0 {
            return Err(SimError::invalid("output.number_of_trajectories", "at least 1"));
        }

        Ok(Self {
            generator,
            request,
            renderer,
            render: r_cfg,
            store: RunStore::new(o_cfg.directory),
            run_name: o_cfg.run_name,
            number_of_trajectories: o_cfg.number_of_trajectories,
        })
    }

    /// Generate, render and store every run of the scenario
    /// Runs are saved as `<run_name>_<i>`; returns their directories
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        let req = self.request;
        info!(
            "scenario `{}`: {} x {} trajectories, seed {}",
            self.run_name, self.number_of_trajectories, req.force_type, req.seed
        );

        let trajectories = self.generator.generate_batch(
            req.force_type,
            req.time_step,
            req.max_simul_steps,
            req.box_size,
            req.body_mass,
            self.number_of_trajectories,
            req.seed,
        )?;

        let mut dirs = Vec::with_capacity(trajectories.len());
        for (i, trajectory) in trajectories.iter().enumerate() {
            let wants_images = self.render.frames || self.render.gif;
            let frames = if wants_images {
                self.renderer
                    .render_frames(&trajectory.x, &trajectory.y, req.box_size, self.render.frame_count)?
            } else {
                Vec::new()
            };
            let rendered = wants_images.then_some(RenderedRun {
                frames: &frames,
                write_frames: self.render.frames,
                gif_delay_ms: self.render.gif.then_some(self.render.gif_delay_ms),
            });

            let name = format!("{}_{}", self.run_name, i);
            dirs.push(self.store.save_run(&name, trajectory, rendered)?);
        }
        Ok(dirs)
    }
}
