//! Trajectory generation: sampler + integrator loop
//!
//! `TrajectoryGenerator::generate` checks every argument before drawing a
//! single random number, samples initial conditions and force constants,
//! then steps the integrator until the step budget is used or the body
//! leaves the box

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::simulation::integrator::{verlet_integrator, BoundaryPolicy, StepOutcome};
use crate::simulation::params::{require_positive, ForceType, SimulationParameters};
use crate::simulation::sampler::InitialConditionSampler;
use crate::simulation::states::{inside_box, NVec2, State};
use crate::simulation::trajectory::{Termination, Trajectory};

/// Fewest positions that can bootstrap the two-step scheme and take one step
pub const MIN_SIMUL_STEPS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrajectoryGenerator {
    pub sampler: InitialConditionSampler,
    pub boundary: BoundaryPolicy,
}

impl TrajectoryGenerator {
    pub fn new(sampler: InitialConditionSampler, boundary: BoundaryPolicy) -> Self {
        Self { sampler, boundary }
    }

    /// Generate one trajectory with freshly sampled initial conditions and
    /// force constants
    pub fn generate<R: Rng>(
        &self,
        rng: &mut R,
        force_type: ForceType,
        time_step: f64,
        max_simul_steps: usize,
        box_size: f64,
        body_mass: f64,
    ) -> Result<Trajectory> {
        check_run_arguments(time_step, max_simul_steps, box_size, body_mass)?;

        let force = self.sampler.sample_force_model(rng, force_type, box_size)?;
        let parameters = SimulationParameters::new(force, time_step, box_size, body_mass, self.boundary)?;
        let seeds = self.sampler.sample_seed_positions(rng, box_size, time_step)?;

        simulate(&parameters, seeds, max_simul_steps)
    }

    /// Generate `count` independent trajectories in parallel
    /// Run `i` uses its own `ChaChaRng` seeded with `base_seed + i`, so the
    /// batch is reproducible whatever the thread scheduling
    pub fn generate_batch(
        &self,
        force_type: ForceType,
        time_step: f64,
        max_simul_steps: usize,
        box_size: f64,
        body_mass: f64,
        count: usize,
        base_seed: u64,
    ) -> Result<Vec<Trajectory>> {
        check_run_arguments(time_step, max_simul_steps, box_size, body_mass)?;
        debug!("generating batch of {count} {force_type} trajectories (base seed {base_seed})");

        (0..count)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaChaRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                self.generate(&mut rng, force_type, time_step, max_simul_steps, box_size, body_mass)
            })
            .collect()
    }
}

/// Generate one trajectory from a string force tag using the default sampler,
/// the terminating boundary policy and an entropy-seeded RNG
pub fn generate(force_type: &str, time_step: f64, max_simul_steps: usize, box_size: f64, body_mass: f64) -> Result<Trajectory> {
    let force_type: ForceType = force_type.parse()?;
    let mut rng = ChaChaRng::from_entropy();
    TrajectoryGenerator::default().generate(&mut rng, force_type, time_step, max_simul_steps, box_size, body_mass)
}

/// Integrate from caller-chosen parameters and seed positions
/// Deterministic: the same inputs always give the same trajectory
pub fn simulate(parameters: &SimulationParameters, seeds: (NVec2, NVec2), max_simul_steps: usize) -> Result<Trajectory> {
    parameters.validate()?;
    check_step_budget(max_simul_steps)?;

    let (mut pos0, mut pos1) = seeds;
    if parameters.boundary == BoundaryPolicy::Reflect {
        // a reflecting box never holds a sample outside it
        let b = parameters.box_size;
        pos0 = pos0.map(|c| c.clamp(0.0, b));
        pos1 = pos1.map(|c| c.clamp(0.0, b));
    }
    let mut state = State::from_seeds(pos0, pos1, max_simul_steps);

    info!(
        "simulating {} for up to {} steps (dt = {}, box = {}, boundary = {:?})",
        parameters.force_type(),
        max_simul_steps,
        parameters.time_step,
        parameters.box_size,
        parameters.boundary
    );

    // a seed already outside the box ends a terminating run right away
    if parameters.boundary == BoundaryPolicy::Terminate
        && !(inside_box(&pos0, parameters.box_size) && inside_box(&pos1, parameters.box_size))
    {
        warn!("seed positions leave the box, returning a 2-point trajectory");
        return Ok(Trajectory::from_positions(state.positions(), *parameters, Termination::Escaped));
    }

    let termination = match verlet_integrator(&mut state, parameters, max_simul_steps) {
        StepOutcome::Escaped => {
            debug!("body left the box at step {}", state.t());
            Termination::Escaped
        }
        StepOutcome::Advanced => Termination::Completed,
    };

    Ok(Trajectory::from_positions(state.positions(), *parameters, termination))
}

fn check_run_arguments(time_step: f64, max_simul_steps: usize, box_size: f64, body_mass: f64) -> Result<()> {
    require_positive("time_step", time_step)?;
    check_step_budget(max_simul_steps)?;
    require_positive("box_size", box_size)?;
    require_positive("body_mass", body_mass)?;
    Ok(())
}

fn check_step_budget(max_simul_steps: usize) -> Result<()> {
    if max_simul_steps < MIN_SIMUL_STEPS {
        return Err(SimError::invalid(
            "max_simul_steps",
            format!("at least {MIN_SIMUL_STEPS} (got {max_simul_steps})"),
        ));
    }
    Ok(())
}
