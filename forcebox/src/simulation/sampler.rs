//! Random initial conditions
//!
//! The two-step integrator needs two seed positions. `pos[1]` is drawn inside
//! the box, a velocity is drawn per axis, and `pos[0]` is back-extrapolated
//! so the first velocity estimate equals the drawn velocity.
//! The run-wide force constants are drawn here too, once per trajectory

use std::f64::consts::TAU;

use rand::Rng;

use crate::error::{Result, SimError};
use crate::simulation::forces::ForceModel;
use crate::simulation::params::{require_positive, ForceType};
use crate::simulation::states::NVec2;

/// Magnitude of the sampled gravity vector, keeps default runs inside the box
pub const GRAVITY_MAGNITUDE: f64 = 0.5;
/// Range of the sampled magnetic field z-component
pub const MAGNETIC_FIELD_RANGE: (f64, f64) = (-2.0, 2.0);
/// Range of the sampled spring constant
pub const SPRING_CONSTANT_RANGE: (f64, f64) = (0.5, 2.0);
/// Band of the box (as fractions of `box_size`) the equilibrium point is drawn from
pub const EQUILIBRIUM_BAND: (f64, f64) = (0.4, 0.6);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialConditionSampler {
    low_position: f64, // fraction of box_size
    high_position: f64, // fraction of box_size
    low_velocity: f64, // per axis
    high_velocity: f64, // per axis
}

impl Default for InitialConditionSampler {
    fn default() -> Self {
        Self {
            low_position: 0.1,
            high_position: 0.9,
            low_velocity: -1.0,
            high_velocity: 1.0,
        }
    }
}

impl InitialConditionSampler {
    /// Sampler with explicit bounds
    /// - position limits are fractions of the box and must satisfy `0 <= low < high <= 1`
    /// - velocity limits must satisfy `low < high`
    pub fn new(low_position: f64, high_position: f64, low_velocity: f64, high_velocity: f64) -> Result<Self> {
        if !(low_position < high_position) {
            return Err(SimError::invalid(
                "low_starting_position_limit",
                format!("a value < high_starting_position_limit ({low_position} >= {high_position})"),
            ));
        }
        if low_position < 0.0 || high_position > 1.0 {
            return Err(SimError::invalid(
                "starting_position_limits",
                format!("fractions of the box inside [0, 1] (got [{low_position}, {high_position}])"),
            ));
        }
        if !(low_velocity < high_velocity) || !low_velocity.is_finite() || !high_velocity.is_finite() {
            return Err(SimError::invalid(
                "low_starting_velocity_limit",
                format!("a finite value < high_starting_velocity_limit ({low_velocity} >= {high_velocity})"),
            ));
        }

        Ok(Self {
            low_position,
            high_position,
            low_velocity,
            high_velocity,
        })
    }

    pub fn position_limits(&self) -> (f64, f64) {
        (self.low_position, self.high_position)
    }

    pub fn velocity_limits(&self) -> (f64, f64) {
        (self.low_velocity, self.high_velocity)
    }

    /// Draw `(pos[0], pos[1])` with `pos[0] = pos[1] - v * time_step`
    pub fn sample_seed_positions<R: Rng>(&self, rng: &mut R, box_size: f64, time_step: f64) -> Result<(NVec2, NVec2)> {
        require_positive("box_size", box_size)?;
        require_positive("time_step", time_step)?;

        let lo = self.low_position * box_size;
        let hi = self.high_position * box_size;
        let pos1 = NVec2::new(rng.gen_range(lo..=hi), rng.gen_range(lo..=hi));

        let velocity = NVec2::new(
            rng.gen_range(self.low_velocity..=self.high_velocity),
            rng.gen_range(self.low_velocity..=self.high_velocity),
        );

        // back-extrapolate so (pos[1] - pos[0]) / dt is the drawn velocity
        let pos0 = pos1 - velocity * time_step;
        Ok((pos0, pos1))
    }

    /// Draw the run-wide constants of the selected force law
    /// The quadrant map has fixed constants and draws nothing
    pub fn sample_force_model<R: Rng>(&self, rng: &mut R, force_type: ForceType, box_size: f64) -> Result<ForceModel> {
        require_positive("box_size", box_size)?;

        let model = match force_type {
            ForceType::NoForce => ForceModel::NoForce,
            ForceType::Gravity => {
                let angle = rng.gen_range(0.0..TAU);
                ForceModel::Gravity {
                    g_constant: GRAVITY_MAGNITUDE * NVec2::new(angle.cos(), angle.sin()),
                }
            }
            ForceType::MagneticField => ForceModel::MagneticField {
                b_z: rng.gen_range(MAGNETIC_FIELD_RANGE.0..=MAGNETIC_FIELD_RANGE.1),
                charge: 1.0,
                e_field: NVec2::zeros(),
            },
            ForceType::HarmonicOscillator => {
                let lo = EQUILIBRIUM_BAND.0 * box_size;
                let hi = EQUILIBRIUM_BAND.1 * box_size;
                ForceModel::HarmonicOscillator {
                    spring_constant: rng.gen_range(SPRING_CONSTANT_RANGE.0..=SPRING_CONSTANT_RANGE.1),
                    equilibrium_point: NVec2::new(rng.gen_range(lo..=hi), rng.gen_range(lo..=hi)),
                }
            }
            ForceType::Regions => ForceModel::quadrant_map(box_size),
        };
        Ok(model)
    }
}
