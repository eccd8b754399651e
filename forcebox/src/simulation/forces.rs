//! Force laws acting on the point mass
//!
//! `ForceModel` is a tagged enum over the supported laws. Each variant
//! carries only the constants it needs, and evaluation is a single
//! exhaustive match. `Regions` splits the box into quadrants with a
//! different law in each. All functions here are pure

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::simulation::params::{vec2_serde, ForceType};
use crate::simulation::states::{vec2_from_slice, NVec2};

/// Force law plus its per-run constants
///
/// Serialized with a `force_type` tag so a parameters record reads as
/// `{"force_type": "gravity", "g_constant": [gx, gy], ...}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "force_type", rename_all = "snake_case")]
pub enum ForceModel {
    /// Free motion
    NoForce,

    /// Uniform field: F = m g
    Gravity {
        #[serde(with = "vec2_serde")]
        g_constant: NVec2,
    },

    /// Planar Lorentz force from a field along z plus an optional in-plane
    /// electric field: F = q (E + (v_y B_z, -v_x B_z))
    MagneticField {
        #[serde(rename = "B_z")]
        b_z: f64,
        #[serde(default = "unit_charge")]
        charge: f64,
        #[serde(rename = "E", with = "vec2_serde", default = "zero_field")]
        e_field: NVec2,
    },

    /// Isotropic spring: F = -k (r - r0)
    HarmonicOscillator {
        spring_constant: f64,
        #[serde(with = "vec2_serde")]
        equilibrium_point: NVec2,
    },

    /// One law per quadrant around `center`:
    /// gravity upper left, spring to `anchor` upper right,
    /// Lorentz force lower left, free motion lower right
    Regions {
        #[serde(with = "vec2_serde")]
        center: NVec2,
        #[serde(with = "vec2_serde")]
        g_constant: NVec2,
        spring_constant: f64,
        #[serde(with = "vec2_serde")]
        anchor: NVec2,
        #[serde(rename = "B_z")]
        b_z: f64,
        #[serde(default = "unit_charge")]
        charge: f64,
        #[serde(rename = "E", with = "vec2_serde", default = "zero_field")]
        e_field: NVec2,
    },
}

fn unit_charge() -> f64 {
    1.0
}

fn zero_field() -> NVec2 {
    NVec2::zeros()
}

/// Quadrant of the box relative to a center point
/// Points on the horizontal midline count as upper, on the vertical one as right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    pub fn of(position: &NVec2, center: &NVec2) -> Self {
        let upper = position.y >= center.y;
        let left = position.x < center.x;
        match (upper, left) {
            (true, true) => Quadrant::UpperLeft,
            (true, false) => Quadrant::UpperRight,
            (false, true) => Quadrant::LowerLeft,
            (false, false) => Quadrant::LowerRight,
        }
    }
}

impl ForceModel {
    pub fn force_type(&self) -> ForceType {
        match self {
            ForceModel::NoForce => ForceType::NoForce,
            ForceModel::Gravity { .. } => ForceType::Gravity,
            ForceModel::MagneticField { .. } => ForceType::MagneticField,
            ForceModel::HarmonicOscillator { .. } => ForceType::HarmonicOscillator,
            ForceModel::Regions { .. } => ForceType::Regions,
        }
    }

    /// Quadrant map of a `box_size` box: center of the box, spring anchored
    /// at the upper right corner, g = (10, -5), k = 1, B_z = 1, E = (5, -10)
    pub fn quadrant_map(box_size: f64) -> Self {
        ForceModel::Regions {
            center: NVec2::repeat(box_size / 2.0),
            g_constant: NVec2::new(10.0, -5.0),
            spring_constant: 1.0,
            anchor: NVec2::repeat(box_size),
            b_z: 1.0,
            charge: 1.0,
            e_field: NVec2::new(5.0, -10.0),
        }
    }

    /// Law in effect at `position`; identity for every variant but `Regions`
    pub fn local_model(&self, position: &NVec2) -> ForceModel {
        let ForceModel::Regions {
            center,
            g_constant,
            spring_constant,
            anchor,
            b_z,
            charge,
            e_field,
        } = *self
        else {
            return *self;
        };

        match Quadrant::of(position, &center) {
            Quadrant::UpperLeft => ForceModel::Gravity { g_constant },
            Quadrant::UpperRight => ForceModel::HarmonicOscillator {
                spring_constant,
                equilibrium_point: anchor,
            },
            Quadrant::LowerLeft => ForceModel::MagneticField { b_z, charge, e_field },
            Quadrant::LowerRight => ForceModel::NoForce,
        }
    }

    /// Instantaneous force on a body of mass `mass` at `position` moving with
    /// `velocity` (the integrator's velocity estimate, only the magnetic
    /// field reads it)
    pub fn force(&self, position: &NVec2, velocity: &NVec2, mass: f64) -> NVec2 {
        match *self {
            // F = 0
            ForceModel::NoForce => NVec2::zeros(),
            // F = m g, same everywhere in the box
            ForceModel::Gravity { g_constant } => gravity(mass, &g_constant),
            // F = q E + q (v x B_z e_z)
            ForceModel::MagneticField { b_z, charge, e_field } => {
                electric_field(charge, &e_field) + magnetic_field(charge, velocity, b_z)
            }
            // F = -k (r - r0)
            ForceModel::HarmonicOscillator {
                spring_constant,
                equilibrium_point,
            } => harmonic_oscillator(position, spring_constant, &equilibrium_point),
            // pick the quadrant's law, then evaluate it
            ForceModel::Regions { .. } => self.local_model(position).force(position, velocity, mass),
        }
    }

    /// Same as [`ForceModel::force`] for callers holding plain arrays
    /// Both inputs must be exactly two components long
    pub fn force_from_slices(&self, position: &[f64], velocity: &[f64], mass: f64) -> Result<[f64; 2]> {
        let position = vec2_from_slice("position", position)?;
        let velocity = vec2_from_slice("velocity", velocity)?;
        let f = self.force(&position, &velocity, mass);
        Ok([f.x, f.y])
    }

    /// Potential energy consistent with the force law
    /// The magnetic force does no work, only the electric field contributes.
    /// `Regions` uses the potential of the law active at `position`
    pub fn potential_energy(&self, position: &NVec2, mass: f64) -> f64 {
        match *self {
            ForceModel::NoForce => 0.0,
            ForceModel::MagneticField { charge, e_field, .. } => -charge * e_field.dot(position),
            ForceModel::Regions { .. } => self.local_model(position).potential_energy(position, mass),
            ForceModel::Gravity { g_constant } => -mass * g_constant.dot(position),
            ForceModel::HarmonicOscillator {
                spring_constant,
                equilibrium_point,
            } => 0.5 * spring_constant * (position - equilibrium_point).norm_squared(),
        }
    }
}

// ==================================================================================
// Force laws
// ==================================================================================

/// Constant pull `m g`
pub fn gravity(mass: f64, g_constant: &NVec2) -> NVec2 {
    mass * g_constant
}

/// Planar Lorentz force for a field along z
pub fn magnetic_field(charge: f64, velocity: &NVec2, b_z: f64) -> NVec2 {
    charge * NVec2::new(velocity.y * b_z, -velocity.x * b_z)
}

/// Uniform in-plane electric field `q E`
pub fn electric_field(charge: f64, e_field: &NVec2) -> NVec2 {
    charge * e_field
}

/// Isotropic spring `-k (p - p_eq)`
pub fn harmonic_oscillator(position: &NVec2, spring_constant: f64, equilibrium_point: &NVec2) -> NVec2 {
    -spring_constant * (position - equilibrium_point)
}
