//! Per-run simulation parameters
//!
//! `SimulationParameters` is created once when a trajectory is generated,
//! read-only afterwards, and travels with the trajectory so energies can be
//! reconstructed later without re-deriving any randomness.
//! Parameter records are stored as JSON with typed fields. Vector fields are
//! written as `[x, y]` number arrays but the loader also accepts the older
//! bracketed text encoding `"[x y]"`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::simulation::forces::ForceModel;
use crate::simulation::integrator::BoundaryPolicy;
use crate::simulation::states::{vec2_from_slice, NVec2};

/// Force law selector, parsed once from its string tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceType {
    NoForce,
    Gravity,
    MagneticField,
    #[serde(alias = "2D_harmonic_oscillator")]
    HarmonicOscillator,
    Regions,
}

impl ForceType {
    pub const ALL: [ForceType; 5] = [
        ForceType::NoForce,
        ForceType::Gravity,
        ForceType::MagneticField,
        ForceType::HarmonicOscillator,
        ForceType::Regions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForceType::NoForce => "no_force",
            ForceType::Gravity => "gravity",
            ForceType::MagneticField => "magnetic_field",
            ForceType::HarmonicOscillator => "harmonic_oscillator",
            ForceType::Regions => "regions",
        }
    }
}

impl fmt::Display for ForceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForceType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "no_force" => Ok(ForceType::NoForce),
            "gravity" => Ok(ForceType::Gravity),
            "magnetic_field" => Ok(ForceType::MagneticField),
            "harmonic_oscillator" | "2D_harmonic_oscillator" => Ok(ForceType::HarmonicOscillator),
            "regions" => Ok(ForceType::Regions),
            other => Err(SimError::invalid(
                "force_type",
                format!("one of no_force, gravity, magnetic_field, harmonic_oscillator, regions (got `{other}`)"),
            )),
        }
    }
}

/// Immutable record of everything that determined one trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    #[serde(flatten)]
    pub force: ForceModel,
    pub time_step: f64, // dt
    pub box_size: f64, // domain is [0, box_size]^2
    #[serde(default = "default_mass")]
    pub body_mass: f64,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

fn default_mass() -> f64 {
    1.0
}

impl SimulationParameters {
    /// Build and validate a parameter set
    pub fn new(force: ForceModel, time_step: f64, box_size: f64, body_mass: f64, boundary: BoundaryPolicy) -> Result<Self> {
        let params = Self {
            force,
            time_step,
            box_size,
            body_mass,
            boundary,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn force_type(&self) -> ForceType {
        self.force.force_type()
    }

    /// Check ranges of the scalar fields and the force constants
    pub fn validate(&self) -> Result<()> {
        require_positive("time_step", self.time_step)?;
        require_positive("box_size", self.box_size)?;
        require_positive("body_mass", self.body_mass)?;

        match self.force {
            ForceModel::NoForce => {}
            ForceModel::Gravity { g_constant } => require_finite_vec("g_constant", &g_constant)?,
            ForceModel::MagneticField { b_z, charge, e_field } => {
                require_finite("B_z", b_z)?;
                require_finite("charge", charge)?;
                require_finite_vec("E", &e_field)?;
            }
            ForceModel::HarmonicOscillator {
                spring_constant,
                equilibrium_point,
            } => {
                require_finite("spring_constant", spring_constant)?;
                require_finite_vec("equilibrium_point", &equilibrium_point)?;
            }
            ForceModel::Regions {
                center,
                g_constant,
                spring_constant,
                anchor,
                b_z,
                charge,
                e_field,
            } => {
                require_finite_vec("center", &center)?;
                require_finite_vec("g_constant", &g_constant)?;
                require_finite("spring_constant", spring_constant)?;
                require_finite_vec("anchor", &anchor)?;
                require_finite("B_z", b_z)?;
                require_finite("charge", charge)?;
                require_finite_vec("E", &e_field)?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("a finite value > 0 (got {value})")))
    }
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("a finite value (got {value})")))
    }
}

fn require_finite_vec(field: &str, v: &NVec2) -> Result<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(SimError::invalid(field, "finite components"))
    }
}

/// Parse the bracketed, whitespace separated encoding of a 2-vector,
/// e.g. `"[0.3 -0.4]"`
pub fn parse_bracketed_vec2(field: &str, text: &str) -> Result<NVec2> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| SimError::invalid(field, format!("a bracketed vector like `[x y]` (got `{text}`)")))?;

    let values = inner
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| SimError::invalid(field, format!("numeric components (got `{s}`)")))
        })
        .collect::<Result<Vec<f64>>>()?;

    vec2_from_slice(field, &values)
}

/// serde adapter for 2-vector fields
/// Writes `[x, y]`; reads either a number array or the bracketed text form
pub mod vec2_serde {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::parse_bracketed_vec2;
    use crate::simulation::states::{vec2_from_slice, NVec2};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Array(Vec<f64>),
        Text(String),
    }

    pub fn serialize<S: Serializer>(v: &NVec2, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq([v.x, v.y])
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NVec2, D::Error> {
        let parsed = match Repr::deserialize(deserializer)? {
            Repr::Array(values) => vec2_from_slice("vector", &values),
            Repr::Text(text) => parse_bracketed_vec2("vector", &text),
        };
        parsed.map_err(D::Error::custom)
    }
}
