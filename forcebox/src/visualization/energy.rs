//! Energy reconstruction from stored coordinates
//!
//! Velocity comes from the first difference `(r[i+1] - r[i]) / dt`, so a
//! trajectory of `n` samples gives `n - 1` energy values. Potential energy
//! depends on the force law recorded in the parameters

use crate::error::{Result, SimError};
use crate::simulation::params::SimulationParameters;
use crate::simulation::states::NVec2;

/// Kinetic, potential and total energy per step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyProfile {
    pub kinetic: Vec<f64>,
    pub potential: Vec<f64>,
    pub total: Vec<f64>,
}

impl EnergyProfile {
    pub fn len(&self) -> usize {
        self.total.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }

    /// Largest |E_i - E_0| / |E_0| over the run (absolute drift when E_0 ~ 0)
    pub fn max_relative_drift(&self) -> f64 {
        let Some(&e0) = self.total.first() else {
            return 0.0;
        };
        let scale = if e0.abs() > 1e-12 { e0.abs() } else { 1.0 };
        self.total
            .iter()
            .map(|e| (e - e0).abs() / scale)
            .fold(0.0, f64::max)
    }
}

pub fn reconstruct_energy(x: &[f64], y: &[f64], params: &SimulationParameters) -> Result<EnergyProfile> {
    if x.len() != y.len() {
        return Err(SimError::invalid(
            "y",
            format!("as many samples as x ({} != {})", y.len(), x.len()),
        ));
    }
    params.validate()?;

    let dt = params.time_step;
    let m = params.body_mass;
    let steps = x.len().saturating_sub(1);

    let mut profile = EnergyProfile {
        kinetic: Vec::with_capacity(steps),
        potential: Vec::with_capacity(steps),
        total: Vec::with_capacity(steps),
    };

    for i in 0..steps {
        let r = NVec2::new(x[i], y[i]);
        let v = (NVec2::new(x[i + 1], y[i + 1]) - r) / dt;

        let kinetic = 0.5 * m * v.norm_squared();
        let potential = params.force.potential_energy(&r, m);

        profile.kinetic.push(kinetic);
        profile.potential.push(potential);
        profile.total.push(kinetic + potential);
    }

    Ok(profile)
}
