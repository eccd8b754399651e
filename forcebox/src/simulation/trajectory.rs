//! Finished simulation output

use serde::{Deserialize, Serialize};

use super::params::SimulationParameters;
use super::states::NVec2;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Step budget used up
    Completed,
    /// Last sample left the box (terminating boundary policy)
    Escaped,
}

/// Coordinates of one run plus the parameters that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub parameters: SimulationParameters,
    pub termination: Termination,
}

impl Trajectory {
    pub fn from_positions(positions: &[NVec2], parameters: SimulationParameters, termination: Termination) -> Self {
        let (x, y) = positions.iter().map(|p| (p.x, p.y)).unzip();
        Self {
            x,
            y,
            parameters,
            termination,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn position(&self, i: usize) -> Option<NVec2> {
        Some(NVec2::new(*self.x.get(i)?, *self.y.get(i)?))
    }

    pub fn positions(&self) -> impl Iterator<Item = NVec2> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| NVec2::new(x, y))
    }
}
