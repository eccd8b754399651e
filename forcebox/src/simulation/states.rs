//! Core state types for the point-mass simulation
//!
//! - `NVec2` is the 2D vector type used everywhere in the crate
//! - `State` is the integrator's working memory: the position history
//!   indexed by step `t = 0, 1, 2, ...`

use nalgebra::Vector2;

use crate::error::{Result, SimError};

pub type NVec2 = Vector2<f64>;

/// Upper bound on the history reserved before a run, longer runs grow on demand
pub const MAX_RESERVED_POSITIONS: usize = 4096;

/// Position history of the body
/// Grows by exactly one entry per accepted step and always holds at least the
/// two seed positions needed by the two-step integrator
#[derive(Debug, Clone)]
pub struct State {
    positions: Vec<NVec2>,
}

impl State {
    /// Start a history from the two seed positions `pos[0]`, `pos[1]`
    /// `capacity` is a hint, at most [`MAX_RESERVED_POSITIONS`] are reserved up front
    pub fn from_seeds(pos0: NVec2, pos1: NVec2, capacity: usize) -> Self {
        let mut positions = Vec::with_capacity(capacity.clamp(2, MAX_RESERVED_POSITIONS));
        positions.push(pos0);
        positions.push(pos1);
        Self { positions }
    }

    /// Index of the most recent position
    pub fn t(&self) -> usize {
        self.positions.len() - 1
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    // never empty, the seeds are always there
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn current(&self) -> NVec2 {
        self.positions[self.t()]
    }

    pub fn previous(&self) -> NVec2 {
        self.positions[self.t() - 1]
    }

    /// Position `k` steps before the current one, if the history reaches that far
    pub fn back(&self, k: usize) -> Option<NVec2> {
        self.t().checked_sub(k).map(|i| self.positions[i])
    }

    pub fn push(&mut self, pos: NVec2) {
        self.positions.push(pos);
    }

    pub fn positions(&self) -> &[NVec2] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<NVec2> {
        self.positions
    }
}

/// Convert a dynamically sized slice (config, records, plain arrays) into a
/// 2D vector, rejecting anything that is not exactly two components long
pub fn vec2_from_slice(field: &str, values: &[f64]) -> Result<NVec2> {
    match values {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(SimError::Shape {
            field: field.to_string(),
            expected: 2,
            got: values.len(),
        }),
    }
}

/// Whether `p` lies inside the square `[0, box_size]^2` (edges included)
pub fn inside_box(p: &NVec2, box_size: f64) -> bool {
    p.iter().all(|c| (0.0..=box_size).contains(c))
}
