//! Fixed-step two-step position integrator
//!
//! Störmer–Verlet in position-only form:
//!
//! ```text
//! pos[t+1] = 2 pos[t] - pos[t-1] + F(pos[t], v[t]) dt^2 / m
//! ```
//!
//! Velocity is never stored. Where a force needs it (magnetic field) it is
//! estimated from the history, see [`velocity_estimate`]

use serde::{Deserialize, Serialize};

use super::params::SimulationParameters;
use super::states::{inside_box, NVec2, State};

/// What happens when a new position leaves `[0, box_size]^2`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Keep the escaping sample and stop the run
    #[default]
    Terminate,
    /// Reverse the velocity component normal to the crossed wall and stay in the box
    Reflect,
}

/// Result of a single integrator step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// New position accepted, the run may continue
    Advanced,
    /// New position left the box under [`BoundaryPolicy::Terminate`];
    /// it was appended and the run must stop
    Escaped,
}

/// Velocity at the current step from the position history
/// - central difference `(pos[t] - pos[t-2]) / (2 dt)` once three positions exist
/// - one-sided `(pos[1] - pos[0]) / dt` at `t = 1`
pub fn velocity_estimate(state: &State, dt: f64) -> NVec2 {
    match state.back(2) {
        Some(pos_tm2) => (state.current() - pos_tm2) / (2.0 * dt),
        None => (state.current() - state.previous()) / dt,
    }
}

/// Advance `state` by one step using the force law in `params`
pub fn verlet_step(state: &mut State, params: &SimulationParameters) -> StepOutcome {
    let dt = params.time_step; // time step dt
    let m = params.body_mass; // body mass
    let pos = state.current(); // pos[t]
    let prev = state.previous(); // pos[t-1]

    // Velocity estimate v[t], only read by velocity dependent forces
    let velocity = velocity_estimate(state, dt);

    // Force at the current position: F[t] = F(pos[t], v[t])
    let force = params.force.force(&pos, &velocity, m);

    // Position update: pos[t+1] = 2 pos[t] - pos[t-1] + F[t] dt^2 / m
    let mut next = 2.0 * pos - prev + force * (dt * dt / m);

    // Still inside: accept and advance time
    if inside_box(&next, params.box_size) {
        state.push(next);
        return StepOutcome::Advanced;
    }

    match params.boundary {
        BoundaryPolicy::Terminate => {
            // keep the escaping sample so the exit is visible, then stop
            state.push(next);
            StepOutcome::Escaped
        }
        BoundaryPolicy::Reflect => {
            let b = params.box_size;
            for j in 0..2 {
                if (0.0..=b).contains(&next[j]) {
                    continue;
                }
                // Per-step displacement along the crossed axis: d_j = pos[t]_j - pos[t-1]_j
                let d_j = pos[j] - prev[j];
                // Bounce: d_j -> -d_j, so pos[t+1]_j = pos[t]_j - d_j
                // and the pair (pos[t], pos[t+1]) carries the reversed velocity
                next[j] = (pos[j] - d_j).clamp(0.0, b);
            }
            state.push(next);
            StepOutcome::Advanced
        }
    }
}

/// Run [`verlet_step`] until the history holds `max_positions` entries or the
/// body escapes. Returns the outcome of the last step taken
pub fn verlet_integrator(state: &mut State, params: &SimulationParameters, max_positions: usize) -> StepOutcome {
    let mut outcome = StepOutcome::Advanced;
    while state.len() < max_positions {
        outcome = verlet_step(state, params);
        if outcome == StepOutcome::Escaped {
            break;
        }
    }
    outcome
}
