//! Flight loop: integrate until the body lands or the clock runs out.
//!
//! ```text
//!            step ok, t < max_time
//!              ┌──────────┐
//!              ▼          │
//!  start ──► Flying ──────┘
//!              │  │
//!     z < 0    │  │  t >= max_time
//!              ▼  ▼
//!       Grounded  TimedOut
//! ```
//!
//! Ground impact is handled by clamping: the first step that ends below z = 0
//! is pulled back onto the ground with zero velocity and recorded as the last
//! sample. There is no sub-step search for the exact crossing time, so the
//! landing time and point are only accurate to about one step.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::forces::AerodynamicForces;
use crate::integrator::{ForceModel, Rk4};
use crate::trajectory::{Termination, Trajectory};
use crate::types::{ParticleState, Vec3};

/// Phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Flying,
    Grounded,
    TimedOut,
}

/// Time stepping settings of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Fixed RK4 step in seconds
    pub time_step: f64,
    /// The run stops once the clock reaches this time (seconds)
    pub max_time: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_step: 0.001,
            max_time: 10.0,
        }
    }
}

impl RunConfig {
    pub fn new(time_step: f64, max_time: f64) -> Result<Self, ConfigError> {
        let config = Self {
            time_step,
            max_time,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::NonPositiveTimeStep(self.time_step));
        }
        if !(self.max_time.is_finite() && self.max_time > 0.0) {
            return Err(ConfigError::NonPositiveMaxTime(self.max_time));
        }
        Ok(())
    }
}

/// Simulate a flight under gravity, drag and Magnus lift in a steady wind.
///
/// The first sample is `initial`; the last is either the clamped landing point
/// or the first state at or past `max_time`.
pub fn simulate(
    initial: &ParticleState,
    wind: Vec3,
    time_step: f64,
    max_time: f64,
) -> Result<Trajectory, ConfigError> {
    let config = RunConfig::new(time_step, max_time)?;
    simulate_with(initial, &AerodynamicForces::new(wind), &config)
}

/// Same loop as [`simulate`] over any force model.
///
/// `initial` is re-validated, so a hand-built state with a bad mass or clock
/// is rejected instead of integrated.
pub fn simulate_with<F: ForceModel>(
    initial: &ParticleState,
    forces: &F,
    config: &RunConfig,
) -> Result<Trajectory, ConfigError> {
    config.validate()?;
    initial.validate()?;

    debug!(
        "simulating from pos={:?} vel={:?} spin={:?} (h={}, max_time={})",
        initial.pos, initial.vel, initial.spin, config.time_step, config.max_time
    );

    let mut trajectory = Trajectory::starting_at(initial);
    let mut state = *initial;
    let mut phase = initial_phase(initial, config);
    let mut steps = 0usize;

    while phase == FlightPhase::Flying {
        let (next, next_phase) = advance(&state, forces, config);
        state = next;
        phase = next_phase;
        steps += 1;

        trace!("t={:.6} pos={:?} vel={:?}", state.time, state.pos, state.vel);
        trajectory.record(&state);
    }

    let termination = match phase {
        FlightPhase::Grounded => Termination::Grounded,
        _ => Termination::TimedOut,
    };
    trajectory.finish(termination);

    debug!(
        "{:?} after {} steps at t={:.4}, range {:.4} m",
        termination,
        steps,
        state.time,
        trajectory.range()
    );

    Ok(trajectory)
}

fn initial_phase(initial: &ParticleState, config: &RunConfig) -> FlightPhase {
    if initial.is_grounded() {
        FlightPhase::Grounded
    } else if initial.time >= config.max_time {
        FlightPhase::TimedOut
    } else {
        FlightPhase::Flying
    }
}

/// Take one RK4 step and apply the ground and clock checks.
pub fn advance<F: ForceModel>(
    state: &ParticleState,
    forces: &F,
    config: &RunConfig,
) -> (ParticleState, FlightPhase) {
    let mut next = Rk4::step(state, forces, config.time_step);

    if next.pos.z < 0.0 {
        next.pos.z = 0.0;
        next.vel = Vec3::ZERO;
        return (next, FlightPhase::Grounded);
    }

    if next.time >= config.max_time {
        (next, FlightPhase::TimedOut)
    } else {
        (next, FlightPhase::Flying)
    }
}

// =============================================================================
// Tests
// =============================================================================
