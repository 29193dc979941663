//! Physical forces acting on the sphere.
//!
//! This module implements the `ForceModel` trait for a spinning sphere in wind:
//!
//! - **Gravity**: Constant downward force `m * g`
//! - **Drag**: Air resistance opposing motion relative to the air, proportional to v²
//! - **Magnus**: Lift from spin, perpendicular to spin axis and relative velocity
//!
//! Drag and Magnus are computed from the velocity relative to the air
//! (`vel - wind`), not the ground-frame velocity. A body drifting with the
//! wind feels neither.
//!
//! ## The Magnus Effect
//!
//! ```text
//! F_magnus = S * (ω × v_rel)
//!
//! Backspin on a ball moving along +X (ω along -Y):
//!     -Y × +X = +Z   ↑ ball floats
//!
//! Topspin (ω along +Y):
//!     +Y × +X = -Z   ↓ ball dives
//! ```

use crate::integrator::ForceModel;
use crate::types::{constants, ParticleState, Vec3};

/// The individual forces (in Newtons) acting on a body at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceBreakdown {
    pub gravity: Vec3,
    pub drag: Vec3,
    pub magnus: Vec3,
}

impl ForceBreakdown {
    pub fn total(&self) -> Vec3 {
        self.gravity + self.drag + self.magnus
    }
}

/// Complete force model for a spinning sphere in a steady wind.
///
/// Combines gravity, aerodynamic drag, and Magnus effect. Evaluation is pure:
/// the same state always produces the same acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AerodynamicForces {
    /// Wind velocity in m/s, constant for a run
    pub wind: Vec3,

    /// Gravitational acceleration magnitude (default: 9.81)
    pub gravity: f64,

    /// Enable/disable individual forces (useful for testing)
    pub enable_gravity: bool,
    pub enable_drag: bool,
    pub enable_magnus: bool,
}

impl Default for AerodynamicForces {
    fn default() -> Self {
        Self {
            wind: Vec3::ZERO,
            gravity: constants::GRAVITY,
            enable_gravity: true,
            enable_drag: true,
            enable_magnus: true,
        }
    }
}

impl AerodynamicForces {
    /// Full force model in the given wind.
    pub fn new(wind: Vec3) -> Self {
        Self {
            wind,
            ..Self::default()
        }
    }

    /// Create a force model with only gravity (for testing).
    pub fn gravity_only() -> Self {
        Self {
            enable_drag: false,
            enable_magnus: false,
            ..Self::default()
        }
    }

    /// Weight of the body: `(0, 0, -m * g)`.
    fn gravity_force(&self, state: &ParticleState) -> Vec3 {
        Vec3::new(0.0, 0.0, -state.params.mass * self.gravity)
    }

    /// Calculate drag force on the body.
    ///
    /// Drag equation: F_drag = -0.5 * ρ * Cd * A * |v_rel|² * v̂_rel
    ///
    /// Exactly zero relative speed gives zero drag rather than a NaN direction.
    fn drag_force(&self, rel_vel: Vec3, state: &ParticleState) -> Vec3 {
        let speed = rel_vel.magnitude();
        if speed <= 0.0 {
            return Vec3::ZERO;
        }

        let p = &state.params;
        let magnitude =
            0.5 * p.air_density * speed * speed * p.drag_coefficient * p.cross_section();

        rel_vel.normalized() * (-magnitude)
    }

    /// Calculate Magnus force on the body.
    ///
    /// `lift_factor` already carries the mass, so the result is a force.
    fn magnus_force(&self, rel_vel: Vec3, state: &ParticleState) -> Vec3 {
        state.spin.cross(&rel_vel) * state.params.lift_factor
    }

    /// Every enabled force acting on `state`, in Newtons.
    pub fn breakdown(&self, state: &ParticleState) -> ForceBreakdown {
        let rel_vel = state.vel - self.wind;

        ForceBreakdown {
            gravity: if self.enable_gravity {
                self.gravity_force(state)
            } else {
                Vec3::ZERO
            },
            drag: if self.enable_drag {
                self.drag_force(rel_vel, state)
            } else {
                Vec3::ZERO
            },
            magnus: if self.enable_magnus {
                self.magnus_force(rel_vel, state)
            } else {
                Vec3::ZERO
            },
        }
    }
}

impl ForceModel for AerodynamicForces {
    fn linear_acceleration(&self, state: &ParticleState) -> Vec3 {
        self.breakdown(state).total() / state.params.mass
    }
}

// =============================================================================
// Tests
// =============================================================================
