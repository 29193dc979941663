//! Numerical integration for advancing the flight in time.
//!
//! The integrator is the classic fourth-order Runge–Kutta method with a fixed
//! step. Forces here depend only on velocity, so each stage evaluates the
//! acceleration at a perturbed velocity and the matching position slope is
//! that velocity itself.
//!
//! ## Algorithm
//!
//! ```text
//! k1_a = a(v0)            k1_v = k1_a*h   k1_x = v0*h
//! k2_a = a(v0 + k1_v/2)   k2_v = k2_a*h   k2_x = (v0 + k1_v/2)*h
//! k3_a = a(v0 + k2_v/2)   k3_v = k3_a*h   k3_x = (v0 + k2_v/2)*h
//! k4_a = a(v0 + k3_v)     k4_v = k4_a*h   k4_x = (v0 + k3_v)*h
//!
//! v1 = v0 + (k1_v + 2*k2_v + 2*k3_v + k4_v) / 6
//! x1 = x0 + (k1_x + 2*k2_x + 2*k3_x + k4_x) / 6
//! ```
//!
//! Local truncation error is O(h⁵), global error O(h⁴), at four force
//! evaluations per step. The step size never adapts, so it must stay small
//! against the curvature drag and spin put into the path; very high spin rates
//! make the force rotate quickly and need a correspondingly small `h`.

use crate::types::{ParticleState, Vec3};

/// Trait for computing accelerations on the body.
///
/// Implementations provide the physics model (gravity, drag, Magnus, etc.)
/// and must be pure: the integrator calls them several times per step.
pub trait ForceModel {
    /// Compute linear acceleration given the current state.
    fn linear_acceleration(&self, state: &ParticleState) -> Vec3;
}

/// One Runge–Kutta stage: the acceleration evaluated at the stage velocity
/// and the velocity/position increments it contributes over a full step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub acceleration: Vec3,
    pub dv: Vec3,
    pub dx: Vec3,
}

/// Fixed-step fourth-order Runge–Kutta integrator.
pub struct Rk4;

impl Rk4 {
    /// Evaluate the four stages of a step from `state` without combining them.
    pub fn stages<F: ForceModel>(state: &ParticleState, forces: &F, dt: f64) -> [Stage; 4] {
        let v0 = state.vel;
        let stage = |vel: Vec3| {
            let acceleration = forces.linear_acceleration(&state.with_velocity(vel));
            Stage {
                acceleration,
                dv: acceleration * dt,
                dx: vel * dt,
            }
        };

        let k1 = stage(v0);
        let k2 = stage(v0 + k1.dv * 0.5);
        let k3 = stage(v0 + k2.dv * 0.5);
        let k4 = stage(v0 + k3.dv);

        [k1, k2, k3, k4]
    }

    /// Advance the state by one time step.
    ///
    /// Pure: `state` is untouched and the successor is returned. No ground
    /// handling happens here; the simulation loop owns that policy.
    pub fn step<F: ForceModel>(state: &ParticleState, forces: &F, dt: f64) -> ParticleState {
        let [k1, k2, k3, k4] = Self::stages(state, forces, dt);

        let new_vel = state.vel + (k1.dv + k2.dv * 2.0 + k3.dv * 2.0 + k4.dv) / 6.0;
        let delta_pos = (k1.dx + k2.dx * 2.0 + k3.dx * 2.0 + k4.dx) / 6.0;

        ParticleState {
            pos: state.pos + delta_pos,
            time: state.time + dt,
            vel: new_vel,
            ..*state
        }
    }

    /// Advance the state by multiple steps of `dt`.
    ///
    /// Total time advanced is `steps * dt`. The ground is ignored.
    pub fn step_n<F: ForceModel>(
        state: &ParticleState,
        forces: &F,
        dt: f64,
        steps: usize,
    ) -> ParticleState {
        let mut current = *state;
        for _ in 0..steps {
            current = Self::step(&current, forces, dt);
        }
        current
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::AerodynamicForces;
    use crate::types::BodyProperties;

    /// Simple gravity-only force model for testing
    struct GravityOnly;

    impl ForceModel for GravityOnly {
        fn linear_acceleration(&self, _state: &ParticleState) -> Vec3 {
            Vec3::new(0.0, 0.0, -9.81)
        }
    }

    /// Linear drag a = -k v, which has a closed-form solution.
    struct LinearDrag(f64);

    impl ForceModel for LinearDrag {
        fn linear_acceleration(&self, state: &ParticleState) -> Vec3 {
            state.vel * (-self.0)
        }
    }

    fn launch(pos: Vec3, vel: Vec3, spin: Vec3, body: &BodyProperties) -> ParticleState {
        ParticleState::new(pos, vel, spin, body).unwrap()
    }

    #[test]
    fn test_stage_velocities() {
        let initial = launch(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(2.0, 0.0, 4.0),
            Vec3::ZERO,
            &BodyProperties::ideal(),
        );
        let dt = 0.1;
        let [k1, k2, k3, k4] = Rk4::stages(&initial, &GravityOnly, dt);

        // Constant acceleration: every stage sees the same a, the velocity
        // samples are v0, v0 + a h/2, v0 + a h/2, v0 + a h.
        for k in [k1, k2, k3, k4] {
            assert!((k.acceleration.z + 9.81).abs() < 1e-12);
            assert!((k.dv.z + 0.981).abs() < 1e-12);
        }
        assert!((k1.dx.z - 0.4).abs() < 1e-12);
        assert!((k2.dx.z - (4.0 - 0.4905) * dt).abs() < 1e-12);
        assert!((k3.dx.z - k2.dx.z).abs() < 1e-12);
        assert!((k4.dx.z - (4.0 - 0.981) * dt).abs() < 1e-12);
    }

    #[test]
    fn test_step_is_pure() {
        let initial = launch(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(15.0, 0.0, 5.0),
            Vec3::new(0.0, -200.0, 0.0),
            &BodyProperties::ping_pong(),
        );
        let before = initial;
        let forces = AerodynamicForces::default();

        let a = Rk4::step(&initial, &forces, 0.001);
        let b = Rk4::step(&initial, &forces, 0.001);

        assert_eq!(initial, before);
        assert_eq!(a, b);
        assert!((a.time - 0.001).abs() < 1e-15);
        assert_eq!(a.spin, initial.spin);
        assert_eq!(a.params, initial.params);
    }

    #[test]
    fn test_constant_acceleration_is_exact() {
        // RK4 integrates a polynomial path of degree two without error.
        let initial = launch(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(3.0, 0.0, 5.0),
            Vec3::ZERO,
            &BodyProperties::ideal(),
        );

        let result = Rk4::step(&initial, &GravityOnly, 0.5);
        let expected_z = 1.0 + 5.0 * 0.5 - 0.5 * 9.81 * 0.25;

        assert!(
            (result.pos.z - expected_z).abs() < 1e-12,
            "Expected z={}, got z={}",
            expected_z,
            result.pos.z
        );
        assert!((result.pos.x - 1.5).abs() < 1e-12);
        assert!((result.vel.z - (5.0 - 9.81 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_fourth_order_convergence() {
        // v(t) = v0 e^{-kt}, x(t) = v0 (1 - e^{-kt}) / k
        let k: f64 = 2.0;
        let t = 1.0;
        let initial = launch(
            Vec3::ZERO,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            &BodyProperties::ideal(),
        );
        let exact = 10.0 * (1.0 - (-k * t).exp()) / k;

        let error_at = |steps: usize| {
            let dt = t / steps as f64;
            let result = Rk4::step_n(&initial, &LinearDrag(k), dt, steps);
            (result.pos.x - exact).abs()
        };

        let coarse = error_at(10);
        let fine = error_at(20);
        let ratio = coarse / fine;

        // Halving h should cut the error by about 2⁴ = 16.
        assert!(
            ratio > 12.0 && ratio < 20.0,
            "Expected ~16x error reduction, got {} ({} -> {})",
            ratio,
            coarse,
            fine
        );
    }

    #[test]
    fn test_horizontal_velocity_unchanged_without_air() {
        let initial = launch(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(15.0, 5.0, 15.0),
            Vec3::ZERO,
            &BodyProperties::ideal(),
        );
        let forces = AerodynamicForces::default();

        let mut state = initial;
        for _ in 0..1000 {
            state = Rk4::step(&state, &forces, 0.001);
            assert_eq!(state.vel.x, 15.0);
            assert_eq!(state.vel.y, 5.0);
        }
    }

    #[test]
    fn test_step_n_matches_repeated_steps() {
        let initial = launch(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(8.0, 1.0, 3.0),
            Vec3::new(0.0, 0.0, 50.0),
            &BodyProperties::ping_pong(),
        );
        let forces = AerodynamicForces::new(Vec3::new(-1.0, 0.0, 0.0));

        let mut manual = initial;
        for _ in 0..25 {
            manual = Rk4::step(&manual, &forces, 0.002);
        }
        let batched = Rk4::step_n(&initial, &forces, 0.002, 25);

        assert_eq!(manual, batched);
        assert_eq!(Rk4::step_n(&initial, &forces, 0.002, 0), initial);
    }
}
