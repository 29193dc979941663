//! Core types for the flight simulation.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Angular velocity (spin): radians per second (rad/s)
//! - Mass: kilograms (kg)
//! - Force: Newtons (N)
//!
//! Coordinate system: Z is vertical (positive upward), X and Y are horizontal.
//! The ground is the plane z = 0.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::ConfigError;

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities, forces, wind and spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if the magnitude is exactly zero.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            *self / mag
        } else {
            Self::ZERO
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product (right-handed)
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Length of the projection onto the ground plane.
    pub fn horizontal_magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

/// Scalar division. The divisor must be non-zero; this is not checked.
impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Body Properties
// =============================================================================

/// Named physical parameter set of a sphere.
///
/// This is the record presets and scenario files provide. `spin_factor` is the
/// Magnus coupling per unit mass (S/M, in m²/s); it is multiplied by the mass
/// when the body is turned into [`PhysicalParams`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyProperties {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub drag_coefficient: f64,
    pub air_density: f64,
    pub spin_factor: f64,
}

impl BodyProperties {
    /// Regulation baseball in sea-level air.
    pub fn baseball() -> Self {
        Self {
            name: "Baseball".to_string(),
            mass: 0.149,
            radius: 0.0366,
            drag_coefficient: 0.35,
            air_density: constants::AIR_DENSITY,
            spin_factor: 4.1e-4,
        }
    }

    /// 40mm ping pong ball: light, large, dominated by drag and spin.
    pub fn ping_pong() -> Self {
        Self {
            name: "Ping Pong Ball".to_string(),
            mass: 0.0027,
            radius: 0.02,
            drag_coefficient: 0.5,
            air_density: 1.27,
            spin_factor: 0.04,
        }
    }

    /// Point-like 1 kg body in vacuum: gravity only.
    pub fn ideal() -> Self {
        Self {
            name: "Ideal Projectile".to_string(),
            mass: 1.0,
            radius: 0.1,
            drag_coefficient: 0.0,
            air_density: 0.0,
            spin_factor: 0.0,
        }
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self::ideal()
    }
}

// =============================================================================
// Physical Parameters
// =============================================================================

/// Validated, immutable parameters the force model reads.
///
/// `lift_factor` is the Magnus coupling already multiplied by mass, so the
/// Magnus force is `lift_factor * (spin × v_rel)` with no further division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    pub mass: f64,
    pub radius: f64,
    pub drag_coefficient: f64,
    pub air_density: f64,
    pub lift_factor: f64,
}

impl PhysicalParams {
    /// Validate a body record and derive the force-model parameters.
    pub fn from_body(body: &BodyProperties) -> Result<Self, ConfigError> {
        if !body.spin_factor.is_finite() {
            return Err(ConfigError::NonFinite("spin_factor"));
        }

        let params = Self {
            mass: body.mass,
            radius: body.radius,
            drag_coefficient: body.drag_coefficient,
            air_density: body.air_density,
            lift_factor: body.spin_factor * body.mass,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the ranges the force model relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        check_non_negative("radius", self.radius)?;
        check_non_negative("drag_coefficient", self.drag_coefficient)?;
        check_non_negative("air_density", self.air_density)?;
        if !self.lift_factor.is_finite() {
            return Err(ConfigError::NonFinite("lift_factor"));
        }
        Ok(())
    }

    /// Cross-sectional area presented to the flow (πr²)
    pub fn cross_section(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name));
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

// =============================================================================
// Particle State
// =============================================================================

/// Complete state of the sphere at a given instant.
///
/// The spin vector encodes both the axis and magnitude of rotation
/// (right-hand rule, rad/s) and stays constant for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub pos: Vec3,
    pub time: f64,
    pub vel: Vec3,
    pub spin: Vec3,
    pub params: PhysicalParams,
}

impl ParticleState {
    /// Build the launch state of a body at time zero.
    pub fn new(
        pos: Vec3,
        vel: Vec3,
        spin: Vec3,
        body: &BodyProperties,
    ) -> Result<Self, ConfigError> {
        let params = PhysicalParams::from_body(body)?;
        let state = Self {
            pos,
            time: 0.0,
            vel,
            spin,
            params,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check that the state can be integrated.
    ///
    /// Fields are public, so a state built or edited by hand is re-checked
    /// here before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pos.is_finite() {
            return Err(ConfigError::NonFinite("position"));
        }
        if !self.vel.is_finite() {
            return Err(ConfigError::NonFinite("velocity"));
        }
        if !self.spin.is_finite() {
            return Err(ConfigError::NonFinite("spin"));
        }
        check_non_negative("time", self.time)?;
        self.params.validate()
    }

    /// Same state with a different velocity; used for the RK4 stage evaluations.
    pub fn with_velocity(&self, vel: Vec3) -> Self {
        Self { vel, ..*self }
    }

    /// Net acceleration under gravity, drag and Magnus lift in the given wind.
    pub fn acceleration(&self, wind: Vec3) -> Vec3 {
        use crate::forces::AerodynamicForces;
        use crate::integrator::ForceModel;
        AerodynamicForces::new(wind).linear_acceleration(self)
    }

    /// On or below the ground and not moving upward.
    ///
    /// A launch from z = 0 with upward velocity is still flying.
    pub fn is_grounded(&self) -> bool {
        self.pos.z < 0.0 || (self.pos.z <= 0.0 && self.vel.z <= 0.0)
    }

    /// Translational kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.params.mass * self.vel.magnitude_squared()
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Physical constants used in the simulation.
pub mod constants {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Air density at sea level, 15°C (kg/m³)
    pub const AIR_DENSITY: f64 = 1.225;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================
