//! # Flight Core
//!
//! Flight of a spinning sphere through air: gravity, quadratic drag relative
//! to the wind, and Magnus lift, integrated with fixed-step RK4 until the
//! sphere lands or the clock runs out.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, particle state, body properties)
//! - `forces`: Physical forces (gravity, drag, Magnus effect)
//! - `integrator`: Numerical integration (Runge–Kutta 4)
//! - `trajectory`: Recorded samples of a run
//! - `simulation`: Flight loop with ground and stop-time handling
//! - `presets`: Built-in and YAML-defined bodies and scenarios
//! - `error`: Configuration and loading errors
//!
//! ```no_run
//! use flight_core::{simulate, BodyProperties, ParticleState, Vec3};
//!
//! let launch = ParticleState::new(
//!     Vec3::new(0.0, 0.0, 1.0),
//!     Vec3::new(10.0, 0.0, 10.0),
//!     Vec3::new(0.0, -50.0, 0.0),
//!     &BodyProperties::ping_pong(),
//! )?;
//! let trajectory = simulate(&launch, Vec3::ZERO, 0.001, 10.0)?;
//! println!("landed {:.2} m away", trajectory.range());
//! # Ok::<(), flight_core::ConfigError>(())
//! ```

pub mod error;
pub mod forces;
pub mod integrator;
pub mod presets;
pub mod simulation;
pub mod trajectory;
pub mod types;

pub use error::{ConfigError, PresetError};
pub use forces::AerodynamicForces;
pub use integrator::{ForceModel, Rk4};
pub use presets::{PresetLoader, Scenario};
pub use simulation::{simulate, simulate_with, FlightPhase, RunConfig};
pub use trajectory::{Sample, Termination, Trajectory};
pub use types::{BodyProperties, ParticleState, PhysicalParams, Vec3};
