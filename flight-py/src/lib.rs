//! Python bindings for flight-core.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from flight_physics import Simulation, run_scenario
//!
//! sim = Simulation("ping_pong")
//! sim.set_position(0.0, 0.0, 1.0)
//! sim.set_velocity(10.0, 0.0, 10.0)
//! sim.set_spin(0.0, -50.0, 0.0)
//!
//! for t, x, y, z in sim.run(0.001, 10.0):
//!     print(f"{t:.3f}: ({x:.3f}, {y:.3f}, {z:.3f})")
//!
//! samples = run_scenario("validation_magnus")
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use flight_core::simulation::advance;
use flight_core::{
    AerodynamicForces, BodyProperties, FlightPhase, ParticleState, RunConfig, Scenario,
    Trajectory, Vec3 as CoreVec3,
};

fn value_error<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn samples(trajectory: &Trajectory) -> Vec<(f64, f64, f64, f64)> {
    trajectory
        .samples()
        .iter()
        .map(|s| (s.time, s.pos.x, s.pos.y, s.pos.z))
        .collect()
}

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

/// Single-body flight simulation.
///
/// Configure the launch, then either `run()` to completion or `step()`
/// manually. Configuration changes reset the clock.
#[pyclass]
pub struct Simulation {
    body: BodyProperties,
    pos: CoreVec3,
    vel: CoreVec3,
    spin: CoreVec3,
    wind: CoreVec3,
    current: Option<ParticleState>,
    phase: FlightPhase,
}

impl Simulation {
    fn initial_state(&self) -> PyResult<ParticleState> {
        ParticleState::new(self.pos, self.vel, self.spin, &self.body).map_err(value_error)
    }

    fn reset_run(&mut self) {
        self.current = None;
        self.phase = FlightPhase::Flying;
    }
}

#[pymethods]
impl Simulation {
    /// Create a simulation for a built-in body ("baseball", "ping_pong", "ideal").
    #[new]
    #[pyo3(signature = (body = "ideal"))]
    fn new(body: &str) -> PyResult<Self> {
        let body = BodyProperties::builtin(body)
            .ok_or_else(|| PyValueError::new_err(format!("unknown body '{}'", body)))?;
        Ok(Self {
            body,
            pos: CoreVec3::new(0.0, 0.0, 1.0),
            vel: CoreVec3::ZERO,
            spin: CoreVec3::ZERO,
            wind: CoreVec3::ZERO,
            current: None,
            phase: FlightPhase::Flying,
        })
    }

    /// Replace the body with custom parameters.
    #[pyo3(signature = (mass, radius, drag_coefficient, air_density, spin_factor, name = "Custom"))]
    fn set_body(
        &mut self,
        mass: f64,
        radius: f64,
        drag_coefficient: f64,
        air_density: f64,
        spin_factor: f64,
        name: &str,
    ) {
        self.body = BodyProperties {
            name: name.to_string(),
            mass,
            radius,
            drag_coefficient,
            air_density,
            spin_factor,
        };
        self.reset_run();
    }

    fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.pos = CoreVec3::new(x, y, z);
        self.reset_run();
    }

    fn set_velocity(&mut self, vx: f64, vy: f64, vz: f64) {
        self.vel = CoreVec3::new(vx, vy, vz);
        self.reset_run();
    }

    /// Set spin in rad/s.
    fn set_spin(&mut self, wx: f64, wy: f64, wz: f64) {
        self.spin = CoreVec3::new(wx, wy, wz);
        self.reset_run();
    }

    /// Set spin from RPM.
    fn set_spin_rpm(&mut self, wx_rpm: f64, wy_rpm: f64, wz_rpm: f64) {
        let factor = 2.0 * std::f64::consts::PI / 60.0;
        self.set_spin(wx_rpm * factor, wy_rpm * factor, wz_rpm * factor);
    }

    fn set_wind(&mut self, wx: f64, wy: f64, wz: f64) {
        self.wind = CoreVec3::new(wx, wy, wz);
        self.reset_run();
    }

    /// Current simulation time in seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.current.map_or(0.0, |s| s.time)
    }

    fn position(&self) -> Vec3 {
        self.current.map_or(self.pos, |s| s.pos).into()
    }

    fn velocity(&self) -> Vec3 {
        self.current.map_or(self.vel, |s| s.vel).into()
    }

    /// "flying", "grounded" or "timed_out".
    fn phase(&self) -> &'static str {
        match self.phase {
            FlightPhase::Flying => "flying",
            FlightPhase::Grounded => "grounded",
            FlightPhase::TimedOut => "timed_out",
        }
    }

    /// Run from the launch state to landing or `max_time`.
    ///
    /// Returns a list of `(time, x, y, z)` tuples.
    #[pyo3(signature = (time_step = 0.001, max_time = 10.0))]
    fn run(&mut self, time_step: f64, max_time: f64) -> PyResult<Vec<(f64, f64, f64, f64)>> {
        let initial = self.initial_state()?;
        let trajectory =
            flight_core::simulate(&initial, self.wind, time_step, max_time).map_err(value_error)?;
        Ok(samples(&trajectory))
    }

    /// Advance by one RK4 step; returns the phase afterwards.
    #[pyo3(signature = (time_step = 0.001, max_time = 10.0))]
    fn step(&mut self, time_step: f64, max_time: f64) -> PyResult<&'static str> {
        let config = RunConfig::new(time_step, max_time).map_err(value_error)?;
        let state = match self.current {
            Some(state) => state,
            None => {
                let state = self.initial_state()?;
                if state.is_grounded() {
                    self.phase = FlightPhase::Grounded;
                }
                state
            }
        };

        if self.phase == FlightPhase::Flying {
            let (next, phase) = advance(&state, &AerodynamicForces::new(self.wind), &config);
            self.current = Some(next);
            self.phase = phase;
        } else {
            self.current = Some(state);
        }
        Ok(self.phase())
    }

    /// Return to the launch state.
    fn reset(&mut self) {
        self.reset_run();
    }

    /// Get current state as dict for easy inspection.
    fn state_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let pos = self.current.map_or(self.pos, |s| s.pos);
        let vel = self.current.map_or(self.vel, |s| s.vel);
        let dict = PyDict::new(py);
        dict.set_item("time", self.time())?;
        dict.set_item("x", pos.x)?;
        dict.set_item("y", pos.y)?;
        dict.set_item("z", pos.z)?;
        dict.set_item("vx", vel.x)?;
        dict.set_item("vy", vel.y)?;
        dict.set_item("vz", vel.z)?;
        dict.set_item("speed", vel.magnitude())?;
        dict.set_item("phase", self.phase())?;
        dict.set_item("body", self.body.name.as_str())?;
        Ok(dict)
    }
}

/// Run a built-in scenario and return its `(time, x, y, z)` samples.
#[pyfunction]
fn run_scenario(name: &str) -> PyResult<Vec<(f64, f64, f64, f64)>> {
    let scenario = Scenario::builtin(name)
        .ok_or_else(|| PyValueError::new_err(format!("unknown scenario '{}'", name)))?;
    let trajectory = scenario.run().map_err(value_error)?;
    Ok(samples(&trajectory))
}

/// Names of the built-in scenarios.
#[pyfunction]
fn scenario_names() -> Vec<&'static str> {
    Scenario::BUILTIN.to_vec()
}

/// Python module definition.
#[pymodule]
fn flight_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Simulation>()?;
    m.add_function(wrap_pyfunction!(run_scenario, m)?)?;
    m.add_function(wrap_pyfunction!(scenario_names, m)?)?;
    Ok(())
}
