//! Recorded flight path.
//!
//! A [`Trajectory`] is the append-only list of `(time, position)` samples a
//! run produces, in simulation order. Field order of [`Sample`] is the column
//! order of the CSV report: `Time,X,Y,Z`.

use serde::{Deserialize, Serialize};

use crate::types::{ParticleState, Vec3};

/// One recorded point of the flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub pos: Vec3,
}

impl From<&ParticleState> for Sample {
    fn from(state: &ParticleState) -> Self {
        Self {
            time: state.time,
            pos: state.pos,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The body reached the ground (or started on it).
    Grounded,
    /// The stop time was reached while the body was still in the air.
    TimedOut,
}

/// Ordered, append-only sequence of samples.
///
/// Single writer: the simulation loop. Readers get slices only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<Sample>,
    termination: Option<Termination>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a trajectory from its initial condition.
    pub fn starting_at(state: &ParticleState) -> Self {
        let mut trajectory = Self::new();
        trajectory.record(state);
        trajectory
    }

    /// Append a sample. Times must not go backwards.
    pub fn push(&mut self, sample: Sample) {
        debug_assert!(
            self.last().map_or(true, |last| last.time <= sample.time),
            "trajectory samples must be in time order"
        );
        self.samples.push(sample);
    }

    pub fn record(&mut self, state: &ParticleState) {
        self.push(Sample::from(state));
    }

    pub(crate) fn finish(&mut self, termination: Termination) {
        self.termination = Some(termination);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The initial condition.
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// The impact point or the state at the stop-time cutoff.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// `None` until the run that produced this trajectory has finished.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Elapsed time between the first and last sample.
    pub fn flight_time(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Horizontal distance of the final sample from the origin.
    pub fn range(&self) -> f64 {
        self.last().map_or(0.0, |s| s.pos.horizontal_magnitude())
    }

    /// Highest recorded altitude.
    pub fn max_height(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.pos.z)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

// =============================================================================
// Tests
// =============================================================================
