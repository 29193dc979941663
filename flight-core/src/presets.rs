//! Preset bodies and scenarios.
//!
//! Bodies and scenarios are plain records. A handful are built in; more can
//! be loaded from YAML files, so new setups need no recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── bodies/
//! │   ├── baseball.yaml
//! │   ├── ping_pong.yaml
//! │   └── ...
//! └── scenarios/
//!     ├── validation_no_drag.yaml
//!     └── ...
//! ```
//!
//! A scenario file names its body either by preset name or inline:
//!
//! ```yaml
//! name: Ping pong serve
//! body: ping_pong          # or a full body mapping
//! position: { x: 0.0, y: 0.0, z: 1.0 }
//! velocity: { x: 10.0, y: 10.0, z: 10.0 }
//! spin: { x: 0.0, y: 0.0, z: 50.0 }
//! time_step: 0.001
//! max_time: 10.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PresetError};
use crate::simulation::{simulate, RunConfig};
use crate::trajectory::Trajectory;
use crate::types::{BodyProperties, ParticleState, Vec3};

impl BodyProperties {
    /// Names accepted by [`BodyProperties::builtin`].
    pub const BUILTIN: [&'static str; 3] = ["baseball", "ping_pong", "ideal"];

    /// Look up a compiled-in body.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "baseball" => Some(Self::baseball()),
            "ping_pong" => Some(Self::ping_pong()),
            "ideal" => Some(Self::ideal()),
            _ => None,
        }
    }
}

/// A complete, runnable setup: body, launch conditions, wind and stepping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub body: BodyProperties,
    pub position: Vec3,
    pub velocity: Vec3,
    #[serde(default)]
    pub spin: Vec3,
    #[serde(default)]
    pub wind: Vec3,
    pub time_step: f64,
    pub max_time: f64,
}

impl Scenario {
    /// Names accepted by [`Scenario::builtin`].
    pub const BUILTIN: [&'static str; 6] = [
        "validation_no_drag",
        "validation_drag",
        "validation_magnus",
        "submission",
        "ping_pong_serve",
        "baseball_hit",
    ];

    fn preset(
        name: &str,
        body: BodyProperties,
        position: Vec3,
        velocity: Vec3,
        spin: Vec3,
    ) -> Self {
        let run = RunConfig::default();
        Self {
            name: name.to_string(),
            body,
            position,
            velocity,
            spin,
            wind: Vec3::ZERO,
            time_step: run.time_step,
            max_time: run.max_time,
        }
    }

    /// Ballistic check: no air, closed-form flight time and range.
    pub fn validation_no_drag() -> Self {
        Self::preset(
            "Validation: without air resistance",
            BodyProperties::ideal(),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(15.0, 5.0, 15.0),
            Vec3::ZERO,
        )
    }

    /// Same launch as [`Scenario::validation_no_drag`] with a ping pong ball.
    pub fn validation_drag() -> Self {
        Self::preset(
            "Validation: with air resistance",
            BodyProperties::ping_pong(),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(15.0, 5.0, 15.0),
            Vec3::ZERO,
        )
    }

    pub fn validation_magnus() -> Self {
        Self::preset(
            "Validation: with Magnus effect",
            BodyProperties::ping_pong(),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(15.0, 5.0, 15.0),
            Vec3::new(-20.0, -40.0, 20.0),
        )
    }

    /// 2.7 g, 4 cm ball from 5 m up with strong mixed spin.
    pub fn submission() -> Self {
        Self::preset(
            "Final submission",
            BodyProperties::ping_pong(),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(4.0, 4.0, 10.0),
            Vec3::new(-50.0, -100.0, 100.0),
        )
    }

    pub fn ping_pong_serve() -> Self {
        Self::preset(
            "Preset: ping pong ball",
            BodyProperties::ping_pong(),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(0.0, 0.0, 50.0),
        )
    }

    pub fn baseball_hit() -> Self {
        Self::preset(
            "Preset: baseball",
            BodyProperties::baseball(),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(30.0, 30.0, 30.0),
            Vec3::new(0.0, 0.0, 100.0),
        )
    }

    /// Look up a compiled-in scenario.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "validation_no_drag" => Some(Self::validation_no_drag()),
            "validation_drag" => Some(Self::validation_drag()),
            "validation_magnus" => Some(Self::validation_magnus()),
            "submission" => Some(Self::submission()),
            "ping_pong_serve" => Some(Self::ping_pong_serve()),
            "baseball_hit" => Some(Self::baseball_hit()),
            _ => None,
        }
    }

    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        RunConfig::new(self.time_step, self.max_time)
    }

    /// Launch state at t = 0.
    pub fn initial_state(&self) -> Result<ParticleState, ConfigError> {
        ParticleState::new(self.position, self.velocity, self.spin, &self.body)
    }

    /// Validate and simulate the scenario.
    pub fn run(&self) -> Result<Trajectory, ConfigError> {
        simulate(&self.initial_state()?, self.wind, self.time_step, self.max_time)
    }
}

/// Body reference inside a scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BodyRef {
    Named(String),
    Inline(BodyProperties),
}

/// On-disk scenario layout; the body is resolved by the loader.
#[derive(Debug, Clone, Deserialize)]
struct ScenarioFile {
    name: String,
    body: BodyRef,
    position: Vec3,
    velocity: Vec3,
    #[serde(default)]
    spin: Vec3,
    #[serde(default)]
    wind: Vec3,
    #[serde(default = "default_time_step")]
    time_step: f64,
    #[serde(default = "default_max_time")]
    max_time: f64,
}

fn default_time_step() -> f64 {
    RunConfig::default().time_step
}

fn default_max_time() -> f64 {
    RunConfig::default().max_time
}

/// Preset loader with configurable base directory.
pub struct PresetLoader {
    base_path: PathBuf,
}

impl PresetLoader {
    /// Create a new loader with the given base path.
    ///
    /// The base path should contain `bodies/` and `scenarios/` subdirectories.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a body by name (without .yaml extension).
    ///
    /// Falls back to the built-in body of the same name when no file exists.
    ///
    /// # Example
    /// ```ignore
    /// let loader = PresetLoader::new("presets");
    /// let ball = loader.load_body("ping_pong")?;
    /// ```
    pub fn load_body(&self, name: &str) -> Result<BodyProperties, PresetError> {
        let path = self.base_path.join("bodies").join(format!("{}.yaml", name));
        if !path.exists() {
            return BodyProperties::builtin(name)
                .ok_or_else(|| PresetError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let body: BodyProperties = serde_yaml::from_str(&contents)?;
        Ok(body)
    }

    /// Load a scenario by name, falling back to the built-in scenarios.
    pub fn load_scenario(&self, name: &str) -> Result<Scenario, PresetError> {
        let path = self
            .base_path
            .join("scenarios")
            .join(format!("{}.yaml", name));
        if !path.exists() {
            return Scenario::builtin(name).ok_or_else(|| PresetError::NotFound(name.to_string()));
        }
        self.load_scenario_file(&path)
    }

    /// Load a scenario from an explicit file path.
    ///
    /// Named bodies are looked up through this loader. The run settings are
    /// validated here so a bad file fails at load time.
    pub fn load_scenario_file<P: AsRef<Path>>(&self, path: P) -> Result<Scenario, PresetError> {
        let contents = fs::read_to_string(path)?;
        let file: ScenarioFile = serde_yaml::from_str(&contents)?;

        let body = match file.body {
            BodyRef::Named(name) => self.load_body(&name)?,
            BodyRef::Inline(body) => body,
        };

        let scenario = Scenario {
            name: file.name,
            body,
            position: file.position,
            velocity: file.velocity,
            spin: file.spin,
            wind: file.wind,
            time_step: file.time_step,
            max_time: file.max_time,
        };
        scenario.run_config()?;
        scenario.initial_state()?;
        Ok(scenario)
    }

    /// List all bodies available as files.
    pub fn list_bodies(&self) -> Result<Vec<String>, PresetError> {
        self.list_presets("bodies")
    }

    /// List all scenarios available as files.
    pub fn list_scenarios(&self) -> Result<Vec<String>, PresetError> {
        self.list_presets("scenarios")
    }

    fn list_presets(&self, subdir: &str) -> Result<Vec<String>, PresetError> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
