//! Configuration for a simulation run
//!
//! A run is described by a YAML file with two sections: `model`, the initial
//! state of the particle model, and `scenario`, a headless script of frames
//! and scheduled user actions. Every field has a default so an empty file is a
//! valid configuration.

mod args;

pub use args::Args;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::constants::*;
use crate::substance::{PhaseState, Substance};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

/// Initial state of the particle model
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_substance")]
    pub substance: Substance,
    #[serde(default = "default_phase")]
    pub initial_phase: PhaseState,
    /// Number of molecules (default: the substance's standard count)
    #[serde(default)]
    pub molecule_count: Option<usize>,
    /// Random seed (default: drawn from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_gravitational_acceleration")]
    pub gravitational_acceleration: f64,
    /// Time step used for the relaxation substeps after a phase change
    #[serde(default = "default_nominal_time_step")]
    pub nominal_time_step: f64,
    /// Whether excess pressure blows the lid off
    #[serde(default = "default_explosion_enabled")]
    pub explosion_enabled: bool,
    /// Well depth of the adjustable atom, in the same units as its default
    #[serde(default = "default_epsilon")]
    pub adjustable_epsilon: f64,
    /// Diameter of the adjustable atom in picometers
    #[serde(default = "default_sigma")]
    pub adjustable_sigma: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            substance: default_substance(),
            initial_phase: default_phase(),
            molecule_count: None,
            seed: None,
            gravitational_acceleration: default_gravitational_acceleration(),
            nominal_time_step: default_nominal_time_step(),
            explosion_enabled: default_explosion_enabled(),
            adjustable_epsilon: default_epsilon(),
            adjustable_sigma: default_sigma(),
        }
    }
}

/// Headless run: frame count, frame length and scheduled actions
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Wall-clock seconds per frame
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f64,
    /// Frames between status reports
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            frame_dt: default_frame_dt(),
            report_interval: default_report_interval(),
            events: Vec::new(),
        }
    }
}

/// An action applied before the given frame is stepped
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenarioEvent {
    pub frame: usize,
    #[serde(flatten)]
    pub action: ScenarioAction,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioAction {
    HeatingCooling { amount: f64 },
    Inject { count: usize },
    ContainerHeight { height: f64 },
    Phase { phase: PhaseState },
    Substance { substance: Substance },
    Gravity { acceleration: f64 },
    Explode,
    ReturnLid,
    Pause,
    Play,
}

// Default value functions
fn default_substance() -> Substance {
    Substance::Neon
}
fn default_phase() -> PhaseState {
    PhaseState::Solid
}
fn default_gravitational_acceleration() -> f64 {
    INITIAL_GRAVITATIONAL_ACCEL
}
fn default_nominal_time_step() -> f64 {
    MODEL_TIME_STEP
}
fn default_explosion_enabled() -> bool {
    true
}
fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}
fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}
fn default_frames() -> usize {
    600
}
fn default_frame_dt() -> f64 {
    NOMINAL_FRAME_DT
}
fn default_report_interval() -> usize {
    60
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

impl SimulationConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_yml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model.validate()?;
        self.scenario.validate()
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_GRAVITATIONAL_ACCEL).contains(&self.gravitational_acceleration) {
            return Err(invalid(format!(
                "gravitational acceleration must be within [0, {}]",
                MAX_GRAVITATIONAL_ACCEL
            )));
        }
        if !self.nominal_time_step.is_finite() || self.nominal_time_step <= 0.0 {
            return Err(invalid("nominal time step must be positive"));
        }
        if !(MIN_EPSILON..=MAX_EPSILON).contains(&self.adjustable_epsilon) {
            return Err(invalid(format!(
                "adjustable epsilon must be within [{}, {}]",
                MIN_EPSILON, MAX_EPSILON
            )));
        }
        if !(MIN_SIGMA..=MAX_SIGMA).contains(&self.adjustable_sigma) {
            return Err(invalid(format!(
                "adjustable sigma must be within [{}, {}]",
                MIN_SIGMA, MAX_SIGMA
            )));
        }
        if let Some(count) = self.molecule_count {
            let max = self.substance.molecule_kind().max_molecules();
            if count == 0 || count > max {
                return Err(invalid(format!(
                    "molecule count for {} must be within [1, {}]",
                    self.substance, max
                )));
            }
        }
        Ok(())
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_dt.is_finite() || self.frame_dt <= 0.0 {
            return Err(invalid("frame dt must be positive"));
        }
        if self.report_interval == 0 {
            return Err(invalid("report interval must be positive"));
        }
        for event in &self.events {
            match event.action {
                ScenarioAction::HeatingCooling { amount } if !(-1.0..=1.0).contains(&amount) => {
                    return Err(invalid(format!(
                        "heating/cooling amount at frame {} must be within [-1, 1]",
                        event.frame
                    )));
                }
                ScenarioAction::Gravity { acceleration }
                    if !(0.0..=MAX_GRAVITATIONAL_ACCEL).contains(&acceleration) =>
                {
                    return Err(invalid(format!(
                        "gravitational acceleration at frame {} is out of range",
                        event.frame
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Events scheduled for `frame`, in file order.
    pub fn events_at(&self, frame: usize) -> impl Iterator<Item = &ScenarioAction> {
        self.events
            .iter()
            .filter(move |e| e.frame == frame)
            .map(|e| &e.action)
    }
}
