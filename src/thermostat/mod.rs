//! Velocity thermostats driving the measured temperature toward the set point.

pub mod andersen;
pub mod isokinetic;


use serde::{Deserialize, Serialize};

pub use andersen::AndersenThermostat;
pub use isokinetic::{IsokineticAdjustment, IsokineticThermostat};

/// Accumulated horizontal drift below which no correction is applied.
pub const DRIFT_CORRECTION_THRESHOLD: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermostatKind {
    Isokinetic,
    Andersen,
}

/// Snapshot of the tunable state of either thermostat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermostatState {
    pub target_temperature: f64,
    pub minimum_temperature: f64,
    /// Last scale (isokinetic) or damping factor (Andersen) applied.
    pub scale: f64,
    pub accumulated_drift: f64,
}

/// Mean horizontal velocity the thermostat has injected, paid back once it
/// grows past [`DRIFT_CORRECTION_THRESHOLD`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DriftBias {
    accumulated_x: f64,
}

impl DriftBias {
    pub(crate) fn accumulate(&mut self, mean_change: f64) {
        self.accumulated_x += mean_change;
    }

    /// Correction to subtract from every horizontal velocity this tick.
    pub(crate) fn take_correction(&mut self) -> f64 {
        if self.accumulated_x.abs() > DRIFT_CORRECTION_THRESHOLD {
            std::mem::take(&mut self.accumulated_x)
        } else {
            0.0
        }
    }

    pub(crate) fn value(&self) -> f64 {
        self.accumulated_x
    }

    pub(crate) fn set(&mut self, value: f64) {
        self.accumulated_x = value;
    }

    pub(crate) fn clear(&mut self) {
        self.accumulated_x = 0.0;
    }
}
