use serde::{Deserialize, Serialize};

use crate::constants::{EXPLOSION_PRESSURE, PRESSURE_CALC_WEIGHTING, PRESSURE_TO_ATMOSPHERES};
use crate::model::container::ContainerBounds;

/// Smoothed pressure from the force molecules exert on the walls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PressureTracker {
    pressure: f64,
}

impl PressureTracker {
    pub fn new() -> Self {
        Self { pressure: 0.0 }
    }

    /// Fold one substep's wall force into the running average. Returns true
    /// when the result exceeds the explosion limit.
    pub fn update(&mut self, wall_force: f64, bounds: &ContainerBounds, dt: f64) -> bool {
        if dt <= 0.0 {
            return false;
        }
        let perimeter = 2.0 * (bounds.width + bounds.height);
        let instantaneous = wall_force / perimeter;
        self.pressure =
            PRESSURE_CALC_WEIGHTING * self.pressure + (1.0 - PRESSURE_CALC_WEIGHTING) * instantaneous;
        self.pressure > EXPLOSION_PRESSURE
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn pressure_in_atmospheres(&self) -> f64 {
        self.pressure * PRESSURE_TO_ATMOSPHERES
    }

    pub fn set_pressure(&mut self, pressure: f64) {
        self.pressure = pressure;
    }

    pub fn reset(&mut self) {
        self.pressure = 0.0;
    }
}
