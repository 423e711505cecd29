use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use crate::dataset::MoleculeDataSet;
use crate::thermostat::{DriftBias, ThermostatState};

/// Speed given to every molecule when warming up from complete rest.
pub const REST_RESEED_SPEED: f64 = 0.1;

/// Falling molecules slower than this sideways keep their horizontal speed,
/// otherwise repeated down-scaling makes them look like they float.
pub const FALLING_HORIZONTAL_SPEED_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsokineticAdjustment {
    Scaled(f64),
    Reseeded,
}

/// Rescales all velocities so that kinetic energy matches the target.
#[derive(Debug, Clone)]
pub struct IsokineticThermostat {
    pub target_temperature: f64,
    pub minimum_temperature: f64,
    previous_scale: f64,
    drift: DriftBias,
    rng: StdRng,
}

impl IsokineticThermostat {
    pub fn new(target_temperature: f64, minimum_temperature: f64, seed: u64) -> Self {
        Self {
            target_temperature,
            minimum_temperature,
            previous_scale: 1.0,
            drift: DriftBias::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn adjust_temperature(&mut self, data: &mut MoleculeDataSet, measured_temperature: f64) -> IsokineticAdjustment {
        let n = data.number_of_molecules();
        if n == 0 {
            return IsokineticAdjustment::Scaled(1.0);
        }

        let at_rest = measured_temperature <= self.minimum_temperature;
        if at_rest && self.target_temperature > self.minimum_temperature {
            self.reseed_from_rest(data);
            return IsokineticAdjustment::Reseeded;
        }

        let scale = if self.target_temperature <= self.minimum_temperature || measured_temperature <= 0.0 {
            0.0
        } else {
            (self.target_temperature / measured_temperature).sqrt()
        };

        let correction = if scale > 0.0 { self.drift.take_correction() } else { 0.0 };
        let mut scaling_change = 0.0;
        for v in data.velocities.iter_mut() {
            let falling = v.y < 0.0 && v.x.abs() < FALLING_HORIZONTAL_SPEED_THRESHOLD;
            let x = if falling && scale > 0.0 { v.x } else { v.x * scale };
            scaling_change += x - v.x;
            *v = Vector2::new(x - correction, v.y * scale);
        }
        if data.has_rotation() {
            for rate in data.rotation_rates.iter_mut() {
                *rate *= scale;
            }
        }

        if scale > 0.0 {
            self.drift.accumulate(scaling_change / n as f64);
        }
        self.previous_scale = scale;
        IsokineticAdjustment::Scaled(scale)
    }

    fn reseed_from_rest(&mut self, data: &mut MoleculeDataSet) {
        for v in data.velocities.iter_mut() {
            let angle = self.rng.gen::<f64>() * TAU;
            *v = Vector2::new(angle.cos(), angle.sin()) * REST_RESEED_SPEED;
        }
        for rate in data.rotation_rates.iter_mut() {
            *rate = 0.0;
        }
        self.previous_scale = 1.0;
    }

    pub fn clear_accumulated_bias(&mut self) {
        self.drift.clear();
    }

    pub fn accumulated_bias(&self) -> f64 {
        self.drift.value()
    }

    pub fn state(&self) -> ThermostatState {
        ThermostatState {
            target_temperature: self.target_temperature,
            minimum_temperature: self.minimum_temperature,
            scale: self.previous_scale,
            accumulated_drift: self.drift.value(),
        }
    }

    pub fn restore(&mut self, state: &ThermostatState) {
        self.target_temperature = state.target_temperature;
        self.minimum_temperature = state.minimum_temperature;
        self.previous_scale = state.scale;
        self.drift.set(state.accumulated_drift);
    }
}
