use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::dataset::MoleculeDataSet;
use crate::thermostat::{DriftBias, ThermostatState};

pub const ANDERSEN_GAMMA: f64 = 0.999;
pub const ANDERSEN_GAMMA_AT_REST: f64 = 0.5;

/// Stochastic thermostat: every velocity component is damped by `gamma` and
/// kicked by a Gaussian whose width keeps the target temperature stationary.
#[derive(Debug, Clone)]
pub struct AndersenThermostat {
    pub target_temperature: f64,
    pub minimum_temperature: f64,
    gamma: f64,
    drift: DriftBias,
    rng: StdRng,
}

impl AndersenThermostat {
    pub fn new(target_temperature: f64, minimum_temperature: f64, seed: u64) -> Self {
        Self {
            target_temperature,
            minimum_temperature,
            gamma: ANDERSEN_GAMMA,
            drift: DriftBias::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn adjust_temperature(&mut self, data: &mut MoleculeDataSet) {
        let n = data.number_of_molecules();
        if n == 0 {
            return;
        }

        let (gamma, temperature) = if self.target_temperature <= self.minimum_temperature {
            (ANDERSEN_GAMMA_AT_REST, 0.0)
        } else {
            (ANDERSEN_GAMMA, self.target_temperature)
        };
        self.gamma = gamma;

        let kick = temperature * (1.0 - gamma * gamma);
        let velocity_scale = (kick / data.molecule_mass()).sqrt();
        let correction = self.drift.take_correction();

        let mut random_x = 0.0;
        for v in data.velocities.iter_mut() {
            let zx: f64 = StandardNormal.sample(&mut self.rng);
            let zy: f64 = StandardNormal.sample(&mut self.rng);
            let (dx, dy) = (velocity_scale * zx, velocity_scale * zy);
            random_x += dx;
            v.x = v.x * gamma + dx - correction;
            v.y = v.y * gamma + dy;
        }

        if data.has_rotation() {
            let rotation_scale = (kick / data.moment_of_inertia()).sqrt();
            for rate in data.rotation_rates.iter_mut() {
                let z: f64 = StandardNormal.sample(&mut self.rng);
                *rate = *rate * gamma + rotation_scale * z;
            }
        }

        self.drift.accumulate(random_x / n as f64);
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
            scale: self.gamma,
            accumulated_drift: self.drift.value(),
        }
    }

    pub fn restore(&mut self, state: &ThermostatState) {
        self.target_temperature = state.target_temperature;
        self.minimum_temperature = state.minimum_temperature;
        self.gamma = state.scale;
        self.drift.set(state.accumulated_drift);
    }
}
