//! Capture and restore of the full model state.

use serde::{Deserialize, Serialize};

use crate::dataset::MoleculeDataSet;
use crate::model::MultipleParticleModel;
use crate::substance::Substance;
use crate::thermostat::ThermostatState;
use crate::verlet::VerletAlgorithm;

/// Everything needed to bring a model back to an earlier moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub substance: Substance,
    pub exploded: bool,
    /// Picometers.
    pub container_height: f64,
    pub lid_velocity: f64,
    pub heating_cooling_amount: f64,
    pub gravitational_acceleration: f64,
    pub temperature_set_point: f64,
    pub adjustable_epsilon: f64,
    pub adjustable_sigma: f64,
    pub pressure: f64,
    pub data: MoleculeDataSet,
    pub isokinetic: ThermostatState,
    pub andersen: ThermostatState,
}

impl MultipleParticleModel {
    pub fn capture_state(&self) -> ModelState {
        let (isokinetic, andersen) = self.thermostats.states();
        ModelState {
            substance: self.substance,
            exploded: self.exploded,
            container_height: self.container.height(),
            lid_velocity: self.container.lid_velocity(),
            heating_cooling_amount: self.heating_cooling_amount,
            gravitational_acceleration: self.gravitational_acceleration,
            temperature_set_point: self.temperature_set_point,
            adjustable_epsilon: self.adjustable_epsilon,
            adjustable_sigma: self.adjustable_sigma,
            pressure: self.strategies.verlet.pressure(),
            data: self.data.clone(),
            isokinetic,
            andersen,
        }
    }

    /// Restore a captured state. The substance is applied first since it
    /// rebuilds everything that depends on it.
    ///
    /// # Panics
    ///
    /// Panics if the captured data set does not match the captured substance.
    pub fn restore_state(&mut self, state: &ModelState) {
        assert_eq!(
            state.data.kind(),
            state.substance.molecule_kind(),
            "captured data set does not match the captured substance"
        );
        assert!(state.data.check_invariants(), "captured data set is inconsistent");

        self.adjustable_epsilon = state.adjustable_epsilon;
        self.adjustable_sigma = state.adjustable_sigma;
        self.set_substance(state.substance);

        self.data = state.data.clone();
        self.target_molecule_count = self.clamp_molecule_count(self.data.number_of_molecules());
        self.exploded = state.exploded;
        self.container
            .restore(state.container_height, state.lid_velocity);
        self.heating_cooling_amount = state.heating_cooling_amount;
        self.set_gravitational_acceleration(state.gravitational_acceleration);
        self.set_temperature_set_point(state.temperature_set_point);
        self.thermostats
            .restore(&state.isokinetic, &state.andersen);
        self.strategies
            .verlet
            .pressure_tracker_mut()
            .set_pressure(state.pressure);
    }
}
