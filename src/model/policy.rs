//! Per-tick choice of how the temperature is regulated.

use tracing::debug;

use crate::constants::{
    COMFORTABLE_TEMPERATURE_HIGH, COMFORTABLE_TEMPERATURE_LOW, TEMPERATURE_CLOSENESS_RANGE,
};
use crate::dataset::MoleculeDataSet;
use crate::thermostat::{AndersenThermostat, IsokineticThermostat, ThermostatState};

/// Regulation applied in one tick, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermostatChoice {
    /// The lid pushed molecules; adopt the measured temperature as set point.
    LidDriven,
    /// A molecule arrived; fold its kinetic contribution into the set point.
    Injection { injected_temperature: f64 },
    Isokinetic,
    Andersen,
}

impl ThermostatChoice {
    fn same_regime(&self, other: &ThermostatChoice) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Observations feeding the choice.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInputs {
    pub lid_moved: bool,
    pub lid_changed_particle_velocity: bool,
    pub injected_temperature: Option<f64>,
    pub measured_temperature: f64,
    pub temperature_set_point: f64,
    pub heating_cooling_amount: f64,
}

impl PolicyInputs {
    pub fn choose(&self) -> ThermostatChoice {
        if self.lid_moved && self.lid_changed_particle_velocity {
            return ThermostatChoice::LidDriven;
        }
        if let Some(injected_temperature) = self.injected_temperature {
            return ThermostatChoice::Injection {
                injected_temperature,
            };
        }

        let far_from_set_point = (self.measured_temperature - self.temperature_set_point).abs()
            > TEMPERATURE_CLOSENESS_RANGE;
        let heating_unsatisfied =
            self.heating_cooling_amount > 0.0 && self.measured_temperature < self.temperature_set_point;
        let cooling_unsatisfied =
            self.heating_cooling_amount < 0.0 && self.measured_temperature > self.temperature_set_point;
        let uncomfortable = self.temperature_set_point < COMFORTABLE_TEMPERATURE_LOW
            || self.temperature_set_point > COMFORTABLE_TEMPERATURE_HIGH;

        if far_from_set_point || heating_unsatisfied || cooling_unsatisfied || uncomfortable {
            ThermostatChoice::Isokinetic
        } else {
            ThermostatChoice::Andersen
        }
    }
}

/// Owns both thermostats and remembers which regime ran last, so the drift
/// accumulators can be cleared whenever the regime changes.
#[derive(Debug, Clone)]
pub struct ThermostatPolicy {
    pub(crate) isokinetic: IsokineticThermostat,
    pub(crate) andersen: AndersenThermostat,
    last_choice: Option<ThermostatChoice>,
}

impl ThermostatPolicy {
    pub fn new(target_temperature: f64, minimum_temperature: f64, isokinetic_seed: u64, andersen_seed: u64) -> Self {
        Self {
            isokinetic: IsokineticThermostat::new(target_temperature, minimum_temperature, isokinetic_seed),
            andersen: AndersenThermostat::new(target_temperature, minimum_temperature, andersen_seed),
            last_choice: None,
        }
    }

    pub fn set_target_temperature(&mut self, temperature: f64) {
        self.isokinetic.target_temperature = temperature;
        self.andersen.target_temperature = temperature;
    }

    pub fn set_minimum_temperature(&mut self, temperature: f64) {
        self.isokinetic.minimum_temperature = temperature;
        self.andersen.minimum_temperature = temperature;
    }

    pub fn clear_accumulated_bias(&mut self) {
        self.isokinetic.clear_accumulated_bias();
        self.andersen.clear_accumulated_bias();
    }

    pub fn last_choice(&self) -> Option<ThermostatChoice> {
        self.last_choice
    }

    /// Record `choice` and run the thermostat it names, if any.
    pub fn apply(&mut self, choice: ThermostatChoice, data: &mut MoleculeDataSet, measured_temperature: f64) {
        let switched = self
            .last_choice
            .map_or(true, |last| !last.same_regime(&choice));
        if switched {
            debug!("Thermostat regime switched to {:?}", choice);
            self.clear_accumulated_bias();
        }
        self.last_choice = Some(choice);

        match choice {
            ThermostatChoice::Isokinetic => {
                self.isokinetic.adjust_temperature(data, measured_temperature);
            }
            ThermostatChoice::Andersen => self.andersen.adjust_temperature(data),
            ThermostatChoice::LidDriven | ThermostatChoice::Injection { .. } => {}
        }
    }

    pub fn states(&self) -> (ThermostatState, ThermostatState) {
        (self.isokinetic.state(), self.andersen.state())
    }

    pub fn restore(&mut self, isokinetic: &ThermostatState, andersen: &ThermostatState) {
        self.isokinetic.restore(isokinetic);
        self.andersen.restore(andersen);
        self.last_choice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substance::MoleculeKind;
    use nalgebra::Vector2;

    fn inputs(measured: f64, set_point: f64) -> PolicyInputs {
        PolicyInputs {
            lid_moved: false,
            lid_changed_particle_velocity: false,
            injected_temperature: None,
            measured_temperature: measured,
            temperature_set_point: set_point,
            heating_cooling_amount: 0.0,
        }
    }

    #[test]
    fn test_priority_order() {
        let mut i = inputs(0.3, 0.34);
        assert_eq!(i.choose(), ThermostatChoice::Andersen);

        i.measured_temperature = 0.9;
        assert_eq!(i.choose(), ThermostatChoice::Isokinetic);

        i.injected_temperature = Some(2.0);
        assert_eq!(
            i.choose(),
            ThermostatChoice::Injection {
                injected_temperature: 2.0
            }
        );

        i.lid_moved = true;
        assert_eq!(i.choose(), ThermostatChoice::Injection { injected_temperature: 2.0 });
        i.lid_changed_particle_velocity = true;
        assert_eq!(i.choose(), ThermostatChoice::LidDriven);
    }

    #[test]
    fn test_unsatisfied_heating_uses_isokinetic() {
        let mut i = inputs(0.30, 0.34);
        i.heating_cooling_amount = 0.5;
        assert_eq!(i.choose(), ThermostatChoice::Isokinetic);
        i.heating_cooling_amount = -0.5;
        assert_eq!(i.choose(), ThermostatChoice::Andersen);
    }

    #[test]
    fn test_uncomfortable_set_point_uses_isokinetic() {
        assert_eq!(inputs(0.05, 0.05).choose(), ThermostatChoice::Isokinetic);
        assert_eq!(inputs(12.0, 12.0).choose(), ThermostatChoice::Isokinetic);
    }

    #[test]
    fn test_switch_clears_bias() {
        let mut data = MoleculeDataSet::new(MoleculeKind::Monatomic, 4);
        for i in 0..4 {
            let p = Vector2::new(i as f64, 1.0);
            data.add_molecule(&[p], p, Vector2::new(0.5, 0.1), 0.0, true)
                .unwrap();
        }
        let mut policy = ThermostatPolicy::new(1.0, 0.0001, 1, 2);
        policy.apply(ThermostatChoice::Andersen, &mut data, 0.2);
        assert!(policy.andersen.accumulated_bias() != 0.0);

        policy.apply(ThermostatChoice::Isokinetic, &mut data, 0.2);
        assert_eq!(policy.andersen.accumulated_bias(), 0.0);
        assert_eq!(policy.last_choice(), Some(ThermostatChoice::Isokinetic));
    }
}
