//! Temperature-dependent electrostatics for water.
//!
//! Solid water only looks crystalline on screen if the partial charges are
//! far stronger than physical ones and the short-range repulsion is stiffened.
//! Both effects fade out linearly as the set point moves from frozen to
//! melted, so the liquid and gas behave like ordinary Lennard-Jones matter.

pub const WATER_FULLY_FROZEN_TEMPERATURE: f64 = 0.22;
pub const WATER_FULLY_MELTED_TEMPERATURE: f64 = 0.30;
pub const WATER_FULLY_FROZEN_ELECTROSTATIC_FORCE: f64 = 1.25;
pub const WATER_FULLY_MELTED_ELECTROSTATIC_FORCE: f64 = 0.3;
pub const MAX_REPULSIVE_SCALING_FACTOR_FOR_WATER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterChargeTuning {
    /// Hydrogen charge; oxygen carries `-2 q`.
    pub q: f64,
    /// Multiplier on the r^-12 Lennard-Jones term.
    pub repulsive_scale: f64,
}

impl WaterChargeTuning {
    pub fn for_temperature(temperature: f64) -> Self {
        if temperature <= WATER_FULLY_FROZEN_TEMPERATURE {
            Self {
                q: WATER_FULLY_FROZEN_ELECTROSTATIC_FORCE,
                repulsive_scale: MAX_REPULSIVE_SCALING_FACTOR_FOR_WATER,
            }
        } else if temperature >= WATER_FULLY_MELTED_TEMPERATURE {
            Self {
                q: WATER_FULLY_MELTED_ELECTROSTATIC_FORCE,
                repulsive_scale: 1.0,
            }
        } else {
            let melted = (temperature - WATER_FULLY_FROZEN_TEMPERATURE)
                / (WATER_FULLY_MELTED_TEMPERATURE - WATER_FULLY_FROZEN_TEMPERATURE);
            Self {
                q: WATER_FULLY_FROZEN_ELECTROSTATIC_FORCE
                    - melted
                        * (WATER_FULLY_FROZEN_ELECTROSTATIC_FORCE
                            - WATER_FULLY_MELTED_ELECTROSTATIC_FORCE),
                repulsive_scale: MAX_REPULSIVE_SCALING_FACTOR_FOR_WATER
                    - melted * (MAX_REPULSIVE_SCALING_FACTOR_FOR_WATER - 1.0),
            }
        }
    }

    /// Oxygen, hydrogen, hydrogen.
    pub fn charges(&self) -> [f64; 3] {
        [-2.0 * self.q, self.q, self.q]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frozen_and_melted_limits() {
        let frozen = WaterChargeTuning::for_temperature(0.0);
        assert_eq!(frozen.q, WATER_FULLY_FROZEN_ELECTROSTATIC_FORCE);
        assert_eq!(frozen.repulsive_scale, MAX_REPULSIVE_SCALING_FACTOR_FOR_WATER);

        let melted = WaterChargeTuning::for_temperature(5.0);
        assert_eq!(melted.q, WATER_FULLY_MELTED_ELECTROSTATIC_FORCE);
        assert_eq!(melted.repulsive_scale, 1.0);
    }

    #[test]
    fn test_midpoint_interpolation() {
        let mid = (WATER_FULLY_FROZEN_TEMPERATURE + WATER_FULLY_MELTED_TEMPERATURE) / 2.0;
        let tuning = WaterChargeTuning::for_temperature(mid);
        assert_relative_eq!(tuning.q, 0.775, epsilon = 1e-12);
        assert_relative_eq!(tuning.repulsive_scale, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tuning_is_continuous_and_monotone() {
        let mut previous = WaterChargeTuning::for_temperature(0.0);
        for i in 1..100 {
            let t = i as f64 * 0.005;
            let tuning = WaterChargeTuning::for_temperature(t);
            assert!(tuning.q <= previous.q);
            assert!(tuning.repulsive_scale <= previous.repulsive_scale);
            assert!((tuning.q - previous.q).abs() < 0.5);
            previous = tuning;
        }
    }

    #[test]
    fn test_molecule_is_neutral() {
        let tuning = WaterChargeTuning::for_temperature(0.25);
        assert_relative_eq!(tuning.charges().iter().sum::<f64>(), 0.0, epsilon = 1e-12);
    }
}
