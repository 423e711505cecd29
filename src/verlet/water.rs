use nalgebra::Vector2;

use crate::dataset::MoleculeDataSet;
use crate::verlet::charges::WaterChargeTuning;
use crate::verlet::{torque, ForceEnvironment, InteractionKernel};

const OXYGEN: usize = 0;

/// Lennard-Jones diameter and well depth of each atom, oxygen first.
pub const WATER_ATOM_SIGMAS: [f64; 3] = [1.0, 0.4, 0.4];
pub const WATER_ATOM_EPSILONS: [f64; 3] = [1.0, 0.25, 0.25];

/// Lennard-Jones separations are clamped to this fraction of the pair diameter.
pub const WATER_MIN_DISTANCE_RATIO: f64 = 0.85;

/// Lennard-Jones parameters for one atom pair, mixed from the atom values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomPair {
    pub sigma_sqrd: f64,
    pub epsilon: f64,
    pub min_distance_sqrd: f64,
}

impl AtomPair {
    fn mixed(a: usize, b: usize) -> Self {
        let sigma = 0.5 * (WATER_ATOM_SIGMAS[a] + WATER_ATOM_SIGMAS[b]);
        let min_distance = WATER_MIN_DISTANCE_RATIO * sigma;
        Self {
            sigma_sqrd: sigma * sigma,
            epsilon: (WATER_ATOM_EPSILONS[a] * WATER_ATOM_EPSILONS[b]).sqrt(),
            min_distance_sqrd: min_distance * min_distance,
        }
    }

    /// Force on the first atom along `d`, the vector from the second one.
    #[inline]
    fn force(&self, d: Vector2<f64>, epsilon: f64, repulsive_scale: f64) -> Vector2<f64> {
        let r2 = d.norm_squared().max(self.min_distance_sqrd);
        let s2 = self.sigma_sqrd / r2;
        let s6 = s2 * s2 * s2;
        d * (self.epsilon * epsilon * (48.0 * s6 * s6 * repulsive_scale - 24.0 * s6) / r2)
    }
}

/// Rigid three-atom water: Lennard-Jones between all nine atom pairs, with
/// small weak hydrogens, plus point charges between every pair that is not
/// hydrogen-hydrogen.
#[derive(Debug, Clone)]
pub struct WaterForces {
    pub interaction_distance_sqrd: f64,
    /// Floor on the squared separation in the charge interaction.
    pub min_charge_distance_sqrd: f64,
    pub pairs: [[AtomPair; 3]; 3],
}

impl Default for WaterForces {
    fn default() -> Self {
        Self {
            interaction_distance_sqrd: 9.0,
            min_charge_distance_sqrd: 0.36,
            pairs: std::array::from_fn(|a| std::array::from_fn(|b| AtomPair::mixed(a, b))),
        }
    }
}

impl InteractionKernel for WaterForces {
    fn accumulate_interactions(&self, data: &mut MoleculeDataSet, env: &ForceEnvironment) {
        let tuning = WaterChargeTuning::for_temperature(env.temperature_set_point);
        let charges = tuning.charges();
        let n = data.number_of_molecules();

        for i in 0..n {
            let com_i = data.center_of_mass_positions[i];
            for j in (i + 1)..n {
                let com_j = data.center_of_mass_positions[j];
                if (com_i - com_j).norm_squared() >= self.interaction_distance_sqrd {
                    continue;
                }
                for ii in 0..3 {
                    let a = data.atom_positions[3 * i + ii];
                    for jj in 0..3 {
                        let b = data.atom_positions[3 * j + jj];
                        let d = a - b;
                        let mut f = self.pairs[ii][jj].force(d, env.scaled_epsilon, tuning.repulsive_scale);

                        if ii == OXYGEN || jj == OXYGEN {
                            let r2 = d.norm_squared().max(self.min_charge_distance_sqrd);
                            let inv_r = 1.0 / r2.sqrt();
                            f += d * (charges[ii] * charges[jj] * inv_r * inv_r * inv_r);
                        }

                        data.next_forces[i] += f;
                        data.next_forces[j] -= f;
                        data.next_torques[i] += torque(a - com_i, f);
                        data.next_torques[j] -= torque(b - com_j, f);
                    }
                }
            }
        }
    }
}
