use crate::dataset::MoleculeDataSet;
use crate::verlet::{lennard_jones_force, torque, ForceEnvironment, InteractionKernel};

/// Rigid two-atom molecules; every atom of one molecule interacts with every
/// atom of the other.
#[derive(Debug, Clone)]
pub struct DiatomicForces {
    pub interaction_distance_sqrd: f64,
    pub min_distance_sqrd: f64,
}

impl Default for DiatomicForces {
    fn default() -> Self {
        Self {
            interaction_distance_sqrd: 9.0,
            min_distance_sqrd: 0.7225,
        }
    }
}

impl InteractionKernel for DiatomicForces {
    fn accumulate_interactions(&self, data: &mut MoleculeDataSet, env: &ForceEnvironment) {
        let n = data.number_of_molecules();
        for i in 0..n {
            let com_i = data.center_of_mass_positions[i];
            for j in (i + 1)..n {
                let com_j = data.center_of_mass_positions[j];
                if (com_i - com_j).norm_squared() >= self.interaction_distance_sqrd {
                    continue;
                }
                for ii in 0..2 {
                    let a = data.atom_positions[2 * i + ii];
                    for jj in 0..2 {
                        let b = data.atom_positions[2 * j + jj];
                        let f = lennard_jones_force(a, b, self.min_distance_sqrd, env.scaled_epsilon, 1.0);
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
