use crate::dataset::MoleculeDataSet;
use crate::verlet::{lennard_jones_force, ForceEnvironment, InteractionKernel};

/// Single Lennard-Jones atoms, no rotation.
#[derive(Debug, Clone)]
pub struct MonatomicForces {
    pub interaction_distance_sqrd: f64,
    pub min_distance_sqrd: f64,
}

impl Default for MonatomicForces {
    fn default() -> Self {
        Self {
            // cutoff at 2.5 sigma
            interaction_distance_sqrd: 6.25,
            min_distance_sqrd: 0.7225,
        }
    }
}

impl InteractionKernel for MonatomicForces {
    fn accumulate_interactions(&self, data: &mut MoleculeDataSet, env: &ForceEnvironment) {
        let n = data.number_of_molecules();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = data.center_of_mass_positions[i];
                let b = data.center_of_mass_positions[j];
                if (a - b).norm_squared() >= self.interaction_distance_sqrd {
                    continue;
                }
                let fij = lennard_jones_force(a, b, self.min_distance_sqrd, env.scaled_epsilon, 1.0);
                data.next_forces[i] += fij;
                data.next_forces[j] -= fij;
            }
        }
    }
}
