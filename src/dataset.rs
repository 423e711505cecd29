//! Per-molecule and per-atom kinematic state shared by every strategy.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::substance::MoleculeKind;

#[derive(Debug, Error, PartialEq)]
pub enum DataSetError {
    #[error("data set is full ({capacity} molecules)")]
    CapacityExceeded { capacity: usize },
}

/// Parallel arrays describing every molecule and its atoms.
///
/// Atom `k` of molecule `i` lives at `atom_positions[i * atoms_per_molecule + k]`.
/// Strategies get this by reference for the duration of one call only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoleculeDataSet {
    kind: MoleculeKind,
    capacity: usize,
    molecule_mass: f64,
    moment_of_inertia: f64,
    pub center_of_mass_positions: Vec<Vector2<f64>>,
    pub velocities: Vec<Vector2<f64>>,
    pub forces: Vec<Vector2<f64>>,
    pub next_forces: Vec<Vector2<f64>>,
    pub rotation_angles: Vec<f64>,
    pub rotation_rates: Vec<f64>,
    pub torques: Vec<f64>,
    pub next_torques: Vec<f64>,
    pub inside_container: Vec<bool>,
    pub atom_positions: Vec<Vector2<f64>>,
}

impl MoleculeDataSet {
    pub fn new(kind: MoleculeKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            molecule_mass: kind.molecule_mass(),
            moment_of_inertia: kind.moment_of_inertia(),
            center_of_mass_positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            forces: Vec::with_capacity(capacity),
            next_forces: Vec::with_capacity(capacity),
            rotation_angles: Vec::with_capacity(capacity),
            rotation_rates: Vec::with_capacity(capacity),
            torques: Vec::with_capacity(capacity),
            next_torques: Vec::with_capacity(capacity),
            inside_container: Vec::with_capacity(capacity),
            atom_positions: Vec::with_capacity(capacity * kind.atoms_per_molecule()),
        }
    }

    pub fn kind(&self) -> MoleculeKind {
        self.kind
    }

    pub fn atoms_per_molecule(&self) -> usize {
        self.kind.atoms_per_molecule()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn number_of_molecules(&self) -> usize {
        self.center_of_mass_positions.len()
    }

    pub fn number_of_atoms(&self) -> usize {
        self.atom_positions.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.number_of_molecules()
    }

    pub fn is_empty(&self) -> bool {
        self.center_of_mass_positions.is_empty()
    }

    pub fn molecule_mass(&self) -> f64 {
        self.molecule_mass
    }

    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }

    pub fn has_rotation(&self) -> bool {
        self.kind.has_rotation()
    }

    /// Atom positions belonging to molecule `index`.
    pub fn molecule_atoms(&self, index: usize) -> &[Vector2<f64>] {
        let n = self.atoms_per_molecule();
        &self.atom_positions[index * n..(index + 1) * n]
    }

    /// Append a molecule. Forces and torques start at zero.
    pub fn add_molecule(
        &mut self,
        atom_positions: &[Vector2<f64>],
        center_of_mass: Vector2<f64>,
        velocity: Vector2<f64>,
        rotation_rate: f64,
        inside_container: bool,
    ) -> Result<(), DataSetError> {
        assert_eq!(
            atom_positions.len(),
            self.atoms_per_molecule(),
            "molecule supplied with the wrong number of atoms"
        );
        if self.remaining_capacity() == 0 {
            return Err(DataSetError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.center_of_mass_positions.push(center_of_mass);
        self.velocities.push(velocity);
        self.forces.push(Vector2::zeros());
        self.next_forces.push(Vector2::zeros());
        self.rotation_angles.push(0.0);
        self.rotation_rates.push(rotation_rate);
        self.torques.push(0.0);
        self.next_torques.push(0.0);
        self.inside_container.push(inside_container);
        self.atom_positions.extend_from_slice(atom_positions);
        Ok(())
    }

    /// Remove a molecule by moving the last one into its slot.
    pub fn remove_molecule(&mut self, index: usize) {
        let last = self.number_of_molecules() - 1;
        let n = self.atoms_per_molecule();

        self.center_of_mass_positions.swap_remove(index);
        self.velocities.swap_remove(index);
        self.forces.swap_remove(index);
        self.next_forces.swap_remove(index);
        self.rotation_angles.swap_remove(index);
        self.rotation_rates.swap_remove(index);
        self.torques.swap_remove(index);
        self.next_torques.swap_remove(index);
        self.inside_container.swap_remove(index);

        if index != last {
            for k in 0..n {
                self.atom_positions[index * n + k] = self.atom_positions[last * n + k];
            }
        }
        self.atom_positions.truncate(last * n);
    }

    pub fn clear(&mut self) {
        self.center_of_mass_positions.clear();
        self.velocities.clear();
        self.forces.clear();
        self.next_forces.clear();
        self.rotation_angles.clear();
        self.rotation_rates.clear();
        self.torques.clear();
        self.next_torques.clear();
        self.inside_container.clear();
        self.atom_positions.clear();
    }

    /// Translational plus rotational kinetic energy of molecule `index`.
    pub fn kinetic_energy_of(&self, index: usize) -> f64 {
        let v = self.velocities[index];
        let mut energy = 0.5 * self.molecule_mass * v.norm_squared();
        if self.has_rotation() {
            let w = self.rotation_rates[index];
            energy += 0.5 * self.moment_of_inertia * w * w;
        }
        energy
    }

    #[inline]
    pub fn total_kinetic_energy(&self) -> f64 {
        (0..self.number_of_molecules())
            .map(|i| self.kinetic_energy_of(i))
            .sum()
    }

    /// Temperature implied by the current kinetic energy, zero when empty.
    pub fn temperature_from_kinetic_energy(&self) -> f64 {
        let n = self.number_of_molecules();
        if n == 0 {
            return 0.0;
        }
        self.total_kinetic_energy() / (n as f64 * self.kind.degrees_of_freedom() / 2.0)
    }

    pub fn check_invariants(&self) -> bool {
        let n = self.number_of_molecules();
        self.atom_positions.len() == n * self.atoms_per_molecule()
            && self.velocities.len() == n
            && self.forces.len() == n
            && self.next_forces.len() == n
            && self.rotation_angles.len() == n
            && self.rotation_rates.len() == n
            && self.torques.len() == n
            && self.next_torques.len() == n
            && self.inside_container.len() == n
    }
}
