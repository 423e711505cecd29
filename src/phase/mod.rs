//! Phase-state changers: overwrite the kinematic state of every molecule so
//! that the system starts out as a solid, a liquid or a gas.
//!
//! The shared placement code lives here; each species only contributes a
//! [`PhaseLayout`] describing its lattice and relaxation.

pub mod diatomic;
pub mod monatomic;
pub mod snapshot;
pub mod water;

#[cfg(test)]
mod tests;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::TAU;

use crate::constants::{
    GAS_TEMPERATURE, LIQUID_TEMPERATURE, POST_PHASE_CHANGE_SUBSTEPS, SOLID_TEMPERATURE,
    WALL_DISTANCE_THRESHOLD,
};
use crate::dataset::MoleculeDataSet;
use crate::model::container::ContainerBounds;
use crate::substance::{MoleculeKind, PhaseState};

pub use diatomic::DiatomicPhaseStateChanger;
pub use monatomic::MonatomicPhaseStateChanger;
pub use snapshot::{LiquidSnapshot, LiquidSnapshots, SnapshotError, SnapshotMolecule};
pub use water::WaterPhaseStateChanger;

/// Species-specific parameters of the solid lattice.
pub trait PhaseLayout {
    fn kind(&self) -> MoleculeKind;

    /// Distance between neighboring lattice sites.
    fn lattice_spacing(&self) -> f64;

    /// Substeps run after forming the crystal so it settles before display.
    fn solid_relaxation_substeps(&self) -> usize;

    /// Orientation of the molecule sitting at lattice site (`column`, `row`).
    fn crystal_angle(&self, _column: usize, _row: usize) -> f64 {
        0.0
    }
}

/// What the orchestrator has to do after the molecules have been placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub temperature_set_point: f64,
    pub relaxation_substeps: usize,
}

/// Everything a phase change reads or overwrites.
pub struct PhaseContext<'a> {
    pub data: &'a mut MoleculeDataSet,
    pub bounds: ContainerBounds,
    pub snapshots: &'a LiquidSnapshots,
    pub rng: &'a mut StdRng,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStateChanger {
    Monatomic(MonatomicPhaseStateChanger),
    Diatomic(DiatomicPhaseStateChanger),
    Water(WaterPhaseStateChanger),
}

impl PhaseStateChanger {
    pub fn for_kind(kind: MoleculeKind) -> Self {
        match kind {
            MoleculeKind::Monatomic => PhaseStateChanger::Monatomic(MonatomicPhaseStateChanger),
            MoleculeKind::Diatomic => PhaseStateChanger::Diatomic(DiatomicPhaseStateChanger),
            MoleculeKind::Water => PhaseStateChanger::Water(WaterPhaseStateChanger),
        }
    }

    pub fn layout(&self) -> &dyn PhaseLayout {
        match self {
            PhaseStateChanger::Monatomic(c) => c,
            PhaseStateChanger::Diatomic(c) => c,
            PhaseStateChanger::Water(c) => c,
        }
    }

    /// Rearrange the molecules in `ctx` into `phase`. The molecule count is
    /// never changed. Atom positions are left for the caller to resync.
    ///
    /// # Panics
    ///
    /// Panics if the data set belongs to another kind, or if a liquid is
    /// requested with other than the standard molecule count.
    pub fn set_phase(&self, ctx: PhaseContext<'_>, phase: PhaseState) -> PhaseChange {
        let layout = self.layout();
        assert_eq!(
            ctx.data.kind(),
            layout.kind(),
            "phase changer used with a data set of another molecule kind"
        );

        match phase {
            PhaseState::Solid => {
                form_crystal(layout, ctx.data, &ctx.bounds);
                PhaseChange {
                    temperature_set_point: SOLID_TEMPERATURE,
                    relaxation_substeps: layout.solid_relaxation_substeps(),
                }
            }
            PhaseState::Liquid => {
                load_liquid(ctx.snapshots.get(layout.kind()), ctx.data, &ctx.bounds);
                PhaseChange {
                    temperature_set_point: LIQUID_TEMPERATURE,
                    relaxation_substeps: POST_PHASE_CHANGE_SUBSTEPS,
                }
            }
            PhaseState::Gas => {
                disperse_gas(ctx.data, &ctx.bounds, GAS_TEMPERATURE, ctx.rng);
                PhaseChange {
                    temperature_set_point: GAS_TEMPERATURE,
                    relaxation_substeps: POST_PHASE_CHANGE_SUBSTEPS,
                }
            }
        }
    }
}

fn clear_dynamics(data: &mut MoleculeDataSet) {
    for f in data.forces.iter_mut().chain(data.next_forces.iter_mut()) {
        *f = Vector2::zeros();
    }
    for t in data.torques.iter_mut().chain(data.next_torques.iter_mut()) {
        *t = 0.0;
    }
    for inside in data.inside_container.iter_mut() {
        *inside = true;
    }
}

/// Square lattice, `ceil(sqrt(N))` sites per row, centered horizontally with
/// the first row one spacing above the floor. Everything starts at rest.
pub fn form_crystal(layout: &dyn PhaseLayout, data: &mut MoleculeDataSet, bounds: &ContainerBounds) {
    let n = data.number_of_molecules();
    if n == 0 {
        return;
    }
    let spacing = layout.lattice_spacing();
    let per_row = (n as f64).sqrt().ceil() as usize;
    let x0 = bounds.width / 2.0 - (per_row - 1) as f64 * spacing / 2.0;

    for i in 0..n {
        let (row, column) = (i / per_row, i % per_row);
        data.center_of_mass_positions[i] =
            Vector2::new(x0 + column as f64 * spacing, spacing + row as f64 * spacing);
        data.velocities[i] = Vector2::zeros();
        data.rotation_angles[i] = layout.crystal_angle(column, row);
        data.rotation_rates[i] = 0.0;
    }
    clear_dynamics(data);
}

/// Copy a curated arrangement into the data set.
///
/// # Panics
///
/// Panics when the molecule count differs from the snapshot.
pub fn load_liquid(snapshot: &LiquidSnapshot, data: &mut MoleculeDataSet, bounds: &ContainerBounds) {
    assert_eq!(
        data.number_of_molecules(),
        snapshot.len(),
        "liquid phase needs exactly the standard molecule count"
    );
    let center_x = bounds.width / 2.0;
    for (i, molecule) in snapshot.molecules.iter().enumerate() {
        data.center_of_mass_positions[i] =
            Vector2::new(center_x + molecule.position[0], molecule.position[1]);
        data.velocities[i] = Vector2::new(molecule.velocity[0], molecule.velocity[1]);
        data.rotation_angles[i] = molecule.angle;
        data.rotation_rates[i] = if data.has_rotation() {
            molecule.rotation_rate
        } else {
            0.0
        };
    }
    clear_dynamics(data);
}

/// Scatter molecules over a jittered grid filling the container, moving in
/// random directions at the speed matching `temperature`.
pub fn disperse_gas(
    data: &mut MoleculeDataSet,
    bounds: &ContainerBounds,
    temperature: f64,
    rng: &mut StdRng,
) {
    let n = data.number_of_molecules();
    if n == 0 {
        return;
    }
    let margin = WALL_DISTANCE_THRESHOLD;
    let usable_width = (bounds.width - 2.0 * margin).max(margin);
    let usable_height = (bounds.height - 2.0 * margin).max(margin);

    let columns = ((n as f64 * usable_width / usable_height).sqrt().ceil() as usize).clamp(1, n);
    let rows = n.div_ceil(columns);
    let cell_width = usable_width / columns as f64;
    let cell_height = usable_height / rows as f64;
    let jitter = 0.25 * cell_width.min(cell_height);

    let speed = (2.0 * temperature / data.molecule_mass()).sqrt();
    let rotation_speed = if data.has_rotation() {
        (temperature / data.moment_of_inertia()).sqrt()
    } else {
        0.0
    };

    for i in 0..n {
        let (row, column) = (i / columns, i % columns);
        let x = margin + (column as f64 + 0.5) * cell_width + rng.gen_range(-1.0..=1.0) * jitter;
        let y = margin + (row as f64 + 0.5) * cell_height + rng.gen_range(-1.0..=1.0) * jitter;
        let direction = rng.gen::<f64>() * TAU;

        data.center_of_mass_positions[i] = Vector2::new(x, y);
        data.velocities[i] = Vector2::new(direction.cos(), direction.sin()) * speed;
        data.rotation_angles[i] = rng.gen::<f64>() * TAU;
        data.rotation_rates[i] = if rng.gen_bool(0.5) {
            rotation_speed
        } else {
            -rotation_speed
        };
    }
    clear_dynamics(data);
}
