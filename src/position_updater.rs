//! Recomputes absolute atom positions from molecule centers and rotations.

use nalgebra::{Rotation2, Vector2};

use crate::constants::ESCAPE_MARGIN;
use crate::dataset::MoleculeDataSet;
use crate::model::container::ContainerBounds;
use crate::substance::MoleculeKind;

#[derive(Debug, Clone, PartialEq)]
pub enum AtomPositionUpdater {
    Monatomic { offsets: [Vector2<f64>; 1] },
    Diatomic { offsets: [Vector2<f64>; 2] },
    Water { offsets: [Vector2<f64>; 3] },
}

impl AtomPositionUpdater {
    pub fn for_kind(kind: MoleculeKind) -> Self {
        let offsets = kind.atom_offsets();
        match kind {
            MoleculeKind::Monatomic => AtomPositionUpdater::Monatomic {
                offsets: [offsets[0]],
            },
            MoleculeKind::Diatomic => AtomPositionUpdater::Diatomic {
                offsets: [offsets[0], offsets[1]],
            },
            MoleculeKind::Water => AtomPositionUpdater::Water {
                offsets: [offsets[0], offsets[1], offsets[2]],
            },
        }
    }

    pub fn offsets(&self) -> &[Vector2<f64>] {
        match self {
            AtomPositionUpdater::Monatomic { offsets } => offsets,
            AtomPositionUpdater::Diatomic { offsets } => offsets,
            AtomPositionUpdater::Water { offsets } => offsets,
        }
    }

    /// Absolute atom positions of a molecule at `center` rotated by `angle`.
    pub fn atoms_for(&self, center: Vector2<f64>, angle: f64) -> Vec<Vector2<f64>> {
        let rotation = Rotation2::new(angle);
        self.offsets().iter().map(|o| center + rotation * o).collect()
    }

    pub fn update_atom_positions(&self, data: &mut MoleculeDataSet, bounds: &ContainerBounds) {
        match self {
            AtomPositionUpdater::Monatomic { .. } => {
                for i in 0..data.number_of_molecules() {
                    data.atom_positions[i] = data.center_of_mass_positions[i];
                }
            }
            AtomPositionUpdater::Diatomic { offsets } => {
                update_rigid(data, offsets);
                clamp_diatomic_pairs(data, bounds);
            }
            AtomPositionUpdater::Water { offsets } => update_rigid(data, offsets),
        }
    }
}

fn update_rigid(data: &mut MoleculeDataSet, offsets: &[Vector2<f64>]) {
    let n = offsets.len();
    for i in 0..data.number_of_molecules() {
        let rotation = Rotation2::new(data.rotation_angles[i]);
        let center = data.center_of_mass_positions[i];
        for (k, offset) in offsets.iter().enumerate() {
            data.atom_positions[i * n + k] = center + rotation * offset;
        }
    }
}

/// Shift each contained pair back inside the walls, and release molecules
/// that have risen clear of the top.
fn clamp_diatomic_pairs(data: &mut MoleculeDataSet, bounds: &ContainerBounds) {
    for i in 0..data.number_of_molecules() {
        if !data.inside_container[i] {
            continue;
        }
        if data.center_of_mass_positions[i].y > bounds.height + ESCAPE_MARGIN {
            data.inside_container[i] = false;
            continue;
        }

        let (a, b) = (data.atom_positions[2 * i], data.atom_positions[2 * i + 1]);
        let min_x = a.x.min(b.x);
        let max_x = a.x.max(b.x);
        let min_y = a.y.min(b.y);
        let max_y = a.y.max(b.y);

        let mut shift = Vector2::zeros();
        if min_x < 0.0 {
            shift.x = -min_x;
        } else if max_x > bounds.width {
            shift.x = bounds.width - max_x;
        }
        if min_y < 0.0 {
            shift.y = -min_y;
        } else if !bounds.exploded && max_y > bounds.height {
            shift.y = bounds.height - max_y;
        }

        data.atom_positions[2 * i] += shift;
        data.atom_positions[2 * i + 1] += shift;
    }
}
