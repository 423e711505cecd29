use std::f64::consts::PI;

use crate::phase::PhaseLayout;
use crate::substance::MoleculeKind;

pub const WATER_LATTICE_SPACING: f64 = 1.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaterPhaseStateChanger;

impl PhaseLayout for WaterPhaseStateChanger {
    fn kind(&self) -> MoleculeKind {
        MoleculeKind::Water
    }

    fn lattice_spacing(&self) -> f64 {
        WATER_LATTICE_SPACING
    }

    fn solid_relaxation_substeps(&self) -> usize {
        10
    }

    /// Neighbors face opposite ways so hydrogens point at oxygens.
    fn crystal_angle(&self, column: usize, row: usize) -> f64 {
        if (column + row) % 2 == 0 {
            0.0
        } else {
            PI
        }
    }
}
