use std::f64::consts::FRAC_PI_4;

use crate::phase::PhaseLayout;
use crate::substance::MoleculeKind;

pub const DIATOMIC_LATTICE_SPACING: f64 = 1.5;

/// Molecules sit on the lattice diagonals so that atoms of neighboring sites
/// stay about one diameter apart.
pub const DIATOMIC_CRYSTAL_ANGLE: f64 = FRAC_PI_4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiatomicPhaseStateChanger;

impl PhaseLayout for DiatomicPhaseStateChanger {
    fn kind(&self) -> MoleculeKind {
        MoleculeKind::Diatomic
    }

    fn lattice_spacing(&self) -> f64 {
        DIATOMIC_LATTICE_SPACING
    }

    fn solid_relaxation_substeps(&self) -> usize {
        5
    }

    fn crystal_angle(&self, _column: usize, _row: usize) -> f64 {
        DIATOMIC_CRYSTAL_ANGLE
    }
}
