use crate::phase::PhaseLayout;
use crate::substance::MoleculeKind;

/// Lattice spacing at the bottom of the Lennard-Jones well.
pub const MONATOMIC_LATTICE_SPACING: f64 = 1.12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonatomicPhaseStateChanger;

impl PhaseLayout for MonatomicPhaseStateChanger {
    fn kind(&self) -> MoleculeKind {
        MoleculeKind::Monatomic
    }

    fn lattice_spacing(&self) -> f64 {
        MONATOMIC_LATTICE_SPACING
    }

    fn solid_relaxation_substeps(&self) -> usize {
        0
    }
}
