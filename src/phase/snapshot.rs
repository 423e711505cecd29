//! Curated liquid arrangements, one per molecule kind.
//!
//! A convincing liquid is hard to produce from a lattice in a handful of
//! substeps, so each kind ships a pre-equilibrated arrangement as a YAML asset.
//! Horizontal positions are stored relative to the container center and
//! vertical positions from the floor, in particle diameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::substance::MoleculeKind;

pub const SNAPSHOT_VERSION: u32 = 1;

const MONATOMIC_LIQUID: &str = include_str!("../../assets/liquid/monatomic.yaml");
const DIATOMIC_LIQUID: &str = include_str!("../../assets/liquid/diatomic.yaml");
const WATER_LIQUID: &str = include_str!("../../assets/liquid/water.yaml");

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to parse liquid snapshot: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("unsupported liquid snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("liquid snapshot is for {found:?} molecules, expected {expected:?}")]
    WrongKind {
        found: MoleculeKind,
        expected: MoleculeKind,
    },
    #[error("liquid snapshot holds {found} molecules, expected {expected}")]
    CountMismatch { found: usize, expected: usize },
    #[error("liquid snapshot molecule {index} has a non-finite value")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMolecule {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub rotation_rate: f64,
}

impl SnapshotMolecule {
    fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.velocity.iter())
            .chain([self.angle, self.rotation_rate].iter())
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidSnapshot {
    pub version: u32,
    pub kind: MoleculeKind,
    pub molecules: Vec<SnapshotMolecule>,
}

impl LiquidSnapshot {
    /// Parse a snapshot and check it against `expected`.
    pub fn parse(source: &str, expected: MoleculeKind) -> Result<Self, SnapshotError> {
        let snapshot: LiquidSnapshot = serde_yml::from_str(source)?;
        snapshot.validate(expected)?;
        Ok(snapshot)
    }

    pub fn validate(&self, expected: MoleculeKind) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        if self.kind != expected {
            return Err(SnapshotError::WrongKind {
                found: self.kind,
                expected,
            });
        }
        let count = expected.standard_molecule_count();
        if self.molecules.len() != count {
            return Err(SnapshotError::CountMismatch {
                found: self.molecules.len(),
                expected: count,
            });
        }
        if let Some(index) = self.molecules.iter().position(|m| !m.is_finite()) {
            return Err(SnapshotError::NonFinite { index });
        }
        Ok(())
    }

    /// The embedded arrangement for `kind`.
    pub fn embedded(kind: MoleculeKind) -> Result<Self, SnapshotError> {
        let source = match kind {
            MoleculeKind::Monatomic => MONATOMIC_LIQUID,
            MoleculeKind::Diatomic => DIATOMIC_LIQUID,
            MoleculeKind::Water => WATER_LIQUID,
        };
        Self::parse(source, kind)
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }
}

/// All embedded snapshots, parsed and validated once.
#[derive(Debug, Clone)]
pub struct LiquidSnapshots {
    monatomic: LiquidSnapshot,
    diatomic: LiquidSnapshot,
    water: LiquidSnapshot,
}

impl LiquidSnapshots {
    pub fn load() -> Result<Self, SnapshotError> {
        Ok(Self {
            monatomic: LiquidSnapshot::embedded(MoleculeKind::Monatomic)?,
            diatomic: LiquidSnapshot::embedded(MoleculeKind::Diatomic)?,
            water: LiquidSnapshot::embedded(MoleculeKind::Water)?,
        })
    }

    pub fn get(&self, kind: MoleculeKind) -> &LiquidSnapshot {
        match kind {
            MoleculeKind::Monatomic => &self.monatomic,
            MoleculeKind::Diatomic => &self.diatomic,
            MoleculeKind::Water => &self.water,
        }
    }
}
