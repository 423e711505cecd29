//! Substances, the molecule shapes they map onto, and unit conversions.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::*;

/// The substances the engine knows how to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substance {
    Neon,
    Argon,
    DiatomicOxygen,
    Water,
    AdjustableAtom,
}

/// Molecule geometry shared by one or more substances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeKind {
    Monatomic,
    Diatomic,
    Water,
}

/// Requested phase for the scripted initializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    Solid,
    Liquid,
    Gas,
}

pub const DIATOMIC_BOND_LENGTH: f64 = 0.9;

const WATER_OH_DISTANCE: f64 = 0.32;
const WATER_HOH_ANGLE_DEGREES: f64 = 104.5;
const OXYGEN_TO_HYDROGEN_MASS_RATIO: f64 = 16.0;
const WATER_MOLECULE_MASS: f64 = 1.5;

// Particle radii in picometers.
const NEON_RADIUS: f64 = 154.0;
const ARGON_RADIUS: f64 = 181.0;
const OXYGEN_RADIUS: f64 = 162.0;

/// Triple and critical points, in model units and in Kelvin.
#[derive(Debug, Clone, Copy)]
struct PhasePoints {
    model_triple: f64,
    model_critical: f64,
    kelvin_triple: f64,
    kelvin_critical: f64,
}

impl PhasePoints {
    fn to_kelvin(&self, model_temperature: f64) -> f64 {
        let slope =
            (self.kelvin_critical - self.kelvin_triple) / (self.model_critical - self.model_triple);
        if model_temperature < self.model_triple {
            model_temperature * self.kelvin_triple / self.model_triple
        } else if model_temperature < self.model_critical {
            self.kelvin_triple + (model_temperature - self.model_triple) * slope
        } else {
            self.kelvin_critical + (model_temperature - self.model_critical) * slope
        }
    }
}

const MONATOMIC_MODEL_TRIPLE: f64 = 0.26;
const MONATOMIC_MODEL_CRITICAL: f64 = 0.8;

const NEON_POINTS: PhasePoints = PhasePoints {
    model_triple: MONATOMIC_MODEL_TRIPLE,
    model_critical: MONATOMIC_MODEL_CRITICAL,
    kelvin_triple: 24.57,
    kelvin_critical: 44.49,
};

const ARGON_POINTS: PhasePoints = PhasePoints {
    model_triple: MONATOMIC_MODEL_TRIPLE,
    model_critical: MONATOMIC_MODEL_CRITICAL,
    kelvin_triple: 83.8058,
    kelvin_critical: 150.69,
};

const OXYGEN_POINTS: PhasePoints = PhasePoints {
    model_triple: 0.27,
    model_critical: 0.85,
    kelvin_triple: 54.36,
    kelvin_critical: 154.58,
};

const WATER_POINTS: PhasePoints = PhasePoints {
    model_triple: 0.28,
    model_critical: 1.25,
    kelvin_triple: 273.16,
    kelvin_critical: 647.1,
};

impl Substance {
    pub const ALL: [Substance; 5] = [
        Substance::Neon,
        Substance::Argon,
        Substance::DiatomicOxygen,
        Substance::Water,
        Substance::AdjustableAtom,
    ];

    pub fn molecule_kind(self) -> MoleculeKind {
        match self {
            Substance::Neon | Substance::Argon | Substance::AdjustableAtom => {
                MoleculeKind::Monatomic
            }
            Substance::DiatomicOxygen => MoleculeKind::Diatomic,
            Substance::Water => MoleculeKind::Water,
        }
    }

    pub fn atoms_per_molecule(self) -> usize {
        self.molecule_kind().atoms_per_molecule()
    }

    /// Particle diameter in picometers; the adjustable atom uses its sigma.
    pub fn particle_diameter(self, adjustable_sigma: f64) -> f64 {
        match self {
            Substance::Neon => NEON_RADIUS * 2.0,
            Substance::Argon => ARGON_RADIUS * 2.0,
            Substance::DiatomicOxygen | Substance::Water => OXYGEN_RADIUS * 2.0,
            Substance::AdjustableAtom => adjustable_sigma,
        }
    }

    /// Map a model temperature to Kelvin.
    ///
    /// Piecewise linear through the substance's triple and critical points.
    /// The adjustable atom follows the argon curve scaled by its well depth
    /// relative to the default one.
    pub fn model_temperature_to_kelvin(self, model_temperature: f64, adjustable_epsilon: f64) -> f64 {
        match self {
            Substance::Neon => NEON_POINTS.to_kelvin(model_temperature),
            Substance::Argon => ARGON_POINTS.to_kelvin(model_temperature),
            Substance::DiatomicOxygen => OXYGEN_POINTS.to_kelvin(model_temperature),
            Substance::Water => WATER_POINTS.to_kelvin(model_temperature),
            Substance::AdjustableAtom => {
                ARGON_POINTS.to_kelvin(model_temperature) * adjustable_epsilon / DEFAULT_EPSILON
            }
        }
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Substance::Neon => "neon",
            Substance::Argon => "argon",
            Substance::DiatomicOxygen => "diatomic oxygen",
            Substance::Water => "water",
            Substance::AdjustableAtom => "adjustable atom",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Substance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "neon" => Ok(Substance::Neon),
            "argon" => Ok(Substance::Argon),
            "diatomic_oxygen" | "oxygen" => Ok(Substance::DiatomicOxygen),
            "water" => Ok(Substance::Water),
            "adjustable_atom" | "adjustable" => Ok(Substance::AdjustableAtom),
            other => Err(format!("unknown substance: {}", other)),
        }
    }
}

impl FromStr for PhaseState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solid" => Ok(PhaseState::Solid),
            "liquid" => Ok(PhaseState::Liquid),
            "gas" => Ok(PhaseState::Gas),
            other => Err(format!("unknown phase: {}", other)),
        }
    }
}

impl MoleculeKind {
    pub fn atoms_per_molecule(self) -> usize {
        match self {
            MoleculeKind::Monatomic => 1,
            MoleculeKind::Diatomic => 2,
            MoleculeKind::Water => 3,
        }
    }

    pub fn has_rotation(self) -> bool {
        !matches!(self, MoleculeKind::Monatomic)
    }

    pub fn molecule_mass(self) -> f64 {
        match self {
            MoleculeKind::Monatomic | MoleculeKind::Diatomic => 1.0,
            MoleculeKind::Water => WATER_MOLECULE_MASS,
        }
    }

    /// Rotational inertia about the center of mass; zero for single atoms.
    pub fn moment_of_inertia(self) -> f64 {
        match self {
            MoleculeKind::Monatomic => 0.0,
            MoleculeKind::Diatomic => {
                let half = DIATOMIC_BOND_LENGTH / 2.0;
                self.molecule_mass() * half * half
            }
            // A uniform disc one particle diameter across.
            MoleculeKind::Water => 0.5 * self.molecule_mass() * 0.5 * 0.5,
        }
    }

    /// Atom positions relative to the center of mass at rotation angle zero.
    pub fn atom_offsets(self) -> Vec<Vector2<f64>> {
        match self {
            MoleculeKind::Monatomic => vec![Vector2::zeros()],
            MoleculeKind::Diatomic => {
                let half = DIATOMIC_BOND_LENGTH / 2.0;
                vec![Vector2::new(-half, 0.0), Vector2::new(half, 0.0)]
            }
            MoleculeKind::Water => water_atom_offsets().to_vec(),
        }
    }

    /// Number of molecules in the curated liquid snapshot for this kind.
    pub fn standard_molecule_count(self) -> usize {
        match self {
            MoleculeKind::Monatomic => 100,
            MoleculeKind::Diatomic => 64,
            MoleculeKind::Water => 64,
        }
    }

    pub fn max_molecules(self) -> usize {
        MAX_NUM_ATOMS / self.atoms_per_molecule()
    }

    /// Translational plus rotational degrees of freedom per molecule.
    pub fn degrees_of_freedom(self) -> f64 {
        if self.has_rotation() {
            3.0
        } else {
            2.0
        }
    }
}

fn water_atom_masses() -> [f64; 3] {
    let unit = WATER_MOLECULE_MASS / (OXYGEN_TO_HYDROGEN_MASS_RATIO + 2.0);
    [OXYGEN_TO_HYDROGEN_MASS_RATIO * unit, unit, unit]
}

/// Oxygen first, then the two hydrogens, shifted so the mass-weighted center
/// sits at the origin.
fn water_atom_offsets() -> [Vector2<f64>; 3] {
    let half_angle = (WATER_HOH_ANGLE_DEGREES / 2.0).to_radians();
    let raw = [
        Vector2::new(0.0, 0.0),
        Vector2::new(
            WATER_OH_DISTANCE * half_angle.cos(),
            WATER_OH_DISTANCE * half_angle.sin(),
        ),
        Vector2::new(
            WATER_OH_DISTANCE * half_angle.cos(),
            -WATER_OH_DISTANCE * half_angle.sin(),
        ),
    ];
    let masses = water_atom_masses();
    let total: f64 = masses.iter().sum();
    let center = raw
        .iter()
        .zip(masses.iter())
        .fold(Vector2::zeros(), |acc, (r, m)| acc + r * *m)
        / total;
    [raw[0] - center, raw[1] - center, raw[2] - center]
}

/// Phase implied by a temperature set point, split at the midpoints between
/// the scripted phase temperatures.
pub fn phase_for_temperature(temperature: f64) -> PhaseState {
    if temperature < SOLID_TEMPERATURE + (LIQUID_TEMPERATURE - SOLID_TEMPERATURE) / 2.0 {
        PhaseState::Solid
    } else if temperature < LIQUID_TEMPERATURE + (GAS_TEMPERATURE - LIQUID_TEMPERATURE) / 2.0 {
        PhaseState::Liquid
    } else {
        PhaseState::Gas
    }
}
