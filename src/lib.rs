//! Two-dimensional molecular dynamics of simple substances changing between
//! solid, liquid and gas.
//!
//! [`model::MultipleParticleModel`] is the entry point: it owns the molecule
//! data set and drives the per-species force kernels, thermostats and phase
//! initializers one frame at a time.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod io;
pub mod model;
pub mod phase;
pub mod position_updater;
pub mod substance;
pub mod thermostat;
pub mod verlet;

pub use config::SimulationConfig;
pub use dataset::{DataSetError, MoleculeDataSet};
pub use model::MultipleParticleModel;
pub use substance::{MoleculeKind, PhaseState, Substance};
