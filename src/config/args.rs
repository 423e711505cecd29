//! Command-line argument parsing for headless runs

use clap::Parser;

use super::SimulationConfig;
use crate::substance::{PhaseState, Substance};

/// Headless states-of-matter simulation driven by a YAML scenario
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file (default: built-in defaults)
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override substance (neon, argon, diatomic_oxygen, water, adjustable_atom)
    #[arg(long)]
    pub substance: Option<Substance>,

    /// Override initial phase (solid, liquid, gas)
    #[arg(long)]
    pub phase: Option<PhaseState>,

    /// Override molecule count
    #[arg(long)]
    pub molecule_count: Option<usize>,

    /// Override random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override number of frames to run
    #[arg(long)]
    pub frames: Option<usize>,

    /// Override frames between status reports
    #[arg(long)]
    pub report_interval: Option<usize>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Also write every status report as YAML to this path
    #[arg(long)]
    pub report_file: Option<String>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    pub dump_config: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(substance) = self.substance {
            config.model.substance = substance;
        }
        if let Some(phase) = self.phase {
            config.model.initial_phase = phase;
        }
        if let Some(count) = self.molecule_count {
            config.model.molecule_count = Some(count);
        }
        if let Some(seed) = self.seed {
            config.model.seed = Some(seed);
        }
        if let Some(frames) = self.frames {
            config.scenario.frames = frames;
        }
        if let Some(interval) = self.report_interval {
            config.scenario.report_interval = interval;
        }
    }
}
