//! Output formatting and logging utilities

use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::fmt::{format::Writer, layer, time::FormatTime, writer::BoxMakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::model::MultipleParticleModel;
use crate::substance::{phase_for_temperature, PhaseState, Substance};

/// Log timestamps as seconds of wall-clock time since the run started.
struct RunClock {
    started: Instant,
}

impl FormatTime for RunClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "[{:>9.3}s]", self.started.elapsed().as_secs_f64())
    }
}

/// Install the global subscriber. Log lines go to `log_path` when one is
/// given and to stdout otherwise; colors are only used on the terminal.
pub fn setup_output(log_path: Option<&String>) -> Result<()> {
    let (writer, ansi) = match log_path {
        Some(path) => {
            let file = File::create(path).wrap_err_with(|| format!("Unable to create log file: {}", path))?;
            (BoxMakeWriter::new(file), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };
    let events = layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(RunClock { started: Instant::now() });
    Registry::default().with(events).try_init()?;
    if let Some(path) = log_path {
        info!("Logging to: {}", path);
    }
    Ok(())
}

/// Observable state of the model at one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub frame: usize,
    pub substance: Substance,
    /// Phase implied by the temperature set point
    pub phase: PhaseState,
    pub temperature_set_point: f64,
    pub measured_temperature: f64,
    pub temperature_in_kelvin: Option<f64>,
    pub pressure: f64,
    pub pressure_in_atmospheres: f64,
    pub molecule_count: usize,
    /// Picometers
    pub container_height: f64,
    pub exploded: bool,
}

impl StatusReport {
    pub fn capture(frame: usize, model: &MultipleParticleModel) -> Self {
        Self {
            frame,
            substance: model.substance(),
            phase: phase_for_temperature(model.temperature_set_point()),
            temperature_set_point: model.temperature_set_point(),
            measured_temperature: model.measured_temperature(),
            temperature_in_kelvin: model.temperature_in_kelvin(),
            pressure: model.pressure(),
            pressure_in_atmospheres: model.pressure_in_atmospheres(),
            molecule_count: model.molecule_count(),
            container_height: model.container_height(),
            exploded: model.is_exploded(),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kelvin = match self.temperature_in_kelvin {
            Some(k) => format!("{:.1} K", k),
            None => "n/a".to_string(),
        };
        write!(
            f,
            "frame {:>6} | {} ({:?}) | T set {:.4} meas {:.4} ({}) | P {:.4} ({:.2} atm) | N {} | H {:.0} pm{}",
            self.frame,
            self.substance,
            self.phase,
            self.temperature_set_point,
            self.measured_temperature,
            kelvin,
            self.pressure,
            self.pressure_in_atmospheres,
            self.molecule_count,
            self.container_height,
            if self.exploded { " | EXPLODED" } else { "" }
        )
    }
}

/// Print collected reports as a fixed-width table
pub fn write_status_table<W: Write>(writer: &mut W, reports: &[StatusReport]) -> Result<()> {
    writeln!(
        writer,
        "{:>7} {:>10} {:>10} {:>10} {:>10} {:>6} {:>9} {:>8}",
        "frame", "T_set", "T_meas", "kelvin", "atm", "N", "height", "exploded"
    )?;
    for r in reports {
        writeln!(
            writer,
            "{:>7} {:>10.4} {:>10.4} {:>10} {:>10.3} {:>6} {:>9.0} {:>8}",
            r.frame,
            r.temperature_set_point,
            r.measured_temperature,
            r.temperature_in_kelvin
                .map_or_else(|| "-".to_string(), |k| format!("{:.2}", k)),
            r.pressure_in_atmospheres,
            r.molecule_count,
            r.container_height,
            r.exploded
        )?;
    }
    Ok(())
}
