//! Headless states-of-matter runner
//!
//! Builds a particle model from a YAML configuration, plays the scenario
//! frame by frame and reports temperature, pressure and container state.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

use states_of_matter::config::{Args, ScenarioAction, SimulationConfig};
use states_of_matter::io::{setup_output, write_status_table, StatusReport};
use states_of_matter::{MultipleParticleModel, PhaseState};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.output.as_ref())?;

    let mut config = match &args.config_file {
        Some(path) => {
            info!("Reading configuration from: {}", path);
            SimulationConfig::from_file(path)
                .wrap_err_with(|| format!("Unable to load configuration file: {}", path))?
        }
        None => {
            info!("No configuration file given, using defaults");
            SimulationConfig::default()
        }
    };
    args.apply_overrides(&mut config);
    config
        .validate()
        .wrap_err("Configuration is invalid after command-line overrides")?;

    if let Some(path) = &args.dump_config {
        config
            .to_file(path)
            .wrap_err_with(|| format!("Unable to write configuration to: {}", path))?;
        info!("Configuration written to: {}", path);
        return Ok(());
    }

    info!("Configuration loaded:\n{:?}", config);
    let reports = run_scenario(&config)?;

    if let Some(path) = &args.report_file {
        let content = serde_yml::to_string(&reports).wrap_err("Failed to serialize status reports")?;
        fs::write(path, content).wrap_err_with(|| format!("Unable to write reports to: {}", path))?;
        info!("Status reports written to: {}", path);
    }

    let mut stdout = std::io::stdout().lock();
    write_status_table(&mut stdout, &reports)?;
    Ok(())
}

/// Step the model through every frame, applying scheduled actions first.
fn run_scenario(config: &SimulationConfig) -> Result<Vec<StatusReport>> {
    let mut model =
        MultipleParticleModel::new(&config.model).wrap_err("Failed to build the particle model")?;
    let scenario = &config.scenario;

    let initial = StatusReport::capture(0, &model);
    info!("{}", initial);
    let mut reports = vec![initial];

    for frame in 0..scenario.frames {
        for action in scenario.events_at(frame) {
            apply_action(&mut model, action);
        }
        model.step(scenario.frame_dt);

        let completed = frame + 1;
        if completed % scenario.report_interval == 0 || completed == scenario.frames {
            let report = StatusReport::capture(completed, &model);
            info!("{}", report);
            reports.push(report);
        }
    }

    info!(
        "Finished {} frames with {} molecules",
        scenario.frames,
        model.molecule_count()
    );
    Ok(reports)
}

fn apply_action(model: &mut MultipleParticleModel, action: &ScenarioAction) {
    info!("Applying {:?}", action);
    match *action {
        ScenarioAction::HeatingCooling { amount } => model.set_heating_cooling_amount(amount),
        ScenarioAction::Inject { count } => {
            let accepted = (0..count).filter(|_| model.inject_molecule()).count();
            if accepted < count {
                info!("Only {} of {} injections were queued", accepted, count);
            }
        }
        ScenarioAction::ContainerHeight { height } => model.set_target_container_height(height),
        ScenarioAction::Phase { phase } => {
            if phase == PhaseState::Liquid && !model.can_form_liquid() {
                info!(
                    "No curated liquid for {} molecules, melting a lattice instead",
                    model.molecule_count()
                );
                model.melt_lattice();
            } else {
                model.set_phase(phase);
            }
        }
        ScenarioAction::Substance { substance } => model.set_substance(substance),
        ScenarioAction::Gravity { acceleration } => model.set_gravitational_acceleration(acceleration),
        ScenarioAction::Explode => model.explode(),
        ScenarioAction::ReturnLid => model.return_lid(),
        ScenarioAction::Pause => model.set_playing(false),
        ScenarioAction::Play => model.set_playing(true),
    }
}
