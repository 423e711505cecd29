//! The particle model: owns the molecule data set and drives the species
//! strategies, the container and the thermostats once per frame.

pub mod container;
pub mod injection;
pub mod policy;
pub mod state;


use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::constants::*;
use crate::dataset::MoleculeDataSet;
use crate::phase::{LiquidSnapshots, PhaseContext, PhaseStateChanger, SnapshotError};
use crate::position_updater::AtomPositionUpdater;
use crate::substance::{phase_for_temperature, MoleculeKind, PhaseState, Substance};
use crate::verlet::{ForceEnvironment, SubstepReport, VerletAlgorithm, VerletAlgorithmKind};

use container::{Container, ContainerBounds};
use injection::{injection_height, sample_injected_molecule, InjectionQueue};
use policy::{PolicyInputs, ThermostatChoice, ThermostatPolicy};

/// The per-species strategies, always swapped together.
#[derive(Debug, Clone)]
pub struct SpeciesStrategies {
    pub kind: MoleculeKind,
    pub position_updater: AtomPositionUpdater,
    pub verlet: VerletAlgorithmKind,
    pub phase_changer: PhaseStateChanger,
}

impl SpeciesStrategies {
    pub fn for_kind(kind: MoleculeKind) -> Self {
        Self {
            kind,
            position_updater: AtomPositionUpdater::for_kind(kind),
            verlet: VerletAlgorithmKind::for_kind(kind),
            phase_changer: PhaseStateChanger::for_kind(kind),
        }
    }
}

pub struct MultipleParticleModel {
    config: ModelConfig,
    substance: Substance,
    data: MoleculeDataSet,
    strategies: SpeciesStrategies,
    container: Container,
    injection: InjectionQueue,
    thermostats: ThermostatPolicy,
    snapshots: LiquidSnapshots,
    rng: StdRng,

    temperature_set_point: f64,
    minimum_temperature: f64,
    heating_cooling_amount: f64,
    gravitational_acceleration: f64,
    nominal_time_step: f64,
    residual_time: f64,
    target_molecule_count: usize,
    particle_diameter: f64,
    adjustable_epsilon: f64,
    adjustable_sigma: f64,
    exploded: bool,
    playing: bool,
}

impl MultipleParticleModel {
    /// Build a model in the state described by `config`.
    ///
    /// Fails only if an embedded liquid snapshot does not validate.
    pub fn new(config: &ModelConfig) -> Result<Self, SnapshotError> {
        let snapshots = LiquidSnapshots::load()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let thermostats = ThermostatPolicy::new(INITIAL_TEMPERATURE, MIN_TEMPERATURE, rng.gen(), rng.gen());
        let kind = config.substance.molecule_kind();

        let mut model = Self {
            config: config.clone(),
            substance: config.substance,
            data: MoleculeDataSet::new(kind, kind.max_molecules()),
            strategies: SpeciesStrategies::for_kind(kind),
            container: Container::new(),
            injection: InjectionQueue::new(),
            thermostats,
            snapshots,
            rng,
            temperature_set_point: INITIAL_TEMPERATURE,
            minimum_temperature: MIN_TEMPERATURE,
            heating_cooling_amount: 0.0,
            gravitational_acceleration: config.gravitational_acceleration,
            nominal_time_step: config.nominal_time_step,
            residual_time: 0.0,
            target_molecule_count: kind.standard_molecule_count(),
            particle_diameter: config.substance.particle_diameter(config.adjustable_sigma),
            adjustable_epsilon: config.adjustable_epsilon,
            adjustable_sigma: config.adjustable_sigma,
            exploded: false,
            playing: true,
        };
        model.reset();
        Ok(model)
    }

    /// Return to the configured initial state. Thermostat drift accumulators
    /// are left alone.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        self.substance = config.substance;
        self.temperature_set_point = INITIAL_TEMPERATURE;
        self.heating_cooling_amount = 0.0;
        self.gravitational_acceleration = config.gravitational_acceleration;
        self.nominal_time_step = config.nominal_time_step;
        self.adjustable_epsilon = config.adjustable_epsilon.clamp(MIN_EPSILON, MAX_EPSILON);
        self.adjustable_sigma = config.adjustable_sigma.clamp(MIN_SIGMA, MAX_SIGMA);
        self.playing = true;
        self.target_molecule_count = self.clamp_molecule_count(
            config
                .molecule_count
                .unwrap_or_else(|| self.substance.molecule_kind().standard_molecule_count()),
        );
        info!("Resetting model: {}, {:?}", self.substance, config.initial_phase);
        self.reinitialize(config.initial_phase);
    }

    /// Switch species, keeping the phase implied by the current set point.
    pub fn set_substance(&mut self, substance: Substance) {
        let phase = phase_for_temperature(self.temperature_set_point);
        info!("Substance changed from {} to {} ({:?})", self.substance, substance, phase);
        self.substance = substance;
        self.target_molecule_count = substance.molecule_kind().standard_molecule_count();
        self.reinitialize(phase);
    }

    /// Discard the data set and every strategy and rebuild them for the
    /// current substance at `phase`.
    fn reinitialize(&mut self, phase: PhaseState) {
        let kind = self.substance.molecule_kind();
        self.strategies = SpeciesStrategies::for_kind(kind);
        self.data = MoleculeDataSet::new(kind, kind.max_molecules());
        self.particle_diameter = self.substance.particle_diameter(self.adjustable_sigma);
        self.minimum_temperature = MIN_TEMPERATURE;
        self.thermostats.set_minimum_temperature(self.minimum_temperature);

        self.container.reset();
        self.exploded = false;
        self.injection.clear();
        self.residual_time = 0.0;

        let count = self.clamp_molecule_count(self.target_molecule_count);
        let origin = Vector2::zeros();
        let atoms = self.strategies.position_updater.atoms_for(origin, 0.0);
        for _ in 0..count {
            if let Err(err) = self.data.add_molecule(&atoms, origin, Vector2::zeros(), 0.0, true) {
                warn!("Could not place every molecule: {}", err);
                break;
            }
        }
        if phase == PhaseState::Liquid && !self.can_form_liquid() {
            self.melt_lattice();
        } else {
            self.set_phase(phase);
        }
    }

    /// Rearrange the current molecules into `phase`.
    ///
    /// # Panics
    ///
    /// Panics when a liquid is requested for anything but the standard
    /// molecule count; see [`Self::can_form_liquid`] and [`Self::melt_lattice`].
    pub fn set_phase(&mut self, phase: PhaseState) {
        self.apply_phase_change(phase);
    }

    /// Whether the curated liquid exists for the current molecule count.
    pub fn can_form_liquid(&self) -> bool {
        self.data.number_of_molecules() == self.data.kind().standard_molecule_count()
    }

    /// Freeze the molecules into a lattice and leave it to melt at the liquid
    /// set point. Used for counts that have no curated liquid.
    pub fn melt_lattice(&mut self) {
        debug!(
            "Melting a lattice of {} molecules at the liquid set point",
            self.data.number_of_molecules()
        );
        self.apply_phase_change(PhaseState::Solid);
        self.set_temperature_set_point(LIQUID_TEMPERATURE);
    }

    fn apply_phase_change(&mut self, phase: PhaseState) {
        let bounds = self.bounds();
        let change = self.strategies.phase_changer.set_phase(
            PhaseContext {
                data: &mut self.data,
                bounds,
                snapshots: &self.snapshots,
                rng: &mut self.rng,
            },
            phase,
        );
        info!(
            "Phase set to {:?} with {} molecules of {}",
            phase,
            self.data.number_of_molecules(),
            self.substance
        );
        self.set_temperature_set_point(change.temperature_set_point);
        self.sync_atom_positions();
        self.run_substeps(change.relaxation_substeps, self.nominal_time_step);
    }

    /// Advance the model by `dt` seconds of wall-clock time.
    pub fn step(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let model_time = dt * TIME_SPEEDUP_SCALE_FACTOR + self.residual_time;
        let substeps = (model_time / MODEL_TIME_STEP).floor() as usize;
        self.residual_time = model_time - substeps as f64 * MODEL_TIME_STEP;

        let lid_moved = self.container.resize(self.exploded, dt * TIME_SPEEDUP_SCALE_FACTOR);

        let injected_temperature = if self.injection.tick(dt) {
            self.inject_queued_molecule()
        } else {
            None
        };

        let report = self.run_substeps(substeps, MODEL_TIME_STEP);
        self.sync_atom_positions();
        if report.pressure_exceeded_limit {
            self.explode();
        }

        let measured_temperature = if substeps > 0 {
            self.strategies.verlet.temperature()
        } else {
            self.data.temperature_from_kinetic_energy()
        };
        let choice = PolicyInputs {
            lid_moved,
            lid_changed_particle_velocity: report.lid_changed_particle_velocity,
            injected_temperature,
            measured_temperature,
            temperature_set_point: self.temperature_set_point,
            heating_cooling_amount: self.heating_cooling_amount,
        }
        .choose();

        match choice {
            ThermostatChoice::LidDriven => self.set_temperature_set_point(measured_temperature),
            ThermostatChoice::Injection { injected_temperature } => {
                let n = self.data.number_of_molecules() as f64;
                let blended = (self.temperature_set_point * (n - 1.0) + injected_temperature) / n;
                self.set_temperature_set_point(blended);
            }
            ThermostatChoice::Isokinetic | ThermostatChoice::Andersen => {}
        }
        self.thermostats.apply(choice, &mut self.data, measured_temperature);

        if self.heating_cooling_amount != 0.0 {
            let mut change = self.heating_cooling_amount * TEMPERATURE_CHANGE_RATE * dt;
            if change < 0.0 && self.temperature_set_point < APPROACHING_ABSOLUTE_ZERO_TEMPERATURE {
                change *= self.temperature_set_point / APPROACHING_ABSOLUTE_ZERO_TEMPERATURE;
            }
            self.set_temperature_set_point(self.temperature_set_point + change);
        }
    }

    fn force_environment(&self) -> ForceEnvironment {
        ForceEnvironment {
            bounds: self.bounds(),
            gravitational_acceleration: self.gravitational_acceleration,
            scaled_epsilon: self.scaled_epsilon(),
            temperature_set_point: self.temperature_set_point,
            explosion_enabled: self.config.explosion_enabled,
        }
    }

    fn run_substeps(&mut self, count: usize, dt: f64) -> SubstepReport {
        let env = self.force_environment();
        let mut report = SubstepReport::default();
        for _ in 0..count {
            report.merge(self.strategies.verlet.update_forces_and_motion(
                &mut self.data,
                &self.strategies.position_updater,
                &env,
                dt,
            ));
        }
        report
    }

    fn sync_atom_positions(&mut self) {
        let bounds = self.bounds();
        self.strategies
            .position_updater
            .update_atom_positions(&mut self.data, &bounds);
    }

    fn inject_queued_molecule(&mut self) -> Option<f64> {
        let molecule = sample_injected_molecule(&mut self.rng, self.particle_diameter, self.data.has_rotation());
        let atoms = self
            .strategies
            .position_updater
            .atoms_for(molecule.position, 0.0);
        match self.data.add_molecule(
            &atoms,
            molecule.position,
            molecule.velocity,
            molecule.rotation_rate,
            true,
        ) {
            Ok(()) => {
                let index = self.data.number_of_molecules() - 1;
                let energy = self.data.kinetic_energy_of(index);
                debug!("Injected molecule {} at {:?}", index, molecule.position);
                Some(energy / (self.data.kind().degrees_of_freedom() / 2.0))
            }
            Err(err) => {
                warn!("Dropping queued injection: {}", err);
                None
            }
        }
    }

    fn set_temperature_set_point(&mut self, temperature: f64) {
        self.temperature_set_point = temperature.clamp(self.minimum_temperature, MAX_TEMPERATURE);
        self.thermostats
            .set_target_temperature(self.temperature_set_point);
    }

    fn clamp_molecule_count(&self, count: usize) -> usize {
        let range = self.molecule_count_range();
        count.clamp(*range.start(), *range.end())
    }

    fn scaled_epsilon(&self) -> f64 {
        match self.substance {
            Substance::AdjustableAtom => self.adjustable_epsilon / DEFAULT_EPSILON,
            _ => 1.0,
        }
    }

    fn bounds(&self) -> ContainerBounds {
        self.container.bounds(self.particle_diameter, self.exploded)
    }

    /// Queue one injection. Returns false if the request was ignored because
    /// the model is paused, exploded, full or the lid is too low.
    pub fn inject_molecule(&mut self) -> bool {
        if !self.playing || self.exploded || self.container.height() < injection_height() {
            return false;
        }
        if self.injection.queued() + self.data.number_of_molecules() >= self.data.capacity() {
            return false;
        }
        self.injection.request()
    }

    pub fn explode(&mut self) {
        if !self.exploded {
            info!(
                "Container exploded at pressure {:.3} atm",
                self.pressure_in_atmospheres()
            );
            self.exploded = true;
        }
    }

    /// Put the lid back after an explosion, discarding every molecule that
    /// is no longer inside the freshly reset container.
    pub fn return_lid(&mut self) {
        if !self.exploded {
            return;
        }
        self.container.reset();
        let bounds = self.container.bounds(self.particle_diameter, false);

        let mut removed = 0;
        let mut i = 0;
        while i < self.data.number_of_molecules() {
            let p = self.data.center_of_mass_positions[i];
            if !self.data.inside_container[i] || !bounds.contains(p.x, p.y) {
                self.data.remove_molecule(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        self.exploded = false;
        self.strategies.verlet.pressure_tracker_mut().reset();
        info!("Lid returned, {} molecules lost", removed);

        if removed > 0 && self.temperature_set_point > GAS_TEMPERATURE {
            self.set_phase(PhaseState::Gas);
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn set_heating_cooling_amount(&mut self, amount: f64) {
        self.heating_cooling_amount = amount.clamp(-1.0, 1.0);
    }

    /// Target container height in picometers.
    pub fn set_target_container_height(&mut self, height: f64) {
        self.container.set_target_height(height);
    }

    /// Takes effect at the next reset or reinitialization.
    pub fn set_target_molecule_count(&mut self, count: usize) {
        self.target_molecule_count = self.clamp_molecule_count(count);
    }

    /// Ignored unless the adjustable atom is selected.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        if self.substance == Substance::AdjustableAtom {
            self.adjustable_epsilon = epsilon.clamp(MIN_EPSILON, MAX_EPSILON);
        }
    }

    /// Ignored unless the adjustable atom is selected.
    pub fn set_sigma(&mut self, sigma: f64) {
        if self.substance == Substance::AdjustableAtom {
            self.adjustable_sigma = sigma.clamp(MIN_SIGMA, MAX_SIGMA);
            self.particle_diameter = self.substance.particle_diameter(self.adjustable_sigma);
        }
    }

    pub fn set_gravitational_acceleration(&mut self, acceleration: f64) {
        self.gravitational_acceleration = acceleration.clamp(0.0, MAX_GRAVITATIONAL_ACCEL);
    }

    /// Time step for the relaxation substeps after a phase change.
    pub fn set_nominal_time_step(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.nominal_time_step = dt;
        } else {
            warn!("Ignoring nominal time step {}", dt);
        }
    }

    pub fn atom_positions(&self) -> &[Vector2<f64>] {
        &self.data.atom_positions
    }

    pub fn data_set(&self) -> &MoleculeDataSet {
        &self.data
    }

    pub fn substance(&self) -> Substance {
        self.substance
    }

    pub fn temperature_set_point(&self) -> f64 {
        self.temperature_set_point
    }

    /// Temperature measured from the kinetic energy of the molecules.
    pub fn measured_temperature(&self) -> f64 {
        self.data.temperature_from_kinetic_energy()
    }

    /// Set point in Kelvin, or `None` when there is nothing to measure.
    pub fn temperature_in_kelvin(&self) -> Option<f64> {
        if self.data.number_of_atoms() == 0 {
            return None;
        }
        Some(
            self.substance
                .model_temperature_to_kelvin(self.temperature_set_point, self.adjustable_epsilon),
        )
    }

    pub fn pressure(&self) -> f64 {
        self.strategies.verlet.pressure()
    }

    pub fn pressure_in_atmospheres(&self) -> f64 {
        self.strategies
            .verlet
            .pressure_tracker()
            .pressure_in_atmospheres()
    }

    /// Container height in picometers.
    pub fn container_height(&self) -> f64 {
        self.container.height()
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn molecule_count(&self) -> usize {
        self.data.number_of_molecules()
    }

    pub fn target_molecule_count(&self) -> usize {
        self.target_molecule_count
    }

    pub fn molecule_count_range(&self) -> RangeInclusive<usize> {
        1..=self.substance.molecule_kind().max_molecules()
    }

    pub fn heating_cooling_amount(&self) -> f64 {
        self.heating_cooling_amount
    }

    pub fn gravitational_acceleration(&self) -> f64 {
        self.gravitational_acceleration
    }

    pub fn particle_diameter(&self) -> f64 {
        self.particle_diameter
    }

    pub fn queued_injections(&self) -> usize {
        self.injection.queued()
    }

    pub fn last_thermostat_choice(&self) -> Option<ThermostatChoice> {
        self.thermostats.last_choice()
    }
}
