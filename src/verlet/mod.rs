//! Force calculation and fixed-step velocity-Verlet integration.
//!
//! Each species supplies an [`InteractionKernel`] that accumulates the
//! molecule-molecule forces and torques; [`VerletIntegrator`] owns everything
//! the species share: gravity, walls, the lid, the integration itself and the
//! derived temperature and pressure.

pub mod charges;
pub mod diatomic;
pub mod monatomic;
pub mod pressure;
pub mod water;

#[cfg(test)]
mod tests;

use itertools::izip;
use nalgebra::Vector2;

use crate::constants::{ESCAPE_MARGIN, MIN_WALL_DISTANCE, WALL_DISTANCE_THRESHOLD};
use crate::dataset::MoleculeDataSet;
use crate::model::container::ContainerBounds;
use crate::position_updater::AtomPositionUpdater;
use crate::substance::MoleculeKind;

pub use diatomic::DiatomicForces;
pub use monatomic::MonatomicForces;
pub use pressure::PressureTracker;
pub use water::WaterForces;

pub type MonatomicVerletAlgorithm = VerletIntegrator<MonatomicForces>;
pub type DiatomicVerletAlgorithm = VerletIntegrator<DiatomicForces>;
pub type WaterVerletAlgorithm = VerletIntegrator<WaterForces>;

/// Everything outside the data set that the kernels read during a substep.
#[derive(Debug, Clone, Copy)]
pub struct ForceEnvironment {
    pub bounds: ContainerBounds,
    pub gravitational_acceleration: f64,
    /// Lennard-Jones well depth relative to the substance default.
    pub scaled_epsilon: f64,
    pub temperature_set_point: f64,
    pub explosion_enabled: bool,
}

/// Events raised by one substep that the orchestrator has to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstepReport {
    pub lid_changed_particle_velocity: bool,
    pub pressure_exceeded_limit: bool,
}

impl SubstepReport {
    pub fn merge(&mut self, other: SubstepReport) {
        self.lid_changed_particle_velocity |= other.lid_changed_particle_velocity;
        self.pressure_exceeded_limit |= other.pressure_exceeded_limit;
    }
}

/// Species-specific molecule-molecule interactions.
pub trait InteractionKernel {
    /// Add pair forces into `next_forces` and pair torques into `next_torques`.
    fn accumulate_interactions(&self, data: &mut MoleculeDataSet, env: &ForceEnvironment);
}

pub trait VerletAlgorithm {
    /// Advance the data set by one fixed substep of length `dt`.
    fn update_forces_and_motion(
        &mut self,
        data: &mut MoleculeDataSet,
        updater: &AtomPositionUpdater,
        env: &ForceEnvironment,
        dt: f64,
    ) -> SubstepReport;

    /// Temperature derived from kinetic energy at the end of the last substep.
    fn temperature(&self) -> f64;

    fn pressure_tracker(&self) -> &PressureTracker;

    fn pressure_tracker_mut(&mut self) -> &mut PressureTracker;

    fn pressure(&self) -> f64 {
        self.pressure_tracker().pressure()
    }
}

/// Shared velocity-Verlet driver parameterized by the interaction kernel.
#[derive(Debug, Clone)]
pub struct VerletIntegrator<K: InteractionKernel> {
    pub(crate) kernel: K,
    pressure: PressureTracker,
    calculated_temperature: f64,
}

impl<K: InteractionKernel> VerletIntegrator<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            pressure: PressureTracker::new(),
            calculated_temperature: 0.0,
        }
    }

    /// Move molecule centers and angles using the current forces.
    fn update_positions(&self, data: &mut MoleculeDataSet, env: &ForceEnvironment, dt: f64) -> bool {
        let inv_mass = 1.0 / data.molecule_mass();
        let half_dt2 = 0.5 * dt * dt;
        for (pos, v, f) in izip!(
            &mut data.center_of_mass_positions,
            &data.velocities,
            &data.forces
        ) {
            *pos += v * dt + f * (inv_mass * half_dt2);
        }

        if data.has_rotation() {
            let inv_inertia = 1.0 / data.moment_of_inertia();
            for (angle, &rate, &torque) in
                izip!(&mut data.rotation_angles, &data.rotation_rates, &data.torques)
            {
                *angle += rate * dt + torque * inv_inertia * half_dt2;
            }
        }

        apply_lid(data, &env.bounds)
    }

    /// Gravity plus wall forces into the next-force arrays. Returns the summed
    /// side wall and lid force magnitude for the pressure calculation.
    fn initialize_external_forces(&self, data: &mut MoleculeDataSet, env: &ForceEnvironment) -> f64 {
        let gravity = Vector2::new(0.0, -env.gravitational_acceleration * data.molecule_mass());
        let bounds = env.bounds;
        let mut wall_force_total = 0.0;

        for i in 0..data.number_of_molecules() {
            data.next_forces[i] = gravity;
            data.next_torques[i] = 0.0;

            if !data.inside_container[i] {
                continue;
            }
            let pos = data.center_of_mass_positions[i];
            if bounds.exploded && pos.y > bounds.height + ESCAPE_MARGIN {
                data.inside_container[i] = false;
                continue;
            }

            // The floor carries the weight of the contents, so it is left
            // out of the pressure sum.
            let mut floor = 0.0;
            if pos.y < WALL_DISTANCE_THRESHOLD {
                floor = wall_force(pos.y);
            }
            let mut wall: Vector2<f64> = Vector2::zeros();
            if !bounds.exploded && bounds.height - pos.y < WALL_DISTANCE_THRESHOLD {
                wall.y -= wall_force(bounds.height - pos.y);
            }
            if pos.x < WALL_DISTANCE_THRESHOLD {
                wall.x += wall_force(pos.x);
            }
            if bounds.width - pos.x < WALL_DISTANCE_THRESHOLD {
                wall.x -= wall_force(bounds.width - pos.x);
            }

            wall_force_total += wall.x.abs() + wall.y.abs();
            wall.y += floor;
            data.next_forces[i] += wall;
        }

        wall_force_total
    }

    /// Average old and new forces into the velocities and roll the forces over.
    fn update_velocities(&mut self, data: &mut MoleculeDataSet, dt: f64) {
        let half_dt = 0.5 * dt;
        let inv_mass = 1.0 / data.molecule_mass();
        for (v, f, f_next) in izip!(&mut data.velocities, &mut data.forces, &data.next_forces) {
            *v += (*f + f_next) * (half_dt * inv_mass);
            *f = *f_next;
        }

        if data.has_rotation() {
            let inv_inertia = 1.0 / data.moment_of_inertia();
            for (rate, torque, &next) in
                izip!(&mut data.rotation_rates, &mut data.torques, &data.next_torques)
            {
                *rate += (*torque + next) * half_dt * inv_inertia;
                *torque = next;
            }
        }

        self.calculated_temperature = data.temperature_from_kinetic_energy();
    }
}

impl<K: InteractionKernel> VerletAlgorithm for VerletIntegrator<K> {
    fn update_forces_and_motion(
        &mut self,
        data: &mut MoleculeDataSet,
        updater: &AtomPositionUpdater,
        env: &ForceEnvironment,
        dt: f64,
    ) -> SubstepReport {
        let lid_changed_particle_velocity = self.update_positions(data, env, dt);
        updater.update_atom_positions(data, &env.bounds);

        let wall_force = self.initialize_external_forces(data, env);
        self.kernel.accumulate_interactions(data, env);
        self.update_velocities(data, dt);

        let pressure_exceeded_limit = self.pressure.update(wall_force, &env.bounds, dt)
            && env.explosion_enabled
            && !env.bounds.exploded;

        SubstepReport {
            lid_changed_particle_velocity,
            pressure_exceeded_limit,
        }
    }

    fn temperature(&self) -> f64 {
        self.calculated_temperature
    }

    fn pressure_tracker(&self) -> &PressureTracker {
        &self.pressure
    }

    fn pressure_tracker_mut(&mut self) -> &mut PressureTracker {
        &mut self.pressure
    }
}

/// Runtime selection of the integrator for the active species.
#[derive(Debug, Clone)]
pub enum VerletAlgorithmKind {
    Monatomic(MonatomicVerletAlgorithm),
    Diatomic(DiatomicVerletAlgorithm),
    Water(WaterVerletAlgorithm),
}

impl VerletAlgorithmKind {
    pub fn for_kind(kind: MoleculeKind) -> Self {
        match kind {
            MoleculeKind::Monatomic => {
                VerletAlgorithmKind::Monatomic(VerletIntegrator::new(MonatomicForces::default()))
            }
            MoleculeKind::Diatomic => {
                VerletAlgorithmKind::Diatomic(VerletIntegrator::new(DiatomicForces::default()))
            }
            MoleculeKind::Water => {
                VerletAlgorithmKind::Water(VerletIntegrator::new(WaterForces::default()))
            }
        }
    }

    fn inner(&self) -> &dyn VerletAlgorithm {
        match self {
            VerletAlgorithmKind::Monatomic(v) => v,
            VerletAlgorithmKind::Diatomic(v) => v,
            VerletAlgorithmKind::Water(v) => v,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn VerletAlgorithm {
        match self {
            VerletAlgorithmKind::Monatomic(v) => v,
            VerletAlgorithmKind::Diatomic(v) => v,
            VerletAlgorithmKind::Water(v) => v,
        }
    }
}

impl VerletAlgorithm for VerletAlgorithmKind {
    fn update_forces_and_motion(
        &mut self,
        data: &mut MoleculeDataSet,
        updater: &AtomPositionUpdater,
        env: &ForceEnvironment,
        dt: f64,
    ) -> SubstepReport {
        self.inner_mut().update_forces_and_motion(data, updater, env, dt)
    }

    fn temperature(&self) -> f64 {
        self.inner().temperature()
    }

    fn pressure_tracker(&self) -> &PressureTracker {
        self.inner().pressure_tracker()
    }

    fn pressure_tracker_mut(&mut self) -> &mut PressureTracker {
        self.inner_mut().pressure_tracker_mut()
    }
}

/// Repulsive wall force at distance `d`, zero at the threshold.
fn wall_force(d: f64) -> f64 {
    let d = d.max(MIN_WALL_DISTANCE);
    let inv = 1.0 / d;
    let inv7 = inv.powi(7);
    48.0 * inv7 * inv.powi(6) - 24.0 * inv7
}

/// Hold contained molecules under a lid that is coming down. Returns true if
/// any velocity was changed.
fn apply_lid(data: &mut MoleculeDataSet, bounds: &ContainerBounds) -> bool {
    if bounds.exploded || bounds.lid_velocity >= 0.0 {
        return false;
    }
    let mut changed = false;
    for (pos, v, &inside) in izip!(
        &mut data.center_of_mass_positions,
        &mut data.velocities,
        &data.inside_container
    ) {
        let contact = bounds.height - WALL_DISTANCE_THRESHOLD;
        if inside && pos.y > contact {
            pos.y = contact;
            if v.y > bounds.lid_velocity {
                v.y = bounds.lid_velocity;
                changed = true;
            }
        }
    }
    changed
}

/// Lennard-Jones force on `a` from `b`, with the squared distance clamped
/// from below and an optional extra weight on the repulsive term.
#[inline]
pub(crate) fn lennard_jones_force(
    a: Vector2<f64>,
    b: Vector2<f64>,
    min_r2: f64,
    epsilon: f64,
    repulsive_scale: f64,
) -> Vector2<f64> {
    let d = a - b;
    let r2 = d.norm_squared().max(min_r2);
    let inv_r2 = 1.0 / r2;
    let inv_r6 = inv_r2 * inv_r2 * inv_r2;
    let f_mag = epsilon * inv_r2 * (48.0 * inv_r6 * inv_r6 * repulsive_scale - 24.0 * inv_r6);
    d * f_mag
}

/// z-component of `r × f`.
#[inline]
pub(crate) fn torque(r: Vector2<f64>, f: Vector2<f64>) -> f64 {
    r.x * f.y - r.y * f.x
}
