use super::*;
use approx::*;

fn env(gravity: f64) -> ForceEnvironment {
    ForceEnvironment {
        bounds: ContainerBounds {
            width: 30.0,
            height: 30.0,
            exploded: false,
            lid_velocity: 0.0,
        },
        gravitational_acceleration: gravity,
        scaled_epsilon: 1.0,
        temperature_set_point: 0.5,
        explosion_enabled: true,
    }
}

fn data_from(kind: MoleculeKind, centers: &[(f64, f64)], angles: &[f64]) -> MoleculeDataSet {
    let updater = AtomPositionUpdater::for_kind(kind);
    let mut data = MoleculeDataSet::new(kind, 16);
    for (k, &(x, y)) in centers.iter().enumerate() {
        let com = Vector2::new(x, y);
        let angle = angles.get(k).copied().unwrap_or(0.0);
        data.add_molecule(&updater.atoms_for(com, angle), com, Vector2::zeros(), 0.0, true)
            .unwrap();
        data.rotation_angles[k] = angle;
    }
    data
}

fn net_next_force(data: &MoleculeDataSet) -> Vector2<f64> {
    data.next_forces.iter().sum()
}

fn clear_next(data: &mut MoleculeDataSet) {
    for f in &mut data.next_forces {
        *f = Vector2::zeros();
    }
    for t in &mut data.next_torques {
        *t = 0.0;
    }
}

#[test]
fn test_lj_force_vanishes_at_minimum() {
    let r_min = 2f64.powf(1.0 / 6.0);
    let f = lennard_jones_force(Vector2::new(r_min, 0.0), Vector2::zeros(), 0.01, 1.0, 1.0);
    assert_relative_eq!(f.norm(), 0.0, epsilon = 1e-10);
}

#[test]
fn test_lj_force_repulsive_inside_attractive_outside() {
    let close = lennard_jones_force(Vector2::new(1.0, 0.0), Vector2::zeros(), 0.01, 1.0, 1.0);
    let far = lennard_jones_force(Vector2::new(1.5, 0.0), Vector2::zeros(), 0.01, 1.0, 1.0);
    assert!(close.x > 0.0);
    assert!(far.x < 0.0);
}

#[test]
fn test_coincident_atoms_are_clamped() {
    let f = lennard_jones_force(Vector2::new(1.0, 1.0), Vector2::new(1.0, 1.0), 0.7225, 1.0, 1.0);
    assert!(f.x.is_finite() && f.y.is_finite());

    let near = lennard_jones_force(Vector2::new(1.0 + 1e-9, 1.0), Vector2::new(1.0, 1.0), 0.7225, 1.0, 1.0);
    assert!(near.norm() < 1e-6);
}

#[test]
fn test_monatomic_pair_forces_balance() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(10.0, 10.0), (11.0, 10.3), (10.4, 11.1)], &[]);
    MonatomicForces::default().accumulate_interactions(&mut data, &env(0.0));
    assert_relative_eq!(net_next_force(&data).norm(), 0.0, epsilon = 1e-10);
    assert!(data.next_forces[0].norm() > 0.0);
}

#[test]
fn test_cutoff_skips_distant_pairs() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(5.0, 10.0), (8.0, 10.0)], &[]);
    MonatomicForces::default().accumulate_interactions(&mut data, &env(0.0));
    assert_eq!(data.next_forces[0], Vector2::zeros());
}

#[test]
fn test_diatomic_forces_balance_and_torque() {
    let mut data = data_from(
        MoleculeKind::Diatomic,
        &[(10.0, 10.0), (11.2, 10.6)],
        &[0.3, 1.1],
    );
    DiatomicForces::default().accumulate_interactions(&mut data, &env(0.0));
    assert_relative_eq!(net_next_force(&data).norm(), 0.0, epsilon = 1e-10);

    // Total angular momentum about the origin is conserved by the pair.
    let total: f64 = (0..2)
        .map(|i| data.next_torques[i] + torque(data.center_of_mass_positions[i], data.next_forces[i]))
        .sum();
    assert_relative_eq!(total, 0.0, epsilon = 1e-9);
}

#[test]
fn test_water_forces_balance() {
    let mut data = data_from(
        MoleculeKind::Water,
        &[(10.0, 10.0), (11.3, 10.2), (10.5, 11.4)],
        &[0.0, 2.0, 4.0],
    );
    let mut environment = env(0.0);
    for t in [0.1, 0.26, 1.0] {
        clear_next(&mut data);
        environment.temperature_set_point = t;
        WaterForces::default().accumulate_interactions(&mut data, &environment);
        assert_relative_eq!(net_next_force(&data).norm(), 0.0, epsilon = 1e-8);
        assert!(data.next_forces.iter().all(|f| f.x.is_finite() && f.y.is_finite()));
    }
}

#[test]
fn test_water_frozen_charges_change_forces() {
    let mut frozen = data_from(MoleculeKind::Water, &[(10.0, 10.0), (11.3, 10.2)], &[0.0, 2.5]);
    let mut melted = frozen.clone();
    let mut environment = env(0.0);
    environment.temperature_set_point = 0.0;
    WaterForces::default().accumulate_interactions(&mut frozen, &environment);
    environment.temperature_set_point = 1.0;
    WaterForces::default().accumulate_interactions(&mut melted, &environment);
    assert!((frozen.next_forces[0] - melted.next_forces[0]).norm() > 1e-6);
}

#[test]
fn test_water_hydrogens_are_small_and_weak() {
    let forces = WaterForces::default();
    let oo = forces.pairs[0][0];
    let oh = forces.pairs[0][1];
    let hh = forces.pairs[1][2];
    assert_relative_eq!(oo.sigma_sqrd, 1.0);
    assert_relative_eq!(oo.epsilon, 1.0);
    assert!(hh.sigma_sqrd < oh.sigma_sqrd && oh.sigma_sqrd < oo.sigma_sqrd);
    assert!(hh.epsilon < oh.epsilon && oh.epsilon < oo.epsilon);
    assert_eq!(forces.pairs[1][0], oh);
}

#[test]
fn test_water_overlapping_atoms_stay_bounded() {
    // Second molecule's oxygen sits right on top of the first one's hydrogen.
    let template = AtomPositionUpdater::for_kind(MoleculeKind::Water);
    let hydrogen = template.atoms_for(Vector2::new(10.0, 10.0), 0.0)[1];
    let oxygen_offset = template.offsets()[0];
    let second = hydrogen - oxygen_offset;
    let mut data = data_from(
        MoleculeKind::Water,
        &[(10.0, 10.0), (second.x, second.y)],
        &[0.0, 0.0],
    );
    let mut environment = env(0.0);
    environment.temperature_set_point = 0.0;
    WaterForces::default().accumulate_interactions(&mut data, &environment);
    for (f, t) in data.next_forces.iter().zip(&data.next_torques) {
        assert!(f.norm().is_finite() && f.norm() < 1e4, "force {}", f.norm());
        assert!(t.is_finite() && t.abs() < 1e4, "torque {}", t);
    }
}

#[test]
fn test_water_lattice_energy_stays_bounded() {
    let kind = MoleculeKind::Water;
    let updater = AtomPositionUpdater::for_kind(kind);
    let mut data = MoleculeDataSet::new(kind, 64);
    for row in 0..4 {
        for column in 0..4 {
            let com = Vector2::new(10.0 + 1.8 * column as f64, 1.8 + 1.8 * row as f64);
            let angle = if (row + column) % 2 == 0 { 0.0 } else { std::f64::consts::PI };
            data.add_molecule(&updater.atoms_for(com, angle), com, Vector2::zeros(), 0.0, true)
                .unwrap();
            let k = data.number_of_molecules() - 1;
            data.rotation_angles[k] = angle;
        }
    }
    let mut verlet = VerletAlgorithmKind::for_kind(kind);
    let mut environment = env(0.045);
    environment.temperature_set_point = 0.15;
    let mut hottest: f64 = 0.0;
    for _ in 0..200 {
        verlet.update_forces_and_motion(&mut data, &updater, &environment, 0.025);
        hottest = hottest.max(verlet.temperature());
    }
    // No thermostat here: the lattice settles and the released energy stays bounded.
    assert!(hottest < 5.0, "temperature {}", hottest);
    assert!(data.rotation_rates.iter().all(|w| w.abs() < 20.0));
}

#[test]
fn test_floor_does_not_count_toward_pressure() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(15.0, 0.9)], &[]);
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    verlet.update_forces_and_motion(&mut data, &updater, &env(0.045), 0.01);
    assert!(data.velocities[0].y > 0.0);
    assert_eq!(verlet.pressure(), 0.0);
}

#[test]
fn test_free_fall_under_gravity() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(15.0, 15.0)], &[]);
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    let environment = env(0.045);
    let dt = 0.025;

    // The first substep only sees the new gravity force at its end.
    verlet.update_forces_and_motion(&mut data, &updater, &environment, dt);
    assert_relative_eq!(data.velocities[0].y, -0.5 * 0.045 * dt, epsilon = 1e-12);
    verlet.update_forces_and_motion(&mut data, &updater, &environment, dt);
    assert_relative_eq!(data.velocities[0].y, -1.5 * 0.045 * dt, epsilon = 1e-12);
    assert_eq!(data.atom_positions[0], data.center_of_mass_positions[0]);
    assert!(verlet.temperature() > 0.0);
}

#[test]
fn test_bound_pair_stays_bound() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(14.0, 15.0), (15.05, 15.0)], &[]);
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    let environment = env(0.0);
    for _ in 0..200 {
        verlet.update_forces_and_motion(&mut data, &updater, &environment, 0.005);
    }
    let separation = (data.center_of_mass_positions[0] - data.center_of_mass_positions[1]).norm();
    // Oscillates around the potential minimum without flying apart.
    assert!(separation > 0.85 && separation < 1.5, "separation {}", separation);
    assert_relative_eq!(data.velocities[0].x, -data.velocities[1].x, epsilon = 1e-10);
}

#[test]
fn test_wall_pushes_molecule_back() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(0.8, 15.0)], &[]);
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    verlet.update_forces_and_motion(&mut data, &updater, &env(0.0), 0.01);
    assert!(data.velocities[0].x > 0.0);
    assert!(verlet.pressure() > 0.0);
}

#[test]
fn test_molecules_outside_feel_no_walls() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(0.8, 15.0)], &[]);
    data.inside_container[0] = false;
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    verlet.update_forces_and_motion(&mut data, &updater, &env(0.0), 0.01);
    assert_eq!(data.velocities[0].x, 0.0);
}

#[test]
fn test_descending_lid_changes_velocity() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(15.0, 29.99)], &[]);
    data.velocities[0] = Vector2::new(0.0, 1.0);
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    let mut environment = env(0.0);
    environment.bounds.lid_velocity = -0.5;

    let report = verlet.update_forces_and_motion(&mut data, &updater, &environment, 0.025);
    assert!(report.lid_changed_particle_velocity);
    assert!(data.velocities[0].y < 0.0);
    assert!(data.center_of_mass_positions[0].y <= environment.bounds.height);
}

#[test]
fn test_pressure_limit_reported_once_per_explosion() {
    let mut tracker = PressureTracker::new();
    let bounds = env(0.0).bounds;
    tracker.set_pressure(2.0);
    assert!(tracker.update(0.0, &bounds, 0.025));
    tracker.reset();
    assert!(!tracker.update(1.0, &bounds, 0.025));
}

#[test]
fn test_exploded_container_releases_escapees() {
    let mut data = data_from(MoleculeKind::Monatomic, &[(15.0, 35.0)], &[]);
    let updater = AtomPositionUpdater::for_kind(MoleculeKind::Monatomic);
    let mut verlet = VerletAlgorithmKind::for_kind(MoleculeKind::Monatomic);
    let mut environment = env(0.0);
    environment.bounds.exploded = true;
    verlet.update_forces_and_motion(&mut data, &updater, &environment, 0.025);
    assert!(!data.inside_container[0]);
}
