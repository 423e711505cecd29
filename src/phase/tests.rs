use super::*;
use crate::constants::PARTICLE_CONTAINER_WIDTH;
use crate::position_updater::AtomPositionUpdater;
use crate::substance::Substance;
use approx::*;
use rand::SeedableRng;

fn bounds() -> ContainerBounds {
    ContainerBounds {
        width: PARTICLE_CONTAINER_WIDTH / 362.0,
        height: PARTICLE_CONTAINER_WIDTH / 362.0,
        exploded: false,
        lid_velocity: 0.0,
    }
}

fn filled(kind: MoleculeKind, n: usize) -> MoleculeDataSet {
    let mut data = MoleculeDataSet::new(kind, kind.max_molecules());
    let offsets = kind.atom_offsets();
    for i in 0..n {
        let com = Vector2::new(3.0 + i as f64 * 0.01, 3.0);
        let atoms: Vec<_> = offsets.iter().map(|o| com + o).collect();
        data.add_molecule(&atoms, com, Vector2::new(0.3, -0.2), 0.1, true)
            .unwrap();
    }
    data
}

fn change(kind: MoleculeKind, n: usize, phase: PhaseState) -> (MoleculeDataSet, PhaseChange) {
    let snapshots = LiquidSnapshots::load().unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let mut data = filled(kind, n);
    let result = PhaseStateChanger::for_kind(kind).set_phase(
        PhaseContext {
            data: &mut data,
            bounds: bounds(),
            snapshots: &snapshots,
            rng: &mut rng,
        },
        phase,
    );
    (data, result)
}

#[test]
fn test_embedded_snapshots_are_valid() {
    let snapshots = LiquidSnapshots::load().unwrap();
    for kind in [MoleculeKind::Monatomic, MoleculeKind::Diatomic, MoleculeKind::Water] {
        let snapshot = snapshots.get(kind);
        assert_eq!(snapshot.kind, kind);
        assert_eq!(snapshot.len(), kind.standard_molecule_count());
        // Single atoms must fit the narrowest container (largest adjustable sigma).
        let diameter = match kind {
            MoleculeKind::Monatomic => crate::constants::MAX_SIGMA,
            _ => Substance::Water.particle_diameter(0.0),
        };
        let half_width = PARTICLE_CONTAINER_WIDTH / diameter / 2.0 - 0.5;
        for m in &snapshot.molecules {
            assert!(m.position[0].abs() < half_width);
            assert!(m.position[1] > 0.0);
        }
    }
}

#[test]
fn test_snapshot_validation_errors() {
    let text = "version: 2\nkind: monatomic\nmolecules: []\n";
    assert!(matches!(
        LiquidSnapshot::parse(text, MoleculeKind::Monatomic),
        Err(SnapshotError::UnsupportedVersion { found: 2, .. })
    ));

    let text = "version: 1\nkind: water\nmolecules: []\n";
    assert!(matches!(
        LiquidSnapshot::parse(text, MoleculeKind::Monatomic),
        Err(SnapshotError::WrongKind { .. })
    ));

    let text = "version: 1\nkind: water\nmolecules:\n  - { position: [0.0, 1.0], velocity: [0.0, 0.0] }\n";
    assert!(matches!(
        LiquidSnapshot::parse(text, MoleculeKind::Water),
        Err(SnapshotError::CountMismatch { found: 1, expected: 64 })
    ));

    assert!(matches!(
        LiquidSnapshot::parse("version: [", MoleculeKind::Water),
        Err(SnapshotError::Parse(_))
    ));
}

#[test]
fn test_snapshot_rejects_non_finite_values() {
    let mut snapshot = LiquidSnapshot::embedded(MoleculeKind::Diatomic).unwrap();
    snapshot.molecules[7].velocity[1] = f64::NAN;
    assert!(matches!(
        snapshot.validate(MoleculeKind::Diatomic),
        Err(SnapshotError::NonFinite { index: 7 })
    ));
}

#[test]
fn test_solid_lattice_monatomic() {
    let (data, result) = change(MoleculeKind::Monatomic, 10, PhaseState::Solid);
    assert_eq!(result.temperature_set_point, SOLID_TEMPERATURE);
    assert_eq!(result.relaxation_substeps, 0);
    assert_eq!(data.number_of_molecules(), 10);

    // 4 per row, rows one spacing apart, centered on the container.
    let spacing = monatomic::MONATOMIC_LATTICE_SPACING;
    let p = &data.center_of_mass_positions;
    assert_relative_eq!(p[1].x - p[0].x, spacing, epsilon = 1e-12);
    assert_relative_eq!(p[4].y - p[0].y, spacing, epsilon = 1e-12);
    assert_relative_eq!(p[0].y, spacing, epsilon = 1e-12);
    assert_relative_eq!((p[0].x + p[3].x) / 2.0, bounds().width / 2.0, epsilon = 1e-12);
    assert!(data.velocities.iter().all(|v| v.norm() == 0.0));
}

#[test]
fn test_solid_water_alternates_orientation() {
    let (data, result) = change(MoleculeKind::Water, 9, PhaseState::Solid);
    assert_eq!(result.relaxation_substeps, 10);
    assert_eq!(data.rotation_angles[0], 0.0);
    assert_relative_eq!(data.rotation_angles[1], std::f64::consts::PI);
    assert_relative_eq!(data.rotation_angles[3], std::f64::consts::PI);
    assert!(data.rotation_rates.iter().all(|&w| w == 0.0));
}

#[test]
fn test_solid_diatomic_neighbors_do_not_overlap() {
    let (mut data, _) = change(MoleculeKind::Diatomic, 16, PhaseState::Solid);
    AtomPositionUpdater::for_kind(MoleculeKind::Diatomic).update_atom_positions(&mut data, &bounds());
    let atoms = &data.atom_positions;
    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            if i / 2 != j / 2 {
                assert!((atoms[i] - atoms[j]).norm() > 1.0);
            }
        }
    }
}

#[test]
fn test_liquid_loads_snapshot() {
    let (data, result) = change(MoleculeKind::Diatomic, 64, PhaseState::Liquid);
    assert_eq!(result.temperature_set_point, LIQUID_TEMPERATURE);
    assert_eq!(result.relaxation_substeps, POST_PHASE_CHANGE_SUBSTEPS);

    let snapshot = LiquidSnapshot::embedded(MoleculeKind::Diatomic).unwrap();
    let first = &snapshot.molecules[0];
    assert_relative_eq!(
        data.center_of_mass_positions[0].x,
        bounds().width / 2.0 + first.position[0]
    );
    assert_relative_eq!(data.rotation_rates[0], first.rotation_rate);
}

#[test]
#[should_panic(expected = "standard molecule count")]
fn test_liquid_requires_standard_count() {
    change(MoleculeKind::Monatomic, 10, PhaseState::Liquid);
}

#[test]
fn test_gas_stays_inside_and_has_target_speed() {
    let (data, result) = change(MoleculeKind::Water, 40, PhaseState::Gas);
    assert_eq!(result.temperature_set_point, GAS_TEMPERATURE);
    let b = bounds();
    for p in &data.center_of_mass_positions {
        assert!(b.contains(p.x, p.y));
    }
    let speed = (2.0 * GAS_TEMPERATURE / data.molecule_mass()).sqrt();
    for v in &data.velocities {
        assert_relative_eq!(v.norm(), speed, epsilon = 1e-12);
    }
    assert_relative_eq!(data.temperature_from_kinetic_energy(), GAS_TEMPERATURE, epsilon = 1e-12);
}

#[test]
fn test_phase_changes_keep_molecule_count() {
    for kind in [MoleculeKind::Monatomic, MoleculeKind::Diatomic, MoleculeKind::Water] {
        let n = kind.standard_molecule_count();
        for phase in [PhaseState::Solid, PhaseState::Liquid, PhaseState::Gas] {
            let (data, _) = change(kind, n, phase);
            assert_eq!(data.number_of_molecules(), n);
            assert!(data.check_invariants());
        }
    }
}
