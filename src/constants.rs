//! Model-wide tuning constants.
//!
//! Distances are normalized so that one particle diameter is 1.0, energies so
//! that the Lennard-Jones well depth is 1.0, and Boltzmann's constant is 1.0.
//! Container dimensions are kept in picometers and normalized on use.

// Temperature set points for the scripted phases.
pub const SOLID_TEMPERATURE: f64 = 0.15;
pub const LIQUID_TEMPERATURE: f64 = 0.34;
pub const GAS_TEMPERATURE: f64 = 1.0;
pub const INITIAL_TEMPERATURE: f64 = SOLID_TEMPERATURE;
pub const MAX_TEMPERATURE: f64 = 50.0;
pub const MIN_TEMPERATURE: f64 = 0.0001;
pub const APPROACHING_ABSOLUTE_ZERO_TEMPERATURE: f64 = SOLID_TEMPERATURE * 0.05;

// Container, in picometers.
pub const PARTICLE_CONTAINER_WIDTH: f64 = 10_000.0;
pub const PARTICLE_CONTAINER_INITIAL_HEIGHT: f64 = 10_000.0;
pub const PARTICLE_CONTAINER_MIN_HEIGHT: f64 = 1_500.0;
pub const PARTICLE_CONTAINER_EXPLODED_MAX_HEIGHT: f64 = 10.0 * PARTICLE_CONTAINER_INITIAL_HEIGHT;
pub const MAX_PER_TICK_CONTAINER_SHRINKAGE: f64 = 50.0;
pub const MAX_PER_TICK_CONTAINER_EXPANSION: f64 = 200.0;
pub const MAX_PER_TICK_CONTAINER_EXPANSION_EXPLODED: f64 = 1_000.0;

// Time.
pub const MODEL_TIME_STEP: f64 = 0.025;
pub const TIME_SPEEDUP_SCALE_FACTOR: f64 = 9.0;
pub const NOMINAL_FRAME_DT: f64 = 1.0 / 60.0;
pub const MAX_FRAME_DT: f64 = 0.25;

// Capacity.
pub const MAX_NUM_ATOMS: usize = 500;

// Injection.
pub const MAX_MOLECULES_QUEUED_FOR_INJECTION: usize = 3;
pub const MOLECULE_INJECTION_HOLDOFF_TIME: f64 = 0.25;
pub const INJECTION_POINT_HORIZ_PROPORTION: f64 = 0.95;
pub const INJECTION_POINT_VERT_PROPORTION: f64 = 0.25;
pub const MIN_INJECTED_MOLECULE_VELOCITY: f64 = 0.5;
pub const MAX_INJECTED_MOLECULE_VELOCITY: f64 = 2.0;
pub const MAX_INJECTED_MOLECULE_ANGLE: f64 = std::f64::consts::PI * 0.8;

// Walls and pressure.
pub const WALL_DISTANCE_THRESHOLD: f64 = 1.122_462_048_309_373;
pub const MIN_WALL_DISTANCE: f64 = 0.5;
pub const ESCAPE_MARGIN: f64 = 2.0;
pub const PRESSURE_CALC_WEIGHTING: f64 = 0.999;
pub const EXPLOSION_PRESSURE: f64 = 1.05;
pub const PRESSURE_TO_ATMOSPHERES: f64 = 200.0;

// Gravity.
pub const INITIAL_GRAVITATIONAL_ACCEL: f64 = 0.045;
pub const MAX_GRAVITATIONAL_ACCEL: f64 = 0.4;

// Thermostat policy.
pub const TEMPERATURE_CLOSENESS_RANGE: f64 = 0.15;
pub const COMFORTABLE_TEMPERATURE_LOW: f64 = 0.12;
pub const COMFORTABLE_TEMPERATURE_HIGH: f64 = 10.0;
pub const TEMPERATURE_CHANGE_RATE: f64 = 1.5;

// Phase changes.
pub const POST_PHASE_CHANGE_SUBSTEPS: usize = 20;

// Adjustable atom, epsilon in Kelvin and sigma in picometers.
pub const MIN_EPSILON: f64 = 20.0;
pub const MAX_EPSILON: f64 = 450.0;
pub const DEFAULT_EPSILON: f64 = 111.84;
pub const MIN_SIGMA: f64 = 250.0;
pub const MAX_SIGMA: f64 = 450.0;
pub const DEFAULT_SIGMA: f64 = 330.0;
