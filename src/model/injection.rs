//! Queue of pending molecule injections and the geometry of a new arrival.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

use crate::constants::*;

/// Bounded count of requested injections, drained at most one per tick and
/// never twice within the hold-off time.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionQueue {
    queued: usize,
    time_since_last_injection: f64,
}

impl Default for InjectionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectionQueue {
    /// The hold-off timer starts out expired so the first request is served
    /// on the next tick.
    pub fn new() -> Self {
        Self {
            queued: 0,
            time_since_last_injection: MOLECULE_INJECTION_HOLDOFF_TIME,
        }
    }

    pub fn queued(&self) -> usize {
        self.queued
    }

    /// Queue one more injection. Returns false if the queue is full.
    pub fn request(&mut self) -> bool {
        if self.queued < MAX_MOLECULES_QUEUED_FOR_INJECTION {
            self.queued += 1;
            true
        } else {
            false
        }
    }

    /// Advance the hold-off timer by `dt` seconds and pop one request if
    /// allowed.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.time_since_last_injection += dt;
        if self.queued > 0 && self.time_since_last_injection >= MOLECULE_INJECTION_HOLDOFF_TIME {
            self.queued -= 1;
            self.time_since_last_injection = 0.0;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Initial state of an injected molecule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectedMolecule {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub rotation_rate: f64,
}

/// Injection point in normalized units: near the right wall, a quarter of the
/// way up the unexploded container.
pub fn injection_point(particle_diameter: f64) -> Vector2<f64> {
    Vector2::new(
        PARTICLE_CONTAINER_WIDTH * INJECTION_POINT_HORIZ_PROPORTION / particle_diameter,
        PARTICLE_CONTAINER_INITIAL_HEIGHT * INJECTION_POINT_VERT_PROPORTION / particle_diameter,
    )
}

/// Container height in picometers below which the lid blocks injection.
pub fn injection_height() -> f64 {
    PARTICLE_CONTAINER_INITIAL_HEIGHT * INJECTION_POINT_VERT_PROPORTION
}

/// Random velocity pointing into the container, with a random spin for
/// rotating species.
pub fn sample_injected_molecule(rng: &mut StdRng, particle_diameter: f64, rotating: bool) -> InjectedMolecule {
    let speed = rng.gen_range(MIN_INJECTED_MOLECULE_VELOCITY..=MAX_INJECTED_MOLECULE_VELOCITY);
    let angle = PI + (rng.gen::<f64>() - 0.5) * MAX_INJECTED_MOLECULE_ANGLE;
    let rotation_rate = if rotating {
        rng.gen_range(-PI..=PI)
    } else {
        0.0
    };
    InjectedMolecule {
        position: injection_point(particle_diameter),
        velocity: Vector2::new(angle.cos(), angle.sin()) * speed,
        rotation_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = InjectionQueue::new();
        for _ in 0..MAX_MOLECULES_QUEUED_FOR_INJECTION {
            assert!(queue.request());
        }
        assert!(!queue.request());
        assert_eq!(queue.queued(), MAX_MOLECULES_QUEUED_FOR_INJECTION);
    }

    #[test]
    fn test_drains_one_per_holdoff() {
        let mut queue = InjectionQueue::new();
        queue.request();
        queue.request();
        assert!(queue.tick(0.0));
        assert!(!queue.tick(0.1));
        assert!(!queue.tick(0.1));
        assert!(queue.tick(0.1));
        assert_eq!(queue.queued(), 0);
        assert!(!queue.tick(1.0));
    }

    #[test]
    fn test_injected_velocity_points_inward() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let m = sample_injected_molecule(&mut rng, 300.0, true);
            let speed = m.velocity.norm();
            assert!(speed >= MIN_INJECTED_MOLECULE_VELOCITY - 1e-12);
            assert!(speed <= MAX_INJECTED_MOLECULE_VELOCITY + 1e-12);
            assert!(m.velocity.x < 0.0);
            assert!(m.rotation_rate.abs() <= PI);
        }
    }
}
