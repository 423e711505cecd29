//! Container geometry and the rate-limited lid.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Normalized container walls as seen by the kernels for one substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    pub width: f64,
    pub height: f64,
    pub exploded: bool,
    /// Lid velocity in normalized units per model time, negative when moving down.
    pub lid_velocity: f64,
}

impl ContainerBounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height
    }
}

/// Container height in picometers, moved toward a target at a bounded rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    height: f64,
    target_height: f64,
    /// Picometers per model time unit, from the last resize.
    lid_velocity: f64,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        Self {
            height: PARTICLE_CONTAINER_INITIAL_HEIGHT,
            target_height: PARTICLE_CONTAINER_INITIAL_HEIGHT,
            lid_velocity: 0.0,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn target_height(&self) -> f64 {
        self.target_height
    }

    pub fn lid_velocity(&self) -> f64 {
        self.lid_velocity
    }

    pub fn width(&self) -> f64 {
        PARTICLE_CONTAINER_WIDTH
    }

    pub fn set_target_height(&mut self, height: f64) {
        self.target_height = height.clamp(PARTICLE_CONTAINER_MIN_HEIGHT, PARTICLE_CONTAINER_INITIAL_HEIGHT);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Restore a previously captured height and lid velocity.
    pub fn restore(&mut self, height: f64, lid_velocity: f64) {
        self.height = height;
        self.target_height = height.min(PARTICLE_CONTAINER_INITIAL_HEIGHT);
        self.lid_velocity = lid_velocity;
    }

    /// Move the lid one tick toward its target. Returns true if it moved.
    ///
    /// While exploded the lid flies upward until the exploded maximum.
    pub fn resize(&mut self, exploded: bool, model_dt: f64) -> bool {
        let previous = self.height;
        if exploded {
            self.height = (self.height + MAX_PER_TICK_CONTAINER_EXPANSION_EXPLODED)
                .min(PARTICLE_CONTAINER_EXPLODED_MAX_HEIGHT);
        } else if self.target_height < self.height {
            self.height = (self.height - MAX_PER_TICK_CONTAINER_SHRINKAGE).max(self.target_height);
        } else if self.target_height > self.height {
            self.height = (self.height + MAX_PER_TICK_CONTAINER_EXPANSION).min(self.target_height);
        }

        let change = self.height - previous;
        self.lid_velocity = if model_dt > 0.0 { change / model_dt } else { 0.0 };
        change != 0.0
    }

    pub fn bounds(&self, particle_diameter: f64, exploded: bool) -> ContainerBounds {
        ContainerBounds {
            width: PARTICLE_CONTAINER_WIDTH / particle_diameter,
            height: self.height / particle_diameter,
            exploded,
            lid_velocity: self.lid_velocity / particle_diameter,
        }
    }
}
