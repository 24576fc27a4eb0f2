//! Observer (camera) state and motion integration

use glam::Vec2;

use crate::config::{ObserverConfig, StepMode};
use crate::heightfield::HeightField;
use crate::intent::MotionIntent;
use crate::math::direction;

/// First-person camera flying over a heightfield
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Ground-plane position
    pub position: Vec2,
    /// Camera height in terrain units
    pub elevation: f32,
    /// Heading angle in radians
    pub heading: f32,
    /// Vertical look angle in radians (drives the move/climb coupling)
    pub vertical_look: f32,
    /// Screen row of the horizon, never negative
    pub horizon: f32,
    pub config: ObserverConfig,
}

impl Observer {
    pub fn new(position: Vec2, elevation: f32, heading: f32, horizon: f32, config: ObserverConfig) -> Self {
        log::debug!(
            "Observer initialized at ({}, {}, {}) heading {} horizon {}",
            position.x,
            position.y,
            elevation,
            heading,
            horizon
        );
        Self {
            position,
            elevation,
            heading,
            vertical_look: 0.0,
            horizon: horizon.max(0.0),
            config,
        }
    }

    /// Camera over the middle of `field`, resting on the ground
    pub fn centered(field: &HeightField, heading: f32, horizon: f32, config: ObserverConfig) -> Self {
        let position = Vec2::new(field.width() as f32 / 2.0, field.height() as f32 / 2.0);
        let mut observer = Self::new(position, 0.0, heading, horizon, config);
        observer.settle(field);
        observer
    }

    /// Horizontal field of view in radians
    #[inline]
    pub fn fov(&self) -> f32 {
        self.config.fov
    }

    /// Lowest allowed elevation at the current position
    pub fn floor_elevation(&self, field: &HeightField) -> f32 {
        field.height_at(self.position.x, self.position.y) + self.config.min_clearance
    }

    /// Push the camera up to the clearance floor if it is below it
    pub fn settle(&mut self, field: &HeightField) {
        let floor = self.floor_elevation(field);
        if self.elevation < floor || self.elevation.is_nan() {
            self.elevation = floor;
        }
    }

    /// Integrate one frame of motion, then clamp to the terrain.
    ///
    /// `dt` is in seconds and only used in [`StepMode::DeltaTime`].
    pub fn update(&mut self, intent: &MotionIntent, field: &HeightField, dt: f32) {
        let cfg = self.config;
        let dt = match cfg.step_mode {
            StepMode::PerFrame => 1.0,
            StepMode::DeltaTime if dt.is_finite() => dt.max(0.0),
            StepMode::DeltaTime => 0.0,
        };

        if intent.turn != 0.0 {
            self.heading += intent.turn * cfg.turn_rate * dt;
        }

        if intent.look != 0.0 {
            self.horizon -= intent.look * cfg.horizon_rate * dt;
            self.vertical_look -= intent.look * cfg.look_rate;
        }
        if self.horizon < 0.0 {
            self.horizon = 0.0;
        }

        if intent.forward != 0.0 {
            let step = cfg.move_speed * intent.forward * dt;
            self.position += direction(self.heading) * step;
            self.elevation += libm::sinf(self.vertical_look) * step * cfg.climb_coupling;
        }

        if intent.lift != 0.0 {
            self.elevation += intent.lift * cfg.lift_speed * dt;
        }

        self.settle(field);
    }
}
