//! Renderer and observer tuning
//!
//! The defaults reproduce the reference flyover: a 1200 unit view distance,
//! 700 px height scale, and per-frame camera rates.

use crate::error::{RenderError, RenderResult};

/// Default view distance in world units
pub const MAX_DEPTH: f32 = 1200.0;

/// Default projection scale for terrain heights
pub const HEIGHT_SCALE: f32 = 700.0;

/// Attenuation factor numerator, divided by the view distance
const LIGHT_ATTEN_NUMERATOR: f32 = 3.0;

/// LOD growth numerator, divided by the view distance
const LOD_NUMERATOR: f32 = 18.0;

/// Largest view distance the depth sweep supports in f32 precision
pub const MAX_SUPPORTED_DEPTH: f32 = 1_000_000.0;

/// Minimum distance between the camera and the ground
pub const MIN_CLEARANCE: f32 = 15.0;

/// Depth sweep settings for the column raycaster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastConfig {
    /// Sweep stops once depth reaches this value
    pub max_depth: f32,
    /// Screen-space scale applied to `elevation - height` at depth 1
    pub height_scale: f32,
    /// Distance attenuation factor, `min(1 / (z * light_atten), 1)`
    pub light_atten: f32,
    /// Amount added to the depth step after every slice
    pub lod_factor: f32,
    /// Depth step used for the first slice (may be 0)
    pub initial_step: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self::for_depth(MAX_DEPTH, HEIGHT_SCALE)
    }
}

impl RaycastConfig {
    /// Derive the attenuation and LOD factors from a view distance.
    ///
    /// Distances of 1 or less keep their value (the sweep is then empty) but
    /// derive the factors as if the distance were 1.
    pub fn for_depth(max_depth: f32, height_scale: f32) -> Self {
        let factor_depth = max_depth.max(1.0);
        let lod_factor = LOD_NUMERATOR / factor_depth;
        Self {
            max_depth,
            height_scale,
            light_atten: LIGHT_ATTEN_NUMERATOR / factor_depth,
            lod_factor,
            initial_step: lod_factor,
        }
    }

    /// Same config with a different first step
    pub fn with_initial_step(mut self, initial_step: f32) -> Self {
        self.initial_step = initial_step;
        self
    }

    /// Reject values that would stall or corrupt the depth sweep
    pub fn validate(&self) -> RenderResult<()> {
        if !self.max_depth.is_finite() {
            return Err(RenderError::InvalidConfig("max_depth must be finite"));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(RenderError::InvalidConfig("max_depth exceeds the supported view distance"));
        }
        if !(self.lod_factor.is_finite() && self.lod_factor > 0.0) {
            return Err(RenderError::InvalidConfig("lod_factor must be positive"));
        }
        if !(self.initial_step.is_finite() && self.initial_step >= 0.0) {
            return Err(RenderError::InvalidConfig("initial_step must be non-negative"));
        }
        if !(self.light_atten.is_finite() && self.light_atten > 0.0) {
            return Err(RenderError::InvalidConfig("light_atten must be positive"));
        }
        if !self.height_scale.is_finite() {
            return Err(RenderError::InvalidConfig("height_scale must be finite"));
        }
        Ok(())
    }
}

/// How observer rates are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    /// Rates are per rendered frame; dt is ignored
    #[default]
    PerFrame,
    /// Rates are per second and scaled by dt
    DeltaTime,
}

/// Camera motion rates and constraints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverConfig {
    pub step_mode: StepMode,
    /// Heading change per unit of turn intent
    pub turn_rate: f32,
    /// Vertical look angle change per unit of look intent (never dt-scaled)
    pub look_rate: f32,
    /// Horizon offset change per unit of look intent
    pub horizon_rate: f32,
    /// Ground speed per unit of move intent
    pub move_speed: f32,
    /// Vertical speed per unit of lift intent
    pub lift_speed: f32,
    /// Minimum height above the terrain under the camera
    pub min_clearance: f32,
    /// Scales the climb/dive produced by moving while looking up or down.
    /// 1.0 keeps the flight-style coupling, 0.0 removes it.
    pub climb_coupling: f32,
    /// Horizontal field of view in radians
    pub fov: f32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::per_frame()
    }
}

impl ObserverConfig {
    /// Frame-locked rates
    pub const fn per_frame() -> Self {
        Self {
            step_mode: StepMode::PerFrame,
            turn_rate: 0.02,
            look_rate: 0.01,
            horizon_rate: 5.0,
            move_speed: 6.0,
            lift_speed: 6.0,
            min_clearance: MIN_CLEARANCE,
            climb_coupling: 1.0,
            fov: core::f32::consts::FRAC_PI_2,
        }
    }

    /// Frame-rate independent rates, in units per second
    pub const fn delta_time() -> Self {
        Self {
            step_mode: StepMode::DeltaTime,
            turn_rate: 0.6,
            look_rate: 0.01,
            horizon_rate: 60.0,
            move_speed: 400.0,
            lift_speed: 188.0,
            min_clearance: MIN_CLEARANCE,
            climb_coupling: 1.0,
            fov: core::f32::consts::FRAC_PI_2,
        }
    }

    pub fn with_climb_coupling(mut self, coupling: f32) -> Self {
        self.climb_coupling = coupling;
        self
    }
}
