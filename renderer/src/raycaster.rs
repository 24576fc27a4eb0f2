//! Column raycaster
//!
//! Renders a heightfield by marching one ray per screen column from the
//! camera outward. At each depth slice the slice endpoints are interpolated
//! across the screen, every column samples the terrain, projects the height to
//! a screen row, and draws the part of the column that nearer slices have not
//! already covered. The per-column horizon buffer only ever moves up, so each
//! pixel is written at most once per frame.
//!
//! The depth step grows by `lod_factor` after every slice, so distant terrain
//! is sampled more sparsely in step with its shrinking on-screen footprint.

use core::mem;

use crate::config::RaycastConfig;
use crate::error::RenderResult;
use crate::framebuffer::{ColumnTarget, FrameBuffer, HorizonBuffer};
use crate::heightfield::HeightField;
use crate::math::direction;
use crate::observer::Observer;

/// Counters from one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Depth slices processed
    pub depth_steps: u32,
    /// Heightfield samples taken
    pub samples: u64,
    /// Vertical runs drawn
    pub runs: u64,
    /// Sweep stopped because every column reached the top of the screen
    pub early_exit: bool,
}

/// One depth slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStep {
    pub z: f32,
    /// Distance to the next slice
    pub dz: f32,
}

/// Depth slices from z = 1 up to (excluding) the view distance.
///
/// Steps that would not advance `z` (a zero first step) are skipped, so the
/// yielded depths are strictly increasing. The sweep ends early once f32
/// precision can no longer grow either `z` or the step.
#[derive(Debug, Clone)]
pub struct DepthSweep {
    z: f32,
    dz: f32,
    lod_factor: f32,
    max_depth: f32,
    exhausted: bool,
}

impl DepthSweep {
    pub fn new(config: &RaycastConfig) -> Self {
        Self {
            z: 1.0,
            dz: config.initial_step,
            lod_factor: config.lod_factor,
            max_depth: config.max_depth,
            exhausted: false,
        }
    }
}

impl Iterator for DepthSweep {
    type Item = DepthStep;

    fn next(&mut self) -> Option<DepthStep> {
        if self.exhausted || !(self.z < self.max_depth) {
            return None;
        }
        let z = self.z;
        loop {
            let dz = self.dz;
            let next_dz = dz + self.lod_factor;
            self.z += dz;
            self.dz = next_dz;
            if self.z > z {
                return Some(DepthStep { z, dz });
            }
            // Neither z nor the step can grow any more
            if !(next_dz > dz) {
                self.exhausted = true;
                return Some(DepthStep { z, dz });
            }
        }
    }
}

/// Distance attenuation: saturates at 1 near the camera, then decays as 1/z
#[inline]
pub fn attenuation(z: f32, light_atten: f32) -> f32 {
    (1.0 / (z * light_atten)).min(1.0)
}

#[inline]
fn shade(channel: u8, atten: f32) -> u8 {
    (channel as f32 * atten) as u8
}

/// Heightfield renderer
#[derive(Debug, Clone)]
pub struct ColumnRaycaster {
    config: RaycastConfig,
}

impl ColumnRaycaster {
    pub fn new(config: RaycastConfig) -> RenderResult<Self> {
        config.validate()?;
        log::debug!(
            "ColumnRaycaster: max depth {}, height scale {}, lod {}",
            config.max_depth,
            config.height_scale,
            config.lod_factor
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }

    /// Depth slices this raycaster visits each frame
    pub fn depth_steps(&self) -> DepthSweep {
        DepthSweep::new(&self.config)
    }

    /// Render a full frame into `frame`, using its horizon buffer.
    ///
    /// Pixels above the final horizon are left untouched, so clear the frame
    /// first if a background is wanted.
    pub fn render(&self, observer: &Observer, field: &HeightField, frame: &mut FrameBuffer) -> RenderStats {
        let height = frame.height();
        let mut horizon = mem::take(&mut frame.horizon);
        horizon.reset(height);
        let stats = self.sweep(observer, field, &mut horizon, frame);
        frame.horizon = horizon;
        stats
    }

    /// Core sweep over an explicit horizon buffer and run target.
    ///
    /// The screen width is `horizon.len()`; the horizon must already be
    /// reset to the screen height.
    pub fn sweep<T: ColumnTarget + ?Sized>(
        &self,
        observer: &Observer,
        field: &HeightField,
        horizon: &mut HorizonBuffer,
        target: &mut T,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let width = horizon.len();
        if width == 0 {
            return stats;
        }

        let half_fov = observer.fov() / 2.0;
        let left_dir = direction(observer.heading - half_fov);
        let right_dir = direction(observer.heading + half_fov);
        let inv_width = 1.0 / width as f32;

        let mut open = horizon.as_slice().iter().filter(|&&row| row > 0).count();

        for step in self.depth_steps() {
            if open == 0 {
                stats.early_exit = true;
                break;
            }
            stats.depth_steps += 1;

            let z = step.z;
            let p_left = observer.position + left_dir * z;
            let p_right = observer.position + right_dir * z;
            let delta = (p_right - p_left) * inv_width;

            let inv_z = (1.0 / z) * self.config.height_scale;
            let atten = attenuation(z, self.config.light_atten);

            for i in 0..width {
                let world = p_left + delta * i as f32;
                let sample = field.sample(world.x, world.y);
                stats.samples += 1;

                // Flooring gives the stepped silhouette
                let screen_y =
                    libm::floorf((observer.elevation - sample.height as f32) * inv_z + observer.horizon) as i32;

                let limit = horizon.get(i);
                // A closed column has nothing left to draw
                if screen_y >= limit || limit <= 0 {
                    continue;
                }

                let top = screen_y.max(0);
                target.draw_vertical_run(
                    i as i32,
                    top,
                    limit,
                    shade(sample.r, atten),
                    shade(sample.g, atten),
                    shade(sample.b, atten),
                );
                horizon.set(i, top);
                stats.runs += 1;
                if top == 0 {
                    open -= 1;
                }
            }
        }

        stats
    }
}
