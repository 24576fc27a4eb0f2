//! Terrain Viewer Application
//!
//! Flies a camera over a heightmap using the voxel-space renderer.
//! This crate provides the input mapping, terrain loading, viewer state
//! machine and render loop; `main.rs` wires them to the command line.

pub mod export;
pub mod input;
pub mod render_loop;
pub mod state_machine;
pub mod terrain_source;

pub use input::{InputEvent, InputState, Key, MouseButton};
pub use render_loop::Viewer;
pub use state_machine::{SetupReason, StateTransition, ViewerState, ViewerStateMachine};
pub use terrain_source::{HeightChannel, PngHeightmap};

use std::path::PathBuf;

use voxel_renderer::{Background, ContextConfig, ObserverConfig, RaycastConfig, StepMode};

/// Configuration for the viewer
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Screen width
    pub width: u32,
    /// Screen height
    pub height: u32,
    /// Target frames per second
    pub target_fps: u32,
    /// Heightmap PNG
    pub map: Option<PathBuf>,
    /// Which image channel holds the height
    pub height_channel: HeightChannel,
    /// Frames to render in a headless run
    pub frames: u64,
    /// Where to write the last frame
    pub output: Option<PathBuf>,
    /// Sky painted before each frame
    pub background: Background,
    /// Per-frame or delta-time camera rates
    pub step_mode: StepMode,
    /// Far plane
    pub max_depth: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            target_fps: 60,
            map: None,
            height_channel: HeightChannel::Alpha,
            frames: 120,
            output: None,
            background: Background::DUSK,
            step_mode: StepMode::PerFrame,
            max_depth: voxel_renderer::config::MAX_DEPTH,
        }
    }
}

impl ViewerConfig {
    /// Renderer settings for one view
    pub fn context_config(&self) -> ContextConfig {
        let observer = match self.step_mode {
            StepMode::PerFrame => ObserverConfig::per_frame(),
            StepMode::DeltaTime => ObserverConfig::delta_time(),
        };
        ContextConfig {
            width: self.width as usize,
            height: self.height as usize,
            target_fps: self.target_fps,
            background: self.background,
            raycast: RaycastConfig::for_depth(self.max_depth, voxel_renderer::config::HEIGHT_SCALE),
            observer,
        }
    }

    /// Milliseconds between synthetic frame timestamps
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps.max(1) as f64
    }
}
