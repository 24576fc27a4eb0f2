//! Per-view render state
//!
//! A [`RenderContext`] owns everything one view needs: observer, raycaster,
//! framebuffer and presenter, plus the terrain once it is available. Several
//! contexts can coexist (split views, tests) without sharing any state.

use alloc::sync::Arc;

use crate::config::{ObserverConfig, RaycastConfig};
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::{Background, FrameBuffer};
use crate::heightfield::HeightField;
use crate::intent::MotionIntent;
use crate::observer::Observer;
use crate::presenter::{DisplaySink, Presenter};
use crate::raycaster::{ColumnRaycaster, RenderStats};

/// Initial heading of a fresh observer, in radians
pub const DEFAULT_HEADING: f32 = 6.0;

/// Settings needed to build a context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: u32,
    pub background: Background,
    pub raycast: RaycastConfig,
    pub observer: ObserverConfig,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            target_fps: crate::presenter::TARGET_FPS,
            background: Background::DUSK,
            raycast: RaycastConfig::default(),
            observer: ObserverConfig::default(),
        }
    }
}

/// One independent view onto a heightfield
pub struct RenderContext<S: DisplaySink> {
    config: ContextConfig,
    raycaster: ColumnRaycaster,
    frame: FrameBuffer,
    presenter: Presenter<S>,
    terrain: Option<Arc<HeightField>>,
    observer: Option<Observer>,
    last_timestamp: Option<f64>,
    last_stats: RenderStats,
}

impl<S: DisplaySink> RenderContext<S> {
    /// Validate the configuration and allocate the framebuffer
    pub fn new(config: ContextConfig, sink: S) -> RenderResult<Self> {
        let raycaster = ColumnRaycaster::new(config.raycast)?;
        let frame = FrameBuffer::new(config.width, config.height)?.with_background(config.background);
        Ok(Self {
            config,
            raycaster,
            frame,
            presenter: Presenter::with_target_fps(sink, config.target_fps),
            terrain: None,
            observer: None,
            last_timestamp: None,
            last_stats: RenderStats::default(),
        })
    }

    /// Attach terrain and place the observer over its centre
    pub fn attach_terrain(&mut self, terrain: Arc<HeightField>) {
        let horizon = self.config.height as f32 / 3.0;
        let observer = Observer::centered(&terrain, DEFAULT_HEADING, horizon, self.config.observer);
        log::info!(
            "Terrain attached ({}x{}), observer at ({}, {}, {})",
            terrain.width(),
            terrain.height(),
            observer.position.x,
            observer.position.y,
            observer.elevation
        );
        self.observer = Some(observer);
        self.terrain = Some(terrain);
        self.last_timestamp = None;
    }

    /// Attach terrain with an explicit observer
    pub fn attach_terrain_with(&mut self, terrain: Arc<HeightField>, mut observer: Observer) {
        observer.settle(&terrain);
        self.observer = Some(observer);
        self.terrain = Some(terrain);
        self.last_timestamp = None;
    }

    pub fn is_ready(&self) -> bool {
        self.terrain.is_some()
    }

    /// Run one frame: integrate motion, render, present.
    ///
    /// `dt` comes from the previous timestamp and is 0 on the first frame.
    /// The intent is clamped first, so callers may pass raw values.
    pub fn tick(&mut self, intent: MotionIntent, timestamp_ms: f64) -> RenderResult<RenderStats> {
        let (Some(terrain), Some(observer)) = (self.terrain.as_deref(), self.observer.as_mut()) else {
            return Err(RenderError::TerrainNotReady);
        };

        let dt = match self.last_timestamp {
            Some(prev) if timestamp_ms > prev => ((timestamp_ms - prev) / 1000.0) as f32,
            _ => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        observer.update(&intent.clamped(), terrain, dt);

        self.frame.clear();
        let stats = self.raycaster.render(observer, terrain, &mut self.frame);
        self.presenter.present(&self.frame, timestamp_ms);

        self.last_stats = stats;
        Ok(stats)
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    pub fn observer_mut(&mut self) -> Option<&mut Observer> {
        self.observer.as_mut()
    }

    pub fn terrain(&self) -> Option<&HeightField> {
        self.terrain.as_deref()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn presenter(&self) -> &Presenter<S> {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut Presenter<S> {
        &mut self.presenter
    }

    /// Stats of the most recent frame
    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }
}
