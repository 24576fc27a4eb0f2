//! Render Loop
//!
//! One viewer instance: state machine, render context and the intent slot
//! the input side publishes into. The host calls [`Viewer::tick`] once per
//! display refresh.

use std::sync::Arc;

use voxel_renderer::{
    DisplaySink, FrameBuffer, HeightField, IntentSlot, Observer, RenderContext, RenderError, RenderResult,
    RenderStats,
};

use crate::state_machine::{SetupReason, StateTransition, ViewerState, ViewerStateMachine};
use crate::ViewerConfig;

/// Viewer instance
pub struct Viewer<S: DisplaySink> {
    config: ViewerConfig,
    state: ViewerStateMachine,
    context: RenderContext<S>,
    intents: Arc<IntentSlot>,
}

impl<S: DisplaySink> Viewer<S> {
    /// Create a viewer; it renders nothing until terrain is attached
    pub fn new(config: ViewerConfig, sink: S) -> RenderResult<Self> {
        let context = RenderContext::new(config.context_config(), sink)?;
        Ok(Self {
            config,
            state: ViewerStateMachine::new(),
            context,
            intents: Arc::new(IntentSlot::new()),
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Get current state
    pub fn state(&self) -> &ViewerState {
        self.state.state()
    }

    /// Slot for input producers (other threads included)
    pub fn intents(&self) -> Arc<IntentSlot> {
        Arc::clone(&self.intents)
    }

    /// Attach terrain and start running.
    ///
    /// Returns false and leaves the context untouched when the viewer is
    /// already running or stopped.
    pub fn attach_terrain(&mut self, terrain: Arc<HeightField>) -> bool {
        if !self.terrain_accepted() {
            return false;
        }
        self.context.attach_terrain(terrain);
        self.state.apply_transition(StateTransition::TerrainLoaded)
    }

    /// Attach terrain with a caller-placed observer
    pub fn attach_terrain_with(&mut self, terrain: Arc<HeightField>, observer: Observer) -> bool {
        if !self.terrain_accepted() {
            return false;
        }
        self.context.attach_terrain_with(terrain, observer);
        self.state.apply_transition(StateTransition::TerrainLoaded)
    }

    fn terrain_accepted(&self) -> bool {
        let accepted = self.state.accepts(&StateTransition::TerrainLoaded);
        if !accepted {
            log::warn!("Ignoring terrain in state {}", self.state.state().name());
        }
        accepted
    }

    /// Record that terrain could not be obtained
    pub fn terrain_unavailable(&mut self, reason: SetupReason) -> bool {
        self.state.apply_transition(StateTransition::TerrainUnavailable(reason))
    }

    /// Stop the viewer
    pub fn stop(&mut self) {
        self.state.apply_transition(StateTransition::Stop);
    }

    /// Render one frame at `timestamp_ms`.
    ///
    /// Returns `Ok(None)` once stopped and `TerrainNotReady` before terrain
    /// is attached.
    pub fn tick(&mut self, timestamp_ms: f64) -> RenderResult<Option<RenderStats>> {
        match self.state.state() {
            ViewerState::Running => {}
            ViewerState::Stopped => return Ok(None),
            ViewerState::AwaitingTerrain | ViewerState::Setup { .. } => return Err(RenderError::TerrainNotReady),
        }

        let intent = self.intents.snapshot();
        let stats = self.context.tick(intent, timestamp_ms)?;
        self.state.record_frame();
        Ok(Some(stats))
    }

    /// Get frame count
    pub fn frame_count(&self) -> u64 {
        self.state.frame_count()
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.context.frame()
    }

    pub fn context(&self) -> &RenderContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext<S> {
        &mut self.context
    }

    /// Get screen dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, InputState, Key};
    use voxel_renderer::{NullSink, TerrainSample};

    fn small_config() -> ViewerConfig {
        ViewerConfig { width: 48, height: 30, max_depth: 300.0, ..Default::default() }
    }

    fn terrain() -> Arc<HeightField> {
        Arc::new(HeightField::from_fn(64, 64, |x, y| TerrainSample::new(40, 120, 40, ((x * 3 + y) % 50) as u8)).unwrap())
    }

    #[test]
    fn test_refuses_to_tick_without_terrain() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        assert_eq!(viewer.tick(0.0), Err(RenderError::TerrainNotReady));

        viewer.terrain_unavailable(SetupReason::NoHeightmap);
        assert_eq!(viewer.state().name(), "setup");
        assert_eq!(viewer.tick(16.0), Err(RenderError::TerrainNotReady));
        assert_eq!(viewer.frame_count(), 0);
        assert_eq!(viewer.context().presenter().stats().frames, 0);
    }

    #[test]
    fn test_setup_then_terrain_runs() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        viewer.terrain_unavailable(SetupReason::LoadFailed("corrupt".into()));
        assert!(viewer.attach_terrain(terrain()));

        let stats = viewer.tick(0.0).unwrap().unwrap();
        assert!(stats.runs > 0);
        assert_eq!(viewer.frame_count(), 1);
    }

    #[test]
    fn test_input_moves_camera() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        viewer.attach_terrain(terrain());
        let start = viewer.context().observer().unwrap().position;

        let slot = viewer.intents();
        let mut input = InputState::new();
        input.handle(InputEvent::KeyDown(Key::W), &slot);
        for i in 0..5 {
            viewer.tick(i as f64 * 16.0).unwrap();
        }
        let moved = viewer.context().observer().unwrap().position;
        // Per-frame mode: 5 frames at 6 units
        assert!((moved.distance(start) - 30.0).abs() < 1e-3);

        input.handle(InputEvent::FocusLost, &slot);
        viewer.tick(80.0).unwrap();
        assert_eq!(viewer.context().observer().unwrap().position, moved);
    }

    #[test]
    fn test_input_from_another_thread() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        viewer.attach_terrain(terrain());
        let heading = viewer.context().observer().unwrap().heading;

        let slot = viewer.intents();
        std::thread::spawn(move || {
            let mut input = InputState::new();
            input.handle(InputEvent::KeyDown(Key::D), &slot);
        })
        .join()
        .unwrap();

        viewer.tick(0.0).unwrap();
        let turned = viewer.context().observer().unwrap().heading;
        assert!((turned - (heading + 2.3 * 0.02)).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_viewer_renders_nothing() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        viewer.attach_terrain(terrain());
        viewer.tick(0.0).unwrap();
        viewer.stop();
        assert_eq!(viewer.tick(16.0), Ok(None));
        assert_eq!(viewer.frame_count(), 1);
        assert_eq!(viewer.dimensions(), (48, 30));
    }

    #[test]
    fn test_stopped_viewer_ignores_terrain() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        viewer.stop();
        assert!(!viewer.attach_terrain(terrain()));
        assert!(!viewer.context().is_ready());
        assert!(viewer.context().observer().is_none());
    }

    #[test]
    fn test_running_viewer_keeps_its_terrain() {
        let mut viewer = Viewer::new(small_config(), NullSink).unwrap();
        viewer.attach_terrain(terrain());
        let before = viewer.context().observer().cloned();

        let other = Arc::new(HeightField::uniform(8, 8, TerrainSample::new(1, 1, 1, 0)).unwrap());
        assert!(!viewer.attach_terrain(other));
        assert_eq!(viewer.context().terrain().map(|t| t.width()), Some(64));
        assert_eq!(viewer.context().observer().cloned(), before);
    }
}
