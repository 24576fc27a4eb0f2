//! Viewer State Machine
//!
//! Tracks whether terrain is available. Without a usable heightmap the viewer
//! parks in `Setup` until terrain is supplied some other way.

/// Why the viewer fell back to setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupReason {
    /// No heightmap was configured
    NoHeightmap,
    /// The heightmap could not be read or decoded
    LoadFailed(String),
}

/// Top-level viewer state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerState {
    /// Waiting for the heightmap to load
    #[default]
    AwaitingTerrain,
    /// No usable terrain; a generated or replacement field is needed
    Setup { reason: SetupReason },
    /// Rendering frames
    Running,
    /// Shut down, no further frames
    Stopped,
}

impl ViewerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ViewerState::Running)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewerState::AwaitingTerrain => "awaiting-terrain",
            ViewerState::Setup { .. } => "setup",
            ViewerState::Running => "running",
            ViewerState::Stopped => "stopped",
        }
    }
}

/// State transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTransition {
    TerrainLoaded,
    TerrainUnavailable(SetupReason),
    Stop,
}

/// Viewer state plus frame bookkeeping
#[derive(Debug, Clone, Default)]
pub struct ViewerStateMachine {
    state: ViewerState,
    frame_count: u64,
}

impl ViewerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn next_state(&self, transition: StateTransition) -> Option<ViewerState> {
        match (&self.state, transition) {
            (ViewerState::Stopped, _) => None,
            (_, StateTransition::Stop) => Some(ViewerState::Stopped),
            (ViewerState::AwaitingTerrain | ViewerState::Setup { .. }, StateTransition::TerrainLoaded) => {
                Some(ViewerState::Running)
            }
            (ViewerState::AwaitingTerrain, StateTransition::TerrainUnavailable(reason)) => {
                Some(ViewerState::Setup { reason })
            }
            _ => None,
        }
    }

    /// Whether `transition` applies to the current state
    pub fn accepts(&self, transition: &StateTransition) -> bool {
        self.next_state(transition.clone()).is_some()
    }

    /// Apply a transition. Returns false (state unchanged) when it does not
    /// apply to the current state.
    pub fn apply_transition(&mut self, transition: StateTransition) -> bool {
        match self.next_state(transition) {
            Some(state) => {
                log::info!("Viewer state: {} -> {}", self.state.name(), state.name());
                if let ViewerState::Setup { reason } = &state {
                    log::warn!("No terrain available ({:?}), waiting for setup", reason);
                }
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// Count a rendered frame
    pub fn record_frame(&mut self) {
        if self.state.is_running() {
            self.frame_count += 1;
        }
    }
}
