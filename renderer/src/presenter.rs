//! Frame presentation and frame-rate accounting

use alloc::collections::VecDeque;

use crate::framebuffer::FrameBuffer;

/// Default FPS averaging window (ms)
pub const FPS_WINDOW_MS: f64 = 3000.0;

/// Default interval between FPS estimate refreshes (ms)
pub const FPS_UPDATE_INTERVAL_MS: f64 = 1000.0;

/// Default cap on frames kept in the window
pub const FPS_MAX_SAMPLES: usize = 60;

/// Default target frame rate
pub const TARGET_FPS: u32 = 60;

/// Frames slower than this multiple of the target interval count as late
const LATE_FRAME_FACTOR: f64 = 1.5;

/// Where finished frames go (window, texture upload, file, ...)
pub trait DisplaySink {
    /// Show `frame`. Expected to be vsync-paced and never block indefinitely.
    fn present(&mut self, frame: &FrameBuffer, timestamp_ms: f64);
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn present(&mut self, frame: &FrameBuffer, timestamp_ms: f64) {
        (**self).present(frame, timestamp_ms);
    }
}

/// Discards frames (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn present(&mut self, _frame: &FrameBuffer, _timestamp_ms: f64) {}
}

/// Rolling frame-rate estimate over a time window
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_ms: f64,
    update_interval_ms: f64,
    max_samples: usize,
    timestamps: VecDeque<f64>,
    average: f64,
    instant: f64,
    last_update: Option<f64>,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(FPS_WINDOW_MS, FPS_UPDATE_INTERVAL_MS, FPS_MAX_SAMPLES)
    }
}

impl FpsCounter {
    pub fn new(window_ms: f64, update_interval_ms: f64, max_samples: usize) -> Self {
        Self {
            window_ms,
            update_interval_ms,
            max_samples: max_samples.max(2),
            timestamps: VecDeque::with_capacity(max_samples.max(2)),
            average: 0.0,
            instant: 0.0,
            last_update: None,
        }
    }

    /// Record a frame timestamp (ms). Returns true when the average was refreshed.
    pub fn record(&mut self, timestamp_ms: f64) -> bool {
        if let Some(&prev) = self.timestamps.back() {
            let delta = timestamp_ms - prev;
            self.instant = if delta > 0.0 { 1000.0 / delta } else { 0.0 };
        }

        self.timestamps.push_back(timestamp_ms);
        let cutoff = timestamp_ms - self.window_ms;
        while self.timestamps.front().is_some_and(|&t| t <= cutoff) {
            self.timestamps.pop_front();
        }
        while self.timestamps.len() > self.max_samples {
            self.timestamps.pop_front();
        }

        let due = self.last_update.is_none_or(|t| timestamp_ms - t >= self.update_interval_ms);
        if !due {
            return false;
        }
        self.last_update = Some(timestamp_ms);

        if let (Some(&first), Some(&last)) = (self.timestamps.front(), self.timestamps.back()) {
            let span = last - first;
            if self.timestamps.len() > 1 && span > 0.0 {
                self.average = (self.timestamps.len() - 1) as f64 * 1000.0 / span;
            }
        }
        true
    }

    /// Windowed average frame rate
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Frame rate from the last two timestamps only
    pub fn instant(&self) -> f64 {
        self.instant
    }

    pub fn reset(&mut self) {
        self.timestamps.clear();
        self.average = 0.0;
        self.instant = 0.0;
        self.last_update = None;
    }
}

/// Frame counters kept by the presenter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    /// Frames that arrived later than 1.5x the target interval
    pub late_frames: u64,
}

impl FrameStats {
    /// Late frames as a percentage of all frames
    pub fn late_rate(&self) -> f32 {
        if self.frames > 0 {
            (self.late_frames as f32 / self.frames as f32) * 100.0
        } else {
            0.0
        }
    }
}

/// Hands frames to a display sink and tracks frame timing
pub struct Presenter<S: DisplaySink> {
    sink: S,
    fps: FpsCounter,
    stats: FrameStats,
    target_interval_ms: f64,
    last_timestamp: Option<f64>,
}

impl<S: DisplaySink> Presenter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_target_fps(sink, TARGET_FPS)
    }

    pub fn with_target_fps(sink: S, target_fps: u32) -> Self {
        Self {
            sink,
            fps: FpsCounter::default(),
            stats: FrameStats::default(),
            target_interval_ms: 1000.0 / target_fps.max(1) as f64,
            last_timestamp: None,
        }
    }

    /// Present `frame` and account for its timestamp (ms)
    pub fn present(&mut self, frame: &FrameBuffer, timestamp_ms: f64) {
        self.sink.present(frame, timestamp_ms);

        self.stats.frames += 1;
        if let Some(prev) = self.last_timestamp {
            if timestamp_ms - prev > self.target_interval_ms * LATE_FRAME_FACTOR {
                self.stats.late_frames += 1;
            }
        }
        self.last_timestamp = Some(timestamp_ms);

        if self.fps.record(timestamp_ms) {
            log::debug!(
                "FPS: {:.0} ({} frames, {} late)",
                self.fps.average(),
                self.stats.frames,
                self.stats.late_frames
            );
        }
    }

    /// Windowed average frame rate
    pub fn fps(&self) -> f64 {
        self.fps.average()
    }

    pub fn fps_counter(&self) -> &FpsCounter {
        &self.fps
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
