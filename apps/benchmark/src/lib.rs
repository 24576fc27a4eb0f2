//! Benchmark Application
//!
//! Frame-time benchmarking for the terrain raycaster over scripted flights.

#![no_std]

extern crate alloc;

use voxel_renderer::{DisplaySink, MotionIntent, RenderContext, RenderResult, RenderStats};

/// Number of frame times kept for percentile calculations
const FRAME_TIME_SLOTS: usize = 256;

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Duration in seconds of accumulated frame time
    pub duration: f32,
    /// Hard stop, in frames
    pub max_frames: u64,
    /// Scripted camera path
    pub route: Route,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            duration: 30.0,
            max_frames: 100_000,
            route: Route::Cruise,
        }
    }
}

/// Scripted camera paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Straight ahead at full speed
    Cruise,
    /// Forward while turning, sweeps every heading
    Orbit,
    /// Alternating climbs and dives, pitching the view
    Rollercoaster,
    /// Camera held still (pure render cost)
    Hover,
}

impl Route {
    /// Intent for frame `frame` of the route
    pub fn intent_at(&self, frame: u64) -> MotionIntent {
        match self {
            Route::Cruise => MotionIntent::new(1.0, 0.0, 0.0, 0.0),
            Route::Orbit => MotionIntent::new(1.0, 1.0, 0.0, 0.0),
            Route::Rollercoaster => {
                let phase = (frame / 90) % 2 == 0;
                let (look, lift) = if phase { (-1.0, 1.0) } else { (1.0, -1.0) };
                MotionIntent::new(1.0, 0.3, look, lift)
            }
            Route::Hover => MotionIntent::IDLE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Cruise => "cruise",
            Route::Orbit => "orbit",
            Route::Rollercoaster => "rollercoaster",
            Route::Hover => "hover",
        }
    }

    /// Parse a route name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        [Route::Cruise, Route::Orbit, Route::Rollercoaster, Route::Hover]
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

/// Benchmark results
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResults {
    /// Frame width of the benchmarked context
    pub width: usize,
    /// Frame height of the benchmarked context
    pub height: usize,
    /// Total frames rendered
    pub total_frames: u64,
    /// Average FPS
    pub avg_fps: f32,
    /// Minimum FPS
    pub min_fps: f32,
    /// Maximum FPS
    pub max_fps: f32,
    /// 1% low FPS
    pub low_1_percent: f32,
    /// Total heightfield samples taken
    pub total_samples: u64,
    /// Average samples per frame
    pub avg_samples: u64,
    /// Average vertical runs per frame
    pub avg_runs: u64,
}

/// Benchmark runner
pub struct Benchmark {
    config: BenchmarkConfig,
    results: BenchmarkResults,
    running: bool,
    frame_count: u64,
    elapsed_time: f32,
    total_runs: u64,
    frame_times: [f32; FRAME_TIME_SLOTS],
    frame_time_index: usize,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config,
            results: BenchmarkResults::default(),
            running: false,
            frame_count: 0,
            elapsed_time: 0.0,
            total_runs: 0,
            frame_times: [0.0; FRAME_TIME_SLOTS],
            frame_time_index: 0,
        }
    }

    /// Start the benchmark
    pub fn start(&mut self) {
        self.running = true;
        self.frame_count = 0;
        self.elapsed_time = 0.0;
        self.total_runs = 0;
        self.results = BenchmarkResults::default();
        self.frame_times = [0.0; FRAME_TIME_SLOTS];
        self.frame_time_index = 0;
        log::info!("Benchmark started: route {}, {}s", self.config.route.name(), self.config.duration);
    }

    /// Stop the benchmark and compute results
    pub fn stop(&mut self) -> BenchmarkResults {
        self.running = false;
        self.compute_results();
        self.results.clone()
    }

    /// Record a frame (frame time in seconds)
    pub fn record_frame(&mut self, frame_time: f32, stats: &RenderStats) {
        if !self.running {
            return;
        }

        self.frame_count += 1;
        self.elapsed_time += frame_time;
        self.results.total_samples += stats.samples;
        self.total_runs += stats.runs;

        self.frame_times[self.frame_time_index] = frame_time;
        self.frame_time_index = (self.frame_time_index + 1) % FRAME_TIME_SLOTS;

        if self.elapsed_time >= self.config.duration || self.frame_count >= self.config.max_frames {
            self.stop();
        }
    }

    /// Drive `context` along the configured route until the benchmark stops.
    ///
    /// `now_ms` is the clock; each frame is timed from just before the tick
    /// to just after it.
    pub fn run<S, C>(&mut self, context: &mut RenderContext<S>, mut now_ms: C) -> RenderResult<BenchmarkResults>
    where
        S: DisplaySink,
        C: FnMut() -> f64,
    {
        self.start();
        let (width, height) = (context.config().width, context.config().height);
        log::info!("Benchmarking {}x{} frames", width, height);
        while self.running {
            let start = now_ms();
            let intent = self.config.route.intent_at(self.frame_count);
            let stats = context.tick(intent, start)?;
            let end = now_ms();
            self.record_frame(((end - start) / 1000.0) as f32, &stats);
        }
        self.results.width = width;
        self.results.height = height;
        log::info!(
            "Benchmark finished: {} frames, avg {:.1} FPS, 1% low {:.1} FPS",
            self.results.total_frames,
            self.results.avg_fps,
            self.results.low_1_percent
        );
        Ok(self.results.clone())
    }

    /// Check if benchmark is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get progress (0.0 - 1.0)
    pub fn progress(&self) -> f32 {
        (self.elapsed_time / self.config.duration).min(1.0)
    }

    /// Compute final results
    fn compute_results(&mut self) {
        self.results.total_frames = self.frame_count;

        if self.elapsed_time > 0.0 {
            self.results.avg_fps = self.frame_count as f32 / self.elapsed_time;
        }

        if self.frame_count > 0 {
            self.results.avg_samples = self.results.total_samples / self.frame_count;
            self.results.avg_runs = self.total_runs / self.frame_count;
        }

        let valid_count = (self.frame_count as usize).min(FRAME_TIME_SLOTS);
        if valid_count == 0 {
            return;
        }
        let mut valid_times = self.frame_times;
        let valid_times = &mut valid_times[..valid_count];
        valid_times.sort_unstable_by(f32::total_cmp);

        // Min FPS = 1 / max frame time
        let max_frame_time = valid_times[valid_count - 1];
        if max_frame_time > 0.0 {
            self.results.min_fps = 1.0 / max_frame_time;
        }

        // Max FPS = 1 / min frame time
        let min_frame_time = valid_times[0];
        if min_frame_time > 0.0 {
            self.results.max_fps = 1.0 / min_frame_time;
        }

        // 1% low = 1 / 99th percentile frame time
        let percentile_idx = (valid_count * 99) / 100;
        let percentile_time = valid_times[percentile_idx.min(valid_count - 1)];
        if percentile_time > 0.0 {
            self.results.low_1_percent = 1.0 / percentile_time;
        }
    }

    /// Get current results (partial while running)
    pub fn results(&self) -> &BenchmarkResults {
        &self.results
    }

    /// Get config
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use voxel_renderer::{ContextConfig, HeightField, NullSink, RaycastConfig, TerrainSample};

    fn stats(samples: u64, runs: u64) -> RenderStats {
        RenderStats { depth_steps: 10, samples, runs, early_exit: false }
    }

    #[test]
    fn test_results_from_fixed_frames() {
        let mut bench = Benchmark::new(BenchmarkConfig {
            duration: 1000.0,
            max_frames: 100,
            ..BenchmarkConfig::default()
        });
        bench.start();
        for i in 0..100 {
            // One slow frame in the middle
            let dt = if i == 50 { 0.05 } else { 0.01 };
            bench.record_frame(dt, &stats(1000, 40));
        }
        assert!(!bench.is_running());
        let r = bench.results();
        assert_eq!(r.total_frames, 100);
        assert_eq!(r.total_samples, 100_000);
        assert_eq!(r.avg_samples, 1000);
        assert_eq!(r.avg_runs, 40);
        assert!((r.max_fps - 100.0).abs() < 0.01);
        assert!((r.min_fps - 20.0).abs() < 0.01);
        // 99th percentile of 100 frames is the slowest one
        assert!((r.low_1_percent - 20.0).abs() < 0.01);
        assert!((r.avg_fps - 100.0 / 1.04).abs() < 0.1);
    }

    #[test]
    fn test_ignores_frames_when_stopped() {
        let mut bench = Benchmark::new(BenchmarkConfig::default());
        bench.record_frame(0.016, &stats(5, 1));
        assert_eq!(bench.results().total_samples, 0);
        assert_eq!(bench.progress(), 0.0);
    }

    #[test]
    fn test_route_names() {
        assert_eq!(Route::from_name("ORBIT"), Some(Route::Orbit));
        assert_eq!(Route::from_name("warp"), None);
        assert!(Route::Hover.intent_at(7).is_idle());
        assert_ne!(Route::Rollercoaster.intent_at(0), Route::Rollercoaster.intent_at(90));
    }

    #[test]
    fn test_run_drives_context() {
        let ctx_config = ContextConfig {
            width: 24,
            height: 16,
            raycast: RaycastConfig::for_depth(100.0, 200.0),
            ..ContextConfig::default()
        };
        let mut ctx = RenderContext::new(ctx_config, NullSink).unwrap();
        let field = HeightField::uniform(16, 16, TerrainSample::new(10, 200, 10, 30)).unwrap();
        ctx.attach_terrain(Arc::new(field));

        let mut bench = Benchmark::new(BenchmarkConfig {
            duration: 1000.0,
            max_frames: 200,
            route: Route::Orbit,
            ..BenchmarkConfig::default()
        });
        // Every clock read advances 5 ms, so each frame measures 5 ms
        let mut clock = 0.0;
        let results = bench
            .run(&mut ctx, || {
                clock += 5.0;
                clock
            })
            .unwrap();

        assert_eq!(results.total_frames, 200);
        // Dimensions come from the context actually rendered
        assert_eq!((results.width, results.height), (24, 16));
        assert!((results.avg_fps - 200.0).abs() < 1.0);
        assert!(results.avg_samples > 0);
        assert_eq!(ctx.presenter().stats().frames, 200);
    }

    #[test]
    fn test_run_without_terrain_fails() {
        let mut ctx = RenderContext::new(ContextConfig::default(), NullSink).unwrap();
        let mut bench = Benchmark::new(BenchmarkConfig::default());
        assert!(bench.run(&mut ctx, || 0.0).is_err());
    }
}
