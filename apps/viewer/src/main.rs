//! Terrain viewer
//!
//! Headless driver for the voxel-space renderer: loads a heightmap, flies the
//! camera for a number of frames and optionally writes the last frame out.
//!
//! # Usage
//!
//! ```bash
//! # 300 frames holding W and D, save the final frame
//! viewer --map maps/island.png --frames 300 --keys wd --output frame.png
//!
//! # Heightmap without an alpha channel
//! viewer --map maps/gray.png --height-channel luma
//!
//! # Scripted flythrough benchmark
//! viewer --map maps/island.png --benchmark --route orbit --duration 10
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use benchmark::{Benchmark, BenchmarkConfig, Route};
use clap::Parser;
use viewer::export::write_frame_png;
use viewer::terrain_source::load_heightfield;
use viewer::{HeightChannel, InputEvent, InputState, Key, SetupReason, Viewer, ViewerConfig, ViewerState};
use voxel_renderer::{NullSink, StepMode};

/// Voxel-space terrain viewer
#[derive(Parser, Debug)]
#[command(name = "viewer")]
#[command(author, version, about = "Voxel-space terrain flyover", long_about = None)]
struct Cli {
    /// Logging verbosity level (overrides RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Heightmap image: RGB colour, height in alpha (or luma)
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Image channel holding the height
    #[arg(long, value_enum, default_value_t = HeightChannel::Alpha)]
    height_channel: HeightChannel,

    /// Frame width
    #[arg(long, default_value = "640")]
    width: u32,

    /// Frame height
    #[arg(long, default_value = "400")]
    height: u32,

    /// Target frame rate, also the synthetic clock rate
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Frames to render
    #[arg(short, long, default_value = "120")]
    frames: u64,

    /// Write the last frame to this PNG
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scale camera rates by elapsed time instead of per frame
    #[arg(long)]
    delta_time: bool,

    /// View distance
    #[arg(long, default_value = "1200")]
    max_depth: f32,

    /// Keys held for the whole run (any of w, s, a, d, r, f)
    #[arg(long, default_value = "")]
    keys: String,

    /// Run a scripted flythrough and report frame timings
    #[arg(long)]
    benchmark: bool,

    /// Benchmark route: cruise, orbit, rollercoaster or hover
    #[arg(long, default_value = "cruise")]
    route: String,

    /// Benchmark duration in seconds
    #[arg(long, default_value = "10")]
    duration: f32,
}

impl Cli {
    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            width: self.width,
            height: self.height,
            target_fps: self.fps,
            map: self.map.clone(),
            height_channel: self.height_channel,
            frames: self.frames,
            output: self.output.clone(),
            step_mode: if self.delta_time { StepMode::DeltaTime } else { StepMode::PerFrame },
            max_depth: self.max_depth,
            ..ViewerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = &cli.log_level {
        logger.parse_filters(level);
    }
    logger.init();

    log::info!("Voxel viewer v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.viewer_config();
    let mut viewer = Viewer::new(config.clone(), NullSink).context("invalid viewer configuration")?;

    load_terrain(&mut viewer, &config);
    if let ViewerState::Setup { reason } = viewer.state() {
        bail!("no terrain to render ({:?}); pass a heightmap with --map", reason);
    }

    if cli.benchmark {
        return run_benchmark(&mut viewer, &cli);
    }

    let slot = viewer.intents();
    let mut input = InputState::new();
    for c in cli.keys.chars() {
        match Key::from_char(c) {
            Some(key) => input.handle(InputEvent::KeyDown(key), &slot),
            None => log::warn!("Ignoring unknown key '{}'", c),
        }
    }

    let interval = config.frame_interval_ms();
    let mut samples = 0u64;
    for frame in 0..config.frames {
        if let Some(stats) = viewer.tick(frame as f64 * interval)? {
            samples += stats.samples;
        }
    }
    viewer.stop();

    let presented = viewer.context().presenter().stats();
    log::info!(
        "Rendered {} frames ({} heightfield samples, {:.1} FPS at the synthetic clock)",
        presented.frames,
        samples,
        viewer.context().presenter().fps()
    );
    if let Some(observer) = viewer.context().observer() {
        log::info!(
            "Observer ended at ({:.1}, {:.1}, {:.1}), heading {:.2}",
            observer.position.x,
            observer.position.y,
            observer.elevation,
            observer.heading
        );
    }

    if let Some(path) = &config.output {
        write_frame_png(path, viewer.frame())?;
    }
    Ok(())
}

/// Load the configured heightmap, or fall back to setup
fn load_terrain(viewer: &mut Viewer<NullSink>, config: &ViewerConfig) {
    let Some(path) = &config.map else {
        viewer.terrain_unavailable(SetupReason::NoHeightmap);
        return;
    };
    match load_heightfield(path, config.height_channel) {
        Ok(field) => {
            viewer.attach_terrain(Arc::new(field));
        }
        Err(err) => {
            log::error!("{:#}", err);
            viewer.terrain_unavailable(SetupReason::LoadFailed(format!("{:#}", err)));
        }
    }
}

fn run_benchmark(viewer: &mut Viewer<NullSink>, cli: &Cli) -> Result<()> {
    let Some(route) = Route::from_name(&cli.route) else {
        bail!("unknown route '{}'", cli.route);
    };
    let mut bench = Benchmark::new(BenchmarkConfig {
        duration: cli.duration,
        route,
        ..BenchmarkConfig::default()
    });

    let clock = Instant::now();
    let results = bench.run(viewer.context_mut(), || clock.elapsed().as_secs_f64() * 1000.0)?;

    println!("route:          {}", route.name());
    println!("frame size:     {}x{}", results.width, results.height);
    println!("frames:         {}", results.total_frames);
    println!("avg fps:        {:.1}", results.avg_fps);
    println!("min fps:        {:.1}", results.min_fps);
    println!("max fps:        {:.1}", results.max_fps);
    println!("1% low fps:     {:.1}", results.low_1_percent);
    println!("samples/frame:  {}", results.avg_samples);
    println!("runs/frame:     {}", results.avg_runs);
    Ok(())
}
