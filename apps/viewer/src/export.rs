//! Frame export
//!
//! Writes a framebuffer as an RGBA8 PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use voxel_renderer::FrameBuffer;

/// Bytes per exported pixel
const RGBA8_CHANNELS: usize = 4;

/// Write the current contents of `frame` to `path`
pub fn write_frame_png(path: &Path, frame: &FrameBuffer) -> Result<()> {
    let width = u32::try_from(frame.width()).context("frame too wide for PNG")?;
    let height = u32::try_from(frame.height()).context("frame too tall for PNG")?;
    let data = frame.to_rgba8();
    ensure!(
        data.len() == frame.width() * frame.height() * RGBA8_CHANNELS,
        "frame export expected {} bytes, got {}",
        frame.width() * frame.height() * RGBA8_CHANNELS,
        data.len()
    );

    let file = File::create(path).with_context(|| format!("failed to create output PNG at {}", path.display()))?;
    let encoder = PngEncoder::new_with_quality(BufWriter::new(file), CompressionType::Fast, FilterType::NoFilter);
    encoder
        .write_image(&data, width, height, ExtendedColorType::Rgba8)
        .context("failed to encode RGBA8 PNG")?;

    log::info!("Wrote {}x{} frame to {}", width, height, path.display());
    Ok(())
}
