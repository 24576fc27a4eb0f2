//! Heightmap loading
//!
//! A heightmap is an RGBA image: RGB is the ground colour and alpha the
//! height. Opaque images can use luminance as the height instead.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Pixel, RgbaImage};
use voxel_renderer::{HeightField, HeightmapSource, TerrainSample};

/// Image channel that holds the terrain height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HeightChannel {
    #[default]
    Alpha,
    Luma,
}

/// Decoded heightmap image
pub struct PngHeightmap {
    image: RgbaImage,
    channel: HeightChannel,
}

impl PngHeightmap {
    /// Decode an image file
    pub fn open(path: &Path, channel: HeightChannel) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to load heightmap '{}'", path.display()))?
            .to_rgba8();
        log::info!(
            "Loaded heightmap {} ({}x{}, height from {:?})",
            path.display(),
            image.width(),
            image.height(),
            channel
        );
        Ok(Self::from_image(image, channel))
    }

    pub fn from_image(image: RgbaImage, channel: HeightChannel) -> Self {
        Self { image, channel }
    }

    /// Copy the image into a heightfield
    pub fn to_heightfield(&self) -> Result<HeightField> {
        HeightField::from_source(self).context("heightmap has no usable cells")
    }
}

impl HeightmapSource for PngHeightmap {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn cell(&self, x: usize, y: usize) -> TerrainSample {
        let px = self.image.get_pixel(x as u32, y as u32);
        let [r, g, b, a] = px.0;
        let height = match self.channel {
            HeightChannel::Alpha => a,
            HeightChannel::Luma => px.to_luma().0[0],
        };
        TerrainSample::new(r, g, b, height)
    }
}

/// Load a heightmap file straight into a heightfield
pub fn load_heightfield(path: &Path, channel: HeightChannel) -> Result<HeightField> {
    PngHeightmap::open(path, channel)?.to_heightfield()
}
