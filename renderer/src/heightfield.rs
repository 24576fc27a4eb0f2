//! Heightfield terrain data
//!
//! A grid of cells, each carrying an RGB colour and a height, stored flat and
//! row-major as four bytes per cell (r, g, b, height). Sampling wraps in both
//! axes so the field tiles an infinite plane.

use alloc::vec::Vec;

use crate::error::{RenderError, RenderResult};
use crate::math::{cell, wrap};

/// Bytes per cell: r, g, b, height
pub const CELL_STRIDE: usize = 4;

/// One terrain sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerrainSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub height: u8,
}

impl TerrainSample {
    pub const fn new(r: u8, g: u8, b: u8, height: u8) -> Self {
        Self { r, g, b, height }
    }

    #[inline]
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Producer of terrain cells (decoded image, generator, ...)
///
/// Coordinates passed to `cell` are always in range; wrapping is done by
/// the heightfield.
pub trait HeightmapSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn cell(&self, x: usize, y: usize) -> TerrainSample;
}

/// Immutable toroidal heightfield
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl HeightField {
    /// Build from packed `r, g, b, height` bytes
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyHeightField { width, height });
        }
        let expected = width * height * CELL_STRIDE;
        if data.len() != expected {
            return Err(RenderError::DataLength { expected, actual: data.len() });
        }

        log::info!("Heightfield created with dimensions: {}x{}", width, height);
        Ok(Self { width, height, data })
    }

    /// Build by evaluating `f` for every cell
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> RenderResult<Self>
    where
        F: FnMut(usize, usize) -> TerrainSample,
    {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyHeightField { width, height });
        }
        let mut data = Vec::with_capacity(width * height * CELL_STRIDE);
        for y in 0..height {
            for x in 0..width {
                let s = f(x, y);
                data.extend_from_slice(&[s.r, s.g, s.b, s.height]);
            }
        }
        Self::from_rgba(width, height, data)
    }

    /// Copy every cell out of an external source
    pub fn from_source<S: HeightmapSource + ?Sized>(source: &S) -> RenderResult<Self> {
        Self::from_fn(source.width(), source.height(), |x, y| source.cell(x, y))
    }

    /// Same colour and height everywhere
    pub fn uniform(width: usize, height: usize, sample: TerrainSample) -> RenderResult<Self> {
        Self::from_fn(width, height, |_, _| sample)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw cell bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read the cell at integer coordinates, wrapping out-of-range values
    #[inline]
    pub fn sample_cell(&self, x: i32, y: i32) -> TerrainSample {
        let idx = (wrap(y, self.height) * self.width + wrap(x, self.width)) * CELL_STRIDE;
        let c = &self.data[idx..idx + CELL_STRIDE];
        TerrainSample::new(c[0], c[1], c[2], c[3])
    }

    /// Sample at world coordinates (floored, then wrapped)
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> TerrainSample {
        self.sample_cell(cell(x), cell(y))
    }

    /// Terrain height at world coordinates
    #[inline]
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y).height as f32
    }
}

impl HeightmapSource for HeightField {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn cell(&self, x: usize, y: usize) -> TerrainSample {
        self.sample_cell(x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_field() -> HeightField {
        HeightField::from_fn(5, 3, |x, y| {
            TerrainSample::new(x as u8 * 10, y as u8 * 20, 7, (x + y * 5) as u8)
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_and_short_data() {
        assert_eq!(
            HeightField::from_rgba(0, 4, Vec::new()),
            Err(RenderError::EmptyHeightField { width: 0, height: 4 })
        );
        assert_eq!(
            HeightField::from_rgba(2, 2, alloc::vec![0; 15]),
            Err(RenderError::DataLength { expected: 16, actual: 15 })
        );
    }

    #[test]
    fn test_sample_reads_row_major_cell() {
        let field = gradient_field();
        let s = field.sample(3.7, 2.2);
        assert_eq!(s, TerrainSample::new(30, 40, 7, 13));
        assert_eq!(field.height_at(1.0, 1.0), 6.0);
    }

    #[test]
    fn test_toroidal_periodicity() {
        let field = gradient_field();
        let points = [(0.0, 0.0), (1.5, 2.9), (4.99, 0.01), (2.0, 1.0)];
        for &(x, y) in &points {
            let base = field.sample(x, y);
            for k in -3i32..=3 {
                for j in -3i32..=3 {
                    let wx = x + (k * field.width() as i32) as f32;
                    let wy = y + (j * field.height() as i32) as f32;
                    assert_eq!(field.sample(wx, wy), base, "k={} j={} at ({}, {})", k, j, x, y);
                }
            }
        }
    }

    #[test]
    fn test_negative_coordinates_wrap() {
        let field = gradient_field();
        // -0.5 floors to -1, which wraps to the last column/row
        assert_eq!(field.sample(-0.5, -0.5), field.sample_cell(4, 2));
        assert_eq!(field.sample_cell(-6, -4), field.sample_cell(4, 2));
    }

    #[test]
    fn test_from_source_copies_cells() {
        let field = gradient_field();
        let copy = HeightField::from_source(&field).unwrap();
        assert_eq!(copy, field);
    }
}
