//! Software framebuffer
//!
//! Packed RGBA pixels (one `u32` per pixel, bytes in r, g, b, a order) plus the
//! per-column horizon buffer the raycaster uses for occlusion. Every write is
//! clipped, so callers may pass rows outside the screen.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{RenderError, RenderResult};
use crate::math::lerp;

/// Pack RGBA bytes into a pixel
#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Split a pixel into RGBA bytes
#[inline]
pub const fn unpack_rgba(pixel: u32) -> [u8; 4] {
    pixel.to_le_bytes()
}

/// What `clear()` paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    /// All bytes zero, including alpha
    #[default]
    Black,
    Solid([u8; 3]),
    /// Top row colour fading to the bottom row colour
    VerticalGradient { top: [u8; 3], bottom: [u8; 3] },
}

impl Background {
    /// Dusk sky used by the flyover demo
    pub const DUSK: Background = Background::VerticalGradient { top: [10, 0, 70], bottom: [255, 50, 10] };

    /// Pixel value for row `y` of a `height` row screen
    pub fn row_pixel(&self, y: usize, height: usize) -> u32 {
        match *self {
            Background::Black => 0,
            Background::Solid([r, g, b]) => pack_rgba(r, g, b, 255),
            Background::VerticalGradient { top, bottom } => {
                let t = y as f32 / height as f32;
                let ch = |i: usize| libm::floorf(lerp(top[i] as f32, bottom[i] as f32, t)) as u8;
                pack_rgba(ch(0), ch(1), ch(2), 255)
            }
        }
    }
}

/// Per-column nearest drawn row, reset to the screen height every frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HorizonBuffer {
    rows: Vec<i32>,
}

impl HorizonBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { rows: vec![height as i32; width] }
    }

    /// Reopen every column
    pub fn reset(&mut self, height: usize) {
        self.rows.fill(height as i32);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn get(&self, column: usize) -> i32 {
        self.rows[column]
    }

    #[inline]
    pub fn set(&mut self, column: usize, row: i32) {
        self.rows[column] = row;
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.rows
    }

    /// True once every column is filled to the top of the screen
    pub fn is_closed(&self) -> bool {
        self.rows.iter().all(|&r| r <= 0)
    }
}

/// Receiver of vertical pixel runs
///
/// The raycaster only ever emits column indices inside `[0, width)`, but
/// `y_top`/`y_bottom` are raw screen rows and must be clipped by the target.
pub trait ColumnTarget {
    fn draw_vertical_run(&mut self, x: i32, y_top: i32, y_bottom: i32, r: u8, g: u8, b: u8);
}

/// RGBA framebuffer with its horizon buffer
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    background: Background,
    pub(crate) horizon: HorizonBuffer,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFrameBuffer { width, height });
        }
        log::info!("FrameBuffer created, size: {}x{}", width, height);
        Ok(Self {
            width,
            height,
            pixels: vec![0; width * height],
            background: Background::Black,
            horizon: HorizonBuffer::new(width, height),
        })
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn background(&self) -> Background {
        self.background
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Per-column horizon rows, one per screen column
    pub fn horizon(&self) -> &HorizonBuffer {
        &self.horizon
    }

    /// Packed pixels, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Paint the background and reopen the horizon buffer
    pub fn clear(&mut self) {
        match self.background {
            Background::Black => self.pixels.fill(0),
            bg => {
                for (y, row) in self.pixels.chunks_exact_mut(self.width).enumerate() {
                    row.fill(bg.row_pixel(y, self.height));
                }
            }
        }
        self.horizon.reset(self.height);
    }

    /// Fill the whole buffer with one opaque colour
    pub fn fill(&mut self, r: u8, g: u8, b: u8) {
        self.pixels.fill(pack_rgba(r, g, b, 255));
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Write one opaque pixel; out-of-bounds writes are dropped
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = pack_rgba(r, g, b, 255);
        }
    }

    /// RGBA at (x, y), or `None` off-screen
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.index(x, y).map(|idx| unpack_rgba(self.pixels[idx]))
    }

    /// Fill a rectangle, clipped to the screen
    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, r: u8, g: u8, b: u8) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w as i32)).clamp(0, self.width as i32) as usize;
        let y1 = (y.saturating_add(h as i32)).clamp(0, self.height as i32) as usize;
        if x0 >= x1 {
            return;
        }
        let color = pack_rgba(r, g, b, 255);
        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0..start + x1].fill(color);
        }
    }

    /// Opaque vertical run covering rows `[y_top, y_bottom)` of column `x`
    pub fn draw_vertical_run(&mut self, x: i32, y_top: i32, y_bottom: i32, r: u8, g: u8, b: u8) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        let top = y_top.max(0) as usize;
        let bottom = y_bottom.clamp(0, self.height as i32) as usize;
        if top >= bottom {
            return;
        }
        let color = pack_rgba(r, g, b, 255);
        let x = x as usize;
        for y in top..bottom {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Tightly packed RGBA8 bytes, for export
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| unpack_rgba(p)).collect()
    }
}

impl ColumnTarget for FrameBuffer {
    #[inline]
    fn draw_vertical_run(&mut self, x: i32, y_top: i32, y_bottom: i32, r: u8, g: u8, b: u8) {
        FrameBuffer::draw_vertical_run(self, x, y_top, y_bottom, r, g, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_size() {
        assert_eq!(
            FrameBuffer::new(0, 10).unwrap_err(),
            RenderError::EmptyFrameBuffer { width: 0, height: 10 }
        );
        assert!(FrameBuffer::new(10, 0).is_err());
    }

    #[test]
    fn test_pack_roundtrip_byte_order() {
        let p = pack_rgba(1, 2, 3, 4);
        assert_eq!(unpack_rgba(p), [1, 2, 3, 4]);
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut fb = FrameBuffer::new(4, 3).unwrap();
        fb.set_pixel(1, 2, 10, 20, 30);
        fb.set_pixel(-1, 0, 255, 255, 255);
        fb.set_pixel(4, 0, 255, 255, 255);
        fb.set_pixel(0, 3, 255, 255, 255);
        assert_eq!(fb.pixel(1, 2), Some([10, 20, 30, 255]));
        assert_eq!(fb.pixel(4, 0), None);
        let written = fb.pixels().iter().filter(|&&p| p != 0).count();
        assert_eq!(written, 1);
    }

    #[test]
    fn test_vertical_run_clamps_rows() {
        let mut fb = FrameBuffer::new(3, 5).unwrap();
        fb.draw_vertical_run(1, -10, 100, 200, 100, 50);
        for y in 0..5 {
            assert_eq!(fb.pixel(1, y), Some([200, 100, 50, 255]));
            assert_eq!(fb.pixel(0, y), Some([0, 0, 0, 0]));
        }

        let mut fb = FrameBuffer::new(3, 5).unwrap();
        fb.draw_vertical_run(2, 1, 3, 9, 9, 9);
        assert_eq!(fb.pixel(2, 0), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(2, 1), Some([9, 9, 9, 255]));
        assert_eq!(fb.pixel(2, 2), Some([9, 9, 9, 255]));
        assert_eq!(fb.pixel(2, 3), Some([0, 0, 0, 0]));

        // Empty, inverted and off-screen runs are no-ops
        fb.draw_vertical_run(0, 3, 3, 1, 1, 1);
        fb.draw_vertical_run(0, 4, 2, 1, 1, 1);
        fb.draw_vertical_run(7, 0, 5, 1, 1, 1);
        assert_eq!(fb.pixels().iter().filter(|&&p| p != 0).count(), 2);
    }

    #[test]
    fn test_clear_paints_gradient_and_resets_horizon() {
        let mut fb = FrameBuffer::new(2, 4).unwrap().with_background(Background::VerticalGradient {
            top: [0, 0, 0],
            bottom: [200, 100, 40],
        });
        fb.horizon.set(0, 1);
        fb.clear();
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(fb.pixel(1, 2), Some([100, 50, 20, 255]));
        assert_eq!(fb.pixel(1, 3), Some([150, 75, 30, 255]));
        assert_eq!(fb.horizon.as_slice(), &[4, 4]);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut fb = FrameBuffer::new(4, 4).unwrap();
        fb.fill_rect(-1, 2, 3, 10, 5, 5, 5);
        let lit: Vec<(i32, i32)> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.pixel(x, y) == Some([5, 5, 5, 255]))
            .collect();
        assert_eq!(lit, vec![(0, 2), (1, 2), (0, 3), (1, 3)]);
    }

    #[test]
    fn test_to_rgba8_layout() {
        let mut fb = FrameBuffer::new(2, 1).unwrap();
        fb.set_pixel(1, 0, 7, 8, 9);
        assert_eq!(fb.to_rgba8(), vec![0, 0, 0, 0, 7, 8, 9, 255]);
    }
}
