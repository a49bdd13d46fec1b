//! Brightness sampling for raster inputs.
//!
//! - [`luma`] converts one RGB triple to BT.601 luminance in `[0, 255]`.
//! - [`PixelBuffer`] wraps interleaved 8-bit pixel data and validates it up front.
//! - [`LumaGrid`] stores precomputed luminance, e.g. for procedural sources.
//!
//! Both containers implement [`LumaSource`], which is all the soil generator needs.
use std::sync::Arc;

use crate::error::{Error, Result};

/// BT.601 luma weights.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Luminance of an RGB triple.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    LUMA_WEIGHTS[0] * r as f32 + LUMA_WEIGHTS[1] * g as f32 + LUMA_WEIGHTS[2] * b as f32
}

/// Interleaved 8-bit channel layouts accepted by [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// Single grey channel.
    L8,
    Rgb8,
    Rgba8,
    Bgra8,
}

impl PixelFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::L8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }
}

/// Anything that can report luminance on an integer pixel grid.
pub trait LumaSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Luminance in `[0, 255]` at `(x, y)`. Out-of-range coordinates return `0.0`.
    fn luma_at(&self, x: u32, y: u32) -> f32;
}

/// CPU-side snapshot of decoded image pixels.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Arc<Vec<u8>>,
}

impl PixelBuffer {
    /// Wraps decoded pixel bytes.
    ///
    /// Returns [`Error::NotReady`] for a zero-sized image or an empty buffer, and
    /// [`Error::InvalidConfig`] when the byte count does not match the dimensions.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.is_empty() {
            return Err(Error::NotReady(format!(
                "pixel buffer is empty ({width}x{height}, {} bytes)",
                pixels.len()
            )));
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "pixel buffer has {} bytes, expected {expected} for {width}x{height} {format:?}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            pixels: Arc::new(pixels),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Bakes the luminance of every pixel into a [`LumaGrid`].
    pub fn to_luma_grid(&self) -> LumaGrid {
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(self.luma_at(x, y));
            }
        }
        LumaGrid {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl LumaSource for PixelBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn luma_at(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        let bpp = self.format.bytes_per_pixel();
        let base = (y as usize * self.width as usize + x as usize) * bpp;
        let Some(px) = self.pixels.get(base..base + bpp) else {
            return 0.0;
        };
        match self.format {
            PixelFormat::L8 => px[0] as f32,
            PixelFormat::Rgb8 | PixelFormat::Rgba8 => luma(px[0], px[1], px[2]),
            PixelFormat::Bgra8 => luma(px[2], px[1], px[0]),
        }
    }
}

/// Row-major luminance raster.
#[derive(Clone, Debug, PartialEq)]
pub struct LumaGrid {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl LumaGrid {
    /// Wraps row-major luminance values. Same readiness rules as [`PixelBuffer::new`].
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || data.is_empty() {
            return Err(Error::NotReady(format!(
                "luma grid is empty ({width}x{height})"
            )));
        }
        if data.len() != width as usize * height as usize {
            return Err(Error::InvalidConfig(format!(
                "luma grid has {} values, expected {}",
                data.len(),
                width as usize * height as usize
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Grid where every pixel has the same luminance.
    pub fn uniform(width: u32, height: u32, value: f32) -> Result<Self> {
        Self::new(
            width,
            height,
            vec![value; width as usize * height as usize],
        )
    }

    /// Evaluates `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Result<Self> {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl LumaSource for LumaGrid {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn luma_at(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_uses_bt601_weights() {
        assert_eq!(luma(0, 0, 0), 0.0);
        assert!((luma(255, 255, 255) - 255.0).abs() < 1e-3);
        assert!((luma(255, 0, 0) - 76.245).abs() < 1e-3);
        assert!((luma(0, 255, 0) - 149.685).abs() < 1e-3);
        assert!((luma(0, 0, 255) - 29.07).abs() < 1e-3);
    }

    #[test]
    fn empty_buffers_are_not_ready() {
        let err = PixelBuffer::new(0, 4, PixelFormat::Rgba8, Vec::new()).unwrap_err();
        assert!(err.is_not_ready());
        let err = PixelBuffer::new(2, 2, PixelFormat::Rgba8, Vec::new()).unwrap_err();
        assert!(err.is_not_ready());
        assert!(LumaGrid::new(0, 0, Vec::new()).unwrap_err().is_not_ready());
    }

    #[test]
    fn mismatched_length_is_invalid() {
        let err = PixelBuffer::new(2, 2, PixelFormat::Rgb8, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn formats_pick_correct_channels() {
        let rgba = PixelBuffer::new(1, 1, PixelFormat::Rgba8, vec![255, 0, 0, 10]).unwrap();
        let bgra = PixelBuffer::new(1, 1, PixelFormat::Bgra8, vec![0, 0, 255, 10]).unwrap();
        let rgb = PixelBuffer::new(1, 1, PixelFormat::Rgb8, vec![255, 0, 0]).unwrap();
        let grey = PixelBuffer::new(1, 1, PixelFormat::L8, vec![42]).unwrap();
        assert_eq!(rgba.luma_at(0, 0), bgra.luma_at(0, 0));
        assert_eq!(rgba.luma_at(0, 0), rgb.luma_at(0, 0));
        assert_eq!(grey.luma_at(0, 0), 42.0);
    }

    #[test]
    fn out_of_range_reads_zero() {
        let buf = PixelBuffer::new(2, 1, PixelFormat::L8, vec![200, 100]).unwrap();
        assert_eq!(buf.luma_at(1, 0), 100.0);
        assert_eq!(buf.luma_at(2, 0), 0.0);
        assert_eq!(buf.luma_at(0, 1), 0.0);
    }

    #[test]
    fn luma_grid_matches_buffer() {
        let buf = PixelBuffer::new(
            2,
            2,
            PixelFormat::Rgb8,
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
        )
        .unwrap();
        let grid = buf.to_luma_grid();
        assert_eq!(grid.dimensions(), (2, 2));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(grid.luma_at(x, y), buf.luma_at(x, y));
            }
        }
    }

    #[test]
    fn from_fn_is_row_major() {
        let grid = LumaGrid::from_fn(3, 2, |x, y| (x + 10 * y) as f32).unwrap();
        assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(grid.luma_at(2, 1), 12.0);
    }
}
