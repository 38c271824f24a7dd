//! Core buffer types and the engine-wide error enum.

use crate::inference::InferenceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for pixel processing operations.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The pixel data length does not match the stated dimensions.
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Two buffers that must share dimensions do not.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The inference engine failed or is unavailable.
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// The operation was cancelled between two units of work.
    #[error("Operation cancelled")]
    Cancelled,

    /// A pixel received no weight during tiled accumulation.
    #[error("Tile coverage gap at ({x}, {y})")]
    CoverageGap { x: u32, y: u32 },

    /// Resampling through the `image` crate failed.
    #[error("Resize failed: {0}")]
    Resize(String),
}

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Number of bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// An RGBA8 image owned by a single processing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from RGBA8 pixel data, validating its length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ProcessingError> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(ProcessingError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer from RGB8 pixel data with implicit full alpha.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self, ProcessingError> {
        let expected = byte_len(width, height)? / CHANNELS * 3;
        if rgb.len() != expected {
            return Err(ProcessingError::BufferSizeMismatch {
                expected,
                actual: rgb.len(),
            });
        }
        let mut pixels = Vec::with_capacity(expected / 3 * CHANNELS);
        for chunk in rgb.chunks_exact(3) {
            pixels.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, ProcessingError> {
        let len = byte_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an `image::RgbaImage` without copying.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Borrow the pixels as an `image::RgbaImage` (copies the data).
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Convert into an `image::RgbaImage` without copying.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as a tuple.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 data in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw RGBA8 data. Only the owning stage may call this.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the buffer and return the raw data.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Byte offset of the pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    /// Read the pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let p = &self.pixels[i..i + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
        }
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Copy out a rectangular region, clipped to the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self, ProcessingError> {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);
        let mut pixels = Vec::with_capacity(byte_len(width, height)?);
        let stride = self.stride();
        for row in y..y + height {
            let start = row as usize * stride + x as usize * CHANNELS;
            pixels.extend_from_slice(&self.pixels[start..start + width as usize * CHANNELS]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Byte length of an RGBA8 buffer, rejecting empty or overflowing sizes.
fn byte_len(width: u32, height: u32) -> Result<usize, ProcessingError> {
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ProcessingError::InvalidDimensions { width, height })
}

/// Per-pixel foreground probability, same dimensions as its image.
///
/// Values are clamped to `[0, 1]` on construction and after every blend.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Mask {
    /// Create a mask, clamping every value into `[0, 1]`.
    pub fn new(width: u32, height: u32, mut values: Vec<f32>) -> Result<Self, ProcessingError> {
        let expected = byte_len(width, height)? / CHANNELS;
        if values.len() != expected {
            return Err(ProcessingError::BufferSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        for v in values.iter_mut() {
            *v = clamp_unit(*v);
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Create a mask with the same value everywhere.
    pub fn filled(width: u32, height: u32, value: f32) -> Result<Self, ProcessingError> {
        let len = byte_len(width, height)? / CHANNELS;
        Ok(Self {
            width,
            height,
            values: vec![clamp_unit(value); len],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Copy into a single-channel float image.
    pub fn to_luma_image(&self) -> Option<image::ImageBuffer<image::Luma<f32>, Vec<f32>>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.values.clone())
    }

    /// Build from a single-channel float image, clamping every value.
    pub fn from_luma_image(
        img: image::ImageBuffer<image::Luma<f32>, Vec<f32>>,
    ) -> Result<Self, ProcessingError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Mask value at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Whether this mask matches an image's dimensions.
    pub fn matches(&self, image: &PixelBuffer) -> bool {
        self.dimensions() == image.dimensions()
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
#[inline]
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Round and clamp a float channel value to `u8`.
#[inline]
pub(crate) fn to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}
