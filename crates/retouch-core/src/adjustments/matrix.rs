//! 4×5 affine color matrices.
//!
//! Rows produce R, G, B, A; columns weight the input R, G, B, A and the last
//! column is an additive translate on the 0-255 scale. This mirrors the
//! classic `ColorMatrix` layout used by mobile image pipelines.

use crate::buffer::PixelBuffer;
use crate::luminance::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::parallel::for_each_pixel_mut;

/// Maximum brightness translate, in 0-255 units, at `brightness = ±1`.
pub const BRIGHTNESS_RANGE: f32 = 100.0;

/// Maximum per-channel gain shift for temperature and tint at `±1`.
pub const WHITE_BALANCE_RANGE: f32 = 0.2;

/// An affine per-channel color transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    rows: [[f32; 5]; 4],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Build from raw rows.
    pub const fn from_rows(rows: [[f32; 5]; 4]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f32; 5]; 4] {
        &self.rows
    }

    /// Per-channel scale with no translate.
    pub fn scale(r: f32, g: f32, b: f32) -> Self {
        let mut m = Self::identity();
        m.rows[0][0] = r;
        m.rows[1][1] = g;
        m.rows[2][2] = b;
        m
    }

    /// Additive brightness. `amount` in [-1, 1] maps to ±[`BRIGHTNESS_RANGE`].
    pub fn brightness(amount: f32) -> Self {
        let offset = amount.clamp(-1.0, 1.0) * BRIGHTNESS_RANGE;
        let mut m = Self::identity();
        for row in m.rows.iter_mut().take(3) {
            row[4] = offset;
        }
        m
    }

    /// Contrast around mid-gray: `out = (in - 128) * (1 + amount) + 128`.
    pub fn contrast(amount: f32) -> Self {
        let scale = 1.0 + amount.clamp(-1.0, 1.0);
        let translate = 128.0 * (1.0 - scale);
        let mut m = Self::scale(scale, scale, scale);
        for row in m.rows.iter_mut().take(3) {
            row[4] = translate;
        }
        m
    }

    /// Luminance-preserving saturation. `amount = -1` is fully gray.
    pub fn saturation(amount: f32) -> Self {
        let s = 1.0 + amount.clamp(-1.0, 1.0);
        Self::saturation_factor(s)
    }

    /// Saturation by raw multiplier (1.0 = unchanged).
    pub fn saturation_factor(s: f32) -> Self {
        let inv = 1.0 - s;
        let r = LUMINANCE_R * inv;
        let g = LUMINANCE_G * inv;
        let b = LUMINANCE_B * inv;
        Self::from_rows([
            [r + s, g, b, 0.0, 0.0],
            [r, g + s, b, 0.0, 0.0],
            [r, g, b + s, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// White balance temperature. Positive is warmer (more red, less blue).
    pub fn temperature(amount: f32) -> Self {
        let shift = amount.clamp(-1.0, 1.0) * WHITE_BALANCE_RANGE;
        Self::scale(1.0 + shift, 1.0, 1.0 - shift)
    }

    /// Green-magenta tint. Positive is more magenta (less green).
    pub fn tint(amount: f32) -> Self {
        let shift = amount.clamp(-1.0, 1.0) * WHITE_BALANCE_RANGE;
        Self::scale(1.0, 1.0 - shift, 1.0)
    }

    /// Hue rotation around the luminance axis, in degrees.
    pub fn hue(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (lr, lg, lb) = (LUMINANCE_R, LUMINANCE_G, LUMINANCE_B);
        Self::from_rows([
            [
                lr + cos * (1.0 - lr) + sin * -lr,
                lg + cos * -lg + sin * -lg,
                lb + cos * -lb + sin * (1.0 - lb),
                0.0,
                0.0,
            ],
            [
                lr + cos * -lr + sin * 0.143,
                lg + cos * (1.0 - lg) + sin * 0.140,
                lb + cos * -lb + sin * -0.283,
                0.0,
                0.0,
            ],
            [
                lr + cos * -lr + sin * -(1.0 - lr),
                lg + cos * -lg + sin * lg,
                lb + cos * (1.0 - lb) + sin * lb,
                0.0,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Compose two transforms: the result applies `self` first, then `next`.
    pub fn then(&self, next: &ColorMatrix) -> ColorMatrix {
        let a = &self.rows;
        let b = &next.rows;
        let mut out = [[0.0f32; 5]; 4];
        for (i, out_row) in out.iter_mut().enumerate() {
            for j in 0..4 {
                out_row[j] = (0..4).map(|k| b[i][k] * a[k][j]).sum();
            }
            out_row[4] = (0..4).map(|k| b[i][k] * a[k][4]).sum::<f32>() + b[i][4];
        }
        ColorMatrix { rows: out }
    }

    /// Transform one RGBA pixel, clamping each channel to [0, 255].
    #[inline]
    pub fn transform(&self, px: [u8; 4]) -> [u8; 4] {
        let input = [px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32];
        let mut out = [0u8; 4];
        for (c, row) in self.rows.iter().enumerate() {
            let v = row[0] * input[0]
                + row[1] * input[1]
                + row[2] * input[2]
                + row[3] * input[3]
                + row[4];
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Apply the matrix to every pixel in a single pass.
    pub fn apply(&self, mut image: PixelBuffer) -> PixelBuffer {
        if *self == Self::identity() {
            return image;
        }
        for_each_pixel_mut(image.pixels_mut(), |p| {
            let out = self.transform([p[0], p[1], p[2], p[3]]);
            p.copy_from_slice(&out);
        });
        image
    }
}
