//! Luminance calculation utilities using ITU-R BT.601 coefficients.
//!
//! BT.601 luma drives edge detection in the denoiser and the saturation
//! matrix in the color pipeline.

use crate::buffer::PixelBuffer;

/// ITU-R BT.601 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.114;

/// Calculate luminance from RGB values on any scale.
///
/// The result is on the same scale as the inputs.
#[inline]
pub fn calculate_luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// Calculate luminance from u8 RGB values (0 to 255).
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = calculate_luminance(r as f32, g as f32, b as f32);
    lum.clamp(0.0, 255.0).round() as u8
}

/// Per-pixel luminance plane (0-255 scale), row-major.
pub fn luminance_plane(image: &PixelBuffer) -> Vec<f32> {
    image
        .pixels()
        .chunks_exact(4)
        .map(|p| calculate_luminance(p[0] as f32, p[1] as f32, p[2] as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(calculate_luminance_u8(255, 255, 255), 255);
        assert_eq!(calculate_luminance_u8(0, 0, 0), 0);
    }

    #[test]
    fn test_luminance_gray_preserves_value() {
        for v in [0u8, 64, 128, 192, 255] {
            let lum = calculate_luminance_u8(v, v, v);
            assert!((lum as i32 - v as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_luminance_primaries() {
        // 0.299 * 255 ≈ 76.2, 0.587 * 255 ≈ 149.7, 0.114 * 255 ≈ 29.1
        assert_eq!(calculate_luminance_u8(255, 0, 0), 76);
        assert_eq!(calculate_luminance_u8(0, 255, 0), 150);
        assert_eq!(calculate_luminance_u8(0, 0, 255), 29);
    }

    #[test]
    fn test_luminance_plane_length() {
        let img = PixelBuffer::filled(5, 3, [10, 20, 30, 255]).unwrap();
        let plane = luminance_plane(&img);
        assert_eq!(plane.len(), 15);
        let expected = calculate_luminance(10.0, 20.0, 30.0);
        assert!(plane.iter().all(|v| (v - expected).abs() < 1e-4));
    }
}
