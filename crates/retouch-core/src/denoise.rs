//! Edge-preserving denoise.
//!
//! The image is blended with a blurred copy of itself. Where the Sobel
//! gradient of the luminance is strong the original wins; in flat areas the
//! blurred copy wins. A final `strength` mix keeps part of the original
//! everywhere.
//!
//! Used twice by style transfer: before inference to keep noise from being
//! amplified, and after stitching to soften residual tile seams.

use crate::buffer::{blur_by_rescale, PixelBuffer, ProcessingError};
use crate::config::DenoiseSettings;
use crate::luminance::luminance_plane;
use crate::parallel::{collect_rows, for_each_row_mut};

/// Denoise `image`, keeping detail along edges.
///
/// * `radius` - downscale factor for the blurred reference
/// * `strength` - fraction of the original kept in the final mix, clamped
///   to [0, 1]
///
/// `radius <= 0` or `strength <= 0` returns the input unchanged.
pub fn denoise(
    image: PixelBuffer,
    radius: f32,
    strength: f32,
) -> Result<PixelBuffer, ProcessingError> {
    if radius.is_nan() || strength.is_nan() || radius <= 0.0 || strength <= 0.0 {
        return Ok(image);
    }
    let strength = strength.min(1.0);

    let blurred = blur_by_rescale(image.clone(), radius)?;
    let mask = edge_mask(&image);
    let width = image.width() as usize;
    let stride = image.stride();
    let blurred_px = blurred.pixels();

    let mut out = image;
    for_each_row_mut(out.pixels_mut(), stride, |y, row| {
        let base = &blurred_px[y * stride..(y + 1) * stride];
        let mask_row = &mask[y * width..(y + 1) * width];
        for ((px, bl), &m) in row
            .chunks_exact_mut(4)
            .zip(base.chunks_exact(4))
            .zip(mask_row)
        {
            for c in 0..3 {
                let orig = px[c] as f32;
                let blended = orig * m + bl[c] as f32 * (1.0 - m);
                let v = orig * strength + blended * (1.0 - strength);
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    });

    Ok(out)
}

/// Denoise with a settings block from [`crate::config`].
pub fn denoise_with(
    image: PixelBuffer,
    settings: &DenoiseSettings,
) -> Result<PixelBuffer, ProcessingError> {
    denoise(image, settings.radius, settings.strength)
}

/// Sobel gradient magnitude of a row-major plane.
///
/// Border pixels (without a full 3×3 neighborhood) are 0.
pub fn sobel_magnitude(plane: &[f32], width: usize, height: usize) -> Vec<f32> {
    if width < 3 || height < 3 {
        return vec![0.0; width * height];
    }
    collect_rows(width, height, |y| {
        let mut row = vec![0.0f32; width];
        if y == 0 || y == height - 1 {
            return row;
        }
        let up = &plane[(y - 1) * width..y * width];
        let mid = &plane[y * width..(y + 1) * width];
        let down = &plane[(y + 1) * width..(y + 2) * width];
        for x in 1..width - 1 {
            let gx = (up[x + 1] + 2.0 * mid[x + 1] + down[x + 1])
                - (up[x - 1] + 2.0 * mid[x - 1] + down[x - 1]);
            let gy = (down[x - 1] + 2.0 * down[x] + down[x + 1])
                - (up[x - 1] + 2.0 * up[x] + up[x + 1]);
            row[x] = (gx * gx + gy * gy).sqrt();
        }
        row
    })
}

/// Edge strength in [0, 1]: Sobel magnitude over its observed maximum.
///
/// 1 is the strongest edge in the image, 0 is flat. A completely flat image
/// yields all zeros.
pub fn edge_mask(image: &PixelBuffer) -> Vec<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut grad = sobel_magnitude(&luminance_plane(image), w, h);
    let max = grad.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for g in grad.iter_mut() {
            *g /= max;
        }
    }
    grad
}
