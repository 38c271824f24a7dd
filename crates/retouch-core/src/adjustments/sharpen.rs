//! Unsharp-mask sharpening.
//!
//! The blurred reference comes from a 2× downscale/upscale round trip, then
//! `output = orig + factor * (orig - blurred)`.

use crate::buffer::{blur_by_rescale, PixelBuffer, ProcessingError};
use crate::parallel::for_each_row_mut;

/// Downscale factor for the unsharp-mask reference.
pub const UNSHARP_SCALE: f32 = 2.0;

/// Maximum unsharp factor.
pub const MAX_UNSHARP_FACTOR: f32 = 2.0;

/// Map the user-facing sharpness scalar onto the unsharp factor.
///
/// `sharpness = 1` gives the maximum factor; non-positive values give 0.
#[inline]
pub fn sharpness_to_factor(sharpness: f32) -> f32 {
    if sharpness.is_nan() {
        return 0.0;
    }
    (sharpness * MAX_UNSHARP_FACTOR).clamp(0.0, MAX_UNSHARP_FACTOR)
}

/// Sharpen with an explicit unsharp factor (clamped to [0, 2]).
///
/// Alpha is preserved. A factor of 0 returns the image unchanged.
pub fn unsharp_mask(image: PixelBuffer, factor: f32) -> Result<PixelBuffer, ProcessingError> {
    let factor = if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, MAX_UNSHARP_FACTOR)
    };
    if factor == 0.0 {
        return Ok(image);
    }

    let blurred = blur_by_rescale(image.clone(), UNSHARP_SCALE)?;
    let mut out = image;
    let stride = out.stride();
    let blurred_px = blurred.pixels();

    for_each_row_mut(out.pixels_mut(), stride, |y, row| {
        let base = &blurred_px[y * stride..(y + 1) * stride];
        for (px, bl) in row.chunks_exact_mut(4).zip(base.chunks_exact(4)) {
            for c in 0..3 {
                let orig = px[c] as f32;
                let v = orig + factor * (orig - bl[c] as f32);
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    });

    Ok(out)
}

/// Sharpen using the user-facing sharpness scalar.
pub fn sharpen(image: PixelBuffer, sharpness: f32) -> Result<PixelBuffer, ProcessingError> {
    unsharp_mask(image, sharpness_to_factor(sharpness))
}
