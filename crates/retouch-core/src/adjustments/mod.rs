//! Global color adjustments.
//!
//! Each enabled adjustment is a 4×5 [`ColorMatrix`] applied in a single pixel
//! pass; sharpness is an unsharp mask.
//!
//! ## Adjustment Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//! 4. Temperature
//! 5. Tint
//! 6. Sharpness
//!
//! Every pass clamps to [0, 255], so round trips only hold for values that
//! never clamp.

mod matrix;
mod sharpen;

pub use matrix::{ColorMatrix, BRIGHTNESS_RANGE, WHITE_BALANCE_RANGE};
pub use sharpen::{sharpen, sharpness_to_factor, unsharp_mask, MAX_UNSHARP_FACTOR};

use crate::buffer::{PixelBuffer, ProcessingError};
use crate::AdjustmentParams;
use log::debug;

/// Apply every non-zero adjustment in the fixed order.
///
/// Parameters are clamped to [-1, 1] first, so out-of-range values never
/// fail.
///
/// # Example
/// ```ignore
/// let mut params = AdjustmentParams::default();
/// params.brightness = 0.2;
/// params.sharpness = 0.5;
/// let adjusted = apply_adjustments(image, &params)?;
/// ```
pub fn apply_adjustments(
    image: PixelBuffer,
    params: &AdjustmentParams,
) -> Result<PixelBuffer, ProcessingError> {
    // Early exit if no adjustments
    if params.is_default() {
        return Ok(image);
    }
    let params = params.clamped();
    debug!(
        "Applying adjustments to {}x{}: {:?}",
        image.width(),
        image.height(),
        params
    );

    let mut image = image;
    image = adjust_brightness(image, params.brightness);
    image = adjust_contrast(image, params.contrast);
    image = adjust_saturation(image, params.saturation);
    image = adjust_temperature(image, params.temperature);
    image = adjust_tint(image, params.tint);
    if params.sharpness != 0.0 {
        image = sharpen(image, params.sharpness)?;
    }
    Ok(image)
}

/// Brightness in [-1, 1]; 0 is the identity.
pub fn adjust_brightness(image: PixelBuffer, amount: f32) -> PixelBuffer {
    apply_if_nonzero(image, amount, ColorMatrix::brightness)
}

/// Contrast in [-1, 1]; 0 is the identity.
pub fn adjust_contrast(image: PixelBuffer, amount: f32) -> PixelBuffer {
    apply_if_nonzero(image, amount, ColorMatrix::contrast)
}

/// Saturation in [-1, 1]; 0 is the identity, -1 is grayscale.
pub fn adjust_saturation(image: PixelBuffer, amount: f32) -> PixelBuffer {
    apply_if_nonzero(image, amount, ColorMatrix::saturation)
}

/// Temperature in [-1, 1]; positive is warmer.
pub fn adjust_temperature(image: PixelBuffer, amount: f32) -> PixelBuffer {
    apply_if_nonzero(image, amount, ColorMatrix::temperature)
}

/// Tint in [-1, 1]; positive is more magenta.
pub fn adjust_tint(image: PixelBuffer, amount: f32) -> PixelBuffer {
    apply_if_nonzero(image, amount, ColorMatrix::tint)
}

#[inline]
fn apply_if_nonzero(image: PixelBuffer, amount: f32, build: fn(f32) -> ColorMatrix) -> PixelBuffer {
    if amount == 0.0 || amount.is_nan() {
        return image;
    }
    build(amount).apply(image)
}
