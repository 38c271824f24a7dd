//! Background compositing WASM bindings.
//!
//! The host may pass its own foreground mask (one value per pixel in
//! [0, 1]); without one, the radial fallback mask is used. Either way the
//! mask is refined before compositing.

use crate::types::{to_js_error, JsPixelBuffer};
use retouch_core::config::BackgroundConfig;
use retouch_core::mask::{self as compositing, foreground_mask, refine_mask};
use retouch_core::{Mask, PixelBuffer, ProcessingError};
use wasm_bindgen::prelude::*;

fn resolve_mask(
    image: &PixelBuffer,
    mask: Option<Vec<f32>>,
    config: &BackgroundConfig,
) -> Result<Mask, ProcessingError> {
    match mask {
        Some(values) => {
            let raw = Mask::new(image.width(), image.height(), values)?;
            refine_mask(&raw, config.refine_radius)
        }
        None => foreground_mask(image, None, config),
    }
}

fn remove(
    image: &JsPixelBuffer,
    mask: Option<Vec<f32>>,
) -> Result<JsPixelBuffer, ProcessingError> {
    let refined = resolve_mask(image.buffer(), mask, &BackgroundConfig::default())?;
    compositing::remove_background(image.to_buffer(), &refined).map(JsPixelBuffer::from_buffer)
}

fn blur(
    image: &JsPixelBuffer,
    mask: Option<Vec<f32>>,
    blur_factor: Option<f32>,
) -> Result<JsPixelBuffer, ProcessingError> {
    let config = BackgroundConfig::default();
    let refined = resolve_mask(image.buffer(), mask, &config)?;
    let factor = blur_factor.unwrap_or(config.blur_factor);
    compositing::blur_background(image.to_buffer(), &refined, factor)
        .map(JsPixelBuffer::from_buffer)
}

fn replace_color(
    image: &JsPixelBuffer,
    mask: Option<Vec<f32>>,
    color: [u8; 3],
) -> Result<JsPixelBuffer, ProcessingError> {
    let refined = resolve_mask(image.buffer(), mask, &BackgroundConfig::default())?;
    compositing::replace_background_color(image.to_buffer(), &refined, color)
        .map(JsPixelBuffer::from_buffer)
}

/// Make the background transparent: alpha becomes the foreground mask.
#[wasm_bindgen]
pub fn remove_background(
    image: &JsPixelBuffer,
    mask: Option<Vec<f32>>,
) -> Result<JsPixelBuffer, JsValue> {
    remove(image, mask).map_err(to_js_error)
}

/// Blur the background, keeping the foreground sharp.
///
/// `blur_factor` defaults to 8 (downscale factor of the blur).
#[wasm_bindgen]
pub fn blur_background(
    image: &JsPixelBuffer,
    mask: Option<Vec<f32>>,
    blur_factor: Option<f32>,
) -> Result<JsPixelBuffer, JsValue> {
    blur(image, mask, blur_factor).map_err(to_js_error)
}

/// Replace the background with a solid color.
#[wasm_bindgen]
pub fn replace_background_color(
    image: &JsPixelBuffer,
    mask: Option<Vec<f32>>,
    r: u8,
    g: u8,
    b: u8,
) -> Result<JsPixelBuffer, JsValue> {
    replace_color(image, mask, [r, g, b]).map_err(to_js_error)
}
