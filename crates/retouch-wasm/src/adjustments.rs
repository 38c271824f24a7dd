//! Color adjustment WASM bindings.
//!
//! Exposes [`retouch_core::AdjustmentParams`] to TypeScript and applies the
//! full brightness → contrast → saturation → temperature → tint → sharpness
//! pipeline.

use crate::types::{to_js_error, JsPixelBuffer};
use retouch_core::{AdjustmentParams, ProcessingError};
use wasm_bindgen::prelude::*;

/// Adjustment parameters wrapper for JavaScript. Every value is in [-1, 1].
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsAdjustmentParams {
    inner: AdjustmentParams,
}

#[wasm_bindgen]
impl JsAdjustmentParams {
    /// Create parameters with every adjustment at 0
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> f32 {
        self.inner.brightness
    }

    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: f32) {
        self.inner.brightness = value;
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> f32 {
        self.inner.contrast
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: f32) {
        self.inner.contrast = value;
    }

    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> f32 {
        self.inner.saturation
    }

    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: f32) {
        self.inner.saturation = value;
    }

    #[wasm_bindgen(getter)]
    pub fn temperature(&self) -> f32 {
        self.inner.temperature
    }

    #[wasm_bindgen(setter)]
    pub fn set_temperature(&mut self, value: f32) {
        self.inner.temperature = value;
    }

    #[wasm_bindgen(getter)]
    pub fn tint(&self) -> f32 {
        self.inner.tint
    }

    #[wasm_bindgen(setter)]
    pub fn set_tint(&mut self, value: f32) {
        self.inner.tint = value;
    }

    #[wasm_bindgen(getter)]
    pub fn sharpness(&self) -> f32 {
        self.inner.sharpness
    }

    #[wasm_bindgen(setter)]
    pub fn set_sharpness(&mut self, value: f32) {
        self.inner.sharpness = value;
    }

    /// Check if every adjustment is at its default
    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    /// Serialize to a plain JS object for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(to_js_error)
    }

    /// Deserialize from a plain JS object; missing fields default to 0
    pub fn from_json(value: JsValue) -> Result<JsAdjustmentParams, JsValue> {
        let inner: AdjustmentParams = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        Ok(Self { inner })
    }
}

fn adjust(
    image: &JsPixelBuffer,
    params: &JsAdjustmentParams,
) -> Result<JsPixelBuffer, ProcessingError> {
    retouch_core::apply_adjustments(image.to_buffer(), &params.inner)
        .map(JsPixelBuffer::from_buffer)
}

/// Apply every non-zero adjustment, returning a new image.
///
/// # Example (TypeScript)
/// ```typescript
/// const params = new JsAdjustmentParams();
/// params.brightness = 0.2;
/// params.sharpness = 0.5;
/// const adjusted = apply_adjustments(image, params);
/// ```
#[wasm_bindgen]
pub fn apply_adjustments(
    image: &JsPixelBuffer,
    params: &JsAdjustmentParams,
) -> Result<JsPixelBuffer, JsValue> {
    adjust(image, params).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> JsPixelBuffer {
        let pixels = [128, 128, 128, 255].repeat((width * height) as usize);
        JsPixelBuffer::try_new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_params_accessors() {
        let mut params = JsAdjustmentParams::new();
        assert!(params.is_default());

        params.set_brightness(0.5);
        params.set_contrast(-0.25);
        params.set_saturation(0.1);
        params.set_temperature(-0.3);
        params.set_tint(0.2);
        params.set_sharpness(0.7);

        assert_eq!(params.brightness(), 0.5);
        assert_eq!(params.contrast(), -0.25);
        assert_eq!(params.saturation(), 0.1);
        assert_eq!(params.temperature(), -0.3);
        assert_eq!(params.tint(), 0.2);
        assert_eq!(params.sharpness(), 0.7);
        assert!(!params.is_default());
    }

    #[test]
    fn test_default_params_are_identity() {
        let image = gray(4, 3);
        let out = adjust(&image, &JsAdjustmentParams::new()).unwrap();
        assert_eq!(out.pixels(), image.pixels());
    }

    #[test]
    fn test_brightness_applied() {
        let mut params = JsAdjustmentParams::new();
        params.set_brightness(0.5);
        let out = adjust(&gray(2, 2), &params).unwrap();
        assert!(out.pixels()[0] > 128);
        assert_eq!(out.pixels()[3], 255);
    }
}
