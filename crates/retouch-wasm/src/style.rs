//! Style fallback WASM bindings.
//!
//! Neural style transfer needs a model runtime on the host; the browser
//! build only carries the color-matrix approximation of each style.

use crate::types::JsPixelBuffer;
use retouch_core::NamedStyle;
use wasm_bindgen::prelude::*;

/// Apply the color-matrix approximation of `style`.
///
/// Names are case-insensitive; unknown names get a mild contrast and
/// saturation boost.
#[wasm_bindgen]
pub fn apply_style_fallback(image: &JsPixelBuffer, style: &str) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(NamedStyle::from_name(style).apply(image.to_buffer()))
}

/// Names accepted by `apply_style_fallback`.
#[wasm_bindgen]
pub fn available_styles() -> Vec<String> {
    NamedStyle::ALL.iter().map(|s| s.name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_styles() {
        let styles = available_styles();
        assert_eq!(styles.len(), 8);
        assert!(styles.contains(&"mosaic".to_string()));
        assert!(styles.contains(&"cool".to_string()));
    }

    #[test]
    fn test_fallback_matches_core() {
        let img = JsPixelBuffer::try_new(3, 2, [120, 90, 200, 255].repeat(6)).unwrap();
        let out = apply_style_fallback(&img, "Vintage");
        let expected = NamedStyle::Vintage.apply(img.to_buffer());
        assert_eq!(out.pixels(), expected.pixels());
    }

    #[test]
    fn test_unknown_style_still_applies() {
        let img = JsPixelBuffer::try_new(2, 2, [120, 90, 200, 255].repeat(4)).unwrap();
        let out = apply_style_fallback(&img, "la_muse");
        assert_eq!(out.byte_length(), 16);
        assert_ne!(out.pixels(), img.pixels());
    }
}
