//! Portrait retouching WASM bindings.
//!
//! The face is located with the detector front end and the skin-tone
//! heuristic. When no face is found, smoothing covers the whole image and
//! the eye and blur effects use the default face box.

use crate::types::JsPixelBuffer;
use retouch_core::portrait::Retoucher;
use wasm_bindgen::prelude::*;

/// Edge-preserving skin smoothing. `intensity` is clamped to [0, 1].
#[wasm_bindgen]
pub fn beauty_filter(image: &JsPixelBuffer, intensity: f32) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(Retoucher::new().beauty_filter(image.to_buffer(), intensity))
}

/// Brighten both eyes by up to 25%. `intensity` is clamped to [0, 1].
#[wasm_bindgen]
pub fn enhance_eyes(image: &JsPixelBuffer, intensity: f32) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(Retoucher::new().enhance_eyes(image.to_buffer(), intensity))
}

/// Blur the face with a soft elliptical edge.
///
/// Intensity 0 still blurs with a radius of 1.
#[wasm_bindgen]
pub fn blur_face(image: &JsPixelBuffer, intensity: f32) -> JsPixelBuffer {
    JsPixelBuffer::from_buffer(Retoucher::new().blur_face(image.to_buffer(), intensity))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Skin-colored face on a blue-gray wall, with light pixel noise.
    fn portrait() -> JsPixelBuffer {
        let (width, height) = (60u32, 60u32);
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let noise = ((x * 7 + y * 13) % 9) as u8;
                let face = (20..40).contains(&x) && (15..45).contains(&y);
                if face {
                    pixels.extend_from_slice(&[200 + noise, 150, 120, 255]);
                } else {
                    pixels.extend_from_slice(&[40, 60 + noise, 90, 255]);
                }
            }
        }
        JsPixelBuffer::try_new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_beauty_filter_changes_face_only() {
        let img = portrait();
        let out = beauty_filter(&img, 1.0);
        assert_eq!((out.width(), out.height()), (60, 60));
        assert_ne!(out.pixels(), img.pixels());
        // Far corner is outside the padded face box
        assert_eq!(out.pixels()[..4], img.pixels()[..4]);
    }

    #[test]
    fn test_enhance_eyes_brightens() {
        let img = portrait();
        let before: u32 = img.pixels().iter().map(|&v| v as u32).sum();
        let after: u32 = enhance_eyes(&img, 1.0).pixels().iter().map(|&v| v as u32).sum();
        assert!(after > before);
    }

    #[test]
    fn test_blur_face_zero_intensity_still_blurs() {
        let img = portrait();
        assert_ne!(blur_face(&img, 0.0).pixels(), img.pixels());
    }
}
