//! Soft-edged face blur.

use crate::buffer::{clamp_unit, to_u8, PixelBuffer};
use crate::region::Region;

/// Box radius at intensity 1.
pub const MAX_FACE_BLUR_RADIUS: u32 = 15;

/// Box radius for a clamped intensity.
///
/// Floored at 1: intensity 0 still blurs lightly.
pub fn face_blur_radius(intensity: f32) -> u32 {
    ((clamp_unit(intensity) * MAX_FACE_BLUR_RADIUS as f32).round() as u32).max(1)
}

/// Box-blur the RGB of `region` using only pixels inside it.
///
/// Returns `width * height * 3` averages for the region in row-major order.
fn box_blur_region(image: &PixelBuffer, region: Region, radius: u32) -> Vec<f32> {
    let w = region.width as usize;
    let h = region.height as usize;
    let stride = image.stride();
    let src = image.pixels();

    // Summed-area table per channel, (w + 1) x (h + 1)
    let sw = w + 1;
    let mut table = vec![0u64; sw * (h + 1) * 3];
    for y in 0..h {
        let mut row_sum = [0u64; 3];
        let base = (region.y as usize + y) * stride + region.x as usize * 4;
        for x in 0..w {
            for c in 0..3 {
                row_sum[c] += src[base + x * 4 + c] as u64;
                let above = table[(y * sw + x + 1) * 3 + c];
                table[((y + 1) * sw + x + 1) * 3 + c] = above + row_sum[c];
            }
        }
    }

    let r = radius as usize;
    let mut out = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r + 1).min(w);
            let count = ((y1 - y0) * (x1 - x0)) as f32;
            for c in 0..3 {
                let sum = table[(y1 * sw + x1) * 3 + c] + table[(y0 * sw + x0) * 3 + c]
                    - table[(y0 * sw + x1) * 3 + c]
                    - table[(y1 * sw + x0) * 3 + c];
                out.push(sum as f32 / count);
            }
        }
    }
    out
}

/// Blur the face in `face`, or in the default face box when `None`.
///
/// The blur is computed from the region's own pixels and blended with the
/// original by the region's radial falloff: full blur at the center, the
/// original at the boundary.
pub fn blur_face(mut image: PixelBuffer, face: Option<Region>, intensity: f32) -> PixelBuffer {
    let (width, height) = image.dimensions();
    let face = face.unwrap_or_else(|| Region::default_face(width, height));
    let bounds = face.clamp_to(width, height);
    if bounds.is_empty() {
        return image;
    }

    let radius = face_blur_radius(intensity);
    let blurred = box_blur_region(&image, bounds, radius);
    let stride = image.stride();
    let pixels = image.pixels_mut();

    for y in 0..bounds.height {
        for x in 0..bounds.width {
            let (gx, gy) = (bounds.x + x, bounds.y + y);
            let f = face.radial_falloff(gx, gy);
            if f <= 0.0 {
                continue;
            }
            let i = gy as usize * stride + gx as usize * 4;
            let j = (y as usize * bounds.width as usize + x as usize) * 3;
            for c in 0..3 {
                let orig = pixels[i + c] as f32;
                pixels[i + c] = to_u8(orig * (1.0 - f) + blurred[j + c] * f);
            }
        }
    }

    image
}
