//! Eye brightening inside a face region.

use crate::buffer::{clamp_unit, to_u8, PixelBuffer};
use crate::region::Region;

/// Brightness gain at the center of each eye at intensity 1.
pub const MAX_EYE_BOOST: f32 = 0.25;

/// Left eye as (x, y, width, height) fractions of the face box.
pub const LEFT_EYE: (f32, f32, f32, f32) = (0.18, 0.28, 0.26, 0.16);

/// Right eye as (x, y, width, height) fractions of the face box.
pub const RIGHT_EYE: (f32, f32, f32, f32) = (0.56, 0.28, 0.26, 0.16);

/// Both eye rectangles of a face box.
pub fn eye_regions(face: &Region) -> [Region; 2] {
    let (lx, ly, lw, lh) = LEFT_EYE;
    let (rx, ry, rw, rh) = RIGHT_EYE;
    [face.sub_region(lx, ly, lw, lh), face.sub_region(rx, ry, rw, rh)]
}

/// Brighten both eyes of `face`, or of the default face box when `None`.
///
/// RGB is multiplied by `1 + 0.25 * intensity * falloff`, where the falloff
/// is 1 at an eye's center and 0 at its rectangle edge.
pub fn brighten_eyes(mut image: PixelBuffer, face: Option<Region>, intensity: f32) -> PixelBuffer {
    let boost = clamp_unit(intensity) * MAX_EYE_BOOST;
    if boost <= 0.0 || image.is_empty() {
        return image;
    }

    let (width, height) = image.dimensions();
    let face = face
        .unwrap_or_else(|| Region::default_face(width, height))
        .clamp_to(width, height);
    if face.is_empty() {
        return image;
    }
    let stride = image.stride();
    let pixels = image.pixels_mut();

    for eye in eye_regions(&face) {
        let bounds = eye.clamp_to(width, height);
        for y in bounds.y..bounds.y + bounds.height {
            for x in bounds.x..bounds.x + bounds.width {
                let gain = 1.0 + boost * eye.radial_falloff(x, y);
                let i = y as usize * stride + x as usize * 4;
                for c in 0..3 {
                    pixels[i + c] = to_u8(pixels[i + c] as f32 * gain);
                }
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: [u8; 4] = [100, 100, 100, 255];

    #[test]
    fn test_eye_regions_are_disjoint() {
        let [left, right] = eye_regions(&Region::new(0, 0, 100, 100));
        assert_eq!(left, Region::new(18, 28, 26, 16));
        assert_eq!(right, Region::new(56, 28, 26, 16));
        assert!(left.x + left.width <= right.x);
    }

    #[test]
    fn test_brightens_eye_center() {
        let img = PixelBuffer::filled(100, 100, GRAY).unwrap();
        let out = brighten_eyes(img, Some(Region::new(0, 0, 100, 100)), 1.0);
        let center = out.get(30, 35).unwrap();
        assert!(center[0] > 118 && center[0] <= 125, "{:?}", center);
        assert_eq!(center[3], 255);
        // Eye rectangle corner and the rest of the face are untouched
        assert_eq!(out.get(18, 28).unwrap(), GRAY);
        assert_eq!(out.get(50, 80).unwrap(), GRAY);
    }

    #[test]
    fn test_zero_intensity_is_identity() {
        let img = PixelBuffer::filled(40, 40, GRAY).unwrap();
        assert_eq!(brighten_eyes(img.clone(), None, 0.0), img);
        assert_eq!(brighten_eyes(img.clone(), None, -3.0), img);
    }

    #[test]
    fn test_default_face_when_none() {
        let img = PixelBuffer::filled(200, 200, GRAY).unwrap();
        let face = Region::default_face(200, 200);
        let [left, _] = eye_regions(&face);
        let (cx, cy) = left.center();
        let out = brighten_eyes(img, None, 1.0);
        assert!(out.get(cx as u32, cy as u32).unwrap()[0] > 110);
    }

    #[test]
    fn test_bright_pixels_clamp() {
        let img = PixelBuffer::filled(100, 100, [250, 250, 250, 255]).unwrap();
        let out = brighten_eyes(img, Some(Region::new(0, 0, 100, 100)), 1.0);
        assert_eq!(out.get(30, 35).unwrap()[0], 255);
    }

    #[test]
    fn test_face_far_outside_image_is_noop() {
        let img = PixelBuffer::filled(50, 50, GRAY).unwrap();
        let face = Region::new(u32::MAX - 5, 0, 100, 100);
        assert_eq!(brighten_eyes(img.clone(), Some(face), 1.0), img);
    }

    #[test]
    fn test_face_overhanging_edge_uses_visible_part() {
        let img = PixelBuffer::filled(100, 100, GRAY).unwrap();
        let out = brighten_eyes(img, Some(Region::new(0, 0, 100, 400)), 1.0);
        // Eyes of the visible 100x100 box
        assert!(out.get(30, 35).unwrap()[0] > 110);
    }
}
