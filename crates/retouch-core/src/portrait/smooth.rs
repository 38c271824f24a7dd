//! Edge-preserving skin smoothing.

use crate::buffer::{clamp_unit, to_u8, PixelBuffer};
use crate::parallel::for_each_row_mut;
use crate::region::Region;

/// Neighbors whose summed RGB difference reaches this are treated as edges.
pub const EDGE_THRESHOLD: i32 = 80;

/// Blend factor at intensity 1.
pub const MAX_SMOOTH_BLEND: f32 = 0.4;

/// Width of the soft edge inside a face region, as a fraction of its half-size.
const FEATHER_BAND: f32 = 0.25;

/// Neighborhood radius for a clamped intensity: `round(2 * intensity)`, at least 1.
pub fn smoothing_radius(intensity: f32) -> u32 {
    ((clamp_unit(intensity) * 2.0).round() as u32).max(1)
}

/// Offsets within a disc of `radius`, with their `1 / (1 + distance)` weights.
fn kernel(radius: u32) -> Vec<(i32, i32, f32)> {
    let r = radius as i32;
    let mut taps = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist <= radius as f32 {
                taps.push((dx, dy, 1.0 / (1.0 + dist)));
            }
        }
    }
    taps
}

/// Smooth skin inside `region`, or across the whole image when `None`.
///
/// Each pixel is averaged with its neighbors (weight `1 / (1 + distance)`),
/// skipping neighbors across a color edge, then blended back at
/// `intensity * 0.4`. Inside a region the blend fades out near the
/// rectangle's edges.
pub fn beauty_smooth(image: PixelBuffer, region: Option<Region>, intensity: f32) -> PixelBuffer {
    let intensity = clamp_unit(intensity);
    let blend = intensity * MAX_SMOOTH_BLEND;
    if blend <= 0.0 || image.is_empty() {
        return image;
    }

    let (width, height) = image.dimensions();
    let region = region.map(|r| r.clamp_to(width, height));
    let area = region.unwrap_or_else(|| Region::full(width, height));
    if area.is_empty() {
        return image;
    }

    let taps = kernel(smoothing_radius(intensity));
    let source = image.clone();
    let src = source.pixels();
    let stride = image.stride();
    let mut output = image;

    for_each_row_mut(output.pixels_mut(), stride, |y, row| {
        let y = y as u32;
        if y < area.y || y >= area.y + area.height {
            return;
        }
        for x in area.x..area.x + area.width {
            let i = x as usize * 4;
            let center = [row[i] as i32, row[i + 1] as i32, row[i + 2] as i32];
            let mut sum = [center[0] as f32, center[1] as f32, center[2] as f32];
            let mut total = 1.0f32;

            for &(dx, dy, w) in &taps {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    continue;
                }
                let j = ny as usize * stride + nx as usize * 4;
                let n = [src[j] as i32, src[j + 1] as i32, src[j + 2] as i32];
                let diff = (n[0] - center[0]).abs()
                    + (n[1] - center[1]).abs()
                    + (n[2] - center[2]).abs();
                if diff >= EDGE_THRESHOLD {
                    continue;
                }
                for c in 0..3 {
                    sum[c] += n[c] as f32 * w;
                }
                total += w;
            }

            let f = match region {
                Some(r) => blend * r.edge_feather(x, y, FEATHER_BAND),
                None => blend,
            };
            for c in 0..3 {
                let avg = sum[c] / total;
                row[i + c] = to_u8(center[c] as f32 * (1.0 - f) + avg * f);
            }
        }
    });

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::filled(width, height, [0, 0, 0, 255]).unwrap();
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 150 } else { 170 };
                img.set(x, y, [v, v - 30, v - 50, 255]);
            }
        }
        img
    }

    fn spread(img: &PixelBuffer) -> i32 {
        let reds: Vec<i32> = img.pixels().chunks_exact(4).map(|p| p[0] as i32).collect();
        reds.iter().max().unwrap() - reds.iter().min().unwrap()
    }

    #[test]
    fn test_radius() {
        assert_eq!(smoothing_radius(0.0), 1);
        assert_eq!(smoothing_radius(0.2), 1);
        assert_eq!(smoothing_radius(1.0), 2);
        assert_eq!(smoothing_radius(9.0), 2);
    }

    #[test]
    fn test_zero_intensity_is_identity() {
        let img = noisy(16, 16);
        assert_eq!(beauty_smooth(img.clone(), None, 0.0), img);
        assert_eq!(beauty_smooth(img.clone(), None, f32::NAN), img);
    }

    #[test]
    fn test_smoothing_reduces_noise() {
        let img = noisy(16, 16);
        let out = beauty_smooth(img.clone(), None, 1.0);
        assert!(spread(&out) < spread(&img));
        // Capped at 40%: values never cross the mean
        let p = out.get(5, 5).unwrap();
        assert!(p[0] > 150 && p[0] < 170);
    }

    #[test]
    fn test_out_of_range_intensity_matches_max() {
        let img = noisy(12, 12);
        assert_eq!(beauty_smooth(img.clone(), None, 7.0), beauty_smooth(img, None, 1.0));
    }

    #[test]
    fn test_hard_edge_preserved() {
        let mut img = PixelBuffer::filled(10, 10, [0, 0, 0, 255]).unwrap();
        for y in 0..10 {
            for x in 5..10 {
                img.set(x, y, [255, 255, 255, 255]);
            }
        }
        assert_eq!(beauty_smooth(img.clone(), None, 1.0), img);
    }

    #[test]
    fn test_region_limits_effect() {
        let img = noisy(30, 30);
        let region = Region::new(10, 10, 10, 10);
        let out = beauty_smooth(img.clone(), Some(region), 1.0);
        assert_eq!(out.get(2, 2), img.get(2, 2));
        assert_eq!(out.get(25, 15), img.get(25, 15));
        assert_ne!(out.get(15, 15), img.get(15, 15));
    }

    #[test]
    fn test_alpha_untouched() {
        let mut img = noisy(8, 8);
        img.set(3, 3, [160, 130, 110, 17]);
        let out = beauty_smooth(img, None, 1.0);
        assert_eq!(out.get(3, 3).unwrap()[3], 17);
    }
}
