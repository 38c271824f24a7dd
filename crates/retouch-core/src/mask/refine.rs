//! Box-filter mask refinement.

use crate::buffer::{Mask, ProcessingError};
use crate::parallel::collect_rows;

/// Average each mask value over its `(2·radius+1)²` neighborhood.
///
/// Neighbors outside the image are skipped, so borders average over the
/// in-bounds part of the window. The output is clamped to [0, 1]. A radius
/// of 0 returns the mask unchanged.
///
/// Uses a summed-area table, so cost is independent of the radius.
pub fn refine_mask(mask: &Mask, radius: u32) -> Result<Mask, ProcessingError> {
    if radius == 0 {
        return Ok(mask.clone());
    }
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let table = summed_area_table(mask.values(), w, h);
    let r = radius as usize;
    let tw = w + 1;

    let values = collect_rows(w, h, |y| {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r + 1).min(h);
        (0..w)
            .map(|x| {
                let x0 = x.saturating_sub(r);
                let x1 = (x + r + 1).min(w);
                let sum = table[y1 * tw + x1] - table[y0 * tw + x1] - table[y1 * tw + x0]
                    + table[y0 * tw + x0];
                let count = ((x1 - x0) * (y1 - y0)) as f64;
                (sum / count) as f32
            })
            .collect()
    });

    Mask::new(mask.width(), mask.height(), values)
}

/// `(w+1)×(h+1)` table where entry `(x, y)` sums all values above-left.
fn summed_area_table(values: &[f32], w: usize, h: usize) -> Vec<f64> {
    let tw = w + 1;
    let mut table = vec![0.0f64; tw * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0.0f64;
        for x in 0..w {
            row_sum += values[y * w + x] as f64;
            table[(y + 1) * tw + x + 1] = table[y * tw + x + 1] + row_sum;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 64×64 checkerboard of 32×32 blocks.
    fn checkerboard() -> Mask {
        let mut values = Vec::with_capacity(64 * 64);
        for y in 0..64u32 {
            for x in 0..64u32 {
                let on = ((x / 32) + (y / 32)) % 2 == 0;
                values.push(if on { 1.0 } else { 0.0 });
            }
        }
        Mask::new(64, 64, values).unwrap()
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let mask = checkerboard();
        assert_eq!(refine_mask(&mask, 0).unwrap(), mask);
    }

    #[test]
    fn test_block_centers_stay_exact() {
        let refined = refine_mask(&checkerboard(), 3).unwrap();
        // Pixels at least 3px from any block boundary keep their value
        for y in (0..29).chain(35..64) {
            for x in (0..29).chain(35..64) {
                let expected = if ((x / 32) + (y / 32)) % 2 == 0 { 1.0 } else { 0.0 };
                assert_eq!(refined.get(x, y).unwrap(), expected, "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_boundary_pixels_become_intermediate() {
        let refined = refine_mask(&checkerboard(), 3).unwrap();
        for x in 29..35u32 {
            let v = refined.get(x, 10).unwrap();
            assert!(v > 0.0 && v < 1.0, "x={} should be intermediate, got {}", x, v);
        }
        for y in 29..35u32 {
            let v = refined.get(50, y).unwrap();
            assert!(v > 0.0 && v < 1.0, "y={} should be intermediate, got {}", y, v);
        }
    }

    #[test]
    fn test_uniform_mask_unchanged() {
        let mask = Mask::filled(20, 10, 0.4).unwrap();
        let refined = refine_mask(&mask, 5).unwrap();
        assert!(refined.values().iter().all(|v| (v - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_single_hot_pixel_spreads() {
        let mut values = vec![0.0; 49];
        values[24] = 1.0;
        let refined = refine_mask(&Mask::new(7, 7, values).unwrap(), 1).unwrap();
        assert!((refined.get(3, 3).unwrap() - 1.0 / 9.0).abs() < 1e-6);
        assert!((refined.get(2, 2).unwrap() - 1.0 / 9.0).abs() < 1e-6);
        assert_eq!(refined.get(0, 0).unwrap(), 0.0);
    }
}
