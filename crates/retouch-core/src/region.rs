//! Rectangular regions with an implicit elliptical falloff.
//!
//! A [`Region`] is an axis-aligned pixel rectangle. Effects confined to a
//! region fade out toward its boundary so the edit never shows a hard edge:
//!
//! - [`Region::radial_falloff`] is 1 at the center and 0 on the inscribed
//!   ellipse (and everywhere outside it).
//! - [`Region::edge_feather`] is 1 in the interior and eases to 0 across a
//!   band along the rectangle's edges, keeping the corners.

use serde::{Deserialize, Serialize};

/// `6t⁵ − 15t⁴ + 10t³` on `t` clamped to [0, 1].
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Axis-aligned rectangle in pixel coordinates.
///
/// # Coordinate System
/// - (0, 0) = top-left pixel of the image
/// - `x + width` and `y + height` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Default face box when nothing is detected: centered horizontally at
    /// 35% of the image height, spanning 35% × 25% of the image.
    pub fn default_face(width: u32, height: u32) -> Self {
        let w = ((width as f32 * 0.35).round() as u32).max(1);
        let h = ((height as f32 * 0.25).round() as u32).max(1);
        let cx = width as f32 / 2.0;
        let cy = height as f32 * 0.35;
        let x = (cx - w as f32 / 2.0).max(0.0).round() as u32;
        let y = (cy - h as f32 / 2.0).max(0.0).round() as u32;
        Self::new(x, y, w, h).clamp_to(width, height)
    }

    /// Build from inclusive min/max pixel coordinates.
    pub fn from_bounds(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self::new(
            min_x,
            min_y,
            max_x.saturating_sub(min_x).saturating_add(1),
            max_y.saturating_sub(min_y).saturating_add(1),
        )
    }

    /// Clip to an image of the given size.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.x.saturating_add(self.width).min(width);
        let bottom = self.y.saturating_add(self.height).min(height);
        Self::new(x, y, right - x, bottom - y)
    }

    /// Grow by `fraction` of the size on every side, clipped to the image.
    pub fn padded(&self, fraction: f32, width: u32, height: u32) -> Self {
        let pad_x = (self.width as f32 * fraction).round() as u32;
        let pad_y = (self.height as f32 * fraction).round() as u32;
        Self::new(
            self.x.saturating_sub(pad_x),
            self.y.saturating_sub(pad_y),
            self.width.saturating_add(pad_x.saturating_mul(2)),
            self.height.saturating_add(pad_y.saturating_mul(2)),
        )
        .clamp_to(width, height)
    }

    /// A sub-rectangle at fractional offsets and size within this region.
    pub fn sub_region(&self, fx: f32, fy: f32, fw: f32, fh: f32) -> Self {
        let x = self.x.saturating_add((self.width as f32 * fx).round() as u32);
        let y = self.y.saturating_add((self.height as f32 * fy).round() as u32);
        let w = ((self.width as f32 * fw).round() as u32).max(1);
        let h = ((self.height as f32 * fh).round() as u32).max(1);
        Self::new(x, y, w, h)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Center in continuous pixel coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px - self.x < self.width && py - self.y < self.height
    }

    /// Normalized elliptical distance of a pixel center from the region center.
    ///
    /// 0 at the center, 1 on the inscribed ellipse.
    #[inline]
    fn normalized_distance(&self, px: u32, py: u32) -> f32 {
        let (cx, cy) = self.center();
        let rx = (self.width as f32 / 2.0).max(0.5);
        let ry = (self.height as f32 / 2.0).max(0.5);
        let dx = (px as f32 + 0.5 - cx) / rx;
        let dy = (py as f32 + 0.5 - cy) / ry;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear radial falloff: 1 at the center, 0 at the region's edge.
    pub fn radial_falloff(&self, px: u32, py: u32) -> f32 {
        (1.0 - self.normalized_distance(px, py)).clamp(0.0, 1.0)
    }

    /// Rectangular soft edge: 1 deeper than `band` (fraction of the half-size)
    /// inside the region, easing to 0 at the boundary, 0 outside.
    pub fn edge_feather(&self, px: u32, py: u32, band: f32) -> f32 {
        if !self.contains(px, py) {
            return 0.0;
        }
        if band <= 0.0 {
            return 1.0;
        }
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        // Distance to the nearest edge, relative to the half-size
        let dx = (px - self.x) as f32 + 0.5;
        let dy = (py - self.y) as f32 + 0.5;
        let edge_x = dx.min(self.width as f32 - dx) / half_w;
        let edge_y = dy.min(self.height as f32 - dy) / half_h;
        smootherstep(edge_x / band) * smootherstep(edge_y / band)
    }
}
