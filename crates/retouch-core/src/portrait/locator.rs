//! Face region locators.
//!
//! [`RegionLocator`] is the seam for face detection. Two implementations
//! live here:
//!
//! - [`SkinToneLocator`]: pure-RGB heuristic, no model required
//! - [`DetectorLocator`]: placeholder for an anchor-based face detector whose
//!   raw output decoding is not implemented; it never reports a face

use crate::buffer::PixelBuffer;
use crate::region::Region;
use log::debug;

/// Finds the face region in an image.
pub trait RegionLocator {
    /// Return the face bounding box, or `None` when nothing is found.
    fn locate(&mut self, image: &PixelBuffer) -> Option<Region>;
}

/// Fraction of pixels that must match a skin rule to trust the box.
pub const MIN_SKIN_FRACTION: f32 = 0.05;

/// Padding added on every side of the skin bounding box.
pub const SKIN_BOX_PADDING: f32 = 0.15;

/// Skin-tone heuristic locator.
///
/// Pixels matching either RGB skin rule contribute to a bounding box. If
/// more than [`MIN_SKIN_FRACTION`] of the image matches, the box is padded
/// by [`SKIN_BOX_PADDING`] and returned.
#[derive(Debug, Clone, Copy)]
pub struct SkinToneLocator {
    pub min_fraction: f32,
    pub padding: f32,
}

impl Default for SkinToneLocator {
    fn default() -> Self {
        Self {
            min_fraction: MIN_SKIN_FRACTION,
            padding: SKIN_BOX_PADDING,
        }
    }
}

impl SkinToneLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`RegionLocator::locate`], but never empty-handed: falls back to
    /// [`Region::default_face`].
    pub fn locate_or_default(&self, image: &PixelBuffer) -> Region {
        self.find(image)
            .unwrap_or_else(|| Region::default_face(image.width(), image.height()))
    }

    fn find(&self, image: &PixelBuffer) -> Option<Region> {
        let (width, height) = image.dimensions();
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut matches = 0usize;

        for (i, px) in image.pixels().chunks_exact(4).enumerate() {
            if !is_skin(px[0], px[1], px[2]) {
                continue;
            }
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            matches += 1;
        }

        let fraction = matches as f32 / image.pixel_count().max(1) as f32;
        if matches == 0 || fraction <= self.min_fraction {
            debug!("Skin heuristic: {:.1}% match, no face", fraction * 100.0);
            return None;
        }
        let region =
            Region::from_bounds(min_x, min_y, max_x, max_y).padded(self.padding, width, height);
        debug!("Skin heuristic: {:.1}% match, face {:?}", fraction * 100.0, region);
        Some(region)
    }
}

impl RegionLocator for SkinToneLocator {
    fn locate(&mut self, image: &PixelBuffer) -> Option<Region> {
        self.find(image)
    }
}

/// RGB skin test: either the uniform-daylight rule or the flash rule.
#[inline]
pub fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    let daylight = r > 95
        && g > 40
        && b > 20
        && max - min > 15
        && (r - g).abs() > 15
        && r > g
        && r > b;
    let flash = r > 220 && g > 210 && b > 170 && (r - g).abs() <= 15 && r > b && g > b;
    daylight || flash
}

/// Anchor-based face detector front end.
///
/// Decoding the detector's raw box/score output is not implemented, so no
/// model is run and every call reports no face. Callers fall through to the
/// skin-tone heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectorLocator;

impl RegionLocator for DetectorLocator {
    fn locate(&mut self, image: &PixelBuffer) -> Option<Region> {
        debug!(
            "Face detector output decoding unavailable for {}x{}; reporting no face",
            image.width(),
            image.height()
        );
        None
    }
}

/// Try `primary`, then the skin-tone heuristic.
pub fn locate_face(image: &PixelBuffer, primary: Option<&mut dyn RegionLocator>) -> Option<Region> {
    if let Some(locator) = primary {
        let found = locator
            .locate(image)
            .map(|r| r.clamp_to(image.width(), image.height()))
            .filter(|r| !r.is_empty());
        if found.is_some() {
            return found;
        }
    }
    SkinToneLocator::new().find(image)
}
