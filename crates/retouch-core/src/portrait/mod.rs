//! Region-limited portrait retouching.
//!
//! Three effects are confined to a face box and fade into the surrounding
//! pixels:
//!
//! - [`beauty_smooth`]: edge-preserving skin smoothing
//! - [`brighten_eyes`]: multiplicative boost in two eye rectangles
//! - [`blur_face`]: box blur with an elliptical falloff
//!
//! The face box comes from a [`RegionLocator`]. When nothing is found,
//! smoothing covers the whole image and the other two effects use
//! [`Region::default_face`].

mod blur;
mod eyes;
mod locator;
mod smooth;

pub use blur::{blur_face, face_blur_radius, MAX_FACE_BLUR_RADIUS};
pub use eyes::{brighten_eyes, eye_regions, MAX_EYE_BOOST};
pub use locator::{
    is_skin, locate_face, DetectorLocator, RegionLocator, SkinToneLocator, MIN_SKIN_FRACTION,
    SKIN_BOX_PADDING,
};
pub use smooth::{beauty_smooth, smoothing_radius, EDGE_THRESHOLD, MAX_SMOOTH_BLEND};

use crate::buffer::PixelBuffer;
use crate::region::Region;
use log::debug;

/// Applies portrait effects to the face found by its locator.
///
/// The locator is tried first, then the skin-tone heuristic.
#[derive(Debug, Default)]
pub struct Retoucher<L: RegionLocator = DetectorLocator> {
    locator: L,
}

impl Retoucher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: RegionLocator> Retoucher<L> {
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    /// The face box, if the locator or the heuristic finds one.
    pub fn face_region(&mut self, image: &PixelBuffer) -> Option<Region> {
        locate_face(image, Some(&mut self.locator))
    }

    pub fn beauty_filter(&mut self, image: PixelBuffer, intensity: f32) -> PixelBuffer {
        let face = self.face_region(&image);
        if face.is_none() {
            debug!("No face found, smoothing whole image");
        }
        beauty_smooth(image, face, intensity)
    }

    pub fn enhance_eyes(&mut self, image: PixelBuffer, intensity: f32) -> PixelBuffer {
        let face = self.face_region(&image);
        if face.is_none() {
            debug!("No face found, using default face box for eyes");
        }
        brighten_eyes(image, face, intensity)
    }

    pub fn blur_face(&mut self, image: PixelBuffer, intensity: f32) -> PixelBuffer {
        let face = self.face_region(&image);
        if face.is_none() {
            debug!("No face found, blurring default face box");
        }
        blur_face(image, face, intensity)
    }
}
