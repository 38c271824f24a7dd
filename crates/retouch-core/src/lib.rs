//! Retouch Core - pixel transformation engine
//!
//! This crate provides the numerically dense parts of the photo editor:
//! tiled style transfer with feathered stitching, mask-based background
//! compositing, region-limited portrait retouching, and the global color
//! adjustment pipeline.
//!
//! Neural networks are reached only through the [`inference::InferenceEngine`]
//! trait. Every model-backed operation has a deterministic algorithmic
//! fallback, so a missing model never prevents producing an image.

pub mod adjustments;
pub mod buffer;
pub mod cancel;
pub mod config;
pub mod denoise;
pub mod inference;
pub mod luminance;
pub mod mask;
pub(crate) mod parallel;
pub mod portrait;
pub mod region;
pub mod style;

pub use adjustments::apply_adjustments;
pub use buffer::{FilterType, Mask, PixelBuffer, ProcessingError};
pub use cancel::CancellationToken;
pub use config::ProcessingConfig;
pub use denoise::denoise;
pub use inference::{InferenceEngine, InferenceError, ModelHandle, Tensor};
pub use region::Region;
pub use style::{NamedStyle, StyleCache, StyleCompositor, StyleDescriptor};

/// Global color adjustments for image editing.
///
/// Every value is in [-1, 1] and 0 means "leave unchanged". Values outside
/// the range are clamped before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdjustmentParams {
    /// Additive brightness (-1 to 1)
    pub brightness: f32,
    /// Contrast around mid-gray (-1 to 1)
    pub contrast: f32,
    /// Saturation (-1 = grayscale, 1 = doubled)
    pub saturation: f32,
    /// White balance temperature (-1 = cool, 1 = warm)
    pub temperature: f32,
    /// Green-magenta tint (-1 = green, 1 = magenta)
    pub tint: f32,
    /// Unsharp-mask sharpness (0 to 1; negative values are ignored)
    pub sharpness: f32,
}

impl AdjustmentParams {
    /// Create a new AdjustmentParams with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Copy with every field clamped to [-1, 1] and NaN treated as 0.
    pub fn clamped(&self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(-1.0, 1.0)
            }
        }
        Self {
            brightness: unit(self.brightness),
            contrast: unit(self.contrast),
            saturation: unit(self.saturation),
            temperature: unit(self.temperature),
            tint: unit(self.tint),
            sharpness: unit(self.sharpness),
        }
    }
}
