//! Tunable constants for the processing engine.
//!
//! Defaults are the reference values. Every struct uses `#[serde(default)]`,
//! so a host can override a single field from JSON and inherit the rest.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub style: StyleConfig,
    pub background: BackgroundConfig,
}

/// Denoiser settings for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseSettings {
    /// Downscale factor for the blurred reference.
    pub radius: f32,
    /// Fraction of the original kept in the final mix (0-1).
    pub strength: f32,
}

impl Default for DenoiseSettings {
    fn default() -> Self {
        Self {
            radius: 2.0,
            strength: 0.6,
        }
    }
}

/// Style transfer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Model content tile size `T` (square).
    pub tile_size: u32,
    /// Overlap between neighboring tiles as a fraction of `T`.
    pub overlap_fraction: f32,
    /// Minimum overlap in pixels.
    pub min_overlap: u32,
    /// Input size of the style-predict model (square).
    pub style_input_size: u32,
    /// Expected StyleDescriptor length.
    pub descriptor_len: usize,
    /// Denoise pass before inference.
    pub pre_denoise: DenoiseSettings,
    /// Denoise pass over the stitched result (keeps more of the original).
    pub post_denoise: DenoiseSettings,
    /// Unsharp factor applied after single-shot inference.
    pub post_sharpen: f32,
    /// Contrast boost applied after single-shot inference.
    pub post_contrast: f32,
    /// Saturation boost applied after single-shot inference.
    pub post_saturation: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            tile_size: 384,
            overlap_fraction: 0.25,
            min_overlap: 16,
            style_input_size: 256,
            descriptor_len: 100,
            pre_denoise: DenoiseSettings {
                radius: 2.0,
                strength: 0.6,
            },
            post_denoise: DenoiseSettings {
                radius: 2.0,
                strength: 0.8,
            },
            post_sharpen: 0.3,
            post_contrast: 0.05,
            post_saturation: 0.1,
        }
    }
}

/// Background segmentation and compositing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Input size of the segmentation model (square).
    pub segmentation_size: u32,
    /// Class index treated as foreground for multi-class outputs.
    pub foreground_class: usize,
    /// Box radius used to refine the raw mask.
    pub refine_radius: u32,
    /// Downscale factor for the background blur.
    pub blur_factor: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            segmentation_size: 257,
            // "person" in the 21-class PASCAL VOC label map
            foreground_class: 15,
            refine_radius: 3,
            blur_factor: 8.0,
        }
    }
}
