//! Where masks come from: segmentation output or the radial fallback.

use super::refine_mask;
use crate::buffer::{resize_mask, Mask, PixelBuffer, ProcessingError};
use crate::config::BackgroundConfig;
use crate::inference::{InferenceEngine, InferenceError, Tensor};
use log::{debug, warn};

/// Algorithmic fallback: a radial gradient centered on the image.
///
/// `mask = clamp(1 − (dist / maxDist)², 0, 1)` where `maxDist` is the
/// center-to-corner distance.
pub fn radial_fallback_mask(width: u32, height: u32) -> Result<Mask, ProcessingError> {
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions { width, height });
    }
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();

    let mut values = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let t = (dx * dx + dy * dy).sqrt() / max_dist;
            values.push(1.0 - t * t);
        }
    }
    Mask::new(width, height, values)
}

/// Decode an `[H, W, C]` segmentation tensor into a mask of the given size.
///
/// With `C == 1` the values are foreground probabilities. With `C > 1` a
/// pixel is foreground (1) when `foreground_class` has the highest score and
/// background (0) otherwise.
pub fn mask_from_segmentation(
    output: &Tensor,
    foreground_class: usize,
    width: u32,
    height: u32,
) -> Result<Mask, ProcessingError> {
    let (h, w, c) = match output.shape() {
        [h, w, c] if *h > 0 && *w > 0 && *c > 0 => (*h, *w, *c),
        other => {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![0, 0, 1],
                actual: other.to_vec(),
            }
            .into())
        }
    };

    let values: Vec<f32> = if c == 1 {
        output.data().to_vec()
    } else {
        if foreground_class >= c {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![h, w, foreground_class + 1],
                actual: output.shape().to_vec(),
            }
            .into());
        }
        output
            .data()
            .chunks_exact(c)
            .map(|scores| {
                let best = scores
                    .iter()
                    .enumerate()
                    .fold((0usize, f32::NEG_INFINITY), |best, (i, &s)| {
                        if s > best.1 {
                            (i, s)
                        } else {
                            best
                        }
                    })
                    .0;
                if best == foreground_class {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    };

    let raw = Mask::new(w as u32, h as u32, values)?;
    resize_mask(&raw, width, height)
}

/// Produce a refined foreground mask for `image`.
///
/// Tries the engine's segmentation first; if no engine is given or it fails,
/// falls back to [`radial_fallback_mask`]. The fallback is normal behavior,
/// not an error. Only invalid dimensions propagate.
pub fn foreground_mask(
    image: &PixelBuffer,
    engine: Option<&mut dyn InferenceEngine>,
    config: &BackgroundConfig,
) -> Result<Mask, ProcessingError> {
    let (width, height) = image.dimensions();
    let raw = match engine {
        Some(engine) => match segment_with(engine, image, config) {
            Ok(mask) => mask,
            Err(ProcessingError::Inference(err)) => {
                warn!("Segmentation unavailable, using radial fallback: {}", err);
                radial_fallback_mask(width, height)?
            }
            Err(err) => return Err(err),
        },
        None => {
            debug!("No segmentation engine, using radial fallback");
            radial_fallback_mask(width, height)?
        }
    };
    refine_mask(&raw, config.refine_radius)
}

fn segment_with(
    engine: &mut dyn InferenceEngine,
    image: &PixelBuffer,
    config: &BackgroundConfig,
) -> Result<Mask, ProcessingError> {
    let input = Tensor::from_image(image, config.segmentation_size)?;
    let output = engine.segment(&input)?;
    mask_from_segmentation(&output, config.foreground_class, image.width(), image.height())
}
