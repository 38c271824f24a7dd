//! Single-shot and tiled style transfer.

use super::descriptor::StyleDescriptor;
use super::fallback::NamedStyle;
use super::tiling::{tile_overlap, AccumulationBuffer, Tile, TileGrid};
use crate::adjustments::{unsharp_mask, ColorMatrix};
use crate::buffer::{resize, FilterType, PixelBuffer, ProcessingError};
use crate::cancel::CancellationToken;
use crate::config::StyleConfig;
use crate::denoise::denoise_with;
use crate::inference::{InferenceEngine, Tensor};
use log::{debug, warn};

/// How an image is fed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One inference at `min(maxDim, T)` square.
    SingleShot,
    /// Overlapping `T×T` tiles stitched with feathered weights.
    Tiled,
}

/// Drives style transfer through an [`InferenceEngine`].
///
/// # Pipeline
///
/// 1. Tiled mode when `max(width, height) > 2·T`, single-shot otherwise
/// 2. Pre-denoise when `max(width, height) > T`
/// 3. Single-shot: resize, infer, resize back, then sharpen and a mild
///    contrast/saturation boost
/// 4. Tiled: infer each tile in row-major order, adding it to one
///    accumulation buffer as it arrives, then post-denoise
///
/// Cancellation is checked between tiles. A cancelled run returns
/// [`ProcessingError::Cancelled`] and nothing from the unfinished run is used.
#[derive(Debug, Clone, Default)]
pub struct StyleCompositor {
    config: StyleConfig,
    cancel: CancellationToken,
}

impl StyleCompositor {
    pub fn new(config: StyleConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `token` for cancellation checkpoints.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn select_mode(&self, width: u32, height: u32) -> RenderMode {
        if width.max(height) > self.config.tile_size.saturating_mul(2) {
            RenderMode::Tiled
        } else {
            RenderMode::SingleShot
        }
    }

    /// Tile grid used for a `width × height` image in tiled mode.
    pub fn plan_tiles(&self, width: u32, height: u32) -> Result<TileGrid, ProcessingError> {
        let c = &self.config;
        let overlap = tile_overlap(c.tile_size, c.overlap_fraction, c.min_overlap);
        TileGrid::plan(width, height, c.tile_size, overlap)
    }

    /// Stylize `image`, falling back to `fallback`'s color matrix when the
    /// model cannot run.
    ///
    /// Without an engine or descriptor the fallback is used directly. Engine
    /// failures are logged and also produce the fallback. Only cancellation
    /// is returned as an error.
    pub fn stylize(
        &self,
        image: PixelBuffer,
        engine: Option<&mut dyn InferenceEngine>,
        descriptor: Option<&StyleDescriptor>,
        fallback: NamedStyle,
    ) -> Result<PixelBuffer, ProcessingError> {
        let (engine, descriptor) = match (engine, descriptor) {
            (Some(engine), Some(descriptor)) => (engine, descriptor),
            _ => {
                warn!("Style model unavailable, using '{}' color fallback", fallback);
                return Ok(fallback.apply(image));
            }
        };

        match self.stylize_with_engine(image.clone(), engine, descriptor) {
            Ok(styled) => Ok(styled),
            Err(ProcessingError::Cancelled) => Err(ProcessingError::Cancelled),
            Err(e) => {
                warn!("Style transfer failed ({}), using '{}' color fallback", e, fallback);
                Ok(fallback.apply(image))
            }
        }
    }

    /// Stylize with the model, returning any engine error to the caller.
    pub fn stylize_with_engine(
        &self,
        image: PixelBuffer,
        engine: &mut dyn InferenceEngine,
        descriptor: &StyleDescriptor,
    ) -> Result<PixelBuffer, ProcessingError> {
        let (width, height) = image.dimensions();
        let tile_size = self.config.tile_size;
        if tile_size == 0 {
            return Err(ProcessingError::InvalidDimensions {
                width: tile_size,
                height: tile_size,
            });
        }

        let max_dim = width.max(height);
        let mode = self.select_mode(width, height);
        debug!("Style transfer {}x{} in {:?} mode (T = {})", width, height, mode, tile_size);

        let image = if max_dim > tile_size {
            denoise_with(image, &self.config.pre_denoise)?
        } else {
            image
        };
        self.cancel.checkpoint()?;

        match mode {
            RenderMode::SingleShot => self.single_shot(image, engine, descriptor),
            RenderMode::Tiled => self.tiled(image, engine, descriptor),
        }
    }

    fn single_shot(
        &self,
        image: PixelBuffer,
        engine: &mut dyn InferenceEngine,
        descriptor: &StyleDescriptor,
    ) -> Result<PixelBuffer, ProcessingError> {
        let (width, height) = image.dimensions();
        // Never upscale a small image up to the model size
        let target = width.max(height).min(self.config.tile_size);

        let content = Tensor::from_image(&image, target)?;
        let styled = transfer(engine, &content, descriptor)?;
        let styled = resize(&styled, width, height, FilterType::Bilinear)?;

        let styled = unsharp_mask(styled, self.config.post_sharpen)?;
        let finish = ColorMatrix::contrast(self.config.post_contrast)
            .then(&ColorMatrix::saturation(self.config.post_saturation));
        Ok(finish.apply(styled))
    }

    fn tiled(
        &self,
        image: PixelBuffer,
        engine: &mut dyn InferenceEngine,
        descriptor: &StyleDescriptor,
    ) -> Result<PixelBuffer, ProcessingError> {
        let (width, height) = image.dimensions();
        let grid = self.plan_tiles(width, height)?;
        debug!(
            "Tiling {}x{}: {} tiles ({}x{}), overlap {}, step {}",
            width,
            height,
            grid.len(),
            grid.columns(),
            grid.rows(),
            grid.overlap(),
            grid.step()
        );

        let mut acc = AccumulationBuffer::new(width, height);
        for tile in grid.tiles() {
            self.cancel.checkpoint()?;
            let styled = self.infer_tile(&image, tile, engine, descriptor)?;
            acc.accumulate(tile, &styled)?;
        }
        self.cancel.checkpoint()?;

        let stitched = acc.finish_strict()?;
        denoise_with(stitched, &self.config.post_denoise)
    }

    fn infer_tile(
        &self,
        image: &PixelBuffer,
        tile: &Tile,
        engine: &mut dyn InferenceEngine,
        descriptor: &StyleDescriptor,
    ) -> Result<PixelBuffer, ProcessingError> {
        let crop = image.crop(tile.x, tile.y, tile.width, tile.height)?;
        let content = Tensor::from_image(&crop, tile.content_size)?;
        let styled = transfer(engine, &content, descriptor)?;
        resize(&styled, tile.width, tile.height, FilterType::Bilinear)
    }
}

/// Run the model and require an output the same shape as `content`.
fn transfer(
    engine: &mut dyn InferenceEngine,
    content: &Tensor,
    descriptor: &StyleDescriptor,
) -> Result<PixelBuffer, ProcessingError> {
    let styled = engine.style_transfer(content, descriptor.values())?;
    styled.expect_shape(content.shape())?;
    styled.to_image()
}
