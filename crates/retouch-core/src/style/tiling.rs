//! Overlapping tile grids and feathered accumulation.
//!
//! # Grid
//!
//! Tile origins on each axis are `0, step, 2·step, ...` with
//! `step = T - overlap`. The walk stops after the first tile whose far edge
//! reaches the image boundary; that tile is clipped rather than skipped, so
//! every pixel lies in at least one tile.
//!
//! # Stitching
//!
//! Each tile contributes `rgb * weight` and `weight` to a single
//! [`AccumulationBuffer`], with a triangular weight peaking at the tile
//! center. Tiles are added one at a time as they arrive; the rows of one
//! tile are disjoint in the buffer and are accumulated in parallel.

use crate::buffer::{to_u8, PixelBuffer, ProcessingError};
use log::{debug, warn};
use rayon::prelude::*;

/// Floor for the per-axis feather weight.
///
/// The plain triangle is zero on a tile's outer rows and columns, which on
/// the image border are covered by no other tile.
pub const MIN_FEATHER_WEIGHT: f32 = 1e-4;

/// Smallest number of tile rows handed to one rayon task.
const MIN_ROWS_PER_TASK: usize = 16;

/// One tile of the grid, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Square size the tile is resized to for inference.
    pub content_size: u32,
}

/// Overlap in pixels: `max(fraction * T, min_overlap)`, leaving a step of at
/// least one pixel.
pub fn tile_overlap(tile_size: u32, fraction: f32, min_overlap: u32) -> u32 {
    let scaled = (tile_size as f32 * fraction.max(0.0)) as u32;
    scaled.max(min_overlap).min(tile_size.saturating_sub(1))
}

fn axis_origins(dim: u32, tile_size: u32, step: u32) -> Vec<u32> {
    let mut origins = Vec::new();
    let mut origin = 0;
    loop {
        origins.push(origin);
        if origin + tile_size >= dim {
            break;
        }
        origin += step;
    }
    origins
}

/// A row-major grid of overlapping tiles covering an image.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tile_size: u32,
    overlap: u32,
    columns: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Plan tiles of `tile_size` with `overlap` over a `width × height` image.
    pub fn plan(
        width: u32,
        height: u32,
        tile_size: u32,
        overlap: u32,
    ) -> Result<Self, ProcessingError> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::InvalidDimensions { width, height });
        }
        if tile_size == 0 || overlap >= tile_size {
            return Err(ProcessingError::InvalidDimensions {
                width: tile_size,
                height: tile_size,
            });
        }

        let step = tile_size - overlap;
        let xs = axis_origins(width, tile_size, step);
        let ys = axis_origins(height, tile_size, step);

        let mut tiles = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                tiles.push(Tile {
                    x,
                    y,
                    width: tile_size.min(width - x),
                    height: tile_size.min(height - y),
                    content_size: tile_size,
                });
            }
        }

        Ok(Self {
            tile_size,
            overlap,
            columns: xs.len(),
            rows: ys.len(),
            tiles,
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn overlap(&self) -> u32 {
        self.overlap
    }

    pub fn step(&self) -> u32 {
        self.tile_size - self.overlap
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Triangular weight of position `i` along an axis of `len` pixels.
///
/// `1 - |2·i/(len-1) - 1|`, floored at [`MIN_FEATHER_WEIGHT`]; 1 when
/// `len <= 1`.
#[inline]
pub fn feather_weight(i: u32, len: u32) -> f32 {
    if len <= 1 {
        return 1.0;
    }
    let t = i as f32 / (len - 1) as f32;
    (1.0 - (2.0 * t - 1.0).abs()).clamp(MIN_FEATHER_WEIGHT, 1.0)
}

/// Weighted RGB sums and weights for a whole image.
///
/// One buffer serves a whole stitch.
#[derive(Debug)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    r: Vec<f32>,
    g: Vec<f32>,
    b: Vec<f32>,
    weight: Vec<f32>,
}

impl AccumulationBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        #[cfg(test)]
        live::created((width, height));
        Self {
            width,
            height,
            r: vec![0.0; len],
            g: vec![0.0; len],
            b: vec![0.0; len],
            weight: vec![0.0; len],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn weight_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.weight
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Add a tile's pixels with feathered weights at the tile's offset.
    pub fn accumulate(
        &mut self,
        tile: &Tile,
        pixels: &PixelBuffer,
    ) -> Result<(), ProcessingError> {
        if pixels.dimensions() != (tile.width, tile.height) {
            return Err(ProcessingError::DimensionMismatch {
                expected: (tile.width, tile.height),
                actual: pixels.dimensions(),
            });
        }
        let right = tile.x.saturating_add(tile.width);
        let bottom = tile.y.saturating_add(tile.height);
        if right > self.width || bottom > self.height {
            return Err(ProcessingError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (right, bottom),
            });
        }

        if tile.width == 0 || tile.height == 0 {
            return Ok(());
        }

        let wx: Vec<f32> = (0..tile.width).map(|i| feather_weight(i, tile.width)).collect();
        let width = self.width as usize;
        let rows = tile.y as usize * width..bottom as usize * width;
        let x0 = tile.x as usize;

        self.r[rows.clone()]
            .par_chunks_mut(width)
            .zip(self.g[rows.clone()].par_chunks_mut(width))
            .zip(self.b[rows.clone()].par_chunks_mut(width))
            .zip(self.weight[rows].par_chunks_mut(width))
            .zip(pixels.pixels().par_chunks_exact(pixels.stride()))
            .enumerate()
            .with_min_len(MIN_ROWS_PER_TASK)
            .for_each(|(ty, ((((r, g), b), weight), src))| {
                let wy = feather_weight(ty as u32, tile.height);
                for (tx, px) in src.chunks_exact(4).enumerate() {
                    let w = (wx[tx] * wy).clamp(0.0, 1.0);
                    let i = x0 + tx;
                    r[i] += px[0] as f32 * w;
                    g[i] += px[1] as f32 * w;
                    b[i] += px[2] as f32 * w;
                    weight[i] += w;
                }
            });
        Ok(())
    }

    /// First pixel, in row-major order, that received no weight.
    pub fn coverage_gap(&self) -> Option<(u32, u32)> {
        let w = self.width as usize;
        self.weight
            .iter()
            .position(|&v| v <= 0.0)
            .map(|i| ((i % w) as u32, (i / w) as u32))
    }

    /// Resolve to an opaque image. Pixels with no weight become opaque black.
    pub fn finish(self) -> Result<PixelBuffer, ProcessingError> {
        if let Some((x, y)) = self.coverage_gap() {
            warn!("Tile coverage gap at ({}, {}), writing black", x, y);
        }
        let mut pixels = Vec::with_capacity(self.weight.len() * 4);
        for i in 0..self.weight.len() {
            let w = self.weight[i];
            if w > 0.0 {
                pixels.extend_from_slice(&[
                    to_u8(self.r[i] / w),
                    to_u8(self.g[i] / w),
                    to_u8(self.b[i] / w),
                    255,
                ]);
            } else {
                pixels.extend_from_slice(&[0, 0, 0, 255]);
            }
        }
        PixelBuffer::new(self.width, self.height, pixels)
    }

    /// Like [`finish`](Self::finish), but a pixel with no weight is an error.
    pub fn finish_strict(self) -> Result<PixelBuffer, ProcessingError> {
        if let Some((x, y)) = self.coverage_gap() {
            return Err(ProcessingError::CoverageGap { x, y });
        }
        self.finish()
    }
}

/// Blend stylized tiles into one `width × height` image.
///
/// All tiles go into one [`AccumulationBuffer`]. Any uncovered pixel is
/// reported as [`ProcessingError::CoverageGap`].
pub fn stitch(
    width: u32,
    height: u32,
    tiles: &[(Tile, PixelBuffer)],
) -> Result<PixelBuffer, ProcessingError> {
    debug!("Stitching {} tiles into {}x{}", tiles.len(), width, height);
    let mut acc = AccumulationBuffer::new(width, height);
    for (tile, pixels) in tiles {
        acc.accumulate(tile, pixels)?;
    }
    acc.finish_strict()
}

#[cfg(test)]
impl Drop for AccumulationBuffer {
    fn drop(&mut self) {
        live::dropped((self.width, self.height));
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        assert_eq!(tile_overlap(384, 0.25, 16), 96);
        assert_eq!(tile_overlap(32, 0.25, 16), 16);
        assert_eq!(tile_overlap(8, 0.25, 16), 7);
    }

    #[test]
    fn test_reference_grid() {
        let grid = TileGrid::plan(1200, 1200, 384, 96).unwrap();
        assert_eq!(grid.step(), 288);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.len(), 16);
        for tile in grid.tiles() {
            assert!(tile.x + tile.width <= 1200);
            assert!(tile.y + tile.height <= 1200);
            assert_eq!(tile.content_size, 384);
        }
        // Last tile of a row is clipped, not skipped
        let last = grid.tiles()[3];
        assert_eq!((last.x, last.width), (864, 336));
    }

    #[test]
    fn test_grid_row_major() {
        let grid = TileGrid::plan(100, 60, 40, 10).unwrap();
        let origins: Vec<(u32, u32)> = grid.tiles().iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(origins, vec![(0, 0), (30, 0), (60, 0), (0, 30), (30, 30), (60, 30)]);
    }

    #[test]
    fn test_small_image_single_tile() {
        let grid = TileGrid::plan(50, 20, 64, 16).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.tiles()[0], Tile { x: 0, y: 0, width: 50, height: 20, content_size: 64 });
    }

    #[test]
    fn test_invalid_plans() {
        assert!(TileGrid::plan(0, 10, 8, 2).is_err());
        assert!(TileGrid::plan(10, 10, 0, 0).is_err());
        assert!(TileGrid::plan(10, 10, 8, 8).is_err());
    }

    #[test]
    fn test_feather_weight_shape() {
        assert_eq!(feather_weight(0, 1), 1.0);
        assert_eq!(feather_weight(0, 5), MIN_FEATHER_WEIGHT);
        assert_eq!(feather_weight(4, 5), MIN_FEATHER_WEIGHT);
        assert_eq!(feather_weight(2, 5), 1.0);
        assert!((feather_weight(1, 5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_accumulate_rejects_wrong_size() {
        let mut acc = AccumulationBuffer::new(10, 10);
        let tile = Tile { x: 0, y: 0, width: 4, height: 4, content_size: 4 };
        let px = PixelBuffer::filled(3, 4, [0, 0, 0, 255]).unwrap();
        assert!(matches!(
            acc.accumulate(&tile, &px),
            Err(ProcessingError::DimensionMismatch { .. })
        ));
        let outside = Tile { x: 8, y: 8, width: 4, height: 4, content_size: 4 };
        let px = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
        assert!(acc.accumulate(&outside, &px).is_err());
    }

    fn half_covered() -> AccumulationBuffer {
        let mut acc = AccumulationBuffer::new(4, 1);
        let tile = Tile { x: 0, y: 0, width: 2, height: 1, content_size: 2 };
        acc.accumulate(&tile, &PixelBuffer::filled(2, 1, [200, 100, 50, 255]).unwrap())
            .unwrap();
        acc
    }

    #[test]
    fn test_gap_is_black_or_error() {
        let acc = half_covered();
        assert_eq!(acc.coverage_gap(), Some((2, 0)));

        let img = acc.finish().unwrap();
        assert_eq!(img.get(0, 0).unwrap(), [200, 100, 50, 255]);
        assert_eq!(img.get(3, 0).unwrap(), [0, 0, 0, 255]);
        assert!(matches!(
            half_covered().finish_strict(),
            Err(ProcessingError::CoverageGap { x: 2, y: 0 })
        ));
    }

    #[test]
    fn test_overlapping_tiles_sum() {
        let tile = Tile { x: 0, y: 0, width: 1, height: 1, content_size: 1 };
        let mut acc = AccumulationBuffer::new(1, 1);
        acc.accumulate(&tile, &PixelBuffer::filled(1, 1, [100, 0, 0, 255]).unwrap())
            .unwrap();
        acc.accumulate(&tile, &PixelBuffer::filled(1, 1, [200, 0, 0, 255]).unwrap())
            .unwrap();
        assert_eq!(acc.weight_at(0, 0), Some(2.0));
        assert_eq!(acc.finish().unwrap().get(0, 0).unwrap(), [150, 0, 0, 255]);
    }

    #[test]
    fn test_accumulate_tall_tile_matches_row_weights() {
        // Enough rows to be split across rayon tasks
        let tile = Tile { x: 3, y: 2, width: 5, height: 70, content_size: 70 };
        let mut acc = AccumulationBuffer::new(10, 80);
        acc.accumulate(&tile, &PixelBuffer::filled(5, 70, [50, 60, 70, 255]).unwrap())
            .unwrap();
        for ty in [0, 17, 35, 52, 69] {
            let expected = feather_weight(2, 5) * feather_weight(ty, 70);
            let got = acc.weight_at(5, 2 + ty).unwrap();
            assert!((got - expected).abs() < 1e-6, "row {}: {} vs {}", ty, got, expected);
        }
        assert_eq!(acc.weight_at(2, 10), Some(0.0));
        assert_eq!(acc.weight_at(5, 1), Some(0.0));
    }

    #[test]
    fn test_stitch_uses_one_accumulator() {
        // Size unique to this test so parallel tests do not share counts
        let (width, height) = (301, 157);
        let grid = TileGrid::plan(width, height, 24, 8).unwrap();
        assert!(grid.len() > 100);
        let tiles: Vec<(Tile, PixelBuffer)> = grid
            .tiles()
            .iter()
            .map(|t| (*t, PixelBuffer::filled(t.width, t.height, [9, 9, 9, 255]).unwrap()))
            .collect();
        stitch(width, height, &tiles).unwrap();
        assert_eq!(live::peak((width, height)), 1);
    }

    #[test]
    fn test_stitch_reference_grid_full_coverage() {
        let grid = TileGrid::plan(1200, 1200, 384, 96).unwrap();
        let tiles: Vec<(Tile, PixelBuffer)> = grid
            .tiles()
            .iter()
            .map(|t| (*t, PixelBuffer::filled(t.width, t.height, [10, 120, 230, 255]).unwrap()))
            .collect();
        let out = stitch(1200, 1200, &tiles).unwrap();
        assert_eq!(out.dimensions(), (1200, 1200));
        assert!(out.pixels().chunks_exact(4).all(|p| p == [10, 120, 230, 255]));
    }

    #[test]
    fn test_stitch_blends_overlap() {
        // Two tiles side by side, dark left and bright right
        let grid = TileGrid::plan(30, 10, 20, 10).unwrap();
        assert_eq!(grid.len(), 2);
        let colors = [[0u8, 0, 0, 255], [200, 200, 200, 255]];
        let tiles: Vec<(Tile, PixelBuffer)> = grid
            .tiles()
            .iter()
            .zip(colors)
            .map(|(t, c)| (*t, PixelBuffer::filled(t.width, t.height, c).unwrap()))
            .collect();
        let out = stitch(30, 10, &tiles).unwrap();
        assert_eq!(out.get(2, 5).unwrap()[0], 0);
        assert_eq!(out.get(27, 5).unwrap()[0], 200);
        let mid = out.get(15, 5).unwrap()[0];
        assert!(mid > 20 && mid < 180, "{}", mid);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            /// Property: every pixel receives weight, so a uniform tile color
            /// survives stitching exactly.
            #[test]
            fn prop_full_coverage(
                width in 1u32..200,
                height in 1u32..200,
                tile_size in 8u32..80,
                fraction in 0.0f32..0.6,
            ) {
                let overlap = tile_overlap(tile_size, fraction, 4);
                let grid = TileGrid::plan(width, height, tile_size, overlap).unwrap();
                let mut acc = AccumulationBuffer::new(width, height);
                for tile in grid.tiles() {
                    let color = [77, 5, 250, 255];
                    let px = PixelBuffer::filled(tile.width, tile.height, color).unwrap();
                    acc.accumulate(tile, &px).unwrap();
                }
                prop_assert_eq!(acc.coverage_gap(), None);
                let out = acc.finish_strict().unwrap();
                prop_assert!(out.pixels().chunks_exact(4).all(|p| p == [77, 5, 250, 255]));
            }
        }
    }
}
