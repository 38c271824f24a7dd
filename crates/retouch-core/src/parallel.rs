//! Threshold-based dispatch between rayon and sequential iteration.
//!
//! Small images are processed sequentially; the rayon pool only pays off once
//! the pixel count crosses [`PARALLEL_THRESHOLD`].

use rayon::prelude::*;

/// Pixel count above which per-pixel passes run on the rayon pool.
pub(crate) const PARALLEL_THRESHOLD: usize = 30_000;

/// Apply `f` to every 4-byte pixel in place.
pub(crate) fn for_each_pixel_mut<F>(pixels: &mut [u8], f: F)
where
    F: Fn(&mut [u8]) + Sync + Send,
{
    if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        pixels.par_chunks_exact_mut(4).for_each(f);
    } else {
        pixels.chunks_exact_mut(4).for_each(f);
    }
}

/// Apply `f(y, row)` to every row of `stride` bytes in place.
pub(crate) fn for_each_row_mut<F>(data: &mut [u8], stride: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    if stride == 0 {
        return;
    }
    if data.len() / 4 >= PARALLEL_THRESHOLD {
        data.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    } else {
        data.chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }
}

/// Build a row-major `Vec` of `width * height` values from a per-row producer.
pub(crate) fn collect_rows<T, F>(width: usize, height: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> Vec<T> + Sync + Send,
{
    if width * height >= PARALLEL_THRESHOLD {
        (0..height).into_par_iter().flat_map_iter(&f).collect()
    } else {
        (0..height).flat_map(f).collect()
    }
}
