//! Alpha compositing with a foreground mask.
//!
//! Every operation expects a mask that has already been refined and matches
//! the image dimensions.

use crate::buffer::{blur_by_rescale, resize, FilterType, Mask, PixelBuffer, ProcessingError};
use crate::parallel::for_each_row_mut;

/// Turn foreground probability into alpha: `alpha = round(255 · mask)`.
///
/// RGB is unchanged.
pub fn remove_background(image: PixelBuffer, mask: &Mask) -> Result<PixelBuffer, ProcessingError> {
    check_dimensions(&image, mask)?;
    let width = image.width() as usize;
    let stride = image.stride();
    let values = mask.values();

    let mut out = image;
    for_each_row_mut(out.pixels_mut(), stride, |y, row| {
        let mask_row = &values[y * width..(y + 1) * width];
        for (px, &m) in row.chunks_exact_mut(4).zip(mask_row) {
            px[3] = (255.0 * m).round().clamp(0.0, 255.0) as u8;
        }
    });
    Ok(out)
}

/// Keep the foreground sharp and blur everything else.
///
/// The blur is a downscale/upscale round trip by `blur_factor`.
pub fn blur_background(
    image: PixelBuffer,
    mask: &Mask,
    blur_factor: f32,
) -> Result<PixelBuffer, ProcessingError> {
    check_dimensions(&image, mask)?;
    let blurred = blur_by_rescale(image.clone(), blur_factor)?;
    blend_with(image, mask, |x, y| {
        let i = (y * blurred.width() as usize + x) * 4;
        let p = &blurred.pixels()[i..i + 3];
        [p[0], p[1], p[2]]
    })
}

/// Replace the background with a solid RGB color.
pub fn replace_background_color(
    image: PixelBuffer,
    mask: &Mask,
    color: [u8; 3],
) -> Result<PixelBuffer, ProcessingError> {
    check_dimensions(&image, mask)?;
    blend_with(image, mask, |_, _| color)
}

/// Replace the background with another image, scaled to the foreground size.
pub fn replace_background_image(
    image: PixelBuffer,
    mask: &Mask,
    background: &PixelBuffer,
) -> Result<PixelBuffer, ProcessingError> {
    check_dimensions(&image, mask)?;
    let background = resize(background, image.width(), image.height(), FilterType::Bilinear)?;
    blend_with(image, mask, |x, y| {
        let i = (y * background.width() as usize + x) * 4;
        let p = &background.pixels()[i..i + 3];
        [p[0], p[1], p[2]]
    })
}

/// `result = orig · mask + background(x, y) · (1 − mask)` per RGB channel.
fn blend_with<F>(
    image: PixelBuffer,
    mask: &Mask,
    background: F,
) -> Result<PixelBuffer, ProcessingError>
where
    F: Fn(usize, usize) -> [u8; 3] + Sync + Send,
{
    let width = image.width() as usize;
    let stride = image.stride();
    let values = mask.values();

    let mut out = image;
    for_each_row_mut(out.pixels_mut(), stride, |y, row| {
        let mask_row = &values[y * width..(y + 1) * width];
        for (x, (px, &m)) in row.chunks_exact_mut(4).zip(mask_row).enumerate() {
            let bg = background(x, y);
            for c in 0..3 {
                let v = px[c] as f32 * m + bg[c] as f32 * (1.0 - m);
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    });
    Ok(out)
}

fn check_dimensions(image: &PixelBuffer, mask: &Mask) -> Result<(), ProcessingError> {
    if !mask.matches(image) {
        return Err(ProcessingError::DimensionMismatch {
            expected: image.dimensions(),
            actual: mask.dimensions(),
        });
    }
    Ok(())
}
