//! Resampling helpers built on the `image` crate.
//!
//! All functions return new buffers without modifying the input.

use super::{FilterType, Mask, PixelBuffer, ProcessingError};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `ProcessingError::InvalidDimensions` for a zero target size.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, ProcessingError> {
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| ProcessingError::Resize("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(PixelBuffer::from_rgba_image(resized))
}

/// Cheap box-like blur: shrink by `factor`, then scale back up.
///
/// Both passes use bilinear filtering. A `factor` of 1 or less returns the
/// image unchanged.
pub fn blur_by_rescale(image: PixelBuffer, factor: f32) -> Result<PixelBuffer, ProcessingError> {
    if factor.is_nan() || factor <= 1.0 {
        return Ok(image);
    }
    let (width, height) = image.dimensions();
    let small_w = ((width as f32 / factor).round() as u32).max(1);
    let small_h = ((height as f32 / factor).round() as u32).max(1);

    let small = resize(&image, small_w, small_h, FilterType::Bilinear)?;
    resize(&small, width, height, FilterType::Bilinear)
}

/// Resample a mask with a triangle (bilinear) filter.
///
/// # Errors
///
/// Returns `ProcessingError::InvalidDimensions` for a zero target size.
pub fn resize_mask(mask: &Mask, width: u32, height: u32) -> Result<Mask, ProcessingError> {
    if width == 0 || height == 0 {
        return Err(ProcessingError::InvalidDimensions { width, height });
    }
    if mask.dimensions() == (width, height) {
        return Ok(mask.clone());
    }

    let luma = mask
        .to_luma_image()
        .ok_or_else(|| ProcessingError::Resize("Failed to create mask image".to_string()))?;

    let resized = image::imageops::resize(
        &luma,
        width,
        height,
        FilterType::Bilinear.to_image_filter(),
    );

    Mask::from_luma_image(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> PixelBuffer {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
                pixels.push(255); // A
            }
        }
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.dimensions(), (50, 25));
        assert_eq!(resized.pixels().len(), 50 * 25 * 4);
    }

    #[test]
    fn test_resize_same_dimensions() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(resize(&img, 0, 50, FilterType::Bilinear).is_err());
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_all_filter_types() {
        let img = create_test_image(100, 50);

        for filter in [
            FilterType::Nearest,
            FilterType::Bilinear,
            FilterType::Lanczos3,
        ] {
            let resized = resize(&img, 50, 25, filter).unwrap();
            assert_eq!(resized.dimensions(), (50, 25));
        }
    }

    #[test]
    fn test_blur_by_rescale_keeps_dimensions() {
        let img = create_test_image(64, 48);
        let blurred = blur_by_rescale(img, 4.0).unwrap();
        assert_eq!(blurred.dimensions(), (64, 48));
    }

    #[test]
    fn test_blur_by_rescale_factor_one_is_noop() {
        let img = create_test_image(16, 16);
        let out = blur_by_rescale(img.clone(), 1.0).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_blur_by_rescale_flat_image_unchanged() {
        let img = PixelBuffer::filled(32, 32, [90, 120, 30, 255]).unwrap();
        let out = blur_by_rescale(img.clone(), 3.0).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_blur_by_rescale_smooths_step_edge() {
        let mut img = PixelBuffer::filled(32, 8, [0, 0, 0, 255]).unwrap();
        for y in 0..8 {
            for x in 16..32 {
                img.set(x, y, [255, 255, 255, 255]);
            }
        }
        let out = blur_by_rescale(img, 4.0).unwrap();
        let edge = out.get(16, 4).unwrap()[0];
        assert!(edge > 0 && edge < 255, "Edge should be softened, got {}", edge);
    }

    #[test]
    fn test_resize_mask_upsample_constant() {
        let mask = Mask::filled(4, 4, 0.75).unwrap();
        let resized = resize_mask(&mask, 16, 12).unwrap();
        assert_eq!(resized.dimensions(), (16, 12));
        assert!(resized.values().iter().all(|v| (v - 0.75).abs() < 1e-6));
    }

    #[test]
    fn test_resize_mask_interpolates() {
        let mask = Mask::new(2, 1, vec![0.0, 1.0]).unwrap();
        let resized = resize_mask(&mask, 8, 1).unwrap();
        let v = resized.values();
        assert!(v[0] < 1e-6);
        assert!(v[7] > 1.0 - 1e-6);
        assert!(v[3] > 0.0 && v[3] < 1.0);
        assert!(v.windows(2).all(|w| w[0] <= w[1] + 1e-6));
    }

    #[test]
    fn test_resize_mask_downsample_stays_in_unit_range() {
        let values: Vec<f32> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect();
        let mask = Mask::new(8, 8, values).unwrap();
        let resized = resize_mask(&mask, 3, 5).unwrap();
        assert_eq!(resized.dimensions(), (3, 5));
        assert!(resized.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_resize_mask_zero_dimensions_error() {
        let mask = Mask::filled(4, 4, 0.5).unwrap();
        assert!(resize_mask(&mask, 0, 4).is_err());
    }
}
