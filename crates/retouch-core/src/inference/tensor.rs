//! Dense `f32` tensors and conversions to and from pixel buffers.

use super::InferenceError;
use crate::buffer::{resize, FilterType, PixelBuffer, ProcessingError};

/// A row-major `f32` tensor with an explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    /// Create a tensor, checking that `data` fills `shape` exactly.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, InferenceError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(InferenceError::ShapeMismatch {
                expected: shape,
                actual: vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    /// A tensor of zeros.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Resize `image` to `size×size` and normalize RGB to [0, 1].
    ///
    /// The result has shape `[size, size, 3]`; alpha is dropped.
    pub fn from_image(image: &PixelBuffer, size: u32) -> Result<Self, ProcessingError> {
        let resized = resize(image, size, size, FilterType::Bilinear)?;
        let data = resized
            .pixels()
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .map(|v| v as f32 / 255.0)
            .collect();
        Ok(Self {
            shape: vec![size as usize, size as usize, 3],
            data,
        })
    }

    /// Convert an `[H, W, 3]` tensor with values in [0, 1] to an opaque image.
    ///
    /// Values are clamped on conversion; NaN becomes 0.
    pub fn to_image(&self) -> Result<PixelBuffer, ProcessingError> {
        let (h, w) = match self.shape.as_slice() {
            [h, w, 3] => (*h, *w),
            _ => {
                return Err(InferenceError::ShapeMismatch {
                    expected: vec![0, 0, 3],
                    actual: self.shape.clone(),
                }
                .into())
            }
        };
        let mut pixels = Vec::with_capacity(h * w * 4);
        for rgb in self.data.chunks_exact(3) {
            for &v in rgb {
                let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
                pixels.push((v * 255.0).round() as u8);
            }
            pixels.push(255);
        }
        PixelBuffer::new(w as u32, h as u32, pixels)
    }

    /// Check that this tensor has exactly `shape`.
    pub fn expect_shape(&self, shape: &[usize]) -> Result<(), InferenceError> {
        if self.shape != shape {
            return Err(InferenceError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: self.shape.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(Tensor::new(vec![2, 2, 3], vec![0.0; 12]).is_ok());
        assert!(matches!(
            Tensor::new(vec![2, 2, 3], vec![0.0; 11]),
            Err(InferenceError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_image_normalizes() {
        let img = PixelBuffer::filled(10, 6, [255, 0, 51, 255]).unwrap();
        let t = Tensor::from_image(&img, 4).unwrap();
        assert_eq!(t.shape(), &[4, 4, 3]);
        assert!((t.data()[0] - 1.0).abs() < 1e-6);
        assert!((t.data()[1] - 0.0).abs() < 1e-6);
        assert!((t.data()[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_to_image_clamps() {
        let t = Tensor::new(vec![1, 2, 3], vec![-0.5, 0.5, 1.5, f32::NAN, 1.0, 0.0]).unwrap();
        let img = t.to_image().unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.pixels(), &[0, 128, 255, 255, 0, 255, 0, 255]);
    }

    #[test]
    fn test_to_image_rejects_wrong_rank() {
        let t = Tensor::zeros(vec![4, 4]);
        assert!(t.to_image().is_err());
    }

    #[test]
    fn test_image_tensor_round_trip_same_size() {
        let mut img = PixelBuffer::filled(3, 3, [10, 20, 30, 255]).unwrap();
        img.set(1, 1, [200, 100, 0, 255]);
        let back = Tensor::from_image(&img, 3).unwrap().to_image().unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_expect_shape() {
        let t = Tensor::zeros(vec![1, 100]);
        assert!(t.expect_shape(&[1, 100]).is_ok());
        assert!(t.expect_shape(&[100]).is_err());
    }
}
