//! Test double for [`InferenceEngine`].

use super::{InferenceEngine, InferenceError, Tensor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Echoes content tensors back, counts calls, and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct MockEngine {
    pub transfer_calls: usize,
    pub predict_calls: usize,
    /// Fail every style transfer call after this many successes.
    pub fail_transfer_after: Option<usize>,
    /// Output returned by `segment`; `None` makes segmentation unavailable.
    pub segmentation: Option<Tensor>,
    pub descriptor_len: usize,
    /// Shape of every content tensor passed to `style_transfer`.
    pub content_shapes: Vec<Vec<usize>>,
    pub last_content: Option<Tensor>,
    released: Arc<AtomicBool>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            descriptor_len: 100,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_transfer_after: Some(0),
            ..Self::new()
        }
    }

    pub fn released_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl InferenceEngine for MockEngine {
    fn style_predict(&mut self, _style: &Tensor) -> Result<Vec<f32>, InferenceError> {
        self.predict_calls += 1;
        Ok(vec![0.5; self.descriptor_len])
    }

    fn style_transfer(
        &mut self,
        content: &Tensor,
        _style: &[f32],
    ) -> Result<Tensor, InferenceError> {
        if let Some(limit) = self.fail_transfer_after {
            if self.transfer_calls >= limit {
                return Err(InferenceError::Backend("mock failure".to_string()));
            }
        }
        self.transfer_calls += 1;
        self.content_shapes.push(content.shape().to_vec());
        self.last_content = Some(content.clone());
        Ok(content.clone())
    }

    fn segment(&mut self, _input: &Tensor) -> Result<Tensor, InferenceError> {
        self.segmentation
            .clone()
            .ok_or_else(|| InferenceError::Unavailable("no segmentation model".to_string()))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
