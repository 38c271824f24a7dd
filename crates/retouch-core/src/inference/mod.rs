//! The inference engine contract.
//!
//! Model loading and tensor execution live outside this crate. Everything
//! model-backed goes through [`InferenceEngine`], a tensor-in/tensor-out
//! interface with three operations:
//!
//! - **style predict**: square RGB tensor → fixed-length embedding
//! - **style transfer**: `T×T×3` content tensor + embedding → `T×T×3` tensor
//! - **segmentation**: square RGB tensor → `H×W×C` probabilities/logits
//!
//! Engines are not reentrant. Every operation takes `&mut self`, so a single
//! engine can only ever serve one caller at a time.
//!
//! [`ModelHandle`] owns an engine for a scope and guarantees
//! [`InferenceEngine::release`] runs on every exit path.

mod tensor;

#[cfg(test)]
pub(crate) mod mock;

pub use tensor::Tensor;

use log::debug;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Error types raised by an inference engine.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The model is missing or failed to initialize.
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// A tensor did not have the expected shape or length.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The backend reported an execution error.
    #[error("Inference backend error: {0}")]
    Backend(String),
}

/// A tensor-in/tensor-out model runtime.
///
/// Operations a particular engine does not support keep the default
/// implementation, which reports [`InferenceError::Unavailable`].
pub trait InferenceEngine {
    /// Compute a style embedding from a normalized square RGB tensor.
    fn style_predict(&mut self, _style: &Tensor) -> Result<Vec<f32>, InferenceError> {
        Err(InferenceError::Unavailable("style predict".to_string()))
    }

    /// Stylize a `T×T×3` content tensor with a style embedding.
    fn style_transfer(
        &mut self,
        _content: &Tensor,
        _style: &[f32],
    ) -> Result<Tensor, InferenceError> {
        Err(InferenceError::Unavailable("style transfer".to_string()))
    }

    /// Run segmentation over a normalized square RGB tensor.
    fn segment(&mut self, _input: &Tensor) -> Result<Tensor, InferenceError> {
        Err(InferenceError::Unavailable("segmentation".to_string()))
    }

    /// Free interpreter resources. Called exactly once by [`ModelHandle`].
    fn release(&mut self) {}
}

/// Scoped ownership of a loaded engine.
///
/// The engine is released when the handle drops, including on early returns
/// and panics unwinding through the scope.
#[derive(Debug)]
pub struct ModelHandle<E: InferenceEngine> {
    engine: E,
}

impl<E: InferenceEngine> ModelHandle<E> {
    /// Load an engine through `loader`.
    pub fn acquire<F>(loader: F) -> Result<Self, InferenceError>
    where
        F: FnOnce() -> Result<E, InferenceError>,
    {
        let engine = loader()?;
        debug!("Model acquired");
        Ok(Self { engine })
    }

    /// Wrap an already-loaded engine.
    pub fn from_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Load an engine, run `f` with it, and release it before returning.
    pub fn scoped<L, F, T>(loader: L, f: F) -> Result<T, InferenceError>
    where
        L: FnOnce() -> Result<E, InferenceError>,
        F: FnOnce(&mut E) -> T,
    {
        let mut handle = Self::acquire(loader)?;
        Ok(f(&mut handle))
    }
}

impl<E: InferenceEngine> Deref for ModelHandle<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.engine
    }
}

impl<E: InferenceEngine> DerefMut for ModelHandle<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: InferenceEngine> Drop for ModelHandle<E> {
    fn drop(&mut self) {
        self.engine.release();
        debug!("Model released");
    }
}
