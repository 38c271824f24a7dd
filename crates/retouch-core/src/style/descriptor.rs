//! Style embeddings and their per-style cache.

use crate::buffer::{PixelBuffer, ProcessingError};
use crate::config::StyleConfig;
use crate::inference::{InferenceEngine, InferenceError, Tensor};
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Fixed-length embedding that conditions style transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    values: Vec<f32>,
}

impl StyleDescriptor {
    /// Wrap an embedding, checking it has `expected_len` finite values.
    pub fn new(values: Vec<f32>, expected_len: usize) -> Result<Self, InferenceError> {
        if values.len() != expected_len {
            return Err(InferenceError::ShapeMismatch {
                expected: vec![expected_len],
                actual: vec![values.len()],
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::Backend(
                "style embedding contains non-finite values".to_string(),
            ));
        }
        Ok(Self { values })
    }

    /// Run the engine's style-predict op on `style_image`.
    pub fn predict(
        engine: &mut dyn InferenceEngine,
        style_image: &PixelBuffer,
        config: &StyleConfig,
    ) -> Result<Self, ProcessingError> {
        let input = Tensor::from_image(style_image, config.style_input_size)?;
        let values = engine.style_predict(&input)?;
        Ok(Self::new(values, config.descriptor_len)?)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Descriptors keyed by style id, computed once per style.
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: HashMap<String, StyleDescriptor>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, style_id: &str) -> Option<&StyleDescriptor> {
        self.entries.get(style_id)
    }

    /// Return the cached descriptor, predicting it on first use.
    ///
    /// A failed prediction is not cached.
    pub fn get_or_predict(
        &mut self,
        style_id: &str,
        style_image: &PixelBuffer,
        engine: &mut dyn InferenceEngine,
        config: &StyleConfig,
    ) -> Result<&StyleDescriptor, ProcessingError> {
        match self.entries.entry(style_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!("Predicting style descriptor for '{}'", style_id);
                let descriptor = StyleDescriptor::predict(engine, style_image, config)?;
                Ok(entry.insert(descriptor))
            }
        }
    }

    pub fn invalidate(&mut self, style_id: &str) -> Option<StyleDescriptor> {
        self.entries.remove(style_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
