//! WASM-compatible wrapper for RGBA pixel buffers.

use retouch_core::{PixelBuffer, ProcessingError};
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// An RGBA8 image held in WASM memory.
///
/// # Memory Management
///
/// `pixels()` copies the data out to a JavaScript `Uint8Array`. Chain
/// operations on the buffer itself and extract pixels once at the end.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from RGBA pixel data (4 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        Self::try_new(width, height, pixels).map_err(to_js_error)
    }

    /// Create a buffer from RGB pixel data; alpha is set to 255.
    pub fn from_rgb(width: u32, height: u32, pixels: &[u8]) -> Result<JsPixelBuffer, JsValue> {
        PixelBuffer::from_rgb(width, height, pixels)
            .map(Self::from_buffer)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer frees the buffer otherwise.
    pub fn free(self) {}
}

impl JsPixelBuffer {
    pub(crate) fn try_new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, ProcessingError> {
        PixelBuffer::new(width, height, pixels).map(Self::from_buffer)
    }

    pub(crate) fn from_buffer(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    /// A copy of the core buffer, for operations that consume their input.
    pub(crate) fn to_buffer(&self) -> PixelBuffer {
        self.inner.clone()
    }

    pub(crate) fn buffer(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// Convert a core error into a JavaScript exception value.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
