//! Retouch WASM - WebAssembly bindings for the retouch pixel engine
//!
//! This crate exposes the retouch-core operations to the editor's
//! JavaScript host. Every binding takes and returns a [`JsPixelBuffer`]
//! (RGBA8), so images stay in WASM memory between operations.
//!
//! # Module Structure
//!
//! - `types` - RGBA pixel buffer wrapper
//! - `adjustments` - Global color adjustments
//! - `background` - Background remove/blur/replace
//! - `portrait` - Skin smoothing, eye brightening, face blur
//! - `style` - Color-matrix style fallback
//! - `logging` - Forwards `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPixelBuffer, blur_background } from '@retouch/wasm';
//!
//! await init();
//!
//! const image = new JsPixelBuffer(width, height, rgba);
//! const result = blur_background(image, undefined, 8);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod background;
mod logging;
mod portrait;
mod style;
mod types;

pub use adjustments::{apply_adjustments, JsAdjustmentParams};
pub use background::{blur_background, remove_background, replace_background_color};
pub use portrait::{beauty_filter, blur_face, enhance_eyes};
pub use style::{apply_style_fallback, available_styles};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
