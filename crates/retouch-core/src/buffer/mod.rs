//! Owned pixel and mask buffers shared by every stage of the engine.
//!
//! # Ownership
//!
//! A [`PixelBuffer`] is owned by whichever stage currently holds it. Stages
//! that transform pixels consume their input and hand back a new buffer, so
//! no two stages ever alias the same pixel data.
//!
//! # Layout
//!
//! Pixels are RGBA8 in row-major order (4 bytes per pixel). Masks are one
//! `f32` per pixel in the same order, always within `[0, 1]`.

mod resize;
mod types;

pub use resize::{blur_by_rescale, resize, resize_mask};
pub use types::{FilterType, Mask, PixelBuffer, ProcessingError};
pub(crate) use types::{clamp_unit, to_u8, CHANNELS};
