//! Mask-based background compositing.
//!
//! A [`Mask`](crate::buffer::Mask) holds per-pixel foreground probability.
//! Raw masks come from a segmentation model or, when none is available, from
//! a radial fallback centered on the image. Either way the mask is refined
//! with a box filter before compositing.
//!
//! ## Operations
//!
//! - **Remove**: foreground probability becomes alpha
//! - **Blur**: background is replaced by a blurred copy of the image
//! - **Replace**: background is replaced by a solid color or another image
//!
//! All blends use `result = orig * mask + background * (1 - mask)`.

pub mod composite;
pub mod refine;
pub mod source;

pub use composite::{
    blur_background, remove_background, replace_background_color, replace_background_image,
};
pub use refine::refine_mask;
pub use source::{foreground_mask, mask_from_segmentation, radial_fallback_mask};
