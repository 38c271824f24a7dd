//! Neural style transfer with a deterministic fallback.
//!
//! [`StyleCompositor`] runs the model either once over the whole image or
//! over a grid of overlapping tiles (see [`tiling`]), then cleans up with
//! denoise and color post-processing. [`StyleCache`] keeps one
//! [`StyleDescriptor`] per style so style prediction runs once per
//! selection. [`NamedStyle`] is what callers get when no model is around.

mod compositor;
mod descriptor;
mod fallback;
pub mod tiling;

pub use compositor::{RenderMode, StyleCompositor};
pub use descriptor::{StyleCache, StyleDescriptor};
pub use fallback::NamedStyle;
pub use tiling::{stitch, AccumulationBuffer, Tile, TileGrid};
