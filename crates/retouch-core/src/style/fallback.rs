//! Deterministic color-matrix stand-ins for neural styles.
//!
//! When style transfer cannot run, each named style maps to a fixed chain of
//! color matrices that approximates its palette. The output always has the
//! input's dimensions.

use crate::adjustments::ColorMatrix;
use crate::buffer::PixelBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A style selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NamedStyle {
    Mosaic,
    Candy,
    Udnie,
    Starry,
    Sketch,
    Vintage,
    Warm,
    Cool,
    /// Any unrecognized name: a mild contrast and saturation boost.
    Generic,
}

impl NamedStyle {
    /// Every recognized style.
    pub const ALL: [NamedStyle; 8] = [
        NamedStyle::Mosaic,
        NamedStyle::Candy,
        NamedStyle::Udnie,
        NamedStyle::Starry,
        NamedStyle::Sketch,
        NamedStyle::Vintage,
        NamedStyle::Warm,
        NamedStyle::Cool,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NamedStyle::Mosaic => "mosaic",
            NamedStyle::Candy => "candy",
            NamedStyle::Udnie => "udnie",
            NamedStyle::Starry => "starry",
            NamedStyle::Sketch => "sketch",
            NamedStyle::Vintage => "vintage",
            NamedStyle::Warm => "warm",
            NamedStyle::Cool => "cool",
            NamedStyle::Generic => "generic",
        }
    }

    /// Case-insensitive lookup; unknown names give [`NamedStyle::Generic`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .unwrap_or(NamedStyle::Generic)
    }

    /// The combined color transform for this style.
    pub fn matrix(&self) -> ColorMatrix {
        match self {
            NamedStyle::Mosaic => ColorMatrix::saturation(0.6)
                .then(&ColorMatrix::contrast(0.25))
                .then(&ColorMatrix::hue(15.0)),
            NamedStyle::Candy => ColorMatrix::saturation(0.8)
                .then(&ColorMatrix::hue(-20.0))
                .then(&ColorMatrix::brightness(0.05)),
            NamedStyle::Udnie => ColorMatrix::saturation(-0.3)
                .then(&ColorMatrix::contrast(0.3))
                .then(&ColorMatrix::temperature(-0.3)),
            NamedStyle::Starry => ColorMatrix::temperature(-0.6)
                .then(&ColorMatrix::saturation(0.5))
                .then(&ColorMatrix::contrast(0.2)),
            NamedStyle::Sketch => ColorMatrix::saturation(-1.0)
                .then(&ColorMatrix::contrast(0.5))
                .then(&ColorMatrix::brightness(0.1)),
            NamedStyle::Vintage => ColorMatrix::saturation(-0.4)
                .then(&ColorMatrix::temperature(0.5))
                .then(&ColorMatrix::contrast(-0.15))
                .then(&ColorMatrix::tint(0.1)),
            NamedStyle::Warm => ColorMatrix::temperature(0.6).then(&ColorMatrix::saturation(0.15)),
            NamedStyle::Cool => ColorMatrix::temperature(-0.6).then(&ColorMatrix::saturation(0.1)),
            NamedStyle::Generic => ColorMatrix::contrast(0.1).then(&ColorMatrix::saturation(0.2)),
        }
    }

    /// Apply the style's color transform in one pass.
    pub fn apply(&self, image: PixelBuffer) -> PixelBuffer {
        self.matrix().apply(image)
    }
}

impl From<&str> for NamedStyle {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for NamedStyle {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for NamedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
