//! Soil generation: turning image brightness into a sparse field of floor points.
//!
//! - [`settings`]: user-facing [`SoilSettings`] and their ranges.
//! - [`field`]: the thresholded grid scan in preview and final modes.
//! - [`behavior`]: the [`SoilBehavior`] multipliers derived from settings and field statistics.
use glam::Vec2;

pub mod behavior;
pub mod field;
pub mod settings;

pub use behavior::SoilBehavior;
pub use field::{generate, preview, SoilField};
pub use settings::{SoilSettings, SoilShape};

/// A thresholded image sample promoted to a floor position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoilPoint {
    /// Image-space position, centered on the image middle.
    pub position: Vec2,
    /// Height noise in `[-3, 3]`.
    pub z: f32,
    /// Raw luminance in `[0, 255]`.
    pub b: f32,
    /// Normalized intensity above the threshold, in `[0, 1]`.
    pub n: f32,
}

impl SoilPoint {
    pub fn new(position: Vec2, z: f32, b: f32, n: f32) -> Self {
        Self { position, z, b, n }
    }
}

/// A point of the lightweight configuration preview.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewDot {
    /// Image-space position, centered on the image middle.
    pub position: Vec2,
    /// Visual radius, `n * dot_size`.
    pub size: f32,
    /// Normalized intensity in `[0, 1]`.
    pub n: f32,
}
