//! User configuration for soil generation.
use crate::error::{Error, Result};

/// Default cap on retained soil points.
pub const DEFAULT_MAX_POINTS: usize = 2000;
/// Cap on preview dots.
pub const PREVIEW_MAX_POINTS: usize = 4000;
/// Final generation below this many points gets the synthetic fallback.
pub const MIN_VIABLE_POINTS: usize = 50;
/// Number of synthetic points injected by the fallback.
pub const SYNTHETIC_POINT_COUNT: usize = 120;

pub const THRESHOLD_RANGE: (f32, f32) = (0.0, 255.0);
pub const DOT_SIZE_RANGE: (f32, f32) = (2.0, 20.0);
pub const SPACING_RANGE: (u32, u32) = (2, 20);

/// Visual shape of soil points. Has no effect on generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SoilShape {
    #[default]
    Dot,
    Square,
    Line,
}

/// Soil generation settings as exposed by the configuration view.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoilSettings {
    /// Luminance cutoff in `[0, 255]`; only brighter pixels become soil.
    pub threshold: f32,
    /// Maximum visual point size in `[2, 20]`. Also drives creature height and thickness.
    pub dot_size: f32,
    /// Sampling stride in pixels, at least 1.
    pub spacing: u32,
    /// Rendering shape of soil points.
    pub shape: SoilShape,
    /// Cap on retained soil points in final generation.
    pub max_points: usize,
}

impl Default for SoilSettings {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            dot_size: 8.0,
            spacing: 6,
            shape: SoilShape::Dot,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl SoilSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_dot_size(mut self, dot_size: f32) -> Self {
        self.dot_size = dot_size;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_shape(mut self, shape: SoilShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Sampling stride actually used by the scan.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.spacing.max(1)
    }

    /// Copy with every field clamped into its valid range. `max_points` is kept as given.
    pub fn sanitized(&self) -> Self {
        let threshold = if self.threshold.is_finite() {
            self.threshold.clamp(THRESHOLD_RANGE.0, THRESHOLD_RANGE.1)
        } else {
            Self::default().threshold
        };
        let dot_size = if self.dot_size.is_finite() {
            self.dot_size.clamp(DOT_SIZE_RANGE.0, DOT_SIZE_RANGE.1)
        } else {
            Self::default().dot_size
        };
        Self {
            threshold,
            dot_size,
            spacing: self.stride(),
            shape: self.shape,
            max_points: self.max_points,
        }
    }

    /// Rejects settings that cannot be clamped into something meaningful.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(Error::InvalidConfig("threshold must be finite".into()));
        }
        if !self.dot_size.is_finite() {
            return Err(Error::InvalidConfig("dot_size must be finite".into()));
        }
        Ok(())
    }
}
