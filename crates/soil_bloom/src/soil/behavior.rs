//! Behavior profile: scalar multipliers derived from soil settings and field statistics.
use super::settings::SoilSettings;
use super::SoilPoint;
use crate::math::remap;

/// Population-wide multipliers consumed by the spawner and the growth clock.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoilBehavior {
    /// Scales the number of spawned creatures. Smaller spacing gives more creatures.
    pub density_factor: f32,
    /// Scales creature height.
    pub height_factor: f32,
    /// Scales creature thickness and radius.
    pub thickness_factor: f32,
    /// Scales the growth clock.
    pub growth_speed: f32,
    /// Mean normalized intensity of the soil points.
    pub avg_brightness: f32,
}

impl SoilBehavior {
    /// Derives the profile from settings and a precomputed mean intensity.
    pub fn new(settings: &SoilSettings, avg_brightness: f32) -> Self {
        let s = settings.sanitized();
        let size_factor = remap(s.dot_size, 2.0, 20.0, 0.7, 1.6);
        let threshold_factor = remap(s.threshold, 0.0, 255.0, 0.8, 1.25);

        Self {
            density_factor: remap(s.spacing as f32, 2.0, 20.0, 1.3, 0.5),
            height_factor: size_factor * threshold_factor,
            thickness_factor: size_factor,
            growth_speed: threshold_factor,
            avg_brightness: if avg_brightness.is_finite() {
                avg_brightness.clamp(0.0, 1.0)
            } else {
                0.5
            },
        }
    }

    /// Derives the profile from settings and the generated points.
    pub fn from_points(settings: &SoilSettings, points: &[SoilPoint]) -> Self {
        Self::new(settings, average_brightness(points))
    }
}

/// Mean normalized intensity, `0.5` when there are no points.
pub fn average_brightness(points: &[SoilPoint]) -> f32 {
    if points.is_empty() {
        return 0.5;
    }
    points.iter().map(|p| p.n).sum::<f32>() / points.len() as f32
}
