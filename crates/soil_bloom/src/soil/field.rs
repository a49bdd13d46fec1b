//! Thresholded grid scan producing soil points.
//!
//! Two modes share one scan over the luminance grid:
//! - [`preview`]: cheap, deterministic, truncated at [`PREVIEW_MAX_POINTS`].
//! - [`generate`]: height noise, uniform subsampling down to `max_points` and a
//!   synthetic fallback when the image yields too few points.
use std::ops::ControlFlow;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use super::settings::{
    SoilSettings, MIN_VIABLE_POINTS, PREVIEW_MAX_POINTS, SYNTHETIC_POINT_COUNT,
};
use super::{PreviewDot, SoilPoint};
use crate::luma::LumaSource;
use crate::sampling::{next_down, rand_range, shuffle};

/// Preview dots at or below this radius are dropped.
pub const PREVIEW_MIN_RADIUS: f32 = 0.3;
/// Half range of the uniform height noise.
pub const HEIGHT_NOISE: f32 = 3.0;

/// Result of a final soil generation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoilField {
    /// Retained points, at most `max(max_points, SYNTHETIC_POINT_COUNT)`.
    pub points: Vec<SoilPoint>,
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Whether the synthetic fallback population was injected.
    pub synthetic: bool,
}

impl SoilField {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean normalized intensity, `0.5` for an empty field.
    pub fn average_brightness(&self) -> f32 {
        super::behavior::average_brightness(&self.points)
    }
}

/// Visits every stride-aligned pixel brighter than `threshold`, columns first.
///
/// The visitor receives the centered position, raw luminance and normalized intensity.
fn scan<S, F>(source: &S, threshold: f32, stride: u32, mut visit: F)
where
    S: LumaSource + ?Sized,
    F: FnMut(Vec2, f32, f32) -> ControlFlow<()>,
{
    let (w, h) = source.dimensions();
    let half = Vec2::new(w as f32 * 0.5, h as f32 * 0.5);
    let range = (255.0 - threshold).max(1.0);
    let step = stride.max(1) as usize;

    for x in (0..w).step_by(step) {
        for y in (0..h).step_by(step) {
            let br = source.luma_at(x, y);
            if br <= threshold {
                continue;
            }
            let n = ((br - threshold) / range).clamp(0.0, 1.0);
            let position = Vec2::new(x as f32, y as f32) - half;
            if visit(position, br, n).is_break() {
                return;
            }
        }
    }
}

/// Lightweight preview of the soil for the configuration view.
///
/// Deterministic; stops after [`PREVIEW_MAX_POINTS`] dots.
pub fn preview<S: LumaSource + ?Sized>(source: &S, settings: &SoilSettings) -> Vec<PreviewDot> {
    let settings = settings.sanitized();
    let mut dots = Vec::new();
    scan(source, settings.threshold, settings.stride(), |position, _, n| {
        let size = n * settings.dot_size;
        if size > PREVIEW_MIN_RADIUS {
            dots.push(PreviewDot { position, size, n });
        }
        if dots.len() >= PREVIEW_MAX_POINTS {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    dots
}

/// Final soil generation.
///
/// Points above `max_points` are dropped by a uniform shuffle-then-truncate, so the
/// kept set has no spatial bias. Fewer than [`MIN_VIABLE_POINTS`] points get
/// [`SYNTHETIC_POINT_COUNT`] synthetic full-intensity points appended, dropping real
/// points as needed to stay within `max_points`. A cap below the synthetic count
/// yields exactly [`SYNTHETIC_POINT_COUNT`] points.
pub fn generate<S, R>(source: &S, settings: &SoilSettings, rng: &mut R) -> SoilField
where
    S: LumaSource + ?Sized,
    R: Rng,
{
    let settings = settings.sanitized();
    let (width, height) = source.dimensions();

    let mut points = Vec::new();
    scan(source, settings.threshold, settings.stride(), |position, b, n| {
        let z = rand_range(rng, -HEIGHT_NOISE, HEIGHT_NOISE);
        points.push(SoilPoint::new(position, z, b, n));
        ControlFlow::Continue(())
    });
    let scanned = points.len();

    if points.len() > settings.max_points {
        shuffle(&mut points, rng);
        points.truncate(settings.max_points);
    }

    let synthetic = points.len() < MIN_VIABLE_POINTS;
    if synthetic {
        warn!(
            "Soil scan kept {} points (< {}); injecting {} synthetic points.",
            points.len(),
            MIN_VIABLE_POINTS,
            SYNTHETIC_POINT_COUNT
        );
        // Real points give way so the total stays under the cap; the synthetic
        // population itself is never cut.
        let room = settings.max_points.saturating_sub(SYNTHETIC_POINT_COUNT);
        if points.len() > room {
            shuffle(&mut points, rng);
            points.truncate(room);
        }
        points.extend(synthetic_points(width, height, SYNTHETIC_POINT_COUNT, rng));
    }

    debug!(
        "Soil generated: {} scanned, {} kept (cap {}), {}x{} image.",
        scanned,
        points.len(),
        settings.max_points,
        width,
        height
    );

    SoilField {
        points,
        width,
        height,
        synthetic,
    }
}

/// Full-intensity points spread uniformly over the image bounds.
fn synthetic_points<R: Rng>(
    width: u32,
    height: u32,
    count: usize,
    rng: &mut R,
) -> Vec<SoilPoint> {
    let half_w = width as f32 * 0.5;
    let half_h = height as f32 * 0.5;
    let max_x = next_down(half_w).max(-half_w);
    let max_y = next_down(half_h).max(-half_h);

    (0..count)
        .map(|_| {
            let x = rand_range(rng, -half_w, half_w).clamp(-half_w, max_x);
            let y = rand_range(rng, -half_h, half_h).clamp(-half_h, max_y);
            SoilPoint::new(Vec2::new(x, y), 0.0, 255.0, 1.0)
        })
        .collect()
}
