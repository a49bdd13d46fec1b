//! Hand landmarks, fist detection and the smoothed hand pointer.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};

/// Landmark indices of the 21-point hand model.
pub const WRIST: usize = 0;
pub const MIDDLE_KNUCKLE: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const LANDMARK_COUNT: usize = 21;

/// The three landmarks the interaction layer cares about, in video-pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandLandmarks {
    pub wrist: Vec3,
    pub middle_knuckle: Vec3,
    pub middle_tip: Vec3,
}

impl HandLandmarks {
    pub fn new(wrist: Vec3, middle_knuckle: Vec3, middle_tip: Vec3) -> Self {
        Self {
            wrist,
            middle_knuckle,
            middle_tip,
        }
    }

    /// Extracts the key landmarks from a full landmark prediction.
    pub fn from_prediction(landmarks: &[Vec3]) -> Result<Self> {
        if landmarks.len() < LANDMARK_COUNT {
            return Err(Error::InvalidConfig(format!(
                "hand prediction has {} landmarks, expected {LANDMARK_COUNT}",
                landmarks.len()
            )));
        }
        Ok(Self::new(
            landmarks[WRIST],
            landmarks[MIDDLE_KNUCKLE],
            landmarks[MIDDLE_TIP],
        ))
    }

    /// Wrist to middle knuckle distance in the image plane.
    pub fn hand_size(&self) -> f32 {
        self.middle_knuckle.truncate().distance(self.wrist.truncate())
    }

    /// Wrist to middle fingertip distance in the image plane.
    pub fn tip_distance(&self) -> f32 {
        self.middle_tip.truncate().distance(self.wrist.truncate())
    }

    /// A fingertip folded back closer than `ratio` hand sizes reads as a fist.
    pub fn is_fist_like(&self, ratio: f32) -> bool {
        self.tip_distance() < self.hand_size() * ratio
    }

    /// Point used as the hand pointer.
    pub fn anchor(&self) -> Vec2 {
        self.middle_knuckle.truncate()
    }
}

/// One prediction from the gesture model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandObservation {
    pub landmarks: HandLandmarks,
    /// Video frame size in pixels.
    pub video_size: Vec2,
}

impl HandObservation {
    pub fn new(landmarks: HandLandmarks, video_size: Vec2) -> Self {
        Self { landmarks, video_size }
    }
}

/// Message delivered by the gesture collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HandSignal {
    Detected(HandObservation),
    Lost,
}

/// Maps a video-pixel position to centered canvas space, mirroring the horizontal axis.
pub fn video_to_canvas(p: Vec2, video_size: Vec2, canvas_size: Vec2) -> Vec2 {
    if video_size.x <= 0.0 || video_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (1.0 - p.x / video_size.x) * canvas_size.x - canvas_size.x * 0.5,
        p.y / video_size.y * canvas_size.y - canvas_size.y * 0.5,
    )
}

/// Low-pass filtered hand pointer.
///
/// Detections only move the target; [`HandTracker::step`] pulls the position toward it
/// once per tick, so the pointer keeps converging between slow detections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandTracker {
    position: Option<Vec2>,
    target: Vec2,
    is_fist_like: bool,
    last_seen_tick: Option<u64>,
}

impl HandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a signal received at `tick`.
    ///
    /// The first detection after a loss seeds the position directly.
    pub fn observe(&mut self, signal: HandSignal, tick: u64, canvas_size: Vec2, fist_ratio: f32) {
        match signal {
            HandSignal::Detected(obs) => {
                self.target = video_to_canvas(obs.landmarks.anchor(), obs.video_size, canvas_size);
                self.position.get_or_insert(self.target);
                self.is_fist_like = obs.landmarks.is_fist_like(fist_ratio);
                self.last_seen_tick = Some(tick);
            }
            HandSignal::Lost => self.reset(),
        }
    }

    /// One low-pass step of the position toward the latest detection.
    pub fn step(&mut self, smoothing: f32) {
        if let Some(position) = self.position.as_mut() {
            *position = position.lerp(self.target, smoothing);
        }
    }

    /// Smoothed position and fist flag, if a detection is recent enough.
    pub fn active(&self, tick: u64, stale_after_ticks: u64) -> Option<(Vec2, bool)> {
        let seen = self.last_seen_tick?;
        if tick.saturating_sub(seen) > stale_after_ticks {
            return None;
        }
        self.position.map(|p| (p, self.is_fist_like))
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Canvas position of the latest detection.
    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
