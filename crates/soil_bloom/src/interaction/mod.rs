//! Interaction signal mapping.
//!
//! Turns the active pointer (smoothed hand position, or the mouse as a fallback) into the
//! four scalars every creature consumes: wind, vertical influence, contraction and the
//! fist flag. Also owns the camera drag rotation and wheel zoom.
//!
//! All smoothing is frame-rate dependent: one call to [`InteractionMapper::tick`] is one
//! step of each low-pass filter.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::math::{lerp, remap};

pub mod hand;
pub mod mailbox;

pub use hand::{video_to_canvas, HandLandmarks, HandObservation, HandSignal, HandTracker};
pub use mailbox::{HandMailbox, HandSender};

/// Tuning of the interaction mapper.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InteractionConfig {
    /// Per-tick blend of wind toward its target.
    pub wind_smoothing: f32,
    /// Per-tick blend of vertical influence toward its target.
    pub vertical_smoothing: f32,
    /// Per-tick blend of contraction toward the fist state.
    pub contraction_smoothing: f32,
    /// Per-tick blend of the hand position toward the latest detection.
    pub hand_smoothing: f32,
    /// Fingertip to knuckle distance ratio under which a hand reads as a fist.
    pub fist_ratio: f32,
    /// Yaw in radians per horizontal drag pixel.
    pub yaw_per_pixel: f32,
    /// Pitch in radians per vertical drag pixel.
    pub pitch_per_pixel: f32,
    pub pitch_range: (f32, f32),
    /// Zoom change per wheel delta unit.
    pub zoom_per_wheel: f32,
    pub zoom_range: (f32, f32),
    /// Ticks after which a hand detection no longer drives the pointer.
    pub stale_after_ticks: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wind_smoothing: 0.05,
            vertical_smoothing: 0.1,
            contraction_smoothing: 0.1,
            hand_smoothing: 0.4,
            fist_ratio: 1.1,
            yaw_per_pixel: 0.008,
            pitch_per_pixel: 0.005,
            pitch_range: (-1.2, 0.1),
            zoom_per_wheel: 0.001,
            zoom_range: (0.5, 2.2),
            stale_after_ticks: 30,
        }
    }
}

impl InteractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wind_smoothing(mut self, v: f32) -> Self {
        self.wind_smoothing = v;
        self
    }

    pub fn with_vertical_smoothing(mut self, v: f32) -> Self {
        self.vertical_smoothing = v;
        self
    }

    pub fn with_contraction_smoothing(mut self, v: f32) -> Self {
        self.contraction_smoothing = v;
        self
    }

    pub fn with_hand_smoothing(mut self, v: f32) -> Self {
        self.hand_smoothing = v;
        self
    }

    pub fn with_fist_ratio(mut self, ratio: f32) -> Self {
        self.fist_ratio = ratio;
        self
    }

    pub fn with_stale_after_ticks(mut self, ticks: u64) -> Self {
        self.stale_after_ticks = ticks;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let coefficients = [
            ("wind_smoothing", self.wind_smoothing),
            ("vertical_smoothing", self.vertical_smoothing),
            ("contraction_smoothing", self.contraction_smoothing),
            ("hand_smoothing", self.hand_smoothing),
        ];
        for (name, v) in coefficients {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }
        if !self.fist_ratio.is_finite() || self.fist_ratio <= 0.0 {
            return Err(Error::InvalidConfig("fist_ratio must be positive".into()));
        }
        let ranges = [
            ("pitch_range", self.pitch_range),
            ("zoom_range", self.zoom_range),
        ];
        for (name, (lo, hi)) in ranges {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be an ordered finite range"
                )));
            }
        }
        Ok(())
    }
}

/// Live interaction values for one session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionState {
    /// Active pointer in centered canvas space.
    pub position: Vec3,
    pub is_dragging: bool,
    pub drag_anchor: Vec2,
    /// Camera Euler angles: `x` pitch, `y` yaw.
    pub rotation: Vec2,
    pub rotation_anchor: Vec2,
    pub zoom: f32,
    /// Smoothed horizontal sway in `[-1, 1]`.
    pub wind: f32,
    pub wind_target: f32,
    /// Smoothed lift in `[0, 1]`; pointer at the top gives 1.
    pub vertical_influence: f32,
    /// Smoothed fist response in `[0, 1]`.
    pub contraction: f32,
    pub is_fist_like: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            is_dragging: false,
            drag_anchor: Vec2::ZERO,
            rotation: Vec2::ZERO,
            rotation_anchor: Vec2::ZERO,
            zoom: 1.0,
            wind: 0.0,
            wind_target: 0.0,
            vertical_influence: 0.0,
            contraction: 0.0,
            is_fist_like: false,
        }
    }
}

/// Which input drove a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Hand,
    Mouse,
}

/// Pointer resolved for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub position: Vec2,
    pub is_fist_like: bool,
    pub source: PointerSource,
}

/// Maps raw pointer and hand input to [`InteractionState`].
#[derive(Clone, Debug)]
pub struct InteractionMapper {
    config: InteractionConfig,
    canvas_size: Vec2,
    state: InteractionState,
    hand: HandTracker,
}

impl InteractionMapper {
    pub fn new(config: InteractionConfig, canvas_size: Vec2) -> Self {
        Self {
            config,
            canvas_size,
            state: InteractionState::default(),
            hand: HandTracker::new(),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    /// Advances all filters by one tick.
    ///
    /// `mouse` is in centered canvas space. `signal` is the newest message from the
    /// gesture collaborator, if any arrived since the previous tick.
    pub fn tick(&mut self, mouse: Vec2, signal: Option<HandSignal>, tick: u64) -> Pointer {
        if let Some(signal) = signal {
            self.hand.observe(signal, tick, self.canvas_size, self.config.fist_ratio);
        }
        if self.hand.active(tick, self.config.stale_after_ticks).is_some() {
            self.hand.step(self.config.hand_smoothing);
        }

        let pointer = match self.hand.active(tick, self.config.stale_after_ticks) {
            Some((position, is_fist_like)) => Pointer {
                position,
                is_fist_like,
                source: PointerSource::Hand,
            },
            None => Pointer {
                position: mouse,
                is_fist_like: false,
                source: PointerSource::Mouse,
            },
        };
        self.apply(pointer);
        pointer
    }

    fn apply(&mut self, pointer: Pointer) {
        let half = self.canvas_size * 0.5;
        let cfg = &self.config;
        let s = &mut self.state;

        s.position = pointer.position.extend(0.0);
        s.is_fist_like = pointer.is_fist_like;

        s.wind_target = finite_or_zero(remap(pointer.position.x, -half.x, half.x, -1.0, 1.0))
            .clamp(-1.0, 1.0);
        s.wind = lerp(s.wind, s.wind_target, cfg.wind_smoothing);

        let vertical_target =
            finite_or_zero(remap(pointer.position.y, -half.y, half.y, 1.0, 0.0)).clamp(0.0, 1.0);
        s.vertical_influence = lerp(s.vertical_influence, vertical_target, cfg.vertical_smoothing);

        let fist = if pointer.is_fist_like { 1.0 } else { 0.0 };
        s.contraction = lerp(s.contraction, fist, cfg.contraction_smoothing);
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.state.is_dragging = true;
        self.state.drag_anchor = pointer;
        self.state.rotation_anchor = self.state.rotation;
    }

    /// Rotates the camera relative to the drag anchor. Ignored when not dragging.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if !self.state.is_dragging {
            return;
        }
        let delta = pointer - self.state.drag_anchor;
        let (lo, hi) = self.config.pitch_range;
        self.state.rotation.y = self.state.rotation_anchor.y + delta.x * self.config.yaw_per_pixel;
        self.state.rotation.x =
            (self.state.rotation_anchor.x + delta.y * self.config.pitch_per_pixel).clamp(lo, hi);
    }

    pub fn end_drag(&mut self) {
        self.state.is_dragging = false;
    }

    /// Positive `delta` zooms out.
    pub fn wheel(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let (lo, hi) = self.config.zoom_range;
        self.state.zoom = (self.state.zoom - delta * self.config.zoom_per_wheel).clamp(lo, hi);
    }

    pub fn reset(&mut self) {
        self.state = InteractionState::default();
        self.hand.reset();
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
