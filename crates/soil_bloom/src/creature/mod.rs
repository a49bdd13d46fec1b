//! Creature simulation: four organism variants sharing one state and one update contract.
//!
//! [`Creature::update`] only stores the per-tick inputs. All shape and animation math lives
//! in [`Creature::display`], which is a pure function of that stored state plus constants
//! fixed at spawn time. Replaying the same inputs therefore reproduces the same frames on
//! any [`DrawSurface`].
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use rand::Rng;

use crate::draw::DrawSurface;
use crate::error::Error;
use crate::math::lerp;
use crate::sampling::rand_range;

pub mod core_organism;
pub mod ribbon;
pub mod ring;
pub mod spire;

pub use core_organism::CoreOrganism;
pub use ribbon::RibbonOrganism;
pub use ring::RingOrganism;
pub use spire::SpireOrganism;

/// Ticks until growth reaches 1 at a growth speed of 1.
pub const GROWTH_TICKS: f32 = 200.0;
/// Phase advance per tick.
pub const PHASE_PER_TICK: f32 = 0.03;
/// Creatures at or below this growth are not drawn.
pub const VISIBLE_GROWTH: f32 = 0.01;
/// Upper bound of the per-creature hue offset in degrees.
pub const HUE_JITTER: f32 = 40.0;

/// Global growth progress shared by a population.
pub fn growth_progress(ticks_since_start: u64, growth_speed: f32) -> f32 {
    let progress = (ticks_since_start as f32 / GROWTH_TICKS) * growth_speed;
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

/// Creature variant selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Species {
    #[default]
    Ring,
    Ribbon,
    Core,
    Spire,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Ring,
        Species::Ribbon,
        Species::Core,
        Species::Spire,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::Ring => "ring",
            Species::Ribbon => "ribbon",
            Species::Core => "core",
            Species::Spire => "spire",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidConfig(format!("unknown species '{s}'")))
    }
}

/// Per-creature inputs computed by the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnParams {
    /// Spawn position in world space.
    pub base: Vec3,
    /// Intensity of the soil point in `[0, 1]`.
    pub strength: f32,
    /// Height multiplier (strength and behavior combined).
    pub height_factor: f32,
    /// Thickness multiplier (strength and behavior combined).
    pub thickness_factor: f32,
}

/// State shared by every variant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureState {
    pub base: Vec3,
    pub strength: f32,
    pub height_base: f32,
    pub radius_base: f32,
    pub thickness: f32,
    /// Hue offset in degrees, fixed at spawn.
    pub hue_offset: f32,
    pub growth: f32,
    pub wind: f32,
    pub contraction: f32,
    pub vertical_influence: f32,
    pub phase: f32,
    pub tick: u64,
}

impl CreatureState {
    fn new(params: &SpawnParams, height_base: f32, radius_base: f32, hue_offset: f32) -> Self {
        Self {
            base: params.base,
            strength: params.strength,
            height_base,
            radius_base,
            thickness: params.thickness_factor,
            hue_offset,
            growth: 0.0,
            wind: 0.0,
            contraction: 0.0,
            vertical_influence: 0.0,
            phase: 0.0,
            tick: 0,
        }
    }

    /// Smoothstep of the growth progress.
    pub fn eased_growth(&self) -> f32 {
        let g = self.growth;
        g * g * (3.0 - 2.0 * g)
    }

    /// Current visual height: grows in, stretches with vertical influence, squashes on contraction.
    pub fn current_height(&self) -> f32 {
        self.height_base
            * self.eased_growth()
            * (1.0 + 0.35 * self.vertical_influence)
            * (1.0 - 0.3 * self.contraction)
    }

    /// Horizontal displacement at relative height `t` in `[0, 1]`.
    pub fn sway(&self, t: f32) -> f32 {
        self.wind * 18.0 * t * t + (self.phase + t * 3.0).sin() * 2.0 * t
    }

    /// World position at relative height `t` along the creature's axis. Y points down.
    pub fn axis_point(&self, t: f32) -> Vec3 {
        self.base + Vec3::new(self.sway(t), -self.current_height() * t, 0.0)
    }

    /// Brightness boost in `[0.5, 1]` driven by contraction.
    pub fn glow(&self) -> f32 {
        0.5 + 0.5 * self.contraction
    }

    pub fn hue(&self, base_hue: f32) -> f32 {
        (base_hue + self.hue_offset).rem_euclid(360.0)
    }
}

/// Variant-specific spawn constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreatureKind {
    Ring(RingOrganism),
    Ribbon(RibbonOrganism),
    Core(CoreOrganism),
    Spire(SpireOrganism),
}

/// A spawned organism.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Creature {
    pub kind: CreatureKind,
    pub state: CreatureState,
}

/// `lerp(lo, hi, strength) * factor`, the shape of every variant dimension.
#[inline]
pub(crate) fn scaled(lo: f32, hi: f32, strength: f32, factor: f32) -> f32 {
    lerp(lo, hi, strength) * factor
}

/// Structural count from an interpolated range, at least 1.
#[inline]
pub(crate) fn count(lo: f32, hi: f32, strength: f32) -> usize {
    lerp(lo, hi, strength).round().max(1.0) as usize
}

impl Creature {
    /// Builds a creature of `species`. Random values are drawn once here and never again.
    pub fn spawn<R: Rng>(species: Species, params: &SpawnParams, rng: &mut R) -> Self {
        let hue_offset = rand_range(rng, 0.0, HUE_JITTER);
        let (kind, height_base, radius_base) = match species {
            Species::Ring => {
                let (organism, h, r) = RingOrganism::spawn(params);
                (CreatureKind::Ring(organism), h, r)
            }
            Species::Ribbon => {
                let (organism, h, r) = RibbonOrganism::spawn(params, rng);
                (CreatureKind::Ribbon(organism), h, r)
            }
            Species::Core => {
                let (organism, h, r) = CoreOrganism::spawn(params, rng);
                (CreatureKind::Core(organism), h, r)
            }
            Species::Spire => {
                let (organism, h, r) = SpireOrganism::spawn(params, rng);
                (CreatureKind::Spire(organism), h, r)
            }
        };

        Self {
            kind,
            state: CreatureState::new(params, height_base, radius_base, hue_offset),
        }
    }

    pub fn species(&self) -> Species {
        match self.kind {
            CreatureKind::Ring(_) => Species::Ring,
            CreatureKind::Ribbon(_) => Species::Ribbon,
            CreatureKind::Core(_) => Species::Core,
            CreatureKind::Spire(_) => Species::Spire,
        }
    }

    /// Ring, segment, orbital or particle count, depending on the variant.
    pub fn structural_count(&self) -> usize {
        match &self.kind {
            CreatureKind::Ring(o) => o.ring_count,
            CreatureKind::Ribbon(o) => o.segment_count,
            CreatureKind::Core(o) => o.orbital_axes.len(),
            CreatureKind::Spire(o) => o.particle_offsets.len(),
        }
    }

    /// Stores the tick inputs. Performs no other work, so repeated calls are idempotent.
    pub fn update(
        &mut self,
        growth: f32,
        wind: f32,
        contraction: f32,
        vertical_influence: f32,
        tick: u64,
    ) {
        let s = &mut self.state;
        s.growth = clamp_finite(growth, 0.0, 1.0);
        s.wind = clamp_finite(wind, -1.0, 1.0);
        s.contraction = clamp_finite(contraction, 0.0, 1.0);
        s.vertical_influence = clamp_finite(vertical_influence, 0.0, 1.0);
        s.tick = tick;
        s.phase = tick as f32 * PHASE_PER_TICK;
    }

    pub fn is_visible(&self) -> bool {
        self.state.growth > VISIBLE_GROWTH
    }

    /// Issues this creature's draw calls. Draws nothing until it has grown.
    pub fn display(&self, surface: &mut dyn DrawSurface) {
        if !self.is_visible() {
            return;
        }
        match &self.kind {
            CreatureKind::Ring(o) => o.display(&self.state, surface),
            CreatureKind::Ribbon(o) => o.display(&self.state, surface),
            CreatureKind::Core(o) => o.display(&self.state, surface),
            CreatureKind::Spire(o) => o.display(&self.state, surface),
        }
    }
}

#[inline]
fn clamp_finite(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo.max(0.0).min(hi)
    } else {
        v.clamp(lo, hi)
    }
}
