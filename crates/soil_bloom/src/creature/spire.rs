//! Spire organism: a tapering blade on a block footing, topped by drifting particles.
use glam::{Vec2, Vec3};
use rand::Rng;

use super::{count, scaled, CreatureState, SpawnParams};
use crate::draw::{DrawSurface, Paint};
use crate::sampling::rand_range;

const BASE_HUE: f32 = 210.0;
const BODY_LEVELS: usize = 6;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpireOrganism {
    /// Particle offsets around the tip, each component in `[-1, 1)`.
    pub particle_offsets: Vec<Vec3>,
}

impl SpireOrganism {
    pub(crate) fn spawn(params: &SpawnParams, rng: &mut dyn Rng) -> (Self, f32, f32) {
        let s = params.strength;
        let particles = count(6.0, 14.0, s);
        let particle_offsets = (0..particles)
            .map(|_| {
                Vec3::new(
                    rand_range(rng, -1.0, 1.0),
                    rand_range(rng, -1.0, 1.0),
                    rand_range(rng, -1.0, 1.0),
                )
            })
            .collect();
        (
            Self { particle_offsets },
            scaled(80.0, 190.0, s, params.height_factor),
            scaled(3.0, 7.0, s, params.thickness_factor),
        )
    }

    /// Half width of the blade at relative height `t`.
    pub fn half_width(&self, state: &CreatureState, t: f32) -> f32 {
        state.radius_base * (1.0 - t) * (1.0 - 0.3 * state.contraction) + 0.3
    }

    /// Particle cloud radius; vertical influence spreads it, contraction gathers it.
    pub fn spread(&self, state: &CreatureState) -> f32 {
        state.radius_base
            * (2.5 + 2.0 * state.vertical_influence)
            * (1.0 - 0.6 * state.contraction)
    }

    /// Current particle positions around the tip.
    pub fn particle_positions(&self, state: &CreatureState) -> Vec<Vec3> {
        let tip = state.axis_point(1.0);
        let spread = self.spread(state);
        self.particle_offsets
            .iter()
            .enumerate()
            .map(|(k, offset)| {
                let bob = (state.phase * 2.0 + k as f32).sin() * state.radius_base * 0.6;
                tip + *offset * spread + Vec3::new(0.0, bob, 0.0)
            })
            .collect()
    }

    pub(crate) fn display(&self, state: &CreatureState, surface: &mut dyn DrawSurface) {
        let hue = state.hue(BASE_HUE);
        let glow = state.glow();
        let r = state.radius_base;

        surface.cuboid(
            state.base + Vec3::new(0.0, -r * 0.5, 0.0),
            Vec3::new(r * 2.5, r, r * 2.5),
            Paint::fill(hue, 0.3, 0.35, 1.0),
        );

        let mut outline = Vec::with_capacity(2 * (BODY_LEVELS + 1));
        for k in 0..=BODY_LEVELS {
            let t = k as f32 / BODY_LEVELS as f32;
            outline.push(state.axis_point(t) - Vec3::new(self.half_width(state, t), 0.0, 0.0));
        }
        for k in (0..=BODY_LEVELS).rev() {
            let t = k as f32 / BODY_LEVELS as f32;
            outline.push(state.axis_point(t) + Vec3::new(self.half_width(state, t), 0.0, 0.0));
        }
        surface.polygon(&outline, Paint::fill(hue, 0.5, 0.35 + 0.45 * glow, 0.85));

        let dot = Vec2::splat(1.0 + r * 0.15);
        let particle = Paint::fill(hue + 30.0, 0.25, 0.7 + 0.3 * glow, 0.6 * glow);
        for p in self.particle_positions(state) {
            surface.ellipse(p, dot, particle);
        }
    }
}
