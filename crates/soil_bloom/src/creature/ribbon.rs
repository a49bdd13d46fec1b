//! Ribbon organism: a twisting strip that narrows toward a glowing bud.
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{count, scaled, CreatureState, SpawnParams};
use crate::draw::{DrawSurface, Paint};
use crate::sampling::rand_range;

const BASE_HUE: f32 = 300.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RibbonOrganism {
    pub segment_count: usize,
    /// Twist phase offset in radians.
    pub twist: f32,
}

impl RibbonOrganism {
    pub(crate) fn spawn(params: &SpawnParams, rng: &mut dyn Rng) -> (Self, f32, f32) {
        let s = params.strength;
        (
            Self {
                segment_count: count(10.0, 20.0, s),
                twist: rand_range(rng, 0.0, TAU),
            },
            scaled(60.0, 150.0, s, params.height_factor),
            scaled(2.0, 5.0, s, params.thickness_factor),
        )
    }

    /// Half width of the strip at relative height `t`.
    pub fn half_width(&self, state: &CreatureState, t: f32) -> f32 {
        let ripple = 1.0 + 0.3 * state.vertical_influence * (state.phase * 3.0 + t * 6.0).sin();
        state.radius_base * (1.0 - 0.6 * t) * ripple
    }

    /// Left and right strip edges, bottom to top.
    pub fn edges(&self, state: &CreatureState) -> (Vec<Vec3>, Vec<Vec3>) {
        let n = self.segment_count;
        let fold = 1.0 - 0.5 * state.contraction;
        let mut left = Vec::with_capacity(n + 1);
        let mut right = Vec::with_capacity(n + 1);
        for k in 0..=n {
            let t = k as f32 / n as f32;
            let center = state.axis_point(t);
            let angle = state.phase * 1.5 + self.twist + t * 2.0 * PI;
            let w = self.half_width(state, t);
            let depth = angle.sin() * state.radius_base * 2.0 * fold;
            let across = Vec3::new(w * angle.cos(), 0.0, 0.0);
            left.push(center - across + Vec3::new(0.0, 0.0, depth));
            right.push(center + across + Vec3::new(0.0, 0.0, depth));
        }
        (left, right)
    }

    pub(crate) fn display(&self, state: &CreatureState, surface: &mut dyn DrawSurface) {
        let hue = state.hue(BASE_HUE);
        let glow = state.glow();

        let (left, right) = self.edges(state);
        let mut outline = left.clone();
        outline.extend(right.iter().rev());
        surface.polygon(&outline, Paint::fill(hue, 0.55, 0.4 + 0.4 * glow, 0.7));

        let edge = Paint::stroke(hue + 20.0, 0.4, 0.6 + 0.4 * glow, 0.9, 0.6 * state.thickness);
        for pair in left.windows(2) {
            surface.line(pair[0], pair[1], edge);
        }

        let bud = state.axis_point(1.0);
        let r = state.radius_base * (0.6 + 0.6 * state.contraction);
        surface.ellipse(bud, Vec2::splat(r), Paint::fill(hue + 45.0, 0.35, glow, 0.9));
    }
}
