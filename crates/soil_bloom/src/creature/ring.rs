//! Ring organism: a stack of shrinking rings threaded on a swaying stem.
use glam::{Vec2, Vec3};

use super::{count, scaled, CreatureState, SpawnParams};
use crate::draw::{DrawSurface, Paint};

const BASE_HUE: f32 = 170.0;
const STEM_SEGMENTS: usize = 8;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingOrganism {
    pub ring_count: usize,
}

impl RingOrganism {
    /// Returns the organism with its base height and base radius.
    pub(crate) fn spawn(params: &SpawnParams) -> (Self, f32, f32) {
        let s = params.strength;
        (
            Self {
                ring_count: count(4.0, 9.0, s),
            },
            scaled(40.0, 110.0, s, params.height_factor),
            scaled(6.0, 14.0, s, params.thickness_factor),
        )
    }

    /// Radius of ring `index` (0 is the lowest ring).
    pub fn ring_radius(&self, state: &CreatureState, index: usize) -> f32 {
        let t = (index + 1) as f32 / self.ring_count as f32;
        let pulse =
            1.0 + 0.15 * state.vertical_influence * (state.phase * 2.0 + index as f32).sin();
        state.radius_base * (1.0 - 0.45 * t) * (1.0 - 0.4 * state.contraction) * pulse
    }

    pub(crate) fn display(&self, state: &CreatureState, surface: &mut dyn DrawSurface) {
        let hue = state.hue(BASE_HUE);
        let glow = state.glow();

        let stem = Paint::stroke(
            hue,
            0.5,
            0.35 + 0.3 * glow,
            0.8,
            (state.thickness * 1.2).max(0.5),
        );
        let mut prev = state.base;
        for k in 1..=STEM_SEGMENTS {
            let next = state.axis_point(k as f32 / STEM_SEGMENTS as f32);
            surface.line(prev, next, stem);
            prev = next;
        }

        for i in 0..self.ring_count {
            let t = (i + 1) as f32 / self.ring_count as f32;
            let r = self.ring_radius(state, i);
            let paint = Paint::fill(
                hue + t * 30.0,
                0.6,
                0.45 + 0.5 * glow * t,
                0.35 + 0.4 * t,
            );
            surface.ellipse(state.axis_point(t), Vec2::new(r, r * 0.35), paint);
        }

        // Contraction lights a small bead on top.
        if state.contraction > 0.05 {
            let top = state.axis_point(1.0) + Vec3::new(0.0, -state.radius_base * 0.3, 0.0);
            let r = state.radius_base * 0.25 * state.contraction;
            surface.ellipse(top, Vec2::splat(r), Paint::fill(hue + 40.0, 0.3, 1.0, glow));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::tests::{grown, params, record};
    use crate::creature::{CreatureKind, Species};
    use crate::draw::Shape;

    #[test]
    fn spawn_constants_follow_strength() {
        let (weak, h0, r0) = RingOrganism::spawn(&params(0.0));
        let (strong, h1, r1) = RingOrganism::spawn(&params(1.0));
        assert_eq!(weak.ring_count, 4);
        assert_eq!(strong.ring_count, 9);
        assert_eq!((h0, r0), (40.0, 6.0));
        assert_eq!((h1, r1), (110.0, 14.0));
    }

    #[test]
    fn draws_stem_and_one_ellipse_per_ring() {
        let c = grown(Species::Ring, 0.5);
        let shapes = record(&c);
        let rings = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Ellipse { .. }))
            .count();
        let lines = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Line { .. }))
            .count();
        assert_eq!(rings, c.structural_count());
        assert_eq!(lines, STEM_SEGMENTS);
    }

    #[test]
    fn contraction_shrinks_rings() {
        let mut c = grown(Species::Ring, 0.7);
        let CreatureKind::Ring(ring) = c.kind.clone() else {
            panic!("expected ring");
        };
        let open = ring.ring_radius(&c.state, 0);
        c.update(1.0, 0.0, 1.0, 0.0, 100);
        let closed = ring.ring_radius(&c.state, 0);
        assert!((closed - open * 0.6).abs() < 1e-4);
    }
}
