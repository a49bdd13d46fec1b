//! Core organism: a pulsing nucleus on a short stalk, circled by orbitals.
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{count, scaled, CreatureState, SpawnParams};
use crate::draw::{DrawSurface, Paint};
use crate::sampling::rand_range;

const BASE_HUE: f32 = 30.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreOrganism {
    /// One unit rotation axis per orbital, chosen at spawn.
    pub orbital_axes: Vec<Vec3>,
}

/// Uniformly distributed unit vector.
fn random_axis(rng: &mut dyn Rng) -> Vec3 {
    let z = rand_range(rng, -1.0, 1.0);
    let theta = rand_range(rng, 0.0, TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

impl CoreOrganism {
    pub(crate) fn spawn(params: &SpawnParams, rng: &mut dyn Rng) -> (Self, f32, f32) {
        let s = params.strength;
        let orbitals = count(3.0, 7.0, s);
        (
            Self {
                orbital_axes: (0..orbitals).map(|_| random_axis(rng)).collect(),
            },
            scaled(18.0, 45.0, s, params.height_factor),
            scaled(8.0, 18.0, s, params.thickness_factor),
        )
    }

    pub fn nucleus_radius(&self, state: &CreatureState) -> f32 {
        let pulse = 1.0 + 0.2 * state.vertical_influence * (state.phase * 3.0).sin();
        state.radius_base * (1.0 - 0.35 * state.contraction) * pulse * state.eased_growth()
    }

    /// Orbit radius around the nucleus; contraction pulls orbitals in.
    pub fn orbit_radius(&self, state: &CreatureState) -> f32 {
        state.radius_base * (1.8 - 0.8 * state.contraction) * state.eased_growth()
    }

    /// Current orbital positions.
    pub fn orbital_positions(&self, state: &CreatureState) -> Vec<Vec3> {
        let center = state.axis_point(1.0);
        let radius = self.orbit_radius(state);
        self.orbital_axes
            .iter()
            .enumerate()
            .map(|(k, axis)| {
                let (u, w) = axis.any_orthonormal_pair();
                let angle = state.phase * (1.0 + 0.3 * k as f32) + k as f32 * 1.7;
                center + (u * angle.cos() + w * angle.sin()) * radius
            })
            .collect()
    }

    pub(crate) fn display(&self, state: &CreatureState, surface: &mut dyn DrawSurface) {
        let hue = state.hue(BASE_HUE);
        let glow = state.glow();
        let center = state.axis_point(1.0);

        surface.line(
            state.base,
            center,
            Paint::stroke(hue, 0.4, 0.5, 0.7, (state.thickness * 1.5).max(0.5)),
        );

        let r = self.nucleus_radius(state);
        surface.ellipse(
            center,
            Vec2::splat(r * 1.6),
            Paint::fill(hue, 0.5, glow, 0.15 * glow),
        );
        surface.ellipse(
            center,
            Vec2::splat(r),
            Paint::fill(hue, 0.7, 0.5 + 0.5 * glow, 0.9),
        );

        let tether = Paint::stroke(hue + 20.0, 0.3, 0.8, 0.25, 0.5);
        let bead = Vec2::splat(state.radius_base * 0.2);
        for (k, p) in self.orbital_positions(state).into_iter().enumerate() {
            surface.line(center, p, tether);
            surface.ellipse(
                p,
                bead,
                Paint::fill(hue + 25.0 * k as f32, 0.6, 0.6 + 0.4 * glow, 0.85),
            );
        }
    }
}
