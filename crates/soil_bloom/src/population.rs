//! Population spawning: choosing soil points and planting one creature on each.
//!
//! Selection is a uniform random permutation of point indices truncated to the target
//! count, so no point is used twice and the kept set has no spatial bias.
use rand::Rng;
use tracing::{debug, info};

use crate::creature::{Creature, SpawnParams, Species};
use crate::draw::DrawSurface;
use crate::math::{lerp, remap};
use crate::sampling::permutation;
use crate::soil::{SoilBehavior, SoilPoint};

/// Strength used for points without a usable intensity.
pub const DEFAULT_STRENGTH: f32 = 0.7;
/// Vertical scale applied to soil height noise.
pub const HEIGHT_NOISE_SCALE: f32 = 1.5;

/// Number of creatures to spawn for `point_count` soil points.
pub fn target_count(point_count: usize, behavior: &SoilBehavior) -> usize {
    let raw = remap(point_count as f32, 50.0, 1200.0, 30.0, 160.0) * behavior.density_factor;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw.floor() as usize).min(point_count)
}

/// Per-creature parameters for a soil point.
///
/// Image-plane axes become the floor plane; height noise becomes a small vertical offset.
pub fn spawn_params(point: &SoilPoint, behavior: &SoilBehavior) -> SpawnParams {
    let strength = if point.n.is_finite() {
        point.n.clamp(0.0, 1.0)
    } else {
        DEFAULT_STRENGTH
    };
    SpawnParams {
        base: glam::Vec3::new(
            point.position.x,
            point.z * HEIGHT_NOISE_SCALE,
            point.position.y,
        ),
        strength,
        height_factor: lerp(0.8, 1.5, strength) * behavior.height_factor,
        thickness_factor: lerp(0.8, 1.4, strength) * behavior.thickness_factor,
    }
}

/// A spawned set of creatures of one species.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    pub species: Species,
    pub creatures: Vec<Creature>,
    /// Soil point index each creature was planted on, parallel to `creatures`.
    pub source_indices: Vec<usize>,
}

impl Population {
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Creature> {
        self.creatures.iter()
    }

    /// Feeds the same tick inputs to every creature.
    pub fn update(
        &mut self,
        growth: f32,
        wind: f32,
        contraction: f32,
        vertical_influence: f32,
        tick: u64,
    ) {
        for creature in &mut self.creatures {
            creature.update(growth, wind, contraction, vertical_influence, tick);
        }
    }

    /// Draws every visible creature.
    pub fn display(&self, surface: &mut dyn DrawSurface) {
        for creature in &self.creatures {
            creature.display(surface);
        }
    }
}

/// Builds a fresh population over `points`.
pub fn spawn_population<R: Rng>(
    points: &[SoilPoint],
    behavior: &SoilBehavior,
    species: Species,
    rng: &mut R,
) -> Population {
    let target = target_count(points.len(), behavior);
    let mut indices = permutation(points.len(), rng);
    indices.truncate(target);

    let creatures = indices
        .iter()
        .map(|&i| Creature::spawn(species, &spawn_params(&points[i], behavior), rng))
        .collect();

    debug!(
        "Spawn target {} from {} soil points (density {:.3}).",
        target,
        points.len(),
        behavior.density_factor
    );
    info!("Spawned {} {} creatures.", target, species);

    Population {
        species,
        creatures,
        source_indices: indices,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glam::{Vec2, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::soil::SoilSettings;

    fn behavior(density_factor: f32) -> SoilBehavior {
        SoilBehavior {
            density_factor,
            height_factor: 1.0,
            thickness_factor: 1.0,
            growth_speed: 1.0,
            avg_brightness: 0.5,
        }
    }

    fn points(n: usize) -> Vec<SoilPoint> {
        (0..n)
            .map(|i| SoilPoint::new(Vec2::new(i as f32, -(i as f32)), 1.0, 200.0, 0.5))
            .collect()
    }

    #[test]
    fn target_count_follows_point_count_and_density() {
        assert_eq!(target_count(50, &behavior(1.0)), 30);
        assert_eq!(target_count(1200, &behavior(1.0)), 160);
        assert_eq!(target_count(1200, &behavior(0.5)), 80);
        assert_eq!(target_count(10, &behavior(1.0)), 10);
        assert_eq!(target_count(0, &behavior(1.0)), 0);
        assert_eq!(target_count(500, &behavior(-0.2)), 0);
        assert_eq!(target_count(500, &behavior(f32::NAN)), 0);
    }

    #[test]
    fn spawn_params_remap_coordinates() {
        let point = SoilPoint::new(Vec2::new(12.0, -7.0), 2.0, 230.0, 1.0);
        let b = SoilBehavior {
            height_factor: 2.0,
            thickness_factor: 0.5,
            ..behavior(1.0)
        };
        let p = spawn_params(&point, &b);
        assert_eq!(p.base, Vec3::new(12.0, 3.0, -7.0));
        assert_eq!(p.strength, 1.0);
        assert!((p.height_factor - 3.0).abs() < 1e-6);
        assert!((p.thickness_factor - 0.7).abs() < 1e-6);
    }

    #[test]
    fn missing_intensity_uses_default_strength() {
        let point = SoilPoint::new(Vec2::ZERO, 0.0, 0.0, f32::NAN);
        let p = spawn_params(&point, &behavior(1.0));
        assert_eq!(p.strength, DEFAULT_STRENGTH);
        assert!((p.height_factor - lerp(0.8, 1.5, 0.7)).abs() < 1e-6);
    }

    #[test]
    fn never_selects_a_point_twice() {
        let pts = points(800);
        let pop = spawn_population(
            &pts,
            &behavior(1.3),
            Species::Ring,
            &mut StdRng::seed_from_u64(1),
        );
        let unique: HashSet<_> = pop.source_indices.iter().copied().collect();
        assert_eq!(unique.len(), pop.len());
        assert_eq!(pop.len(), target_count(800, &behavior(1.3)));
        assert!(pop.len() <= pts.len());
    }

    #[test]
    fn small_fields_are_fully_used() {
        let pts = points(12);
        let pop = spawn_population(
            &pts,
            &behavior(1.0),
            Species::Core,
            &mut StdRng::seed_from_u64(2),
        );
        assert_eq!(pop.len(), 12);
        let mut idx = pop.source_indices.clone();
        idx.sort_unstable();
        assert_eq!(idx, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn creatures_sit_on_their_soil_points() {
        let pts = points(300);
        let b = behavior(1.0);
        let pop = spawn_population(&pts, &b, Species::Spire, &mut StdRng::seed_from_u64(3));
        for (creature, &i) in pop.creatures.iter().zip(&pop.source_indices) {
            assert_eq!(creature.species(), Species::Spire);
            assert_eq!(creature.state.base, spawn_params(&pts[i], &b).base);
            assert_eq!(creature.state.strength, 0.5);
        }
    }

    #[test]
    fn spawning_is_reproducible_for_same_seed() {
        let pts = points(400);
        let b = SoilBehavior::from_points(&SoilSettings::default(), &pts);
        let a = spawn_population(&pts, &b, Species::Ribbon, &mut StdRng::seed_from_u64(9));
        let c = spawn_population(&pts, &b, Species::Ribbon, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, c);
    }

    #[test]
    fn update_reaches_every_creature() {
        let pts = points(100);
        let mut pop = spawn_population(
            &pts,
            &behavior(1.0),
            Species::Ring,
            &mut StdRng::seed_from_u64(4),
        );
        pop.update(0.5, 0.2, 0.1, 0.3, 12);
        assert!(pop.iter().all(|c| c.state.growth == 0.5 && c.state.tick == 12));
    }

    #[test]
    fn empty_field_spawns_nothing() {
        let pop = spawn_population(
            &[],
            &behavior(1.0),
            Species::Ring,
            &mut StdRng::seed_from_u64(4),
        );
        assert!(pop.is_empty());
    }
}
