//! The simulation context owning all mutable state of one running session.
//!
//! A [`Session`] moves through three scenes:
//! - [`Scene::Idle`]: nothing loaded. Operations that need an image return
//!   [`Error::NotReady`]; [`Session::tick`] and [`Session::display`] do nothing.
//! - [`Scene::Configuring`]: an image is loaded and soil settings can be previewed.
//! - [`Scene::Growing`]: a soil field and a population exist and are ticked.
//!
//! Generation and species changes build the complete new soil field and population
//! before swapping them in, so no creature from a previous generation survives.
use std::fmt;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::creature::{growth_progress, Species};
use crate::draw::DrawSurface;
use crate::error::{Error, Result};
use crate::events::{EventSink, SessionEvent};
use crate::interaction::{
    HandMailbox, HandSender, InteractionConfig, InteractionMapper, InteractionState, Pointer,
};
use crate::luma::{LumaGrid, LumaSource};
use crate::population::{spawn_population, Population};
use crate::soil::{self, PreviewDot, SoilBehavior, SoilField, SoilSettings};

/// Scene state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scene {
    #[default]
    Idle,
    Configuring,
    Growing,
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scene::Idle => "idle",
            Scene::Configuring => "configuring",
            Scene::Growing => "growing",
        })
    }
}

/// Session-wide configuration.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Canvas size in pixels; the pointer space is centered on it.
    pub canvas_size: Vec2,
    /// Seed of the session RNG. Same seed and inputs give the same soil and population.
    pub seed: u64,
    /// Species spawned by the first generation.
    pub species: Species,
    /// Soil settings in effect until [`Session::set_settings`] is called.
    pub soil: SoilSettings,
    pub interaction: InteractionConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_size: Vec2::new(1200.0, 800.0),
            seed: 42,
            species: Species::default(),
            soil: SoilSettings::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas_size(mut self, canvas_size: Vec2) -> Self {
        self.canvas_size = canvas_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_species(mut self, species: Species) -> Self {
        self.species = species;
        self
    }

    pub fn with_soil_settings(mut self, soil: SoilSettings) -> Self {
        self.soil = soil;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canvas_size.is_finite() && self.canvas_size.cmpgt(Vec2::ZERO).all()) {
            return Err(Error::InvalidConfig(format!(
                "canvas size must be positive, got {}",
                self.canvas_size
            )));
        }
        self.soil.validate()?;
        self.interaction.validate()
    }
}

/// Everything produced by one generation, swapped in as a unit.
#[derive(Clone, Debug)]
struct Growth {
    soil: SoilField,
    behavior: SoilBehavior,
    population: Population,
    /// Tick at which the current population was spawned.
    started_at: u64,
}

/// One running session: image, soil, population, interaction and the tick clock.
pub struct Session {
    config: SessionConfig,
    rng: StdRng,
    scene: Scene,
    image: Option<LumaGrid>,
    settings: SoilSettings,
    species: Species,
    growth: Option<Growth>,
    mapper: InteractionMapper,
    mailbox: HandMailbox,
    tick: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            scene: Scene::Idle,
            image: None,
            settings: config.soil.clone(),
            species: config.species,
            growth: None,
            mapper: InteractionMapper::new(config.interaction.clone(), config.canvas_size),
            mailbox: HandMailbox::new(),
            tick: 0,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn settings(&self) -> &SoilSettings {
        &self.settings
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn soil(&self) -> Option<&SoilField> {
        self.growth.as_ref().map(|g| &g.soil)
    }

    pub fn behavior(&self) -> Option<&SoilBehavior> {
        self.growth.as_ref().map(|g| &g.behavior)
    }

    pub fn population(&self) -> Option<&Population> {
        self.growth.as_ref().map(|g| &g.population)
    }

    pub fn interaction(&self) -> &InteractionState {
        self.mapper.state()
    }

    /// Ticks processed since the session was created or reset.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Producer handle for the gesture collaborator.
    pub fn hand_sender(&self) -> HandSender {
        self.mailbox.sender()
    }

    pub fn load_image<S: LumaSource + ?Sized>(&mut self, image: &S) -> Result<()> {
        self.load_image_with_events(image, &mut ())
    }

    /// Bakes the luminance of `image` and enters [`Scene::Configuring`].
    ///
    /// Any previous soil field and population are dropped. A zero-sized image leaves the
    /// session untouched and returns [`Error::NotReady`].
    pub fn load_image_with_events<S: LumaSource + ?Sized>(
        &mut self,
        image: &S,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        let (width, height) = image.dimensions();
        let grid = match LumaGrid::from_fn(width, height, |x, y| image.luma_at(x, y)) {
            Ok(grid) => grid,
            Err(err) => {
                warn!("Image rejected: {}.", err);
                sink.send(SessionEvent::warning("load_image", err.to_string()));
                return Err(err);
            }
        };

        info!("Image loaded ({}x{}).", width, height);
        self.image = Some(grid);
        self.growth = None;
        self.transition(Scene::Configuring, sink);
        Ok(())
    }

    /// Replaces the soil settings used by the next preview or generation.
    pub fn set_settings(&mut self, settings: SoilSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings.sanitized();
        debug!("Soil settings updated: {:?}.", self.settings);
        Ok(())
    }

    /// Preview dots for the loaded image under the current settings.
    pub fn preview(&self) -> Result<Vec<PreviewDot>> {
        Ok(soil::preview(self.loaded_image()?, &self.settings))
    }

    pub fn generate(&mut self) -> Result<()> {
        self.generate_with_events(&mut ())
    }

    /// Generates a fresh soil field and population and enters [`Scene::Growing`].
    pub fn generate_with_events(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        let image = match self.image.as_ref() {
            Some(image) => image,
            None => return Err(self.not_ready("generate", sink)),
        };

        let field = soil::generate(image, &self.settings, &mut self.rng);
        let behavior = SoilBehavior::from_points(&self.settings, &field.points);
        let population = spawn_population(&field.points, &behavior, self.species, &mut self.rng);

        sink.send(SessionEvent::SoilGenerated {
            point_count: field.len(),
            synthetic: field.synthetic,
            avg_brightness: behavior.avg_brightness,
        });
        if field.synthetic {
            sink.send(SessionEvent::warning(
                "generate",
                "image produced too few soil points; synthetic soil injected",
            ));
        }
        sink.send(SessionEvent::PopulationSpawned {
            species: self.species,
            count: population.len(),
        });
        info!(
            "Soil generated with {} points; {} creatures growing.",
            field.len(),
            population.len()
        );

        self.growth = Some(Growth {
            soil: field,
            behavior,
            population,
            started_at: self.tick,
        });
        self.transition(Scene::Growing, sink);
        Ok(())
    }

    pub fn change_species(&mut self, species: Species) -> Result<()> {
        self.change_species_with_events(species, &mut ())
    }

    /// Switches species. While growing, re-spawns on the existing soil and behavior and
    /// restarts the growth clock.
    pub fn change_species_with_events(
        &mut self,
        species: Species,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        self.species = species;
        let Some(growth) = self.growth.as_ref() else {
            debug!("Species set to {} for the next generation.", species);
            return Ok(());
        };

        let population =
            spawn_population(&growth.soil.points, &growth.behavior, species, &mut self.rng);
        sink.send(SessionEvent::PopulationSpawned {
            species,
            count: population.len(),
        });

        let started_at = self.tick;
        if let Some(growth) = self.growth.as_mut() {
            growth.population = population;
            growth.started_at = started_at;
        }
        Ok(())
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.mapper.begin_drag(pointer);
    }

    pub fn drag_to(&mut self, pointer: Vec2) {
        self.mapper.drag_to(pointer);
    }

    pub fn end_drag(&mut self) {
        self.mapper.end_drag();
    }

    pub fn wheel(&mut self, delta: f32) {
        self.mapper.wheel(delta);
    }

    /// Advances the session by one frame.
    ///
    /// `mouse` is the pointer in centered canvas space, used whenever no fresh hand
    /// observation is available. Returns the pointer that drove this tick, or `None`
    /// while idle.
    pub fn tick(&mut self, mouse: Vec2) -> Option<Pointer> {
        if self.scene == Scene::Idle {
            self.mailbox.clear();
            return None;
        }

        self.tick += 1;
        let signal = self.mailbox.take_latest();
        let pointer = self.mapper.tick(mouse, signal, self.tick);

        if let Some(growth) = self.growth.as_mut() {
            let s = self.mapper.state();
            let progress = growth_progress(
                self.tick.saturating_sub(growth.started_at),
                growth.behavior.growth_speed,
            );
            growth.population.update(
                progress,
                s.wind,
                s.contraction,
                s.vertical_influence,
                self.tick,
            );
        }
        Some(pointer)
    }

    /// Draws the population. Nothing is drawn outside [`Scene::Growing`].
    pub fn display(&self, surface: &mut dyn DrawSurface) {
        if self.scene != Scene::Growing {
            return;
        }
        if let Some(growth) = self.growth.as_ref() {
            growth.population.display(surface);
        }
    }

    pub fn reset(&mut self) {
        self.reset_with_events(&mut ());
    }

    /// Drops image, soil and population and returns to [`Scene::Idle`].
    pub fn reset_with_events(&mut self, sink: &mut dyn EventSink) {
        self.image = None;
        self.growth = None;
        self.tick = 0;
        self.mailbox.clear();
        self.transition(Scene::Idle, sink);
    }

    fn loaded_image(&self) -> Result<&LumaGrid> {
        self.image
            .as_ref()
            .ok_or_else(|| Error::NotReady("no image loaded".into()))
    }

    fn not_ready(&self, context: &str, sink: &mut dyn EventSink) -> Error {
        warn!("{} called before an image was loaded.", context);
        sink.send(SessionEvent::warning(context, "no image loaded"));
        Error::NotReady("no image loaded".into())
    }

    /// Moves to `to`, resetting interaction state on every actual scene change.
    fn transition(&mut self, to: Scene, sink: &mut dyn EventSink) {
        let from = self.scene;
        if from == to {
            return;
        }
        self.scene = to;
        self.mapper.reset();
        info!("Scene {} -> {}.", from, to);
        sink.send(SessionEvent::SceneChanged { from, to });
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("scene", &self.scene)
            .field("species", &self.species)
            .field("tick", &self.tick)
            .field("soil_points", &self.soil().map(SoilField::len))
            .field("population", &self.population().map(Population::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glam::Vec3;

    use super::*;
    use crate::draw::RecordingSurface;
    use crate::events::VecSink;
    use crate::interaction::{HandLandmarks, HandObservation, PointerSource};

    struct EmptyImage;

    impl LumaSource for EmptyImage {
        fn dimensions(&self) -> (u32, u32) {
            (0, 0)
        }

        fn luma_at(&self, _x: u32, _y: u32) -> f32 {
            0.0
        }
    }

    fn bright(width: u32, height: u32) -> LumaGrid {
        LumaGrid::uniform(width, height, 200.0).unwrap()
    }

    fn gradient() -> LumaGrid {
        LumaGrid::from_fn(120, 90, |x, y| ((x + y) as f32 * 1.2).min(255.0)).unwrap()
    }

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    fn growing(seed: u64) -> Session {
        let mut s = Session::new(SessionConfig::new().with_seed(seed)).unwrap();
        s.load_image(&gradient()).unwrap();
        s.generate().unwrap();
        s
    }

    #[test]
    fn config_validation() {
        assert!(SessionConfig::default().validate().is_ok());
        let bad = SessionConfig::new().with_canvas_size(Vec2::new(0.0, 10.0));
        assert!(matches!(Session::new(bad), Err(Error::InvalidConfig(_))));
        let bad = SessionConfig::new()
            .with_interaction(InteractionConfig::new().with_hand_smoothing(f32::NAN));
        assert!(Session::new(bad).is_err());
    }

    #[test]
    fn idle_session_is_inert() {
        let mut s = session();
        assert_eq!(s.scene(), Scene::Idle);
        assert!(s.preview().unwrap_err().is_not_ready());

        let mut sink = VecSink::new();
        assert!(s.generate_with_events(&mut sink).unwrap_err().is_not_ready());
        assert!(matches!(sink.as_slice(), [SessionEvent::Warning { .. }]));
        assert_eq!(s.scene(), Scene::Idle);

        assert!(s.tick(Vec2::ZERO).is_none());
        assert_eq!(s.tick_count(), 0);
        let mut surface = RecordingSurface::new();
        s.display(&mut surface);
        assert!(surface.is_empty());
    }

    #[test]
    fn empty_image_is_not_ready() {
        let mut s = session();
        let mut sink = VecSink::new();
        let err = s.load_image_with_events(&EmptyImage, &mut sink).unwrap_err();
        assert!(err.is_not_ready());
        assert_eq!(s.scene(), Scene::Idle);
        assert_eq!(sink.as_slice().len(), 1);
    }

    #[test]
    fn preview_after_loading_image() {
        let mut s = session();
        s.load_image(&bright(100, 100)).unwrap();
        assert_eq!(s.scene(), Scene::Configuring);
        s.set_settings(SoilSettings::new().with_spacing(10).with_threshold(100.0))
            .unwrap();
        assert_eq!(s.preview().unwrap().len(), 100);
    }

    #[test]
    fn set_settings_rejects_non_finite_and_clamps() {
        let mut s = session();
        assert!(s.set_settings(SoilSettings::new().with_threshold(f32::NAN)).is_err());
        s.set_settings(SoilSettings::new().with_dot_size(99.0).with_spacing(0))
            .unwrap();
        assert_eq!(s.settings().dot_size, 20.0);
        assert_eq!(s.settings().spacing, 1);
    }

    #[test]
    fn generate_enters_growing_and_reports_events() {
        let mut s = session();
        s.load_image(&gradient()).unwrap();
        let mut sink = VecSink::new();
        s.generate_with_events(&mut sink).unwrap();
        assert_eq!(s.scene(), Scene::Growing);

        let events = sink.into_inner();
        assert!(matches!(
            events[0],
            SessionEvent::SoilGenerated {
                synthetic: false,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            SessionEvent::PopulationSpawned {
                species: Species::Ring,
                ..
            }
        ));
        assert_eq!(
            events[2],
            SessionEvent::SceneChanged {
                from: Scene::Configuring,
                to: Scene::Growing,
            }
        );

        let soil = s.soil().unwrap();
        let pop = s.population().unwrap();
        assert!(soil.len() <= s.settings().max_points);
        assert!(!pop.is_empty());
        assert!(pop.source_indices.iter().all(|&i| i < soil.len()));
    }

    #[test]
    fn dark_image_gets_synthetic_soil() {
        let mut s = session();
        s.load_image(&LumaGrid::uniform(64, 64, 10.0).unwrap()).unwrap();
        let mut sink = VecSink::new();
        s.generate_with_events(&mut sink).unwrap();
        assert!(s.soil().unwrap().synthetic);
        assert_eq!(s.soil().unwrap().len(), 120);
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, SessionEvent::Warning { .. })));
    }

    #[test]
    fn regenerate_replaces_everything() {
        let mut s = growing(5);
        let first = s.soil().unwrap().clone();
        s.set_settings(SoilSettings::new().with_spacing(3)).unwrap();
        s.generate().unwrap();
        let second = s.soil().unwrap();
        assert_ne!(&first, second);
        let pop = s.population().unwrap();
        assert!(pop.source_indices.iter().all(|&i| i < second.len()));
        for (creature, &i) in pop.creatures.iter().zip(&pop.source_indices) {
            assert_eq!(creature.state.base.x, second.points[i].position.x);
        }
    }

    #[test]
    fn loading_a_new_image_drops_the_population() {
        let mut s = growing(1);
        s.load_image(&bright(40, 40)).unwrap();
        assert_eq!(s.scene(), Scene::Configuring);
        assert!(s.population().is_none());
        assert!(s.soil().is_none());
    }

    #[test]
    fn change_species_respawns_on_same_soil() {
        let mut s = growing(7);
        let soil_before = s.soil().unwrap().clone();
        let count = s.population().unwrap().len();
        for _ in 0..10 {
            s.tick(Vec2::ZERO);
        }

        let mut sink = VecSink::new();
        s.change_species_with_events(Species::Spire, &mut sink).unwrap();
        assert_eq!(s.soil().unwrap(), &soil_before);
        let pop = s.population().unwrap();
        assert_eq!(pop.len(), count);
        assert!(pop.iter().all(|c| c.species() == Species::Spire));
        assert!(pop.iter().all(|c| c.state.growth == 0.0));
        assert_eq!(sink.as_slice().len(), 1);
        assert_eq!(s.scene(), Scene::Growing);
    }

    #[test]
    fn change_species_before_generation_is_remembered() {
        let mut s = session();
        s.change_species(Species::Core).unwrap();
        s.load_image(&gradient()).unwrap();
        s.generate().unwrap();
        assert!(s.population().unwrap().iter().all(|c| c.species() == Species::Core));
    }

    #[test]
    fn growth_reaches_full_size_and_draws() {
        let mut s = growing(3);
        let mut surface = RecordingSurface::new();
        s.display(&mut surface);
        assert!(surface.is_empty());

        for _ in 0..400 {
            s.tick(Vec2::ZERO);
        }
        let pop = s.population().unwrap();
        assert!(pop.iter().all(|c| c.state.growth == 1.0));
        assert!(pop.iter().all(|c| c.state.tick == 400));
        s.display(&mut surface);
        assert!(!surface.is_empty());
    }

    #[test]
    fn same_seed_same_session() {
        let a = growing(11);
        let b = growing(11);
        assert_eq!(a.soil(), b.soil());
        assert_eq!(a.population(), b.population());
        assert_ne!(growing(12).population(), a.population());
    }

    #[test]
    fn hand_observations_drive_contraction() {
        let mut s = growing(2);
        let sender = s.hand_sender();
        let fist = HandObservation::new(
            HandLandmarks::new(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(0.0, 8.0, 0.0),
            ),
            Vec2::new(640.0, 480.0),
        );
        for _ in 0..20 {
            sender.observe(fist);
            let pointer = s.tick(Vec2::ZERO).unwrap();
            assert_eq!(pointer.source, PointerSource::Hand);
        }
        let contraction = s.interaction().contraction;
        assert!(contraction > 0.8);
        let pop = s.population().unwrap();
        assert!(pop.iter().all(|c| c.state.contraction == contraction));
    }

    #[test]
    fn drag_and_wheel_update_camera() {
        let mut s = growing(4);
        s.begin_drag(Vec2::ZERO);
        s.drag_to(Vec2::new(100.0, 0.0));
        s.end_drag();
        s.wheel(500.0);
        assert!((s.interaction().rotation.y - 0.8).abs() < 1e-6);
        assert!((s.interaction().zoom - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut s = growing(9);
        s.tick(Vec2::ONE);
        let mut sink = VecSink::new();
        s.reset_with_events(&mut sink);
        assert_eq!(s.scene(), Scene::Idle);
        assert!(s.population().is_none());
        assert_eq!(s.tick_count(), 0);
        assert_eq!(s.interaction(), &InteractionState::default());
        assert_eq!(
            sink.as_slice(),
            &[SessionEvent::SceneChanged {
                from: Scene::Growing,
                to: Scene::Idle,
            }]
        );
    }

    #[test]
    fn scene_changes_reset_interaction() {
        let mut s = session();
        s.load_image(&gradient()).unwrap();
        s.wheel(-300.0);
        for _ in 0..10 {
            s.tick(Vec2::new(500.0, 0.0));
        }
        assert!(s.interaction().wind > 0.0);
        s.generate().unwrap();
        assert_eq!(s.interaction(), &InteractionState::default());
    }

    #[test]
    fn spawn_indices_are_distinct() {
        let s = growing(21);
        let pop = s.population().unwrap();
        let unique: HashSet<_> = pop.source_indices.iter().collect();
        assert_eq!(unique.len(), pop.len());
    }
}
