#![forbid(unsafe_code)]
//! soil_bloom: image-driven soil point fields and procedurally animated creature populations.
//!
//! Modules:
//! - luma: pixel buffers and luminance grids
//! - soil: thresholded soil scan (preview and final), settings and behavior profile
//! - population: selecting soil points and spawning creatures on them
//! - creature: the four organism variants, their update contract and display step
//! - interaction: pointer and hand input mapped to wind, lift and contraction
//! - session: the scene state machine owning all of the above
//! - draw: the drawing surface consumed by the display step
//! - events: lifecycle events and sinks
pub mod creature;
pub mod draw;
pub mod error;
pub mod events;
pub mod interaction;
pub mod luma;
pub mod math;
pub mod population;
pub mod sampling;
pub mod session;
pub mod soil;

/// Convenient re-exports for common types. Import with `use soil_bloom::prelude::*;`.
pub mod prelude {
    pub use crate::creature::{growth_progress, Creature, CreatureKind, CreatureState, Species};
    pub use crate::draw::{DrawSurface, Paint, RecordingSurface, Shape};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, SessionEvent, VecSink};
    pub use crate::interaction::{
        HandLandmarks, HandMailbox, HandObservation, HandSender, HandSignal, InteractionConfig,
        InteractionMapper, InteractionState, Pointer, PointerSource,
    };
    pub use crate::luma::{LumaGrid, LumaSource, PixelBuffer, PixelFormat};
    pub use crate::population::{spawn_population, Population};
    pub use crate::session::{Scene, Session, SessionConfig};
    pub use crate::soil::{
        generate, preview, PreviewDot, SoilBehavior, SoilField, SoilPoint, SoilSettings,
        SoilShape,
    };
}
