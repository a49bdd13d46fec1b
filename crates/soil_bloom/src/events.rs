//! Event types and sinks for observing a [`crate::session::Session`].
//!
//! Every state-changing session operation has a `*_with_events` variant that reports
//! what happened to an [`EventSink`]. The plain variants pass `()`.
use crate::creature::Species;
use crate::session::Scene;

/// Describes lifecycle events emitted by a session.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The scene state machine moved.
    SceneChanged { from: Scene, to: Scene },

    /// A final soil field replaced the previous one.
    SoilGenerated {
        /// Points in the new field, synthetic ones included.
        point_count: usize,
        /// Whether the synthetic fallback was injected.
        synthetic: bool,
        /// Mean normalized intensity of the field.
        avg_brightness: f32,
    },

    /// A population replaced the previous one.
    PopulationSpawned { species: Species, count: usize },

    /// Non-fatal condition absorbed by the session.
    Warning {
        /// Operation that raised the warning.
        context: String,
        message: String,
    },
}

impl SessionEvent {
    pub fn warning(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Warning {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// A generic event sink that accepts [`SessionEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SessionEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SessionEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SessionEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SessionEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SessionEvent),
{
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SessionEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<SessionEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SessionEvent] {
        &self.events
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.as_slice().is_empty());
        sink.send(SessionEvent::warning("generate", "no soil"));
        sink.send(SessionEvent::PopulationSpawned {
            species: Species::Core,
            count: 3,
        });
        assert_eq!(sink.as_slice().len(), 2);
        assert_eq!(
            sink.as_slice()[0],
            SessionEvent::Warning {
                context: "generate".into(),
                message: "no soil".into(),
            }
        );
        assert_eq!(sink.into_inner().len(), 2);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(SessionEvent::SceneChanged {
            from: Scene::Idle,
            to: Scene::Configuring,
        });
        assert_eq!(count, 1);
    }
}
