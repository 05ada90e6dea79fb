//! Event sinks: where session decisions go.
//!
//! A sink is called synchronously from the session pipeline and must return
//! quickly. Anything slow (network sends, speech, disk) belongs behind a
//! [`ChannelSink`], drained by a task the session never waits for.

use tokio::sync::mpsc;

use focusguard_session_model::event::{EngineEvent, EventKind};

/// Receiver of engine events.
pub trait EventSink {
    fn emit(&mut self, event: &EngineEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &EngineEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: &EngineEvent) {
        (**self).emit(event);
    }
}

/// Collects events in memory.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    events: Vec<EngineEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EngineEvent> {
        self.events
    }

    /// Events whose [`EngineEvent::name`] matches.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EngineEvent> + 'a {
        self.events.iter().filter(move |e| e.name() == name)
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &EngineEvent) {
        self.events.push(event.clone());
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &EngineEvent) {
        let t = event.timestamp_ns;
        match &event.kind {
            EventKind::StateChanged { from, to, .. } => {
                tracing::info!(t, %from, %to, "Discipline state changed");
            }
            EventKind::DistractionTrigger { reason } => {
                tracing::info!(t, %reason, "Distraction trigger");
            }
            EventKind::RecoveryObserved { seconds } => {
                tracing::info!(t, seconds, "Recovered");
            }
            EventKind::StreakMilestone { streak_seconds } => {
                tracing::info!(t, streak_seconds, "Streak milestone");
            }
            EventKind::ExtractionError { kind, message } => {
                tracing::warn!(t, ?kind, %message, "Frame dropped");
            }
        }
    }
}

/// Forwards events to an unbounded channel without ever blocking.
///
/// Events emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: &EngineEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!(event = event.name(), "Event receiver gone, dropping event");
        }
    }
}

/// Sends every event to two sinks, first `A` then `B`.
#[derive(Debug, Default, Clone)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn emit(&mut self, event: &EngineEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
