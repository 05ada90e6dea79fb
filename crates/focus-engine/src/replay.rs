//! Feeding recorded inputs through a session.
//!
//! Recordings from a live camera loop often carry frames only. When that is
//! the case, the 1 Hz tick is derived from the frame timestamps so streaks
//! and milestones still advance during replay.

use focusguard_common::clock::TickPacer;
use focusguard_session_model::input::SessionInput;
use focusguard_session_model::TimestampNs;

use crate::session::FocusSession;
use crate::sink::EventSink;

/// How a recording is fed to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Insert 1 Hz ticks derived from input timestamps.
    pub synthesize_ticks: bool,
}

impl ReplayOptions {
    /// Synthesize ticks only if the recording has none of its own.
    pub fn auto(inputs: &[SessionInput]) -> Self {
        Self {
            synthesize_ticks: !inputs.iter().any(SessionInput::is_tick),
        }
    }
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            synthesize_ticks: true,
        }
    }
}

/// Counters from one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub inputs: usize,
    pub synthesized_ticks: usize,
    pub out_of_order: usize,
}

/// Produces the ticks due before each input of a tick-less stream.
#[derive(Debug, Clone)]
pub struct TickSynthesizer {
    pacer: TickPacer,
}

impl Default for TickSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSynthesizer {
    pub fn new() -> Self {
        Self {
            pacer: TickPacer::one_hz(),
        }
    }

    /// Ticks that fall due up to and including `now`. The first call anchors
    /// the pacer and yields nothing.
    pub fn ticks_due(&mut self, now: TimestampNs) -> Vec<SessionInput> {
        self.pacer
            .advance_to(now)
            .into_iter()
            .map(SessionInput::tick)
            .collect()
    }
}

/// Orders a recording for delivery: optional synthesized ticks first, then
/// each input. Shared by direct replays and replays through an actor.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    ticks: Option<TickSynthesizer>,
    last_t: Option<TimestampNs>,
    stats: ReplayStats,
}

impl ReplayFeed {
    pub fn new(options: ReplayOptions) -> Self {
        Self {
            ticks: options.synthesize_ticks.then(TickSynthesizer::new),
            last_t: None,
            stats: ReplayStats::default(),
        }
    }

    /// Record `input` and return the synthesized ticks to deliver before it.
    ///
    /// Inputs whose timestamp goes backwards are counted and logged; they
    /// are still delivered and the scheduler treats the negative gap as zero.
    pub fn ticks_before(&mut self, input: &SessionInput) -> Vec<SessionInput> {
        let now = input.timestamp_ns;
        if let Some(last) = self.last_t {
            if now < last {
                self.stats.out_of_order += 1;
                tracing::warn!(t = now, previous = last, "Input timestamp went backwards");
            }
        }
        self.last_t = Some(now);
        self.stats.inputs += 1;

        let ticks = match self.ticks.as_mut() {
            Some(ticks) => ticks.ticks_due(now),
            None => Vec::new(),
        };
        self.stats.synthesized_ticks += ticks.len();
        ticks
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Final counters, logged once.
    pub fn finish(self) -> ReplayStats {
        tracing::debug!(
            inputs = self.stats.inputs,
            synthesized_ticks = self.stats.synthesized_ticks,
            out_of_order = self.stats.out_of_order,
            "Replay finished"
        );
        self.stats
    }
}

/// Run every input through `session` in order, sending events to `sink`.
pub fn replay<S: EventSink + ?Sized>(
    session: &mut FocusSession,
    inputs: &[SessionInput],
    sink: &mut S,
    options: ReplayOptions,
) -> ReplayStats {
    let mut feed = ReplayFeed::new(options);
    for input in inputs {
        for tick in feed.ticks_before(input) {
            session.process(&tick, sink);
        }
        session.process(input, sink);
    }
    feed.finish()
}
