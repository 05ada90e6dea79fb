//! Intervention scheduling over discipline-state edges.
//!
//! The scheduler turns edges of the debounced state, plus a 1 Hz tick, into
//! the externally visible events:
//! - **Focused → distracted:** a `DistractionTrigger` if the cooldown since
//!   the previous trigger has elapsed. The streak resets either way.
//! - **Distracted → focused:** a `RecoveryObserved` measuring the time since
//!   this distraction's trigger, if it had one.
//! - **Tick while focused:** the streak grows by one second and a
//!   `StreakMilestone` fires on every multiple of the praise interval.

use serde::Serialize;

use focusguard_common::clock::NANOS_PER_SEC;
use focusguard_common::config::EngineConfig;
use focusguard_session_model::event::EngineEvent;
use focusguard_session_model::state::{DisciplineState, StateEdge};
use focusguard_session_model::TimestampNs;

/// Mutable bookkeeping for one session. Created at session start and
/// dropped at stop; never shared between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulerState {
    /// Timestamp of the last emitted distraction trigger.
    pub last_trigger_at: Option<TimestampNs>,

    /// Start of the current distraction, if distracted.
    pub last_distraction_start_at: Option<TimestampNs>,

    /// Trigger of the current distraction still waiting for a recovery.
    pub pending_trigger_at: Option<TimestampNs>,

    /// Seconds of uninterrupted focus.
    pub streak_seconds: u64,

    /// Longest streak seen this session.
    pub longest_streak_seconds: u64,

    /// Seconds from trigger to recovery, in observation order.
    pub recovery_samples: Vec<f64>,

    /// Distraction triggers emitted.
    pub trigger_count: u64,

    /// Focused → distracted edges, whether or not they triggered.
    pub distraction_count: u64,
}

impl SchedulerState {
    /// Mean of all recovery samples, recomputed on every call.
    pub fn average_recovery_secs(&self) -> Option<f64> {
        if self.recovery_samples.is_empty() {
            return None;
        }
        let sum: f64 = self.recovery_samples.iter().sum();
        Some(sum / self.recovery_samples.len() as f64)
    }
}

/// Cooldown, streak and recovery rules for one session.
#[derive(Debug, Clone)]
pub struct InterventionScheduler {
    cooldown_ns: u64,
    praise_interval_seconds: u64,
    state: SchedulerState,
}

impl InterventionScheduler {
    /// Build a scheduler from an already validated configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cooldown_ns: config.cooldown_ns(),
            praise_interval_seconds: config.praise_interval_seconds.max(1),
            state: SchedulerState::default(),
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// React to the debounced state moving from `from` to `to`.
    ///
    /// Returns nothing unless the move is an edge. On an edge the first event
    /// is always the `StateChanged` notification.
    pub fn observe(
        &mut self,
        from: DisciplineState,
        to: DisciplineState,
        now: TimestampNs,
    ) -> Vec<EngineEvent> {
        let Some(edge) = from.edge_to(&to) else {
            return Vec::new();
        };

        match edge {
            StateEdge::BecameDistracted(reason) => {
                let mut events = vec![EngineEvent::state_changed(now, from, to, reason)];

                self.state.streak_seconds = 0;
                self.state.distraction_count += 1;
                self.state.last_distraction_start_at = Some(now);

                if self.cooldown_elapsed(now) {
                    self.state.last_trigger_at = Some(now);
                    self.state.pending_trigger_at = Some(now);
                    self.state.trigger_count += 1;
                    tracing::debug!(%reason, t = now, "Distraction trigger");
                    events.push(EngineEvent::distraction_trigger(now, reason));
                } else {
                    tracing::debug!(%reason, t = now, "Distraction inside cooldown, trigger suppressed");
                }
                events
            }
            StateEdge::Recovered(reason) => {
                let mut events = vec![EngineEvent::state_changed(now, from, to, reason)];

                self.state.last_distraction_start_at = None;
                if let Some(triggered_at) = self.state.pending_trigger_at.take() {
                    let seconds = now.saturating_sub(triggered_at) as f64 / NANOS_PER_SEC as f64;
                    self.state.recovery_samples.push(seconds);
                    tracing::debug!(seconds, t = now, "Recovery observed");
                    events.push(EngineEvent::recovery_observed(now, seconds));
                }
                events
            }
        }
    }

    /// Advance the streak by one second if `current` is focused.
    pub fn tick(&mut self, current: DisciplineState, now: TimestampNs) -> Option<EngineEvent> {
        if !current.is_focused() {
            return None;
        }

        self.state.streak_seconds += 1;
        self.state.longest_streak_seconds = self
            .state
            .longest_streak_seconds
            .max(self.state.streak_seconds);

        let streak = self.state.streak_seconds;
        if streak > 0 && streak % self.praise_interval_seconds == 0 {
            tracing::debug!(streak_seconds = streak, "Streak milestone");
            return Some(EngineEvent::streak_milestone(now, streak));
        }
        None
    }

    fn cooldown_elapsed(&self, now: TimestampNs) -> bool {
        match self.state.last_trigger_at {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.cooldown_ns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusguard_session_model::event::EventKind;
    use focusguard_session_model::state::DistractionReason;

    const SEC: u64 = NANOS_PER_SEC;

    fn distracted() -> DisciplineState {
        DisciplineState::Distracted(DistractionReason::LookingAway)
    }

    fn scheduler() -> InterventionScheduler {
        InterventionScheduler::new(&EngineConfig::default())
    }

    #[test]
    fn test_first_distraction_triggers() {
        let mut scheduler = scheduler();
        let events = scheduler.observe(DisciplineState::Focused, distracted(), 2 * SEC);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "state_changed");
        assert_eq!(
            events[1],
            EngineEvent::distraction_trigger(2 * SEC, DistractionReason::LookingAway)
        );
        assert_eq!(scheduler.state().trigger_count, 1);
        assert_eq!(scheduler.state().last_trigger_at, Some(2 * SEC));
    }

    #[test]
    fn test_no_events_without_edge() {
        let mut scheduler = scheduler();
        assert!(scheduler
            .observe(DisciplineState::Focused, DisciplineState::Focused, 0)
            .is_empty());
        assert!(scheduler
            .observe(
                distracted(),
                DisciplineState::Distracted(DistractionReason::EyesClosed),
                0
            )
            .is_empty());
    }

    #[test]
    fn test_cooldown_suppresses_trigger_but_resets_streak() {
        let mut scheduler = scheduler();
        scheduler.observe(DisciplineState::Focused, distracted(), 0);
        scheduler.observe(distracted(), DisciplineState::Focused, SEC);
        for t in 2..7 {
            scheduler.tick(DisciplineState::Focused, t * SEC);
        }
        assert_eq!(scheduler.state().streak_seconds, 5);

        let events = scheduler.observe(DisciplineState::Focused, distracted(), 11 * SEC);
        assert!(events.iter().all(|e| !e.is_trigger()));
        assert_eq!(scheduler.state().streak_seconds, 0);
        assert_eq!(scheduler.state().trigger_count, 1);
        assert_eq!(scheduler.state().distraction_count, 2);
    }

    #[test]
    fn test_trigger_exactly_at_cooldown_boundary() {
        let mut scheduler = scheduler();
        scheduler.observe(DisciplineState::Focused, distracted(), 0);
        scheduler.observe(distracted(), DisciplineState::Focused, SEC);
        let events = scheduler.observe(DisciplineState::Focused, distracted(), 12 * SEC);
        assert!(events.iter().any(EngineEvent::is_trigger));
    }

    #[test]
    fn test_recovery_measures_from_trigger() {
        let mut scheduler = scheduler();
        scheduler.observe(DisciplineState::Focused, distracted(), 3 * SEC);
        let events = scheduler.observe(distracted(), DisciplineState::Focused, 10 * SEC);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].kind,
            EventKind::RecoveryObserved { seconds: 7.0 }
        );
        assert_eq!(scheduler.state().recovery_samples, vec![7.0]);
        assert!(scheduler.state().pending_trigger_at.is_none());
    }

    #[test]
    fn test_suppressed_distraction_records_no_recovery() {
        let mut scheduler = scheduler();
        scheduler.observe(DisciplineState::Focused, distracted(), 0);
        scheduler.observe(distracted(), DisciplineState::Focused, 2 * SEC);
        scheduler.observe(DisciplineState::Focused, distracted(), 4 * SEC);
        let events = scheduler.observe(distracted(), DisciplineState::Focused, 6 * SEC);
        assert_eq!(events.len(), 1);
        assert_eq!(scheduler.state().recovery_samples.len(), 1);
    }

    #[test]
    fn test_milestone_every_interval() {
        let mut scheduler = scheduler();
        let milestones: Vec<EngineEvent> = (1..=90)
            .filter_map(|t| scheduler.tick(DisciplineState::Focused, t * SEC))
            .collect();
        assert_eq!(milestones.len(), 3);
        assert_eq!(milestones[0], EngineEvent::streak_milestone(30 * SEC, 30));
        assert_eq!(milestones[2], EngineEvent::streak_milestone(90 * SEC, 90));
    }

    #[test]
    fn test_ticks_while_distracted_do_nothing() {
        let mut scheduler = scheduler();
        for t in 1..=40 {
            assert!(scheduler.tick(distracted(), t * SEC).is_none());
        }
        assert_eq!(scheduler.state().streak_seconds, 0);
    }

    #[test]
    fn test_longest_streak_survives_reset() {
        let mut scheduler = scheduler();
        for t in 1..=10 {
            scheduler.tick(DisciplineState::Focused, t * SEC);
        }
        scheduler.observe(DisciplineState::Focused, distracted(), 11 * SEC);
        assert_eq!(scheduler.state().streak_seconds, 0);
        assert_eq!(scheduler.state().longest_streak_seconds, 10);
    }

    #[test]
    fn test_average_recovery() {
        let state = SchedulerState {
            recovery_samples: vec![2.0, 4.0, 9.0],
            ..Default::default()
        };
        assert_eq!(state.average_recovery_secs(), Some(5.0));
        assert_eq!(SchedulerState::default().average_recovery_secs(), None);
    }
}
