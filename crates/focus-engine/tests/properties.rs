use focusguard_common::config::EngineConfig;
use focusguard_engine::{extract, FocusClassifier, FocusSample, FocusSession, SmoothingBuffer, VecSink};
use focusguard_session_model::input::SessionInput;
use focusguard_session_model::state::{DisciplineState, DistractionReason};
use focusguard_session_model::synthetic::SyntheticFace;
use proptest::prelude::*;

const SEC: u64 = 1_000_000_000;

fn sample(not_focused: bool) -> FocusSample {
    if not_focused {
        FocusSample::NotFocused(DistractionReason::LookingAway)
    } else {
        FocusSample::Focused
    }
}

proptest! {
    #[test]
    fn buffer_never_exceeds_capacity(
        capacity in 1usize..32,
        samples in prop::collection::vec(any::<bool>(), 0..200)
    ) {
        let mut buffer = SmoothingBuffer::new(capacity);
        for not_focused in samples {
            buffer.push(sample(not_focused));
            prop_assert!(buffer.len() <= capacity);
            let fraction = buffer.fraction_not_focused();
            prop_assert!((0.0..=1.0).contains(&fraction));
        }
    }

    #[test]
    fn four_of_eight_in_any_order_is_distracted(
        order in Just(vec![true, true, true, true, false, false, false, false]).prop_shuffle()
    ) {
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        let mut state = DisciplineState::Focused;
        for not_focused in order {
            state = classifier.smooth(sample(not_focused));
        }
        prop_assert!(state.is_distracted());
    }

    #[test]
    fn three_of_eight_in_any_order_is_focused(
        order in Just(vec![true, true, true, false, false, false, false, false]).prop_shuffle()
    ) {
        let mut classifier = FocusClassifier::new(&EngineConfig::default());
        for not_focused in order {
            classifier.smooth(sample(not_focused));
        }
        prop_assert_eq!(classifier.state(), DisciplineState::Focused);
    }

    #[test]
    fn triggers_respect_cooldown(
        steps in prop::collection::vec((any::<bool>(), 1u64..3_000), 1..300)
    ) {
        let mut session = FocusSession::start(EngineConfig::default()).unwrap();
        let mut sink = VecSink::new();
        let attentive = SyntheticFace::attentive().build();

        let mut t = 0u64;
        for (away, gap_ms) in steps {
            t += gap_ms * 1_000_000;
            let input = if away {
                SessionInput::no_face(t)
            } else {
                SessionInput::frame(t, attentive.clone())
            };
            session.process(&input, &mut sink);
        }

        let times: Vec<u64> = sink.named("distraction_trigger").map(|e| e.timestamp_ns).collect();
        for pair in times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= 12 * SEC);
        }
        prop_assert_eq!(times.len() as u64, session.scheduler_state().trigger_count);
    }

    #[test]
    fn one_milestone_per_thirty_focused_ticks(ticks in 0u64..200) {
        let mut session = FocusSession::start(EngineConfig::default()).unwrap();
        let mut sink = VecSink::new();
        for t in 1..=ticks {
            session.process(&SessionInput::tick(t * SEC), &mut sink);
        }
        prop_assert_eq!(sink.named("streak_milestone").count() as u64, ticks / 30);
    }

    #[test]
    fn extracted_metrics_are_always_finite(
        aperture in -0.1f64..0.1,
        yaw in -1.0f64..2.0,
        iris in prop::option::of(-0.5f64..1.5),
        span in 0.0f64..0.8
    ) {
        let frame = SyntheticFace::attentive()
            .with_aperture(aperture)
            .with_yaw(yaw)
            .with_iris(iris)
            .with_cheek_span(span)
            .build();
        if let Ok(metrics) = extract(&frame) {
            prop_assert!(metrics.eye_aperture.is_finite());
            prop_assert!(metrics.head_yaw.is_finite());
            prop_assert!(metrics.iris_offset.map_or(true, f64::is_finite));
        }
    }
}
