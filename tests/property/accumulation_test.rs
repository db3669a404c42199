//! Property-based tests for the time accumulator.
//!
//! Without a cap, credited time equals the play intervals closed by a tick,
//! pause or teardown; intervals ended by a seek or a repeated play are
//! dropped. Credited time never decreases and each single step respects the
//! configured cap.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use watchtime::services::time_accumulator::TimeAccumulator;
use watchtime::types::playback::PlaybackEvent;

#[derive(Debug, Clone, Copy)]
enum Step {
    Event(PlaybackEvent),
    Hidden,
    Visible,
}

fn arb_step() -> impl Strategy<Value = (Step, u64)> {
    (
        prop_oneof![
            Just(Step::Event(PlaybackEvent::Play)),
            Just(Step::Event(PlaybackEvent::Pause)),
            Just(Step::Event(PlaybackEvent::Seek)),
            Just(Step::Event(PlaybackEvent::Tick)),
            Just(Step::Event(PlaybackEvent::Tick)),
            Just(Step::Hidden),
            Just(Step::Visible),
        ],
        0u64..120_000,
    )
}

fn apply(acc: &mut TimeAccumulator, step: Step, now: Instant) {
    match step {
        Step::Event(event) => {
            acc.apply(event, now);
        }
        Step::Hidden => {
            acc.on_visibility_hidden(now);
        }
        Step::Visible => {
            acc.on_visibility_visible(now);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn credited_time_is_bounded_by_playing_time(
        start_playing in any::<bool>(),
        steps in prop::collection::vec(arb_step(), 0..80),
    ) {
        let t0 = Instant::now();
        let mut now = t0;
        let mut acc = TimeAccumulator::new(t0, start_playing, None);
        let mut playing_wall = Duration::ZERO;
        let mut previous = 0.0;

        for (step, gap_ms) in steps {
            let next = now + Duration::from_millis(gap_ms);
            if acc.is_playing() {
                playing_wall += next - now;
            }
            now = next;
            apply(&mut acc, step, now);
            prop_assert!(acc.accumulated_seconds() >= previous);
            previous = acc.accumulated_seconds();
        }
        acc.on_teardown(now);
        prop_assert!(acc.accumulated_seconds() <= playing_wall.as_secs_f64() + 1e-9);
        prop_assert!(!acc.is_playing());
    }

    #[test]
    fn uncapped_credit_equals_play_intervals(
        start_playing in any::<bool>(),
        steps in prop::collection::vec(
            (
                prop_oneof![
                    Just(PlaybackEvent::Play),
                    Just(PlaybackEvent::Pause),
                    Just(PlaybackEvent::Seek),
                    Just(PlaybackEvent::Tick),
                ],
                0u64..120_000,
            ),
            0..80,
        ),
        final_gap_ms in 0u64..120_000,
    ) {
        let t0 = Instant::now();
        let mut now = t0;
        let mut acc = TimeAccumulator::new(t0, start_playing, None);
        let mut playing = start_playing;
        let mut expected_ms: u64 = 0;

        for (event, gap_ms) in steps {
            now += Duration::from_millis(gap_ms);
            if playing && matches!(event, PlaybackEvent::Tick | PlaybackEvent::Pause) {
                expected_ms += gap_ms;
            }
            match event {
                PlaybackEvent::Play => playing = true,
                PlaybackEvent::Pause => playing = false,
                PlaybackEvent::Seek | PlaybackEvent::Tick => {}
            }
            acc.apply(event, now);
        }
        now += Duration::from_millis(final_gap_ms);
        if playing {
            expected_ms += final_gap_ms;
        }
        acc.on_teardown(now);

        let expected = expected_ms as f64 / 1000.0;
        prop_assert!((acc.accumulated_seconds() - expected).abs() < 1e-9);
    }

    #[test]
    fn single_steps_respect_the_cap(gap_secs in 0u64..10_000, cap_secs in 1u64..120) {
        let t0 = Instant::now();
        let cap = Duration::from_secs(cap_secs);
        let mut acc = TimeAccumulator::new(t0, true, Some(cap));
        acc.on_tick(t0 + Duration::from_secs(gap_secs));
        prop_assert!(acc.accumulated_seconds() <= cap.as_secs_f64() + 1e-9);
        prop_assert_eq!(
            acc.accumulated_seconds(),
            Duration::from_secs(gap_secs.min(cap_secs)).as_secs_f64()
        );
    }

    #[test]
    fn paused_accumulator_never_credits(gaps in prop::collection::vec(0u64..60_000, 1..30)) {
        let t0 = Instant::now();
        let mut now = t0;
        let mut acc = TimeAccumulator::new(t0, false, None);
        for gap in gaps {
            now += Duration::from_millis(gap);
            acc.on_tick(now);
            acc.on_visibility_hidden(now);
        }
        prop_assert_eq!(acc.accumulated_seconds(), 0.0);
    }
}
