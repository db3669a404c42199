//! Property-based tests for settings persistence.
//!
//! Any settings document written by the engine must load back identically.

use proptest::prelude::*;
use watchtime::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use watchtime::types::settings::{HistorySettings, TrackerSettings, TrackingSettings};

fn arb_tracking() -> impl Strategy<Value = TrackingSettings> {
    (
        "[a-z]{3,10}\\.com/[a-z]{1,8}",
        prop::collection::vec("[a-z0-9.#-]{1,20}", 0..4),
        (1u64..10_000, 1u64..60_000, 0u64..10_000),
        (0u64..5_000, 0u64..5_000, 0u64..5_000),
        proptest::option::of(1u32..600),
    )
        .prop_map(|(pattern, selectors, (tick, report, settle), (url, element, progress), cap)| {
            TrackingSettings {
                watch_url_pattern: pattern,
                title_selectors: selectors,
                tick_interval_ms: tick,
                report_interval_ms: report,
                settle_delay_ms: settle,
                url_check_throttle_ms: url,
                element_check_throttle_ms: element,
                progress_throttle_ms: progress,
                max_step_credit_secs: cap.map(f64::from),
            }
        })
}

fn arb_history() -> impl Strategy<Value = HistorySettings> {
    (1usize..1000, "[a-zA-Z]{1,16}").prop_map(|(max_entries, storage_key)| HistorySettings {
        max_entries,
        storage_key,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn settings_survive_save_and_load(tracking in arb_tracking(), history in arb_history()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();
        let expected = TrackerSettings { tracking, history };

        std::fs::write(&path, serde_json::to_string_pretty(&expected).unwrap()).unwrap();
        let mut engine = SettingsEngine::new(Some(path.clone()));
        prop_assert_eq!(&engine.load().unwrap(), &expected);

        engine.save().unwrap();
        let mut reloaded = SettingsEngine::new(Some(path));
        prop_assert_eq!(reloaded.load().unwrap(), expected);
    }
}
