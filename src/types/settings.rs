use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::history::{MAX_HISTORY_ENTRIES, STORAGE_KEY};

/// Top-level tracker settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrackerSettings {
    #[serde(default)]
    pub tracking: TrackingSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

/// Timing and page-matching knobs for the page-side tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackingSettings {
    /// Substring a URL must contain to count as a watch page.
    pub watch_url_pattern: String,
    /// Selectors tried, in order, before falling back to the document title.
    pub title_selectors: Vec<String>,
    pub tick_interval_ms: u64,
    pub report_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub url_check_throttle_ms: u64,
    pub element_check_throttle_ms: u64,
    pub progress_throttle_ms: u64,
    /// Largest single accrual step in seconds; `None` disables the cap.
    pub max_step_credit_secs: Option<f64>,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            watch_url_pattern: "youtube.com/watch".to_string(),
            title_selectors: Self::default_title_selectors(),
            tick_interval_ms: 1000,
            report_interval_ms: 5000,
            settle_delay_ms: 1000,
            url_check_throttle_ms: 500,
            element_check_throttle_ms: 1000,
            progress_throttle_ms: 1000,
            max_step_credit_secs: Some(60.0),
        }
    }
}

impl TrackingSettings {
    /// Returns the default title selectors for the watch page layouts.
    pub fn default_title_selectors() -> Vec<String> {
        vec![
            "h1.title.style-scope.ytd-video-primary-info-renderer".to_string(),
            "h1.style-scope.ytd-watch-metadata".to_string(),
        ]
    }

    /// An empty pattern matches no page, which turns tracking off.
    pub fn has_watch_pattern(&self) -> bool {
        !self.watch_url_pattern.is_empty()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn url_check_throttle(&self) -> Duration {
        Duration::from_millis(self.url_check_throttle_ms)
    }

    pub fn element_check_throttle(&self) -> Duration {
        Duration::from_millis(self.element_check_throttle_ms)
    }

    pub fn progress_throttle(&self) -> Duration {
        Duration::from_millis(self.progress_throttle_ms)
    }

    pub fn max_step_credit(&self) -> Option<Duration> {
        self.max_step_credit_secs
            .filter(|secs| *secs > 0.0)
            .map(|secs| Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }
}

/// History collection settings for the host side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    pub max_entries: usize,
    pub storage_key: String,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: MAX_HISTORY_ENTRIES,
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}
