use std::time::Instant;

use uuid::Uuid;

use super::playback::ElementId;
use crate::services::time_accumulator::TimeAccumulator;

/// Per-binding tracking state. Lives only as long as the element binding.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub id: Uuid,
    /// URL captured at acquisition; reports always carry this, not the live location.
    pub url: String,
    pub element: ElementId,
    pub accumulator: TimeAccumulator,
    pub last_report: Option<Instant>,
    /// Last title resolved while the page still showed this session's URL.
    pub title: Option<String>,
}

impl TrackingSession {
    pub fn new(url: &str, element: ElementId, accumulator: TimeAccumulator) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.to_string(),
            element,
            accumulator,
            last_report: None,
            title: None,
        }
    }

    pub fn accumulated_seconds(&self) -> f64 {
        self.accumulator.accumulated_seconds()
    }

    pub fn is_playing(&self) -> bool {
        self.accumulator.is_playing()
    }
}
