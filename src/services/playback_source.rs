//! Playback event source for Watchtime.
//!
//! Binds to a single player element and normalizes its raw media
//! notifications. Events from any other element are dropped, and the noisy
//! `timeupdate` stream is thinned to at most one tick per throttle window.

use std::time::{Duration, Instant};

use crate::types::playback::{ElementId, MediaEventKind, PlaybackEvent};

/// Normalizing binding to one player element.
#[derive(Debug, Clone)]
pub struct PlaybackEventSource {
    element: ElementId,
    progress_throttle: Duration,
    last_progress: Option<Instant>,
}

impl PlaybackEventSource {
    pub fn bind(element: ElementId, progress_throttle: Duration) -> Self {
        Self {
            element,
            progress_throttle,
            last_progress: None,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Maps a raw notification to a playback event, or `None` if it must be ignored.
    pub fn normalize(
        &mut self,
        element: ElementId,
        kind: MediaEventKind,
        now: Instant,
    ) -> Option<PlaybackEvent> {
        if element != self.element {
            return None;
        }
        match kind {
            MediaEventKind::Play => Some(PlaybackEvent::Play),
            MediaEventKind::Pause => Some(PlaybackEvent::Pause),
            MediaEventKind::Seeking => Some(PlaybackEvent::Seek),
            MediaEventKind::TimeUpdate => {
                if let Some(last) = self.last_progress {
                    if now.saturating_duration_since(last) < self.progress_throttle {
                        return None;
                    }
                }
                self.last_progress = Some(now);
                Some(PlaybackEvent::Tick)
            }
        }
    }
}
