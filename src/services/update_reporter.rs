//! Update Reporter for Watchtime.
//!
//! Rate-limits how often a session's accumulated time is sent to the history
//! host. Throttled calls inside the window are dropped, not queued; the next
//! qualifying call carries the fresher value anyway.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::services::transport::MessageTransport;
use crate::types::messages::TrackerMessage;
use crate::types::session::TrackingSession;

/// Result of a single `report` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Inside the throttle window; nothing was sent.
    Skipped,
    Delivered,
    /// Sent, but the transport failed. Not retried.
    Failed,
}

/// Throttled dispatcher of `updateVideoTime` messages.
#[derive(Clone)]
pub struct UpdateReporter {
    threshold: Duration,
    transport: Arc<dyn MessageTransport>,
}

impl UpdateReporter {
    pub fn new(transport: Arc<dyn MessageTransport>, threshold: Duration) -> Self {
        Self {
            threshold,
            transport,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// A session that never reported always may; otherwise the window must have passed.
    pub fn should_dispatch(&self, last_report: Option<Instant>, now: Instant, force: bool) -> bool {
        force
            || last_report
                .map(|last| now.saturating_duration_since(last) > self.threshold)
                .unwrap_or(true)
    }

    /// Sends the session's current total if forced or due.
    ///
    /// `last_report` is stamped before the send, so a slow or failing
    /// transport still counts against the throttle window.
    pub async fn report(
        &self,
        session: &mut TrackingSession,
        title: &str,
        force: bool,
        now: Instant,
    ) -> ReportOutcome {
        if !self.should_dispatch(session.last_report, now, force) {
            return ReportOutcome::Skipped;
        }
        session.last_report = Some(now);

        let video_time = session.accumulated_seconds();
        debug!(
            session = %session.id,
            url = %session.url,
            video_time = %format!("{:.1}", video_time),
            force,
            "Sending tracked time"
        );
        let message = TrackerMessage::UpdateVideoTime {
            url: session.url.clone(),
            title: title.to_string(),
            video_time,
        };
        match self.transport.send(message).await {
            Ok(_) => ReportOutcome::Delivered,
            Err(e) => {
                warn!(session = %session.id, error = %e, "Error sending video time update");
                ReportOutcome::Failed
            }
        }
    }
}
