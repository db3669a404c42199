//! Human-readable rendering of history entries for the CLI.

use chrono::{DateTime, Utc};

use crate::types::history::HistoryEntry;
use crate::services::title_resolver::UNKNOWN_TITLE;

pub const UNKNOWN_DATE: &str = "Unknown date";

/// Compact watch time: `42s` under a minute, `5m` under an hour, else `1h 3m`.
///
/// Each unit is rounded half-up, so 59.6 seconds shows as `60s`.
pub fn format_watch_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    if seconds < 60.0 {
        format!("{}s", seconds.round() as u64)
    } else if seconds < 3600.0 {
        format!("{}m", (seconds / 60.0).round() as u64)
    } else {
        let hours = (seconds / 3600.0).floor() as u64;
        let minutes = ((seconds % 3600.0) / 60.0).round() as u64;
        format!("{}h {}m", hours, minutes)
    }
}

/// `Oct 18, 2026, 09:05` (UTC), or `Unknown date` when absent.
pub fn format_visit_date(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.format("%b %-d, %Y, %H:%M").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Default file name for an export taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("youtube-history-{}.csv", now.format("%Y-%m-%d"))
}

/// Three-line listing block for one entry.
pub fn describe_entry(entry: &HistoryEntry) -> String {
    let title = if entry.title.is_empty() {
        UNKNOWN_TITLE
    } else {
        entry.title.as_str()
    };
    format!(
        "{}\n  Watched for {}\n  First: {}\n  Last: {}",
        title,
        format_watch_time(entry.video_time),
        format_visit_date(entry.first_visited.as_ref()),
        format_visit_date(entry.last_visited.as_ref()),
    )
}
