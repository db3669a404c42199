//! CSV export of the watch history.

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::warn;

use crate::services::title_resolver::UNKNOWN_TITLE;
use crate::types::history::{format_timestamp, sanitize_seconds, HistoryEntry};

pub const CSV_HEADERS: [&str; 5] = [
    "Title",
    "URL",
    "Watch Time (seconds)",
    "First Visited",
    "Last Visited",
];

pub const UNKNOWN_URL: &str = "Unknown URL";

/// Renders entries as CSV: a bare header row, then one fully quoted row per
/// entry in the given order. Missing fields are filled from defaults, with
/// `now` standing in for absent timestamps. Rows are `\n`-separated with no
/// trailing newline.
pub fn entries_to_csv(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    let header = CSV_HEADERS.join(",");
    if entries.is_empty() {
        return header;
    }
    match render_rows(entries, now) {
        Ok(rows) => format!("{}\n{}", header, rows.trim_end_matches('\n')),
        Err(e) => {
            warn!(error = %e, "Could not render history rows");
            header
        }
    }
}

fn render_rows(
    entries: &[HistoryEntry],
    now: DateTime<Utc>,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let fallback = format_timestamp(&now);
    for entry in entries {
        let seconds = format!("{:.1}", sanitize_seconds(entry.video_time));
        let first = entry
            .first_visited
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| fallback.clone());
        let last = entry
            .last_visited
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| fallback.clone());
        let row: [&str; 5] = [
            non_empty_or(&entry.title, UNKNOWN_TITLE),
            non_empty_or(&entry.url, UNKNOWN_URL),
            &seconds,
            &first,
            &last,
        ];
        writer.write_record(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    Ok(String::from_utf8(bytes)?)
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}
