use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum number of videos kept in the watch history.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Key under which the history collection is persisted.
pub const STORAGE_KEY: &str = "youtubeHistory";

/// A single watched video, keyed by URL.
///
/// Decoding is lenient so that a partially corrupted collection still loads:
/// missing or non-string text fields become empty, a missing or unreadable `videoTime` becomes
/// `0.0`, and unparseable timestamps become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub video_time: f64,
    #[serde(
        default,
        serialize_with = "serialize_timestamp",
        deserialize_with = "lenient_timestamp"
    )]
    pub first_visited: Option<DateTime<Utc>>,
    #[serde(
        default,
        serialize_with = "serialize_timestamp",
        deserialize_with = "lenient_timestamp"
    )]
    pub last_visited: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Creates a fresh entry first seen at `now`.
    pub fn new(url: &str, title: &str, video_time: f64, now: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            video_time: sanitize_seconds(video_time),
            first_visited: Some(now),
            last_visited: Some(now),
        }
    }
}

/// Clamps a reported watch time to a finite, non-negative value.
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Formats a timestamp the way the history is stored and exported,
/// e.g. `2024-05-01T12:30:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ts {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_none(),
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc)))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_f64().map(sanitize_seconds).unwrap_or(0.0))
}
