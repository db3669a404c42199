//! History Store for Watchtime.
//!
//! Implements `HistoryStoreTrait`: upserting watch-time reports by URL,
//! listing, clearing and exporting the history, persisted as one JSON array
//! through a [`KeyValueStore`].
//!
//! The collection is loaded lazily on first access and cached. Persistence
//! failures are logged and swallowed; callers always get an answer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::database::KeyValueStore;
use crate::services::csv_export::entries_to_csv;
use crate::types::errors::HistoryError;
use crate::types::history::{sanitize_seconds, HistoryEntry, MAX_HISTORY_ENTRIES, STORAGE_KEY};
use crate::types::settings::HistorySettings;

/// Trait defining history store operations.
#[async_trait]
pub trait HistoryStoreTrait: Send {
    async fn upsert(&mut self, url: &str, title: &str, video_time: f64);
    async fn list(&mut self) -> Vec<HistoryEntry>;
    async fn clear(&mut self);
    async fn export_csv(&mut self) -> String;
}

/// Bounded, URL-keyed watch history.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    capacity: usize,
    entries: Vec<HistoryEntry>,
    loaded: bool,
}

impl HistoryStore {
    /// Creates a store with the given collection settings. Nothing is read yet.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &HistorySettings) -> Self {
        Self {
            store,
            storage_key: settings.storage_key.clone(),
            capacity: settings.max_entries.max(1),
            entries: Vec::new(),
            loaded: false,
        }
    }

    /// Creates a store with the default key and capacity.
    pub fn with_defaults(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            storage_key: STORAGE_KEY.to_string(),
            capacity: MAX_HISTORY_ENTRIES,
            entries: Vec::new(),
            loaded: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reads the persisted collection, replacing the cached one.
    ///
    /// An absent key is an empty history. A value that is not an array is
    /// reported as malformed and leaves the cache untouched.
    pub async fn load(&mut self) -> Result<(), HistoryError> {
        let raw = self
            .store
            .get(&self.storage_key)
            .await
            .map_err(HistoryError::LoadFailed)?;
        let entries = match raw {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable history entry");
                        None
                    }
                })
                .collect(),
            Some(other) => {
                return Err(HistoryError::Malformed(format!(
                    "expected an array, found {}",
                    json_kind(&other)
                )))
            }
        };
        self.entries = entries;
        self.loaded = true;
        info!(count = self.entries.len(), "Loaded history entries");
        Ok(())
    }

    /// Writes the whole collection back.
    pub async fn save(&self) -> Result<(), HistoryError> {
        let value = serde_json::to_value(&self.entries)
            .map_err(|e| HistoryError::SaveFailed(e.into()))?;
        self.store
            .set(&self.storage_key, value)
            .await
            .map_err(HistoryError::SaveFailed)?;
        debug!(count = self.entries.len(), "Saved history entries");
        Ok(())
    }

    /// Upserts with an explicit timestamp.
    ///
    /// Skipped when the stored collection cannot be read: writing the cached
    /// view back would overwrite entries that were never loaded.
    pub async fn upsert_at(&mut self, url: &str, title: &str, video_time: f64, now: DateTime<Utc>) {
        if !self.ensure_loaded().await {
            warn!(url, "Dropping history update, stored history is unavailable");
            return;
        }
        self.apply_upsert(url, title, video_time, now);
        self.persist().await;
    }

    /// In-memory half of an upsert: update in place, or insert at the front
    /// and trim the tail back to capacity.
    pub fn apply_upsert(&mut self, url: &str, title: &str, video_time: f64, now: DateTime<Utc>) {
        let video_time = sanitize_seconds(video_time);
        match self.entries.iter_mut().find(|e| e.url == url) {
            Some(existing) => {
                debug!(url, video_time, "Updating history entry");
                existing.video_time = video_time;
                existing.title = title.to_string();
                existing.last_visited = Some(now);
            }
            None => {
                debug!(url, video_time, "Adding history entry");
                self.entries
                    .insert(0, HistoryEntry::new(url, title, video_time, now));
                self.entries.truncate(self.capacity);
            }
        }
    }

    /// Cached entries without touching storage.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Returns whether the collection is loaded after the attempt.
    async fn ensure_loaded(&mut self) -> bool {
        if self.loaded {
            return true;
        }
        match self.load().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Could not load history, continuing with the cached view");
                false
            }
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.save().await {
            warn!(error = %e, "Could not save history");
        }
    }
}

#[async_trait]
impl HistoryStoreTrait for HistoryStore {
    /// Records the latest watch time for `url`. The stored time is replaced, not summed.
    async fn upsert(&mut self, url: &str, title: &str, video_time: f64) {
        self.upsert_at(url, title, video_time, Utc::now()).await;
    }

    /// Returns a snapshot of the history, newest-created first.
    async fn list(&mut self) -> Vec<HistoryEntry> {
        self.ensure_loaded().await;
        self.entries.clone()
    }

    async fn clear(&mut self) {
        self.ensure_loaded().await;
        info!(count = self.entries.len(), "Clearing history");
        self.entries.clear();
        self.persist().await;
    }

    /// Renders the history as CSV. Always returns at least the header row.
    async fn export_csv(&mut self) -> String {
        self.ensure_loaded().await;
        entries_to_csv(&self.entries, Utc::now())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
