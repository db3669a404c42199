//! Integration tests for the history store: upsert semantics, capacity,
//! lazy loading, and behavior when storage misbehaves.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use watchtime::database::{MemoryStore, SqliteStore};
use watchtime::managers::history_store::{HistoryStore, HistoryStoreTrait};
use watchtime::types::history::STORAGE_KEY;
use watchtime::types::settings::HistorySettings;

fn url(n: usize) -> String {
    format!("https://www.youtube.com/watch?v={}", n)
}

fn memory_history() -> (Arc<MemoryStore>, HistoryStore) {
    let backing = Arc::new(MemoryStore::new());
    let history = HistoryStore::with_defaults(backing.clone());
    (backing, history)
}

#[tokio::test]
async fn test_upsert_overwrites_time_and_keeps_first_visit() {
    let (_backing, mut history) = memory_history();
    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();

    history.upsert_at(&url(1), "Old", 30.0, t1).await;
    history.upsert_at(&url(1), "New", 12.0, t2).await;

    let entries = history.list().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "New");
    assert_eq!(entries[0].video_time, 12.0);
    assert_eq!(entries[0].first_visited, Some(t1));
    assert_eq!(entries[0].last_visited, Some(t2));
}

#[tokio::test]
async fn test_new_urls_go_to_front_and_updates_stay_in_place() {
    let (_backing, mut history) = memory_history();
    history.upsert(&url(1), "one", 1.0).await;
    history.upsert(&url(2), "two", 2.0).await;
    history.upsert(&url(1), "one again", 5.0).await;

    let urls: Vec<String> = history.list().await.into_iter().map(|e| e.url).collect();
    assert_eq!(urls, vec![url(2), url(1)]);
}

#[tokio::test]
async fn test_capacity_evicts_oldest_created() {
    let (_backing, mut history) = memory_history();
    for n in 0..=100 {
        history.upsert(&url(n), "t", 1.0).await;
    }
    let entries = history.list().await;
    assert_eq!(entries.len(), 100);
    assert_eq!(entries[0].url, url(100));
    assert!(entries.iter().all(|e| e.url != url(0)));
}

#[tokio::test]
async fn test_capacity_follows_settings() {
    let backing = Arc::new(MemoryStore::new());
    let settings = HistorySettings {
        max_entries: 2,
        storage_key: "custom".to_string(),
    };
    let mut history = HistoryStore::new(backing.clone(), &settings);
    for n in 0..3 {
        history.upsert(&url(n), "t", 1.0).await;
    }
    assert_eq!(history.list().await.len(), 2);
    assert!(backing.snapshot("custom").is_some());
    assert!(backing.snapshot(STORAGE_KEY).is_none());
}

#[tokio::test]
async fn test_history_is_persisted_under_storage_key() {
    let (backing, mut history) = memory_history();
    history.upsert(&url(1), "A", 3.5).await;
    let stored = backing.snapshot(STORAGE_KEY).unwrap();
    assert_eq!(stored[0]["url"], url(1));
    assert_eq!(stored[0]["videoTime"], 3.5);
}

#[tokio::test]
async fn test_existing_history_is_loaded_lazily() {
    let backing = Arc::new(MemoryStore::with_value(
        STORAGE_KEY,
        json!([
            {"url": url(1), "title": "A", "videoTime": 7, "firstVisited": "2024-01-01T00:00:00.000Z", "lastVisited": "2024-01-02T00:00:00.000Z"},
            "garbage"
        ]),
    ));
    let mut history = HistoryStore::with_defaults(backing);
    assert!(!history.is_loaded());
    let entries = history.list().await;
    assert!(history.is_loaded());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].video_time, 7.0);
}

#[tokio::test]
async fn test_non_array_value_is_malformed() {
    let backing = Arc::new(MemoryStore::with_value(STORAGE_KEY, json!({"oops": true})));
    let mut history = HistoryStore::with_defaults(backing);
    assert!(history.load().await.is_err());
    assert!(!history.is_loaded());
}

#[tokio::test]
async fn test_failed_load_is_retried_on_next_access() {
    let backing = Arc::new(MemoryStore::with_value(
        STORAGE_KEY,
        json!([{"url": url(1), "title": "A", "videoTime": 4}]),
    ));
    backing.set_fail_reads(true);
    let mut history = HistoryStore::with_defaults(backing.clone());

    assert!(history.list().await.is_empty());
    assert!(!history.is_loaded());

    backing.set_fail_reads(false);
    assert_eq!(history.list().await.len(), 1);
}

#[tokio::test]
async fn test_upsert_during_failed_load_keeps_stored_history() {
    let seeded = json!([
        {"url": url(1), "title": "A", "videoTime": 1},
        {"url": url(2), "title": "B", "videoTime": 2},
        {"url": url(3), "title": "C", "videoTime": 3}
    ]);
    let backing = Arc::new(MemoryStore::with_value(STORAGE_KEY, seeded.clone()));
    backing.set_fail_reads(true);
    let mut history = HistoryStore::with_defaults(backing.clone());

    history.upsert(&url(9), "New", 5.0).await;
    assert_eq!(backing.snapshot(STORAGE_KEY), Some(seeded));
    assert!(history.entries().is_empty());

    backing.set_fail_reads(false);
    history.upsert(&url(9), "New", 5.0).await;
    let urls: Vec<String> = history.list().await.into_iter().map(|e| e.url).collect();
    assert_eq!(urls, vec![url(9), url(1), url(2), url(3)]);
}

#[tokio::test]
async fn test_entry_with_null_title_survives_and_exports_default() {
    let backing = Arc::new(MemoryStore::with_value(
        STORAGE_KEY,
        json!([
            {"url": "a", "title": null, "videoTime": 1, "firstVisited": "2024-01-01T00:00:00.000Z", "lastVisited": "2024-01-01T00:00:00.000Z"},
            {"url": "b", "title": "B", "videoTime": 2, "firstVisited": "2024-01-01T00:00:00.000Z", "lastVisited": "2024-01-01T00:00:00.000Z"}
        ]),
    ));
    let mut history = HistoryStore::with_defaults(backing.clone());

    let csv = history.export_csv().await;
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("\"Unknown Title\",\"a\",\"1.0\""));

    history.upsert("b", "B", 4.0).await;
    let stored = backing.snapshot(STORAGE_KEY).unwrap();
    assert_eq!(stored.as_array().map(Vec::len), Some(2));
    assert_eq!(stored[0]["url"], "a");
}

#[tokio::test]
async fn test_failed_save_keeps_in_memory_update() {
    let (backing, mut history) = memory_history();
    backing.set_fail_writes(true);
    history.upsert(&url(1), "A", 9.0).await;
    assert_eq!(history.list().await.len(), 1);
    assert!(backing.snapshot(STORAGE_KEY).is_none());
}

#[tokio::test]
async fn test_clear_empties_storage() {
    let (backing, mut history) = memory_history();
    history.upsert(&url(1), "A", 1.0).await;
    history.clear().await;
    assert!(history.list().await.is_empty());
    assert_eq!(backing.snapshot(STORAGE_KEY), Some(json!([])));
}

#[tokio::test]
async fn test_export_empty_history_is_header_only() {
    let (_backing, mut history) = memory_history();
    assert_eq!(
        history.export_csv().await,
        "Title,URL,Watch Time (seconds),First Visited,Last Visited"
    );
}

#[tokio::test]
async fn test_export_quotes_and_orders_rows() {
    let (_backing, mut history) = memory_history();
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    history.upsert_at(&url(1), "Plain", 1.0, t).await;
    history.upsert_at(&url(2), "Say \"hi\", ok", 2.5, t).await;

    let csv = history.export_csv().await;
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        format!(
            "\"Say \"\"hi\"\", ok\",\"{}\",\"2.5\",\"2024-05-01T12:30:00.000Z\",\"2024-05-01T12:30:00.000Z\"",
            url(2)
        )
    );
    assert!(lines[2].starts_with("\"Plain\""));
}

#[tokio::test]
async fn test_sqlite_backed_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("watchtime.db");
    {
        let mut history = HistoryStore::with_defaults(Arc::new(SqliteStore::open(&path).unwrap()));
        history.upsert(&url(1), "A", 42.0).await;
    }
    let mut history = HistoryStore::with_defaults(Arc::new(SqliteStore::open(&path).unwrap()));
    let entries = history.list().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "A");
}
