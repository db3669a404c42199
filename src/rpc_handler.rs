//! Message handler for the Watchtime history host.
//!
//! `handle_message` decodes a raw `{"type": …}` message and dispatches it to
//! the history store. It never fails: every outcome, including unknown types,
//! is expressed as a JSON response.

use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::managers::history_store::HistoryStoreTrait;
use crate::types::errors::MessageError;
use crate::types::messages::TrackerMessage;

/// Decode and dispatch a raw message against a shared history store.
pub async fn handle_message<H>(history: &Mutex<H>, raw: &Value) -> Value
where
    H: HistoryStoreTrait,
{
    let message = match TrackerMessage::from_value(raw) {
        Ok(message) => message,
        Err(MessageError::UnknownType) => {
            warn!(kind = ?raw.get("type"), "Unknown message type");
            return json!({"error": MessageError::UnknownType.to_string()});
        }
        Err(e) => {
            warn!(error = %e, "Rejected message");
            return json!({"error": e.to_string()});
        }
    };
    let mut store = history.lock().await;
    dispatch(&mut *store, message).await
}

/// Run an already-decoded message.
pub async fn dispatch<H>(store: &mut H, message: TrackerMessage) -> Value
where
    H: HistoryStoreTrait + ?Sized,
{
    debug!(kind = message.kind(), "Received message");
    match message {
        TrackerMessage::UpdateVideoTime {
            url,
            title,
            video_time,
        } => {
            store.upsert(&url, &title, video_time).await;
            json!({"success": true})
        }
        TrackerMessage::GetHistory => json!(store.list().await),
        TrackerMessage::ClearHistory => {
            store.clear().await;
            json!({"success": true})
        }
        TrackerMessage::ExportCsv => Value::String(store.export_csv().await),
    }
}
