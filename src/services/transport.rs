//! Message transport between a page context and the history host.
//!
//! The page side only knows [`MessageTransport`]. [`LocalTransport`] hands
//! messages straight to an in-process history host; [`ChannelTransport`]
//! forwards them to another task without waiting for a reply.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};

use crate::managers::history_store::HistoryStore;
use crate::rpc_handler::handle_message;
use crate::types::errors::TransportError;
use crate::types::messages::TrackerMessage;

/// Delivers tracker messages and returns the host's response.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: TrackerMessage) -> Result<Value, TransportError>;
}

/// Transport to a history host living in the same process.
#[derive(Clone)]
pub struct LocalTransport {
    history: Arc<Mutex<HistoryStore>>,
}

impl LocalTransport {
    pub fn new(history: Arc<Mutex<HistoryStore>>) -> Self {
        Self { history }
    }
}

#[async_trait]
impl MessageTransport for LocalTransport {
    async fn send(&self, message: TrackerMessage) -> Result<Value, TransportError> {
        let raw =
            serde_json::to_value(&message).map_err(|e| TransportError::Encoding(e.to_string()))?;
        let response = handle_message(&self.history, &raw).await;
        match response.get("error").and_then(|e| e.as_str()) {
            Some(err) => Err(TransportError::Rejected(err.to_string())),
            None => Ok(response),
        }
    }
}

/// Fire-and-forget transport onto an unbounded channel.
#[derive(Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<TrackerMessage>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TrackerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageTransport for ChannelTransport {
    async fn send(&self, message: TrackerMessage) -> Result<Value, TransportError> {
        self.tx
            .send(message)
            .map_err(|e| TransportError::Disconnected(e.to_string()))?;
        Ok(json!({"success": true}))
    }
}
