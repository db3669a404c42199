use thiserror::Error;

// === StorageError ===

/// Errors raised by the key-value persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing database rejected the operation.
    #[error("Storage database error: {0}")]
    DatabaseError(String),
    /// A stored value could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    SerializationError(String),
    /// The store is temporarily unreachable (lock poisoned, backend gone).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

// === HistoryError ===

/// Errors related to the watch history collection.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Loading the persisted collection failed.
    #[error("History load failed: {0}")]
    LoadFailed(#[source] StorageError),
    /// Saving the collection failed.
    #[error("History save failed: {0}")]
    SaveFailed(#[source] StorageError),
    /// The persisted value is not a history collection.
    #[error("History data is malformed: {0}")]
    Malformed(String),
}

// === MessageError ===

/// Errors produced while decoding a cross-process message.
#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    /// The `type` discriminator is missing or not recognized.
    #[error("Unknown message type")]
    UnknownType,
    /// The message type is known but its payload is unusable.
    #[error("Invalid message: {0}")]
    InvalidPayload(String),
}

// === TransportError ===

/// Errors related to delivering a message to the history host.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The receiving side is not reachable.
    #[error("Transport disconnected: {0}")]
    Disconnected(String),
    /// The host answered with an error response.
    #[error("Host rejected message: {0}")]
    Rejected(String),
    /// The message could not be encoded.
    #[error("Transport encoding error: {0}")]
    Encoding(String),
}

// === SettingsError ===

/// Errors related to tracker settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The requested settings key does not exist.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided value is not valid for the setting.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
