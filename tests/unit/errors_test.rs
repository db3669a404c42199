use std::error::Error;

use watchtime::types::errors::*;

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("disk full".to_string()).to_string(),
        "Storage database error: disk full"
    );
    assert_eq!(
        StorageError::SerializationError("bad json".to_string()).to_string(),
        "Storage serialization error: bad json"
    );
    assert_eq!(
        StorageError::Unavailable("poisoned".to_string()).to_string(),
        "Storage unavailable: poisoned"
    );
}

#[test]
fn storage_error_from_serde_json() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
    let err: StorageError = parse_err.into();
    assert!(matches!(err, StorageError::SerializationError(_)));
}

// === HistoryError Tests ===

#[test]
fn history_error_wraps_storage_source() {
    let err = HistoryError::LoadFailed(StorageError::Unavailable("reads disabled".to_string()));
    assert_eq!(
        err.to_string(),
        "History load failed: Storage unavailable: reads disabled"
    );
    assert!(err.source().is_some());

    let err = HistoryError::SaveFailed(StorageError::DatabaseError("locked".to_string()));
    assert_eq!(err.to_string(), "History save failed: Storage database error: locked");
}

#[test]
fn history_error_malformed_has_no_source() {
    let err = HistoryError::Malformed("expected an array".to_string());
    assert_eq!(err.to_string(), "History data is malformed: expected an array");
    assert!(err.source().is_none());
}

// === MessageError Tests ===

#[test]
fn message_error_display_variants() {
    assert_eq!(MessageError::UnknownType.to_string(), "Unknown message type");
    assert_eq!(
        MessageError::InvalidPayload("missing field `url`".to_string()).to_string(),
        "Invalid message: missing field `url`"
    );
}

// === TransportError Tests ===

#[test]
fn transport_error_display_variants() {
    assert_eq!(
        TransportError::Disconnected("channel closed".to_string()).to_string(),
        "Transport disconnected: channel closed"
    );
    assert_eq!(
        TransportError::Rejected("Unknown message type".to_string()).to_string(),
        "Host rejected message: Unknown message type"
    );
    assert_eq!(
        TransportError::Encoding("nan".to_string()).to_string(),
        "Transport encoding error: nan"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::InvalidKey("tracking.nope".to_string()).to_string(),
        "Invalid settings key: tracking.nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("not a number".to_string()).to_string(),
        "Invalid settings value: not a number"
    );
}

#[test]
fn errors_box_into_dyn_error() {
    let err: Box<dyn Error> = Box::new(SettingsError::SerializationError("eof".to_string()));
    assert_eq!(err.to_string(), "Settings serialization error: eof");
}
