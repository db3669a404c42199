//! Watchtime persistence layer.
//!
//! Provides the SQLite connection, schema migrations, and the key-value
//! storage boundary the history store persists through.
//!
//! # Usage
//!
//! ```no_run
//! use watchtime::database::{KeyValueStore, SqliteStore};
//!
//! # async fn demo() -> Result<(), watchtime::types::errors::StorageError> {
//! let store = SqliteStore::open("watchtime.db")?;
//! store.set("youtubeHistory", serde_json::json!([])).await?;
//! let value = store.get("youtubeHistory").await?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::{KeyValueStore, MemoryStore, SqliteStore};
