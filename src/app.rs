//! App Core for Watchtime.
//!
//! Wires settings, the history database and the history store together for
//! the binaries, and hands out transports and page trackers bound to them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::database::SqliteStore;
use crate::managers::history_store::HistoryStore;
use crate::platform;
use crate::services::page_host::PageHost;
use crate::services::page_tracker::PageTracker;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::transport::{LocalTransport, MessageTransport};

/// Overrides the directory holding the history database.
pub const DATA_DIR_ENV: &str = "WATCHTIME_DATA_DIR";
pub const DATABASE_FILE: &str = "watchtime.db";

/// Installs the stderr `tracing` subscriber. `RUST_LOG` overrides the level.
pub fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();
}

/// Database location: `$WATCHTIME_DATA_DIR/watchtime.db`, else the platform data dir.
pub fn default_db_path() -> PathBuf {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(DATABASE_FILE),
        _ => platform::get_data_dir().join(DATABASE_FILE),
    }
}

/// Central application struct holding settings and the shared history.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub history: Arc<Mutex<HistoryStore>>,
}

impl App {
    /// Opens (creating if needed) the database at `db_path` and loads settings
    /// from `settings_path`, or the platform config file when `None`.
    ///
    /// Unreadable settings are logged and replaced by defaults; a database
    /// that cannot be opened is an error.
    pub fn new(
        db_path: &Path,
        settings_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(path = settings_engine.get_config_path(), error = %e, "Using default settings");
        }

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = SqliteStore::open(db_path)?;
        let history = HistoryStore::new(Arc::new(store), &settings_engine.get_settings().history);
        info!(db = %db_path.display(), "Watchtime initialized");

        Ok(Self {
            settings_engine,
            history: Arc::new(Mutex::new(history)),
        })
    }

    /// `new` with the default database and settings locations.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::new(&default_db_path(), None)
    }

    /// A transport delivering straight to this app's history.
    pub fn local_transport(&self) -> Arc<dyn MessageTransport> {
        Arc::new(LocalTransport::new(self.history.clone()))
    }

    /// A tracker for `page` reporting into this app's history.
    pub fn tracker<P: PageHost>(&self, page: P) -> PageTracker<P> {
        PageTracker::new(
            page,
            self.settings_engine.get_settings().tracking.clone(),
            self.local_transport(),
        )
    }

    /// Loads the history eagerly so a broken store shows up in the logs at
    /// startup. Failure is not fatal; the next access retries.
    pub async fn startup(&self) {
        let mut history = self.history.lock().await;
        match history.load().await {
            Ok(()) => info!(entries = history.entries().len(), "History loaded"),
            Err(e) => warn!(error = %e, "History not loaded at startup"),
        }
    }
}
