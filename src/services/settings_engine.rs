// Watchtime Settings Engine
// Loads, saves, updates and resets tracker settings.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::TrackerSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<TrackerSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &TrackerSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: TrackerSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// With `path_override` the config file lives there; otherwise it is
    /// `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: TrackerSettings::default(),
        }
    }

    fn warn_on_disabled_tracking(&self) {
        if !self.settings.tracking.has_watch_pattern() {
            warn!(
                path = %self.config_path,
                "tracking.watch_url_pattern is empty, no page will be tracked"
            );
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the config file.
    ///
    /// A missing file yields defaults. Missing fields inside an existing file
    /// take their defaults too; a file that is not valid JSON is an error.
    fn load(&mut self) -> Result<TrackerSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "No settings file, using defaults");
            self.settings = TrackerSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        info!(path = %self.config_path, "Settings loaded");
        self.warn_on_disabled_tracking();
        Ok(self.settings.clone())
    }

    /// Writes the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        debug!(path = %self.config_path, "Settings saved");
        Ok(())
    }

    fn get_settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Updates one setting by dot-notation key path and saves.
    ///
    /// The key must already exist, e.g. `"tracking.report_interval_ms"` or
    /// `"history.max_entries"`. The whole document is re-validated by
    /// deserializing it back into `TrackerSettings`.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| SettingsError::InvalidKey("Key cannot be empty".to_string()))?;
        let mut current = &mut json_value;
        for part in parents {
            current = current.get_mut(*part).ok_or_else(|| {
                SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
            })?;
        }
        match current {
            Value::Object(map) if map.contains_key(*last) => {
                map.insert(last.to_string(), value);
            }
            Value::Object(_) => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )));
            }
        }

        self.settings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        info!(key, "Setting updated");
        self.warn_on_disabled_tracking();

        self.save()
    }

    /// Resets all settings to defaults and saves.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = TrackerSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
