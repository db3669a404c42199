// Watchtime services
// Page-side tracking pipeline plus settings, export and display helpers.

pub mod csv_export;
pub mod display_format;
pub mod navigation_watcher;
pub mod page_host;
pub mod page_tracker;
pub mod playback_source;
pub mod settings_engine;
pub mod time_accumulator;
pub mod title_resolver;
pub mod transport;
pub mod update_reporter;
