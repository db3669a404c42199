// Watchtime platform abstraction
// Provides platform-specific config and data paths for Windows, macOS, and Linux.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for Watchtime.
///
/// - **Linux**: `~/.config/watchtime` (or `$XDG_CONFIG_HOME/watchtime`)
/// - **macOS**: `~/Library/Application Support/Watchtime`
/// - **Windows**: `%APPDATA%/Watchtime`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory, where the history database lives.
///
/// - **Linux**: `~/.local/share/watchtime` (or `$XDG_DATA_HOME/watchtime`)
/// - **macOS**: `~/Library/Application Support/Watchtime`
/// - **Windows**: `%APPDATA%/Watchtime`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
