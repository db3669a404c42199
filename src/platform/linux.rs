// Watchtime platform paths for Linux
// Config: ~/.config/watchtime
// Data:   ~/.local/share/watchtime

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Resolves `$<xdg_var>/watchtime`, falling back to `~/<fallback>/watchtime`.
fn xdg_dir(xdg_var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(xdg_var) {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("watchtime"),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join("watchtime"),
    }
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}
