// Watchtime shared type definitions
// Each submodule defines types used across the page side and the history host.

pub mod errors;
pub mod history;
pub mod messages;
pub mod playback;
pub mod session;
pub mod settings;
