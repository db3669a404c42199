use serde::{Deserialize, Serialize};

/// Opaque identity of a player element inside a page.
///
/// A new id means the page replaced the element, even if the URL did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Snapshot of the page's primary player at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: ElementId,
    pub paused: bool,
}

/// Raw media notifications as a player element fires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaEventKind {
    Play,
    Pause,
    Seeking,
    TimeUpdate,
}

/// Document visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

/// Everything a page context can tell the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A media notification from a specific element.
    Media { element: ElementId, kind: MediaEventKind },
    /// A batch of DOM mutations happened; location or player may have changed.
    DomChanged,
    /// The document became hidden or visible.
    Visibility(VisibilityState),
    /// The page is going away.
    Unload,
}

/// Normalized playback events consumed by the time accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Seek,
    Tick,
}

/// What a transition asks of the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDemand {
    None,
    Throttled,
    Forced,
}
