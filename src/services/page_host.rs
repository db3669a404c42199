//! Page boundary for Watchtime.
//!
//! The tracker never touches a DOM directly. A `PageHost` answers the few
//! questions the tracker asks of the page it runs in.

use crate::types::playback::PlayerInfo;

/// Read access to the page a tracker is attached to.
pub trait PageHost: Send {
    /// Current document location.
    fn location(&self) -> String;
    /// The document title, if any.
    fn document_title(&self) -> Option<String>;
    /// Text content of the first element matching `selector`.
    fn text_of(&self, selector: &str) -> Option<String>;
    /// The page's primary player element, if one is present.
    fn find_player(&self) -> Option<PlayerInfo>;
}

/// Qualifying-page predicate: a URL is a watch page when it contains the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPagePattern {
    needle: String,
}

impl WatchPagePattern {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_string(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        !self.needle.is_empty() && url.contains(&self.needle)
    }
}
