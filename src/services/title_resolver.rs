//! Title resolution for Watchtime.
//!
//! Tries an ordered list of sources against the page and returns the first
//! non-blank result, trimmed. Callers supply the fallback; `UNKNOWN_TITLE`
//! is the shared one.

use crate::services::page_host::PageHost;

/// Title used when no source yields anything.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// One place a video title may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleSource {
    /// Text of the first element matching a selector.
    Selector(String),
    /// The document title.
    DocumentTitle,
}

/// Ordered title fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleResolver {
    sources: Vec<TitleSource>,
}

impl TitleResolver {
    pub fn new(sources: Vec<TitleSource>) -> Self {
        Self { sources }
    }

    /// Selectors in the given order, then the document title.
    pub fn from_selectors(selectors: &[String]) -> Self {
        let mut sources: Vec<TitleSource> = selectors
            .iter()
            .map(|s| TitleSource::Selector(s.clone()))
            .collect();
        sources.push(TitleSource::DocumentTitle);
        Self { sources }
    }

    pub fn sources(&self) -> &[TitleSource] {
        &self.sources
    }

    /// Returns the first non-blank title, or `None` if every source is empty.
    pub fn try_resolve(&self, page: &dyn PageHost) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let raw = match source {
                TitleSource::Selector(selector) => page.text_of(selector),
                TitleSource::DocumentTitle => page.document_title(),
            };
            raw.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
        })
    }
}
