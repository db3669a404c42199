//! Navigation Watcher for Watchtime.
//!
//! Single-page video sites swap URLs and player elements without a page
//! load. The watcher is fed DOM change notifications, rate-limits how often
//! it looks at the page, and answers with binding actions for the tracker:
//! tear the current session down, or acquire a player.
//!
//! The watcher reads no clock and owns no timers. The tracker passes `now`
//! in and asks [`NavigationWatcher::next_deadline`] when to call back.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::services::page_host::{PageHost, WatchPagePattern};
use crate::types::playback::{ElementId, PlayerInfo};
use crate::types::settings::TrackingSettings;

/// Why a session is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// The location changed.
    Navigated,
    /// The bound element left the page.
    Detached,
    /// The bound element was replaced by another one.
    Replaced,
    /// The page is unloading.
    Unload,
}

/// Binding change the tracker must carry out, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Teardown(TeardownReason),
    Acquire(PlayerInfo),
}

/// Leading-edge throttle that remembers a suppressed call and lets it run
/// once the window closes, so the last change in a burst is never lost.
#[derive(Debug, Clone)]
pub struct ChangeThrottle {
    window: Duration,
    last_fire: Option<Instant>,
    trailing: bool,
}

impl ChangeThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
            trailing: false,
        }
    }

    /// Registers a notification. Returns true if the check should run now.
    pub fn poll(&mut self, now: Instant) -> bool {
        let open = self
            .last_fire
            .map(|last| now.saturating_duration_since(last) >= self.window)
            .unwrap_or(true);
        if open {
            self.last_fire = Some(now);
            self.trailing = false;
        } else {
            self.trailing = true;
        }
        open
    }

    /// When the suppressed call is due, if there is one.
    pub fn trailing_deadline(&self) -> Option<Instant> {
        match (self.trailing, self.last_fire) {
            (true, Some(last)) => Some(last + self.window),
            _ => None,
        }
    }

    /// Fires the suppressed call if its deadline has passed.
    pub fn fire_trailing(&mut self, now: Instant) -> bool {
        match self.trailing_deadline() {
            Some(due) if now >= due => {
                self.last_fire = Some(now);
                self.trailing = false;
                true
            }
            _ => false,
        }
    }
}

/// Tracks location and player identity for one page context.
#[derive(Debug, Clone)]
pub struct NavigationWatcher {
    pattern: WatchPagePattern,
    settle_delay: Duration,
    url_throttle: ChangeThrottle,
    element_throttle: ChangeThrottle,
    last_url: String,
    pending_acquire: Option<Instant>,
    bound: Option<ElementId>,
}

impl NavigationWatcher {
    pub fn new(settings: &TrackingSettings) -> Self {
        Self {
            pattern: WatchPagePattern::new(&settings.watch_url_pattern),
            settle_delay: settings.settle_delay(),
            url_throttle: ChangeThrottle::new(settings.url_check_throttle()),
            element_throttle: ChangeThrottle::new(settings.element_check_throttle()),
            last_url: String::new(),
            pending_acquire: None,
            bound: None,
        }
    }

    pub fn is_watch_page(&self, url: &str) -> bool {
        self.pattern.matches(url)
    }

    pub fn bound(&self) -> Option<ElementId> {
        self.bound
    }

    pub fn pending_acquire(&self) -> Option<Instant> {
        self.pending_acquire
    }

    /// Records the initial location. A watch page gets an acquisition after the settle delay.
    pub fn start(&mut self, location: &str, now: Instant) {
        self.last_url = location.to_string();
        if self.is_watch_page(location) {
            self.pending_acquire = Some(now + self.settle_delay);
        }
    }

    /// Handles one DOM change notification.
    pub fn on_change(&mut self, page: &dyn PageHost, now: Instant) -> Vec<NavAction> {
        let mut actions = Vec::new();
        if self.url_throttle.poll(now) {
            self.check_url(page, now, &mut actions);
        }
        if self.element_throttle.poll(now) {
            self.check_element(page, &mut actions);
        }
        actions
    }

    /// Runs whatever timer-driven work is due: trailing checks and settled acquisitions.
    pub fn on_timer(&mut self, page: &dyn PageHost, now: Instant) -> Vec<NavAction> {
        let mut actions = Vec::new();
        if self.url_throttle.fire_trailing(now) {
            self.check_url(page, now, &mut actions);
        }
        if matches!(self.pending_acquire, Some(due) if now >= due) {
            self.pending_acquire = None;
            self.check_element(page, &mut actions);
        }
        if self.element_throttle.fire_trailing(now) {
            self.check_element(page, &mut actions);
        }
        actions
    }

    /// Tears down whatever is bound; nothing is re-acquired afterwards.
    pub fn on_unload(&mut self) -> Vec<NavAction> {
        self.pending_acquire = None;
        match self.bound.take() {
            Some(_) => vec![NavAction::Teardown(TeardownReason::Unload)],
            None => Vec::new(),
        }
    }

    /// Earliest instant at which `on_timer` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.pending_acquire,
            self.url_throttle.trailing_deadline(),
            self.element_throttle.trailing_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn check_url(&mut self, page: &dyn PageHost, now: Instant, actions: &mut Vec<NavAction>) {
        let current = page.location();
        if current == self.last_url {
            return;
        }
        debug!(from = %self.last_url, to = %current, "URL changed");
        self.last_url = current;
        if self.bound.take().is_some() {
            actions.push(NavAction::Teardown(TeardownReason::Navigated));
        }
        self.pending_acquire = if self.is_watch_page(&self.last_url) {
            Some(now + self.settle_delay)
        } else {
            None
        };
    }

    fn check_element(&mut self, page: &dyn PageHost, actions: &mut Vec<NavAction>) {
        // A pending settle owns the next acquisition; a moved location is the URL check's job.
        if self.pending_acquire.is_some() || !self.is_watch_page(&self.last_url) {
            return;
        }
        if page.location() != self.last_url {
            return;
        }
        match (self.bound, page.find_player()) {
            (Some(bound), Some(player)) if bound == player.id => {}
            (Some(_), Some(player)) => {
                actions.push(NavAction::Teardown(TeardownReason::Replaced));
                actions.push(NavAction::Acquire(player));
                self.bound = Some(player.id);
            }
            (Some(_), None) => {
                actions.push(NavAction::Teardown(TeardownReason::Detached));
                self.bound = None;
            }
            (None, Some(player)) => {
                actions.push(NavAction::Acquire(player));
                self.bound = Some(player.id);
            }
            (None, None) => debug!("Video element not found, will try again on DOM changes"),
        }
    }
}
