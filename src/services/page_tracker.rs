//! Page Tracker for Watchtime.
//!
//! One tracker per page context. It owns the navigation watcher, at most one
//! tracking session with its playback binding, and the update reporter, and
//! runs them all from a single event loop: page events, the one-second tick
//! (only while playing), and watcher deadlines are serialized through
//! `tokio::select!`, so no two transitions ever overlap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::services::navigation_watcher::{NavAction, NavigationWatcher, TeardownReason};
use crate::services::page_host::PageHost;
use crate::services::playback_source::PlaybackEventSource;
use crate::services::time_accumulator::TimeAccumulator;
use crate::services::title_resolver::{TitleResolver, UNKNOWN_TITLE};
use crate::services::transport::MessageTransport;
use crate::services::update_reporter::{ReportOutcome, UpdateReporter};
use crate::types::playback::{PageEvent, PlayerInfo, ReportDemand, VisibilityState};
use crate::types::session::TrackingSession;
use crate::types::settings::TrackingSettings;

/// A live session together with the element binding feeding it.
struct Binding {
    session: TrackingSession,
    source: PlaybackEventSource,
}

/// Drives watch-time tracking for a single page.
pub struct PageTracker<P: PageHost> {
    page: P,
    settings: TrackingSettings,
    watcher: NavigationWatcher,
    titles: TitleResolver,
    reporter: UpdateReporter,
    binding: Option<Binding>,
}

impl<P: PageHost> PageTracker<P> {
    pub fn new(page: P, settings: TrackingSettings, transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            watcher: NavigationWatcher::new(&settings),
            titles: TitleResolver::from_selectors(&settings.title_selectors),
            reporter: UpdateReporter::new(transport, settings.report_interval()),
            binding: None,
            page,
            settings,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn session(&self) -> Option<&TrackingSession> {
        self.binding.as_ref().map(|b| &b.session)
    }

    pub fn is_playing(&self) -> bool {
        self.session().map(|s| s.is_playing()).unwrap_or(false)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.watcher.next_deadline()
    }

    /// Looks at the initial location; a watch page is acquired after the settle delay.
    pub fn start(&mut self, now: Instant) {
        let location = self.page.location();
        info!(url = %location, "Video tracker started");
        self.watcher.start(&location, now);
    }

    /// Handles one page event. Returns false once the page has unloaded.
    pub async fn handle_event(&mut self, event: PageEvent, now: Instant) -> bool {
        match event {
            PageEvent::Media { element, kind } => {
                let Some(binding) = self.binding.as_mut() else {
                    return true;
                };
                let Some(playback) = binding.source.normalize(element, kind, now) else {
                    return true;
                };
                debug!(session = %binding.session.id, ?playback, "Playback event");
                let demand = binding.session.accumulator.apply(playback, now);
                self.fulfil(demand, now).await;
            }
            PageEvent::DomChanged => {
                let actions = self.watcher.on_change(&self.page, now);
                self.apply_actions(actions, now).await;
            }
            PageEvent::Visibility(state) => {
                let Some(binding) = self.binding.as_mut() else {
                    return true;
                };
                let demand = match state {
                    VisibilityState::Hidden => binding.session.accumulator.on_visibility_hidden(now),
                    VisibilityState::Visible => binding.session.accumulator.on_visibility_visible(now),
                };
                self.fulfil(demand, now).await;
            }
            PageEvent::Unload => {
                let actions = self.watcher.on_unload();
                self.apply_actions(actions, now).await;
                return false;
            }
        }
        true
    }

    /// Periodic accrual step. Does nothing unless a session is playing.
    pub async fn on_tick(&mut self, now: Instant) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };
        let demand = binding.session.accumulator.on_tick(now);
        self.fulfil(demand, now).await;
    }

    /// Runs watcher work that became due at `now`.
    pub async fn on_timer(&mut self, now: Instant) {
        let actions = self.watcher.on_timer(&self.page, now);
        self.apply_actions(actions, now).await;
    }

    /// Event loop. Ends when the page unloads or the event channel closes;
    /// either way the active session gets its final report first.
    pub async fn run(mut self, mut events: mpsc::Receiver<PageEvent>) {
        let mut ticker = tokio::time::interval(self.settings.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.start(clock_now());

        loop {
            let was_playing = self.is_playing();
            let wake = self
                .next_deadline()
                .map(tokio::time::Instant::from_std)
                .unwrap_or_else(|| tokio::time::Instant::now() + IDLE_WAKE);
            tokio::select! {
                event = events.recv() => {
                    let event = event.unwrap_or(PageEvent::Unload);
                    if !self.handle_event(event, clock_now()).await {
                        break;
                    }
                }
                _ = ticker.tick(), if was_playing => self.on_tick(clock_now()).await,
                _ = tokio::time::sleep_until(wake) => self.on_timer(clock_now()).await,
            }
            if !was_playing && self.is_playing() {
                // Playback (re)started: the next tick is one full interval away.
                ticker.reset();
            }
        }
        info!("Video tracker stopped");
    }

    async fn apply_actions(&mut self, actions: Vec<NavAction>, now: Instant) {
        for action in actions {
            match action {
                NavAction::Teardown(reason) => self.teardown(reason, now).await,
                NavAction::Acquire(player) => self.acquire(player, now).await,
            }
        }
    }

    async fn acquire(&mut self, player: PlayerInfo, now: Instant) {
        let url = self.page.location();
        let accumulator =
            TimeAccumulator::new(now, !player.paused, self.settings.max_step_credit());
        let session = TrackingSession::new(&url, player.id, accumulator);
        info!(session = %session.id, url = %url, playing = !player.paused, "Video tracking initialized");
        self.binding = Some(Binding {
            session,
            source: PlaybackEventSource::bind(player.id, self.settings.progress_throttle()),
        });
        self.fulfil(ReportDemand::Forced, now).await;
    }

    async fn teardown(&mut self, reason: TeardownReason, now: Instant) {
        let Some(mut binding) = self.binding.take() else {
            return;
        };
        let demand = binding.session.accumulator.on_teardown(now);
        let title = resolve_title(&self.page, &self.titles, &mut binding.session);
        let outcome = self
            .reporter
            .report(&mut binding.session, &title, demand == ReportDemand::Forced, now)
            .await;
        info!(
            session = %binding.session.id,
            ?reason,
            video_time = %format!("{:.1}", binding.session.accumulated_seconds()),
            delivered = outcome == ReportOutcome::Delivered,
            "Video tracking stopped"
        );
    }

    async fn fulfil(&mut self, demand: ReportDemand, now: Instant) -> ReportOutcome {
        let force = match demand {
            ReportDemand::None => return ReportOutcome::Skipped,
            ReportDemand::Throttled => false,
            ReportDemand::Forced => true,
        };
        let Some(binding) = self.binding.as_mut() else {
            return ReportOutcome::Skipped;
        };
        let title = resolve_title(&self.page, &self.titles, &mut binding.session);
        self.reporter
            .report(&mut binding.session, &title, force, now)
            .await
    }
}

/// How long the loop sleeps when the watcher has nothing scheduled.
const IDLE_WAKE: Duration = Duration::from_secs(3600);

fn clock_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Resolves the title while the page still shows the session's URL and
/// remembers it; afterwards the remembered title is used.
fn resolve_title(page: &dyn PageHost, titles: &TitleResolver, session: &mut TrackingSession) -> String {
    if page.location() == session.url {
        if let Some(title) = titles.try_resolve(page) {
            session.title = Some(title);
        }
    }
    session
        .title
        .clone()
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}
