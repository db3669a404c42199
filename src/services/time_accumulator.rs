//! Time Accumulator for Watchtime.
//!
//! Turns normalized playback events into accumulated watch seconds. Every
//! transition takes the current instant explicitly, so the state machine never
//! reads a clock on its own and can be driven by any time source.

use std::time::{Duration, Instant};

use crate::types::playback::{PlaybackEvent, ReportDemand};

/// Accumulates watch time for one tracking session.
#[derive(Debug, Clone)]
pub struct TimeAccumulator {
    accumulated: Duration,
    playing: bool,
    last_tick: Instant,
    max_step: Option<Duration>,
}

impl TimeAccumulator {
    /// Creates an accumulator at `now`. `playing` seeds the state from the
    /// element, which may already be playing when it is acquired.
    pub fn new(now: Instant, playing: bool, max_step: Option<Duration>) -> Self {
        Self {
            accumulated: Duration::ZERO,
            playing,
            last_tick: now,
            max_step,
        }
    }

    pub fn accumulated_seconds(&self) -> f64 {
        self.accumulated.as_secs_f64()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }

    /// Dispatches a normalized playback event to its transition.
    pub fn apply(&mut self, event: PlaybackEvent, now: Instant) -> ReportDemand {
        match event {
            PlaybackEvent::Play => self.on_play(now),
            PlaybackEvent::Pause => self.on_pause(now),
            PlaybackEvent::Seek => self.on_seek(now),
            PlaybackEvent::Tick => self.on_tick(now),
        }
    }

    /// Starts playing. The gap before play is never credited.
    pub fn on_play(&mut self, now: Instant) -> ReportDemand {
        self.playing = true;
        self.last_tick = now;
        ReportDemand::None
    }

    pub fn on_pause(&mut self, now: Instant) -> ReportDemand {
        if self.playing {
            self.accrue(now);
        }
        self.playing = false;
        ReportDemand::Forced
    }

    /// Seeking restarts the tick window without crediting the jump.
    pub fn on_seek(&mut self, now: Instant) -> ReportDemand {
        self.last_tick = now;
        ReportDemand::None
    }

    pub fn on_tick(&mut self, now: Instant) -> ReportDemand {
        if self.playing && self.accrue(now) {
            ReportDemand::Throttled
        } else {
            ReportDemand::None
        }
    }

    pub fn on_visibility_hidden(&mut self, now: Instant) -> ReportDemand {
        if !self.playing {
            return ReportDemand::None;
        }
        self.accrue(now);
        ReportDemand::Forced
    }

    /// Restarts the tick window so a suspended hidden interval is not credited.
    pub fn on_visibility_visible(&mut self, now: Instant) -> ReportDemand {
        if self.playing {
            self.last_tick = now;
        }
        ReportDemand::None
    }

    /// Final accrual before the session is discarded (unload or detach).
    pub fn on_teardown(&mut self, now: Instant) -> ReportDemand {
        if self.playing {
            self.accrue(now);
        }
        self.playing = false;
        ReportDemand::Forced
    }

    /// Credits the time since the last tick. Returns whether anything was credited.
    fn accrue(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed.is_zero() {
            return false;
        }
        let credited = match self.max_step {
            Some(cap) => elapsed.min(cap),
            None => elapsed,
        };
        self.accumulated += credited;
        self.last_tick = now;
        true
    }
}
