//! Replay cursor and playback state machine.

use std::time::Duration;

use candela_types::{Bar, Result, require_positive};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Interval between ticks at speed 1.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not playing; the cursor sits at the start position.
    #[default]
    Stopped,
    /// Advancing one bar per tick.
    Playing {
        /// Speed multiplier; ticks arrive every `interval / speed`.
        speed: f64,
    },
    /// Halted with the cursor kept in place.
    Paused,
}

impl PlaybackState {
    /// Returns the state as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing { .. } => "playing",
            Self::Paused => "paused",
        }
    }

    /// Returns true while playing.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Playing { speed } => write!(f, "playing at {speed}x"),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

/// Caller-owned cursor over a fixed series of `len` bars.
///
/// The cursor counts visible bars, so `visible` returns `bars[..cursor]`.
/// The controller owns no timer: an external driver calls [`tick`] every
/// [`interval`] while playing. Seeking is a plain cursor assignment; callers
/// recompute their analytics over the new prefix.
///
/// [`tick`]: ReplayController::tick
/// [`interval`]: ReplayController::interval
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayController {
    len: usize,
    start: usize,
    cursor: usize,
    state: PlaybackState,
    speed: f64,
    base_interval: Duration,
}

impl ReplayController {
    /// Creates a stopped controller with the first bar visible.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let start = len.min(1);
        Self {
            len,
            start,
            cursor: start,
            state: PlaybackState::Stopped,
            speed: 1.0,
            base_interval: DEFAULT_INTERVAL,
        }
    }

    /// Sets how many bars are visible after a stop, clamped to the series.
    #[must_use]
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start.min(self.len);
        if self.state == PlaybackState::Stopped {
            self.cursor = self.start;
        }
        self
    }

    /// Sets the tick interval at speed 1.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    /// Number of visible bars.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the underlying series.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true for an empty series.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current playback state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Last speed requested through [`play`](Self::play).
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns true once every bar is visible.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.cursor >= self.len
    }

    /// Fraction of the series visible, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.len == 0 {
            1.0
        } else {
            self.cursor as f64 / self.len as f64
        }
    }

    /// Visible prefix of `bars`.
    #[must_use]
    pub fn visible<'a>(&self, bars: &'a [Bar]) -> &'a [Bar] {
        &bars[..self.cursor.min(bars.len())]
    }

    /// Driver interval while playing, `None` otherwise.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        match self.state {
            PlaybackState::Playing { speed } => Some(
                Duration::try_from_secs_f64(self.base_interval.as_secs_f64() / speed)
                    .unwrap_or(Duration::MAX),
            ),
            PlaybackState::Stopped | PlaybackState::Paused => None,
        }
    }

    /// Starts or resumes playback at `speed`.
    ///
    /// Playing from the end of the series rewinds to the start first.
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` is not a positive finite number.
    pub fn play(&mut self, speed: f64) -> Result<()> {
        self.speed = require_positive("speed", speed)?;
        if self.is_finished() {
            self.cursor = self.start;
        }
        self.transition(PlaybackState::Playing { speed });
        Ok(())
    }

    /// Resumes at the last requested speed.
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.transition(PlaybackState::Playing { speed: self.speed });
        }
    }

    /// Pauses playback, keeping the cursor. Returns true if it was playing.
    pub fn pause(&mut self) -> bool {
        let playing = self.state.is_playing();
        if playing {
            self.transition(PlaybackState::Paused);
        }
        playing
    }

    /// Stops playback and rewinds to the start position.
    pub fn stop(&mut self) {
        self.cursor = self.start;
        self.transition(PlaybackState::Stopped);
    }

    /// Reveals one more bar. Returns false at the end of the series.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Hides the last visible bar. Returns false when nothing is visible.
    pub fn step_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Moves the cursor to `cursor` visible bars, clamped to the series.
    pub fn seek(&mut self, cursor: usize) -> usize {
        self.cursor = cursor.min(self.len);
        debug!(cursor = self.cursor, "seek");
        self.cursor
    }

    /// Driver callback: advances one bar while playing.
    ///
    /// Reaching the end pauses playback. Returns true if the cursor moved.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let moved = self.step();
        if self.is_finished() {
            self.transition(PlaybackState::Paused);
        }
        moved
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, cursor = self.cursor, "playback");
            self.state = next;
        }
    }
}
