//! Session state machine.
//!
//! A session is an append-only list of recorded intervals, at most one
//! in-progress interval and the intensity level applied to the next record.
//! Like the rest of the core it never reads the clock: every command takes
//! `now` from the caller.
//!
//! ```text
//! Idle --begin--> Active --end (>= 1s)--> Idle (+1 interval)
//!                    \----end (< 1s)----> Idle (discarded)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::SessionEvent;
use crate::interval::{InProgress, Interval, MIN_RECORDED_MS};

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;
pub const DEFAULT_INTENSITY: u8 = 5;

/// Transient part of a session that is not an interval record.
///
/// Hosts that outlive a single process (the CLI) persist this next to the
/// interval list so `begin` and `end` can happen in separate invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerState {
    #[serde(default)]
    pub in_progress: Option<InProgress>,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
}

fn default_intensity() -> u8 {
    DEFAULT_INTENSITY
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            in_progress: None,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

/// Simple counters derived directly from the interval list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub count: usize,
    pub avg_duration_ms: Option<f64>,
    /// Start-to-start distance between the two most recent intervals.
    pub last_interval_ms: Option<i64>,
    pub last_duration_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    intervals: Vec<Interval>,
    in_progress: Option<InProgress>,
    intensity: u8,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), TrackerState::default())
    }

    /// Rebuild a session from persisted records and tracker state.
    pub fn from_parts(intervals: Vec<Interval>, state: TrackerState) -> Self {
        Self {
            intervals,
            in_progress: state.in_progress,
            intensity: clamp_intensity(state.intensity),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn in_progress(&self) -> Option<InProgress> {
        self.in_progress
    }

    pub fn is_active(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Intensity level (1..=10) applied to the next recorded interval.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Intensity level mapped to `[0, 1]`.
    pub fn normalized_intensity(&self) -> f64 {
        f64::from(self.intensity) / f64::from(MAX_INTENSITY)
    }

    pub fn tracker_state(&self) -> TrackerState {
        TrackerState {
            in_progress: self.in_progress,
            intensity: self.intensity,
        }
    }

    pub fn stats(&self) -> SessionStats {
        let count = self.intervals.len();
        let avg_duration_ms = if count == 0 {
            None
        } else {
            let total: f64 = self.intervals.iter().map(|i| i.duration_ms as f64).sum();
            Some(total / count as f64)
        };
        let last_interval_ms = match self.intervals.as_slice() {
            [.., prev, last] => Some(last.start.saturating_sub(prev.start)),
            _ => None,
        };
        SessionStats {
            count,
            avg_duration_ms,
            last_interval_ms,
            last_duration_ms: self.intervals.last().map(|i| i.duration_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Open a new interval at `now`. Ignored while one is already open.
    pub fn begin(&mut self, now: i64) -> Option<SessionEvent> {
        if self.in_progress.is_some() {
            debug!("begin ignored: interval already in progress");
            return None;
        }
        self.in_progress = Some(InProgress { started_at: now });
        debug!(at = now, "interval started");
        Some(SessionEvent::IntervalStarted { at: now })
    }

    /// Close the open interval at `now`.
    ///
    /// Intervals shorter than [`MIN_RECORDED_MS`] are discarded rather than
    /// recorded. Returns `None` when nothing is in progress.
    pub fn end(&mut self, now: i64) -> Option<SessionEvent> {
        let open = self.in_progress.take()?;
        let elapsed_ms = now.saturating_sub(open.started_at);
        if elapsed_ms < MIN_RECORDED_MS {
            debug!(elapsed_ms, "interval discarded");
            return Some(SessionEvent::IntervalDiscarded { elapsed_ms, at: now });
        }
        let interval = Interval::new(open.started_at, now, self.normalized_intensity());
        info!(
            duration_ms = interval.duration_ms,
            intensity = interval.intensity,
            "interval recorded"
        );
        self.intervals.push(interval.clone());
        Some(SessionEvent::IntervalRecorded { interval })
    }

    /// Drop every record and any open interval. The intensity level is kept.
    pub fn clear(&mut self) -> SessionEvent {
        let removed = self.intervals.len();
        self.intervals.clear();
        self.in_progress = None;
        info!(removed, "session cleared");
        SessionEvent::SessionCleared { removed }
    }

    /// Set the intensity level for future intervals, clamped to 1..=10.
    pub fn set_intensity(&mut self, level: u8) -> SessionEvent {
        self.intensity = clamp_intensity(level);
        SessionEvent::IntensityChanged {
            level: self.intensity,
        }
    }
}

fn clamp_intensity(level: u8) -> u8 {
    level.clamp(MIN_INTENSITY, MAX_INTENSITY)
}
