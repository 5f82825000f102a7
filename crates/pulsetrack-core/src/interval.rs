//! Interval records and the transient in-progress marker.
//!
//! Timestamps are milliseconds since the Unix epoch. They are signed so that
//! differences between neighbouring records can go negative without wrapping.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Shortest interval that is kept when it ends. Anything shorter is treated
/// as an accidental trigger and dropped.
pub const MIN_RECORDED_MS: i64 = 1_000;

/// A completed, recorded interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub id: String,
    pub start: i64,
    pub end: i64,
    #[serde(rename = "duration")]
    pub duration_ms: i64,
    /// Normalized intensity in `[0, 1]`.
    pub intensity: f64,
}

impl Interval {
    /// Build a record from its endpoints. The id is a fresh UUID.
    pub fn new(start: i64, end: i64, intensity: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start,
            end,
            duration_ms: end.saturating_sub(start),
            intensity: intensity.clamp(0.0, 1.0),
        }
    }

    /// Whether the record is internally consistent: it does not end before
    /// it starts, `duration` equals `end - start` and the intensity lies in
    /// `[0, 1]`.
    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
            && self.end.checked_sub(self.start) == Some(self.duration_ms)
            && (0.0..=1.0).contains(&self.intensity)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.start).single()
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.end).single()
    }
}

/// An interval that has begun but not yet ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InProgress {
    pub started_at: i64,
}

impl InProgress {
    /// Milliseconds elapsed at `now`. Never negative.
    pub fn elapsed_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.started_at).max(0)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
