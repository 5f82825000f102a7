//! Rolling rule evaluation over the interval history.
//!
//! A streak is the trailing run of intervals in which every interval lasts at
//! least `min_duration_ms` and each one starts within `max_interval_ms` of the
//! previous start. The rule is met once such a streak has been running for
//! `sustain_ms`, measured from the first interval in the run to `now`.
//!
//! The frequency and duration averages are computed over the whole session,
//! not just the streak.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::interval::Interval;

pub const ONE_MINUTE_MS: i64 = 60_000;
pub const FIVE_MINUTES_MS: i64 = 5 * ONE_MINUTE_MS;
pub const ONE_HOUR_MS: i64 = 60 * ONE_MINUTE_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Minimum duration for an interval to count on its own.
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: i64,
    /// Largest start-to-start distance between two counted intervals.
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: i64,
    /// How long a streak must last before the rule is met.
    #[serde(default = "default_sustain_ms")]
    pub sustain_ms: i64,
}

fn default_min_duration_ms() -> i64 {
    ONE_MINUTE_MS
}
fn default_max_interval_ms() -> i64 {
    FIVE_MINUTES_MS
}
fn default_sustain_ms() -> i64 {
    ONE_HOUR_MS
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            min_duration_ms: default_min_duration_ms(),
            max_interval_ms: default_max_interval_ms(),
            sustain_ms: default_sustain_ms(),
        }
    }
}

impl RuleThresholds {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("rules.min_duration_ms", self.min_duration_ms),
            ("rules.max_interval_ms", self.max_interval_ms),
            ("rules.sustain_ms", self.sustain_ms),
        ];
        for (field, value) in fields {
            if value <= 0 {
                return Err(ValidationError::invalid(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Whether an interval counts on its own.
    pub fn qualifies_alone(&self, interval: &Interval) -> bool {
        interval.duration_ms >= self.min_duration_ms
    }

    /// Whether the step from `earlier` to `later` is close enough.
    pub fn transition_qualifies(&self, earlier: &Interval, later: &Interval) -> bool {
        later.start.saturating_sub(earlier.start) <= self.max_interval_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Start of the earliest interval in the trailing streak.
    pub qualifying_start: Option<i64>,
    pub streak_duration_ms: i64,
    pub threshold_met: bool,
    /// Mean start-to-start distance over the whole session.
    pub avg_interval_ms: Option<f64>,
    /// Mean interval duration over the whole session.
    pub avg_duration_ms: Option<f64>,
}

/// The three indicators a host shows next to the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleBadges {
    /// Session-wide average spacing is within `max_interval_ms`.
    pub frequency: bool,
    /// Session-wide average duration reaches `min_duration_ms`.
    pub duration: bool,
    /// The trailing streak has lasted `sustain_ms`.
    pub ongoing: bool,
}

impl RuleBadges {
    pub fn all(&self) -> bool {
        self.frequency && self.duration && self.ongoing
    }
}

/// Index of the first interval of the trailing streak, if any.
///
/// Scans backward from the most recent interval and stops at the first
/// earlier interval that fails either check.
pub fn streak_start_index(intervals: &[Interval], rules: &RuleThresholds) -> Option<usize> {
    let last = intervals.len().checked_sub(1)?;
    if !rules.qualifies_alone(&intervals[last]) {
        return None;
    }
    let mut first = last;
    for i in (0..last).rev() {
        let earlier = &intervals[i];
        let later = &intervals[i + 1];
        if !(rules.qualifies_alone(earlier) && rules.transition_qualifies(earlier, later)) {
            break;
        }
        first = i;
    }
    Some(first)
}

/// Mean start-to-start distance, `None` with fewer than two intervals.
pub fn average_interval_ms(intervals: &[Interval]) -> Option<f64> {
    if intervals.len() < 2 {
        return None;
    }
    let total: f64 = intervals
        .windows(2)
        .map(|w| w[1].start.saturating_sub(w[0].start) as f64)
        .sum();
    Some(total / (intervals.len() - 1) as f64)
}

/// Mean duration, `None` for an empty history.
pub fn average_duration_ms(intervals: &[Interval]) -> Option<f64> {
    if intervals.is_empty() {
        return None;
    }
    let total: f64 = intervals.iter().map(|i| i.duration_ms as f64).sum();
    Some(total / intervals.len() as f64)
}

/// Evaluate the rule at `now`.
pub fn evaluate(intervals: &[Interval], now: i64, rules: &RuleThresholds) -> StreakResult {
    let qualifying_start = streak_start_index(intervals, rules).map(|i| intervals[i].start);
    let streak_duration_ms = qualifying_start
        .map(|start| now.saturating_sub(start).max(0))
        .unwrap_or(0);
    let threshold_met = qualifying_start.is_some() && streak_duration_ms >= rules.sustain_ms;

    debug!(
        ?qualifying_start,
        streak_duration_ms, threshold_met, "rule evaluated"
    );

    StreakResult {
        qualifying_start,
        streak_duration_ms,
        threshold_met,
        avg_interval_ms: average_interval_ms(intervals),
        avg_duration_ms: average_duration_ms(intervals),
    }
}

/// Derive the badge flags from an evaluation.
pub fn badges(result: &StreakResult, rules: &RuleThresholds) -> RuleBadges {
    RuleBadges {
        frequency: result
            .avg_interval_ms
            .is_some_and(|avg| avg <= rules.max_interval_ms as f64),
        duration: result
            .avg_duration_ms
            .is_some_and(|avg| avg >= rules.min_duration_ms as f64),
        ongoing: result.threshold_met,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, duration: i64) -> Interval {
        Interval {
            id: format!("{start}"),
            start,
            end: start + duration,
            duration_ms: duration,
            intensity: 0.5,
        }
    }

    /// Four one-minute intervals, five minutes apart.
    fn regular() -> Vec<Interval> {
        (0..4).map(|i| iv(i * FIVE_MINUTES_MS, ONE_MINUTE_MS)).collect()
    }

    #[test]
    fn empty_history_has_no_streak() {
        let r = evaluate(&[], 10_000_000, &RuleThresholds::default());
        assert_eq!(r.qualifying_start, None);
        assert_eq!(r.streak_duration_ms, 0);
        assert!(!r.threshold_met);
        assert_eq!(r.avg_interval_ms, None);
        assert_eq!(r.avg_duration_ms, None);
    }

    #[test]
    fn threshold_boundary() {
        let rules = RuleThresholds::default();
        let history = regular();
        let start = evaluate(&history, 0, &rules).qualifying_start.unwrap();
        assert_eq!(start, 0);

        let before = evaluate(&history, start + 3_599_999, &rules);
        assert!(!before.threshold_met);
        assert_eq!(before.streak_duration_ms, 3_599_999);

        let at = evaluate(&history, start + 3_600_000, &rules);
        assert!(at.threshold_met);
    }

    #[test]
    fn short_single_interval_never_qualifies() {
        let rules = RuleThresholds::default();
        let history = [iv(0, 59_999)];
        for now in [0, 3_600_000, i64::MAX / 2] {
            let r = evaluate(&history, now, &rules);
            assert_eq!(r.qualifying_start, None);
            assert!(!r.threshold_met);
        }
    }

    #[test]
    fn short_latest_interval_breaks_streak() {
        let mut history = regular();
        history.push(iv(4 * FIVE_MINUTES_MS, 30_000));
        let r = evaluate(&history, 10_000_000, &RuleThresholds::default());
        assert_eq!(r.qualifying_start, None);
        assert_eq!(r.streak_duration_ms, 0);
    }

    #[test]
    fn wide_spacing_cuts_streak() {
        // Gap between #1 and #2 starts is 5m + 1ms.
        let history = [
            iv(0, ONE_MINUTE_MS),
            iv(FIVE_MINUTES_MS + 1, ONE_MINUTE_MS),
            iv(2 * FIVE_MINUTES_MS, ONE_MINUTE_MS),
        ];
        let r = evaluate(&history, 3 * FIVE_MINUTES_MS, &RuleThresholds::default());
        assert_eq!(r.qualifying_start, Some(FIVE_MINUTES_MS + 1));
    }

    #[test]
    fn short_earlier_interval_is_excluded() {
        let history = [
            iv(0, ONE_MINUTE_MS),
            iv(FIVE_MINUTES_MS, 10_000),
            iv(2 * FIVE_MINUTES_MS, ONE_MINUTE_MS),
            iv(3 * FIVE_MINUTES_MS, ONE_MINUTE_MS),
        ];
        assert_eq!(
            streak_start_index(&history, &RuleThresholds::default()),
            Some(2)
        );
    }

    #[test]
    fn streak_grows_with_now() {
        let rules = RuleThresholds::default();
        let history = regular();
        let a = evaluate(&history, 1_000_000, &rules);
        let b = evaluate(&history, 1_000_100, &rules);
        assert_eq!(b.streak_duration_ms - a.streak_duration_ms, 100);
    }

    #[test]
    fn averages_cover_whole_session() {
        // Streak is only the last interval, averages still use all three.
        let history = [
            iv(0, 10_000),
            iv(60_000, 20_000),
            iv(600_000, ONE_MINUTE_MS),
        ];
        let rules = RuleThresholds::default();
        let r = evaluate(&history, 700_000, &rules);
        assert_eq!(r.qualifying_start, Some(600_000));
        assert_eq!(r.avg_interval_ms, Some(300_000.0));
        assert_eq!(r.avg_duration_ms, Some(30_000.0));

        let b = badges(&r, &rules);
        assert!(b.frequency);
        assert!(!b.duration);
        assert!(!b.ongoing);
        assert!(!b.all());
    }

    #[test]
    fn all_badges_on_sustained_pattern() {
        let rules = RuleThresholds::default();
        let history: Vec<Interval> = (0..13)
            .map(|i| iv(i * FIVE_MINUTES_MS, ONE_MINUTE_MS))
            .collect();
        let r = evaluate(&history, ONE_HOUR_MS + ONE_MINUTE_MS, &rules);
        assert!(badges(&r, &rules).all());
    }

    #[test]
    fn extreme_timestamps_saturate() {
        let rules = RuleThresholds::default();
        let history = [
            iv(-9_000_000_000_000_000_000, ONE_MINUTE_MS),
            iv(9_000_000_000_000_000_000, ONE_MINUTE_MS),
            iv(9_000_000_000_000_000_000, ONE_MINUTE_MS),
        ];
        let r = evaluate(&history, i64::MIN, &rules);
        assert_eq!(r.qualifying_start, Some(9_000_000_000_000_000_000));
        assert_eq!(r.streak_duration_ms, 0);
        assert!(r.avg_interval_ms.is_some_and(f64::is_finite));
        assert_eq!(r.avg_duration_ms, Some(ONE_MINUTE_MS as f64));
    }

    #[test]
    fn validate_rejects_non_positive() {
        let rules = RuleThresholds {
            sustain_ms: 0,
            ..RuleThresholds::default()
        };
        assert!(rules.validate().is_err());
    }
}
