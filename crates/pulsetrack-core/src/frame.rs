//! One tick's worth of derived data.
//!
//! The host calls [`Frame::compute`] every time its tick source fires. All
//! four transforms run from scratch against the current session snapshot;
//! nothing is carried over from the previous frame.

use serde::{Deserialize, Serialize};

use crate::curve::CurvePath;
use crate::layout::{build_layout, Layout};
use crate::rules::{badges, evaluate, RuleBadges, StreakResult};
use crate::session::{Session, SessionStats};
use crate::storage::Config;
use crate::viewport::pan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub now: i64,
    pub layout: Layout,
    /// Sampled curve for each bump segment, in segment order.
    pub curves: Vec<CurvePath>,
    pub streak: StreakResult,
    pub badges: RuleBadges,
    pub pan_offset: f64,
    pub stats: SessionStats,
}

impl Frame {
    /// Recompute everything at `now`.
    ///
    /// `viewport_width` is the measured width of the host's viewport; when
    /// `None` the configured fixed width is used, and failing that no pan
    /// is applied.
    pub fn compute(
        session: &Session,
        now: i64,
        config: &Config,
        viewport_width: Option<f64>,
    ) -> Self {
        let layout = build_layout(
            session.intervals(),
            session.in_progress(),
            now,
            session.normalized_intensity(),
            &config.layout,
        );
        let curves = layout.bump_paths(&config.layout.plot_area());

        let streak = evaluate(session.intervals(), now, &config.rules);
        let badges = badges(&streak, &config.rules);

        let pan_offset = pan(
            layout.total_extent,
            viewport_width.or(config.viewport.width),
            config.viewport.follow,
            config.layout.axis_width,
        );

        Self {
            now,
            layout,
            curves,
            streak,
            badges,
            pan_offset,
            stats: session.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{InProgress, Interval};
    use crate::session::TrackerState;

    #[test]
    fn empty_session_frame() {
        let frame = Frame::compute(&Session::new(), 1_000, &Config::default(), Some(400.0));
        assert_eq!(frame.layout.segments.len(), 2);
        assert!(frame.curves.is_empty());
        assert_eq!(frame.streak.qualifying_start, None);
        assert_eq!(frame.badges, RuleBadges::default());
        assert_eq!(frame.pan_offset, 0.0);
        assert_eq!(frame.stats.count, 0);
    }

    #[test]
    fn active_interval_grows_between_ticks() {
        let mut session = Session::new();
        session.begin(0);
        let config = Config::default();
        let a = Frame::compute(&session, 30_000, &config, None);
        let b = Frame::compute(&session, 60_000, &config, None);
        assert!(b.layout.total_extent > a.layout.total_extent);
        assert_eq!(b.curves.len(), 1);
    }

    #[test]
    fn follow_pans_long_timelines() {
        let mut session = Session::new();
        for i in 0..5 {
            session.begin(i * 300_000);
            session.end(i * 300_000 + 60_000);
        }
        let config = Config::default();
        let frame = Frame::compute(&session, 1_500_000, &config, Some(300.0));
        assert_eq!(frame.pan_offset, 300.0 - frame.layout.total_extent);

        let mut fixed = Config::default();
        fixed.viewport.follow = false;
        let frame = Frame::compute(&session, 1_500_000, &fixed, Some(300.0));
        assert_eq!(frame.pan_offset, 0.0);
    }

    #[test]
    fn configured_width_used_when_unmeasured() {
        let mut session = Session::new();
        session.begin(0);
        session.end(600_000);
        let mut config = Config::default();
        config.viewport.width = Some(500.0);
        let frame = Frame::compute(&session, 700_000, &config, None);
        assert_eq!(frame.pan_offset, 500.0 - frame.layout.total_extent);
    }

    #[test]
    fn extreme_timestamps_compute_without_overflow() {
        let record = |start: i64| Interval {
            id: start.to_string(),
            start,
            end: start + 60_000,
            duration_ms: 60_000,
            intensity: 0.5,
        };
        let session = Session::from_parts(
            vec![
                record(-9_000_000_000_000_000_000),
                record(9_000_000_000_000_000_000),
            ],
            TrackerState {
                in_progress: Some(InProgress {
                    started_at: i64::MIN,
                }),
                intensity: 5,
            },
        );
        let frame = Frame::compute(&session, 0, &Config::default(), Some(400.0));
        assert_eq!(frame.layout.segments.len(), 7);
        assert!(frame.layout.total_extent.is_finite());
        assert!(frame.pan_offset.is_finite());
        assert_eq!(frame.stats.last_interval_ms, Some(i64::MAX));
        assert_eq!(frame.streak.avg_interval_ms, Some(i64::MAX as f64));
    }
}
