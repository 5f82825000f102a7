//! Timeline layout: turns the interval history into positioned segments.
//!
//! The timeline alternates gap segments (idle time) and bump segments (one
//! per interval), framed by a fixed lead-in and trailing margin. Widths are
//! proportional to elapsed time but never drop below a per-kind minimum.
//!
//! ```text
//! | lead | bump | gap | bump | gap | bump* | trail |
//! ^origin                                          ^total_extent
//! ```
//!
//! `*` marks the in-progress bump, drawn with the current intensity level.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::{build_path, CurvePath, PlotArea};
use crate::error::ValidationError;
use crate::interval::{InProgress, Interval};

/// Fixed geometry of the timeline, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width reserved on the left for the vertical axis.
    #[serde(default = "default_axis_width")]
    pub axis_width: f64,
    /// Spacing between the axis and the first content.
    #[serde(default = "default_inset")]
    pub inset: f64,
    #[serde(default = "default_lead_width")]
    pub lead_width: f64,
    #[serde(default = "default_trail_width")]
    pub trail_width: f64,
    #[serde(default = "default_min_gap_px")]
    pub min_gap_px: f64,
    #[serde(default = "default_min_bump_px")]
    pub min_bump_px: f64,
    #[serde(default = "default_px_per_second")]
    pub px_per_second: f64,
    /// Vertical extent of the drawing area.
    #[serde(default = "default_plot_height")]
    pub plot_height: f64,
    #[serde(default = "default_top_padding")]
    pub top_padding: f64,
}

fn default_axis_width() -> f64 {
    48.0
}
fn default_inset() -> f64 {
    12.0
}
fn default_lead_width() -> f64 {
    60.0
}
fn default_trail_width() -> f64 {
    40.0
}
fn default_min_gap_px() -> f64 {
    24.0
}
fn default_min_bump_px() -> f64 {
    28.0
}
fn default_px_per_second() -> f64 {
    2.0
}
fn default_plot_height() -> f64 {
    160.0
}
fn default_top_padding() -> f64 {
    16.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis_width: default_axis_width(),
            inset: default_inset(),
            lead_width: default_lead_width(),
            trail_width: default_trail_width(),
            min_gap_px: default_min_gap_px(),
            min_bump_px: default_min_bump_px(),
            px_per_second: default_px_per_second(),
            plot_height: default_plot_height(),
            top_padding: default_top_padding(),
        }
    }
}

impl LayoutConfig {
    /// x position of the lead-in gap.
    pub fn origin(&self) -> f64 {
        self.axis_width + self.inset - self.lead_width
    }

    pub fn seconds_to_pixels(&self, ms: i64) -> f64 {
        (ms as f64 / 1000.0) * self.px_per_second
    }

    /// Baseline at the bottom of the plot, growing upward.
    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            baseline: self.plot_height,
            height: self.plot_height,
            top_padding: self.top_padding,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("layout.axis_width", self.axis_width),
            ("layout.inset", self.inset),
            ("layout.lead_width", self.lead_width),
            ("layout.trail_width", self.trail_width),
            ("layout.min_gap_px", self.min_gap_px),
            ("layout.min_bump_px", self.min_bump_px),
            ("layout.plot_height", self.plot_height),
            ("layout.top_padding", self.top_padding),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::invalid(
                    field,
                    format!("must be a finite non-negative number, got {value}"),
                ));
            }
        }
        if !self.px_per_second.is_finite() || self.px_per_second <= 0.0 {
            return Err(ValidationError::invalid(
                "layout.px_per_second",
                format!("must be positive, got {}", self.px_per_second),
            ));
        }
        Ok(())
    }
}

/// One layout primitive. Position and width are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Gap {
        x: f64,
        width: f64,
        /// Idle time represented, absent for the lead-in and trailing margins.
        label_ms: Option<i64>,
    },
    Bump {
        x: f64,
        width: f64,
        intensity: f64,
        /// Set on the bump of the interval still in progress.
        active: bool,
        reveal_fraction: f64,
    },
}

impl Segment {
    pub fn x(&self) -> f64 {
        match self {
            Segment::Gap { x, .. } | Segment::Bump { x, .. } => *x,
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            Segment::Gap { width, .. } | Segment::Bump { width, .. } => *width,
        }
    }

    pub fn is_bump(&self) -> bool {
        matches!(self, Segment::Bump { .. })
    }

    /// Human-readable gap label, e.g. `4m 05s`.
    pub fn label(&self) -> Option<String> {
        match self {
            Segment::Gap {
                label_ms: Some(ms), ..
            } => Some(format_duration_label(*ms)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub segments: Vec<Segment>,
    /// x position of the first segment.
    pub origin: f64,
    /// Cursor position after the last segment.
    pub total_extent: f64,
}

impl Layout {
    /// Sampled curve for every bump, in segment order.
    pub fn bump_paths(&self, plot: &PlotArea) -> Vec<CurvePath> {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Bump {
                    x,
                    width,
                    intensity,
                    reveal_fraction,
                    ..
                } => Some(build_path(*x, *width, *intensity, *reveal_fraction, plot)),
                Segment::Gap { .. } => None,
            })
            .collect()
    }
}

struct Cursor {
    x: f64,
    segments: Vec<Segment>,
}

impl Cursor {
    fn gap(&mut self, width: f64, label_ms: Option<i64>) {
        self.segments.push(Segment::Gap {
            x: self.x,
            width,
            label_ms,
        });
        self.x += width;
    }

    fn bump(&mut self, width: f64, intensity: f64, active: bool) {
        self.segments.push(Segment::Bump {
            x: self.x,
            width,
            intensity,
            active,
            reveal_fraction: 1.0,
        });
        self.x += width;
    }
}

/// Lay out recorded intervals plus the optional in-progress one.
///
/// `intensity` is the current normalized intensity, used only for the
/// in-progress bump since its level is not fixed until it ends.
pub fn build_layout(
    intervals: &[Interval],
    in_progress: Option<InProgress>,
    now: i64,
    intensity: f64,
    config: &LayoutConfig,
) -> Layout {
    let origin = config.origin();
    let mut cursor = Cursor {
        x: origin,
        segments: Vec::with_capacity(intervals.len() * 2 + 4),
    };
    let gap_width = |ms: i64| config.min_gap_px.max(config.seconds_to_pixels(ms));
    let bump_width = |ms: i64| config.min_bump_px.max(config.seconds_to_pixels(ms));

    cursor.gap(config.lead_width, None);

    let mut prev_end: Option<i64> = None;
    for interval in intervals {
        if let Some(end) = prev_end {
            let idle = interval.start.saturating_sub(end);
            cursor.gap(gap_width(idle), Some(idle));
        }
        cursor.bump(bump_width(interval.duration_ms), interval.intensity, false);
        prev_end = Some(interval.end);
    }

    if let Some(open) = in_progress {
        if let Some(end) = prev_end {
            let idle = open.started_at.saturating_sub(end);
            cursor.gap(gap_width(idle), Some(idle));
        }
        cursor.bump(bump_width(open.elapsed_ms(now)), intensity, true);
    }

    cursor.gap(config.trail_width, None);

    debug!(
        segments = cursor.segments.len(),
        total_extent = cursor.x,
        "layout rebuilt"
    );

    Layout {
        segments: cursor.segments,
        origin,
        total_extent: cursor.x,
    }
}

/// Format a millisecond span as `{m}m {ss}s`, or `{s}s` under a minute.
pub fn format_duration_label(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    let (m, s) = (secs / 60, secs % 60);
    if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}
