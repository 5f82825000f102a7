//! Amplitude curve used to draw each interval as a bump.
//!
//! The profile is a Gaussian centred on `t = 0.5`, rescaled so that both
//! endpoints sit exactly on zero and the peak is exactly one.

use serde::{Deserialize, Serialize};

/// Spread of the underlying Gaussian.
pub const SIGMA: f64 = 0.15;

/// Number of sampling steps across a full bump.
pub const PATH_STEPS: usize = 80;

fn gaussian(t: f64) -> f64 {
    let d = t - 0.5;
    (-(d * d) / (2.0 * SIGMA * SIGMA)).exp()
}

/// Normalized bump amplitude at position `t` in `[0, 1]`.
///
/// `shape(0) == 0`, `shape(1) == 0`, `shape(0.5) == 1`. Positions outside the
/// unit interval fall to zero.
pub fn shape(t: f64) -> f64 {
    let floor = gaussian(0.0);
    let peak = gaussian(0.5);
    ((gaussian(t) - floor) / (peak - floor)).max(0.0)
}

/// A point in renderer pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Vertical geometry of the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    /// y coordinate of the zero line.
    pub baseline: f64,
    /// Usable vertical extent above the baseline.
    pub height: f64,
    /// Margin kept free at the top so peaks never touch the edge.
    pub top_padding: f64,
}

impl PlotArea {
    /// Pixel height that a full-intensity peak reaches.
    pub fn scale(&self) -> f64 {
        (self.height - self.top_padding).max(0.0)
    }
}

/// Sampled bump outline plus the closed region under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    /// Open polyline following the curve.
    pub outline: Vec<Point>,
    /// Outline closed down to the baseline and back to the start.
    pub fill: Vec<Point>,
}

impl CurvePath {
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// SVG path data for the outline (`M x y L x y ...`).
    pub fn outline_svg(&self) -> String {
        svg_path(&self.outline, false)
    }

    /// SVG path data for the filled region, closed with `Z`.
    pub fn fill_svg(&self) -> String {
        svg_path(&self.fill, true)
    }
}

fn svg_path(points: &[Point], close: bool) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{cmd}{:.2},{:.2}", p.x, p.y));
    }
    if close && !points.is_empty() {
        out.push_str(" Z");
    }
    out
}

/// Sample the bump between `x0` and `x0 + width`.
///
/// Only the leading `reveal_fraction` of the curve is produced, which lets a
/// renderer grow a bump progressively. Fewer than two samples yields an empty
/// path.
pub fn build_path(
    x0: f64,
    width: f64,
    intensity: f64,
    reveal_fraction: f64,
    plot: &PlotArea,
) -> CurvePath {
    let reveal = if reveal_fraction.is_nan() {
        0.0
    } else {
        reveal_fraction.min(1.0)
    };
    let amplitude = intensity.clamp(0.0, 1.0) * plot.scale();

    let outline: Vec<Point> = (0..=PATH_STEPS)
        .map(|i| i as f64 / PATH_STEPS as f64)
        .take_while(|&t| t <= reveal)
        .map(|t| Point {
            x: x0 + t * width,
            y: plot.baseline - shape(t) * amplitude,
        })
        .collect();

    if outline.len() < 2 {
        return CurvePath::default();
    }

    let last_x = outline[outline.len() - 1].x;
    let mut fill = outline.clone();
    fill.push(Point {
        x: last_x,
        y: plot.baseline,
    });
    fill.push(Point {
        x: x0,
        y: plot.baseline,
    });

    CurvePath { outline, fill }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn plot() -> PlotArea {
        PlotArea {
            baseline: 100.0,
            height: 100.0,
            top_padding: 10.0,
        }
    }

    #[test]
    fn shape_endpoints_and_peak() {
        assert!(shape(0.0).abs() < EPS);
        assert!(shape(1.0).abs() < EPS);
        assert!((shape(0.5) - 1.0).abs() < EPS);
    }

    #[test]
    fn shape_is_symmetric() {
        for i in 0..=50 {
            let t = i as f64 / 100.0;
            assert!((shape(t) - shape(1.0 - t)).abs() < 1e-9);
        }
    }

    #[test]
    fn shape_outside_unit_interval_is_zero() {
        assert_eq!(shape(-0.2), 0.0);
        assert_eq!(shape(1.3), 0.0);
    }

    #[test]
    fn full_reveal_samples_every_step() {
        let path = build_path(10.0, 80.0, 1.0, 1.0, &plot());
        assert_eq!(path.outline.len(), PATH_STEPS + 1);
        assert_eq!(path.fill.len(), PATH_STEPS + 3);

        let first = path.outline[0];
        let last = path.outline[PATH_STEPS];
        assert!((first.x - 10.0).abs() < EPS);
        assert!((last.x - 90.0).abs() < EPS);
        assert!((first.y - 100.0).abs() < 1e-9);

        // Peak reaches baseline minus the padded scale.
        let peak = path.outline[PATH_STEPS / 2];
        assert!((peak.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn intensity_scales_amplitude() {
        let path = build_path(0.0, 80.0, 0.5, 1.0, &plot());
        let peak = path.outline[PATH_STEPS / 2];
        assert!((peak.y - 55.0).abs() < 1e-9);
    }

    #[test]
    fn partial_reveal_stops_early() {
        let path = build_path(0.0, 80.0, 1.0, 0.5, &plot());
        assert_eq!(path.outline.len(), PATH_STEPS / 2 + 1);
        let closing = path.fill[path.fill.len() - 2];
        assert!((closing.x - 40.0).abs() < EPS);
        assert_eq!(closing.y, 100.0);
        let back = path.fill[path.fill.len() - 1];
        assert_eq!(back, Point { x: 0.0, y: 100.0 });
    }

    #[test]
    fn zero_reveal_is_empty() {
        let path = build_path(0.0, 80.0, 1.0, 0.0, &plot());
        assert!(path.is_empty());
        assert!(path.fill.is_empty());
        assert_eq!(path.outline_svg(), "");
    }

    #[test]
    fn svg_output_is_closed_for_fill() {
        let path = build_path(0.0, 80.0, 1.0, 1.0, &plot());
        assert!(path.outline_svg().starts_with("M0.00,100.00 L"));
        assert!(!path.outline_svg().ends_with('Z'));
        assert!(path.fill_svg().ends_with(" Z"));
    }
}
