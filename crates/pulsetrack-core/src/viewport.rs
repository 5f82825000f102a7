//! Horizontal pan offset that keeps the newest content in view.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Keep the latest segment aligned to the right edge.
    #[serde(default = "default_follow")]
    pub follow: bool,
    /// Fixed viewport width for hosts that cannot measure one.
    #[serde(default)]
    pub width: Option<f64>,
}

fn default_follow() -> bool {
    true
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            follow: default_follow(),
            width: None,
        }
    }
}

/// Offset (always `<= 0`) to translate the timeline by.
///
/// With `follow` off the content is not panned and the host scrolls natively.
/// With `follow` on, the right end of the content is aligned to the right edge
/// of the viewport, without ever scrolling the axis region out of view. An
/// unmeasured viewport (`None`) yields no pan.
pub fn pan(total_extent: f64, viewport_width: Option<f64>, follow: bool, axis_width: f64) -> f64 {
    if !follow {
        return 0.0;
    }
    let viewport = viewport_width
        .filter(|w| w.is_finite())
        .unwrap_or(total_extent);
    let lower = -(total_extent - axis_width);
    // Upper bound wins if the two bounds cross.
    (viewport - total_extent).max(lower).min(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_follow_never_pans() {
        assert_eq!(pan(5_000.0, Some(300.0), false, 48.0), 0.0);
    }

    #[test]
    fn content_that_fits_is_not_panned() {
        assert_eq!(pan(200.0, Some(300.0), true, 48.0), 0.0);
        assert_eq!(pan(300.0, Some(300.0), true, 48.0), 0.0);
    }

    #[test]
    fn overflowing_content_aligns_right() {
        assert_eq!(pan(1_000.0, Some(300.0), true, 48.0), -700.0);
    }

    #[test]
    fn never_hides_axis() {
        // Viewport narrower than the axis would pan past it.
        assert_eq!(pan(1_000.0, Some(20.0), true, 48.0), -952.0);
    }

    #[test]
    fn unmeasured_viewport_is_zero() {
        assert_eq!(pan(1_000.0, None, true, 48.0), 0.0);
        assert_eq!(pan(1_000.0, Some(f64::NAN), true, 48.0), 0.0);
    }

    #[test]
    fn content_narrower_than_axis_stays_at_origin() {
        assert_eq!(pan(30.0, Some(10.0), true, 48.0), 0.0);
    }
}
