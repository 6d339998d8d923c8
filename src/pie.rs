//! Pie-slice geometry, independent of any rendering surface.
//!
//! Angles are radians measured from 12 o'clock, increasing clockwise; a
//! full layout spans `0..2π`. Screen coordinates are y-down, so a point at
//! angle `a` and radius `r` sits at `(r·sin a, -r·cos a)` from the center.

use std::f64::consts::{PI, TAU};

/// Inner hole radius as a fraction of the chart radius.
pub const INNER_RADIUS_RATIO: f64 = 0.3;
/// Outer arc radius as a fraction of the chart radius.
pub const OUTER_RADIUS_RATIO: f64 = 0.95;
/// Slices narrower than this get no label text.
pub const LABEL_MIN_ANGLE: f64 = PI * 0.03;

/// One wedge of the pie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

impl PieSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Lay weights out as pie slices, preserving input order.
///
/// A non-positive or non-finite total pins every slice to zero width at
/// angle 0 instead of propagating NaN angles; the chart then renders empty.
pub fn pie_layout(weights: &[f64]) -> Vec<PieSlice> {
    let total: f64 = weights.iter().copied().filter(|w| *w > 0.0).sum();
    if !(total > 0.0) || !total.is_finite() {
        return weights
            .iter()
            .map(|&w| PieSlice {
                start_angle: 0.0,
                end_angle: 0.0,
                value: w,
            })
            .collect();
    }

    let mut angle = 0.0;
    weights
        .iter()
        .map(|&w| {
            let sweep = if w > 0.0 { w / total * TAU } else { 0.0 };
            let slice = PieSlice {
                start_angle: angle,
                end_angle: angle + sweep,
                value: w,
            };
            angle += sweep;
            slice
        })
        .collect()
}

/// Weights for the opening frame of the chart animation: the first slice
/// alone fills the circle, every other slice starts collapsed, and the
/// whole chart tweens from there to the true proportions.
pub fn opening_weights(n: usize) -> Vec<f64> {
    (0..n).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect()
}

/// Centroid of a slice's annular sector: the midpoint angle at the mid
/// radius. This anchors labels and the hover tooltip.
pub fn centroid(slice: PieSlice, inner_radius: f64, outer_radius: f64) -> (f64, f64) {
    let a = slice.mid_angle();
    let r = (inner_radius + outer_radius) / 2.0;
    (r * a.sin(), -r * a.cos())
}

/// Interpolate slice angles for one tween step. The value carried is the
/// target's, so hit tests during the animation report final-layout values.
pub fn lerp_slice(from: PieSlice, to: PieSlice, t: f64) -> PieSlice {
    PieSlice {
        start_angle: from.start_angle + (to.start_angle - from.start_angle) * t,
        end_angle: from.end_angle + (to.end_angle - from.end_angle) * t,
        value: to.value,
    }
}

/// Hit-test a point (relative to the chart center) against the annulus.
/// Returns the index of the slice whose sector contains the point.
pub fn slice_at(
    slices: &[PieSlice],
    inner_radius: f64,
    outer_radius: f64,
    x: f64,
    y: f64,
) -> Option<usize> {
    let r = x.hypot(y);
    if r < inner_radius || r > outer_radius {
        return None;
    }

    let mut angle = x.atan2(-y);
    if angle < 0.0 {
        angle += TAU;
    }

    slices
        .iter()
        .position(|s| s.sweep() > 0.0 && angle >= s.start_angle && angle < s.end_angle)
}

/// Label font scale for a slice: proportional to its angular width, with a
/// floor of 0.5 and a ceiling of 1.0 (reached at a quarter circle).
pub fn label_scale(slice: PieSlice) -> f64 {
    let ratio = (slice.sweep() / (PI / 2.0)).min(1.0);
    (50.0 + 50.0 * ratio).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn sweep_is_proportional_to_weight() {
        let slices = pie_layout(&[1.0, 3.0]);
        assert_close(slices[1].sweep(), 3.0 * slices[0].sweep());
        assert_close(slices[0].start_angle, 0.0);
        assert_close(slices[1].end_angle, TAU);
    }

    #[test]
    fn layout_preserves_input_order() {
        let slices = pie_layout(&[2.0, 5.0, 1.0]);
        assert_close(slices[0].value, 2.0);
        assert_close(slices[1].value, 5.0);
        assert_close(slices[2].value, 1.0);
        for pair in slices.windows(2) {
            assert_close(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn zero_total_yields_zero_width_slices() {
        for slice in pie_layout(&[0.0, 0.0]) {
            assert_close(slice.sweep(), 0.0);
            assert!(slice.start_angle.is_finite());
        }
        assert!(pie_layout(&[]).is_empty());
    }

    #[test]
    fn opening_layout_gives_the_circle_to_the_first_slice() {
        let slices = pie_layout(&opening_weights(4));
        assert_close(slices[0].sweep(), TAU);
        for slice in &slices[1..] {
            assert_close(slice.sweep(), 0.0);
        }
    }

    #[test]
    fn centroid_sits_at_mid_angle_mid_radius() {
        // Top-right half circle: mid angle π/2 points right.
        let slice = PieSlice {
            start_angle: 0.0,
            end_angle: PI,
            value: 1.0,
        };
        let (x, y) = centroid(slice, 30.0, 95.0);
        assert_close(x, 62.5);
        assert_close(y, 0.0);
    }

    #[test]
    fn hit_test_maps_points_to_slices() {
        let slices = pie_layout(&[1.0, 1.0]);
        // Right half belongs to slice 0, left half to slice 1.
        assert_eq!(slice_at(&slices, 30.0, 95.0, 60.0, 0.0), Some(0));
        assert_eq!(slice_at(&slices, 30.0, 95.0, -60.0, 0.0), Some(1));
        // Straight up is angle 0, the first slice's start.
        assert_eq!(slice_at(&slices, 30.0, 95.0, 0.0, -60.0), Some(0));
    }

    #[test]
    fn hit_test_respects_the_annulus() {
        let slices = pie_layout(&[1.0]);
        assert_eq!(slice_at(&slices, 30.0, 95.0, 0.0, -10.0), None);
        assert_eq!(slice_at(&slices, 30.0, 95.0, 0.0, -100.0), None);
        assert_eq!(slice_at(&slices, 30.0, 95.0, 0.0, -60.0), Some(0));
    }

    #[test]
    fn hit_test_skips_collapsed_slices() {
        let slices = pie_layout(&opening_weights(3));
        assert_eq!(slice_at(&slices, 30.0, 95.0, 0.0, -60.0), Some(0));
    }

    #[test]
    fn lerp_moves_angles_toward_the_target() {
        let from = PieSlice {
            start_angle: 0.0,
            end_angle: TAU,
            value: 1.0,
        };
        let to = PieSlice {
            start_angle: 0.0,
            end_angle: PI,
            value: 7.0,
        };
        let mid = lerp_slice(from, to, 0.5);
        assert_close(mid.end_angle, 1.5 * PI);
        assert_close(mid.value, 7.0);
        let done = lerp_slice(from, to, 1.0);
        assert_close(done.end_angle, PI);
    }

    #[test]
    fn label_scale_floors_and_saturates() {
        let narrow = PieSlice {
            start_angle: 0.0,
            end_angle: 0.001,
            value: 1.0,
        };
        let quarter = PieSlice {
            start_angle: 0.0,
            end_angle: PI / 2.0,
            value: 1.0,
        };
        let half = PieSlice {
            start_angle: 0.0,
            end_angle: PI,
            value: 1.0,
        };
        assert_close(label_scale(narrow), 0.5);
        assert_close(label_scale(quarter), 1.0);
        assert_close(label_scale(half), 1.0);
        let eighth = PieSlice {
            start_angle: 0.0,
            end_angle: PI / 4.0,
            value: 1.0,
        };
        assert_close(label_scale(eighth), 0.75);
    }
}
