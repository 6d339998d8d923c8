//! The value color scale: a 4-stop piecewise-linear ramp from cool to hot.

use crate::profile::ChartRecord;

/// Palette stops, smallest value to largest.
const STOP_COLORS: [Rgb; 4] = [
    Rgb::new(0x46, 0xaf, 0xe3), // blue
    Rgb::new(0x6b, 0x7a, 0xbb), // slate
    Rgb::new(0xdf, 0x80, 0xff), // violet
    Rgb::new(0xeb, 0x53, 0x68), // red
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Scale each channel by `0.7^k`. Positive `k` darkens, negative
    /// brightens (saturating at white).
    pub fn darker(self, k: f64) -> Rgb {
        let f = 0.7f64.powf(k);
        let scale = |c: u8| ((c as f64) * f).round().clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Linear value → color mapping with stops at `min`, `min + 25%`,
/// `min + 75%` and `max` of the domain. Inputs outside the domain clamp to
/// the end stops.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    domain: [f64; 4],
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            domain: [min, lerp(min, max, 0.25), lerp(min, max, 0.75), max],
        }
    }

    /// Scale spanning a dataset's min and max values. An empty dataset
    /// collapses to a degenerate domain, which is still safe to sample.
    pub fn for_records(records: &[ChartRecord]) -> Self {
        let min = records.iter().map(|r| r.value).min().unwrap_or(0);
        let max = records.iter().map(|r| r.value).max().unwrap_or(0);
        Self::new(min as f64, max as f64)
    }

    pub fn color(&self, v: f64) -> Rgb {
        // Degenerate domain (single record, or all values equal): pin to
        // the first stop rather than divide by zero.
        if !(self.domain[3] > self.domain[0]) {
            return STOP_COLORS[0];
        }
        if !(v > self.domain[0]) {
            return STOP_COLORS[0];
        }
        if v >= self.domain[3] {
            return STOP_COLORS[3];
        }

        for i in 0..3 {
            let (d0, d1) = (self.domain[i], self.domain[i + 1]);
            if v < d1 {
                if !(d1 > d0) {
                    return STOP_COLORS[i];
                }
                let t = (v - d0) / (d1 - d0);
                return lerp_rgb(STOP_COLORS[i], STOP_COLORS[i + 1], t);
            }
        }
        STOP_COLORS[3]
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let ch = |x: u8, y: u8| lerp(x as f64, y as f64, t).round().clamp(0.0, 255.0) as u8;
    Rgb::new(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: u32) -> ChartRecord {
        ChartRecord {
            value,
            display: format!("{value}ms"),
            label: "host".to_string(),
        }
    }

    #[test]
    fn endpoints_map_to_end_stops() {
        let scale = ColorScale::new(1.0, 9.0);
        assert_eq!(scale.color(1.0), STOP_COLORS[0]);
        assert_eq!(scale.color(9.0), STOP_COLORS[3]);
    }

    #[test]
    fn out_of_domain_inputs_clamp() {
        let scale = ColorScale::new(1.0, 9.0);
        assert_eq!(scale.color(-5.0), STOP_COLORS[0]);
        assert_eq!(scale.color(99.0), STOP_COLORS[3]);
    }

    #[test]
    fn interior_stops_land_exactly() {
        let scale = ColorScale::new(0.0, 100.0);
        assert_eq!(scale.color(25.0), STOP_COLORS[1]);
        assert_eq!(scale.color(75.0), STOP_COLORS[2]);
    }

    #[test]
    fn midpoints_interpolate_between_neighbor_stops() {
        let scale = ColorScale::new(0.0, 100.0);
        let mid = scale.color(50.0);
        assert_eq!(mid, lerp_rgb(STOP_COLORS[1], STOP_COLORS[2], 0.5));
    }

    #[test]
    fn degenerate_domain_pins_to_the_first_stop() {
        let scale = ColorScale::new(5.0, 5.0);
        assert_eq!(scale.color(5.0), STOP_COLORS[0]);
        assert_eq!(scale.color(0.0), STOP_COLORS[0]);

        let single = ColorScale::for_records(&[record(7)]);
        assert_eq!(single.color(7.0), STOP_COLORS[0]);
    }

    #[test]
    fn empty_dataset_is_safe_to_sample() {
        let scale = ColorScale::for_records(&[]);
        assert_eq!(scale.color(0.0), STOP_COLORS[0]);
        assert_eq!(scale.color(1.0), STOP_COLORS[0]);
    }

    #[test]
    fn dataset_scale_spans_min_to_max() {
        let scale = ColorScale::for_records(&[record(3), record(1), record(9)]);
        assert_eq!(scale.color(1.0), STOP_COLORS[0]);
        assert_eq!(scale.color(9.0), STOP_COLORS[3]);
    }

    #[test]
    fn css_formatting_and_darkening() {
        let c = Rgb::new(0x46, 0xaf, 0xe3);
        assert_eq!(c.to_css(), "#46afe3");

        let darker = c.darker(1.0);
        assert!(darker.r < c.r && darker.g < c.g && darker.b < c.b);

        let barely = c.darker(0.1);
        assert!(barely.r <= c.r && barely.r > darker.r);

        let brighter = Rgb::new(200, 200, 200).darker(-10.0);
        assert_eq!(brighter, Rgb::new(255, 255, 255));
    }
}
