//! Sampling of the cubic Bezier chain produced by the spline stage

use std::iter::StepBy;
use std::slice::Windows;

use crate::types::GeoPoint;

/// Cubic segments of a `3N - 2` control polygon.
///
/// Yields the windows `[0..4]`, `[3..7]`, `[6..10]`, ...; consecutive
/// segments share their boundary anchor.
pub struct CubicSegments<'a> {
    windows: StepBy<Windows<'a, GeoPoint>>,
}

impl<'a> CubicSegments<'a> {
    pub fn new(control: &'a [GeoPoint]) -> Self {
        Self {
            windows: control.windows(4).step_by(3),
        }
    }
}

impl<'a> Iterator for CubicSegments<'a> {
    type Item = [&'a GeoPoint; 4];

    fn next(&mut self) -> Option<Self::Item> {
        self.windows
            .next()
            .map(|w| [&w[0], &w[1], &w[2], &w[3]])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

/// Samples `samples_per_segment` interior points on every cubic segment.
///
/// Each segment contributes its start anchor verbatim followed by samples at
/// `t = j / (K + 1)` for `j = 1..=K`, so anchors are never duplicated. The
/// final anchor is appended once at the end. Samples interpolate latitude
/// and longitude only and carry altitude 0. Fewer than four control points
/// are returned unchanged.
pub fn interpolate_bezier(control: &[GeoPoint], samples_per_segment: usize) -> Vec<GeoPoint> {
    if control.len() < 4 {
        return control.to_vec();
    }

    let segments = CubicSegments::new(control);
    let mut out = Vec::with_capacity(segments.size_hint().0 * (samples_per_segment + 1) + 1);
    let step = 1.0 / (samples_per_segment as f64 + 1.0);

    for [a, b, c, d] in segments {
        out.push(a.clone());
        for j in 1..=samples_per_segment {
            out.push(cubic_point(a, b, c, d, j as f64 * step));
        }
    }

    if let Some(last) = control.last() {
        out.push(last.clone());
    }

    log::debug!("bezier: {} control points -> {} samples", control.len(), out.len());
    out
}

/// de Casteljau evaluation of one cubic segment
fn cubic_point(a: &GeoPoint, b: &GeoPoint, c: &GeoPoint, d: &GeoPoint, t: f64) -> GeoPoint {
    let ab = lerp(a, b, t);
    let bc = lerp(b, c, t);
    let cd = lerp(c, d, t);
    let abbc = lerp(&ab, &bc, t);
    let bccd = lerp(&bc, &cd, t);
    lerp(&abbc, &bccd, t)
}

fn lerp(a: &GeoPoint, b: &GeoPoint, t: f64) -> GeoPoint {
    a.derived(
        a.latitude + (b.latitude - a.latitude) * t,
        a.longitude + (b.longitude - a.longitude) * t,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::spline::{cardinal_control_points, DEFAULT_TENSION};
    use approx::assert_abs_diff_eq;

    fn anchors() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(47.123456789, 8.987654321, 410.5).in_section("A"),
            GeoPoint::new(47.124, 8.99, 411.0).in_section("A"),
            GeoPoint::new(47.1261, 8.9912, 412.25).in_section("A"),
            GeoPoint::new(47.1287, 8.9908, 413.0).in_section("A"),
        ]
    }

    #[test]
    fn test_segments_stride_three() {
        let control = cardinal_control_points(&anchors(), DEFAULT_TENSION);
        let segments: Vec<_> = CubicSegments::new(&control).collect();

        assert_eq!(segments.len(), 3);
        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg[0], &control[3 * i]);
            assert_eq!(seg[3], &control[3 * i + 3]);
        }
    }

    #[test]
    fn test_anchors_reproduced_exactly() {
        let points = anchors();
        let control = cardinal_control_points(&points, DEFAULT_TENSION);
        let k = 7;

        let out = interpolate_bezier(&control, k);

        assert_eq!(out.len(), (points.len() - 1) * (k + 1) + 1);
        for (i, p) in points.iter().enumerate() {
            let sample = &out[i * (k + 1)];
            assert_eq!(sample.latitude.to_bits(), p.latitude.to_bits());
            assert_eq!(sample.longitude.to_bits(), p.longitude.to_bits());
            assert_eq!(sample.altitude, p.altitude);
        }
    }

    #[test]
    fn test_samples_exclude_segment_ends() {
        let points = vec![GeoPoint::new(0.0, 0.0, 0.0), GeoPoint::new(1.0, 0.0, 0.0)];
        let control = cardinal_control_points(&points, DEFAULT_TENSION);

        let out = interpolate_bezier(&control, 1);

        // one sample at t = 1/2 of a straight segment
        assert_eq!(out.len(), 3);
        assert_abs_diff_eq!(out[1].latitude, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1].longitude, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_samples_are_monotonic_on_straight_line() {
        let points: Vec<_> = (0..5).map(|i| GeoPoint::new(i as f64 * 0.001, 0.0, 0.0)).collect();
        let control = cardinal_control_points(&points, DEFAULT_TENSION);

        let out = interpolate_bezier(&control, 10);

        for pair in out.windows(2) {
            assert!(pair[1].latitude > pair[0].latitude);
            assert_eq!(pair[1].longitude, 0.0);
        }
    }

    #[test]
    fn test_interpolated_altitude_is_zero() {
        let control = cardinal_control_points(&anchors(), DEFAULT_TENSION);
        let out = interpolate_bezier(&control, 3);

        assert_eq!(out[1].altitude, 0.0);
        assert_eq!(out[1].section, "A");
    }

    #[test]
    fn test_short_control_unchanged() {
        let short = vec![GeoPoint::new(0.0, 0.0, 0.0); 3];
        assert_eq!(interpolate_bezier(&short, 60), short);
    }
}
