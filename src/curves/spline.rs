//! Cardinal spline to cubic Bezier control points

use crate::types::GeoPoint;

/// Default cardinal spline tension
pub const DEFAULT_TENSION: f64 = 0.5;

/// Builds the Bezier control polygon of a cardinal spline through `points`.
///
/// The result has `3N - 2` entries laid out as
/// `[P0, C0+, C1-, P1, C1+, ..., C(N-1)-, P(N-1)]`, so every window of four
/// starting at a multiple of three is one cubic segment between two anchors.
/// Tangents are scaled by `tension / 3`. End tangents are one-sided; interior
/// tangents use the chord between the two neighbours.
///
/// Control points copy the altitude of their anchor. Inputs shorter than two
/// points are returned unchanged.
pub fn cardinal_control_points(points: &[GeoPoint], tension: f64) -> Vec<GeoPoint> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }

    let t = tension / 3.0;
    let mut control = Vec::with_capacity(3 * n - 2);

    control.push(points[0].clone());
    control.push(end_control(&points[0], &points[1], t));

    for window in points.windows(3) {
        let (prev, anchor, next) = (&window[0], &window[1], &window[2]);
        let d_lat = next.latitude - prev.latitude;
        let d_lon = next.longitude - prev.longitude;

        control.push(anchor.derived(
            anchor.latitude - t * d_lat,
            anchor.longitude - t * d_lon,
            anchor.altitude,
        ));
        control.push(anchor.clone());
        control.push(anchor.derived(
            anchor.latitude + t * d_lat,
            anchor.longitude + t * d_lon,
            anchor.altitude,
        ));
    }

    control.push(end_control(&points[n - 1], &points[n - 2], t));
    control.push(points[n - 1].clone());

    debug_assert_eq!(control.len(), 3 * n - 2);
    control
}

/// Control point next to an end anchor, pulled towards its only neighbour
fn end_control(end: &GeoPoint, adjacent: &GeoPoint, t: f64) -> GeoPoint {
    end.derived(
        end.latitude + t * (adjacent.latitude - end.latitude),
        end.longitude + t * (adjacent.longitude - end.longitude),
        end.altitude,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(i as f64 * 0.01, (i * i) as f64 * 0.001, i as f64).in_section("L"))
            .collect()
    }

    #[test]
    fn test_length_is_3n_minus_2() {
        for n in [2, 3, 5, 17] {
            assert_eq!(cardinal_control_points(&line(n), DEFAULT_TENSION).len(), 3 * n - 2);
        }
    }

    #[test]
    fn test_anchors_at_multiples_of_three() {
        let points = line(6);
        let control = cardinal_control_points(&points, DEFAULT_TENSION);

        for (i, p) in points.iter().enumerate() {
            assert_eq!(&control[3 * i], p);
        }
    }

    #[test]
    fn test_short_input_unchanged() {
        let one = line(1);
        assert_eq!(cardinal_control_points(&one, DEFAULT_TENSION), one);
        assert!(cardinal_control_points(&[], DEFAULT_TENSION).is_empty());
    }

    #[test]
    fn test_interior_control_points() {
        let points = vec![
            GeoPoint::new(0.0, 0.0, 1.0),
            GeoPoint::new(1.0, 1.0, 2.0),
            GeoPoint::new(3.0, 0.0, 3.0),
        ];
        let control = cardinal_control_points(&points, 0.6);
        let t = 0.2;

        // before and after P1, along P2 - P0 = (3, 0)
        assert_abs_diff_eq!(control[2].latitude, 1.0 - t * 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(control[2].longitude, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(control[4].latitude, 1.0 + t * 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(control[4].longitude, 1.0, epsilon = 1e-12);
        assert_eq!(control[2].altitude, 2.0);
        assert_eq!(control[4].altitude, 2.0);
    }

    #[test]
    fn test_end_control_points() {
        let points = vec![GeoPoint::new(0.0, 0.0, 5.0), GeoPoint::new(3.0, 6.0, 7.0)];
        let control = cardinal_control_points(&points, 0.75);
        let t = 0.25;

        assert_abs_diff_eq!(control[1].latitude, t * 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(control[1].longitude, t * 6.0, epsilon = 1e-12);
        assert_eq!(control[1].altitude, 5.0);

        assert_abs_diff_eq!(control[2].latitude, 3.0 - t * 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(control[2].longitude, 6.0 - t * 6.0, epsilon = 1e-12);
        assert_eq!(control[2].altitude, 7.0);
    }

    #[test]
    fn test_control_points_keep_section() {
        let control = cardinal_control_points(&line(4), DEFAULT_TENSION);
        assert!(control.iter().all(|p| p.section == "L"));
        assert!(control.iter().all(|p| p.chainage.is_none()));
    }
}
