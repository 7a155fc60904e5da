//! Cumulative along-section distance

use crate::geodesy::GeodeticCalculator;
use crate::types::GeoPoint;

/// Returns `points` with `chainage` set: 0 at the first point, then the
/// running sum of geodesic distances between neighbours.
///
/// Call once per section; chainage never carries over between sections.
pub fn assign_chainage(points: &[GeoPoint], calc: &GeodeticCalculator) -> Vec<GeoPoint> {
    let mut chainage = 0.0;
    let mut previous: Option<&GeoPoint> = None;

    points
        .iter()
        .map(|point| {
            if let Some(prev) = previous {
                chainage += prev.distance_to(point, calc);
            }
            previous = Some(point);
            point.clone().with_chainage(chainage)
        })
        .collect()
}
