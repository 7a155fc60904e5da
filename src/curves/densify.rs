//! Densification of sparse survey points

use crate::error::Result;
use crate::geodesy::GeodeticCalculator;
use crate::types::GeoPoint;
use super::require_positive;

/// Inserts points so that no gap between neighbours exceeds `max_segment_length`.
///
/// Each inserted point is projected `spacing` meters from the previously
/// emitted point towards the next input point, with the bearing recomputed
/// after every insertion. Inserted points keep the altitude of the point they
/// were projected from. Insertion stops once the remaining gap is no longer
/// than `spacing`.
pub fn densify(
    points: &[GeoPoint],
    max_segment_length: f64,
    spacing: f64,
    calc: &GeodeticCalculator,
) -> Result<Vec<GeoPoint>> {
    require_positive("maxSegmentLength", max_segment_length)?;
    require_positive("densifySpacing", spacing)?;

    let mut densified = Vec::with_capacity(points.len());
    let mut prev: Option<GeoPoint> = None;

    for point in points {
        if let Some(mut last) = prev.take() {
            let mut remaining = last.distance_to(point, calc);

            while remaining > max_segment_length && remaining > spacing {
                let bearing = last.bearing_to(point, calc);
                let mut inserted = last.project(bearing, spacing, calc);
                inserted.section = point.section.clone();

                remaining = inserted.distance_to(point, calc);
                densified.push(inserted.clone());
                last = inserted;
            }
        }

        densified.push(point.clone());
        prev = Some(point.clone());
    }

    log::debug!("densify: {} -> {} points", points.len(), densified.len());
    Ok(densified)
}
