//! Arc-length resampling at a fixed geodesic interval

use crate::error::Result;
use crate::geodesy::GeodeticCalculator;
use crate::types::GeoPoint;
use super::require_positive;

/// Trailing points closer than this to the last emitted point are dropped
const END_POINT_TOLERANCE: f64 = 0.001;

/// Re-samples `points` so that emitted points are `interval` meters apart
/// along the input polyline.
///
/// The first input point is always emitted. New points are projected from
/// the start of the segment they fall on, along that segment's bearing. The
/// true final input point is appended unless the last emitted point is within
/// one millimeter of it, so only the trailing pair may be shorter than
/// `interval`.
pub fn resample_at_interval(
    points: &[GeoPoint],
    interval: f64,
    calc: &GeodeticCalculator,
) -> Result<Vec<GeoPoint>> {
    require_positive("outputSpacing", interval)?;

    if points.len() < 2 {
        return Ok(points.to_vec());
    }

    let mut result = vec![points[0].clone()];
    let mut since_last_output = 0.0;

    for pair in points.windows(2) {
        let (start, end) = (&pair[0], &pair[1]);
        let curve = calc.inverse(start.coordinates(), end.coordinates());
        let segment_length = curve.ellipsoidal_distance;
        let mut covered = 0.0;

        while covered < segment_length {
            let to_next_output = interval - since_last_output;
            let remaining = segment_length - covered;

            if to_next_output <= remaining {
                covered += to_next_output;
                result.push(start.project(curve.azimuth, covered, calc));
                since_last_output = 0.0;
            } else {
                since_last_output += remaining;
                covered = segment_length;
            }
        }
    }

    if let (Some(last_emitted), Some(last_input)) = (result.last(), points.last()) {
        if last_emitted.distance_to(last_input, calc) > END_POINT_TOLERANCE {
            result.push(last_input.clone());
        }
    }

    log::debug!("resample: {} -> {} points at {} m", points.len(), result.len(), interval);
    Ok(result)
}
