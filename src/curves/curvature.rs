//! Curve radius estimation from bearing changes

use std::f64::consts::PI;

use crate::error::Result;
use crate::geodesy::GeodeticCalculator;
use crate::types::GeoPoint;
use super::require_positive;

/// Point spacing assumed when it cannot be measured
const FALLBACK_SPACING: f64 = 25.0;

/// Bearing changes below this (radians) count as straight
const STRAIGHT_BEARING_DELTA: f64 = 1.0e-4;

/// Parameters of the curvature estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureParams {
    /// Length of track the estimate looks at, centred on the point (m)
    pub curve_arc_length: f64,
    /// Radii above this are reported as straight (m)
    pub straight_line_threshold: f64,
}

/// Returns `points` with `curve_radius` set on every point.
///
/// For each point the neighbours `offset` places before and after are used,
/// where `offset` covers half of `curve_arc_length` at the spacing measured
/// between the first two points. The radius is derived from the change of
/// bearing between the two halves and the chord between the neighbours.
/// Points without both neighbours, near-straight runs and radii above
/// `straight_line_threshold` get a radius of 0.
pub fn estimate_curvature(
    points: &[GeoPoint],
    params: CurvatureParams,
    calc: &GeodeticCalculator,
) -> Result<Vec<GeoPoint>> {
    require_positive("curveArcLength", params.curve_arc_length)?;
    require_positive("straightLineThreshold", params.straight_line_threshold)?;

    let spacing = match points {
        [first, second, ..] => first.distance_to(second, calc),
        _ => FALLBACK_SPACING,
    };
    let offset = neighbour_offset(params.curve_arc_length, spacing);

    let annotated = points
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let neighbours = i
                .checked_sub(offset)
                .zip(i.checked_add(offset).filter(|&next| next < points.len()));

            let radius = match neighbours {
                Some((prev, next)) => {
                    radius_at(&points[prev], current, &points[next], params.straight_line_threshold, calc)
                }
                None => 0.0,
            };
            current.clone().with_curve_radius(radius)
        })
        .collect();

    Ok(annotated)
}

/// `max(1, round((arc / 2) / spacing))`; `usize::MAX` when spacing is zero
fn neighbour_offset(curve_arc_length: f64, spacing: f64) -> usize {
    let steps = ((curve_arc_length / 2.0) / spacing).round();
    if steps.is_finite() {
        (steps as usize).max(1)
    } else {
        usize::MAX
    }
}

fn radius_at(
    prev: &GeoPoint,
    current: &GeoPoint,
    next: &GeoPoint,
    straight_line_threshold: f64,
    calc: &GeodeticCalculator,
) -> f64 {
    let bearing_in = prev.bearing_to(current, calc);
    let bearing_out = current.bearing_to(next, calc);

    let mut delta = (bearing_out - bearing_in).abs();
    if delta > PI {
        delta = 2.0 * PI - delta;
    }

    if delta < STRAIGHT_BEARING_DELTA {
        return 0.0;
    }

    let half_chord = prev.distance_to(next, calc) / 2.0;
    let radius = half_chord / (delta / 2.0).sin();

    if radius > straight_line_threshold {
        0.0
    } else {
        radius
    }
}
