//! Core data types for centerline-tools

use std::collections::HashMap;

use crate::geodesy::{GeodeticCalculator, GlobalCoordinates};

/// Section label used for points that arrive without one
pub const DEFAULT_SECTION: &str = "default";

/// A surveyed or computed point on a centerline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f64,
    /// Name of the section this point belongs to
    pub section: String,
    /// Free text carried over from the source file
    pub description: String,
    /// Cumulative distance from the section start, in meters
    pub chainage: Option<f64>,
    /// Local curve radius in meters, 0 for straight track
    pub curve_radius: Option<f64>,
}

impl GeoPoint {
    /// Creates a point without section, chainage or curvature
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            ..Default::default()
        }
    }

    /// Returns this point assigned to `section`
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_chainage(mut self, chainage: f64) -> Self {
        self.chainage = Some(chainage);
        self
    }

    pub fn with_curve_radius(mut self, radius: f64) -> Self {
        self.curve_radius = Some(radius);
        self
    }

    /// Horizontal position for the geodetic solver
    pub fn coordinates(&self) -> GlobalCoordinates {
        GlobalCoordinates::new(self.latitude, self.longitude)
    }

    /// A bare point at the same position and section.
    ///
    /// Used for synthetic points, which never inherit chainage,
    /// curvature or description.
    pub fn derived(&self, latitude: f64, longitude: f64, altitude: f64) -> Self {
        GeoPoint::new(latitude, longitude, altitude).in_section(self.section.clone())
    }

    /// Ellipsoidal distance to `other` in meters
    pub fn distance_to(&self, other: &GeoPoint, calc: &GeodeticCalculator) -> f64 {
        calc.inverse(self.coordinates(), other.coordinates()).ellipsoidal_distance
    }

    /// Forward azimuth towards `other` in radians
    pub fn bearing_to(&self, other: &GeoPoint, calc: &GeodeticCalculator) -> f64 {
        calc.inverse(self.coordinates(), other.coordinates()).azimuth
    }

    /// Projects a new point `distance` meters along `bearing`.
    ///
    /// The new point keeps this point's altitude and section.
    pub fn project(&self, bearing: f64, distance: f64, calc: &GeodeticCalculator) -> GeoPoint {
        let end = calc.direct(self.coordinates(), bearing, distance);
        self.derived(end.latitude, end.longitude, self.altitude)
    }
}

/// A named, ordered run of points
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub name: String,
    pub points: Vec<GeoPoint>,
}

impl Section {
    pub fn new(name: impl Into<String>, points: Vec<GeoPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Groups points by section label.
///
/// Sections appear in the order their first point was seen, and points keep
/// their input order inside a section. Unlabelled points go to
/// [`DEFAULT_SECTION`].
pub fn group_sections(points: impl IntoIterator<Item = GeoPoint>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut point in points {
        if point.section.is_empty() {
            point.section = DEFAULT_SECTION.to_string();
        }

        let slot = match index.get(&point.section) {
            Some(&slot) => slot,
            None => {
                sections.push(Section::new(point.section.clone(), Vec::new()));
                index.insert(point.section.clone(), sections.len() - 1);
                sections.len() - 1
            }
        };
        sections[slot].points.push(point);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let p = GeoPoint::new(1.0, 2.0, 3.0)
            .in_section("Main")
            .with_chainage(10.0)
            .with_curve_radius(0.0);

        assert_eq!(p.section, "Main");
        assert_eq!(p.chainage, Some(10.0));
        assert_eq!(p.curve_radius, Some(0.0));
        assert!(p.description.is_empty());
    }

    #[test]
    fn test_derived_drops_annotations() {
        let p = GeoPoint::new(1.0, 2.0, 3.0).in_section("A").with_chainage(5.0);
        let d = p.derived(4.0, 5.0, 6.0);

        assert_eq!(d.section, "A");
        assert_eq!(d.chainage, None);
        assert_eq!(d.altitude, 6.0);
    }

    #[test]
    fn test_project_keeps_altitude_and_section() {
        let calc = GeodeticCalculator::default();
        let p = GeoPoint::new(10.0, 20.0, 42.0).in_section("Up");
        let q = p.project(0.0, 1000.0, &calc);

        assert!(q.latitude > p.latitude);
        assert_eq!(q.altitude, 42.0);
        assert_eq!(q.section, "Up");
        assert!((p.distance_to(&q, &calc) - 1000.0).abs() < 1e-6);
        assert!(p.bearing_to(&q, &calc).abs() < 1e-9);
    }

    #[test]
    fn test_group_sections_keeps_order() {
        let points = vec![
            GeoPoint::new(0.0, 0.0, 0.0).in_section("B"),
            GeoPoint::new(1.0, 0.0, 0.0).in_section("A"),
            GeoPoint::new(2.0, 0.0, 0.0).in_section("B"),
            GeoPoint::new(3.0, 0.0, 0.0),
        ];

        let sections = group_sections(points);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].name, "B");
        assert_eq!(sections[0].len(), 2);
        assert_eq!(sections[0].points[1].latitude, 2.0);
        assert_eq!(sections[1].name, "A");
        assert_eq!(sections[2].name, DEFAULT_SECTION);
        assert_eq!(sections[2].points[0].section, DEFAULT_SECTION);
    }
}
