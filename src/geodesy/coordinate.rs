/// A position on the ellipsoid, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GlobalCoordinates {
    /// Creates coordinates from latitude/longitude in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude in radians
    pub fn latitude_radians(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Longitude in radians
    pub fn longitude_radians(&self) -> f64 {
        self.longitude.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_radian_accessors() {
        let c = GlobalCoordinates::new(90.0, -180.0);
        assert_abs_diff_eq!(c.latitude_radians(), PI / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(c.longitude_radians(), -PI, epsilon = 1e-15);
    }
}
