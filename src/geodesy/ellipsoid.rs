//! Reference ellipsoids

/// Reference ellipsoid of a geodetic datum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    semi_major_axis: f64,
    semi_minor_axis: f64,
    flattening: f64,
    inverse_flattening: f64,
}

impl Ellipsoid {
    /// Creates an ellipsoid from its semi-major and semi-minor axes in meters
    pub fn new(semi_major_axis: f64, semi_minor_axis: f64) -> Self {
        let flattening = (semi_major_axis - semi_minor_axis) / semi_major_axis;
        Self {
            semi_major_axis,
            semi_minor_axis,
            flattening,
            inverse_flattening: 1.0 / flattening,
        }
    }

    /// World Geodetic System 1984
    pub fn wgs84() -> Self {
        Self::new(6378137.0, 6356752.314245)
    }

    /// Geodetic Reference System 1980
    pub fn grs80() -> Self {
        Self::new(6378137.0, 6356752.314140)
    }

    /// Equatorial radius `a` in meters
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Polar radius `b` in meters
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Flattening `f = (a - b) / a`
    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}
