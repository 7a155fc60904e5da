//! Curve smoothing stages applied to each section
//!
//! Every stage takes an immutable slice and returns new points:
//! densify → spline control points → Bezier samples → arc-length resampling
//! → curvature → chainage.

pub mod bezier;
pub mod chainage;
pub mod curvature;
pub mod densify;
pub mod resample;
pub mod spline;

pub use bezier::{interpolate_bezier, CubicSegments};
pub use chainage::assign_chainage;
pub use curvature::{estimate_curvature, CurvatureParams};
pub use densify::densify;
pub use resample::resample_at_interval;
pub use spline::{cardinal_control_points, DEFAULT_TENSION};

use crate::error::{Error, Result};

/// Rejects zero, negative and non-finite lengths
pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!("{} must be a positive number of meters, got {}", name, value)))
    }
}
