//! Vincenty's direct and inverse formulae on an ellipsoid of revolution

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::coordinate::GlobalCoordinates;
use super::diagnostics::{Diagnostic, DiagnosticSink, LogSink, Problem};
use super::ellipsoid::Ellipsoid;

/// Convergence tolerance between successive iterates (radians)
pub const DEFAULT_ACCURACY: f64 = 1.0e-12;

/// Iteration cap for both problems
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// Solution of the inverse problem between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticCurve {
    /// Ellipsoidal distance in meters
    pub ellipsoidal_distance: f64,
    /// Forward azimuth at the start point (radians from north)
    pub azimuth: f64,
    /// Azimuth from the end point back to the start point (radians from north).
    ///
    /// This is the back-bearing `α2 + π`, not the forward azimuth at the end
    /// point that the desktop tool reports.
    pub reverse_azimuth: f64,
    /// False when the iteration cap was hit before the tolerance was met
    pub converged: bool,
}

impl GeodeticCurve {
    fn coincident() -> Self {
        Self {
            ellipsoidal_distance: 0.0,
            azimuth: 0.0,
            reverse_azimuth: 0.0,
            converged: true,
        }
    }
}

/// Solves geodetic problems on a fixed ellipsoid.
///
/// Cheap to clone; the diagnostic sink is shared between clones.
#[derive(Clone)]
pub struct GeodeticCalculator {
    ellipsoid: Ellipsoid,
    accuracy: f64,
    max_iterations: u32,
    sink: Arc<dyn DiagnosticSink>,
}

impl GeodeticCalculator {
    /// Creates a calculator for `ellipsoid` that logs diagnostics through `log`
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            accuracy: DEFAULT_ACCURACY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sink: Arc::new(LogSink),
        }
    }

    /// Routes diagnostics to `sink` instead of the log
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the convergence tolerance; it must be finite and positive
    pub fn with_accuracy(mut self, accuracy: f64) -> Result<Self> {
        if !accuracy.is_finite() || accuracy <= 0.0 {
            return Err(Error::config(format!(
                "solver accuracy must be a positive number of radians, got {}",
                accuracy
            )));
        }
        self.accuracy = accuracy;
        Ok(self)
    }

    /// Sets the iteration cap (at least one iteration always runs)
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Inverse problem: distance and azimuths between two points.
    ///
    /// Coincident points return a zero curve without iterating. If the
    /// iteration cap is reached the last iterate is still used and a
    /// [`Diagnostic::NonConvergence`] is reported.
    pub fn inverse(&self, start: GlobalCoordinates, end: GlobalCoordinates) -> GeodeticCurve {
        let a = self.ellipsoid.semi_major_axis();
        let b = self.ellipsoid.semi_minor_axis();
        let f = self.ellipsoid.flattening();

        let big_l = end.longitude_radians() - start.longitude_radians();

        let u1 = ((1.0 - f) * start.latitude_radians().tan()).atan();
        let u2 = ((1.0 - f) * end.latitude_radians().tan()).atan();
        let reduced = ReducedLatitudes {
            sin_u1: u1.sin(),
            cos_u1: u1.cos(),
            sin_u2: u2.sin(),
            cos_u2: u2.cos(),
        };

        let mut lambda = big_l;
        let mut iterations = 0;
        let mut converged = false;
        let mut step;

        loop {
            iterations += 1;
            step = match reduced.lambda_step(lambda, big_l, f) {
                Some(step) => step,
                None => return GeodeticCurve::coincident(),
            };

            let residual = (step.next_lambda - lambda).abs();
            lambda = step.next_lambda;

            if residual <= self.accuracy {
                converged = true;
                break;
            }
            if iterations >= self.max_iterations {
                self.sink.report(Diagnostic::NonConvergence {
                    problem: Problem::Inverse,
                    iterations,
                    residual,
                });
                break;
            }
        }

        let u_sq = step.cos_sq_alpha * (a * a - b * b) / (b * b);
        let (big_a, big_b) = series_coefficients(u_sq);
        let delta_sigma = delta_sigma(big_b, step.sin_sigma, step.cos_sigma, step.cos_2sigma_m);

        let distance = b * big_a * (step.sigma - delta_sigma);

        let ReducedLatitudes { sin_u1, cos_u1, sin_u2, cos_u2 } = reduced;
        let alpha1 = (cos_u2 * step.sin_lambda)
            .atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * step.cos_lambda);
        let alpha2 = (cos_u1 * step.sin_lambda)
            .atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * step.cos_lambda);

        GeodeticCurve {
            ellipsoidal_distance: distance,
            azimuth: alpha1,
            reverse_azimuth: wrap_pi(alpha2 + PI),
            converged,
        }
    }

    /// Direct problem: the point reached from `start` after `distance` meters
    /// along the geodesic with initial `azimuth` (radians).
    pub fn direct(&self, start: GlobalCoordinates, azimuth: f64, distance: f64) -> GlobalCoordinates {
        let a = self.ellipsoid.semi_major_axis();
        let b = self.ellipsoid.semi_minor_axis();
        let f = self.ellipsoid.flattening();

        let (sin_alpha1, cos_alpha1) = azimuth.sin_cos();

        let tan_u1 = (1.0 - f) * start.latitude_radians().tan();
        let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;

        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let (big_a, big_b) = series_coefficients(u_sq);

        let sigma0 = distance / (b * big_a);
        let mut sigma = sigma0;
        let mut iterations = 0;

        loop {
            iterations += 1;
            let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let next = sigma0 + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);

            let residual = (next - sigma).abs();
            sigma = next;

            if residual <= self.accuracy {
                break;
            }
            if iterations >= self.max_iterations {
                self.sink.report(Diagnostic::NonConvergence {
                    problem: Problem::Direct,
                    iterations,
                    residual,
                });
                break;
            }
        }

        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();

        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());

        let lambda = (sin_sigma * sin_alpha1)
            .atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let big_l = lambda
            - (1.0 - c) * f * sin_alpha
                * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        let lambda2 = wrap_pi(start.longitude_radians() + big_l);

        GlobalCoordinates::new(phi2.to_degrees(), lambda2.to_degrees())
    }
}

impl Default for GeodeticCalculator {
    fn default() -> Self {
        Self::new(Ellipsoid::wgs84())
    }
}

impl fmt::Debug for GeodeticCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeodeticCalculator")
            .field("ellipsoid", &self.ellipsoid)
            .field("accuracy", &self.accuracy)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
struct ReducedLatitudes {
    sin_u1: f64,
    cos_u1: f64,
    sin_u2: f64,
    cos_u2: f64,
}

/// Intermediate values of one λ iteration of the inverse problem
#[derive(Debug, Clone, Copy)]
struct LambdaStep {
    sin_lambda: f64,
    cos_lambda: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    sigma: f64,
    cos_sq_alpha: f64,
    cos_2sigma_m: f64,
    next_lambda: f64,
}

impl ReducedLatitudes {
    /// Evaluates one fixed-point step at `lambda`; `None` for coincident points
    fn lambda_step(&self, lambda: f64, big_l: f64, f: f64) -> Option<LambdaStep> {
        let ReducedLatitudes { sin_u1, cos_u1, sin_u2, cos_u2 } = *self;
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let x = cos_u2 * sin_lambda;
        let y = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        let sin_sigma = (x * x + y * y).sqrt();
        if sin_sigma == 0.0 {
            return None;
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // equatorial line
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let next_lambda = big_l
            + (1.0 - c) * f * sin_alpha
                * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        Some(LambdaStep {
            sin_lambda,
            cos_lambda,
            sin_sigma,
            cos_sigma,
            sigma,
            cos_sq_alpha,
            cos_2sigma_m,
            next_lambda,
        })
    }
}

/// Vincenty's A and B series coefficients for `u²`
fn series_coefficients(u_sq: f64) -> (f64, f64) {
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    (big_a, big_b)
}

fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    big_b * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * c2)))
}

/// Wraps an angle into (-π, π]
pub(crate) fn wrap_pi(angle: f64) -> f64 {
    let mut wrapped = angle % (2.0 * PI);
    if wrapped <= -PI {
        wrapped += 2.0 * PI;
    } else if wrapped > PI {
        wrapped -= 2.0 * PI;
    }
    wrapped
}
