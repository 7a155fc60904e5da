//! Ellipsoidal geodesy: reference ellipsoids and Vincenty's direct/inverse solutions

pub mod coordinate;
pub mod diagnostics;
pub mod ellipsoid;
pub mod vincenty;

pub use coordinate::GlobalCoordinates;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, Problem};
pub use ellipsoid::Ellipsoid;
pub use vincenty::{GeodeticCalculator, GeodeticCurve};
