//! centerline-tools - Geodetic smoothing of surveyed centerlines
//!
//! centerline-tools turns sparse survey points of a rail or road centerline
//! into an evenly spaced, smooth polyline on the WGS84 ellipsoid, annotated
//! with chainage and local curve radius.
//!
//! # Examples
//!
//! ## Processing a KML survey
//!
//! ```no_run
//! use centerline_tools::{formats, group_sections, Pipeline, PipelineConfig};
//!
//! let points = formats::read_kml("survey.kml")?;
//! let sections = group_sections(points);
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let smoothed = pipeline.process_sections(&sections)?;
//!
//! let file = std::fs::File::create("survey.csv")?;
//! formats::write_centerline_csv(file, &smoothed)?;
//! # Ok::<(), centerline_tools::Error>(())
//! ```
//!
//! ## Geodesic distance
//!
//! ```
//! use centerline_tools::{GeodeticCalculator, GlobalCoordinates};
//!
//! let calc = GeodeticCalculator::default();
//! let curve = calc.inverse(GlobalCoordinates::new(0.0, 0.0), GlobalCoordinates::new(0.0, 1.0));
//! assert!((curve.ellipsoidal_distance - 111_319.49).abs() < 0.01);
//! ```

pub mod curves;
pub mod error;
pub mod formats;
pub mod geodesy;
pub mod pipeline;
pub mod types;

pub use error::{Error, Result};
pub use geodesy::{
    CollectingSink, Diagnostic, DiagnosticSink, Ellipsoid, GeodeticCalculator, GeodeticCurve,
    GlobalCoordinates, LogSink,
};
pub use pipeline::{Pipeline, PipelineConfig};
pub use types::{group_sections, GeoPoint, Section, DEFAULT_SECTION};
