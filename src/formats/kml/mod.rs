//! KML support

pub mod reader;
pub mod writer;

pub use reader::{parse_kml, read_kml};
pub use writer::{write_lines_kml, AltitudeMode, KmlOptions};
