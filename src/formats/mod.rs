//! Centerline file formats: KML, CSV and zip archives

pub mod archive;
pub mod csv;
pub mod kml;

pub use archive::{read_kmz, write_kmz, write_zip_bundle, KMZ_DOCUMENT};
pub use self::csv::{parse_centerline_csv, read_centerline_csv, write_centerline_csv};
pub use kml::{parse_kml, read_kml, write_lines_kml, AltitudeMode, KmlOptions};
