//! Zip containers: KMZ documents and CSV bundles

use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::formats::csv::write_centerline_csv;
use crate::types::GeoPoint;

/// Name of the KML document inside a KMZ
pub const KMZ_DOCUMENT: &str = "doc.kml";

fn deflate_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
}

/// Packs a KML document as KMZ
pub fn write_kmz<W: Write + Seek>(writer: W, kml: &str) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    zip.start_file(KMZ_DOCUMENT, deflate_options())?;
    zip.write_all(kml.as_bytes())?;
    Ok(zip.finish()?)
}

/// Extracts the KML document of a KMZ.
///
/// Falls back to the first `.kml` entry when there is no `doc.kml`.
pub fn read_kmz<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader)?;

    let name = if archive.index_for_name(KMZ_DOCUMENT).is_some() {
        KMZ_DOCUMENT.to_string()
    } else {
        archive
            .file_names()
            .find(|n| n.to_ascii_lowercase().ends_with(".kml"))
            .map(str::to_string)
            .ok_or_else(|| Error::Archive("no KML document in archive".to_string()))?
    };

    let mut content = String::new();
    archive.by_name(&name)?.read_to_string(&mut content)?;
    Ok(content)
}

/// Writes one centerline CSV per entry into a zip bundle
pub fn write_zip_bundle<W, S>(writer: W, files: &[(S, Vec<GeoPoint>)]) -> Result<W>
where
    W: Write + Seek,
    S: AsRef<str>,
{
    let mut zip = ZipWriter::new(writer);
    for (name, points) in files {
        zip.start_file(name.as_ref(), deflate_options())?;
        write_centerline_csv(&mut zip, points)?;
    }
    Ok(zip.finish()?)
}
