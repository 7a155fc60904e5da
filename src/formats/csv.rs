//! Centerline CSV files
//!
//! Rows are `section, latitude, longitude[, altitude[, kilometrage]]`. Lines
//! starting with `#` are comments; the writer puts its header in one.

use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::error::Result;
use crate::types::GeoPoint;

/// Header line written before the data rows
pub const HEADER: [&str; 6] = [
    "#Section",
    "Latitude",
    "Longitude",
    "Altitude",
    "Kilometrage",
    "CurveRadius",
];

/// Reads a centerline CSV file
pub fn read_centerline_csv<P: AsRef<Path>>(path: P) -> Result<Vec<GeoPoint>> {
    let text = std::fs::read_to_string(path)?;
    parse_centerline_csv(&text)
}

/// Parses centerline CSV text.
///
/// The delimiter is chosen per line: a tab when the line contains one, a
/// comma otherwise. Kilometrage is given in km and stored as chainage in
/// meters. Rows with fewer than three columns or an unreadable position are
/// skipped.
pub fn parse_centerline_csv(text: &str) -> Result<Vec<GeoPoint>> {
    let mut points = Vec::new();
    let mut skipped = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(record) = read_record(line)? else {
            continue;
        };
        match parse_row(&record) {
            Some(point) => points.push(point),
            None => {
                skipped += 1;
                log::debug!("Skipping CSV line {}: {:?}", index + 1, record);
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} unreadable CSV rows", skipped);
    }
    log::debug!("Parsed {} points from CSV", points.len());
    Ok(points)
}

/// Splits one data line into fields
fn read_record(line: &str) -> Result<Option<StringRecord>> {
    let delimiter = if line.contains('\t') { b'\t' } else { b',' };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());

    Ok(reader.records().next().transpose()?)
}

fn parse_row(record: &StringRecord) -> Option<GeoPoint> {
    if record.len() < 3 {
        return None;
    }

    let latitude = parse_number(record.get(1))?;
    let longitude = parse_number(record.get(2))?;
    let altitude = parse_number(record.get(3)).unwrap_or(0.0);

    let mut point = GeoPoint::new(latitude, longitude, altitude).in_section(record.get(0).unwrap_or(""));
    if let Some(km) = parse_number(record.get(4)) {
        point = point.with_chainage(km * 1000.0);
    }
    Some(point)
}

fn parse_number(field: Option<&str>) -> Option<f64> {
    field
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Writes points as centerline CSV.
///
/// Latitude and longitude get 8 decimals, altitude and kilometrage 3, curve
/// radius 1. Missing chainage or radius is written as 0.
pub fn write_centerline_csv<W: Write>(writer: W, points: &[GeoPoint]) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(false).from_writer(writer);

    writer.write_record(HEADER)?;
    for point in points {
        writer.write_record([
            point.section.clone(),
            format!("{:.8}", point.latitude),
            format!("{:.8}", point.longitude),
            format!("{:.3}", point.altitude),
            format!("{:.3}", point.chainage.unwrap_or(0.0) / 1000.0),
            format!("{:.1}", point.curve_radius.unwrap_or(0.0)),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
