//! Extracts surveyed points from KML placemarks

use std::path::Path;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::types::GeoPoint;

/// Text-bearing placemark children we collect
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Name,
    Description,
    Coordinates,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"name" => Some(Field::Name),
            b"description" => Some(Field::Description),
            b"coordinates" => Some(Field::Coordinates),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Placemark {
    name: Option<String>,
    description: Option<String>,
    coordinates: Vec<String>,
}

impl Placemark {
    fn set(&mut self, field: Field, text: String) {
        match field {
            Field::Name if self.name.is_none() => self.name = Some(text),
            Field::Description if self.description.is_none() => self.description = Some(text),
            Field::Coordinates => self.coordinates.push(text),
            _ => {}
        }
    }

    fn into_points(self, index: usize, out: &mut Vec<GeoPoint>) {
        let section = self
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| format!("Section_{}", index));
        let description = self.description.map(|d| d.trim().to_string()).unwrap_or_default();

        for block in &self.coordinates {
            for tuple in block.split_whitespace() {
                match parse_tuple(tuple) {
                    Some(mut point) => {
                        point.section = section.clone();
                        point.description = description.clone();
                        out.push(point);
                    }
                    None => log::debug!("Skipping coordinate tuple '{}' in '{}'", tuple, section),
                }
            }
        }
    }
}

/// Parses one `lon,lat[,alt]` tuple
fn parse_tuple(tuple: &str) -> Option<GeoPoint> {
    let mut parts = tuple.split(',');
    let longitude = parts.next()?.trim().parse::<f64>().ok()?;
    let latitude = parts.next()?.trim().parse::<f64>().ok()?;
    if !longitude.is_finite() || !latitude.is_finite() {
        return None;
    }
    let altitude = parts
        .next()
        .and_then(|a| a.trim().parse::<f64>().ok())
        .filter(|a| a.is_finite())
        .unwrap_or(0.0);

    Some(GeoPoint::new(latitude, longitude, altitude))
}

/// Resolves `&amp;`-style and numeric references inside text
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| Error::Xml(e.to_string()))?
    {
        return Ok(ch.to_string());
    }

    let name = reference.decode().map_err(|e| Error::Xml(e.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(value) => Ok(value.to_string()),
        None => Err(Error::Xml(format!("unknown entity '&{};'", name))),
    }
}

/// Reads a KML file
pub fn read_kml<P: AsRef<Path>>(path: P) -> Result<Vec<GeoPoint>> {
    let text = std::fs::read_to_string(path)?;
    parse_kml(&text)
}

/// Collects the points of every `Placemark` in document order.
///
/// Each placemark contributes the tuples of all its `coordinates` elements.
/// Points take the placemark's name as section (`Section_<index>` when it
/// has none) and its description.
pub fn parse_kml(text: &str) -> Result<Vec<GeoPoint>> {
    let mut reader = Reader::from_str(text);

    let mut points = Vec::new();
    let mut placemark: Option<Placemark> = None;
    let mut placemark_index = 0usize;
    let mut field: Option<Field> = None;
    let mut content = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let tag = e.local_name();
                if tag.as_ref() == b"Placemark" {
                    placemark = Some(Placemark::default());
                } else if placemark.is_some() && field.is_none() {
                    field = Field::from_tag(tag.as_ref());
                    content.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if let (Some(pm), Some(empty)) = (placemark.as_mut(), Field::from_tag(e.local_name().as_ref())) {
                    pm.set(empty, String::new());
                }
            }
            Ok(Event::Text(e)) if field.is_some() => {
                let text = e.xml_content().map_err(|e| Error::Xml(e.to_string()))?;
                content.push_str(&text);
            }
            Ok(Event::GeneralRef(e)) if field.is_some() => {
                content.push_str(&resolve_reference(&e)?);
            }
            Ok(Event::CData(e)) if field.is_some() => {
                content.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(e)) => {
                let tag = e.local_name();
                if tag.as_ref() == b"Placemark" {
                    if let Some(pm) = placemark.take() {
                        pm.into_points(placemark_index, &mut points);
                    }
                    placemark_index += 1;
                    field = None;
                } else if let (Some(pm), Some(open)) = (placemark.as_mut(), field) {
                    if Field::from_tag(tag.as_ref()) == Some(open) {
                        pm.set(open, std::mem::take(&mut content));
                        field = None;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Xml(format!(
                    "error at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
        }
    }

    log::debug!("Parsed {} points from {} placemarks", points.len(), placemark_index);
    Ok(points)
}
