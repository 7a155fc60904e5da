//! Lines KML: coloured section lines plus kilometrage posts

use std::fmt;
use std::str::FromStr;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{GeoPoint, Section};

/// Line colours in KML `aabbggrr` order
const LINE_COLORS: [&str; 10] = [
    "ff00ff00", // lime
    "ff0000ff", // red
    "ffffff00", // cyan
    "ff00a5ff", // orange
    "ff00ffff", // yellow
    "ffff00ff", // magenta
    "ff9e9e5f", // cadet blue
    "ff008cff", // dark orange
    "ff800000", // navy
    "ff800080", // purple
];

/// Sections longer than this also get a low-detail line
const LOW_DETAIL_MIN_POINTS: usize = 20;

/// Every n-th point goes into the low-detail line
const LOW_DETAIL_STRIDE: usize = 10;

const POST_ICON: &str = "http://maps.google.com/mapfiles/kml/shapes/placemark_circle.png";

/// How line heights are interpreted by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AltitudeMode {
    Absolute,
    #[default]
    ClampToGround,
}

impl AltitudeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AltitudeMode::Absolute => "absolute",
            AltitudeMode::ClampToGround => "clampToGround",
        }
    }
}

impl fmt::Display for AltitudeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AltitudeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "absolute" => Ok(AltitudeMode::Absolute),
            "clampToGround" | "clamp-to-ground" => Ok(AltitudeMode::ClampToGround),
            other => Err(Error::config(format!(
                "unknown altitude mode '{}' (expected absolute or clampToGround)",
                other
            ))),
        }
    }
}

/// Output options of the lines KML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KmlOptions {
    /// Vertical exaggeration for absolute heights
    pub exaggeration: f64,
    /// Meters added to every altitude before exaggeration
    pub offset: f64,
    pub altitude_mode: AltitudeMode,
    /// Document title
    pub document_name: String,
}

impl Default for KmlOptions {
    fn default() -> Self {
        Self {
            exaggeration: 1.0,
            offset: 3.0,
            altitude_mode: AltitudeMode::ClampToGround,
            document_name: "Centerlines".to_string(),
        }
    }
}

impl KmlOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.exaggeration.is_finite() || self.exaggeration <= 0.0 {
            return Err(Error::config(format!(
                "exaggeration must be positive, got {}",
                self.exaggeration
            )));
        }
        if !self.offset.is_finite() {
            return Err(Error::config(format!("offset must be finite, got {}", self.offset)));
        }
        Ok(())
    }

    fn height(&self, point: &GeoPoint) -> f64 {
        match self.altitude_mode {
            AltitudeMode::Absolute => (point.altitude + self.offset) * self.exaggeration,
            AltitudeMode::ClampToGround => 0.0,
        }
    }

    fn tuple(&self, point: &GeoPoint) -> String {
        format!(
            "{:.8},{:.8},{:.3}",
            point.longitude,
            point.latitude,
            self.height(point)
        )
    }
}

/// Renders sections as a lines KML document.
///
/// The `Lines` folder holds one folder per non-empty section with its full
/// line and, for long sections, a hidden low-detail line. The hidden `Posts`
/// folder has a kilometrage marker for every point carrying chainage.
pub fn write_lines_kml(sections: &[Section], options: &KmlOptions) -> Result<String> {
    options.validate()?;

    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    output.push_str("<Document>\n");
    output.push_str(&format!("  <name>{}</name>\n", escape(options.document_name.as_str())));
    push_styles(&mut output);

    output.push_str("  <Folder>\n");
    output.push_str("    <name>Lines</name>\n");
    for (i, section) in sections.iter().filter(|s| !s.is_empty()).enumerate() {
        let name = escape(section.name.as_str());
        let style = format!("style_{}", (i + 1) % LINE_COLORS.len());

        output.push_str("    <Folder>\n");
        output.push_str(&format!("      <name>{}</name>\n", name));
        push_line(&mut output, &name, &style, true, section.points.iter(), options);

        if section.len() > LOW_DETAIL_MIN_POINTS {
            push_line(
                &mut output,
                &format!("{} - Low Detail", name),
                &style,
                false,
                low_detail(&section.points),
                options,
            );
        }
        output.push_str("    </Folder>\n");
    }
    output.push_str("  </Folder>\n");

    output.push_str("  <Folder>\n");
    output.push_str("    <name>Posts</name>\n");
    output.push_str("    <visibility>0</visibility>\n");
    for section in sections.iter().filter(|s| !s.is_empty()) {
        output.push_str("    <Folder>\n");
        output.push_str(&format!("      <name>{}</name>\n", escape(section.name.as_str())));
        for point in &section.points {
            if let Some(chainage) = point.chainage {
                push_post(&mut output, point, chainage, options);
            }
        }
        output.push_str("    </Folder>\n");
    }
    output.push_str("  </Folder>\n");

    output.push_str("</Document>\n");
    output.push_str("</kml>\n");

    log::debug!("Lines KML: {} sections, {} bytes", sections.len(), output.len());
    Ok(output)
}

/// Every tenth point plus the last
fn low_detail(points: &[GeoPoint]) -> impl Iterator<Item = &GeoPoint> {
    let last = points.len().saturating_sub(1);
    let tail = if last % LOW_DETAIL_STRIDE != 0 { points.last() } else { None };
    points.iter().step_by(LOW_DETAIL_STRIDE).chain(tail)
}

fn push_styles(output: &mut String) {
    for (i, color) in LINE_COLORS.iter().enumerate() {
        output.push_str(&format!("  <Style id=\"style_{}\">\n", i));
        output.push_str("    <LineStyle>\n");
        output.push_str(&format!("      <color>{}</color>\n", color));
        output.push_str("      <width>3</width>\n");
        output.push_str("    </LineStyle>\n");
        output.push_str("    <PolyStyle>\n");
        output.push_str(&format!("      <color>{}</color>\n", color));
        output.push_str("    </PolyStyle>\n");
        output.push_str("  </Style>\n");
    }

    output.push_str("  <Style id=\"post_style\">\n");
    output.push_str("    <IconStyle>\n");
    output.push_str("      <color>ffffffff</color>\n");
    output.push_str("      <scale>0.4</scale>\n");
    output.push_str("      <Icon>\n");
    output.push_str(&format!("        <href>{}</href>\n", POST_ICON));
    output.push_str("      </Icon>\n");
    output.push_str("    </IconStyle>\n");
    output.push_str("    <LabelStyle>\n");
    output.push_str("      <scale>0.7</scale>\n");
    output.push_str("    </LabelStyle>\n");
    output.push_str("  </Style>\n");
}

fn push_line<'a>(
    output: &mut String,
    name: &str,
    style: &str,
    visible: bool,
    points: impl Iterator<Item = &'a GeoPoint>,
    options: &KmlOptions,
) {
    output.push_str("      <Placemark>\n");
    output.push_str(&format!("        <name>{}</name>\n", name));
    output.push_str(&format!("        <visibility>{}</visibility>\n", u8::from(visible)));
    output.push_str(&format!("        <styleUrl>#{}</styleUrl>\n", style));
    output.push_str("        <LineString>\n");
    output.push_str("          <extrude>0</extrude>\n");
    output.push_str("          <tessellate>1</tessellate>\n");
    output.push_str(&format!("          <altitudeMode>{}</altitudeMode>\n", options.altitude_mode));
    output.push_str("          <coordinates>\n");
    for point in points {
        output.push_str(&format!("            {}\n", options.tuple(point)));
    }
    output.push_str("          </coordinates>\n");
    output.push_str("        </LineString>\n");
    output.push_str("      </Placemark>\n");
}

fn push_post(output: &mut String, point: &GeoPoint, chainage: f64, options: &KmlOptions) {
    output.push_str("      <Placemark>\n");
    output.push_str(&format!("        <name>km {:.3}</name>\n", chainage / 1000.0));
    output.push_str("        <visibility>0</visibility>\n");
    output.push_str("        <styleUrl>#post_style</styleUrl>\n");
    output.push_str("        <Point>\n");
    output.push_str(&format!("          <altitudeMode>{}</altitudeMode>\n", options.altitude_mode));
    output.push_str(&format!("          <coordinates>{}</coordinates>\n", options.tuple(point)));
    output.push_str("        </Point>\n");
    output.push_str("      </Placemark>\n");
}
