/// Integration tests: KML survey -> pipeline -> CSV / KMZ
use std::io::Cursor;
use std::sync::Arc;

use centerline_tools::formats::{
    parse_centerline_csv, parse_kml, read_kmz, write_centerline_csv, write_kmz, write_lines_kml,
    KmlOptions,
};
use centerline_tools::{
    group_sections, CollectingSink, GeoPoint, GeodeticCalculator, Pipeline, PipelineConfig,
    Section,
};

const SURVEY: &str = include_str!("fixtures/survey.kml");

fn smoothed_survey() -> (Vec<GeoPoint>, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    let calc = GeodeticCalculator::default().with_sink(sink.clone());
    let pipeline = Pipeline::with_calculator(PipelineConfig::default(), calc).unwrap();

    let sections = group_sections(parse_kml(SURVEY).unwrap());
    (pipeline.process_sections(&sections).unwrap(), sink)
}

#[test]
fn test_survey_sections() {
    let sections = group_sections(parse_kml(SURVEY).unwrap());

    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Main line", "Branch", "Siding stub"]);
    assert_eq!(sections[0].len(), 5);
    assert_eq!(sections[0].points[0].description, "Chainage origin at the station");
    assert_eq!(sections[2].len(), 3);
}

#[test]
fn test_pipeline_output() {
    let (points, sink) = smoothed_survey();
    let calc = GeodeticCalculator::default();

    assert!(sink.is_empty());
    assert!(points.iter().all(|p| p.section != "Siding stub"));

    let sections = group_sections(points);
    assert_eq!(sections.len(), 2);

    for section in &sections {
        assert_eq!(section.points[0].chainage, Some(0.0));
        for pair in section.points.windows(2) {
            let d = pair[0].distance_to(&pair[1], &calc);
            assert!(d <= 25.0 + 1e-6, "{}: gap of {} m", section.name, d);
            assert!(pair[1].chainage >= pair[0].chainage);
        }
        for point in &section.points {
            let radius = point.curve_radius.unwrap();
            assert!(radius == 0.0 || (radius > 0.0 && radius <= 5000.0));
        }
    }

    // Main line is roughly 2.8 km long
    let main_end = sections[0].points.last().and_then(|p| p.chainage).unwrap();
    assert!(main_end > 2500.0 && main_end < 3200.0, "main line length {}", main_end);
}

#[test]
fn test_csv_roundtrip() {
    let (points, _) = smoothed_survey();

    let file = tempfile::NamedTempFile::new().unwrap();
    write_centerline_csv(file.reopen().unwrap(), &points).unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();

    assert!(text.starts_with("#Section,Latitude,Longitude,Altitude,Kilometrage,CurveRadius\n"));

    let back = parse_centerline_csv(&text).unwrap();
    assert_eq!(back.len(), points.len());
    for (a, b) in points.iter().zip(&back) {
        assert_eq!(a.section, b.section);
        assert!((a.latitude - b.latitude).abs() < 1e-8);
        assert!((a.chainage.unwrap() - b.chainage.unwrap()).abs() <= 0.5 + 1e-9);
    }
}

#[test]
fn test_lines_kmz() {
    let (points, _) = smoothed_survey();
    let sections: Vec<Section> = group_sections(points);
    let main_len = sections[0].len();

    let kml = write_lines_kml(&sections, &KmlOptions::default()).unwrap();
    let kmz = write_kmz(Cursor::new(Vec::new()), &kml).unwrap();

    let document = read_kmz(Cursor::new(kmz.into_inner())).unwrap();
    assert_eq!(document, kml);

    let placemarks = group_sections(parse_kml(&document).unwrap());
    assert_eq!(placemarks[0].name, "Main line");
    assert_eq!(placemarks[0].len(), main_len);
    assert!(placemarks.iter().any(|s| s.name == "Main line - Low Detail"));
}
