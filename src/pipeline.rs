//! Per-section smoothing pipeline and its configuration

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curves::{
    assign_chainage, cardinal_control_points, densify, estimate_curvature, interpolate_bezier,
    require_positive, resample_at_interval, CurvatureParams, DEFAULT_TENSION,
};
use crate::error::{Error, Result};
use crate::geodesy::GeodeticCalculator;
use crate::types::{GeoPoint, Section};

/// Tuning of the smoothing pipeline.
///
/// Defaults are the factory settings of the desktop tool. Field names
/// serialize in camelCase (`maxSegmentLength`, ...), and missing fields
/// fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    /// Gaps longer than this get intermediate points (m)
    pub max_segment_length: f64,
    /// Spacing of inserted points (m)
    pub densify_spacing: f64,
    /// Spacing of the output points (m)
    pub output_spacing: f64,
    /// Bezier samples per spline segment
    pub spline_detail: usize,
    /// Track length used for each curve radius estimate (m)
    pub curve_arc_length: f64,
    /// Radii above this are written as straight (m)
    pub straight_line_threshold: f64,
    /// Whether to estimate curve radii
    pub find_curves: bool,
    pub spline_tension: f64,
    /// Sections with fewer points are skipped
    pub min_section_points: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_segment_length: 800.0,
            densify_spacing: 600.0,
            output_spacing: 25.0,
            spline_detail: 60,
            curve_arc_length: 100.0,
            straight_line_threshold: 5000.0,
            find_curves: true,
            spline_tension: DEFAULT_TENSION,
            min_section_points: 4,
        }
    }
}

impl PipelineConfig {
    /// Loads a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every value before any processing starts
    pub fn validate(&self) -> Result<()> {
        require_positive("maxSegmentLength", self.max_segment_length)?;
        require_positive("densifySpacing", self.densify_spacing)?;
        require_positive("outputSpacing", self.output_spacing)?;
        require_positive("curveArcLength", self.curve_arc_length)?;
        require_positive("straightLineThreshold", self.straight_line_threshold)?;

        if self.spline_detail == 0 {
            return Err(Error::config("splineDetail must be at least 1"));
        }
        if !self.spline_tension.is_finite() {
            return Err(Error::config(format!(
                "splineTension must be finite, got {}",
                self.spline_tension
            )));
        }
        if self.densify_spacing > self.max_segment_length {
            log::warn!(
                "densifySpacing ({} m) exceeds maxSegmentLength ({} m); densified gaps may stay above the maximum",
                self.densify_spacing,
                self.max_segment_length
            );
        }
        Ok(())
    }

    fn curvature_params(&self) -> CurvatureParams {
        CurvatureParams {
            curve_arc_length: self.curve_arc_length,
            straight_line_threshold: self.straight_line_threshold,
        }
    }
}

/// Runs the smoothing stages over sections
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    calc: GeodeticCalculator,
}

impl Pipeline {
    /// Creates a pipeline on WGS84, rejecting invalid configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_calculator(config, GeodeticCalculator::default())
    }

    /// Creates a pipeline that uses `calc` for every geodetic computation
    pub fn with_calculator(config: PipelineConfig, calc: GeodeticCalculator) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, calc })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn calculator(&self) -> &GeodeticCalculator {
        &self.calc
    }

    /// Smooths one section's points and stamps chainage (and curve radius
    /// when enabled) on the result
    pub fn process_section(&self, points: &[GeoPoint]) -> Result<Vec<GeoPoint>> {
        let cfg = &self.config;

        let densified = densify(points, cfg.max_segment_length, cfg.densify_spacing, &self.calc)?;
        let control = cardinal_control_points(&densified, cfg.spline_tension);
        let smooth = interpolate_bezier(&control, cfg.spline_detail);
        let resampled = resample_at_interval(&smooth, cfg.output_spacing, &self.calc)?;

        let annotated = if cfg.find_curves {
            estimate_curvature(&resampled, cfg.curvature_params(), &self.calc)?
        } else {
            resampled
        };

        Ok(assign_chainage(&annotated, &self.calc))
    }

    /// Processes sections in parallel and concatenates the results in
    /// section order. Sections below `min_section_points` are skipped.
    pub fn process_sections(&self, sections: &[Section]) -> Result<Vec<GeoPoint>> {
        let processed: Vec<Vec<GeoPoint>> = sections
            .par_iter()
            .filter_map(|section| {
                if section.len() < self.config.min_section_points {
                    log::info!(
                        "Skipping section '{}': {} points (minimum {})",
                        section.name,
                        section.len(),
                        self.config.min_section_points
                    );
                    return None;
                }
                Some(self.process_section(&section.points).map(|points| {
                    log::debug!("Section '{}': {} -> {} points", section.name, section.len(), points.len());
                    points
                }))
            })
            .collect::<Result<_>>()?;

        Ok(processed.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::group_sections;
    use approx::assert_abs_diff_eq;

    /// A gently curving alignment with a couple of long gaps
    fn survey(name: &str, lat: f64) -> Vec<GeoPoint> {
        let calc = GeodeticCalculator::default();
        let mut points = vec![GeoPoint::new(lat, 11.0, 500.0).in_section(name)];
        for (bearing, dist) in [(0.2, 300.0), (0.3, 1500.0), (0.45, 400.0), (0.6, 900.0), (0.7, 350.0)] {
            let next = points[points.len() - 1].project(bearing, dist, &calc);
            points.push(next);
        }
        points
    }

    #[test]
    fn test_default_config_matches_factory_settings() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.max_segment_length, 800.0);
        assert_eq!(cfg.densify_spacing, 600.0);
        assert_eq!(cfg.output_spacing, 25.0);
        assert_eq!(cfg.spline_detail, 60);
        assert_eq!(cfg.curve_arc_length, 100.0);
        assert_eq!(cfg.straight_line_threshold, 5000.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults() {
        let cfg = PipelineConfig::from_json(r#"{ "outputSpacing": 10, "findCurves": false }"#).unwrap();
        assert_eq!(cfg.output_spacing, 10.0);
        assert!(!cfg.find_curves);
        assert_eq!(cfg.max_segment_length, 800.0);

        let json = PipelineConfig::default().to_json().unwrap();
        assert!(json.contains("\"maxSegmentLength\""));
        assert!(json.contains("\"straightLineThreshold\""));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut cfg = PipelineConfig::default();
        cfg.densify_spacing = 0.0;
        assert!(matches!(Pipeline::new(cfg), Err(Error::Config(_))));

        let mut cfg = PipelineConfig::default();
        cfg.output_spacing = -25.0;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let mut cfg = PipelineConfig::default();
        cfg.spline_detail = 0;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let mut cfg = PipelineConfig::default();
        cfg.straight_line_threshold = f64::NAN;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_process_section_spacing_and_chainage() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let input = survey("Main", 47.0);

        let out = pipeline.process_section(&input).unwrap();
        let calc = pipeline.calculator();

        assert!(out.len() > 100);
        assert_eq!(out[0].latitude, input[0].latitude);
        assert_eq!(out[0].chainage, Some(0.0));
        let (last_out, last_in) = (&out[out.len() - 1], &input[input.len() - 1]);
        assert!(last_out.distance_to(last_in, calc) < 0.01);

        for pair in out[..out.len() - 1].windows(2) {
            let d = pair[0].distance_to(&pair[1], calc);
            assert!(d <= 25.0 + 1e-6);
            assert!(d > 20.0);
            assert!(pair[1].chainage.unwrap() >= pair[0].chainage.unwrap());
        }
        assert!(out.iter().all(|p| p.curve_radius.is_some() && p.section == "Main"));
    }

    #[test]
    fn test_curves_disabled_leaves_radius_unset() {
        let cfg = PipelineConfig {
            find_curves: false,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(cfg.clone()).unwrap();
        assert_eq!(pipeline.config(), &cfg);

        let out = pipeline.process_section(&survey("Main", 47.0)).unwrap();

        assert!(out.iter().all(|p| p.curve_radius.is_none()));
        assert!(out.iter().all(|p| p.chainage.is_some()));
    }

    #[test]
    fn test_sections_are_independent() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let mut points = survey("North", 47.0);
        points.extend(survey("South", 46.0));
        points.push(GeoPoint::new(45.0, 11.0, 0.0).in_section("Stub"));

        let sections = group_sections(points);
        let out = pipeline.process_sections(&sections).unwrap();

        let north = out.iter().filter(|p| p.section == "North").count();
        let south_start = out.iter().position(|p| p.section == "South").unwrap();

        assert_eq!(south_start, north);
        assert_eq!(out[south_start].chainage, Some(0.0));
        assert!(out.iter().all(|p| p.section != "Stub"));
        assert_abs_diff_eq!(out[0].latitude, 47.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let a = survey("A", 47.0);
        let b = survey("B", 46.0);

        let mut expected = pipeline.process_section(&a).unwrap();
        expected.extend(pipeline.process_section(&b).unwrap());

        let sections = vec![Section::new("A", a), Section::new("B", b)];
        assert_eq!(pipeline.process_sections(&sections).unwrap(), expected);
    }
}
