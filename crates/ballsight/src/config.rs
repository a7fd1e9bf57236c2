//! Detection configuration snapshot.
//!
//! One [`DetectBallsConfig`] value is read per invocation; the detector
//! never observes configuration changes mid-frame. Defaults follow the
//! stock tuning for a standard orange ball seen by an overhead camera.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::region::SizeBounds;

/// Size-expectation (gaussian) filter parameters.
///
/// Candidates with pixel area inside `[expected_area_min, expected_area_max]`
/// score 1.0; areas outside the band decay smoothly with `area_variance`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GaussianSizeParams {
    /// Enable the filter stage.
    pub enable: bool,
    /// Lower edge of the expected area band (sq-pixels).
    pub expected_area_min: u32,
    /// Upper edge of the expected area band (sq-pixels).
    pub expected_area_max: u32,
    /// Decay scale for areas outside the band (sq-pixels).
    ///
    /// Must be positive; a non-positive value disables the stage for the
    /// invocation.
    pub area_variance: f64,
}

impl Default for GaussianSizeParams {
    fn default() -> Self {
        Self {
            enable: true,
            expected_area_min: 30,
            expected_area_max: 40,
            area_variance: 20.0,
        }
    }
}

/// Near-robot exclusion parameters.
///
/// Reserved extension point: carried in configuration but not yet enforced
/// by any stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NearRobotParams {
    /// Enable the filter stage (currently without effect).
    pub enable: bool,
    /// Exclusion distance around each robot (mm).
    pub distance_mm: f64,
}

impl Default for NearRobotParams {
    fn default() -> Self {
        Self {
            enable: true,
            distance_mm: 55.0,
        }
    }
}

/// Color-histogram disambiguation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistogramParams {
    /// Enable the filter stage.
    pub enable: bool,
    /// Greenness above which a candidate is accepted outright.
    pub min_greenness: f64,
    /// Markeryness above which a candidate is rejected (unless the
    /// greenness override already accepted it).
    pub max_markeryness: f64,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            enable: true,
            min_greenness: 0.5,
            max_markeryness: 2.0,
        }
    }
}

/// Geometric filter switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryFilterParams {
    /// Reject candidates projecting outside the playable field and boundary.
    pub ball_in_field: bool,
    /// Reject candidates projecting deep inside a goal.
    pub ball_in_goal: bool,
}

impl Default for GeometryFilterParams {
    fn default() -> Self {
        Self {
            ball_in_field: true,
            ball_in_goal: true,
        }
    }
}

/// Per-invocation ball detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectBallsConfig {
    /// Color class the ball is segmented as.
    pub ball_color: String,
    /// Maximum number of balls to report. Values above 1 degrade to 1 with
    /// a warning; 0 skips scoring entirely.
    pub max_balls: usize,
    /// Assumed ball center height above the field plane (mm).
    pub ball_height_mm: f64,
    /// Maximum plausible ball speed (mm/s). Consumed by downstream
    /// trackers; unused by the per-frame detector.
    pub max_speed_mm_s: f64,
    /// Coarse candidate size gate.
    pub size: SizeBounds,
    /// Size-expectation filter.
    pub gaussian: GaussianSizeParams,
    /// Near-robot exclusion (reserved).
    pub near_robot: NearRobotParams,
    /// Color-histogram disambiguation.
    pub histogram: HistogramParams,
    /// Geometric filters.
    pub geometry: GeometryFilterParams,
}

impl Default for DetectBallsConfig {
    fn default() -> Self {
        Self {
            ball_color: crate::colors::LABEL_ORANGE.to_string(),
            max_balls: 1,
            ball_height_mm: 30.0,
            max_speed_mm_s: 10_000.0,
            size: SizeBounds::default(),
            gaussian: GaussianSizeParams::default(),
            near_robot: NearRobotParams::default(),
            histogram: HistogramParams::default(),
            geometry: GeometryFilterParams::default(),
        }
    }
}

impl DetectBallsConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = DetectBallsConfig::default();
        assert_eq!(cfg.ball_color, "Orange");
        assert_eq!(cfg.max_balls, 1);
        assert!((cfg.ball_height_mm - 30.0).abs() < 1e-9);
        assert!((cfg.max_speed_mm_s - 10_000.0).abs() < 1e-9);
        assert_eq!(cfg.size.min_width, 3);
        assert_eq!(cfg.size.max_width, 30);
        assert_eq!(cfg.size.min_area, 9);
        assert_eq!(cfg.size.max_area, 100);
        assert!(cfg.gaussian.enable);
        assert_eq!(cfg.gaussian.expected_area_min, 30);
        assert_eq!(cfg.gaussian.expected_area_max, 40);
        assert!((cfg.gaussian.area_variance - 20.0).abs() < 1e-9);
        assert!(cfg.near_robot.enable);
        assert!((cfg.near_robot.distance_mm - 55.0).abs() < 1e-9);
        assert!(cfg.histogram.enable);
        assert!((cfg.histogram.min_greenness - 0.5).abs() < 1e-9);
        assert!((cfg.histogram.max_markeryness - 2.0).abs() < 1e-9);
        assert!(cfg.geometry.ball_in_field);
        assert!(cfg.geometry.ball_in_goal);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: DetectBallsConfig =
            serde_json::from_str(r#"{"max_balls": 3, "histogram": {"enable": false}}"#).unwrap();
        assert_eq!(cfg.max_balls, 3);
        assert!(!cfg.histogram.enable);
        // untouched sections keep their defaults
        assert!((cfg.histogram.min_greenness - 0.5).abs() < 1e-9);
        assert!(cfg.gaussian.enable);
        assert_eq!(cfg.ball_color, "Orange");
    }
}
