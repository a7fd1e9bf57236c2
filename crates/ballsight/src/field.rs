//! Field geometry and boundary-membership queries.
//!
//! World coordinates are mm with the origin at the field center, x along
//! the long axis, z up. The detector consumes only the [`FieldMask`] seam;
//! [`FieldGeometry`] is the stock implementation backed by a flat set of
//! field dimensions loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Boundary-membership oracle for field-plane points.
pub trait FieldMask {
    /// `true` when the point lies on the playable field or its boundary
    /// run-off area.
    fn in_field_or_boundary(&self, xy: [f64; 2]) -> bool;
    /// `true` when the point lies inside a goal, beyond the interior margin
    /// behind the goal line.
    fn deep_in_goal(&self, xy: [f64; 2]) -> bool;
}

/// Field dimensions in mm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldGeometry {
    /// Playing surface length along x.
    pub field_length_mm: f64,
    /// Playing surface width along y.
    pub field_width_mm: f64,
    /// Run-off area beyond the field lines on every side.
    pub boundary_width_mm: f64,
    /// Goal mouth width along y.
    pub goal_width_mm: f64,
    /// Goal interior depth behind the goal line.
    pub goal_depth_mm: f64,
    /// Distance behind the goal line past which a point counts as deep
    /// inside the goal.
    pub goal_interior_margin_mm: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            field_length_mm: 9000.0,
            field_width_mm: 6000.0,
            boundary_width_mm: 300.0,
            goal_width_mm: 1000.0,
            goal_depth_mm: 180.0,
            goal_interior_margin_mm: 100.0,
        }
    }
}

impl FieldGeometry {
    /// Load field dimensions from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn half_length(&self) -> f64 {
        0.5 * self.field_length_mm
    }

    fn half_width(&self) -> f64 {
        0.5 * self.field_width_mm
    }
}

impl FieldMask for FieldGeometry {
    fn in_field_or_boundary(&self, xy: [f64; 2]) -> bool {
        xy[0].abs() <= self.half_length() + self.boundary_width_mm
            && xy[1].abs() <= self.half_width() + self.boundary_width_mm
    }

    fn deep_in_goal(&self, xy: [f64; 2]) -> bool {
        let behind_line = xy[0].abs() - self.half_length();
        behind_line > self.goal_interior_margin_mm
            && behind_line <= self.goal_depth_mm
            && xy[1].abs() <= 0.5 * self.goal_width_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_center_is_playable() {
        let field = FieldGeometry::default();
        assert!(field.in_field_or_boundary([0.0, 0.0]));
    }

    #[test]
    fn boundary_runoff_is_playable_but_beyond_is_not() {
        let field = FieldGeometry::default();
        // just inside the run-off area past the far touch line
        assert!(field.in_field_or_boundary([4700.0, 0.0]));
        assert!(field.in_field_or_boundary([0.0, 3250.0]));
        // past the run-off
        assert!(!field.in_field_or_boundary([4900.0, 0.0]));
        assert!(!field.in_field_or_boundary([0.0, -3400.0]));
    }

    #[test]
    fn deep_in_goal_requires_margin_and_goal_mouth() {
        let field = FieldGeometry::default();
        // 150 mm behind the goal line, centered: deep
        assert!(field.deep_in_goal([4650.0, 0.0]));
        assert!(field.deep_in_goal([-4650.0, 120.0]));
        // just behind the line, within the margin: not deep
        assert!(!field.deep_in_goal([4550.0, 0.0]));
        // behind the line but outside the goal mouth
        assert!(!field.deep_in_goal([4650.0, 800.0]));
        // past the goal interior entirely
        assert!(!field.deep_in_goal([4700.0, 0.0]));
    }
}
