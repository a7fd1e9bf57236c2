//! Calibrated camera model and the image→field projection.
//!
//! Provides pinhole intrinsics with Brown-Conrady radial-tangential
//! distortion and a rigid world→camera transform. The detector consumes only
//! the [`FieldProjector`] seam: pixel coordinates plus an assumed object
//! height above the field plane map to a world-frame point.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Mapping from image pixels to field-plane coordinates.
///
/// Implementations cast the optical ray through a pixel and intersect it
/// with the horizontal plane `z = object_height_mm`. `None` means the ray
/// does not hit the plane in front of the camera.
pub trait FieldProjector {
    /// Project an image pixel to world coordinates `[x, y, object_height_mm]`.
    fn image_to_field(&self, pixel_xy: [f64; 2], object_height_mm: f64) -> Option<[f64; 3]>;
}

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Returns `true` when focal lengths are finite and non-zero.
    pub fn is_valid(self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.fx.abs() > 1e-12
            && self.fy.abs() > 1e-12
    }

    /// Convert pixel coordinates to normalized pinhole coordinates.
    pub fn pixel_to_normalized(self, pixel_xy: [f64; 2]) -> Option<[f64; 2]> {
        if !self.is_valid() {
            return None;
        }
        let x = (pixel_xy[0] - self.cx) / self.fx;
        let y = (pixel_xy[1] - self.cy) / self.fy;
        if x.is_finite() && y.is_finite() {
            Some([x, y])
        } else {
            None
        }
    }

    /// Convert normalized pinhole coordinates to pixel coordinates.
    pub fn normalized_to_pixel(self, normalized_xy: [f64; 2]) -> [f64; 2] {
        [
            self.fx * normalized_xy[0] + self.cx,
            self.fy * normalized_xy[1] + self.cy,
        ]
    }
}

/// Brown-Conrady radial-tangential distortion coefficients.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RadialTangentialDistortion {
    /// Radial coefficient k1.
    pub k1: f64,
    /// Radial coefficient k2.
    pub k2: f64,
    /// Tangential coefficient p1.
    pub p1: f64,
    /// Tangential coefficient p2.
    pub p2: f64,
    /// Radial coefficient k3.
    pub k3: f64,
}

impl RadialTangentialDistortion {
    /// Apply distortion to normalized coordinates.
    pub fn distort_normalized(self, normalized_xy: [f64; 2]) -> [f64; 2] {
        let x = normalized_xy[0];
        let y = normalized_xy[1];
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        [x * radial + x_tan, y * radial + y_tan]
    }
}

/// Distortion inversion settings used by iterative undistortion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UndistortConfig {
    /// Maximum fixed-point iterations.
    pub max_iters: usize,
    /// Stop when coordinate update norm is below this threshold.
    pub eps: f64,
}

impl Default for UndistortConfig {
    fn default() -> Self {
        Self {
            max_iters: 15,
            eps: 1e-12,
        }
    }
}

/// Rigid world→camera transform: `p_cam = rotation * p_world + translation`.
///
/// World coordinates are field coordinates in mm, origin at the field
/// center, z up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraExtrinsics {
    /// World→camera rotation.
    pub rotation: UnitQuaternion<f64>,
    /// World→camera translation (mm).
    pub translation: Vector3<f64>,
}

impl CameraExtrinsics {
    /// Camera center expressed in world coordinates.
    pub fn camera_center_world(&self) -> Vector3<f64> {
        -(self.rotation.inverse() * self.translation)
    }
}

impl Default for CameraExtrinsics {
    fn default() -> Self {
        // Overhead camera 4 m above the field center, optical axis pointing
        // straight down with x aligned to field x.
        Self {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI),
            translation: Vector3::new(0.0, 0.0, 4000.0),
        }
    }
}

/// Complete calibrated camera (intrinsics + distortion + extrinsics).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraModel {
    /// Camera intrinsics.
    pub intrinsics: CameraIntrinsics,
    /// Distortion coefficients.
    pub distortion: RadialTangentialDistortion,
    /// World→camera rigid transform.
    pub extrinsics: CameraExtrinsics,
}

impl CameraModel {
    /// Load a camera model from a JSON file.
    pub fn from_json_file(
        path: &std::path::Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Distort a normalized ray direction into image pixel coordinates.
    pub fn project_normalized(self, normalized_xy: [f64; 2]) -> Option<[f64; 2]> {
        let xd = self.distortion.distort_normalized(normalized_xy);
        let pix = self.intrinsics.normalized_to_pixel(xd);
        if pix[0].is_finite() && pix[1].is_finite() {
            Some(pix)
        } else {
            None
        }
    }

    /// Undistort a pixel into normalized pinhole coordinates with default
    /// iterative settings.
    pub fn undistort_to_normalized(self, pixel_xy: [f64; 2]) -> Option<[f64; 2]> {
        self.undistort_to_normalized_with(pixel_xy, UndistortConfig::default())
    }

    /// Undistort a pixel into normalized pinhole coordinates.
    pub fn undistort_to_normalized_with(
        self,
        pixel_xy: [f64; 2],
        cfg: UndistortConfig,
    ) -> Option<[f64; 2]> {
        let xd = self.intrinsics.pixel_to_normalized(pixel_xy)?;
        let mut x = xd[0];
        let mut y = xd[1];

        for _ in 0..cfg.max_iters.max(1) {
            let r2 = x * x + y * y;
            let r4 = r2 * r2;
            let r6 = r4 * r2;
            let radial =
                1.0 + self.distortion.k1 * r2 + self.distortion.k2 * r4 + self.distortion.k3 * r6;
            if !radial.is_finite() || radial.abs() < 1e-12 {
                return None;
            }

            let dx_tan = 2.0 * self.distortion.p1 * x * y + self.distortion.p2 * (r2 + 2.0 * x * x);
            let dy_tan = self.distortion.p1 * (r2 + 2.0 * y * y) + 2.0 * self.distortion.p2 * x * y;
            let x_next = (xd[0] - dx_tan) / radial;
            let y_next = (xd[1] - dy_tan) / radial;

            if !x_next.is_finite() || !y_next.is_finite() {
                return None;
            }

            let dx = x_next - x;
            let dy = y_next - y;
            x = x_next;
            y = y_next;

            if (dx * dx + dy * dy).sqrt() <= cfg.eps.max(0.0) {
                break;
            }
        }

        Some([x, y])
    }
}

impl FieldProjector for CameraModel {
    fn image_to_field(&self, pixel_xy: [f64; 2], object_height_mm: f64) -> Option<[f64; 3]> {
        let normalized = self.undistort_to_normalized(pixel_xy)?;

        // Optical ray through the pixel, expressed in world coordinates.
        let ray_cam = Vector3::new(normalized[0], normalized[1], 1.0);
        let rot_inv = self.extrinsics.rotation.inverse();
        let ray_world = rot_inv * ray_cam;
        let origin_world = self.extrinsics.camera_center_world();

        // Intersect with the horizontal plane z = object_height_mm.
        if ray_world.z.abs() < 1e-12 {
            return None;
        }
        let s = (object_height_mm - origin_world.z) / ray_world.z;
        if !s.is_finite() || s <= 0.0 {
            return None;
        }

        let hit = origin_world + ray_world * s;
        if hit.x.is_finite() && hit.y.is_finite() {
            Some([hit.x, hit.y, object_height_mm])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn overhead_camera() -> CameraModel {
        CameraModel {
            intrinsics: CameraIntrinsics {
                fx: 900.0,
                fy: 920.0,
                cx: 640.0,
                cy: 480.0,
            },
            distortion: RadialTangentialDistortion::default(),
            extrinsics: CameraExtrinsics::default(),
        }
    }

    #[test]
    fn intrinsics_validation_rejects_zero_focal() {
        let k = CameraIntrinsics {
            fx: 0.0,
            fy: 500.0,
            cx: 0.0,
            cy: 0.0,
        };
        assert!(!k.is_valid());
        assert!(k.pixel_to_normalized([100.0, 100.0]).is_none());
    }

    #[test]
    fn undistort_roundtrip_with_distortion_is_stable() {
        let mut cam = overhead_camera();
        cam.distortion = RadialTangentialDistortion {
            k1: -0.12,
            k2: 0.03,
            p1: 0.001,
            p2: -0.0008,
            k3: 0.0,
        };
        let n = [0.21, -0.17];
        let pix = cam.project_normalized(n).unwrap();
        let back = cam.undistort_to_normalized(pix).unwrap();
        assert_relative_eq!(back[0], n[0], epsilon = 1e-6);
        assert_relative_eq!(back[1], n[1], epsilon = 1e-6);
    }

    #[test]
    fn principal_point_projects_to_point_below_camera() {
        let cam = overhead_camera();
        let hit = cam.image_to_field([640.0, 480.0], 30.0).unwrap();
        assert_relative_eq!(hit[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(hit[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(hit[2], 30.0, epsilon = 1e-9);
    }

    #[test]
    fn off_axis_pixel_projects_proportionally_to_height() {
        let cam = overhead_camera();
        // normalized x = 0.1, camera 4000 mm up: ground hit at x = 400 mm
        let hit = cam.image_to_field([640.0 + 90.0, 480.0], 0.0).unwrap();
        assert_relative_eq!(hit[0], 400.0, epsilon = 1e-6);
        assert_relative_eq!(hit[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn plane_above_camera_is_unreachable() {
        let cam = overhead_camera();
        assert!(cam.image_to_field([640.0, 480.0], 5000.0).is_none());
    }
}
