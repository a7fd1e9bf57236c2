//! ballsight — best-ball selection from color-segmented robot soccer frames.
//!
//! Given one frame's region candidates for the ball color class, the
//! detector scores each candidate through independent filter stages and
//! reports the single highest-confidence ball. The stages are:
//!
//! 1. **Size gate** – coarse width/height/area bounds on the bounding box.
//! 2. **Size expectation** – smooth gaussian scoring of the pixel area
//!    against the expected band.
//! 3. **Field membership** – the centroid projected to the field plane must
//!    lie on the field or its boundary run-off.
//! 4. **Goal exclusion** – projections deep inside a goal are suppressed.
//! 5. **Near-robot exclusion** – reserved extension point, not yet enforced.
//! 6. **Color histogram** – pink/yellow marker contamination versus green
//!    surround disambiguation.
//!
//! Confidence composition is monotonic non-increasing: the size-expectation
//! stage sets the starting value and every later stage either keeps it or
//! zeroes it. Ties between candidates keep the first one seen, and a frame
//! with nothing acceptable yields an explicit negative result rather than
//! an absent one.
//!
//! Camera projection and field geometry enter through the
//! [`FieldProjector`] and [`FieldMask`] traits; the bundled
//! [`CameraModel`] and [`FieldGeometry`] are stock implementations.

pub mod camera;
pub mod colors;
pub mod config;
pub mod detect;
pub mod error;
pub mod field;
pub mod histogram;
pub mod region;
pub mod score;

pub use camera::{
    CameraExtrinsics, CameraIntrinsics, CameraModel, FieldProjector, RadialTangentialDistortion,
};
pub use colors::{BallChannels, ColorMap};
pub use config::{
    DetectBallsConfig, GaussianSizeParams, GeometryFilterParams, HistogramParams, NearRobotParams,
};
pub use detect::BallDetector;
pub use error::DetectError;
pub use field::{FieldGeometry, FieldMask};
pub use histogram::ColorHistogram;
pub use region::{Region, SizeBounds};

/// A single ball observation.
///
/// `present == false` marks an explicit negative result; the remaining
/// fields are zeroed in that case and must not be interpreted.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct BallDetection {
    /// `true` when a ball was selected this frame.
    pub present: bool,
    /// Detection confidence in [0, 1]; 0 means definite rejection.
    pub confidence: f32,
    /// Candidate centroid in image pixels.
    pub pixel_xy: [f64; 2],
    /// Projected position on the field plane (mm).
    pub field_xy: [f64; 2],
    /// Candidate pixel area.
    pub area: u32,
}

impl BallDetection {
    /// The explicit negative result.
    pub fn none() -> Self {
        Self {
            present: false,
            confidence: 0.0,
            pixel_xy: [0.0, 0.0],
            field_xy: [0.0, 0.0],
            area: 0,
        }
    }
}

/// Full detection report for one frame and one color class.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DetectionReport {
    /// The selected ball, or the explicit negative result.
    pub ball: BallDetection,
    /// Number of candidates that passed the size gate and were scored.
    pub n_candidates: usize,
    /// Segmented frame dimensions [width, height].
    pub image_size: [u32; 2],
}

impl DetectionReport {
    /// Construct an empty report for a frame with the provided dimensions.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            ball: BallDetection::none(),
            n_candidates: 0,
            image_size: [width, height],
        }
    }
}
