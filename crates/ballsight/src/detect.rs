//! Best-candidate selection over one frame's region list.
//!
//! [`BallDetector`] owns the configuration snapshot, the resolved color
//! channels and the reusable histogram buffer. One call to
//! [`BallDetector::detect`] scores every size-accepted candidate through
//! the filter stages and reports the single best ball, or an explicit
//! negative result when nothing survives.

use image::GrayImage;

use crate::camera::FieldProjector;
use crate::colors::{BallChannels, ColorMap};
use crate::config::DetectBallsConfig;
use crate::error::DetectError;
use crate::field::FieldMask;
use crate::histogram::ColorHistogram;
use crate::region::Region;
use crate::score;
use crate::{BallDetection, DetectionReport};

/// Padding added around a candidate's bounding box before histogram
/// sampling (pixels per side).
const HISTOGRAM_PAD_PX: i32 = 4;

/// Histogram channels with every label resolved.
#[derive(Debug, Clone, Copy)]
struct HistogramChannels {
    orange: u8,
    pink: u8,
    yellow: u8,
    field: u8,
}

impl HistogramChannels {
    fn from_resolved(channels: &BallChannels) -> Option<Self> {
        Some(Self {
            orange: channels.orange?,
            pink: channels.pink?,
            yellow: channels.yellow?,
            field: channels.field?,
        })
    }
}

/// Single-frame, single-object ball detector.
///
/// Create once per color class, detect on many frames. Each invocation uses
/// the current configuration as an immutable snapshot.
pub struct BallDetector {
    config: DetectBallsConfig,
    colors: ColorMap,
    channels: BallChannels,
    histogram: ColorHistogram,
}

impl BallDetector {
    /// Create a detector from a configuration and the frame's color map.
    ///
    /// Histogram channels are resolved here, once; missing labels are
    /// warned about and disable the histogram stage at detection time.
    pub fn new(config: DetectBallsConfig, colors: ColorMap) -> Self {
        let channels = BallChannels::resolve(&colors);
        let histogram = ColorHistogram::new(colors.channel_count());
        Self {
            config,
            colors,
            channels,
            histogram,
        }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &DetectBallsConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut DetectBallsConfig {
        &mut self.config
    }

    /// Score one frame's candidates and select the best ball.
    ///
    /// `regions` is the upstream region list for the configured ball color;
    /// `segmented` is the class-indexed frame the regions were extracted
    /// from. Ties on confidence keep the earliest candidate in list order.
    pub fn detect(
        &mut self,
        segmented: &GrayImage,
        regions: &[Region],
        projector: &dyn FieldProjector,
        field: &dyn FieldMask,
    ) -> Result<DetectionReport, DetectError> {
        let (width, height) = segmented.dimensions();

        let Some(ball_channel) = self.colors.channel(&self.config.ball_color) else {
            return Err(DetectError::UnknownBallColor {
                label: self.config.ball_color.clone(),
            });
        };

        if self.config.max_balls == 0 {
            return Ok(DetectionReport::empty(width, height));
        }
        if self.config.max_balls > 1 {
            tracing::warn!(
                max_balls = self.config.max_balls,
                "multiple ball detection is not supported; reporting the single best candidate"
            );
        }

        // Snapshot the stage switches for the whole invocation.
        let size = self.config.size;
        let gauss = self.config.gaussian;
        let geometry = self.config.geometry;
        let ball_height_mm = self.config.ball_height_mm;

        let filter_gauss = if gauss.enable && gauss.area_variance <= 0.0 {
            tracing::warn!(
                variance = gauss.area_variance,
                "gaussian size filter needs a positive variance; disabling for this frame"
            );
            false
        } else {
            gauss.enable
        };

        let hist_channels = if self.config.histogram.enable {
            if self.channels.orange != Some(ball_channel) {
                tracing::warn!(
                    ball_color = %self.config.ball_color,
                    "histogram check is tuned for orange balls"
                );
            }
            let resolved = HistogramChannels::from_resolved(&self.channels);
            if resolved.is_none() {
                tracing::warn!(
                    "histogram channels are incompletely defined; disabling histogram check"
                );
            }
            resolved
        } else {
            None
        };

        let mut best: Option<&Region> = None;
        let mut best_conf: f32 = 0.0;
        let mut n_candidates = 0usize;

        for region in regions {
            if !size.accepts(region) {
                continue;
            }
            n_candidates += 1;

            let mut conf: f32 = if filter_gauss {
                score::gaussian_size_confidence(
                    region.area,
                    gauss.expected_area_min,
                    gauss.expected_area_max,
                    gauss.area_variance,
                )
            } else {
                1.0
            };

            let field_pos = projector.image_to_field(region.centroid(), ball_height_mm);

            if geometry.ball_in_field {
                match field_pos {
                    Some(p) if field.in_field_or_boundary([p[0], p[1]]) => {}
                    _ => conf = 0.0,
                }
            }

            if geometry.ball_in_goal {
                if let Some(p) = field_pos {
                    if field.deep_in_goal([p[0], p[1]]) {
                        conf = 0.0;
                    }
                }
            }

            // Near-robot exclusion would zero the confidence here; the
            // stage is a reserved extension point and not yet enforced.

            if let Some(channels) = hist_channels {
                if conf > 0.0 && !self.check_histogram(segmented, region, channels) {
                    conf = 0.0;
                }
            }

            if conf > best_conf {
                best_conf = conf;
                best = Some(region);
            }
        }

        let ball = match best {
            Some(region) if best_conf > 0.0 => {
                // Re-project from the winning candidate's own centroid.
                let field_xy = projector
                    .image_to_field(region.centroid(), ball_height_mm)
                    .map(|p| [p[0], p[1]])
                    .unwrap_or([0.0, 0.0]);
                BallDetection {
                    present: true,
                    confidence: best_conf,
                    pixel_xy: region.centroid(),
                    field_xy,
                    area: region.area,
                }
            }
            _ => BallDetection::none(),
        };

        tracing::debug!(
            n_candidates,
            confidence = ball.confidence,
            present = ball.present,
            "ball selection complete"
        );

        Ok(DetectionReport {
            ball,
            n_candidates,
            image_size: [width, height],
        })
    }

    fn check_histogram(
        &mut self,
        segmented: &GrayImage,
        region: &Region,
        channels: HistogramChannels,
    ) -> bool {
        self.histogram.clear();
        let sampled = self.histogram.add_box(
            segmented,
            region.x1 - HISTOGRAM_PAD_PX,
            region.y1 - HISTOGRAM_PAD_PX,
            region.x2 + HISTOGRAM_PAD_PX,
            region.y2 + HISTOGRAM_PAD_PX,
        );

        let orange = self.histogram.channel(channels.orange);
        let markeryness = score::markeryness(
            self.histogram.channel(channels.pink),
            self.histogram.channel(channels.yellow),
            orange,
        );
        let greenness = score::greenness(self.histogram.channel(channels.field), orange, sampled);
        tracing::trace!(markeryness, greenness, "histogram check");

        score::histogram_accepts(greenness, markeryness, &self.config.histogram)
    }
}
