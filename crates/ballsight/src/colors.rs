//! Color-class registry for the segmented frame.
//!
//! The thresholding stage labels every pixel with a small channel id; the
//! mapping from human-readable color labels to those ids is loaded once per
//! configuration and queried here. Channel resolution failures degrade the
//! dependent filter rather than aborting detection.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Color label the histogram stage expects the ball class to carry.
pub const LABEL_ORANGE: &str = "Orange";
/// Pink marker color label.
pub const LABEL_PINK: &str = "Pink";
/// Yellow marker color label.
pub const LABEL_YELLOW: &str = "Yellow";
/// Field carpet color label.
pub const LABEL_FIELD: &str = "Field Green";

/// Ordered color-class labels; a pixel value in the segmented frame indexes
/// this list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap {
    labels: Vec<String>,
}

impl ColorMap {
    /// Build a map from an ordered label list (index = channel id).
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load a label list from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Channel id for a label, or `None` if the label is not defined.
    pub fn channel(&self, label: &str) -> Option<u8> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| idx as u8)
    }

    /// Number of defined channels.
    pub fn channel_count(&self) -> usize {
        self.labels.len()
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::from_labels(
            [
                "Background",
                LABEL_ORANGE,
                LABEL_YELLOW,
                "Blue",
                LABEL_PINK,
                LABEL_FIELD,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }
}

/// Channels the histogram disambiguation stage samples.
///
/// Resolved once per invocation; any missing channel is warned about and
/// leaves its slot `None`, which disables the stage for that frame.
#[derive(Debug, Clone, Copy)]
pub struct BallChannels {
    pub orange: Option<u8>,
    pub pink: Option<u8>,
    pub yellow: Option<u8>,
    pub field: Option<u8>,
}

impl BallChannels {
    /// Resolve the four histogram channels, warning per missing label.
    pub fn resolve(colors: &ColorMap) -> Self {
        let lookup = |label: &str| {
            let id = colors.channel(label);
            if id.is_none() {
                tracing::warn!(label, "color label not defined in the color map");
            }
            id
        };
        Self {
            orange: lookup(LABEL_ORANGE),
            pink: lookup(LABEL_PINK),
            yellow: lookup(LABEL_YELLOW),
            field: lookup(LABEL_FIELD),
        }
    }

    /// `true` when every histogram channel resolved.
    pub fn all_resolved(&self) -> bool {
        self.orange.is_some()
            && self.pink.is_some()
            && self.yellow.is_some()
            && self.field.is_some()
    }
}
