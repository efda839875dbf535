//! Analysis configuration

use crate::error::AnalysisError;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inclusive per-channel range, channels in R, G, B order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ChannelRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, pixel: &Rgb<u8>) -> bool {
        pixel
            .0
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

/// Color masks, checked in priority order red, blue, white
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRanges {
    pub red: ChannelRange,
    pub blue: ChannelRange,
    pub white: ChannelRange,
}

impl Default for ColorRanges {
    fn default() -> Self {
        Self {
            red: ChannelRange::new([100, 0, 0], [255, 100, 100]),
            blue: ChannelRange::new([0, 0, 100], [100, 100, 255]),
            white: ChannelRange::new([200, 200, 200], [255, 255, 255]),
        }
    }
}

/// Overlay drawing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub box_thickness: u32,
    pub marker_radius: i32,
    pub label_scale: f32,
    /// TrueType font for labels; the bundled DejaVu Sans is used when unset
    pub font_path: Option<PathBuf>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            box_thickness: 2,
            marker_radius: 5,
            label_scale: 16.0,
            font_path: None,
        }
    }
}

/// Main analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Gray levels strictly above this value are foreground
    pub threshold: u8,
    /// Pieces with a smaller contour area are counted as having holes
    pub hole_area_threshold: f64,
    /// Contours with at most this many vertices are circular
    pub max_circular_vertices: usize,
    /// Douglas-Peucker tolerance applied before counting vertices
    pub approx_epsilon: Option<f64>,
    pub colors: ColorRanges,
    pub annotation: AnnotationConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: 127,
            hole_area_threshold: 1000.0,
            max_circular_vertices: 6,
            approx_epsilon: None,
            colors: ColorRanges::default(),
            annotation: AnnotationConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AnalysisError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let red = ColorRanges::default().red;
        assert!(red.contains(&Rgb([100, 100, 100])));
        assert!(red.contains(&Rgb([255, 0, 0])));
        assert!(!red.contains(&Rgb([99, 0, 0])));
        assert!(!red.contains(&Rgb([255, 101, 0])));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "threshold": 90, "annotation": { "marker_radius": 3 } }"#)
                .unwrap();
        assert_eq!(config.threshold, 90);
        assert_eq!(config.annotation.marker_radius, 3);
        assert_eq!(config.annotation.box_thickness, 2);
        assert_eq!(config.hole_area_threshold, 1000.0);
        assert_eq!(config.colors, ColorRanges::default());
    }
}
