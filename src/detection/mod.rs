pub mod classify;
pub mod contours;
pub mod preprocessing;
pub mod steps;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::models::Piece;
use crate::pipeline::Pipeline;
use crate::report::Report;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use steps::*;
use tracing::info;

/// Pieces found in one image plus their aggregated counts
#[derive(Debug, Clone)]
pub struct Analysis {
    pub pieces: Vec<Piece>,
    pub report: Report,
}

/// Main detection pipeline orchestrator
pub struct PieceAnalyzer {
    pub config: AnalysisConfig,
    debug_dir: Option<PathBuf>,
}

impl PieceAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            debug_dir: None,
        }
    }

    /// Save every stage's images below `dir` (must be empty or absent)
    pub fn with_debug(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    /// Build the standard grayscale → threshold → contours → classify pipeline
    pub fn build_pipeline(&self) -> anyhow::Result<Pipeline> {
        let pipeline = build_standard_pipeline(&self.config);
        match &self.debug_dir {
            Some(dir) => pipeline.with_debug(dir.clone()),
            None => Ok(pipeline),
        }
    }

    /// Detect and classify every piece in the image, in contour order
    pub fn detect(&self, img: &DynamicImage) -> anyhow::Result<Vec<Piece>> {
        let pipeline = self.build_pipeline()?;
        let results = pipeline.run(img.clone())?;

        let pieces = results
            .iter()
            .enumerate()
            .map(|(i, data)| Piece::from_data(i + 1, data))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pieces)
    }

    /// Detect pieces and aggregate them into a report labelled with `source`
    pub fn analyze(&self, img: &DynamicImage, source: &str) -> anyhow::Result<Analysis> {
        let pieces = self.detect(img)?;
        let report = Report::new(source, &pieces);

        info!(source, pieces = report.total, "analysis complete");

        Ok(Analysis { pieces, report })
    }
}

impl Default for PieceAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Decode an image file, reporting the path on failure
pub fn load_image(path: &Path) -> Result<DynamicImage, AnalysisError> {
    let load = || -> Result<DynamicImage, image::ImageError> {
        Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
    };

    load().map_err(|source| AnalysisError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the standard piece-counting pipeline from a configuration
pub fn build_standard_pipeline(config: &AnalysisConfig) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(ThresholdStep {
            threshold: config.threshold,
        }))
        .add_step(Arc::new(ContourExtractionStep))
        .add_step(Arc::new(ClassificationStep {
            colors: config.colors.clone(),
            max_circular_vertices: config.max_circular_vertices,
            approx_epsilon: config.approx_epsilon,
            hole_area_threshold: config.hole_area_threshold,
        }))
}
