use crate::config::ColorRanges;
use crate::detection::{classify, contours, preprocessing};
use crate::models::keys;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};
use anyhow::Result;
use image::DynamicImage;
use tracing::{debug, warn};

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Separate pieces from the background with a fixed binary threshold
pub struct ThresholdStep {
    pub threshold: u8,
}

impl PipelineStep for ThresholdStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let binary = preprocessing::binarize(&gray, self.threshold);
                item.with_image(DynamicImage::ImageLuma8(binary))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Find external contours - splits one binary image into one item per piece.
///
/// Each item carries the color crop of its bounding box from the original
/// image, the simplified contour, and its area and perimeter.
pub struct ContourExtractionStep;

impl PipelineStep for ContourExtractionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let binary = item.image.to_luma8();
            let found = contours::find_external_contours(&binary);
            debug!(count = found.len(), "extracted external contours");

            for contour in found {
                let Some(bbox) = contours::bounding_rect(&contour) else {
                    warn!("skipping contour with no valid bounding box");
                    continue;
                };

                let area = contours::contour_area(&contour);
                let perimeter = contours::closed_perimeter(&contour);
                let roi = item.original.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);

                let region = PipelineData::from_region(roi, item.original.clone(), bbox, contour)
                    .with_metadata(keys::AREA, MetadataValue::Float(area))
                    .with_metadata(keys::PERIMETER, MetadataValue::Float(perimeter));

                result.push(region);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Extraction"
    }
}

/// Label each piece with its color, shape and hole state
pub struct ClassificationStep {
    pub colors: ColorRanges,
    pub max_circular_vertices: usize,
    pub approx_epsilon: Option<f64>,
    pub hole_area_threshold: f64,
}

impl PipelineStep for ClassificationStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::with_capacity(data.len());

        for item in data {
            let area = item.require_float(keys::AREA)?;
            let contour = item
                .contour
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Classification needs a contour region"))?;

            let color = classify::classify_color(&item.image.to_rgb8(), &self.colors);
            let vertices = classify::count_vertices(&contour, self.approx_epsilon);
            let shape = classify::classify_shape(vertices, self.max_circular_vertices);
            let has_hole = classify::has_hole(area, self.hole_area_threshold);

            debug!(area, vertices, %color, %shape, has_hole, "classified piece");

            result.push(
                item.with_metadata(keys::COLOR, MetadataValue::String(color.to_string()))
                    .with_metadata(keys::SHAPE, MetadataValue::String(shape.to_string()))
                    .with_metadata(keys::VERTICES, MetadataValue::Int(vertices as i64))
                    .with_metadata(keys::HAS_HOLE, MetadataValue::Bool(has_hole)),
            );
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Classification"
    }
}
