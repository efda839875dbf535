use crate::error::AnalysisError;
use anyhow::Result;
use image::DynamicImage;
use imageproc::point::Point;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Bounding box in the original image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Center of the box, rounded down
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Data that flows through the pipeline
/// Each PipelineData is either the full image or one piece's region of it
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (grayscale, binary or a color crop depending on the step)
    pub image: DynamicImage,

    /// Reference to the original image (shared via Arc)
    pub original: Arc<DynamicImage>,

    /// Bounding box in the original image (None means full image)
    pub bbox: Option<BoundingBox>,

    /// Simplified outer boundary of the region, if it came from a contour
    pub contour: Option<Arc<Vec<Point<i32>>>>,

    /// Metadata for tracking properties (e.g., "area", "color", etc.)
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    Float(f64),
    String(String),
    Int(i64),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
            contour: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for one contour's region of an image
    pub fn from_region(
        image: DynamicImage,
        original: Arc<DynamicImage>,
        bbox: BoundingBox,
        contour: Vec<Point<i32>>,
    ) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
            contour: Some(Arc::new(contour)),
            metadata: HashMap::new(),
        }
    }

    /// Same region and metadata, new image
    pub fn with_image(self, image: DynamicImage) -> Self {
        Self { image, ..self }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key) {
            Some(MetadataValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Float metadata that a previous step must have written
    pub fn require_float(&self, key: &'static str) -> Result<f64, AnalysisError> {
        self.get_float(key).ok_or(AnalysisError::MissingMetadata(key))
    }

    pub fn require_int(&self, key: &'static str) -> Result<i64, AnalysisError> {
        self.get_int(key).ok_or(AnalysisError::MissingMetadata(key))
    }

    pub fn require_bool(&self, key: &'static str) -> Result<bool, AnalysisError> {
        self.get_bool(key).ok_or(AnalysisError::MissingMetadata(key))
    }

    pub fn require_string(&self, key: &'static str) -> Result<&str, AnalysisError> {
        self.get_string(key).ok_or(AnalysisError::MissingMetadata(key))
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        prepare_debug_dir(&output_dir)?;
        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run only the first `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        let mut data = vec![PipelineData::from_image(input)];
        self.save_debug_outputs("00_input", &data)?;

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!(step = step.name(), items = data.len(), "running step");
            data = step.process(data, &self.context)?;

            let step_dir_name = format!(
                "{:02}_{}",
                step_idx + 1,
                step.name().to_lowercase().replace(' ', "_")
            );
            self.save_debug_outputs(&step_dir_name, &data)?;

            debug!(step = step.name(), items = data.len(), "step finished");
        }

        Ok(data)
    }

    fn save_debug_outputs(&self, step_dir_name: &str, data: &[PipelineData]) -> Result<(), AnalysisError> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };

        let step_dir = debug_config.output_dir.join(step_dir_name);
        std::fs::create_dir_all(&step_dir)?;

        for (idx, item) in data.iter().enumerate() {
            item.image.save(step_dir.join(format!("{:02}.png", idx + 1)))?;
        }

        debug!(count = data.len(), dir = step_dir_name, "saved debug images");
        Ok(())
    }
}

fn prepare_debug_dir(output_dir: &Path) -> Result<(), AnalysisError> {
    if output_dir.exists() {
        if std::fs::read_dir(output_dir)?.next().is_some() {
            return Err(AnalysisError::DebugDirNotEmpty(output_dir.to_path_buf()));
        }
    } else {
        std::fs::create_dir_all(output_dir)?;
    }
    Ok(())
}
