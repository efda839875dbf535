pub mod annotate;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;

pub use annotate::Annotator;
pub use config::{AnalysisConfig, AnnotationConfig, ChannelRange, ColorRanges};
pub use detection::{Analysis, PieceAnalyzer, load_image};
pub use error::AnalysisError;
pub use models::{Piece, PieceColor, PieceShape};
pub use pipeline::{
    BoundingBox, DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep,
};
pub use report::{ColorCounts, Report};
