mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from piececount for tests
pub use piececount::{
    AnalysisConfig, Annotator, AnnotationConfig, BoundingBox, Piece, PieceAnalyzer, PieceColor,
    PieceShape, Report,
};
