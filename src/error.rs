use std::path::PathBuf;

/// Errors raised while loading inputs and turning pipeline output into pieces
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("could not load image {path}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not load font {0}")]
    Font(PathBuf),

    #[error("debug directory is not empty: {0}")]
    DebugDirNotEmpty(PathBuf),

    #[error("missing pipeline metadata `{0}`")]
    MissingMetadata(&'static str),

    #[error("unknown {kind} label `{value}`")]
    UnknownLabel { kind: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
