//! Error types for the ocrline-core library.

use thiserror::Error;

/// Main error type for the ocrline library.
#[derive(Error, Debug)]
pub enum OcrlineError {
    /// Word or page geometry could not be normalized.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Clustering error from the density layer.
    #[error("clustering error: {0}")]
    Cluster(#[from] ocrline_cluster::ClusterError),

    /// Evaluation error.
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// JSON decoding or encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Malformed geometry in the decoded input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Polygon has fewer than three points.
    #[error("polygon needs at least 3 points, got {0} coordinates")]
    TooFewPoints(usize),

    /// Polygon coordinate list has odd length.
    #[error("polygon has an odd number of coordinates ({0})")]
    OddCoordinateCount(usize),

    /// A polygon coordinate is NaN or infinite.
    #[error("polygon coordinate {index} is not finite")]
    NonFiniteCoordinate { index: usize },

    /// Page width or height is zero, negative, or not finite.
    #[error("invalid page dimensions {width}x{height}")]
    InvalidPageSize { width: f64, height: f64 },
}

/// Errors related to transcript evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Prediction and reference lists have different lengths.
    #[error("got {predictions} predictions for {references} references")]
    LengthMismatch {
        predictions: usize,
        references: usize,
    },

    /// References contain no words but predictions do.
    #[error("references contain no words")]
    EmptyReference,
}

/// Result type for the ocrline library.
pub type Result<T> = std::result::Result<T, OcrlineError>;
