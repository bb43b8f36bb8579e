//! Error types for the clustering layer.

use thiserror::Error;

/// Errors that can occur while building features or clustering them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// A clustering parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Feature data does not fit the requested shape.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A feature value is NaN or infinite.
    #[error("non-finite feature value at row {row}, column {col}")]
    NonFinite { row: usize, col: usize },
}
