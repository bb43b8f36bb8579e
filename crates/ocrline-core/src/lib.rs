//! Core library for OCR reading-order reconstruction.
//!
//! This crate provides:
//! - Word box normalization from document-analysis polygons
//! - Line grouping (overlap, density, and centroid strategies)
//! - Strategy selection and spacing-aware line serialization
//! - A page pipeline that keeps document order, sequential or parallel
//! - Table grid reconstruction and word error rate evaluation

pub mod error;
pub mod eval;
pub mod geometry;
pub mod grouping;
pub mod models;
pub mod pipeline;
pub mod serialize;
pub mod table;

pub use error::{EvalError, GeometryError, OcrlineError, Result};
pub use eval::{word_error_rate, WerReport};
pub use geometry::{Line, LineStats, WordBox};
pub use grouping::{
    CentroidGrouper, DensityGrouper, GroupingStrategy, LineGrouper, OverlapGrouper, Selection,
    StrategySelector,
};
pub use models::analyze::{AnalyzeResult, RawPage, RawTable, RawWord};
pub use models::config::OcrlineConfig;
pub use pipeline::{DocumentResult, PageError, PagePipeline, PageResult, WordIssue};
pub use serialize::LineSerializer;
pub use table::{render_tables, TableGrid};

/// Re-export clustering types.
pub use ocrline_cluster::{ClusterError, ClusterLabel, Dbscan, DensityClusterer, GridDbscan, Points};
