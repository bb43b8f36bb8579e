//! Density clustering abstraction layer for ocrline.
//!
//! This crate provides a unified interface for density-based clustering
//! over small feature matrices:
//! - [`Dbscan`] scans every pair of points, best for the few hundred words of a page
//! - [`GridDbscan`] buckets points into `eps`-sized cells before scanning neighbours
//!
//! Both engines assign identical labels for identical input.

mod backend;
mod error;
mod points;

pub use backend::grid::GridDbscan;
pub use backend::exhaustive::Dbscan;
pub use backend::{ClusterLabel, DensityClusterer};
pub use error::ClusterError;
pub use points::Points;

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
