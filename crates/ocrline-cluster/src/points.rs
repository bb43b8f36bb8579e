//! Feature matrix for clustering input.

use ndarray::{Array2, ArrayView1};

use crate::error::ClusterError;
use crate::Result;

/// A dense, row-major feature matrix with one row per point.
///
/// Every value is checked to be finite at construction time, so engines
/// never have to deal with NaN distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Points {
    data: Array2<f64>,
}

impl Points {
    /// Create a matrix from raw row-major data.
    pub fn from_shape_vec(rows: usize, dims: usize, data: Vec<f64>) -> Result<Self> {
        let expected = rows * dims;
        if data.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }

        let data = Array2::from_shape_vec((rows, dims), data).map_err(|_| {
            ClusterError::DimensionMismatch {
                expected,
                actual: expected,
            }
        })?;

        Self::from_array(data)
    }

    /// Create a two-column matrix from `(a, b)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut data = Vec::new();
        for (a, b) in pairs {
            data.push(a);
            data.push(b);
        }
        let rows = data.len() / 2;
        Self::from_shape_vec(rows, 2, data)
    }

    /// Wrap an existing array, validating that every value is finite.
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        for ((row, col), value) in data.indexed_iter() {
            if !value.is_finite() {
                return Err(ClusterError::NonFinite { row, col });
            }
        }
        Ok(Self { data })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Check if there are no points.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Number of features per point.
    pub fn dims(&self) -> usize {
        self.data.ncols()
    }

    /// Get a single point.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.row(a)
            .iter()
            .zip(self.row(b).iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}
