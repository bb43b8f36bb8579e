//! Grid-indexed DBSCAN.

use std::collections::HashMap;

use tracing::debug;

use super::{expand_clusters, validate_params};
use crate::{ClusterLabel, DensityClusterer, Points, Result};

/// DBSCAN with a uniform grid of `eps`-sized cells.
///
/// Neighbour candidates come only from the point's own cell and the cells
/// adjacent to it, so dense pages with many well-separated rows avoid the
/// full pairwise scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridDbscan;

impl GridDbscan {
    /// Create a new grid-indexed engine.
    pub fn new() -> Self {
        Self
    }
}

type CellKey = Vec<i64>;

/// Cell coordinates saturate at the `i64` range; points that collapse into
/// an edge cell are still separated by the exact distance check.
fn cell_of(points: &Points, index: usize, eps: f64) -> CellKey {
    points
        .row(index)
        .iter()
        .map(|v| (v / eps).floor() as i64)
        .collect()
}

/// `cell + offset`, or `None` past the edge of the `i64` grid.
fn shifted(cell: &[i64], offset: &[i64]) -> Option<CellKey> {
    cell.iter()
        .zip(offset)
        .map(|(c, o)| c.checked_add(*o))
        .collect()
}

/// All offsets in {-1, 0, 1}^dims.
fn neighbour_offsets(dims: usize) -> Vec<Vec<i64>> {
    let mut offsets: Vec<Vec<i64>> = vec![Vec::with_capacity(dims)];
    for _ in 0..dims {
        offsets = offsets
            .into_iter()
            .flat_map(|prefix| {
                (-1..=1).map(move |d| {
                    let mut next = prefix.clone();
                    next.push(d);
                    next
                })
            })
            .collect();
    }
    offsets
}

impl DensityClusterer for GridDbscan {
    fn cluster(&self, points: &Points, eps: f64, min_samples: usize) -> Result<Vec<ClusterLabel>> {
        validate_params(eps, min_samples)?;

        let n = points.len();
        let mut grid: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let cells: Vec<CellKey> = (0..n).map(|i| cell_of(points, i, eps)).collect();
        for (i, cell) in cells.iter().enumerate() {
            grid.entry(cell.clone()).or_default().push(i);
        }

        let offsets = neighbour_offsets(points.dims());
        let neighborhoods: Vec<Vec<usize>> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let mut neighbors: Vec<usize> = offsets
                    .iter()
                    .filter_map(|offset| grid.get(&shifted(cell, offset)?))
                    .flatten()
                    .copied()
                    .filter(|&j| points.distance(i, j) <= eps)
                    .collect();
                neighbors.sort_unstable();
                neighbors
            })
            .collect();

        debug!(
            "{} indexed {} points into {} cells",
            self.name(),
            n,
            grid.len()
        );

        Ok(expand_clusters(&neighborhoods, min_samples))
    }

    fn name(&self) -> &'static str {
        "grid-dbscan"
    }
}
