//! Density-based line grouping.

use std::collections::BTreeMap;

use ndarray::Array2;
use tracing::debug;

use ocrline_cluster::{ClusterLabel, Dbscan, DensityClusterer, Points};

use super::{lines_from_groups, GroupingStrategy, LineGrouper};
use crate::geometry::{Line, WordBox};
use crate::Result;

/// Groups words by DBSCAN over `(center_y, height)`.
///
/// Words of similar size sitting at similar heights end up in the same
/// dense neighbourhood. There is no notion of overlap here, so lines that
/// mix font sizes can split.
pub struct DensityGrouper<C: DensityClusterer = Dbscan> {
    clusterer: C,
    eps: f64,
    min_samples: usize,
}

impl Default for DensityGrouper<Dbscan> {
    fn default() -> Self {
        Self::new(Dbscan::new())
    }
}

impl<C: DensityClusterer> DensityGrouper<C> {
    /// Create a grouper with `eps = 0.02` and `min_samples = 1`.
    pub fn new(clusterer: C) -> Self {
        Self {
            clusterer,
            eps: 0.02,
            min_samples: 1,
        }
    }

    /// Set the neighbourhood radius.
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set the minimum neighbourhood size.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    fn features(words: &[WordBox]) -> Result<Points> {
        let data = Array2::from_shape_fn((words.len(), 2), |(i, j)| match j {
            0 => words[i].center_y(),
            _ => words[i].height(),
        });
        Ok(Points::from_array(data)?)
    }
}

impl<C: DensityClusterer> LineGrouper for DensityGrouper<C> {
    fn group(&self, words: &[WordBox]) -> Result<Vec<Line>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let points = Self::features(words)?;
        let labels = self.clusterer.cluster(&points, self.eps, self.min_samples)?;

        let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut noise = Vec::new();
        for (i, label) in labels.iter().enumerate() {
            match label {
                ClusterLabel::Cluster(id) => clusters.entry(*id).or_default().push(i),
                ClusterLabel::Noise => noise.push(vec![i]),
            }
        }

        debug!(
            "Density grouping ({}): {} words -> {} clusters, {} noise",
            self.clusterer.name(),
            words.len(),
            clusters.len(),
            noise.len()
        );

        let groups = clusters.into_values().chain(noise).collect();
        Ok(lines_from_groups(words, groups))
    }

    fn strategy(&self) -> GroupingStrategy {
        GroupingStrategy::Density
    }
}
