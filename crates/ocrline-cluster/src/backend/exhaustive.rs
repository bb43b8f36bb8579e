//! Exhaustive DBSCAN.

use tracing::debug;

use super::{expand_clusters, validate_params};
use crate::{ClusterLabel, DensityClusterer, Points, Result};

/// DBSCAN that compares every pair of points.
///
/// Quadratic in the number of points, which is cheap at page scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dbscan;

impl Dbscan {
    /// Create a new exhaustive engine.
    pub fn new() -> Self {
        Self
    }
}

impl DensityClusterer for Dbscan {
    fn cluster(&self, points: &Points, eps: f64, min_samples: usize) -> Result<Vec<ClusterLabel>> {
        validate_params(eps, min_samples)?;

        let n = points.len();
        let neighborhoods: Vec<Vec<usize>> = (0..n)
            .map(|i| (0..n).filter(|&j| points.distance(i, j) <= eps).collect())
            .collect();

        let labels = expand_clusters(&neighborhoods, min_samples);
        debug!(
            "{} clustered {} points into {} clusters",
            self.name(),
            n,
            labels.iter().filter_map(|l| l.id()).max().map_or(0, |m| m + 1)
        );
        Ok(labels)
    }

    fn name(&self) -> &'static str {
        "dbscan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_lines() {
        // (center_y, height) for two text rows
        let points = Points::from_pairs([
            (0.100, 0.02),
            (0.500, 0.02),
            (0.101, 0.02),
            (0.502, 0.021),
        ])
        .unwrap();

        let labels = Dbscan::new().cluster(&points, 0.02, 1).unwrap();
        assert_eq!(
            labels,
            vec![
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(1),
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(1),
            ]
        );
    }

    #[test]
    fn test_singletons_with_min_samples_one() {
        let points = Points::from_pairs([(0.1, 0.02), (0.3, 0.02), (0.6, 0.02)]).unwrap();
        let labels = Dbscan::new().cluster(&points, 0.02, 1).unwrap();
        assert!(labels.iter().all(|l| !l.is_noise()));
        assert_eq!(labels[2], ClusterLabel::Cluster(2));
    }

    #[test]
    fn test_eps_is_inclusive() {
        let points = Points::from_pairs([(0.0, 0.0), (0.5, 0.0)]).unwrap();
        let labels = Dbscan::new().cluster(&points, 0.5, 1).unwrap();
        assert_eq!(labels[0], labels[1]);
    }

    #[test]
    fn test_empty_input() {
        let points = Points::from_pairs(Vec::new()).unwrap();
        assert!(Dbscan::new().cluster(&points, 0.02, 1).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_eps() {
        let points = Points::from_pairs([(0.0, 0.0)]).unwrap();
        assert!(Dbscan::new().cluster(&points, -1.0, 1).is_err());
    }
}
