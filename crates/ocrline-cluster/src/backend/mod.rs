//! Clustering engine implementations.

pub mod exhaustive;
pub mod grid;

use crate::error::ClusterError;
use crate::{Points, Result};

/// Cluster assignment for a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    /// Member of the cluster with this id.
    Cluster(usize),
    /// Not density-reachable from any core point.
    Noise,
}

impl ClusterLabel {
    /// Get the cluster id, if any.
    pub fn id(&self) -> Option<usize> {
        match self {
            ClusterLabel::Cluster(id) => Some(*id),
            ClusterLabel::Noise => None,
        }
    }

    /// Check if this point is noise.
    pub fn is_noise(&self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }
}

/// Trait for density-based clustering engines.
///
/// This trait abstracts over different neighbourhood search strategies,
/// allowing the line grouper to swap engines without touching the rest of
/// the pipeline.
pub trait DensityClusterer: Send + Sync {
    /// Cluster the given points.
    ///
    /// # Arguments
    /// * `points` - Feature matrix, one row per point
    /// * `eps` - Neighbourhood radius (inclusive)
    /// * `min_samples` - Minimum neighbourhood size, the point itself included,
    ///   for a point to be a core point
    ///
    /// # Returns
    /// One label per input row, in input order
    fn cluster(&self, points: &Points, eps: f64, min_samples: usize) -> Result<Vec<ClusterLabel>>;

    /// Short engine name used in logs.
    fn name(&self) -> &'static str;
}

impl<T: DensityClusterer + ?Sized> DensityClusterer for Box<T> {
    fn cluster(&self, points: &Points, eps: f64, min_samples: usize) -> Result<Vec<ClusterLabel>> {
        (**self).cluster(points, eps, min_samples)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

pub(crate) fn validate_params(eps: f64, min_samples: usize) -> Result<()> {
    if !eps.is_finite() || eps <= 0.0 {
        return Err(ClusterError::InvalidParameter(format!(
            "eps must be positive and finite, got {}",
            eps
        )));
    }
    if min_samples == 0 {
        return Err(ClusterError::InvalidParameter(
            "min_samples must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Label points from precomputed neighbourhoods.
///
/// Each neighbourhood must list indices in ascending order and include the
/// point itself. Cluster ids follow the input order of the first core point
/// that seeds each cluster; a border point goes to the first cluster that
/// reaches it.
pub(crate) fn expand_clusters(neighborhoods: &[Vec<usize>], min_samples: usize) -> Vec<ClusterLabel> {
    let n = neighborhoods.len();
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|neighbors| neighbors.len() >= min_samples)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut stack = Vec::new();
    let mut next_id = 0;

    for seed in 0..n {
        if labels[seed].is_some() || !is_core[seed] {
            continue;
        }

        stack.push(seed);
        while let Some(i) = stack.pop() {
            if labels[i].is_some() {
                continue;
            }
            labels[i] = Some(next_id);
            if is_core[i] {
                stack.extend(neighborhoods[i].iter().copied().filter(|&j| labels[j].is_none()));
            }
        }

        next_id += 1;
    }

    labels
        .into_iter()
        .map(|label| label.map_or(ClusterLabel::Noise, ClusterLabel::Cluster))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_chain() {
        // 0-1-2 chained, 3 isolated
        let neighborhoods = vec![vec![0, 1], vec![0, 1, 2], vec![1, 2], vec![3]];
        let labels = expand_clusters(&neighborhoods, 1);
        assert_eq!(
            labels,
            vec![
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(0),
                ClusterLabel::Cluster(1),
            ]
        );
    }

    #[test]
    fn test_expand_noise() {
        // With min_samples 3 only point 1 is core; 3 is noise
        let neighborhoods = vec![vec![0, 1], vec![0, 1, 2], vec![1, 2], vec![3]];
        let labels = expand_clusters(&neighborhoods, 3);
        assert_eq!(labels[0], ClusterLabel::Cluster(0));
        assert_eq!(labels[2], ClusterLabel::Cluster(0));
        assert!(labels[3].is_noise());
        assert_eq!(labels[3].id(), None);
    }

    #[test]
    fn test_validate_params() {
        assert!(validate_params(0.02, 1).is_ok());
        assert!(validate_params(0.0, 1).is_err());
        assert!(validate_params(f64::NAN, 1).is_err());
        assert!(validate_params(0.02, 0).is_err());
    }
}
