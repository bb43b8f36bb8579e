//! Running-centroid line grouping.

use tracing::debug;

use super::{indices_by_center_y, lines_from_groups, GroupingStrategy, LineGrouper};
use crate::geometry::{Line, WordBox};
use crate::Result;

/// Sweeps words top to bottom, starting a new line whenever a word's
/// center drifts more than `threshold` from the running line center.
///
/// The running center moves halfway toward each accepted word, so it
/// follows gently sloped lines. Cheapest of the groupers and blind to
/// word height.
#[derive(Debug, Clone)]
pub struct CentroidGrouper {
    threshold: f64,
}

impl Default for CentroidGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl CentroidGrouper {
    /// Create a grouper with the default 0.01 threshold.
    pub fn new() -> Self {
        Self { threshold: 0.01 }
    }

    /// Set the maximum center distance (inclusive).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

impl LineGrouper for CentroidGrouper {
    fn group(&self, words: &[WordBox]) -> Result<Vec<Line>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut running_y: Option<f64> = None;

        for i in indices_by_center_y(words) {
            let y = words[i].center_y();
            match running_y {
                Some(center) if (y - center).abs() <= self.threshold => {
                    current.push(i);
                    running_y = Some((center + y) / 2.0);
                }
                Some(_) => {
                    groups.push(std::mem::take(&mut current));
                    current.push(i);
                    running_y = Some(y);
                }
                None => {
                    current.push(i);
                    running_y = Some(y);
                }
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }

        debug!("Centroid grouping: {} words -> {} lines", words.len(), groups.len());
        Ok(lines_from_groups(words, groups))
    }

    fn strategy(&self) -> GroupingStrategy {
        GroupingStrategy::Centroid
    }
}
