//! Line grouping strategies.
//!
//! Every grouper partitions a page's words into lines: each word lands in
//! exactly one line, words inside a line run left to right, and lines run
//! top to bottom.

mod centroid;
mod density;
mod overlap;
mod selector;

pub use centroid::CentroidGrouper;
pub use density::DensityGrouper;
pub use overlap::OverlapGrouper;
pub use selector::{confidence_score, Selection, StrategySelector};

use serde::{Deserialize, Serialize};

use crate::geometry::{Line, WordBox};
use crate::Result;

/// Which grouping strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Run overlap and density, keep the better result.
    #[default]
    Auto,
    /// Greedy seed-and-accrete on vertical overlap.
    Overlap,
    /// DBSCAN over (center_y, height).
    Density,
    /// Sweep with a running centroid.
    Centroid,
}

impl GroupingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingStrategy::Auto => "auto",
            GroupingStrategy::Overlap => "overlap",
            GroupingStrategy::Density => "density",
            GroupingStrategy::Centroid => "centroid",
        }
    }
}

impl std::fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for line grouping strategies.
pub trait LineGrouper: Send + Sync {
    /// Partition words into ordered lines.
    fn group(&self, words: &[WordBox]) -> Result<Vec<Line>>;

    /// The strategy this grouper implements.
    fn strategy(&self) -> GroupingStrategy;
}

/// Indices of `words` sorted by `center_y`, ties kept in input order.
pub(crate) fn indices_by_center_y(words: &[WordBox]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..words.len()).collect();
    order.sort_by(|&a, &b| words[a].center_y().total_cmp(&words[b].center_y()));
    order
}

/// Build lines from index groups and order them by mean `center_y`.
pub(crate) fn lines_from_groups(words: &[WordBox], groups: Vec<Vec<usize>>) -> Vec<Line> {
    let mut lines: Vec<Line> = groups
        .into_iter()
        .filter_map(|group| Line::new(group.into_iter().map(|i| words[i].clone()).collect()))
        .collect();
    lines.sort_by(|a, b| a.mean_center_y().total_cmp(&b.mean_center_y()));
    lines
}
