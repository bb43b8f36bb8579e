//! Greedy vertical-overlap line grouping.

use tracing::{debug, trace};

use super::{indices_by_center_y, lines_from_groups, GroupingStrategy, LineGrouper};
use crate::geometry::{Line, WordBox};
use crate::Result;

/// Seed-and-accrete grouper.
///
/// The topmost unassigned word seeds a line. Every other unassigned word,
/// visited top to bottom, joins when it overlaps the seed vertically by more
/// than `overlap_threshold` of the shorter box and its center lies within
/// `distance_factor` times the line's mean height of the line's mean center.
/// The line mean updates as words join.
#[derive(Debug, Clone)]
pub struct OverlapGrouper {
    overlap_threshold: f64,
    distance_factor: f64,
}

impl Default for OverlapGrouper {
    fn default() -> Self {
        Self::new()
    }
}

/// Running sums for the line under construction.
struct LineAccumulator {
    members: Vec<usize>,
    sum_center_y: f64,
    sum_height: f64,
}

impl LineAccumulator {
    fn new(seed: usize, word: &WordBox) -> Self {
        Self {
            members: vec![seed],
            sum_center_y: word.center_y(),
            sum_height: word.height(),
        }
    }

    fn push(&mut self, index: usize, word: &WordBox) {
        self.members.push(index);
        self.sum_center_y += word.center_y();
        self.sum_height += word.height();
    }

    fn mean_center_y(&self) -> f64 {
        self.sum_center_y / self.members.len() as f64
    }

    fn mean_height(&self) -> f64 {
        self.sum_height / self.members.len() as f64
    }
}

impl OverlapGrouper {
    /// Create a grouper with the default 0.4 / 0.4 thresholds.
    pub fn new() -> Self {
        Self {
            overlap_threshold: 0.4,
            distance_factor: 0.4,
        }
    }

    /// Set the minimum overlap ratio against the seed.
    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    /// Set the allowed center distance as a fraction of mean line height.
    pub fn with_distance_factor(mut self, factor: f64) -> Self {
        self.distance_factor = factor;
        self
    }

    fn joins(&self, seed: &WordBox, candidate: &WordBox, line: &LineAccumulator) -> bool {
        if seed.vertical_overlap_ratio(candidate) <= self.overlap_threshold {
            return false;
        }

        let mean_height = line.mean_height();
        if mean_height <= 0.0 {
            trace!("Degenerate line height, rejecting '{}'", candidate.content());
            return false;
        }

        (candidate.center_y() - line.mean_center_y()).abs() < self.distance_factor * mean_height
    }
}

impl LineGrouper for OverlapGrouper {
    fn group(&self, words: &[WordBox]) -> Result<Vec<Line>> {
        let order = indices_by_center_y(words);
        let mut assigned = vec![false; words.len()];
        let mut groups = Vec::new();

        for &seed in &order {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;

            let seed_word = &words[seed];
            let mut line = LineAccumulator::new(seed, seed_word);

            for &candidate in &order {
                if assigned[candidate] {
                    continue;
                }
                if self.joins(seed_word, &words[candidate], &line) {
                    assigned[candidate] = true;
                    line.push(candidate, &words[candidate]);
                }
            }

            groups.push(line.members);
        }

        debug!("Overlap grouping: {} words -> {} lines", words.len(), groups.len());
        Ok(lines_from_groups(words, groups))
    }

    fn strategy(&self) -> GroupingStrategy {
        GroupingStrategy::Overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::test_support::{assert_well_formed, contents, sample_page, word};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_page() {
        assert!(OverlapGrouper::new().group(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_word() {
        let words = vec![word("only", 0.5, 0.5, 0.02)];
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_eq!(contents(&lines), vec![vec!["only"]]);
    }

    #[test]
    fn test_near_identical_rows_merge() {
        let words = vec![word("b", 0.20, 0.101, 0.02), word("a", 0.10, 0.10, 0.02)];
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_eq!(contents(&lines), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_distant_rows_split() {
        let words = vec![word("low", 0.1, 0.50, 0.02), word("high", 0.1, 0.10, 0.02)];
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_eq!(contents(&lines), vec![vec!["high"], vec!["low"]]);
    }

    #[test]
    fn test_offset_words_join_seed_line() {
        // Adjacent words offset by a quarter height overlap by 75%
        let words = vec![
            word("w1", 0.10, 0.300, 0.02),
            word("w2", 0.12, 0.305, 0.02),
            word("w3", 0.40, 0.300, 0.02),
        ];
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_eq!(contents(&lines), vec![vec!["w1", "w2", "w3"]]);
    }

    #[test]
    fn test_distance_from_mean_rejects() {
        // Overlaps the seed by 55% but sits 0.009 below the mean of a 0.02 line
        let words = vec![word("seed", 0.1, 0.300, 0.02), word("low", 0.3, 0.309, 0.02)];
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_degenerate_heights_never_merge() {
        let words = vec![
            WordBox::from_extents("a", 0.1, 0.2, 0.5, 0.5).unwrap(),
            WordBox::from_extents("b", 0.3, 0.4, 0.5, 0.5).unwrap(),
        ];
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_sample_page() {
        let words = sample_page();
        let lines = OverlapGrouper::new().group(&words).unwrap();
        assert_well_formed(&words, &lines);
        assert_eq!(
            contents(&lines),
            vec![
                vec!["title"],
                vec!["body1a", "body1b"],
                vec!["body2a", "body2b"],
                vec!["note"],
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let words = sample_page();
        let grouper = OverlapGrouper::new();
        assert_eq!(grouper.group(&words).unwrap(), grouper.group(&words).unwrap());
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let words = vec![word("seed", 0.1, 0.300, 0.02), word("low", 0.3, 0.309, 0.02)];
        let lines = OverlapGrouper::new()
            .with_distance_factor(0.6)
            .with_overlap_threshold(0.3)
            .group(&words)
            .unwrap();
        assert_eq!(lines.len(), 1);
    }
}
