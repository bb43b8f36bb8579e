//! Strategy selection between line groupers.

use serde::Serialize;
use tracing::debug;

use ocrline_cluster::{Dbscan, DensityClusterer, GridDbscan};

use super::{CentroidGrouper, DensityGrouper, GroupingStrategy, LineGrouper, OverlapGrouper};
use crate::geometry::{overlap_ratio, Line, WordBox};
use crate::models::config::OcrlineConfig;
use crate::Result;

/// The lines chosen for a page and how they were chosen.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    /// Strategy whose lines were kept.
    pub strategy: GroupingStrategy,

    /// The chosen lines.
    #[serde(skip)]
    pub lines: Vec<Line>,

    /// Expected line count used for the decision, if any.
    pub expected: Option<usize>,

    /// Line count of each candidate, in evaluation order.
    pub candidates: Vec<CandidateSummary>,
}

/// How one candidate strategy scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub strategy: GroupingStrategy,
    pub line_count: usize,
    pub confidence: f64,
}

/// Geometry-only confidence for a set of lines.
///
/// The share of words whose vertical extent overlaps their line's band by
/// more than `threshold`, minus the share of consecutive line pairs whose
/// bands overlap by more than `threshold`. Empty input scores 0.
pub fn confidence_score(lines: &[Line], threshold: f64) -> f64 {
    let total_words: usize = lines.iter().map(Line::len).sum();
    if total_words == 0 {
        return 0.0;
    }

    let bands: Vec<(f64, f64)> = lines.iter().map(Line::band).collect();

    let consistent = lines
        .iter()
        .zip(&bands)
        .flat_map(|(line, &(top, bottom))| {
            line.words()
                .iter()
                .filter(move |w| overlap_ratio(w.min_y(), w.max_y(), top, bottom) > threshold)
        })
        .count();

    let crowded = bands
        .windows(2)
        .filter(|pair| overlap_ratio(pair[0].0, pair[0].1, pair[1].0, pair[1].1) > threshold)
        .count();

    consistent as f64 / total_words as f64 - crowded as f64 / lines.len() as f64
}

/// Runs the configured grouper, or overlap and density side by side in
/// `auto` mode, and keeps one result.
///
/// In `auto` mode with an expected line count, the candidate whose count is
/// closer wins. Without one, the higher [`confidence_score`] wins. Ties go
/// to the overlap strategy.
pub struct StrategySelector {
    strategy: GroupingStrategy,
    overlap: OverlapGrouper,
    density: DensityGrouper<Box<dyn DensityClusterer>>,
    centroid: CentroidGrouper,
    score_threshold: f64,
    parallel: bool,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::from_config(&OcrlineConfig::default())
    }
}

impl StrategySelector {
    /// Build a selector and its groupers from configuration.
    pub fn from_config(config: &OcrlineConfig) -> Self {
        let g = &config.grouping;
        let engine: Box<dyn DensityClusterer> = if g.grid_index {
            Box::new(GridDbscan::new())
        } else {
            Box::new(Dbscan::new())
        };

        Self {
            strategy: config.selection.strategy,
            overlap: OverlapGrouper::new()
                .with_overlap_threshold(g.overlap_threshold)
                .with_distance_factor(g.distance_factor),
            density: DensityGrouper::new(engine)
                .with_eps(g.density_eps)
                .with_min_samples(g.density_min_samples),
            centroid: CentroidGrouper::new().with_threshold(g.centroid_threshold),
            score_threshold: g.overlap_threshold,
            parallel: config.pipeline.parallel,
        }
    }

    /// Force a strategy.
    pub fn with_strategy(mut self, strategy: GroupingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run overlap and density on separate threads in `auto` mode.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Group a page's words and pick the lines to keep.
    pub fn select(&self, words: &[WordBox], expected: Option<usize>) -> Result<Selection> {
        let single = |grouper: &dyn LineGrouper| -> Result<Selection> {
            let lines = grouper.group(words)?;
            Ok(Selection {
                strategy: grouper.strategy(),
                candidates: vec![self.summarize(grouper.strategy(), &lines)],
                lines,
                expected,
            })
        };

        match self.strategy {
            GroupingStrategy::Overlap => single(&self.overlap),
            GroupingStrategy::Density => single(&self.density),
            GroupingStrategy::Centroid => single(&self.centroid),
            GroupingStrategy::Auto => self.select_auto(words, expected),
        }
    }

    fn summarize(&self, strategy: GroupingStrategy, lines: &[Line]) -> CandidateSummary {
        CandidateSummary {
            strategy,
            line_count: lines.len(),
            confidence: confidence_score(lines, self.score_threshold),
        }
    }

    fn select_auto(&self, words: &[WordBox], expected: Option<usize>) -> Result<Selection> {
        let (overlap, density) = if self.parallel {
            rayon::join(|| self.overlap.group(words), || self.density.group(words))
        } else {
            (self.overlap.group(words), self.density.group(words))
        };
        let (overlap, density) = (overlap?, density?);

        let overlap_summary = self.summarize(GroupingStrategy::Overlap, &overlap);
        let density_summary = self.summarize(GroupingStrategy::Density, &density);

        let prefer_density = match expected {
            Some(target) => {
                density.len().abs_diff(target) < overlap.len().abs_diff(target)
            }
            None => density_summary.confidence > overlap_summary.confidence,
        };

        debug!(
            "Selection: overlap {} lines ({:.3}), density {} lines ({:.3}), expected {:?} -> {}",
            overlap_summary.line_count,
            overlap_summary.confidence,
            density_summary.line_count,
            density_summary.confidence,
            expected,
            if prefer_density { "density" } else { "overlap" }
        );

        let (strategy, lines) = if prefer_density {
            (GroupingStrategy::Density, density)
        } else {
            (GroupingStrategy::Overlap, overlap)
        };

        Ok(Selection {
            strategy,
            lines,
            expected,
            candidates: vec![overlap_summary, density_summary],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::test_support::{sample_page, word};
    use pretty_assertions::assert_eq;

    /// Overlap keeps "Big" and "small" together; density splits them.
    fn mixed_size_row() -> Vec<WordBox> {
        vec![
            word("Big", 0.1, 0.20, 0.06),
            word("small", 0.3, 0.20, 0.02),
            word("next", 0.1, 0.40, 0.02),
        ]
    }

    #[test]
    fn test_expected_count_picks_closer() {
        let selector = StrategySelector::default();
        let words = mixed_size_row();

        let selection = selector.select(&words, Some(3)).unwrap();
        assert_eq!(selection.strategy, GroupingStrategy::Density);
        assert_eq!(selection.lines.len(), 3);

        let selection = selector.select(&words, Some(2)).unwrap();
        assert_eq!(selection.strategy, GroupingStrategy::Overlap);
        assert_eq!(selection.lines.len(), 2);
    }

    #[test]
    fn test_tie_favours_overlap() {
        let selection = StrategySelector::default()
            .select(&sample_page(), Some(100))
            .unwrap();
        assert_eq!(selection.strategy, GroupingStrategy::Overlap);
        assert_eq!(selection.candidates[0].line_count, selection.candidates[1].line_count);
    }

    #[test]
    fn test_confidence_prefers_unsplit_row() {
        let selection = StrategySelector::default()
            .select(&mixed_size_row(), None)
            .unwrap();
        assert_eq!(selection.strategy, GroupingStrategy::Overlap);
        let overlap = &selection.candidates[0];
        let density = &selection.candidates[1];
        assert!(overlap.confidence > density.confidence);
    }

    #[test]
    fn test_forced_strategy() {
        let selection = StrategySelector::default()
            .with_strategy(GroupingStrategy::Centroid)
            .select(&sample_page(), None)
            .unwrap();
        assert_eq!(selection.strategy, GroupingStrategy::Centroid);
        assert_eq!(selection.candidates.len(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let words = sample_page();
        let parallel = StrategySelector::default().with_parallel(true).select(&words, None).unwrap();
        let sequential = StrategySelector::default().with_parallel(false).select(&words, None).unwrap();
        assert_eq!(parallel.lines, sequential.lines);
        assert_eq!(parallel.candidates, sequential.candidates);
    }

    #[test]
    fn test_empty_page() {
        let selection = StrategySelector::default().select(&[], None).unwrap();
        assert!(selection.lines.is_empty());
        assert_eq!(selection.strategy, GroupingStrategy::Overlap);
    }

    #[test]
    fn test_confidence_score_bounds() {
        let lines = vec![Line::new(vec![word("a", 0.1, 0.1, 0.02)]).unwrap()];
        assert_eq!(confidence_score(&lines, 0.4), 1.0);
        assert_eq!(confidence_score(&[], 0.4), 0.0);
    }
}
