//! Lines of word boxes.

use serde::Serialize;
use tracing::debug;

use super::WordBox;

/// A non-empty group of words judged to share a text row.
///
/// Words are kept sorted left to right by `center_x`; the sort is stable,
/// so words with equal centers keep their grouping order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    words: Vec<WordBox>,
}

impl Line {
    /// Create a line, sorting the words by horizontal center.
    ///
    /// Returns `None` for an empty word list.
    pub fn new(mut words: Vec<WordBox>) -> Option<Self> {
        if words.is_empty() {
            return None;
        }
        words.sort_by(|a, b| a.center_x().total_cmp(&b.center_x()));
        Some(Self { words })
    }

    /// Words in reading order.
    pub fn words(&self) -> &[WordBox] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Mean vertical center of the words.
    pub fn mean_center_y(&self) -> f64 {
        mean(self.words.iter().map(WordBox::center_y))
    }

    /// Mean word height.
    pub fn mean_height(&self) -> f64 {
        mean(self.words.iter().map(WordBox::height))
    }

    /// The line's vertical band: mean top to mean bottom.
    pub fn band(&self) -> (f64, f64) {
        (
            mean(self.words.iter().map(WordBox::min_y)),
            mean(self.words.iter().map(WordBox::max_y)),
        )
    }

    /// Topmost edge of any word.
    pub fn top(&self) -> f64 {
        self.words.iter().map(WordBox::min_y).fold(f64::INFINITY, f64::min)
    }

    /// Bottommost edge of any word.
    pub fn bottom(&self) -> f64 {
        self.words.iter().map(WordBox::max_y).fold(f64::NEG_INFINITY, f64::max)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Diagnostics for one reconstructed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStats {
    pub word_count: usize,
    pub min_center_y: f64,
    pub max_center_y: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// The previous line's bottom edge lies below this line's top edge.
    pub overlaps_previous: bool,
}

impl LineStats {
    /// Compute diagnostics for a sequence of lines in output order.
    pub fn for_lines(lines: &[Line]) -> Vec<LineStats> {
        let mut stats = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            let centers = line.words().iter().map(WordBox::center_y);
            let heights = line.words().iter().map(WordBox::height);

            let overlaps_previous = match i.checked_sub(1).map(|p| &lines[p]) {
                Some(previous) if previous.bottom() > line.top() => {
                    debug!(
                        "Line {} overlaps previous line: {:.4} > {:.4}",
                        i + 1,
                        previous.bottom(),
                        line.top()
                    );
                    true
                }
                _ => false,
            };

            stats.push(LineStats {
                word_count: line.len(),
                min_center_y: centers.clone().fold(f64::INFINITY, f64::min),
                max_center_y: centers.fold(f64::NEG_INFINITY, f64::max),
                min_height: heights.clone().fold(f64::INFINITY, f64::min),
                max_height: heights.fold(f64::NEG_INFINITY, f64::max),
                overlaps_previous,
            });
        }

        stats
    }
}
