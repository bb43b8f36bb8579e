//! Word error rate between reconstructed and reference transcripts.

use serde::Serialize;

use crate::error::EvalError;

/// Edit counts behind a word error rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WerReport {
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    /// Words in the references.
    pub reference_words: usize,
}

impl WerReport {
    /// `(S + D + I) / N`, or 0 when there are no reference words.
    pub fn wer(&self) -> f64 {
        if self.reference_words == 0 {
            return 0.0;
        }
        (self.substitutions + self.deletions + self.insertions) as f64 / self.reference_words as f64
    }

    fn add(&mut self, other: WerReport) {
        self.substitutions += other.substitutions;
        self.deletions += other.deletions;
        self.insertions += other.insertions;
        self.reference_words += other.reference_words;
    }
}

/// Corpus-level word error rate; predictions and references pair by index.
pub fn word_error_rate<P, R>(predictions: &[P], references: &[R]) -> Result<WerReport, EvalError>
where
    P: AsRef<str>,
    R: AsRef<str>,
{
    if predictions.len() != references.len() {
        return Err(EvalError::LengthMismatch {
            predictions: predictions.len(),
            references: references.len(),
        });
    }

    let mut report = WerReport::default();
    for (prediction, reference) in predictions.iter().zip(references) {
        report.add(align(prediction.as_ref(), reference.as_ref()));
    }

    if report.reference_words == 0 && report.insertions > 0 {
        return Err(EvalError::EmptyReference);
    }

    Ok(report)
}

#[derive(Clone, Copy)]
struct Cell {
    cost: usize,
    substitutions: usize,
    deletions: usize,
    insertions: usize,
}

/// Word-level Levenshtein alignment of one prediction against one reference.
fn align(prediction: &str, reference: &str) -> WerReport {
    let hyp: Vec<&str> = prediction.split_whitespace().collect();
    let refs: Vec<&str> = reference.split_whitespace().collect();

    // prev[j]: best alignment of refs[..i] against hyp[..j]
    let mut prev: Vec<Cell> = (0..=hyp.len())
        .map(|j| Cell {
            cost: j,
            substitutions: 0,
            deletions: 0,
            insertions: j,
        })
        .collect();

    for i in 1..=refs.len() {
        let mut row = Vec::with_capacity(hyp.len() + 1);
        row.push(Cell {
            cost: i,
            substitutions: 0,
            deletions: i,
            insertions: 0,
        });

        for j in 1..=hyp.len() {
            let diag = prev[j - 1];
            let matched = if refs[i - 1] == hyp[j - 1] {
                diag
            } else {
                Cell {
                    cost: diag.cost + 1,
                    substitutions: diag.substitutions + 1,
                    ..diag
                }
            };
            let deleted = Cell {
                cost: prev[j].cost + 1,
                deletions: prev[j].deletions + 1,
                ..prev[j]
            };
            let inserted = Cell {
                cost: row[j - 1].cost + 1,
                insertions: row[j - 1].insertions + 1,
                ..row[j - 1]
            };

            let best = [matched, deleted, inserted]
                .into_iter()
                .min_by_key(|c| c.cost)
                .unwrap_or(matched);
            row.push(best);
        }

        prev = row;
    }

    let last = prev[hyp.len()];
    WerReport {
        substitutions: last.substitutions,
        deletions: last.deletions,
        insertions: last.insertions,
        reference_words: refs.len(),
    }
}
