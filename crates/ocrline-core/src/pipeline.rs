//! Page pipeline: normalize, group, select, serialize.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{GeometryError, OcrlineError};
use crate::geometry::{normalize_word, LineStats, WordBox};
use crate::grouping::{GroupingStrategy, Selection, StrategySelector};
use crate::models::analyze::RawPage;
use crate::models::config::{OcrlineConfig, PipelineConfig};
use crate::serialize::LineSerializer;
use crate::Result;

/// A word skipped because its polygon was malformed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("page {page_index}, word {word_index}: {error}")]
pub struct WordIssue {
    pub page_index: usize,
    pub word_index: usize,
    pub error: GeometryError,
}

/// A page that could not be processed.
#[derive(Debug, Error)]
#[error("page {page_index}: {error}")]
pub struct PageError {
    /// 0-based position in the document.
    pub page_index: usize,
    /// Page number reported by the input, if any.
    pub page_number: Option<u32>,
    pub error: OcrlineError,
}

/// Reconstructed lines for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub page_index: usize,
    pub page_number: Option<u32>,
    pub word_count: usize,
    pub lines: Vec<String>,
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<LineStats>>,
    #[serde(skip)]
    pub word_issues: Vec<WordIssue>,
}

/// Reconstructed lines for a whole document.
#[derive(Debug, Default)]
pub struct DocumentResult {
    /// All lines, page after page.
    pub lines: Vec<String>,
    /// Successfully processed pages, in document order.
    pub pages: Vec<PageResult>,
    /// Skipped pages, in document order.
    pub errors: Vec<PageError>,
}

impl DocumentResult {
    /// Word-level issues across all pages.
    pub fn word_issues(&self) -> impl Iterator<Item = &WordIssue> {
        self.pages.iter().flat_map(|p| p.word_issues.iter())
    }

    /// Check if every page was processed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Drives line reconstruction over the pages of a document.
pub struct PagePipeline {
    selector: StrategySelector,
    serializer: LineSerializer,
    options: PipelineConfig,
    default_expected: Option<usize>,
    expected_by_page: HashMap<usize, usize>,
}

impl Default for PagePipeline {
    fn default() -> Self {
        Self::new(&OcrlineConfig::default())
    }
}

impl PagePipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &OcrlineConfig) -> Self {
        Self {
            selector: StrategySelector::from_config(config),
            serializer: LineSerializer::from_config(&config.serializer),
            options: config.pipeline.clone(),
            default_expected: config.selection.expected_line_count,
            expected_by_page: HashMap::new(),
        }
    }

    /// Expected line counts keyed by 0-based page index.
    pub fn with_expected_lines(mut self, expected: HashMap<usize, usize>) -> Self {
        self.expected_by_page = expected;
        self
    }

    /// Override the grouping strategy.
    pub fn with_strategy(mut self, strategy: GroupingStrategy) -> Self {
        self.selector = self.selector.with_strategy(strategy);
        self
    }

    /// Process pages in parallel or one after another.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.options.parallel = parallel;
        self.selector = self.selector.with_parallel(parallel);
        self
    }

    /// Compute per-line diagnostics.
    pub fn with_line_stats(mut self, enabled: bool) -> Self {
        self.options.line_stats = enabled;
        self
    }

    /// Skip malformed words instead of failing their page.
    pub fn with_skip_malformed_words(mut self, enabled: bool) -> Self {
        self.options.skip_malformed_words = enabled;
        self
    }

    fn expected_for(&self, page_index: usize) -> Option<usize> {
        self.expected_by_page
            .get(&page_index)
            .copied()
            .or(self.default_expected)
    }

    /// Normalize a page's words.
    ///
    /// Returns the boxes plus any words skipped along the way.
    pub fn normalize_page(
        &self,
        page_index: usize,
        page: &RawPage,
    ) -> Result<(Vec<WordBox>, Vec<WordIssue>)> {
        if !(page.width.is_finite() && page.height.is_finite() && page.width > 0.0 && page.height > 0.0) {
            return Err(GeometryError::InvalidPageSize {
                width: page.width,
                height: page.height,
            }
            .into());
        }

        let mut boxes = Vec::with_capacity(page.words.len());
        let mut issues = Vec::new();

        for (word_index, word) in page.words.iter().enumerate() {
            match normalize_word(word, page.width, page.height) {
                Ok(parts) => boxes.extend(parts),
                Err(error) if self.options.skip_malformed_words => {
                    warn!("Skipping word {} on page {}: {}", word_index, page_index, error);
                    issues.push(WordIssue {
                        page_index,
                        word_index,
                        error,
                    });
                }
                Err(error) => return Err(error.into()),
            }
        }

        Ok((boxes, issues))
    }

    /// Reconstruct the lines of one page.
    pub fn process_page(&self, page_index: usize, page: &RawPage) -> std::result::Result<PageResult, PageError> {
        let to_page_error = |error: OcrlineError| PageError {
            page_index,
            page_number: page.page_number,
            error,
        };

        let (words, word_issues) = self.normalize_page(page_index, page).map_err(to_page_error)?;
        if words.is_empty() {
            debug!("Page {} has no words", page_index);
        }

        let selection = self
            .selector
            .select(&words, self.expected_for(page_index))
            .map_err(to_page_error)?;

        let lines = self.serializer.serialize_all(&selection.lines);
        let stats = self
            .options
            .line_stats
            .then(|| LineStats::for_lines(&selection.lines));

        debug!(
            "Page {}: {} words -> {} lines via {}",
            page_index,
            words.len(),
            lines.len(),
            selection.strategy
        );

        Ok(PageResult {
            page_index,
            page_number: page.page_number,
            word_count: words.len(),
            lines,
            selection,
            stats,
            word_issues,
        })
    }

    /// Reconstruct every page, keeping document order.
    ///
    /// Failed pages are recorded and skipped; they never stop later pages.
    pub fn process_document(&self, pages: &[RawPage]) -> DocumentResult {
        let outcomes: Vec<std::result::Result<PageResult, PageError>> = if self.options.parallel {
            self.run_parallel(pages)
        } else {
            pages
                .iter()
                .enumerate()
                .map(|(i, page)| self.process_page(i, page))
                .collect()
        };

        let mut result = DocumentResult::default();
        for outcome in outcomes {
            match outcome {
                Ok(page) => {
                    result.lines.extend(page.lines.iter().cloned());
                    result.pages.push(page);
                }
                Err(error) => {
                    warn!("Skipping {}", error);
                    result.errors.push(error);
                }
            }
        }

        info!(
            "Processed {} pages: {} lines, {} pages skipped",
            pages.len(),
            result.lines.len(),
            result.errors.len()
        );

        result
    }

    fn run_parallel(&self, pages: &[RawPage]) -> Vec<std::result::Result<PageResult, PageError>> {
        let run = || {
            pages
                .par_iter()
                .enumerate()
                .map(|(i, page)| self.process_page(i, page))
                .collect()
        };

        if self.options.num_threads == 0 {
            return run();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.num_threads)
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!("Failed to build thread pool, using global pool: {}", e);
                run()
            }
        }
    }
}
