//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod eval;
pub mod process;
pub mod tables;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use ocrline_core::{AnalyzeResult, DocumentResult, GroupingStrategy, OcrlineConfig, PageResult};

/// Output format for reconstructed lines.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line of text per reconstructed line
    Text,
    /// JSON report with per-page selection details
    Json,
    /// CSV with one row per line
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Grouping strategy as accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    /// Run overlap and density, keep the better one
    Auto,
    /// Vertical-overlap grouping
    Overlap,
    /// DBSCAN over center and height
    Density,
    /// Running-centroid sweep
    Centroid,
}

impl From<StrategyArg> for GroupingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => GroupingStrategy::Auto,
            StrategyArg::Overlap => GroupingStrategy::Overlap,
            StrategyArg::Density => GroupingStrategy::Density,
            StrategyArg::Centroid => GroupingStrategy::Centroid,
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocrline")
        .join("config.json")
}

/// Load configuration from an explicit path, the default path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OcrlineConfig> {
    let config = match config_path {
        Some(path) => OcrlineConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config from {}", path.display());
                OcrlineConfig::from_file(&path)?
            } else {
                OcrlineConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Read and decode a layout JSON file.
pub async fn read_document(path: &Path) -> anyhow::Result<AnalyzeResult> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let json = tokio::fs::read_to_string(path).await?;
    let document = AnalyzeResult::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to decode {}: {}", path.display(), e))?;
    debug!(
        "Decoded {} pages and {} tables from {}",
        document.pages.len(),
        document.tables.len(),
        path.display()
    );
    Ok(document)
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    lines: &'a [String],
    pages: &'a [PageResult],
    errors: Vec<ErrorReport>,
    word_issues: Vec<WordIssueReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    page_index: usize,
    page_number: Option<u32>,
    message: String,
}

#[derive(Serialize)]
struct WordIssueReport {
    page_index: usize,
    word_index: usize,
    message: String,
}

/// Render a processed document in the requested format.
pub fn format_document(result: &DocumentResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut output = result.lines.join("\n");
            if !output.is_empty() {
                output.push('\n');
            }
            Ok(output)
        }
        OutputFormat::Json => {
            let report = DocumentReport {
                lines: &result.lines,
                pages: &result.pages,
                errors: result
                    .errors
                    .iter()
                    .map(|e| ErrorReport {
                        page_index: e.page_index,
                        page_number: e.page_number,
                        message: e.error.to_string(),
                    })
                    .collect(),
                word_issues: result
                    .word_issues()
                    .map(|issue| WordIssueReport {
                        page_index: issue.page_index,
                        word_index: issue.word_index,
                        message: issue.error.to_string(),
                    })
                    .collect(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["page_index", "page_number", "line_index", "strategy", "text"])?;

            for page in &result.pages {
                let page_number = page.page_number.map(|n| n.to_string()).unwrap_or_default();
                for (i, line) in page.lines.iter().enumerate() {
                    wtr.write_record([
                        page.page_index.to_string().as_str(),
                        page_number.as_str(),
                        i.to_string().as_str(),
                        page.selection.strategy.as_str(),
                        line.as_str(),
                    ])?;
                }
            }

            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
    }
}
