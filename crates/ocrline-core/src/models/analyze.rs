//! Decoded document-analysis output.
//!
//! Field names follow the camelCase JSON produced by the layout service.

use serde::{Deserialize, Serialize};

/// Top-level wrapper: `{ "analyzeResult": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeDocument {
    pub analyze_result: AnalyzeResult,
}

/// Pages and tables of one analyzed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub pages: Vec<RawPage>,

    #[serde(default)]
    pub tables: Vec<RawTable>,
}

/// One page as delivered by the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPage {
    /// 1-based page number, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    /// Page width in polygon units.
    pub width: f64,

    /// Page height in polygon units.
    pub height: f64,

    #[serde(default)]
    pub words: Vec<RawWord>,
}

/// One recognized word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWord {
    pub content: String,

    /// Flat `[x0, y0, x1, y1, ...]` outline.
    pub polygon: Vec<f64>,
}

/// A table recognized by the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    #[serde(default)]
    pub row_count: usize,

    #[serde(default)]
    pub column_count: usize,

    #[serde(default)]
    pub cells: Vec<RawCell>,
}

/// A single table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCell {
    #[serde(default)]
    pub row_index: usize,

    #[serde(default)]
    pub column_index: usize,

    #[serde(default)]
    pub content: String,
}

impl RawPage {
    /// Create a page from its dimensions and words.
    pub fn new(width: f64, height: f64, words: Vec<RawWord>) -> Self {
        Self {
            page_number: None,
            width,
            height,
            words,
        }
    }

    /// Set the page number.
    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }
}

impl RawWord {
    /// Create a word from its content and polygon.
    pub fn new(content: impl Into<String>, polygon: Vec<f64>) -> Self {
        Self {
            content: content.into(),
            polygon,
        }
    }
}

impl AnalyzeResult {
    /// Decode either the wrapped `{ "analyzeResult": ... }` form or a bare result.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("analyzeResult").is_some() {
            let document: AnalyzeDocument = serde_json::from_value(value)?;
            Ok(document.analyze_result)
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }
}
