//! Configuration structures for the line reconstruction pipeline.

use serde::{Deserialize, Serialize};

use crate::grouping::GroupingStrategy;

/// Main configuration for the ocrline pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrlineConfig {
    /// Line grouping configuration.
    pub grouping: GroupingConfig,

    /// Line serialization configuration.
    pub serializer: SerializerConfig,

    /// Strategy selection configuration.
    pub selection: SelectionConfig,

    /// Page pipeline configuration.
    pub pipeline: PipelineConfig,
}

/// Thresholds shared by the line groupers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Minimum vertical overlap ratio against the seed word (exclusive).
    pub overlap_threshold: f64,

    /// Maximum distance from the line's mean center, as a fraction of mean height (exclusive).
    pub distance_factor: f64,

    /// DBSCAN neighbourhood radius in normalized page units.
    pub density_eps: f64,

    /// DBSCAN minimum neighbourhood size.
    pub density_min_samples: usize,

    /// Use the grid-indexed DBSCAN engine instead of the exhaustive one.
    pub grid_index: bool,

    /// Maximum center distance to the running line centroid (inclusive).
    pub centroid_threshold: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.4,
            distance_factor: 0.4,
            density_eps: 0.02,
            density_min_samples: 1,
            grid_index: false,
            centroid_threshold: 0.01,
        }
    }
}

/// Line serializer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Horizontal center gap above which a spacing marker is inserted.
    pub gap_threshold: f64,

    /// Character inserted between words separated by a wide gap.
    pub spacing_marker: char,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            gap_threshold: 0.06,
            spacing_marker: '_',
        }
    }
}

/// Strategy selection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Grouping strategy; `auto` runs overlap and density and picks one.
    pub strategy: GroupingStrategy,

    /// Expected line count applied to every page unless overridden per page.
    pub expected_line_count: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: GroupingStrategy::Auto,
            expected_line_count: None,
        }
    }
}

/// Page pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Process pages in parallel.
    pub parallel: bool,

    /// Number of worker threads (0 = rayon default).
    pub num_threads: usize,

    /// Skip a word with a malformed polygon instead of the whole page.
    pub skip_malformed_words: bool,

    /// Compute per-line diagnostics.
    pub line_stats: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            num_threads: 0,
            skip_malformed_words: false,
            line_stats: false,
        }
    }
}

impl OcrlineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check that thresholds are usable.
    pub fn validate(&self) -> crate::Result<()> {
        let g = &self.grouping;
        if !(g.density_eps.is_finite() && g.density_eps > 0.0) {
            return Err(crate::OcrlineError::Config(format!(
                "grouping.density_eps must be positive, got {}",
                g.density_eps
            )));
        }
        if g.density_min_samples == 0 {
            return Err(crate::OcrlineError::Config(
                "grouping.density_min_samples must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("grouping.overlap_threshold", g.overlap_threshold),
            ("grouping.distance_factor", g.distance_factor),
            ("grouping.centroid_threshold", g.centroid_threshold),
            ("serializer.gap_threshold", self.serializer.gap_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::OcrlineError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = OcrlineConfig::default();
        assert_eq!(config.grouping.overlap_threshold, 0.4);
        assert_eq!(config.grouping.density_eps, 0.02);
        assert_eq!(config.serializer.spacing_marker, '_');
        assert_eq!(config.selection.strategy, GroupingStrategy::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "serializer": { "spacing_marker": " " }, "selection": { "strategy": "density" } }"#;
        let config: OcrlineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.serializer.spacing_marker, ' ');
        assert_eq!(config.serializer.gap_threshold, 0.06);
        assert_eq!(config.selection.strategy, GroupingStrategy::Density);
        assert_eq!(config.grouping, GroupingConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_eps() {
        let mut config = OcrlineConfig::default();
        config.grouping.density_eps = 0.0;
        assert!(config.validate().is_err());
    }
}
