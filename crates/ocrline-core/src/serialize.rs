//! Line to text serialization.

use crate::geometry::Line;
use crate::models::config::SerializerConfig;

/// Joins a line's words, marking wide horizontal gaps.
///
/// Words whose centers are at most `gap_threshold` apart are concatenated
/// directly (scripts without inter-word spaces rely on this); wider gaps get
/// one spacing marker.
#[derive(Debug, Clone)]
pub struct LineSerializer {
    gap_threshold: f64,
    marker: char,
}

impl Default for LineSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSerializer {
    /// Create a serializer with a 0.06 gap threshold and `_` as the marker.
    pub fn new() -> Self {
        Self {
            gap_threshold: 0.06,
            marker: '_',
        }
    }

    /// Create a serializer from configuration.
    pub fn from_config(config: &SerializerConfig) -> Self {
        Self::new()
            .with_gap_threshold(config.gap_threshold)
            .with_marker(config.spacing_marker)
    }

    /// Set the gap threshold in normalized page-width units.
    pub fn with_gap_threshold(mut self, threshold: f64) -> Self {
        self.gap_threshold = threshold;
        self
    }

    /// Set the spacing marker.
    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Serialize one line.
    pub fn serialize(&self, line: &Line) -> String {
        let words = line.words();
        let mut text = String::new();

        for (i, word) in words.iter().enumerate() {
            text.push_str(word.content());
            if let Some(next) = words.get(i + 1) {
                if next.center_x() - word.center_x() > self.gap_threshold {
                    text.push(self.marker);
                }
            }
        }

        text
    }

    /// Serialize lines in order.
    pub fn serialize_all(&self, lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| self.serialize(line)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WordBox;
    use pretty_assertions::assert_eq;

    fn at(content: &str, center_x: f64) -> WordBox {
        WordBox::from_extents(content, center_x - 0.005, center_x + 0.005, 0.1, 0.12).unwrap()
    }

    #[test]
    fn test_wide_gap_gets_marker() {
        let line = Line::new(vec![at("ประชุม", 0.10), at("ครั้งที่", 0.20)]).unwrap();
        assert_eq!(LineSerializer::new().serialize(&line), "ประชุม_ครั้งที่");
    }

    #[test]
    fn test_narrow_gap_concatenates() {
        let line = Line::new(vec![at("กรรม", 0.10), at("การ", 0.15)]).unwrap();
        assert_eq!(LineSerializer::new().serialize(&line), "กรรมการ");
    }

    #[test]
    fn test_no_trailing_marker() {
        let line = Line::new(vec![at("a", 0.1), at("b", 0.5), at("c", 0.9)]).unwrap();
        assert_eq!(LineSerializer::new().serialize(&line), "a_b_c");
    }

    #[test]
    fn test_custom_marker_and_threshold() {
        let line = Line::new(vec![at("a", 0.1), at("b", 0.15), at("c", 0.5)]).unwrap();
        let serializer = LineSerializer::from_config(&SerializerConfig {
            gap_threshold: 0.01,
            spacing_marker: ' ',
        });
        assert_eq!(serializer.serialize(&line), "a b c");
    }

    #[test]
    fn test_serialize_all_keeps_order() {
        let lines = vec![
            Line::new(vec![at("one", 0.1)]).unwrap(),
            Line::new(vec![at("two", 0.1)]).unwrap(),
        ];
        assert_eq!(LineSerializer::new().serialize_all(&lines), vec!["one", "two"]);
    }
}
