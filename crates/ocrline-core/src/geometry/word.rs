//! Word box normalization.

use serde::Serialize;

use crate::error::GeometryError;
use crate::models::analyze::RawWord;

/// One word's geometry on a page, normalized to the unit square.
///
/// Immutable once built; derived values (centers, height) are computed at
/// construction so every consumer sees the same numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordBox {
    content: String,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    center_x: f64,
    center_y: f64,
    height: f64,
}

impl WordBox {
    /// Build a box from a flat polygon in page units.
    pub fn from_polygon(
        content: impl Into<String>,
        polygon: &[f64],
        page_width: f64,
        page_height: f64,
    ) -> Result<Self, GeometryError> {
        check_page_size(page_width, page_height)?;
        let (min_x, max_x, min_y, max_y) = polygon_extents(polygon)?;

        Self::from_extents(
            content,
            min_x / page_width,
            max_x / page_width,
            min_y / page_height,
            max_y / page_height,
        )
    }

    /// Build a box from already normalized extents.
    ///
    /// Swapped bounds are reordered and every bound is clamped to `[0, 1]`,
    /// so a polygon running off the page keeps only its on-page part.
    pub fn from_extents(
        content: impl Into<String>,
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    ) -> Result<Self, GeometryError> {
        for (index, value) in [min_x, max_x, min_y, max_y].into_iter().enumerate() {
            if !value.is_finite() {
                return Err(GeometryError::NonFiniteCoordinate { index });
            }
        }

        let clamp = |v: f64| v.clamp(0.0, 1.0);
        let (min_x, max_x) = (clamp(min_x.min(max_x)), clamp(min_x.max(max_x)));
        let (min_y, max_y) = (clamp(min_y.min(max_y)), clamp(min_y.max(max_y)));

        Ok(Self {
            content: content.into(),
            min_x,
            max_x,
            min_y,
            max_y,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            height: max_y - min_y,
        })
    }

    /// Same geometry, different text.
    fn with_content(&self, content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..self.clone()
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    pub fn center_y(&self) -> f64 {
        self.center_y
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Vertical overlap with another box, relative to the shorter of the two.
    pub fn vertical_overlap_ratio(&self, other: &WordBox) -> f64 {
        super::overlap_ratio(self.min_y, self.max_y, other.min_y, other.max_y)
    }
}

fn check_page_size(width: f64, height: f64) -> Result<(), GeometryError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidPageSize { width, height })
    }
}

fn polygon_extents(polygon: &[f64]) -> Result<(f64, f64, f64, f64), GeometryError> {
    if polygon.len() % 2 != 0 {
        return Err(GeometryError::OddCoordinateCount(polygon.len()));
    }
    if polygon.len() < 6 {
        return Err(GeometryError::TooFewPoints(polygon.len()));
    }
    if let Some(index) = polygon.iter().position(|v| !v.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate { index });
    }

    let xs = polygon.iter().step_by(2);
    let ys = polygon.iter().skip(1).step_by(2);

    let min_x = xs.clone().cloned().fold(f64::INFINITY, f64::min);
    let max_x = xs.cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_y = ys.clone().cloned().fold(f64::INFINITY, f64::min);
    let max_y = ys.cloned().fold(f64::NEG_INFINITY, f64::max);

    Ok((min_x, max_x, min_y, max_y))
}

/// Normalize one decoded word into zero or more boxes.
///
/// Content containing line breaks is split; every non-empty trimmed fragment
/// becomes its own box with the parent's geometry. Whitespace-only content
/// yields no boxes.
pub fn normalize_word(
    word: &RawWord,
    page_width: f64,
    page_height: f64,
) -> Result<Vec<WordBox>, GeometryError> {
    let geometry = WordBox::from_polygon(String::new(), &word.polygon, page_width, page_height)?;

    Ok(word
        .content
        .split('\n')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| geometry.with_content(part))
        .collect())
}
