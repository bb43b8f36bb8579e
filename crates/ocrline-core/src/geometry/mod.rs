//! Normalized word geometry and lines.

mod line;
mod word;

pub use line::{Line, LineStats};
pub use word::{normalize_word, WordBox};

/// Vertical overlap of two `[min, max]` extents divided by the smaller extent.
///
/// Returns 0 when either extent is degenerate, so callers never divide by zero.
pub fn overlap_ratio(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    let overlap = (a_max.min(b_max) - a_min.max(b_min)).max(0.0);
    let denominator = (a_max - a_min).min(b_max - b_min);
    if denominator > 0.0 {
        overlap / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_ratio_partial() {
        // 0.02-high boxes offset by 0.01 overlap by half
        let ratio = overlap_ratio(0.29, 0.31, 0.30, 0.32);
        assert!((ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_ratio_disjoint() {
        assert_eq!(overlap_ratio(0.0, 0.1, 0.2, 0.3), 0.0);
    }

    #[test]
    fn test_overlap_ratio_contained() {
        // Smaller box fully inside larger one
        assert!((overlap_ratio(0.0, 1.0, 0.4, 0.5) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_ratio_degenerate() {
        assert_eq!(overlap_ratio(0.1, 0.1, 0.0, 0.2), 0.0);
    }
}
