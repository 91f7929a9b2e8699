use crate::geometry::overlap_ratio;
use crate::types::{Rect, RedactionBox};

/// Minimum fraction of a token's area a box must cover.
pub const OVERLAP_THRESHOLD: f64 = 0.5;

/// Returns `true` when any box covers at least `threshold` of `word`.
pub fn is_covered(word: &Rect, boxes: &[RedactionBox], threshold: f64) -> bool {
    boxes
        .iter()
        .any(|bx| overlap_ratio(word, &bx.rect()) >= threshold)
}
