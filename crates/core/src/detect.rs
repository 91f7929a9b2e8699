//! Redaction rectangle detection.
//!
//! A page can declare a redaction in two ways: through a `/Redact`
//! annotation, or (far more common in leaked documents) by painting a black
//! rectangle over the text. Both end up as [`RedactionBox`]es.

use crate::types::{Annotation, Drawing, FillColor, RedactionBox};

/// Every RGB channel must be strictly below this for a fill to count as dark.
pub const DARK_CHANNEL_MAX: f64 = 0.1;

/// Filled rectangles must be wider than this (points).
pub const MIN_BOX_WIDTH: f64 = 10.0;

/// Filled rectangles must be taller than this (points).
pub const MIN_BOX_HEIGHT: f64 = 5.0;

/// Returns `true` when the fill is black or very dark.
pub fn is_dark_fill(fill: &FillColor) -> bool {
    match *fill {
        FillColor::Rgb(r, g, b) => [r, g, b].iter().all(|c| *c < DARK_CHANNEL_MAX),
        FillColor::Gray(g) => g == 0.0,
    }
}

/// Returns the redaction box for a drawing, if it looks like one.
fn box_from_drawing(drawing: &Drawing) -> Option<RedactionBox> {
    let fill = drawing.fill.as_ref()?;
    if !is_dark_fill(fill) {
        return None;
    }

    // Hairline rules and glyph dots are not plausible redactions.
    let rect = drawing.rect;
    if rect.width() > MIN_BOX_WIDTH && rect.height() > MIN_BOX_HEIGHT {
        Some(RedactionBox::FromFill(rect))
    } else {
        None
    }
}

/// Detect every redaction box on a page.
///
/// Annotation boxes come first, then filled rectangles in drawing order.
/// Overlapping or duplicate boxes are kept as-is.
pub fn detect_redaction_boxes(
    annotations: &[Annotation],
    drawings: &[Drawing],
) -> Vec<RedactionBox> {
    let from_annotations = annotations
        .iter()
        .filter(|a| a.is_redaction())
        .map(|a| RedactionBox::FromAnnotation(a.rect));

    let from_fills = drawings.iter().filter_map(box_from_drawing);

    from_annotations.chain(from_fills).collect()
}
