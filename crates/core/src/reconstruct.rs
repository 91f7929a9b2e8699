//! Rebuilding a line's text from individually positioned tokens.
//!
//! Word tokens carry no spaces between them; the blank room is only implied
//! by their x-coordinates. This module turns that room back into space
//! characters and estimates a single font size and font for the whole line
//! so the text can be redrawn at approximately its original position.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::fonts::StandardFont;
use crate::types::{ReconstructedLine, Token};

/// Declared sizes outside this window are header/watermark artifacts.
pub const DECLARED_SIZE_MIN: f64 = 4.0;
pub const DECLARED_SIZE_MAX: f64 = 72.0;

/// Bounding-box heights are raised to at least this before taking the median.
pub const MIN_BOX_HEIGHT: f64 = 6.0;

/// Heights above this are dropped from the fallback estimate.
pub const MAX_BOX_HEIGHT: f64 = 72.0;

/// Size used when no token offers any usable size information.
pub const FALLBACK_FONT_SIZE: f64 = 10.0;

/// Final clamp applied to every estimate.
///
/// NOTE: this also shrinks genuine in-range sizes such as 18pt headings down
/// to 12pt. Kept for output compatibility; see DESIGN.md.
pub const OUTPUT_SIZE_MIN: f64 = 6.0;
pub const OUTPUT_SIZE_MAX: f64 = 12.0;

/// Smallest space unit ever divided by.
const MIN_SPACE_UNIT: f64 = 0.5;

/// Overlaps shallower than this fraction of a space unit still get a space.
const SHALLOW_OVERLAP_RATIO: f64 = 0.3;

/// Tuning knobs for line reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconstructParams {
    /// Points of horizontal gap per inserted space.
    pub space_unit_pts: f64,
    /// Minimum spaces inserted for any positive gap.
    pub min_spaces: usize,
    /// Estimate a standard font from the tokens' declared font names.
    pub match_font: bool,
}

impl Default for ReconstructParams {
    fn default() -> Self {
        Self {
            space_unit_pts: 3.0,
            min_spaces: 1,
            match_font: false,
        }
    }
}

/// Upper median (`sorted[n / 2]`) of the values, `None` when empty.
fn upper_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(values[values.len() / 2])
}

/// Representative font size for a line.
///
/// Prefers the median declared size within `[4, 72]`; falls back to the
/// median box height; clamps the result into `[6, 12]` either way.
pub fn estimate_font_size(tokens: &[&Token]) -> f64 {
    let declared: Vec<f64> = tokens
        .iter()
        .filter_map(|t| t.font_size)
        .filter(|s| (DECLARED_SIZE_MIN..=DECLARED_SIZE_MAX).contains(s))
        .collect();

    let size = upper_median(declared).unwrap_or_else(|| {
        let heights: Vec<f64> = tokens
            .iter()
            .map(|t| (t.bottom() - t.top()).max(MIN_BOX_HEIGHT))
            .filter(|h| *h <= MAX_BOX_HEIGHT)
            .collect();
        upper_median(heights).unwrap_or(FALLBACK_FONT_SIZE)
    });

    size.clamp(OUTPUT_SIZE_MIN, OUTPUT_SIZE_MAX)
}

/// Most frequent declared font name mapped to a standard font.
///
/// Ties go to the name seen first. Lines without font names get Helvetica.
pub fn estimate_font(tokens: &[&Token]) -> StandardFont {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for name in tokens.iter().filter_map(|t| t.font_name.as_deref()) {
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((name, count));
        }
    }

    best.map(|(name, _)| StandardFont::from_font_name(name))
        .unwrap_or_default()
}

/// Number of spaces to put between two tokens separated by `gap` points.
///
/// `gap` is measured from the running maximum right edge, so it is negative
/// when the next token overlaps what came before.
pub fn spaces_for_gap(gap: f64, params: &ReconstructParams) -> usize {
    if gap > 0.0 {
        let unit = params.space_unit_pts.max(MIN_SPACE_UNIT);
        let n = (gap / unit).round_ties_even().max(0.0) as usize;
        n.max(params.min_spaces)
    } else if gap > -params.space_unit_pts * SHALLOW_OVERLAP_RATIO {
        1
    } else {
        0
    }
}

/// Reassemble one line's tokens into a single string.
///
/// Returns `None` for an empty token list. The caller is expected to drop
/// lines whose text is blank.
pub fn reconstruct_line(tokens: &[&Token], params: &ReconstructParams) -> Option<ReconstructedLine> {
    let mut sorted: Vec<&Token> = tokens.to_vec();
    sorted.sort_by(|a, b| a.x0().partial_cmp(&b.x0()).unwrap_or(Ordering::Equal));

    let (first, rest) = sorted.split_first()?;

    let font_size = estimate_font_size(&sorted);
    let font = if params.match_font {
        estimate_font(&sorted)
    } else {
        StandardFont::default()
    };
    let top = upper_median(sorted.iter().map(|t| t.top()).collect()).unwrap_or(first.top());

    let mut text = first.text.clone();
    let mut right = first.x1();

    for token in rest {
        let gap = token.x0() - right;
        let spaces = spaces_for_gap(gap, params);
        text.extend(std::iter::repeat_n(' ', spaces));
        text.push_str(&token.text);
        right = right.max(token.x1());
    }

    Some(ReconstructedLine {
        text,
        x0: first.x0(),
        x1: right,
        top,
        font_size,
        font,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(text: &str, x0: f64, x1: f64) -> Token {
        Token::new(text, x0, 100.0, x1, 110.0)
    }

    fn rebuild(tokens: &[Token], params: &ReconstructParams) -> ReconstructedLine {
        let refs: Vec<&Token> = tokens.iter().collect();
        reconstruct_line(&refs, params).expect("non-empty line")
    }

    fn gap_text(gap: f64) -> String {
        let tokens = vec![make_token("a", 0.0, 10.0), make_token("b", 10.0 + gap, 20.0 + gap)];
        rebuild(&tokens, &ReconstructParams::default()).text
    }

    // =====================================================================
    // spacing
    // =====================================================================

    #[test]
    fn test_gap_of_three_units_inserts_three_spaces() {
        assert_eq!(gap_text(9.0), "a   b");
    }

    #[test]
    fn test_small_positive_gap_inserts_min_spaces() {
        assert_eq!(gap_text(0.5), "a b");
    }

    #[test]
    fn test_shallow_overlap_inserts_one_space() {
        assert_eq!(gap_text(-0.5), "a b");
    }

    #[test]
    fn test_deep_overlap_concatenates() {
        assert_eq!(gap_text(-2.0), "ab");
    }

    #[test]
    fn test_zero_gap_inserts_one_space() {
        assert_eq!(gap_text(0.0), "a b");
    }

    #[test]
    fn test_min_spaces_is_respected() {
        let params = ReconstructParams {
            min_spaces: 2,
            ..Default::default()
        };
        assert_eq!(spaces_for_gap(1.0, &params), 2);
        assert_eq!(spaces_for_gap(12.0, &params), 4);
    }

    #[test]
    fn test_space_unit_has_a_floor() {
        let params = ReconstructParams {
            space_unit_pts: 0.0,
            ..Default::default()
        };
        assert_eq!(spaces_for_gap(2.0, &params), 4, "unit floors at 0.5pt");
    }

    #[test]
    fn test_half_units_round_to_even() {
        let params = ReconstructParams::default();
        assert_eq!(spaces_for_gap(7.5, &params), 2);
        assert_eq!(spaces_for_gap(10.5, &params), 4);
    }

    #[test]
    fn test_gap_measured_from_running_max_right_edge() {
        // "wide" extends past "x", so "y" overlaps the running max edge.
        let tokens = vec![
            make_token("wide", 0.0, 50.0),
            make_token("x", 10.0, 15.0),
            make_token("y", 48.0, 55.0),
        ];
        let line = rebuild(&tokens, &ReconstructParams::default());
        assert_eq!(line.text, "widexy");
        assert_eq!(line.x0, 0.0);
        assert_eq!(line.x1, 55.0);
    }

    #[test]
    fn test_tokens_resorted_by_x0() {
        let tokens = vec![make_token("world", 40.0, 70.0), make_token("hello", 0.0, 31.0)];
        let line = rebuild(&tokens, &ReconstructParams::default());
        assert_eq!(line.text, "hello   world");
    }

    #[test]
    fn test_empty_line_yields_none() {
        assert!(reconstruct_line(&[], &ReconstructParams::default()).is_none());
    }

    // =====================================================================
    // font size
    // =====================================================================

    #[test]
    fn test_declared_size_median() {
        let tokens = vec![
            make_token("a", 0.0, 1.0).with_font_size(9.0),
            make_token("b", 2.0, 3.0).with_font_size(10.0),
            make_token("c", 4.0, 5.0).with_font_size(11.0),
        ];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 10.0);
    }

    #[test]
    fn test_declared_size_upper_median_for_even_count() {
        let tokens = vec![
            make_token("a", 0.0, 1.0).with_font_size(8.0),
            make_token("b", 2.0, 3.0).with_font_size(10.0),
        ];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 10.0);
    }

    #[test]
    fn test_out_of_window_sizes_are_ignored() {
        let tokens = vec![
            make_token("a", 0.0, 1.0).with_font_size(2.0),
            make_token("b", 2.0, 3.0).with_font_size(9.0),
            make_token("c", 4.0, 5.0).with_font_size(200.0),
        ];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 9.0);
    }

    #[test]
    fn test_large_sizes_clamp_to_twelve() {
        let tokens = vec![make_token("Heading", 0.0, 1.0).with_font_size(18.0)];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 12.0);
    }

    #[test]
    fn test_small_sizes_clamp_to_six() {
        let tokens = vec![make_token("tiny", 0.0, 1.0).with_font_size(4.5)];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 6.0);
    }

    #[test]
    fn test_fallback_height_clamps_up_to_six() {
        let tokens = vec![Token::new("a", 0.0, 100.0, 5.0, 105.9)];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 6.0);
    }

    #[test]
    fn test_fallback_uses_box_height() {
        let tokens = vec![
            Token::new("a", 0.0, 100.0, 5.0, 108.0),
            Token::new("b", 6.0, 100.0, 9.0, 109.0),
            Token::new("c", 10.0, 100.0, 15.0, 110.0),
        ];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font_size(&refs), 9.0);
    }

    #[test]
    fn test_fallback_without_usable_heights() {
        let tokens = vec![Token::new("huge", 0.0, 0.0, 5.0, 500.0)];
        let refs: Vec<&Token> = tokens.iter().collect();
        // 10pt default, which sits inside the clamp window.
        assert_eq!(estimate_font_size(&refs), 10.0);
    }

    // =====================================================================
    // font name
    // =====================================================================

    #[test]
    fn test_font_is_helvetica_without_match_font() {
        let tokens = vec![make_token("a", 0.0, 1.0).with_font_name("Times-Bold")];
        let line = rebuild(&tokens, &ReconstructParams::default());
        assert_eq!(line.font, StandardFont::Helvetica);
    }

    #[test]
    fn test_font_mode_with_match_font() {
        let tokens = vec![
            make_token("a", 0.0, 1.0).with_font_name("Courier"),
            make_token("b", 2.0, 3.0).with_font_name("Times-Bold"),
            make_token("c", 4.0, 5.0).with_font_name("Times-Bold"),
        ];
        let params = ReconstructParams {
            match_font: true,
            ..Default::default()
        };
        assert_eq!(rebuild(&tokens, &params).font, StandardFont::TimesBold);
    }

    #[test]
    fn test_font_mode_tie_goes_to_first_seen() {
        let tokens = vec![
            make_token("a", 0.0, 1.0).with_font_name("Courier"),
            make_token("b", 2.0, 3.0).with_font_name("Times-Roman"),
        ];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font(&refs), StandardFont::Courier);
    }

    #[test]
    fn test_font_absent_defaults_to_helvetica() {
        let tokens = vec![make_token("a", 0.0, 1.0)];
        let refs: Vec<&Token> = tokens.iter().collect();
        assert_eq!(estimate_font(&refs), StandardFont::Helvetica);
    }

    // =====================================================================
    // position
    // =====================================================================

    #[test]
    fn test_line_top_is_median_top() {
        let tokens = vec![
            Token::new("a", 0.0, 10.0, 5.0, 20.0),
            Token::new("b", 10.0, 11.0, 15.0, 21.0),
            Token::new("c", 20.0, 10.5, 25.0, 20.5),
        ];
        let line = rebuild(&tokens, &ReconstructParams::default());
        assert_eq!(line.top, 10.5);
    }
}
