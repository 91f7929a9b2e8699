//! Clustering of page tokens into visual lines.

use std::cmp::Ordering;

use crate::types::Token;

/// Default vertical tolerance (points) for two tokens to share a line.
pub const DEFAULT_LINE_TOL: f64 = 2.0;

/// Tokens judged to share one visual row, sorted left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub tokens: Vec<&'a Token>,
}

impl<'a> Line<'a> {
    fn from_cluster(mut tokens: Vec<&'a Token>) -> Self {
        tokens.sort_by(|a, b| a.x0().partial_cmp(&b.x0()).unwrap_or(Ordering::Equal));
        Line { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Group a page's tokens into lines, top to bottom.
///
/// Tokens are walked in `(top, x0)` order. A token joins the current line
/// when its top is within `line_tol` of the line's running mean top; the mean
/// then absorbs the new top. Anchoring to the mean rather than the first
/// token keeps a line with gentle vertical jitter together.
pub fn cluster_lines(tokens: &[Token], line_tol: f64) -> Vec<Line<'_>> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| {
        a.top()
            .partial_cmp(&b.top())
            .unwrap_or(Ordering::Equal)
            .then(a.x0().partial_cmp(&b.x0()).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<Line<'_>> = Vec::new();
    let mut current: Vec<&Token> = Vec::new();
    let mut centroid = 0.0;

    for token in sorted {
        let top = token.top();
        if current.is_empty() {
            centroid = top;
            current.push(token);
            continue;
        }

        if (top - centroid).abs() <= line_tol {
            current.push(token);
            let n = current.len() as f64;
            centroid = (centroid * (n - 1.0) + top) / n;
        } else {
            lines.push(Line::from_cluster(std::mem::take(&mut current)));
            centroid = top;
            current.push(token);
        }
    }

    if !current.is_empty() {
        lines.push(Line::from_cluster(current));
    }

    lines
}
