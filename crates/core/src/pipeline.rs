//! Per-page and per-document reconstruction.
//!
//! Pages never share state, so a document is processed as an ordered map
//! over its pages followed by a reduction of the page statistics. With
//! [`ReconstructOptions::parallel`] set the map runs on the rayon pool;
//! `collect` keeps the results in page order either way.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::OVERLAP_THRESHOLD;
use crate::detect::detect_redaction_boxes;
use crate::lines::{cluster_lines, DEFAULT_LINE_TOL};
use crate::reconstruct::{reconstruct_line, ReconstructParams};
use crate::stats::{page_stats, PageStats, RedactionStats};
use crate::types::{PageModel, ReconstructedLine, RedactionBox};

/// Options for a reconstruction run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconstructOptions {
    /// Vertical tolerance (points) for tokens sharing a line.
    pub line_tol: f64,
    /// Points of horizontal gap per inserted space.
    pub space_unit_pts: f64,
    /// Minimum spaces for any positive gap.
    pub min_spaces: usize,
    /// Map declared font names onto standard fonts instead of Helvetica.
    pub match_font: bool,
    /// Minimum covered fraction for a token to count as redacted.
    pub overlap_threshold: f64,
    /// Process pages on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        let params = ReconstructParams::default();
        Self {
            line_tol: DEFAULT_LINE_TOL,
            space_unit_pts: params.space_unit_pts,
            min_spaces: params.min_spaces,
            match_font: params.match_font,
            overlap_threshold: OVERLAP_THRESHOLD,
            parallel: true,
        }
    }
}

impl ReconstructOptions {
    pub fn line_params(&self) -> ReconstructParams {
        ReconstructParams {
            space_unit_pts: self.space_unit_pts,
            min_spaces: self.min_spaces,
            match_font: self.match_font,
        }
    }
}

/// Everything recovered from one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReconstruction {
    /// 1-based page number.
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub boxes: Vec<RedactionBox>,
    pub lines: Vec<ReconstructedLine>,
    pub stats: PageStats,
}

/// Ordered page results plus document totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReconstruction {
    pub pages: Vec<PageReconstruction>,
    pub stats: RedactionStats,
}

/// Run detection, line rebuilding and classification for a single page.
pub fn reconstruct_page(page: &PageModel, options: &ReconstructOptions) -> PageReconstruction {
    let boxes = detect_redaction_boxes(&page.annotations, &page.drawings);

    let params = options.line_params();
    let lines: Vec<ReconstructedLine> = cluster_lines(&page.tokens, options.line_tol)
        .iter()
        .filter_map(|line| reconstruct_line(&line.tokens, &params))
        .filter(|line| !line.is_blank())
        .collect();

    let stats = page_stats(&page.tokens, &boxes, options.overlap_threshold);

    debug!(
        "page {}: {} tokens, {} boxes, {} lines, {} covered words",
        page.number,
        page.tokens.len(),
        boxes.len(),
        lines.len(),
        stats.covered_words
    );

    PageReconstruction {
        page_number: page.number,
        width: page.width,
        height: page.height,
        boxes,
        lines,
        stats,
    }
}

/// Reconstruct every page and reduce the document statistics.
pub fn reconstruct_document(pages: &[PageModel], options: &ReconstructOptions) -> DocumentReconstruction {
    let pages: Vec<PageReconstruction> = if options.parallel {
        pages
            .par_iter()
            .map(|page| reconstruct_page(page, options))
            .collect()
    } else {
        pages
            .iter()
            .map(|page| reconstruct_page(page, options))
            .collect()
    };

    let stats = RedactionStats::from_pages(pages.iter().map(|p| &p.stats));

    DocumentReconstruction { pages, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Annotation, Drawing, FillColor, Rect, Token};

    fn page_with(tokens: Vec<Token>, drawings: Vec<Drawing>) -> PageModel {
        PageModel {
            number: 1,
            width: 612.0,
            height: 792.0,
            tokens,
            drawings,
            annotations: vec![],
        }
    }

    fn black_bar() -> Drawing {
        Drawing {
            fill: Some(FillColor::Rgb(0.0, 0.0, 0.0)),
            rect: Rect::new(100.0, 100.0, 200.0, 120.0),
        }
    }

    #[test]
    fn test_single_box_single_word() {
        let page = page_with(
            vec![Token::new("secret", 110.0, 102.0, 190.0, 118.0)],
            vec![black_bar()],
        );

        let doc = reconstruct_document(&[page], &ReconstructOptions::default());

        assert_eq!(doc.stats.redaction_boxes_found, 1);
        assert_eq!(doc.stats.words_under_redactions, 1);
        assert_eq!(doc.stats.recovery_rate, 100.0);
        assert_eq!(doc.pages[0].lines.len(), 1);
        assert_eq!(doc.pages[0].lines[0].text, "secret");
    }

    #[test]
    fn test_empty_page_yields_empty_result() {
        let doc = reconstruct_document(&[PageModel::default()], &ReconstructOptions::default());
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].lines.is_empty());
        assert!(doc.pages[0].boxes.is_empty());
        assert_eq!(doc.stats, RedactionStats::default());
    }

    #[test]
    fn test_no_pages() {
        let doc = reconstruct_document(&[], &ReconstructOptions::default());
        assert!(doc.pages.is_empty());
        assert_eq!(doc.stats.recovery_rate, 0.0);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let page = page_with(
            vec![
                Token::new(" ", 10.0, 50.0, 20.0, 60.0),
                Token::new("text", 10.0, 100.0, 40.0, 110.0),
            ],
            vec![],
        );
        let result = reconstruct_page(&page, &ReconstructOptions::default());
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].text, "text");
    }

    #[test]
    fn test_annotation_box_counts() {
        let mut page = page_with(vec![Token::new("name", 10.0, 10.0, 40.0, 20.0)], vec![]);
        page.annotations = vec![Annotation::new("Redact", Rect::new(0.0, 0.0, 50.0, 30.0))];

        let result = reconstruct_page(&page, &ReconstructOptions::default());
        assert_eq!(result.boxes, vec![RedactionBox::FromAnnotation(Rect::new(0.0, 0.0, 50.0, 30.0))]);
        assert_eq!(result.stats.covered_words, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<PageModel> = (1..=8)
            .map(|n| PageModel {
                number: n,
                width: 612.0,
                height: 792.0,
                tokens: vec![
                    Token::new(format!("page{n}"), 10.0, 10.0, 60.0, 20.0),
                    Token::new("hidden", 110.0, 102.0, 190.0, 118.0),
                ],
                drawings: if n % 2 == 0 { vec![black_bar()] } else { vec![] },
                annotations: vec![],
            })
            .collect();

        let parallel = reconstruct_document(&pages, &ReconstructOptions::default());
        let sequential = reconstruct_document(
            &pages,
            &ReconstructOptions {
                parallel: false,
                ..Default::default()
            },
        );

        assert_eq!(parallel, sequential);
        let numbers: Vec<usize> = parallel.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>(), "page order is preserved");
        assert_eq!(parallel.stats.redaction_boxes_found, 4);
        assert_eq!(parallel.stats.words_under_redactions, 4);
    }

    #[test]
    fn test_options_flow_into_line_params() {
        let options = ReconstructOptions {
            space_unit_pts: 5.0,
            min_spaces: 2,
            match_font: true,
            ..Default::default()
        };
        let params = options.line_params();
        assert_eq!(params.space_unit_pts, 5.0);
        assert_eq!(params.min_spaces, 2);
        assert!(params.match_font);
    }
}
