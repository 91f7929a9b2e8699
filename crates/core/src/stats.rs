//! Recovery statistics.
//!
//! Each page produces a [`PageStats`] partial on its own; the document
//! totals are the sum of those partials. No counter is ever shared between
//! pages.

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::classify::is_covered;
use crate::types::{RedactionBox, Token};

/// Counts for a single page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    pub boxes: usize,
    pub words: usize,
    pub chars: usize,
    pub covered_words: usize,
    pub covered_chars: usize,
}

impl Add for PageStats {
    type Output = PageStats;

    fn add(self, rhs: PageStats) -> PageStats {
        PageStats {
            boxes: self.boxes + rhs.boxes,
            words: self.words + rhs.words,
            chars: self.chars + rhs.chars,
            covered_words: self.covered_words + rhs.covered_words,
            covered_chars: self.covered_chars + rhs.covered_chars,
        }
    }
}

impl Sum for PageStats {
    fn sum<I: Iterator<Item = PageStats>>(iter: I) -> Self {
        iter.fold(PageStats::default(), Add::add)
    }
}

impl<'a> Sum<&'a PageStats> for PageStats {
    fn sum<I: Iterator<Item = &'a PageStats>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Count a page's words and characters, and how many sit under a box.
///
/// Tokens whose text is empty or whitespace-only are skipped entirely.
pub fn page_stats(tokens: &[Token], boxes: &[RedactionBox], threshold: f64) -> PageStats {
    let mut stats = PageStats {
        boxes: boxes.len(),
        ..Default::default()
    };

    for token in tokens.iter().filter(|t| !t.text.trim().is_empty()) {
        let chars = token.char_count();
        stats.words += 1;
        stats.chars += chars;

        if is_covered(&token.bbox, boxes, threshold) {
            stats.covered_words += 1;
            stats.covered_chars += chars;
        }
    }

    stats
}

/// Document-level statistics about text found under redactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RedactionStats {
    pub redaction_boxes_found: usize,
    pub words_under_redactions: usize,
    pub chars_under_redactions: usize,
    pub total_words_extracted: usize,
    pub total_chars_extracted: usize,
    /// Percent of extracted characters that were covered.
    pub recovery_rate: f64,
}

impl From<PageStats> for RedactionStats {
    fn from(total: PageStats) -> Self {
        let recovery_rate = if total.chars > 0 {
            total.covered_chars as f64 / total.chars as f64 * 100.0
        } else {
            0.0
        };

        RedactionStats {
            redaction_boxes_found: total.boxes,
            words_under_redactions: total.covered_words,
            chars_under_redactions: total.covered_chars,
            total_words_extracted: total.words,
            total_chars_extracted: total.chars,
            recovery_rate,
        }
    }
}

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

impl RedactionStats {
    /// Reduce page partials into document totals.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a PageStats>) -> Self {
        pages.into_iter().sum::<PageStats>().into()
    }

    /// Pretty-printed JSON (2-space indent).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report for terminal output.
    pub fn render_report(&self) -> String {
        if self.redaction_boxes_found == 0 {
            return format!(
                "\n📊 Unredaction Results\n{RULE}\n\
                 ⚠️  No redaction boxes detected\n    \
                 (Document may not have standard black-bar redactions)\n\n\
                 Total text extracted:  {} words ({} chars)\n{RULE}\n",
                thousands(self.total_words_extracted),
                thousands(self.total_chars_extracted),
            );
        }

        format!(
            "\n🔍 Unredaction Results\n{RULE}\n\
             Redaction boxes found:   {}\n\
             Words recovered:         {}\n\
             Characters recovered:    {}\n\
             Recovery rate:           {:.1}% of text was hidden\n\
             {RULE}\n\
             Total extracted:         {} words\n\
             {RULE}\n",
            thousands(self.redaction_boxes_found),
            thousands(self.words_under_redactions),
            thousands(self.chars_under_redactions),
            self.recovery_rate,
            thousands(self.total_words_extracted),
        )
    }
}

/// Format an integer with `,` thousands separators.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
