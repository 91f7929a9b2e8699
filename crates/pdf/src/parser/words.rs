//! Grouping positioned glyphs into word tokens.

use std::cmp::Ordering;

use unredact_core::Token;

use super::page::Glyph;

/// Tolerances for splitting glyph runs into words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Horizontal gap (points) beyond which two glyphs belong to different words.
    pub x_tolerance: f64,
    /// Vertical distance (points) beyond which two glyphs sit on different rows.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// Group glyphs into rows by their top, chaining within `tolerance`.
///
/// Rows come back top to bottom, each sorted left to right.
fn cluster_rows(glyphs: &[Glyph], tolerance: f64) -> Vec<Vec<&Glyph>> {
    let mut sorted: Vec<&Glyph> = glyphs.iter().collect();
    sorted.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal));

    let mut rows: Vec<Vec<&Glyph>> = Vec::new();
    let mut last_top = f64::NEG_INFINITY;
    for glyph in sorted {
        match rows.last_mut() {
            Some(row) if glyph.top <= last_top + tolerance => row.push(glyph),
            _ => rows.push(vec![glyph]),
        }
        last_top = glyph.top;
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));
    }
    rows
}

fn begins_new_word(prev: &Glyph, curr: &Glyph, options: &WordOptions) -> bool {
    curr.x0 > prev.x1 + options.x_tolerance
        || (curr.top - prev.top).abs() > options.y_tolerance
}

fn make_token(glyphs: &[&Glyph]) -> Option<Token> {
    let (first, _) = glyphs.split_first()?;
    let text: String = glyphs.iter().map(|g| g.text).collect();

    let x0 = glyphs.iter().map(|g| g.x0).fold(f64::INFINITY, f64::min);
    let x1 = glyphs.iter().map(|g| g.x1).fold(f64::NEG_INFINITY, f64::max);
    let top = glyphs.iter().map(|g| g.top).fold(f64::INFINITY, f64::min);
    let bottom = glyphs.iter().map(|g| g.bottom).fold(f64::NEG_INFINITY, f64::max);

    let mut token = Token::new(text, x0, top, x1, bottom).with_font_size(first.font_size);
    if !first.font_name.is_empty() {
        token = token.with_font_name(first.font_name.clone());
    }
    Some(token)
}

/// Split glyphs into word tokens.
///
/// Whitespace glyphs end the current word and are dropped. A glyph also
/// starts a new word when it sits more than `x_tolerance` right of the
/// previous glyph, or more than `y_tolerance` above or below it. Each token
/// takes the font name and size of its first glyph.
pub fn extract_words(glyphs: &[Glyph], options: &WordOptions) -> Vec<Token> {
    let mut tokens = Vec::new();

    for row in cluster_rows(glyphs, options.y_tolerance) {
        let mut current: Vec<&Glyph> = Vec::new();

        for glyph in row {
            if glyph.text.is_whitespace() {
                tokens.extend(make_token(&current));
                current.clear();
                continue;
            }

            if let Some(prev) = current.last() {
                if begins_new_word(prev, glyph, options) {
                    tokens.extend(make_token(&current));
                    current.clear();
                }
            }
            current.push(glyph);
        }

        tokens.extend(make_token(&current));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_glyph(text: char, x0: f64, top: f64) -> Glyph {
        Glyph {
            text,
            x0,
            x1: x0 + 5.0,
            top,
            bottom: top + 10.0,
            font_name: "Helvetica".to_string(),
            font_size: 10.0,
        }
    }

    fn run(text: &str, x0: f64, top: f64) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, c)| make_glyph(c, x0 + 5.0 * i as f64, top))
            .collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_split_on_whitespace() {
        let tokens = extract_words(&run("top secret", 0.0, 100.0), &WordOptions::default());
        assert_eq!(texts(&tokens), vec!["top", "secret"]);
        assert_eq!(tokens[1].x0(), 20.0);
        assert_eq!(tokens[1].x1(), 50.0);
        assert_eq!(tokens[0].top(), 100.0);
        assert_eq!(tokens[0].bottom(), 110.0);
    }

    #[test]
    fn test_split_on_horizontal_gap() {
        let mut glyphs = run("ab", 0.0, 100.0);
        glyphs.extend(run("cd", 13.5, 100.0));
        let tokens = extract_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&tokens), vec!["ab", "cd"]);
    }

    #[test]
    fn test_small_gap_stays_in_word() {
        let mut glyphs = run("ab", 0.0, 100.0);
        glyphs.extend(run("cd", 12.5, 100.0));
        let tokens = extract_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&tokens), vec!["abcd"]);
    }

    #[test]
    fn test_rows_are_separated() {
        let mut glyphs = run("second", 0.0, 200.0);
        glyphs.extend(run("first", 0.0, 100.0));
        let tokens = extract_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&tokens), vec!["first", "second"]);
    }

    #[test]
    fn test_content_order_does_not_matter_within_row() {
        let mut glyphs = run("lo", 10.0, 100.0);
        glyphs.extend(run("hel", -5.0, 100.5));
        let tokens = extract_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&tokens), vec!["hello"]);
    }

    #[test]
    fn test_token_carries_first_glyph_font() {
        let mut glyphs = run("ab", 0.0, 100.0);
        glyphs[1].font_name = "Courier".to_string();
        glyphs[1].font_size = 12.0;
        let tokens = extract_words(&glyphs, &WordOptions::default());
        assert_eq!(tokens[0].font_name.as_deref(), Some("Helvetica"));
        assert_eq!(tokens[0].font_size, Some(10.0));
    }

    #[test]
    fn test_no_glyphs_no_words() {
        assert!(extract_words(&[], &WordOptions::default()).is_empty());
        assert!(extract_words(&run("   ", 0.0, 0.0), &WordOptions::default()).is_empty());
    }
}
