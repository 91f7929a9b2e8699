use serde::{Deserialize, Serialize};

use crate::fonts::StandardFont;

/// Baseline offset, as a fraction of the font size, below a top-anchored box.
pub const BASELINE_RATIO: f64 = 0.85;

/// An axis-aligned rectangle in page points, y increasing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    /// Smallest rectangle containing every point.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(fx, fy), rest) = points.split_first()?;
        let mut rect = Rect::new(fx, fy, fx, fy);
        for &(x, y) in rest {
            rect.x0 = rect.x0.min(x);
            rect.y0 = rect.y0.min(y);
            rect.x1 = rect.x1.max(x);
            rect.y1 = rect.y1.max(y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Area of the rectangle. Negative for malformed rectangles.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// A single word-like unit of text positioned on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// `(x0, top, x1, bottom)` stored as `(x0, y0, x1, y1)`.
    pub bbox: Rect,
    pub font_size: Option<f64>,
    pub font_name: Option<String>,
}

impl Token {
    pub fn new(text: impl Into<String>, x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Token {
            text: text.into(),
            bbox: Rect::new(x0, top, x1, bottom),
            font_size: None,
            font_name: None,
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn x0(&self) -> f64 {
        self.bbox.x0
    }

    pub fn x1(&self) -> f64 {
        self.bbox.x1
    }

    pub fn top(&self) -> f64 {
        self.bbox.y0
    }

    pub fn bottom(&self) -> f64 {
        self.bbox.y1
    }

    /// Number of Unicode scalar values in the token text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Fill color of a vector drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FillColor {
    Gray(f64),
    Rgb(f64, f64, f64),
}

/// A painted vector path reduced to its bounding rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// `None` for stroke-only paths or fills in an unsupported color space.
    pub fill: Option<FillColor>,
    pub rect: Rect,
}

/// Annotation subtypes and their numeric type codes.
const ANNOTATION_TYPES: &[(&str, u8)] = &[
    ("Text", 0),
    ("Link", 1),
    ("FreeText", 2),
    ("Line", 3),
    ("Square", 4),
    ("Circle", 5),
    ("Polygon", 6),
    ("PolyLine", 7),
    ("Highlight", 8),
    ("Underline", 9),
    ("Squiggly", 10),
    ("StrikeOut", 11),
    ("Redact", 12),
    ("Stamp", 13),
    ("Caret", 14),
    ("Ink", 15),
    ("Popup", 16),
    ("FileAttachment", 17),
    ("Sound", 18),
    ("Movie", 19),
    ("RichMedia", 20),
    ("Widget", 21),
    ("Screen", 22),
    ("PrinterMark", 23),
    ("TrapNet", 24),
    ("Watermark", 25),
    ("3D", 26),
    ("Projection", 27),
];

/// Type code of the redaction annotation.
pub const REDACT_ANNOTATION_TYPE: u8 = 12;

/// A page annotation: its `/Subtype` name and rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub subtype: String,
    pub rect: Rect,
}

impl Annotation {
    pub fn new(subtype: impl Into<String>, rect: Rect) -> Self {
        Annotation {
            subtype: subtype.into(),
            rect,
        }
    }

    /// Numeric type code for the subtype, `None` when unknown.
    pub fn type_code(&self) -> Option<u8> {
        ANNOTATION_TYPES
            .iter()
            .find(|(name, _)| *name == self.subtype)
            .map(|(_, code)| *code)
    }

    pub fn is_redaction(&self) -> bool {
        self.type_code() == Some(REDACT_ANNOTATION_TYPE)
    }
}

/// A rectangle judged to be an opaque redaction mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "rect", rename_all = "snake_case")]
pub enum RedactionBox {
    /// Declared by a `/Redact` annotation.
    FromAnnotation(Rect),
    /// A dark filled vector rectangle.
    FromFill(Rect),
}

impl RedactionBox {
    pub fn rect(&self) -> Rect {
        match self {
            RedactionBox::FromAnnotation(r) | RedactionBox::FromFill(r) => *r,
        }
    }
}

/// Everything the engine needs to know about one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageModel {
    /// 1-based page number.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub tokens: Vec<Token>,
    pub drawings: Vec<Drawing>,
    pub annotations: Vec<Annotation>,
}

/// A line of text rebuilt from its tokens, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedLine {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    /// Median top of the line's tokens.
    pub top: f64,
    pub font_size: f64,
    pub font: StandardFont,
}

impl ReconstructedLine {
    /// Vertical draw position approximating the baseline.
    pub fn baseline(&self) -> f64 {
        self.top + self.font_size * BASELINE_RATIO
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
