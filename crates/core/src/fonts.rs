use std::fmt;

use serde::{Deserialize, Serialize};

/// The fourteen standard PDF fonts every viewer can draw without embedding.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StandardFont {
    #[default]
    #[serde(rename = "helvetica")]
    Helvetica,
    #[serde(rename = "helvetica-bold")]
    HelveticaBold,
    #[serde(rename = "helvetica-oblique")]
    HelveticaOblique,
    #[serde(rename = "helvetica-boldoblique")]
    HelveticaBoldOblique,
    #[serde(rename = "times-roman")]
    TimesRoman,
    #[serde(rename = "times-bold")]
    TimesBold,
    #[serde(rename = "times-italic")]
    TimesItalic,
    #[serde(rename = "times-bolditalic")]
    TimesBoldItalic,
    #[serde(rename = "courier")]
    Courier,
    #[serde(rename = "courier-bold")]
    CourierBold,
    #[serde(rename = "courier-oblique")]
    CourierOblique,
    #[serde(rename = "courier-boldoblique")]
    CourierBoldOblique,
    #[serde(rename = "symbol")]
    Symbol,
    #[serde(rename = "zapfdingbats")]
    ZapfDingbats,
}

impl StandardFont {
    /// Map an arbitrary font name (e.g. `ABCDEF+Times-BoldItalic`) onto the
    /// closest standard font by family and style keywords.
    ///
    /// Unrecognized families fall back to [`StandardFont::Helvetica`].
    pub fn from_font_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let bold = name.contains("bold");
        let oblique = name.contains("oblique");
        let italic = name.contains("italic");

        if name.contains("helvetica") {
            match (bold, oblique) {
                (true, true) => StandardFont::HelveticaBoldOblique,
                (true, false) => StandardFont::HelveticaBold,
                (false, true) => StandardFont::HelveticaOblique,
                (false, false) => StandardFont::Helvetica,
            }
        } else if name.contains("times") {
            match (bold, italic) {
                (true, true) => StandardFont::TimesBoldItalic,
                (true, false) => StandardFont::TimesBold,
                (false, true) => StandardFont::TimesItalic,
                (false, false) => StandardFont::TimesRoman,
            }
        } else if name.contains("courier") {
            match (bold, oblique) {
                (true, true) => StandardFont::CourierBoldOblique,
                (true, false) => StandardFont::CourierBold,
                (false, true) => StandardFont::CourierOblique,
                (false, false) => StandardFont::Courier,
            }
        } else if name.contains("symbol") {
            StandardFont::Symbol
        } else if name.contains("zapf") || name.contains("dingbat") {
            StandardFont::ZapfDingbats
        } else {
            StandardFont::Helvetica
        }
    }

    /// Lowercase identifier, e.g. `times-bolditalic`.
    pub fn id(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "helvetica",
            StandardFont::HelveticaBold => "helvetica-bold",
            StandardFont::HelveticaOblique => "helvetica-oblique",
            StandardFont::HelveticaBoldOblique => "helvetica-boldoblique",
            StandardFont::TimesRoman => "times-roman",
            StandardFont::TimesBold => "times-bold",
            StandardFont::TimesItalic => "times-italic",
            StandardFont::TimesBoldItalic => "times-bolditalic",
            StandardFont::Courier => "courier",
            StandardFont::CourierBold => "courier-bold",
            StandardFont::CourierOblique => "courier-oblique",
            StandardFont::CourierBoldOblique => "courier-boldoblique",
            StandardFont::Symbol => "symbol",
            StandardFont::ZapfDingbats => "zapfdingbats",
        }
    }

    /// The `/BaseFont` name a PDF writer must use for this font.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbolic fonts carry their own encoding; the rest use WinAnsi.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
