//! Page content walking.
//!
//! Turns a page's content-stream operators into positioned glyph boxes and
//! painted path rectangles, and reads the page's annotations. Every
//! coordinate leaving this module is in top-down page points: the origin is
//! the top-left corner of the MediaBox and y grows downward.
//!
//! The walker implements a simplified PDF graphics and text state machine:
//!
//! | Operator                          | Action                              |
//! |-----------------------------------|-------------------------------------|
//! | `q` `Q` `cm`                      | Save/restore state, concatenate CTM |
//! | `g` `rg` `k` `cs` `sc` `scn`      | Set the fill color                  |
//! | `Do`                              | Walk a Form XObject                 |
//! | `re` `m` `l` `c` `v` `y` `h`      | Build the current path              |
//! | `f` `F` `f*` `B` `B*` `b` `b*`    | Fill: emit a filled drawing         |
//! | `S` `s`                           | Stroke: emit an unfilled drawing    |
//! | `n`                               | Discard the path                    |
//! | `BT` `ET`                         | Begin/end text object               |
//! | `Tf` `Tm` `Td` `TD` `T*` `TL`     | Font and text positioning           |
//! | `Tc` `Tw` `Tz` `Ts`               | Spacing, scaling, rise              |
//! | `Tj` `TJ` `'` `"`                 | Show text                           |

use log::{debug, warn};
use unredact_core::{Annotation, Drawing, FillColor, PageModel, Rect};

use super::backend::{
    get_number_from_value, BackendFontInfo, ColorSpaceResource, ContentOp, PageBox, PageId,
    PdfBackend, PdfValue, RawAnnotation,
};
use super::words::{extract_words, WordOptions};
use crate::PdfError;

/// Advance (fraction of the font size) for glyphs with no `/Widths` entry.
pub const DEFAULT_GLYPH_WIDTH: f64 = 0.5;

/// Glyph box extent above the baseline, as a fraction of the font size.
pub const GLYPH_ASCENT: f64 = 0.8;

/// Glyph box extent below the baseline, as a fraction of the font size.
pub const GLYPH_DESCENT: f64 = 0.2;

/// Form XObjects nested deeper than this are not walked.
pub const MAX_FORM_DEPTH: usize = 12;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One rendered character with its box in top-down page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: char,
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
    pub font_name: String,
    pub font_size: f64,
}

/// Everything painted by one page's content stream.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub glyphs: Vec<Glyph>,
    pub drawings: Vec<Drawing>,
}

// ---------------------------------------------------------------------------
// Internal: matrices
// ---------------------------------------------------------------------------

/// A 2x3 affine matrix `[a, b, c, d, e, f]`.
type Matrix = [f64; 6];

const IDENTITY_MATRIX: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m × n`: apply `m` first, then `n`.
fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn apply(m: &Matrix, x: f64, y: f64) -> (f64, f64) {
    (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
}

fn matrix_from_operands(operands: &[PdfValue]) -> Option<Matrix> {
    let vals: Vec<f64> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if vals.len() == 6 {
        Some([vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]])
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Internal: color
// ---------------------------------------------------------------------------

/// The current fill color space, reduced to what `sc`/`scn` can evaluate.
#[derive(Debug, Clone, PartialEq)]
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    /// A named space missing from the resources: 1 operand is gray, 3 RGB,
    /// 4 CMYK.
    Inferred,
    Indexed { components: usize, lookup: Vec<u8> },
    /// Separation on the black colorant.
    BlackTint,
    /// Patterns and spaces whose colors cannot be evaluated.
    Unpaintable,
}

impl ColorSpace {
    fn from_family_name(name: &[u8]) -> Option<Self> {
        match name {
            b"DeviceGray" | b"G" => Some(ColorSpace::Gray),
            b"DeviceRGB" | b"RGB" => Some(ColorSpace::Rgb),
            b"DeviceCMYK" | b"CMYK" => Some(ColorSpace::Cmyk),
            b"Pattern" => Some(ColorSpace::Unpaintable),
            _ => None,
        }
    }

    fn from_resource(resource: Option<ColorSpaceResource>) -> Self {
        match resource {
            Some(ColorSpaceResource::Device(1)) => ColorSpace::Gray,
            Some(ColorSpaceResource::Device(3)) => ColorSpace::Rgb,
            Some(ColorSpaceResource::Device(4)) => ColorSpace::Cmyk,
            Some(ColorSpaceResource::Indexed { components, lookup }) => {
                ColorSpace::Indexed { components, lookup }
            }
            Some(ColorSpaceResource::BlackTint) => ColorSpace::BlackTint,
            Some(ColorSpaceResource::Pattern | ColorSpaceResource::Unsupported) => {
                ColorSpace::Unpaintable
            }
            Some(ColorSpaceResource::Device(_)) | None => ColorSpace::Inferred,
        }
    }

    /// The color a space starts at when selected with `cs`.
    fn initial_color(&self) -> Option<FillColor> {
        match self {
            ColorSpace::Gray | ColorSpace::BlackTint => Some(FillColor::Gray(0.0)),
            ColorSpace::Rgb | ColorSpace::Cmyk => Some(FillColor::Rgb(0.0, 0.0, 0.0)),
            ColorSpace::Indexed { components, lookup } => indexed_color(*components, lookup, 0.0),
            ColorSpace::Inferred | ColorSpace::Unpaintable => None,
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

pub fn rgb_from_cmyk(c: f64, m: f64, y: f64, k: f64) -> FillColor {
    let k = clamp_unit(k);
    FillColor::Rgb(
        (1.0 - clamp_unit(c)) * (1.0 - k),
        (1.0 - clamp_unit(m)) * (1.0 - k),
        (1.0 - clamp_unit(y)) * (1.0 - k),
    )
}

/// Palette entry `index` as a color of the base space.
fn indexed_color(components: usize, lookup: &[u8], index: f64) -> Option<FillColor> {
    let start = (index.max(0.0).round() as usize).checked_mul(components)?;
    let end = start.checked_add(components)?;
    let entry: Vec<f64> = lookup
        .get(start..end)?
        .iter()
        .map(|&b| b as f64 / 255.0)
        .collect();
    match entry.as_slice() {
        [g] => Some(FillColor::Gray(*g)),
        [r, g, b] => Some(FillColor::Rgb(*r, *g, *b)),
        [c, m, y, k] => Some(rgb_from_cmyk(*c, *m, *y, *k)),
        _ => None,
    }
}

/// Parse fill color operands for a color space. Gray stays gray.
fn parse_fill_color(space: &ColorSpace, operands: &[PdfValue]) -> Option<FillColor> {
    let nums: Vec<f64> = operands.iter().filter_map(get_number_from_value).collect();
    match (space, nums.as_slice()) {
        (ColorSpace::Gray | ColorSpace::Inferred, [g]) => Some(FillColor::Gray(clamp_unit(*g))),
        (ColorSpace::Rgb | ColorSpace::Inferred, [r, g, b]) => Some(FillColor::Rgb(
            clamp_unit(*r),
            clamp_unit(*g),
            clamp_unit(*b),
        )),
        (ColorSpace::Cmyk | ColorSpace::Inferred, [c, m, y, k]) => {
            Some(rgb_from_cmyk(*c, *m, *y, *k))
        }
        (ColorSpace::Indexed { components, lookup }, [i]) => indexed_color(*components, lookup, *i),
        (ColorSpace::BlackTint, [t]) => Some(FillColor::Gray(1.0 - clamp_unit(*t))),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Internal: state
// ---------------------------------------------------------------------------

/// Text state parameters plus the text and line matrices.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Resolved base-font name for the current font.
    font_name: String,
    font_size: f64,
    text_matrix: Matrix,
    /// Set by BT and updated by Td/TD/T*/Tm.
    line_matrix: Matrix,
    /// Horizontal scaling factor (percent / 100).
    horiz_scale: f64,
    char_spacing: f64,
    word_spacing: f64,
    text_rise: f64,
    leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f64) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f64, ty: f64) {
        let m = &self.line_matrix;
        let new_tx = m[0] * tx + m[2] * ty + m[4];
        let new_ty = m[1] * tx + m[3] * ty + m[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

/// The part of the graphics state saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill: Option<FillColor>,
    fill_space: ColorSpace,
    text: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY_MATRIX,
            fill: Some(FillColor::Gray(0.0)),
            fill_space: ColorSpace::Gray,
            text: TextState::default(),
        }
    }
}

/// Resolve a font resource name to its [`BackendFontInfo`].
fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

struct PageWalker<'a> {
    backend: &'a dyn PdfBackend,
    /// Owner of the resources in effect: the page, or the Form XObject
    /// being walked.
    scope: PageId,
    /// Number of enclosing Form XObjects.
    depth: usize,
    fonts: Vec<BackendFontInfo>,
    page_box: PageBox,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    /// Current path points in device space.
    path: Vec<(f64, f64)>,
    out: PageContent,
}

impl<'a> PageWalker<'a> {
    fn new(backend: &'a dyn PdfBackend, page_id: PageId, page_box: PageBox) -> Self {
        Self {
            backend,
            scope: page_id,
            depth: 0,
            fonts: backend.page_fonts(page_id).unwrap_or_default(),
            page_box,
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            out: PageContent::default(),
        }
    }

    /// Device-space point to top-down page coordinates.
    fn to_page(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x - self.page_box.llx, self.page_box.ury - y)
    }

    fn push_point(&mut self, x: f64, y: f64) {
        let p = apply(&self.state.ctm, x, y);
        self.path.push(p);
    }

    fn step(&mut self, op: &ContentOp) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            // -- Graphics state -----------------------------------------
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(prev) = self.stack.pop() {
                    self.state = prev;
                }
            }
            "cm" => {
                if let Some(m) = matrix_from_operands(operands) {
                    self.state.ctm = multiply(&m, &self.state.ctm);
                }
            }

            // -- Fill color ---------------------------------------------
            "g" => self.set_fill(ColorSpace::Gray, operands),
            "rg" => self.set_fill(ColorSpace::Rgb, operands),
            "k" => self.set_fill(ColorSpace::Cmyk, operands),
            "cs" => {
                let space = match operands.first() {
                    Some(PdfValue::Name(name)) => ColorSpace::from_family_name(name)
                        .unwrap_or_else(|| {
                            ColorSpace::from_resource(self.backend.color_space(self.scope, name))
                        }),
                    _ => ColorSpace::Unpaintable,
                };
                self.state.fill = space.initial_color();
                self.state.fill_space = space;
            }
            "sc" | "scn" => {
                self.state.fill = parse_fill_color(&self.state.fill_space, operands);
            }

            // -- Path construction --------------------------------------
            "re" => {
                let nums: Vec<f64> = operands.iter().filter_map(get_number_from_value).collect();
                if let &[x, y, w, h] = nums.as_slice() {
                    self.push_point(x, y);
                    self.push_point(x + w, y);
                    self.push_point(x + w, y + h);
                    self.push_point(x, y + h);
                }
            }
            "m" | "l" | "c" | "v" | "y" => {
                let nums: Vec<f64> = operands.iter().filter_map(get_number_from_value).collect();
                for pair in nums.chunks_exact(2) {
                    self.push_point(pair[0], pair[1]);
                }
            }
            "h" | "W" | "W*" => {}

            // -- Path painting ------------------------------------------
            "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                let fill = self.state.fill;
                self.emit_drawing(fill);
            }
            "S" | "s" => self.emit_drawing(None),
            "n" => self.path.clear(),

            // -- Text object delimiters ---------------------------------
            "BT" => {
                self.state.text.text_matrix = IDENTITY_MATRIX;
                self.state.text.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {}

            // -- XObjects -----------------------------------------------
            "Do" => {
                if let Some(PdfValue::Name(name)) = operands.first() {
                    self.run_form(name);
                }
            }

            // -- Text state ---------------------------------------------
            "Tf" => self.handle_tf(operands),
            "Tm" => {
                if let Some(m) = matrix_from_operands(operands) {
                    self.state.text.text_matrix = m;
                    self.state.text.line_matrix = m;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number_from_value(&operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        self.state.text.leading = -ty;
                    }
                    self.state.text.translate_line(tx, ty);
                }
            }
            "T*" => self.state.text.next_line(),
            "TL" | "Tc" | "Tw" | "Tz" | "Ts" => {
                if let Some(v) = operands.first().and_then(get_number_from_value) {
                    let text = &mut self.state.text;
                    match op.operator.as_str() {
                        "TL" => text.leading = v,
                        "Tc" => text.char_spacing = v,
                        "Tw" => text.word_spacing = v,
                        "Tz" => text.horiz_scale = v / 100.0,
                        _ => text.text_rise = v,
                    }
                }
            }

            // -- Show text ----------------------------------------------
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = operands.first() {
                    self.show_string(bytes);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = operands.first() {
                    self.show_array(arr);
                }
            }
            "'" => {
                self.state.text.next_line();
                if let Some(PdfValue::Str(bytes)) = operands.first() {
                    self.show_string(bytes);
                }
            }
            "\"" => {
                if operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&operands[0]) {
                        self.state.text.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&operands[1]) {
                        self.state.text.char_spacing = ac;
                    }
                    self.state.text.next_line();
                    if let PdfValue::Str(bytes) = &operands[2] {
                        self.show_string(bytes);
                    }
                }
            }

            _ => {}
        }
    }

    fn set_fill(&mut self, space: ColorSpace, operands: &[PdfValue]) {
        if let Some(color) = parse_fill_color(&space, operands) {
            self.state.fill = Some(color);
        }
        self.state.fill_space = space;
    }

    /// Walk a Form XObject's operators with its matrix applied and its
    /// resources in effect, then restore the invoking state.
    fn run_form(&mut self, name: &[u8]) {
        let Some(form) = self.backend.form_xobject(self.scope, name) else {
            return;
        };
        let label = String::from_utf8_lossy(name).into_owned();
        if self.depth >= MAX_FORM_DEPTH {
            warn!("form {label} nested deeper than {MAX_FORM_DEPTH} levels; skipped");
            return;
        }
        let ops = match self.backend.decode_content(&form.content) {
            Ok(ops) => ops,
            Err(e) => {
                warn!("form {label}: {e}");
                return;
            }
        };

        let saved_state = self.state.clone();
        let saved_stack = self.stack.len();
        let fonts = self.backend.page_fonts(form.resources).unwrap_or_default();
        let saved_fonts = std::mem::replace(&mut self.fonts, fonts);
        let saved_scope = std::mem::replace(&mut self.scope, form.resources);

        self.state.ctm = multiply(&form.matrix, &self.state.ctm);
        self.depth += 1;
        for op in &ops {
            self.step(op);
        }
        self.depth -= 1;

        self.stack.truncate(saved_stack);
        self.state = saved_state;
        self.fonts = saved_fonts;
        self.scope = saved_scope;
    }

    fn emit_drawing(&mut self, fill: Option<FillColor>) {
        let pb = self.page_box;
        let points: Vec<(f64, f64)> = self
            .path
            .drain(..)
            .map(|(x, y)| (x - pb.llx, pb.ury - y))
            .collect();
        if let Some(rect) = Rect::from_points(&points) {
            self.out.drawings.push(Drawing { fill, rect });
        }
    }

    /// Handle the `Tf` (set font) operator.
    fn handle_tf(&mut self, operands: &[PdfValue]) {
        if operands.len() < 2 {
            return;
        }
        let key = match &operands[0] {
            PdfValue::Name(n) => n.clone(),
            PdfValue::Str(s) => s.clone(),
            _ => return,
        };
        let size = get_number_from_value(&operands[1]).unwrap_or(0.0);

        let name = match resolve_font(&key, &self.fonts) {
            Some(info) => info.base_font.clone().unwrap_or_default(),
            // Font not in resource dict -- keep the key anyway.
            None => String::from_utf8_lossy(&key).into_owned(),
        };

        let text = &mut self.state.text;
        text.font_key = key;
        text.font_name = name;
        text.font_size = size;
    }

    /// Process a `TJ` array: strings are shown, numbers are kerning
    /// adjustments in thousandths of a text-space unit.
    fn show_array(&mut self, arr: &[PdfValue]) {
        for elem in arr {
            match elem {
                PdfValue::Str(bytes) => self.show_string(bytes),
                val => {
                    if let Some(adj) = get_number_from_value(val) {
                        let text = &mut self.state.text;
                        let dx = -adj / 1000.0 * text.font_size * text.horiz_scale;
                        text.advance_x(dx);
                    }
                }
            }
        }
    }

    /// Emit one glyph per decoded character and advance the text matrix.
    fn show_string(&mut self, bytes: &[u8]) {
        let decoded = self
            .backend
            .decode_text(self.scope, &self.state.text.font_key, bytes);

        // (char, single-byte code, width as a fraction of the font size)
        let glyphs: Vec<(char, Option<u32>, f64)> = {
            let font = resolve_font(&self.state.text.font_key, &self.fonts);
            // Single-byte fonts map each decoded char back to its code,
            // which indexes `/Widths`.
            let single_byte = !font.is_some_and(BackendFontInfo::is_multibyte)
                && decoded.chars().count() == bytes.len();

            decoded
                .chars()
                .enumerate()
                .map(|(i, ch)| {
                    let code = single_byte.then(|| bytes[i] as u32);
                    let width = code
                        .zip(font)
                        .and_then(|(c, f)| f.glyph_width(c))
                        .map(|w| w / 1000.0)
                        .unwrap_or(DEFAULT_GLYPH_WIDTH);
                    (ch, code, width)
                })
                .collect()
        };

        for (ch, code, width) in glyphs {
            self.emit_glyph(ch, width);

            let text = &mut self.state.text;
            let mut advance = width * text.font_size + text.char_spacing;
            if code == Some(32) {
                advance += text.word_spacing;
            }
            text.advance_x(advance * text.horiz_scale);
        }
    }

    fn emit_glyph(&mut self, ch: char, width: f64) {
        let text = &self.state.text;
        let trm = multiply(&text.text_matrix, &self.state.ctm);
        let origin = apply(&trm, 0.0, text.text_rise);
        let scale_x = trm[0].hypot(trm[1]);
        let scale_y = trm[2].hypot(trm[3]);

        let size = (text.font_size * scale_y).abs();
        let advance = width * text.font_size * text.horiz_scale * scale_x;
        let (x, baseline) = self.to_page(origin);
        let (x0, x1) = if advance >= 0.0 {
            (x, x + advance)
        } else {
            (x + advance, x)
        };

        self.out.glyphs.push(Glyph {
            text: ch,
            x0,
            x1,
            top: baseline - GLYPH_ASCENT * size,
            bottom: baseline + GLYPH_DESCENT * size,
            font_name: text.font_name.clone(),
            font_size: size,
        });
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Walk a sequence of already-decoded content operations for a page.
pub fn walk_page_ops(
    backend: &dyn PdfBackend,
    page_id: PageId,
    page_box: PageBox,
    ops: &[ContentOp],
) -> PageContent {
    let mut walker = PageWalker::new(backend, page_id, page_box);
    for op in ops {
        walker.step(op);
    }
    walker.out
}

/// Decode and walk a page's content stream.
pub fn extract_page_content(
    backend: &dyn PdfBackend,
    page_id: PageId,
    page_box: PageBox,
) -> Result<PageContent, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    Ok(walk_page_ops(backend, page_id, page_box, &ops))
}

/// Convert a raw annotation into top-down page coordinates.
pub fn convert_annotation(raw: &RawAnnotation, page_box: &PageBox) -> Annotation {
    let [ax0, ay0, ax1, ay1] = raw.rect;
    let rect = Rect::new(
        ax0.min(ax1) - page_box.llx,
        page_box.ury - ay0.max(ay1),
        ax0.max(ax1) - page_box.llx,
        page_box.ury - ay0.min(ay1),
    );
    Annotation::new(raw.subtype.clone(), rect)
}

/// Build the model of one page.
///
/// A page whose content cannot be read keeps its dimensions and
/// annotations but has no tokens or drawings.
pub fn extract_page(backend: &dyn PdfBackend, number: u32, page_id: PageId) -> PageModel {
    let page_box = backend.page_box(page_id).unwrap_or_else(|e| {
        warn!("page {number}: {e}; assuming US Letter");
        PageBox::LETTER
    });

    let annotations = backend
        .page_annotations(page_id)
        .unwrap_or_else(|e| {
            warn!("page {number}: cannot read annotations: {e}");
            Vec::new()
        })
        .iter()
        .map(|raw| convert_annotation(raw, &page_box))
        .collect();

    let content = extract_page_content(backend, page_id, page_box).unwrap_or_else(|e| {
        warn!("page {number}: skipping content: {e}");
        PageContent::default()
    });

    let tokens = extract_words(&content.glyphs, &WordOptions::default());
    debug!(
        "page {number}: {} glyphs, {} words, {} drawings",
        content.glyphs.len(),
        tokens.len(),
        content.drawings.len()
    );

    PageModel {
        number: number as usize,
        width: page_box.width(),
        height: page_box.height(),
        tokens,
        drawings: content.drawings,
        annotations,
    }
}

/// Build the model of every page, in page order.
pub fn extract_all_pages(backend: &dyn PdfBackend) -> Vec<PageModel> {
    backend
        .pages()
        .iter()
        .map(|(&number, &page_id)| extract_page(backend, number, page_id))
        .collect()
}
