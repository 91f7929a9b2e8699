//! Writing reconstructed text back into a PDF.
//!
//! Two layouts are supported:
//!
//! - [`RenderMode::SideBySide`]: every output page is twice as wide as the
//!   original. The left half shows the original page (drawn through a Form
//!   XObject), the right half shows the recovered lines in black.
//! - [`RenderMode::OverlayWhite`]: the original page is kept and the
//!   recovered lines are drawn on top of it in white, so they show up
//!   inside black redaction bars.
//!
//! Text is drawn with the standard 14 Type1 fonts, so nothing is embedded.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use serde::{Deserialize, Serialize};
use unredact_core::{DocumentReconstruction, PageReconstruction, ReconstructedLine, StandardFont};

use crate::parser::backend::{LopdfBackend, PageBox, PageId, PdfBackend};
use crate::PdfError;

/// Resource name of the original page inside a side-by-side page.
const ORIGINAL_XOBJECT: &str = "UROrig";

/// Byte written for characters the font encoding cannot represent.
const REPLACEMENT_BYTE: u8 = b'?';

// ---------------------------------------------------------------------------
// Render mode
// ---------------------------------------------------------------------------

/// How recovered text is laid out in the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    SideBySide,
    OverlayWhite,
}

impl RenderMode {
    /// Identifier used in output file names, e.g. `side_by_side`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::SideBySide => "side_by_side",
            RenderMode::OverlayWhite => "overlay_white",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "side_by_side" => Ok(RenderMode::SideBySide),
            "overlay_white" => Ok(RenderMode::OverlayWhite),
            other => Err(PdfError::Render(format!("unknown render mode: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Text encoding and content
// ---------------------------------------------------------------------------

/// Encode text for the WinAnsiEncoding fonts this writer creates.
/// Characters the encoding lacks become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    let font = dictionary! { "Type" => "Font", "Encoding" => "WinAnsiEncoding" };
    let Ok(encoding) = font.get_font_encoding(&Document::new()) else {
        return text
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { REPLACEMENT_BYTE })
            .collect();
    };

    let mut buf = [0u8; 4];
    text.chars()
        .flat_map(|c| {
            let bytes = Document::encode_text(&encoding, c.encode_utf8(&mut buf));
            if bytes.is_empty() {
                vec![REPLACEMENT_BYTE]
            } else {
                bytes
            }
        })
        .collect()
}

fn font_resource_name(font: StandardFont) -> String {
    format!("UR{}", font.base_font().replace('-', ""))
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// Text operations drawing every line of a page.
///
/// `offset_x` shifts lines right; `ury` is the top of the target page in
/// PDF user space so that top-down `baseline` values can be flipped.
fn text_operations(
    lines: &[ReconstructedLine],
    offset_x: f64,
    ury: f64,
    gray: f64,
) -> Vec<Operation> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new("g", vec![real(gray)]),
        Operation::new("BT", vec![]),
    ];

    for line in lines {
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font_resource_name(line.font).into_bytes()),
                real(line.font_size),
            ],
        ));
        ops.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                real(line.x0 + offset_x),
                real(ury - line.baseline()),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(&line.text), StringFormat::Literal)],
        ));
    }

    ops.push(Operation::new("ET", vec![]));
    ops.push(Operation::new("Q", vec![]));
    ops
}

fn encode_content(operations: Vec<Operation>) -> Result<Vec<u8>, PdfError> {
    Content { operations }
        .encode()
        .map_err(|e| PdfError::Render(format!("cannot encode content stream: {e}")))
}

// ---------------------------------------------------------------------------
// Document helpers
// ---------------------------------------------------------------------------

struct Writer {
    doc: Document,
    fonts: HashMap<StandardFont, ObjectId>,
}

impl Writer {
    fn new(doc: Document) -> Self {
        Self {
            doc,
            fonts: HashMap::new(),
        }
    }

    /// Object id of a Type1 font dictionary, created on first use.
    fn font_id(&mut self, font: StandardFont) -> ObjectId {
        if let Some(id) = self.fonts.get(&font) {
            return *id;
        }

        let mut dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
        };
        if !font.is_symbolic() {
            dict.set("Encoding", "WinAnsiEncoding");
        }
        let id = self.doc.add_object(dict);
        self.fonts.insert(font, id);
        id
    }

    /// `/Font` dictionary entries for the fonts used by `lines`.
    fn font_entries(&mut self, lines: &[ReconstructedLine]) -> Vec<(String, ObjectId)> {
        let mut used: Vec<StandardFont> = lines.iter().map(|l| l.font).collect();
        used.sort();
        used.dedup();
        used.into_iter()
            .map(|font| (font_resource_name(font), self.font_id(font)))
            .collect()
    }

    fn resolve(&self, obj: &Object) -> Option<Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok().cloned(),
            other => Some(other.clone()),
        }
    }

    /// Look up `key` on a page dictionary, walking up the page tree.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = page_id;
        loop {
            let dict = self.doc.get_object(current).ok()?.as_dict().ok()?;
            if let Ok(obj) = dict.get(key) {
                return self.resolve(obj);
            }
            current = dict.get(b"Parent").ok()?.as_reference().ok()?;
        }
    }

    /// A page's resources as an owned dictionary.
    fn page_resources(&self, page_id: ObjectId) -> Dictionary {
        match self.inherited(page_id, b"Resources") {
            Some(Object::Dictionary(dict)) => dict,
            _ => Dictionary::new(),
        }
    }

    fn root_pages_id(&self) -> Result<ObjectId, PdfError> {
        let root = self
            .doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|e| PdfError::Render(format!("document has no catalog: {e}")))?;
        self.doc
            .get_object(root)
            .and_then(Object::as_dict)
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| PdfError::Render(format!("catalog has no page tree: {e}")))
    }

    /// Add `entries` to the `/Font` sub-dictionary of `resources`.
    fn merge_fonts(&self, resources: &mut Dictionary, entries: Vec<(String, ObjectId)>) {
        let mut fonts = match resources.get(b"Font").ok().and_then(|o| self.resolve(o)) {
            Some(Object::Dictionary(dict)) => dict,
            _ => Dictionary::new(),
        };
        for (name, id) in entries {
            fonts.set(name, id);
        }
        resources.set("Font", fonts);
    }

    fn save(mut self) -> Result<Vec<u8>, PdfError> {
        self.doc.prune_objects();
        self.doc.compress();

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| PdfError::Render(format!("failed to serialise PDF: {e}")))?;
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// Replace each page with a double-width page: original left, text right.
fn side_by_side(
    writer: &mut Writer,
    pages: &[(PageId, PageBox, Option<&PageReconstruction>)],
) -> Result<(), PdfError> {
    let root_id = writer.root_pages_id()?;
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for &(page_id, page_box, reconstruction) in pages {
        let content = writer.doc.get_page_content(page_id).unwrap_or_else(|e| {
            warn!("page {page_id:?}: cannot read content, leaving left half blank: {e}");
            Vec::new()
        });
        let resources = writer.page_resources(page_id);

        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![
                    real(page_box.llx),
                    real(page_box.lly),
                    real(page_box.urx),
                    real(page_box.ury),
                ],
                "Resources" => resources,
            },
            content,
        );
        let form_id = writer.doc.add_object(form);

        let width = page_box.width();
        let height = page_box.height();
        let lines = reconstruction.map(|r| r.lines.as_slice()).unwrap_or_default();

        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    real(-page_box.llx),
                    real(-page_box.lly),
                ],
            ),
            Operation::new("Do", vec![Object::Name(ORIGINAL_XOBJECT.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ];
        operations.extend(text_operations(lines, width, height, 0.0));
        let content_id = writer
            .doc
            .add_object(Stream::new(dictionary! {}, encode_content(operations)?));

        let mut page_resources = dictionary! {
            "XObject" => dictionary! { ORIGINAL_XOBJECT => form_id },
        };
        let entries = writer.font_entries(lines);
        writer.merge_fonts(&mut page_resources, entries);

        let new_page_id = writer.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => root_id,
            "MediaBox" => vec![0.into(), 0.into(), real(width * 2.0), real(height)],
            "Resources" => page_resources,
            "Contents" => content_id,
        });
        kids.push(new_page_id.into());
    }

    let count = kids.len() as i64;
    let root = writer
        .doc
        .get_object_mut(root_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfError::Render(format!("cannot edit page tree: {e}")))?;
    root.set("Kids", kids);
    root.set("Count", count);
    Ok(())
}

/// Draw recovered text in white on top of each original page.
fn overlay_white(
    writer: &mut Writer,
    pages: &[(PageId, PageBox, Option<&PageReconstruction>)],
) -> Result<(), PdfError> {
    for &(page_id, page_box, reconstruction) in pages {
        let lines = match reconstruction {
            Some(r) if !r.lines.is_empty() => r.lines.as_slice(),
            _ => continue,
        };

        // Existing content runs inside q ... Q so its state cannot leak
        // into the overlay.
        let mut tail = vec![Operation::new("Q", vec![])];
        tail.extend(text_operations(lines, page_box.llx, page_box.ury, 1.0));
        let head_id = writer
            .doc
            .add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        // Leading newline keeps the first operator apart from the last
        // token of the original content when streams are concatenated.
        let mut tail_bytes = b"\n".to_vec();
        tail_bytes.extend(encode_content(tail)?);
        let tail_id = writer
            .doc
            .add_object(Stream::new(dictionary! {}, tail_bytes));

        let mut resources = writer.page_resources(page_id);
        let entries = writer.font_entries(lines);
        writer.merge_fonts(&mut resources, entries);

        let page = writer
            .doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfError::Render(format!("cannot edit page {page_id:?}: {e}")))?;

        let mut contents: Vec<Object> = vec![head_id.into()];
        match page.get(b"Contents") {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            Ok(existing) => contents.push(existing.clone()),
            Err(_) => {}
        }
        contents.push(tail_id.into());

        page.set("Contents", contents);
        page.set("Resources", resources);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a reconstruction into a new PDF, leaving the source untouched.
///
/// Pages are matched to their reconstruction by page number; pages with no
/// reconstruction are kept without added text.
pub fn render_document(
    backend: &LopdfBackend,
    reconstruction: &DocumentReconstruction,
    mode: RenderMode,
) -> Result<Vec<u8>, PdfError> {
    let by_number: BTreeMap<usize, &PageReconstruction> = reconstruction
        .pages
        .iter()
        .map(|p| (p.page_number, p))
        .collect();

    let pages: Vec<(PageId, PageBox, Option<&PageReconstruction>)> = backend
        .pages()
        .into_iter()
        .map(|(number, page_id)| {
            let page_box = backend.page_box(page_id).unwrap_or(PageBox::LETTER);
            (page_id, page_box, by_number.get(&(number as usize)).copied())
        })
        .collect();

    debug!("rendering {} pages as {mode}", pages.len());

    let mut writer = Writer::new(backend.raw_doc().clone());
    match mode {
        RenderMode::SideBySide => side_by_side(&mut writer, &pages)?,
        RenderMode::OverlayWhite => overlay_white(&mut writer, &pages)?,
    }
    writer.save()
}
