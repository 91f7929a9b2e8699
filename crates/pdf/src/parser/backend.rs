use std::collections::BTreeMap;

use log::debug;
use lopdf::{self, content::Content};

use crate::PdfError;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Font information extracted from a page's resource dictionary.
#[derive(Debug, Clone, Default)]
pub struct BackendFontInfo {
    /// The font name key as it appears in the resource dictionary (e.g. `b"F1"`).
    pub name: Vec<u8>,
    /// Base font name from the font dictionary, if present.
    pub base_font: Option<String>,
    /// Font subtype (e.g. `Type1`, `TrueType`, `Type0`).
    pub subtype: Option<String>,
    /// Encoding entry from the font dictionary, if present.
    pub encoding: Option<String>,
    /// Character code of the first entry in `widths`.
    pub first_char: u32,
    /// Glyph advances in thousandths of a text-space unit (`/Widths`).
    pub widths: Vec<f64>,
}

impl BackendFontInfo {
    /// Advance width for a single-byte character code, in thousandths of a
    /// text-space unit. `None` when the font has no entry for the code.
    pub fn glyph_width(&self, code: u32) -> Option<f64> {
        let index = code.checked_sub(self.first_char)? as usize;
        self.widths.get(index).copied()
    }

    /// Type0 fonts with Identity encodings use two-byte codes.
    pub fn is_multibyte(&self) -> bool {
        self.subtype.as_deref() == Some("Type0")
            || self
                .encoding
                .as_deref()
                .is_some_and(|e| e.contains("Identity"))
    }
}

/// A page's visible area in PDF user space (y increasing upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl PageBox {
    /// US Letter, used when a page declares no usable box.
    pub const LETTER: PageBox = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Build from a `[llx lly urx ury]` array, normalising swapped corners.
    pub fn from_array(nums: &[f64]) -> Option<Self> {
        if nums.len() < 4 {
            return None;
        }
        Some(PageBox {
            llx: nums[0].min(nums[2]),
            lly: nums[1].min(nums[3]),
            urx: nums[0].max(nums[2]),
            ury: nums[1].max(nums[3]),
        })
    }
}

/// A page annotation as stored in the file: subtype name and `/Rect` in
/// PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnnotation {
    pub subtype: String,
    pub rect: [f64; 4],
}

/// A simplified, lopdf-independent representation of a PDF value.
///
/// This enum decouples higher-level logic from the concrete `lopdf::Object`
/// type so that the page walker can work with pure data.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// What a named `/ColorSpace` resource resolves to, reduced to what the
/// fill tracker can evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpaceResource {
    /// A device-like space with this many components (1 gray, 3 RGB, 4 CMYK).
    Device(usize),
    /// A palette over a device-like base space; `lookup` holds
    /// `components` bytes per entry.
    Indexed { components: usize, lookup: Vec<u8> },
    /// A Separation on the black or all colorant: tint 1 is full ink.
    BlackTint,
    Pattern,
    Unsupported,
}

/// A Form XObject invoked with `Do`.
#[derive(Debug, Clone)]
pub struct FormXObject {
    pub id: PageId,
    /// Owner to query for fonts and other resources inside the form: the
    /// form itself, or the invoking owner when the form has no `/Resources`.
    pub resources: PageId,
    pub matrix: [f64; 6],
    /// Decompressed content stream.
    pub content: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Extract an `f64` from a [`PdfValue`], accepting both `Integer` and `Real`.
pub fn get_number_from_value(val: &PdfValue) -> Option<f64> {
    match val {
        PdfValue::Integer(i) => Some(*i as f64),
        PdfValue::Real(f) => Some(*f as f64),
        _ => None,
    }
}

/// Convert a `lopdf::Object` into a [`PdfValue`].
///
/// References are preserved as `PdfValue::Reference`.  Stream dictionaries
/// are converted but the raw stream bytes are discarded (they must be
/// obtained through [`PdfBackend::page_content`]).
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => {
            let entries = dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect();
            PdfValue::Dict(entries)
        }
        lopdf::Object::Stream(stream) => {
            let entries = stream
                .dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect();
            PdfValue::Dict(entries)
        }
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// Abstraction over a PDF parsing backend (currently backed by `lopdf`).
///
/// This trait exists so that the page walker can be tested against mock
/// implementations without building real PDF files.
pub trait PdfBackend {
    /// Return a mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return font information for every font in the resources of `owner`,
    /// which is a page or a Form XObject.
    fn page_fonts(&self, owner: PageId) -> Result<Vec<BackendFontInfo>, PdfError>;

    /// Return the raw (possibly compressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    /// Decode raw content-stream bytes into a sequence of [`ContentOp`]s.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode raw string bytes found in a text-showing operator, using the
    /// encoding of the named font in the resources of `owner`.
    fn decode_text(&self, owner: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Resolve a named `/ColorSpace` resource. `None` when the name is not
    /// in the resources of `owner`.
    fn color_space(&self, owner: PageId, name: &[u8]) -> Option<ColorSpaceResource>;

    /// Resolve a named `/XObject` resource if it is a Form XObject.
    fn form_xobject(&self, owner: PageId, name: &[u8]) -> Option<FormXObject>;

    /// The page's MediaBox, inherited from the page tree when needed.
    fn page_box(&self, page: PageId) -> Result<PageBox, PdfError>;

    /// Annotations listed in the page's `/Annots` array.
    fn page_annotations(&self, page: PageId) -> Result<Vec<RawAnnotation>, PdfError>;
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Nesting limit for colour spaces built on other colour spaces.
const MAX_COLOR_SPACE_DEPTH: usize = 4;

/// Concrete [`PdfBackend`] implementation backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &lopdf::Document {
        &self.doc
    }

    // -- private helpers ----------------------------------------------------

    fn page_dict(&self, page: PageId) -> Result<&lopdf::Dictionary, PdfError> {
        self.doc
            .get_object(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page object: {}", e)))?
            .as_dict()
            .map_err(|e| PdfError::Parse(format!("page object is not a dictionary: {}", e)))
    }

    /// Follow a single level of indirection.
    fn resolve<'a>(&'a self, obj: &'a lopdf::Object) -> &'a lopdf::Object {
        match obj {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            other => other,
        }
    }

    /// Look up `key` on a page dictionary, walking up the page tree.
    fn find_inherited<'a>(
        &'a self,
        dict: &'a lopdf::Dictionary,
        key: &[u8],
    ) -> Option<&'a lopdf::Object> {
        if let Ok(obj) = dict.get(key) {
            return Some(self.resolve(obj));
        }

        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        self.find_inherited(parent, key)
    }

    /// Convert an array of lopdf objects to `f64` values, skipping
    /// non-numeric entries.
    fn array_to_f64s(&self, objects: &[lopdf::Object]) -> Vec<f64> {
        objects
            .iter()
            .filter_map(|obj| match self.resolve(obj) {
                lopdf::Object::Integer(i) => Some(*i as f64),
                lopdf::Object::Real(f) => Some(*f as f64),
                _ => None,
            })
            .collect()
    }

    /// `/FirstChar` and `/Widths` from a simple font dictionary.
    fn font_widths(&self, dict: &lopdf::Dictionary) -> (u32, Vec<f64>) {
        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| self.resolve(o).as_i64().ok())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);

        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| self.resolve(o).as_array().ok())
            .map(|arr| self.array_to_f64s(arr))
            .unwrap_or_default();

        (first_char, widths)
    }

    /// The `/Resources` of a page (inherited from the page tree) or of a
    /// Form XObject stream.
    fn resources(&self, owner: PageId) -> Option<&lopdf::Dictionary> {
        match self.doc.get_object(owner).ok()? {
            lopdf::Object::Dictionary(dict) => self.find_inherited(dict, b"Resources")?.as_dict().ok(),
            lopdf::Object::Stream(stream) => self
                .resolve(stream.dict.get(b"Resources").ok()?)
                .as_dict()
                .ok(),
            _ => None,
        }
    }

    /// A resource category such as `/Font` or `/XObject`.
    fn resource_category(&self, owner: PageId, category: &[u8]) -> Option<&lopdf::Dictionary> {
        let obj = self.resources(owner)?.get(category).ok()?;
        self.resolve(obj).as_dict().ok()
    }

    /// A named resource, unresolved so references stay visible.
    fn resource(&self, owner: PageId, category: &[u8], name: &[u8]) -> Option<&lopdf::Object> {
        self.resource_category(owner, category)?.get(name).ok()
    }

    fn font_dict(&self, owner: PageId, name: &[u8]) -> Option<&lopdf::Dictionary> {
        self.resolve(self.resource(owner, b"Font", name)?).as_dict().ok()
    }

    /// A copy of a font dictionary in the shape lopdf's `get_font_encoding`
    /// reads. A `/ToUnicode` CMap wins over the declared encoding. Encoding
    /// dictionaries use their `/BaseEncoding` without `/Differences`, and
    /// fonts without an encoding use StandardEncoding.
    fn encoding_dict(&self, font: &lopdf::Dictionary) -> lopdf::Dictionary {
        let mut dict = font.clone();
        dict.set("Type", lopdf::Object::Name(b"Font".to_vec()));

        let encoding = if font.has(b"ToUnicode") {
            b"Identity-H".to_vec()
        } else {
            match font.get(b"Encoding").map(|o| self.resolve(o)) {
                Ok(lopdf::Object::Name(name)) => name.clone(),
                Ok(lopdf::Object::Dictionary(enc)) => enc
                    .get(b"BaseEncoding")
                    .and_then(lopdf::Object::as_name)
                    .map(<[u8]>::to_vec)
                    .unwrap_or_else(|_| b"StandardEncoding".to_vec()),
                _ => b"StandardEncoding".to_vec(),
            }
        };
        dict.set("Encoding", lopdf::Object::Name(encoding));
        dict
    }

    fn describe_color_space(&self, obj: &lopdf::Object, depth: usize) -> ColorSpaceResource {
        if depth > MAX_COLOR_SPACE_DEPTH {
            return ColorSpaceResource::Unsupported;
        }

        let (family, params): (&[u8], &[lopdf::Object]) = match self.resolve(obj) {
            lopdf::Object::Name(name) => (name.as_slice(), &[][..]),
            lopdf::Object::Array(arr) => match arr.split_first() {
                Some((first, rest)) => match self.resolve(first).as_name() {
                    Ok(name) => (name, rest),
                    Err(_) => return ColorSpaceResource::Unsupported,
                },
                None => return ColorSpaceResource::Unsupported,
            },
            _ => return ColorSpaceResource::Unsupported,
        };

        match family {
            b"DeviceGray" | b"G" | b"CalGray" => ColorSpaceResource::Device(1),
            b"DeviceRGB" | b"RGB" | b"CalRGB" => ColorSpaceResource::Device(3),
            b"DeviceCMYK" | b"CMYK" => ColorSpaceResource::Device(4),
            b"Pattern" => ColorSpaceResource::Pattern,
            b"ICCBased" => {
                let Some(dict) = params
                    .first()
                    .and_then(|o| self.resolve(o).as_stream().ok())
                    .map(|stream| &stream.dict)
                else {
                    return ColorSpaceResource::Unsupported;
                };
                match dict.get(b"N").ok().and_then(|o| self.resolve(o).as_i64().ok()) {
                    Some(n @ (1 | 3 | 4)) => ColorSpaceResource::Device(n as usize),
                    _ => match dict.get(b"Alternate") {
                        Ok(alternate) => self.describe_color_space(alternate, depth + 1),
                        Err(_) => ColorSpaceResource::Unsupported,
                    },
                }
            }
            b"Indexed" | b"I" => {
                let [base, _hival, lookup, ..] = params else {
                    return ColorSpaceResource::Unsupported;
                };
                let ColorSpaceResource::Device(components) =
                    self.describe_color_space(base, depth + 1)
                else {
                    return ColorSpaceResource::Unsupported;
                };
                let lookup = match self.resolve(lookup) {
                    lopdf::Object::String(bytes, _) => bytes.clone(),
                    lopdf::Object::Stream(stream) => match stream.get_plain_content() {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            debug!("unreadable Indexed lookup stream: {}", e);
                            return ColorSpaceResource::Unsupported;
                        }
                    },
                    _ => return ColorSpaceResource::Unsupported,
                };
                ColorSpaceResource::Indexed { components, lookup }
            }
            b"Separation" => match params.first().map(|o| self.resolve(o)) {
                Some(lopdf::Object::Name(colorant)) if colorant == b"Black" || colorant == b"All" => {
                    ColorSpaceResource::BlackTint
                }
                _ => ColorSpaceResource::Unsupported,
            },
            _ => ColorSpaceResource::Unsupported,
        }
    }
}

fn name_string(obj: &lopdf::Object) -> Option<String> {
    obj.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

// ---------------------------------------------------------------------------
// PdfBackend implementation for LopdfBackend
// ---------------------------------------------------------------------------

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, owner: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
        self.doc
            .get_object(owner)
            .map_err(|e| PdfError::Parse(format!("cannot get resource owner: {}", e)))?;

        let Some(fonts) = self.resource_category(owner, b"Font") else {
            return Ok(Vec::new());
        };

        let mut result = Vec::with_capacity(fonts.len());
        for (name, obj) in fonts.iter() {
            let Ok(dict) = self.resolve(obj).as_dict() else {
                continue;
            };
            let base_font = dict.get(b"BaseFont").ok().and_then(name_string);
            let subtype = dict.get(b"Subtype").ok().and_then(name_string);
            let encoding = dict
                .get(b"Encoding")
                .ok()
                .and_then(|o| name_string(self.resolve(o)));
            let (first_char, widths) = self.font_widths(dict);

            result.push(BackendFontInfo {
                name: name.clone(),
                base_font,
                subtype,
                encoding,
                first_char,
                widths,
            });
        }

        Ok(result)
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        let content = Content::decode(data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        let ops = content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect();

        Ok(ops)
    }

    fn decode_text(&self, owner: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Some(font) = self.font_dict(owner, font_name) {
            let dict = self.encoding_dict(font);
            let decoded = dict
                .get_font_encoding(&self.doc)
                .and_then(|encoding| lopdf::Document::decode_text(&encoding, bytes));
            match decoded {
                Ok(text) => return text,
                Err(e) => debug!(
                    "font {} has no usable encoding: {}",
                    String::from_utf8_lossy(font_name),
                    e
                ),
            }
        }

        let literal = lopdf::Object::String(bytes.to_vec(), lopdf::StringFormat::Literal);
        lopdf::decode_text_string(&literal)
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
    }

    fn color_space(&self, owner: PageId, name: &[u8]) -> Option<ColorSpaceResource> {
        let obj = self.resource(owner, b"ColorSpace", name)?;
        Some(self.describe_color_space(obj, 0))
    }

    fn form_xobject(&self, owner: PageId, name: &[u8]) -> Option<FormXObject> {
        let id = self.resource(owner, b"XObject", name)?.as_reference().ok()?;
        let stream = self.doc.get_object(id).ok()?.as_stream().ok()?;
        if stream.dict.get(b"Subtype").and_then(lopdf::Object::as_name).ok() != Some(b"Form".as_slice()) {
            return None;
        }

        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| self.resolve(o).as_array().ok())
            .and_then(|arr| <[f64; 6]>::try_from(self.array_to_f64s(arr)).ok())
            .unwrap_or([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

        let content = match stream.get_plain_content() {
            Ok(content) => content,
            Err(e) => {
                debug!("cannot read form {:?} content: {}", id, e);
                return None;
            }
        };

        let resources = if stream.dict.has(b"Resources") { id } else { owner };
        Some(FormXObject {
            id,
            resources,
            matrix,
            content,
        })
    }

    fn page_box(&self, page: PageId) -> Result<PageBox, PdfError> {
        let dict = self.page_dict(page)?;
        let media_box = self
            .find_inherited(dict, b"MediaBox")
            .and_then(|o| o.as_array().ok())
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))?;

        let nums = self.array_to_f64s(media_box);
        PageBox::from_array(&nums).ok_or_else(|| {
            PdfError::Parse(format!(
                "MediaBox has {} numeric elements, expected 4",
                nums.len()
            ))
        })
    }

    fn page_annotations(&self, page: PageId) -> Result<Vec<RawAnnotation>, PdfError> {
        let dict = self.page_dict(page)?;
        let annots = match dict.get(b"Annots") {
            Ok(obj) => match self.resolve(obj).as_array() {
                Ok(arr) => arr,
                Err(_) => return Ok(Vec::new()),
            },
            Err(_) => return Ok(Vec::new()),
        };

        let mut result = Vec::with_capacity(annots.len());
        for annot in annots {
            let Ok(annot) = self.resolve(annot).as_dict() else {
                continue;
            };
            let Some(subtype) = annot.get(b"Subtype").ok().and_then(name_string) else {
                continue;
            };
            let rect = annot
                .get(b"Rect")
                .ok()
                .and_then(|o| self.resolve(o).as_array().ok())
                .map(|arr| self.array_to_f64s(arr));

            if let Some(nums) = rect.filter(|n| n.len() >= 4) {
                result.push(RawAnnotation {
                    subtype,
                    rect: [nums[0], nums[1], nums[2], nums[3]],
                });
            }
        }

        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
