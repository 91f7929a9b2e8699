use std::path::Path;

use thiserror::Error;
use unredact_core::{pipeline, DocumentReconstruction, PageModel, ReconstructOptions, RedactionStats};

use parser::backend::{LopdfBackend, PdfBackend};

pub mod parser;
pub mod render;

pub use render::RenderMode;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("PDF rendering error: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A parsed PDF document holding the extracted page models.
///
/// Constructed via [`ParsedDocument::from_bytes`] or [`ParsedDocument::load`].
/// Reconstruction and rendering reuse the parsed state without re-reading
/// the bytes.
pub struct ParsedDocument {
    backend: LopdfBackend,
    pages: Vec<PageModel>,
}

impl ParsedDocument {
    /// Parse PDF bytes and extract every page.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let pages = parser::page::extract_all_pages(&backend);
        log::info!("parsed {} pages", pages.len());

        Ok(ParsedDocument { backend, pages })
    }

    /// Read and parse a PDF file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Page models in page order.
    pub fn pages(&self) -> &[PageModel] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.backend.pages().len()
    }

    /// Detect redactions and rebuild every page's lines.
    pub fn reconstruct(&self, options: &ReconstructOptions) -> DocumentReconstruction {
        pipeline::reconstruct_document(&self.pages, options)
    }

    /// Write a new PDF showing the reconstruction.
    pub fn render(
        &self,
        mode: RenderMode,
        reconstruction: &DocumentReconstruction,
    ) -> Result<Vec<u8>, PdfError> {
        render::render_document(&self.backend, reconstruction, mode)
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions (stateless, re-parse each call)
// ---------------------------------------------------------------------------

/// Parse PDF bytes and reconstruct every page.
pub fn reconstruct(
    bytes: &[u8],
    options: &ReconstructOptions,
) -> Result<DocumentReconstruction, PdfError> {
    Ok(ParsedDocument::from_bytes(bytes)?.reconstruct(options))
}

/// Parse PDF bytes and compute recovery statistics only.
pub fn stats(bytes: &[u8], options: &ReconstructOptions) -> Result<RedactionStats, PdfError> {
    Ok(reconstruct(bytes, options)?.stats)
}

/// Parse PDF bytes, reconstruct, and render in one call.
pub fn render(
    bytes: &[u8],
    mode: RenderMode,
    options: &ReconstructOptions,
) -> Result<Vec<u8>, PdfError> {
    let doc = ParsedDocument::from_bytes(bytes)?;
    let reconstruction = doc.reconstruct(options);
    doc.render(mode, &reconstruction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_fail_to_parse() {
        assert!(matches!(
            ParsedDocument::from_bytes(&[]),
            Err(PdfError::Parse(_))
        ));
        assert!(stats(&[], &ReconstructOptions::default()).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = ParsedDocument::load("/definitely/not/here.pdf");
        assert!(matches!(result, Err(PdfError::Io(_))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PdfError::Encrypted.to_string(), "Document is encrypted");
        assert_eq!(
            PdfError::Render("boom".to_string()).to_string(),
            "PDF rendering error: boom"
        );
    }
}
