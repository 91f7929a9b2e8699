use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input path has no file name: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("Could not read PDF: {0}")]
    Pdf(#[from] pdf::PdfError),
}
