pub mod writer;

pub use writer::{render_document, RenderMode};
