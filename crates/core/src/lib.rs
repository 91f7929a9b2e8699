//! Core library for unredact
//!
//! This crate implements the **Functional Core** of the unredact application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The unredact project uses a three-crate architecture:
//!
//! - **`unredact_core`** (this crate): Pure geometric reconstruction with zero I/O
//! - **`pdf`**: The `lopdf`-backed page model provider and page writer
//! - **`unredact`**: CLI orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same page model in, same lines and statistics out
//! - **No side effects**: No I/O, no global counters
//! - **Degrade, don't fail**: Empty or malformed pages produce empty results
//!
//! # Pipeline
//!
//! ```text
//! PageModel ──> detect::detect_redaction_boxes ──┐
//!     │                                          ├──> classify ──> stats
//!     └──> lines::cluster_lines ──> reconstruct ─┘
//! ```
//!
//! # Module Organization
//!
//! - [`geometry`]: Rectangle intersection and overlap ratio
//! - [`detect`]: Redaction rectangle detection from drawings and annotations
//! - [`lines`]: Clustering tokens into visual lines
//! - [`reconstruct`]: Rebuilding a line's text, font size and font
//! - [`fonts`]: Mapping arbitrary font names onto the standard 14 fonts
//! - [`classify`]: Deciding whether a token sits under a redaction box
//! - [`stats`]: Per-page and document-level recovery statistics
//! - [`pipeline`]: Orchestration across the pages of a document
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use unredact_core::{pipeline, PageModel, ReconstructOptions, Token};
//!
//! let page = PageModel {
//!     number: 1,
//!     width: 612.0,
//!     height: 792.0,
//!     tokens: vec![Token::new("secret", 110.0, 102.0, 190.0, 118.0)],
//!     drawings: vec![],
//!     annotations: vec![],
//! };
//!
//! let doc = pipeline::reconstruct_document(&[page], &ReconstructOptions::default());
//! assert_eq!(doc.pages[0].lines[0].text, "secret");
//! ```

pub mod classify;
pub mod detect;
pub mod fonts;
pub mod geometry;
pub mod lines;
pub mod pipeline;
pub mod reconstruct;
pub mod stats;
pub mod types;

pub use fonts::StandardFont;
pub use pipeline::{DocumentReconstruction, PageReconstruction, ReconstructOptions};
pub use stats::{PageStats, RedactionStats};
pub use types::*;
