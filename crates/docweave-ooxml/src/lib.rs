//! # docweave-ooxml
//!
//! OOXML (Office Open XML) package serializer for docweave documents.
//!
//! This crate provides functionality to:
//! - Encode an assembled document as WordprocessingML parts
//! - Package the parts into a deterministic DOCX archive
//! - Write the archive atomically, leaving no partial file on failure
//!
//! ## Example
//!
//! ```no_run
//! use docweave_model::{Document, NumberingRegistry, Paragraph, Section, StyleRegistry};
//! use docweave_ooxml::{DocxWriter, PackageOptions};
//!
//! let section = Section::builder()
//!     .paragraph(Paragraph::heading(1, "Title")?)
//!     .paragraph(Paragraph::text("Hello"))
//!     .build()?;
//! let document = Document::builder(StyleRegistry::default(), NumberingRegistry::new())
//!     .section(section)
//!     .build()?;
//!
//! DocxWriter::new(PackageOptions::default()).write_to_path(&document, "hello.docx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod content_types;
pub mod error;
mod formatting;
mod numbering;
pub mod options;
mod properties;
pub mod relationships;
pub mod styles;
pub mod writer;
pub mod xml;

pub use archive::OoxmlArchive;
pub use error::{OoxmlError, Result};
pub use options::{Compression, PackageOptions};
pub use relationships::Relationships;
pub use styles::{SheetStyle, StyleSheet};
pub use writer::{DocxWriter, DOCUMENT_PART, NUMBERING_PART, SETTINGS_PART, STYLES_PART};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
