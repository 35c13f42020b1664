//! docweave-model - Document model definitions
//!
//! This crate provides the in-memory document tree built before
//! serialization: the style and numbering registries, the content node
//! builders, and the assembler that validates the whole tree.
//!
//! ## Example
//!
//! ```
//! use docweave_model::{
//!     DocDefaults, Document, NumberingRegistry, Paragraph, Section, StyleDefinition,
//!     StyleRegistry,
//! };
//!
//! let mut styles = StyleRegistry::new(DocDefaults::default());
//! styles.define(StyleDefinition::paragraph("Normal", "Normal"))?;
//!
//! let section = Section::builder()
//!     .paragraph(Paragraph::heading(1, "Title")?)
//!     .paragraph(Paragraph::text("Hello"))
//!     .build()?;
//!
//! let doc = Document::builder(styles, NumberingRegistry::new())
//!     .section(section)
//!     .build()?;
//! assert_eq!(doc.outline().len(), 1);
//! # Ok::<(), docweave_model::ModelError>(())
//! ```

pub mod block;
pub mod document;
pub mod error;
pub mod format;
pub mod inline;
pub mod numbering;
pub mod outline;
pub mod section;
pub mod styles;

pub use block::{
    Block, Border, BorderStyle, CellBlock, CellBorders, CellMargins, NumberingRef, Paragraph,
    ParagraphBuilder, Shading, ShadingPattern, Table, TableBuilder, TableCell, TableCellBuilder,
    TableOfContents, TableRow, VerticalAlign, Width, MAX_HEADING_LEVEL,
};
pub use document::{Document, DocumentBuilder, DocumentMeta};
pub use error::{ErrorKind, ModelError, Result};
pub use format::{Alignment, Color, Indent, ParagraphProperties, RunProperties, Spacing};
pub use inline::{BreakKind, FieldKind, Run, RunBuilder, RunContent};
pub use numbering::{LevelFormat, NumberingDefinition, NumberingLevel, NumberingRegistry};
pub use outline::{OutlineEntry, OutlineIndex};
pub use section::{
    HeaderFooterBand, Orientation, PageMargins, PageSize, Section, SectionBuilder,
};
pub use styles::{
    heading_style_id, toc_style_id, DocDefaults, ResolvedStyle, StyleDefinition, StyleKind,
    StyleRegistry, HYPERLINK, NORMAL,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
