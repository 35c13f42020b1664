//! Document root, metadata and tree assembly
//!
//! `Document::assemble` is the only way to obtain a [`Document`]. It runs a
//! full-tree validation pass so that every style and numbering reference
//! is known to resolve before anything is serialized.

use serde::{Deserialize, Serialize};

use chrono::{DateTime, NaiveDate};

use crate::block::{Block, CellBlock, Paragraph, Table, TableOfContents};
use crate::error::{ModelError, Result};
use crate::format::check_xml_text;
use crate::numbering::NumberingRegistry;
use crate::outline::OutlineIndex;
use crate::section::Section;
use crate::styles::{heading_style_id, toc_style_id, StyleKind, StyleRegistry, HYPERLINK};

/// Package-level properties
///
/// Timestamps are plain strings so that output never depends on the
/// clock. Each must be a date (`2026-01-31`) or an RFC 3339 date-time
/// (`2026-01-31T09:00:00Z`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<u32>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl DocumentMeta {
    /// Create metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        let texts = [
            ("title", &self.title),
            ("subject", &self.subject),
            ("creator", &self.creator),
            ("keywords", &self.keywords),
            ("description", &self.description),
            ("last_modified_by", &self.last_modified_by),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                check_xml_text(&format!("metadata {field}"), value)?;
            }
        }
        for (field, value) in [("created", &self.created), ("modified", &self.modified)] {
            if let Some(value) = value {
                check_timestamp(field, value)?;
            }
        }
        Ok(())
    }
}

fn check_timestamp(field: &str, value: &str) -> Result<()> {
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || (value.contains('T') && DateTime::parse_from_rfc3339(value).is_ok());
    if !parsed {
        return Err(ModelError::validation(format!(
            "metadata {field} '{value}' is not a date (YYYY-MM-DD) or RFC 3339 date-time"
        )));
    }
    Ok(())
}

/// A complete, validated document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    meta: DocumentMeta,
    styles: StyleRegistry,
    numbering: NumberingRegistry,
    sections: Vec<Section>,
}

impl Document {
    /// Validate the tree against the registries and freeze it
    pub fn assemble(
        meta: DocumentMeta,
        styles: StyleRegistry,
        numbering: NumberingRegistry,
        sections: Vec<Section>,
    ) -> Result<Self> {
        if sections.is_empty() {
            tracing::debug!("rejecting document without sections");
            return Err(ModelError::EmptyDocument);
        }
        meta.validate()?;

        let checker = TreeChecker {
            styles: &styles,
            numbering: &numbering,
        };
        for (index, section) in sections.iter().enumerate() {
            if section.body().is_empty() {
                return Err(ModelError::EmptySection { index });
            }
            checker.check_section(index, section).map_err(|err| {
                tracing::debug!(error = %err, "document failed validation");
                err
            })?;
        }

        Ok(Self {
            meta,
            styles,
            numbering,
            sections,
        })
    }

    /// Start a document from populated registries
    pub fn builder(styles: StyleRegistry, numbering: NumberingRegistry) -> DocumentBuilder {
        DocumentBuilder {
            meta: DocumentMeta::default(),
            styles,
            numbering,
            sections: Vec::new(),
        }
    }

    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn numbering(&self) -> &NumberingRegistry {
        &self.numbering
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Effective heading level of a paragraph
    ///
    /// An explicit heading level wins; otherwise a paragraph style that
    /// carries an outline level makes the paragraph a heading.
    pub fn heading_level(&self, paragraph: &Paragraph) -> Option<u8> {
        paragraph.heading_level().or_else(|| {
            paragraph
                .style()
                .and_then(|id| self.styles.resolve(id).ok())
                .and_then(|style| style.outline_level())
                .map(|level| level + 1)
        })
    }

    /// Ordered list of headings in the body
    pub fn outline(&self) -> OutlineIndex {
        OutlineIndex::build(self)
    }

    /// Visit every body paragraph in document order, descending into
    /// table cells. Headers and footers are not visited.
    pub fn for_each_body_paragraph<'a>(&'a self, mut visit: impl FnMut(&'a Paragraph)) {
        fn walk_table<'a>(table: &'a Table, visit: &mut dyn FnMut(&'a Paragraph)) {
            for row in table.rows() {
                for cell in row.cells() {
                    for block in cell.blocks() {
                        match block {
                            CellBlock::Paragraph(p) => visit(p),
                            CellBlock::Table(t) => walk_table(t, visit),
                        }
                    }
                }
            }
        }

        for section in &self.sections {
            for block in section.body() {
                match block {
                    Block::Paragraph(p) => visit(p),
                    Block::Table(t) => walk_table(t, &mut visit),
                    Block::PageBreak | Block::TableOfContents(_) => {}
                }
            }
        }
    }
}

/// Convenience builder over [`Document::assemble`]
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    meta: DocumentMeta,
    styles: StyleRegistry,
    numbering: NumberingRegistry,
    sections: Vec<Section>,
}

impl DocumentBuilder {
    pub fn meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn build(self) -> Result<Document> {
        Document::assemble(self.meta, self.styles, self.numbering, self.sections)
    }
}

/// Walks the tree checking references and text against the registries
struct TreeChecker<'a> {
    styles: &'a StyleRegistry,
    numbering: &'a NumberingRegistry,
}

impl TreeChecker<'_> {
    fn check_section(&self, index: usize, section: &Section) -> Result<()> {
        if let Some(header) = section.header() {
            for (i, paragraph) in header.paragraphs().iter().enumerate() {
                self.check_paragraph(&format!("section {index}, header paragraph {i}"), paragraph)?;
            }
        }
        if let Some(footer) = section.footer() {
            for (i, paragraph) in footer.paragraphs().iter().enumerate() {
                self.check_paragraph(&format!("section {index}, footer paragraph {i}"), paragraph)?;
            }
        }
        for (i, block) in section.body().iter().enumerate() {
            let location = format!("section {index}, block {i}");
            match block {
                Block::Paragraph(p) => self.check_paragraph(&location, p)?,
                Block::Table(t) => self.check_table(&location, t)?,
                Block::TableOfContents(toc) => self.check_toc(&location, toc)?,
                Block::PageBreak => {}
            }
        }
        Ok(())
    }

    fn check_table(&self, location: &str, table: &Table) -> Result<()> {
        if let Some(style) = table.style() {
            self.check_style(location, style, StyleKind::Table)?;
        }
        for (r, row) in table.rows().iter().enumerate() {
            for (c, cell) in row.cells().iter().enumerate() {
                for (b, block) in cell.blocks().iter().enumerate() {
                    let inner = format!("{location}, row {r}, cell {c}, block {b}");
                    match block {
                        CellBlock::Paragraph(p) => self.check_paragraph(&inner, p)?,
                        CellBlock::Table(t) => self.check_table(&inner, t)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn check_paragraph(&self, location: &str, paragraph: &Paragraph) -> Result<()> {
        match (paragraph.style(), paragraph.heading_level()) {
            (Some(style), _) => self.check_style(location, style, StyleKind::Paragraph)?,
            (None, Some(level)) => {
                self.check_builtin(location, &heading_style_id(level), StyleKind::Paragraph)?
            }
            (None, None) => {}
        }
        if let Some(numbering) = paragraph.numbering() {
            self.numbering
                .resolve(&numbering.id, numbering.level)
                .map_err(|source| ModelError::NumberingReference {
                    location: location.to_string(),
                    source: Box::new(source),
                })?;
        }
        for (i, run) in paragraph.runs().iter().enumerate() {
            let location = format!("{location}, run {i}");
            if let Some(style) = run.style() {
                self.check_style(&location, style, StyleKind::Character)?;
            }
            check_xml_text(&location, run.plain_text())?;
        }
        Ok(())
    }

    fn check_toc(&self, location: &str, toc: &TableOfContents) -> Result<()> {
        for level in toc.from_level()..=toc.to_level() {
            self.check_builtin(location, &toc_style_id(level), StyleKind::Paragraph)?;
        }
        if toc.hyperlinks() {
            self.check_builtin(location, HYPERLINK, StyleKind::Character)?;
        }
        if let Some(title) = toc.title() {
            check_xml_text(&format!("{location}, title"), title)?;
        }
        Ok(())
    }

    /// A built-in id is synthesized when absent, so only its kind matters
    fn check_builtin(&self, location: &str, id: &str, expected: StyleKind) -> Result<()> {
        if self.styles.contains(id) {
            self.check_style(location, id, expected)?;
        }
        Ok(())
    }

    fn check_style(&self, location: &str, id: &str, expected: StyleKind) -> Result<()> {
        let style = self
            .styles
            .resolve(id)
            .map_err(|_| ModelError::StyleReference {
                location: location.to_string(),
                id: id.to_string(),
            })?;
        if style.kind != expected {
            return Err(ModelError::StyleKindMismatch {
                location: location.to_string(),
                id: id.to_string(),
                expected: expected.as_str(),
                found: style.kind.as_str(),
            });
        }
        Ok(())
    }
}
