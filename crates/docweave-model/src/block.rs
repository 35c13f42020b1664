//! Block-level nodes
//!
//! Paragraphs, tables, page breaks and the table-of-contents field. All
//! nodes are immutable once built; builders validate their shape.

use crate::error::{ModelError, Result};
use crate::format::{Alignment, Color, Indent, ParagraphProperties, Spacing, MAX_OUTLINE_LEVEL};
use crate::inline::Run;

/// Deepest heading level (Heading 9)
pub const MAX_HEADING_LEVEL: u8 = MAX_OUTLINE_LEVEL + 1;

/// Body content element
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// Forced pagination point
    PageBreak,
    /// Table-of-contents field
    TableOfContents(TableOfContents),
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Block::Paragraph(paragraph)
    }
}

impl From<Table> for Block {
    fn from(table: Table) -> Self {
        Block::Table(table)
    }
}

impl From<TableOfContents> for Block {
    fn from(toc: TableOfContents) -> Self {
        Block::TableOfContents(toc)
    }
}

/// Reference to a numbering definition level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingRef {
    pub id: String,
    pub level: u8,
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    runs: Vec<Run>,
    style: Option<String>,
    heading: Option<u8>,
    numbering: Option<NumberingRef>,
    properties: ParagraphProperties,
}

impl Paragraph {
    pub fn builder() -> ParagraphBuilder {
        ParagraphBuilder::default()
    }

    /// A paragraph with one plain run
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::text(text)],
            style: None,
            heading: None,
            numbering: None,
            properties: ParagraphProperties::default(),
        }
    }

    /// A paragraph without runs, useful as vertical spacing
    pub fn empty() -> Self {
        Self {
            runs: Vec::new(),
            style: None,
            heading: None,
            numbering: None,
            properties: ParagraphProperties::default(),
        }
    }

    /// A heading with one plain run
    pub fn heading(level: u8, text: impl Into<String>) -> Result<Self> {
        Self::builder().heading(level).text(text).build()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Paragraph style ID
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Explicit heading level (1 = Heading 1)
    pub fn heading_level(&self) -> Option<u8> {
        self.heading
    }

    pub fn numbering(&self) -> Option<&NumberingRef> {
        self.numbering.as_ref()
    }

    /// Direct formatting
    pub fn properties(&self) -> &ParagraphProperties {
        &self.properties
    }

    /// Concatenated text of all runs
    pub fn text_content(&self) -> String {
        self.runs.iter().map(Run::plain_text).collect()
    }
}

/// Builder for [`Paragraph`]
#[derive(Debug, Clone, Default)]
pub struct ParagraphBuilder {
    runs: Vec<Run>,
    style: Option<String>,
    heading: Option<u8>,
    numbering: Option<NumberingRef>,
    properties: ParagraphProperties,
}

impl ParagraphBuilder {
    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn runs(mut self, runs: impl IntoIterator<Item = Run>) -> Self {
        self.runs.extend(runs);
        self
    }

    /// Append a plain text run
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.runs.push(Run::text(text));
        self
    }

    pub fn style(mut self, id: impl Into<String>) -> Self {
        self.style = Some(id.into());
        self
    }

    /// Mark as a heading, 1..=9
    pub fn heading(mut self, level: u8) -> Self {
        self.heading = Some(level);
        self
    }

    pub fn numbering(mut self, id: impl Into<String>, level: u8) -> Self {
        self.numbering = Some(NumberingRef {
            id: id.into(),
            level,
        });
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.properties.alignment = Some(alignment);
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.properties.spacing = Some(spacing);
        self
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.properties.indent = Some(indent);
        self
    }

    pub fn keep_next(mut self) -> Self {
        self.properties.keep_next = Some(true);
        self
    }

    pub fn page_break_before(mut self) -> Self {
        self.properties.page_break_before = Some(true);
        self
    }

    /// Replace all direct formatting at once
    pub fn properties(mut self, properties: ParagraphProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn build(self) -> Result<Paragraph> {
        if let Some(level) = self.heading {
            if !(1..=MAX_HEADING_LEVEL).contains(&level) {
                return Err(ModelError::validation(format!(
                    "heading level {} outside 1..={}",
                    level, MAX_HEADING_LEVEL
                )));
            }
        }
        if self.properties.outline_level.is_some() {
            return Err(ModelError::validation(
                "set the outline level of a paragraph through its heading level",
            ));
        }
        self.properties.validate()?;
        if let Some(style) = &self.style {
            if style.trim().is_empty() {
                return Err(ModelError::validation(
                    "paragraph style id must not be empty",
                ));
            }
        }
        if let Some(numbering) = &self.numbering {
            if numbering.id.trim().is_empty() {
                return Err(ModelError::validation("numbering id must not be empty"));
            }
            if numbering.level > MAX_OUTLINE_LEVEL {
                return Err(ModelError::validation(format!(
                    "numbering level {} exceeds {}",
                    numbering.level, MAX_OUTLINE_LEVEL
                )));
            }
        }

        Ok(Paragraph {
            runs: self.runs,
            style: self.style,
            heading: self.heading,
            numbering: self.numbering,
            properties: self.properties,
        })
    }
}

/// Line style of a cell border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Single,
    Double,
    Dotted,
    Dashed,
    Thick,
    None,
}

/// One edge of a cell border
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Border {
    pub style: BorderStyle,
    /// Width in eighths of a point
    pub size: u32,
    pub color: Color,
}

impl Border {
    pub fn single(size: u32, color: Color) -> Self {
        Self {
            style: BorderStyle::Single,
            size,
            color,
        }
    }
}

/// The four edges of a cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellBorders {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
}

impl CellBorders {
    /// The same border on every edge
    pub fn uniform(border: Border) -> Self {
        Self {
            top: Some(border.clone()),
            bottom: Some(border.clone()),
            left: Some(border.clone()),
            right: Some(border),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// Background fill pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingPattern {
    Clear,
    Solid,
}

/// Cell background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shading {
    pub pattern: ShadingPattern,
    pub fill: Color,
}

impl Shading {
    /// A flat background fill
    pub fn clear(fill: Color) -> Self {
        Self {
            pattern: ShadingPattern::Clear,
            fill,
        }
    }
}

/// Inner cell padding, in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CellMargins {
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

/// A width measure for tables and cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Width {
    /// Twips
    Dxa(u32),
    /// Percentage of the available width, 1..=100
    Percent(u8),
    #[default]
    Auto,
}

impl Width {
    fn validate(self, what: &str) -> Result<()> {
        match self {
            Width::Percent(p) if p == 0 || p > 100 => Err(ModelError::validation(format!(
                "{} width {}% outside 1..=100",
                what, p
            ))),
            _ => Ok(()),
        }
    }
}

/// Vertical alignment of cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Content allowed inside a table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellBlock {
    Paragraph(Paragraph),
    Table(Table),
}

/// A table cell
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    blocks: Vec<CellBlock>,
    width: Width,
    borders: Option<CellBorders>,
    shading: Option<Shading>,
    margins: Option<CellMargins>,
    vertical_align: Option<VerticalAlign>,
}

impl TableCell {
    pub fn builder() -> TableCellBuilder {
        TableCellBuilder::default()
    }

    /// A cell holding one plain paragraph
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![CellBlock::Paragraph(Paragraph::text(text))],
            width: Width::Auto,
            borders: None,
            shading: None,
            margins: None,
            vertical_align: None,
        }
    }

    pub fn blocks(&self) -> &[CellBlock] {
        &self.blocks
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn borders(&self) -> Option<&CellBorders> {
        self.borders.as_ref()
    }

    pub fn shading(&self) -> Option<&Shading> {
        self.shading.as_ref()
    }

    pub fn margins(&self) -> Option<&CellMargins> {
        self.margins.as_ref()
    }

    pub fn vertical_align(&self) -> Option<VerticalAlign> {
        self.vertical_align
    }
}

/// Builder for [`TableCell`]
#[derive(Debug, Clone, Default)]
pub struct TableCellBuilder {
    blocks: Vec<CellBlock>,
    width: Width,
    borders: Option<CellBorders>,
    shading: Option<Shading>,
    margins: Option<CellMargins>,
    vertical_align: Option<VerticalAlign>,
}

impl TableCellBuilder {
    pub fn paragraph(mut self, paragraph: Paragraph) -> Self {
        self.blocks.push(CellBlock::Paragraph(paragraph));
        self
    }

    /// Nest a table inside the cell
    pub fn table(mut self, table: Table) -> Self {
        self.blocks.push(CellBlock::Table(table));
        self
    }

    pub fn width(mut self, width: Width) -> Self {
        self.width = width;
        self
    }

    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn margins(mut self, margins: CellMargins) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn vertical_align(mut self, align: VerticalAlign) -> Self {
        self.vertical_align = Some(align);
        self
    }

    pub fn build(self) -> Result<TableCell> {
        if self.blocks.is_empty() {
            return Err(ModelError::validation(
                "table cell must contain at least one block",
            ));
        }
        self.width.validate("cell")?;
        Ok(TableCell {
            blocks: self.blocks,
            width: self.width,
            borders: self.borders,
            shading: self.shading,
            margins: self.margins,
            vertical_align: self.vertical_align,
        })
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    cells: Vec<TableCell>,
    is_header: bool,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// A row repeated at the top of each page the table spans
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    pub fn is_header(&self) -> bool {
        self.is_header
    }
}

/// A table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<TableRow>,
    column_widths: Vec<u32>,
    width: Width,
    style: Option<String>,
    alignment: Option<Alignment>,
    fixed_layout: bool,
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Column widths in twips
    pub fn column_widths(&self) -> &[u32] {
        &self.column_widths
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Table style ID
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn fixed_layout(&self) -> bool {
        self.fixed_layout
    }
}

/// Builder for [`Table`]
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
    column_widths: Vec<u32>,
    width: Width,
    style: Option<String>,
    alignment: Option<Alignment>,
    fixed_layout: bool,
}

impl TableBuilder {
    /// Column widths in twips; the list length fixes the column count
    pub fn column_widths(mut self, widths: impl IntoIterator<Item = u32>) -> Self {
        self.column_widths = widths.into_iter().collect();
        self
    }

    pub fn width(mut self, width: Width) -> Self {
        self.width = width;
        self
    }

    pub fn style(mut self, id: impl Into<String>) -> Self {
        self.style = Some(id.into());
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Keep column widths fixed instead of fitting them to content
    pub fn fixed_layout(mut self) -> Self {
        self.fixed_layout = true;
        self
    }

    pub fn row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = TableRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> Result<Table> {
        if self.column_widths.is_empty() {
            return Err(ModelError::validation("table must declare at least one column"));
        }
        if self.rows.is_empty() {
            return Err(ModelError::EmptyTable);
        }
        let columns = self.column_widths.len();
        for (index, row) in self.rows.iter().enumerate() {
            if row.cells.len() != columns {
                return Err(ModelError::validation(format!(
                    "table row {} has {} cells, expected {}",
                    index,
                    row.cells.len(),
                    columns
                )));
            }
        }
        self.width.validate("table")?;
        if let Some(style) = &self.style {
            if style.trim().is_empty() {
                return Err(ModelError::validation("table style id must not be empty"));
            }
        }

        Ok(Table {
            rows: self.rows,
            column_widths: self.column_widths,
            width: self.width,
            style: self.style,
            alignment: self.alignment,
            fixed_layout: self.fixed_layout,
        })
    }
}

/// Table-of-contents field, expanded by the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOfContents {
    from: u8,
    to: u8,
    hyperlinks: bool,
    title: Option<String>,
}

impl TableOfContents {
    /// Include heading levels `from..=to`
    pub fn new(from: u8, to: u8) -> Result<Self> {
        if from == 0 || to > MAX_HEADING_LEVEL || from > to {
            return Err(ModelError::validation(format!(
                "invalid table of contents range {}-{}",
                from, to
            )));
        }
        Ok(Self {
            from,
            to,
            hyperlinks: true,
            title: None,
        })
    }

    /// Link each entry to its heading
    pub fn with_hyperlinks(mut self, hyperlinks: bool) -> Self {
        self.hyperlinks = hyperlinks;
        self
    }

    /// Name of the content control holding the field
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn from_level(&self) -> u8 {
        self.from
    }

    pub fn to_level(&self) -> u8 {
        self.to
    }

    pub fn hyperlinks(&self) -> bool {
        self.hyperlinks
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn includes(&self, level: u8) -> bool {
        (self.from..=self.to).contains(&level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> TableBuilder {
        Table::builder()
            .column_widths([4000, 5000])
            .row(TableRow::new(vec![TableCell::text("a"), TableCell::text("b")]))
            .row(TableRow::new(vec![TableCell::text("c"), TableCell::text("d")]))
    }

    #[test]
    fn test_paragraph_default_text() {
        let para = Paragraph::text("Hello");
        assert_eq!(para.text_content(), "Hello");
        assert!(para.heading_level().is_none());
        assert!(para.style().is_none());
    }

    #[test]
    fn test_heading_levels() {
        let h1 = Paragraph::heading(1, "Title").unwrap();
        assert_eq!(h1.heading_level(), Some(1));
        assert!(Paragraph::heading(0, "x").is_err());
        assert!(Paragraph::heading(10, "x").is_err());
    }

    #[test]
    fn test_paragraph_rejects_direct_outline_level() {
        let err = Paragraph::builder()
            .properties(ParagraphProperties::default().with_outline_level(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_paragraph_builder_collects_runs() {
        let para = Paragraph::builder()
            .text("Page ")
            .run(Run::field(crate::inline::FieldKind::PageNumber))
            .alignment(Alignment::Center)
            .build()
            .unwrap();
        assert_eq!(para.runs().len(), 2);
        assert_eq!(para.text_content(), "Page ");
        assert_eq!(para.properties().alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_table_structure() {
        let table = two_by_two().build().unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.column_widths(), &[4000, 5000]);
    }

    #[test]
    fn test_mismatched_row_rejected() {
        let err = two_by_two()
            .row(TableRow::new(vec![TableCell::text("lonely")]))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::Validation("table row 2 has 1 cells, expected 2".to_string())
        );
    }

    #[test]
    fn test_zero_row_table_is_structure_error() {
        let err = Table::builder().column_widths([100]).build().unwrap_err();
        assert_eq!(err, ModelError::EmptyTable);
    }

    #[test]
    fn test_zero_column_table_rejected() {
        let err = Table::builder()
            .row(TableRow::new(vec![]))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_empty_cell_rejected() {
        assert!(TableCell::builder().build().is_err());
    }

    #[test]
    fn test_percent_width_bounds() {
        assert!(two_by_two().width(Width::Percent(100)).build().is_ok());
        assert!(two_by_two().width(Width::Percent(0)).build().is_err());
        assert!(two_by_two().width(Width::Percent(101)).build().is_err());
    }

    #[test]
    fn test_identical_tables_are_equal() {
        assert_eq!(two_by_two().build().unwrap(), two_by_two().build().unwrap());
    }

    #[test]
    fn test_toc_range() {
        let toc = TableOfContents::new(1, 3).unwrap();
        assert!(toc.includes(1));
        assert!(toc.includes(3));
        assert!(!toc.includes(4));
        assert!(toc.hyperlinks());
        assert!(TableOfContents::new(0, 3).is_err());
        assert!(TableOfContents::new(3, 2).is_err());
        assert!(TableOfContents::new(1, 10).is_err());
    }
}
