//! DOCX Writer
//!
//! This module turns an assembled `docweave_model::Document` into a
//! complete WordprocessingML package. Output depends only on the document
//! and the [`PackageOptions`]: the same input always yields the same bytes.
//!
//! # Example
//!
//! ```ignore
//! use docweave_ooxml::{DocxWriter, PackageOptions};
//!
//! let writer = DocxWriter::new(PackageOptions::default());
//! writer.write_to_path(&document, "report.docx")?;
//! ```

use std::path::Path;

use docweave_model::outline::anchor_name;
use docweave_model::{
    Alignment, Block, Border, BorderStyle, BreakKind, CellBlock, CellBorders, Document,
    FieldKind, HeaderFooterBand, ModelError, NumberingRef, Orientation, OutlineEntry,
    OutlineIndex, Paragraph, Run, RunContent, Section, Shading, ShadingPattern, Table,
    TableCell, TableOfContents, VerticalAlign, Width,
};

use crate::archive::OoxmlArchive;
use crate::content_types::{self, ContentTypes};
use crate::error::Result;
use crate::formatting::{run_properties, NumPr, ParagraphXml};
use crate::numbering::{num_id, numbering_xml};
use crate::options::PackageOptions;
use crate::properties::{app_xml, core_xml};
use crate::relationships::Relationships;
use crate::styles::{heading_style_id, styles_xml, toc_style_id, StyleUsage, HYPERLINK};
use crate::xml::{check_well_formed, escape, text_element, R_NS, W_NS, XML_DECLARATION};

/// Path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Path of the style definitions part
pub const STYLES_PART: &str = "word/styles.xml";
/// Path of the numbering definitions part
pub const NUMBERING_PART: &str = "word/numbering.xml";
/// Path of the document settings part
pub const SETTINGS_PART: &str = "word/settings.xml";

/// DOCX Writer for generating packages from assembled documents
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    options: PackageOptions,
}

impl DocxWriter {
    pub fn new(options: PackageOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Build every part of the package in memory
    ///
    /// Style and numbering references are resolved through the document's
    /// registries; the first failure aborts the whole package.
    pub fn package(&self, doc: &Document) -> Result<OoxmlArchive> {
        let outline = doc.outline();
        tracing::debug!(
            sections = doc.sections().len(),
            headings = outline.len(),
            "serializing document"
        );

        let mut relationships = Relationships::new();
        relationships.add("styles.xml", Relationships::TYPE_STYLES);
        relationships.add("settings.xml", Relationships::TYPE_SETTINGS);
        if !doc.numbering().is_empty() {
            relationships.add("numbering.xml", Relationships::TYPE_NUMBERING);
        }

        let mut body = BodyWriter::new(doc, &outline, relationships);
        let document_xml = body.document_xml()?;
        let BodyWriter {
            relationships,
            bands,
            usage,
            ..
        } = body;

        let mut parts = PartSet::default();
        parts.add(DOCUMENT_PART, Some(content_types::DOCUMENT), document_xml)?;
        parts.add(
            STYLES_PART,
            Some(content_types::STYLES),
            styles_xml(doc.styles(), &usage),
        )?;
        parts.add(
            SETTINGS_PART,
            Some(content_types::SETTINGS),
            settings_xml(self.options.update_fields_on_open),
        )?;
        if !doc.numbering().is_empty() {
            parts.add(
                NUMBERING_PART,
                Some(content_types::NUMBERING),
                numbering_xml(doc.numbering()),
            )?;
        }
        for band in bands {
            parts.add(&band.path, Some(band.content_type), band.xml)?;
        }
        parts.add("word/_rels/document.xml.rels", None, relationships.to_xml())?;

        parts.add(
            "docProps/core.xml",
            Some(content_types::CORE_PROPERTIES),
            core_xml(doc.meta()),
        )?;
        parts.add(
            "docProps/app.xml",
            Some(content_types::EXTENDED_PROPERTIES),
            app_xml(&self.options.application),
        )?;

        let mut root = Relationships::new();
        root.add(DOCUMENT_PART, Relationships::TYPE_OFFICE_DOCUMENT);
        root.add("docProps/core.xml", Relationships::TYPE_CORE_PROPERTIES);
        root.add("docProps/app.xml", Relationships::TYPE_EXTENDED_PROPERTIES);
        parts.add("_rels/.rels", None, root.to_xml())?;

        parts.finish()
    }

    /// Generate the package as ZIP bytes
    pub fn generate(&self, doc: &Document) -> Result<Vec<u8>> {
        self.package(doc)?.to_bytes(self.options.compression)
    }

    /// Generate the package and write it atomically to `path`
    ///
    /// Nothing is written when serialization fails.
    pub fn write_to_path<P: AsRef<Path>>(&self, doc: &Document, path: P) -> Result<()> {
        let path = path.as_ref();
        let archive = self.package(doc)?;
        archive.save_atomic(path, self.options.compression)?;
        tracing::info!(path = %path.display(), parts = archive.len(), "wrote package");
        Ok(())
    }
}

/// Parts collected for one package, with their content types
#[derive(Default)]
struct PartSet {
    archive: OoxmlArchive,
    types: ContentTypes,
}

impl PartSet {
    fn add(&mut self, path: &str, content_type: Option<&'static str>, xml: String) -> Result<()> {
        check_well_formed(xml.as_bytes())?;
        tracing::debug!(part = path, bytes = xml.len(), "emitting part");
        if let Some(content_type) = content_type {
            self.types.add_override(path, content_type);
        }
        self.archive.set_string(path, xml);
        Ok(())
    }

    fn finish(mut self) -> Result<OoxmlArchive> {
        let types = self.types.to_xml();
        check_well_formed(types.as_bytes())?;
        self.archive.set_string("[Content_Types].xml", types);
        Ok(self.archive)
    }
}

/// A rendered header or footer part
struct BandPart {
    path: String,
    content_type: &'static str,
    xml: String,
}

/// Complex field run sequence opening a field: begin, instruction, separate
fn field_start(instruction: &str, rpr: &str) -> String {
    format!(
        "<w:r>\n{0}<w:fldChar w:fldCharType=\"begin\"/>\n</w:r>\n\
         <w:r>\n{0}<w:instrText xml:space=\"preserve\">{1}</w:instrText>\n</w:r>\n\
         <w:r>\n{0}<w:fldChar w:fldCharType=\"separate\"/>\n</w:r>\n",
        rpr, instruction
    )
}

fn field_end(rpr: &str) -> String {
    format!("<w:r>\n{}<w:fldChar w:fldCharType=\"end\"/>\n</w:r>\n", rpr)
}

/// Encodes body content, allocating bookmarks and band parts as it goes
struct BodyWriter<'a> {
    doc: &'a Document,
    outline: &'a OutlineIndex,
    relationships: Relationships,
    bands: Vec<BandPart>,
    usage: StyleUsage,
    /// Headings emitted so far, in document order
    headings: usize,
    next_bookmark_id: usize,
    header_count: usize,
    footer_count: usize,
    /// A TOC has been emitted and holds `w:docPartUnique`
    toc_written: bool,
}

impl<'a> BodyWriter<'a> {
    fn new(doc: &'a Document, outline: &'a OutlineIndex, relationships: Relationships) -> Self {
        Self {
            doc,
            outline,
            relationships,
            bands: Vec::new(),
            usage: StyleUsage::default(),
            headings: 0,
            next_bookmark_id: 0,
            header_count: 0,
            footer_count: 0,
            toc_written: false,
        }
    }

    /// Generate the complete document.xml content
    fn document_xml(&mut self) -> Result<String> {
        let mut out = String::new();
        out.push_str(XML_DECLARATION);
        out.push('\n');
        out.push_str(&format!(
            "<w:document xmlns:w=\"{}\" xmlns:r=\"{}\">\n",
            W_NS, R_NS
        ));
        out.push_str("<w:body>\n");

        let sections = self.doc.sections();
        for (index, section) in sections.iter().enumerate() {
            let sect_pr = self.section_properties(section)?;
            for block in section.body() {
                self.block(&mut out, block)?;
            }
            if index + 1 < sections.len() {
                // Non-final sections end with a paragraph carrying their properties
                out.push_str("<w:p>\n");
                out.push_str(
                    &ParagraphXml {
                        section: Some(&sect_pr),
                        ..Default::default()
                    }
                    .render(),
                );
                out.push_str("</w:p>\n");
            } else {
                out.push_str(&sect_pr);
            }
        }

        out.push_str("</w:body>\n");
        out.push_str("</w:document>");
        Ok(out)
    }

    fn section_properties(&mut self, section: &Section) -> Result<String> {
        let mut xml = String::from("<w:sectPr>\n");

        if let Some(header) = section.header() {
            self.header_count += 1;
            let target = format!("header{}.xml", self.header_count);
            let part = self.band_xml("w:hdr", header)?;
            let id = self.relationships.add(&target, Relationships::TYPE_HEADER);
            self.bands.push(BandPart {
                path: format!("word/{}", target),
                content_type: content_types::HEADER,
                xml: part,
            });
            xml.push_str(&format!(
                "<w:headerReference w:type=\"default\" r:id=\"{}\"/>\n",
                id
            ));
        }
        if let Some(footer) = section.footer() {
            self.footer_count += 1;
            let target = format!("footer{}.xml", self.footer_count);
            let part = self.band_xml("w:ftr", footer)?;
            let id = self.relationships.add(&target, Relationships::TYPE_FOOTER);
            self.bands.push(BandPart {
                path: format!("word/{}", target),
                content_type: content_types::FOOTER,
                xml: part,
            });
            xml.push_str(&format!(
                "<w:footerReference w:type=\"default\" r:id=\"{}\"/>\n",
                id
            ));
        }

        let size = section.page_size();
        let orient = match size.orientation {
            Orientation::Landscape => " w:orient=\"landscape\"",
            Orientation::Portrait => "",
        };
        xml.push_str(&format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"{}/>\n",
            size.width, size.height, orient
        ));
        let m = section.margins();
        xml.push_str(&format!(
            "<w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"{}\" w:footer=\"{}\" w:gutter=\"{}\"/>\n",
            m.top, m.right, m.bottom, m.left, m.header, m.footer, m.gutter
        ));
        xml.push_str("</w:sectPr>\n");
        Ok(xml)
    }

    fn band_xml(&mut self, root: &str, band: &HeaderFooterBand) -> Result<String> {
        let mut out = String::new();
        out.push_str(XML_DECLARATION);
        out.push('\n');
        out.push_str(&format!("<{} xmlns:w=\"{}\" xmlns:r=\"{}\">\n", root, W_NS, R_NS));
        for paragraph in band.paragraphs() {
            self.paragraph(&mut out, paragraph, false)?;
        }
        out.push_str(&format!("</{}>", root));
        Ok(out)
    }

    fn block(&mut self, out: &mut String, block: &Block) -> Result<()> {
        match block {
            Block::Paragraph(paragraph) => self.paragraph(out, paragraph, true),
            Block::Table(table) => self.table(out, table),
            Block::PageBreak => {
                out.push_str("<w:p>\n<w:r>\n<w:br w:type=\"page\"/>\n</w:r>\n</w:p>\n");
                Ok(())
            }
            Block::TableOfContents(toc) => self.table_of_contents(out, toc),
        }
    }

    /// Generate XML for a paragraph
    ///
    /// Body headings get the next outline anchor as a bookmark; header and
    /// footer paragraphs are never part of the outline.
    fn paragraph(&mut self, out: &mut String, para: &Paragraph, in_body: bool) -> Result<()> {
        let level = self.doc.heading_level(para);
        let style = match (para.style(), para.heading_level()) {
            (Some(id), _) => Some(id.to_string()),
            (None, Some(heading)) => Some(self.heading_style(heading)),
            (None, None) => None,
        };
        let numbering = para.numbering().map(|n| self.num_pr(n)).transpose()?;

        out.push_str("<w:p>\n");
        out.push_str(
            &ParagraphXml {
                style: style.as_deref(),
                numbering,
                properties: Some(para.properties()),
                outline_level: level.map(|l| l - 1),
                ..Default::default()
            }
            .render(),
        );

        let bookmark = match level {
            Some(_) if in_body => {
                self.headings += 1;
                let id = self.next_bookmark_id;
                self.next_bookmark_id += 1;
                Some((id, anchor_name(self.headings)))
            }
            _ => None,
        };
        if let Some((id, name)) = &bookmark {
            out.push_str(&format!(
                "<w:bookmarkStart w:id=\"{}\" w:name=\"{}\"/>\n",
                id,
                escape(name)
            ));
        }
        for run in para.runs() {
            self.run(out, run)?;
        }
        if let Some((id, _)) = bookmark {
            out.push_str(&format!("<w:bookmarkEnd w:id=\"{}\"/>\n", id));
        }

        out.push_str("</w:p>\n");
        Ok(())
    }

    fn run(&mut self, out: &mut String, run: &Run) -> Result<()> {
        let rpr = run_properties(run.style(), run.properties());

        match run.content() {
            RunContent::Text(text) => {
                out.push_str("<w:r>\n");
                out.push_str(&rpr);
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        out.push_str("<w:br/>\n");
                    }
                    out.push_str(&text_element(line));
                }
                out.push_str("</w:r>\n");
            }
            RunContent::Field(kind) => {
                let instruction = match kind {
                    FieldKind::PageNumber => " PAGE ",
                    FieldKind::TotalPages => " NUMPAGES ",
                };
                out.push_str(&field_start(instruction, &rpr));
                out.push_str(&format!("<w:r>\n{}<w:t>1</w:t>\n</w:r>\n", rpr));
                out.push_str(&field_end(&rpr));
            }
            RunContent::Break(kind) => {
                out.push_str("<w:r>\n");
                out.push_str(&rpr);
                match kind {
                    BreakKind::Line => out.push_str("<w:br/>\n"),
                    BreakKind::Page => out.push_str("<w:br w:type=\"page\"/>\n"),
                }
                out.push_str("</w:r>\n");
            }
        }
        Ok(())
    }

    /// Generate XML for a table
    fn table(&mut self, out: &mut String, table: &Table) -> Result<()> {
        out.push_str("<w:tbl>\n");
        out.push_str("<w:tblPr>\n");
        if let Some(style) = table.style() {
            out.push_str(&format!("<w:tblStyle w:val=\"{}\"/>\n", escape(style)));
        }
        out.push_str(&format!("<w:tblW {}/>\n", width_attrs(table.width())));
        if let Some(alignment) = table.alignment() {
            let jc = match alignment {
                Alignment::Center => "center",
                Alignment::Right => "right",
                Alignment::Left | Alignment::Justify => "left",
            };
            out.push_str(&format!("<w:jc w:val=\"{}\"/>\n", jc));
        }
        if table.fixed_layout() {
            out.push_str("<w:tblLayout w:type=\"fixed\"/>\n");
        }
        out.push_str("</w:tblPr>\n");

        out.push_str("<w:tblGrid>\n");
        for width in table.column_widths() {
            out.push_str(&format!("<w:gridCol w:w=\"{}\"/>\n", width));
        }
        out.push_str("</w:tblGrid>\n");

        for row in table.rows() {
            out.push_str("<w:tr>\n");
            if row.is_header() {
                out.push_str("<w:trPr>\n<w:tblHeader/>\n</w:trPr>\n");
            }
            for (cell, &column_width) in row.cells().iter().zip(table.column_widths()) {
                self.cell(out, cell, column_width)?;
            }
            out.push_str("</w:tr>\n");
        }

        out.push_str("</w:tbl>\n");
        Ok(())
    }

    fn cell(&mut self, out: &mut String, cell: &TableCell, column_width: u32) -> Result<()> {
        out.push_str("<w:tc>\n");
        out.push_str("<w:tcPr>\n");
        let width = match cell.width() {
            Width::Auto => Width::Dxa(column_width),
            other => other,
        };
        out.push_str(&format!("<w:tcW {}/>\n", width_attrs(width)));
        if let Some(borders) = cell.borders().filter(|b| !b.is_empty()) {
            out.push_str(&cell_borders(borders));
        }
        if let Some(shading) = cell.shading() {
            out.push_str(&shading_xml(shading));
        }
        if let Some(m) = cell.margins() {
            out.push_str("<w:tcMar>\n");
            for (edge, value) in [("top", m.top), ("left", m.left), ("bottom", m.bottom), ("right", m.right)] {
                out.push_str(&format!("<w:{} w:w=\"{}\" w:type=\"dxa\"/>\n", edge, value));
            }
            out.push_str("</w:tcMar>\n");
        }
        if let Some(align) = cell.vertical_align() {
            let val = match align {
                VerticalAlign::Top => "top",
                VerticalAlign::Center => "center",
                VerticalAlign::Bottom => "bottom",
            };
            out.push_str(&format!("<w:vAlign w:val=\"{}\"/>\n", val));
        }
        out.push_str("</w:tcPr>\n");

        for block in cell.blocks() {
            match block {
                CellBlock::Paragraph(paragraph) => self.paragraph(out, paragraph, true)?,
                CellBlock::Table(table) => self.table(out, table)?,
            }
        }
        // A cell must end with a paragraph
        if matches!(cell.blocks().last(), Some(CellBlock::Table(_))) {
            out.push_str("<w:p/>\n");
        }

        out.push_str("</w:tc>\n");
        Ok(())
    }

    /// Generate the TOC content control
    ///
    /// The cached field result lists the in-range outline entries so the
    /// document reads correctly before the viewer refreshes the field.
    fn table_of_contents(&mut self, out: &mut String, toc: &TableOfContents) -> Result<()> {
        for level in toc.from_level()..=toc.to_level() {
            self.toc_style(level);
        }
        if toc.hyperlinks() && !self.doc.styles().contains(HYPERLINK) {
            self.usage.hyperlink = true;
        }

        let instruction = format!(
            " TOC \\o \"{}-{}\"{} \\z \\u ",
            toc.from_level(),
            toc.to_level(),
            if toc.hyperlinks() { " \\h" } else { "" }
        );

        out.push_str("<w:sdt>\n<w:sdtPr>\n");
        if let Some(title) = toc.title() {
            out.push_str(&format!("<w:alias w:val=\"{}\"/>\n", escape(title)));
        }
        out.push_str("<w:docPartObj>\n");
        out.push_str("<w:docPartGallery w:val=\"Table of Contents\"/>\n");
        // only one TOC may claim the gallery slot
        if !self.toc_written {
            out.push_str("<w:docPartUnique/>\n");
            self.toc_written = true;
        }
        out.push_str("</w:docPartObj>\n");
        out.push_str("</w:sdtPr>\n<w:sdtContent>\n");

        let entries: Vec<&OutlineEntry> = self
            .outline
            .in_range(toc.from_level(), toc.to_level())
            .collect();
        if entries.is_empty() {
            out.push_str("<w:p>\n");
            out.push_str(&toc_paragraph_properties(toc.from_level()));
            out.push_str(&field_start(&instruction, ""));
            out.push_str(&field_end(""));
            out.push_str("</w:p>\n");
        }
        let last = entries.len().saturating_sub(1);
        for (i, entry) in entries.iter().enumerate() {
            out.push_str("<w:p>\n");
            out.push_str(&toc_paragraph_properties(entry.level));
            if i == 0 {
                out.push_str(&field_start(&instruction, ""));
            }
            if toc.hyperlinks() {
                out.push_str(&format!(
                    "<w:hyperlink w:anchor=\"{}\" w:history=\"1\">\n",
                    escape(&entry.anchor)
                ));
                out.push_str("<w:r>\n");
                out.push_str(&format!(
                    "<w:rPr>\n<w:rStyle w:val=\"{}\"/>\n</w:rPr>\n",
                    HYPERLINK
                ));
                out.push_str(&text_element(&entry.text));
                out.push_str("</w:r>\n");
                out.push_str("</w:hyperlink>\n");
            } else {
                out.push_str("<w:r>\n");
                out.push_str(&text_element(&entry.text));
                out.push_str("</w:r>\n");
            }
            if i == last {
                out.push_str(&field_end(""));
            }
            out.push_str("</w:p>\n");
        }

        out.push_str("</w:sdtContent>\n</w:sdt>\n");
        Ok(())
    }

    /// Style for a heading level, falling back to the built-in definition
    ///
    /// Assembly has already checked the kind of any registered id.
    fn heading_style(&mut self, level: u8) -> String {
        let id = heading_style_id(level);
        if !self.doc.styles().contains(&id) {
            self.usage.heading_levels.insert(level);
        }
        id
    }

    fn toc_style(&mut self, level: u8) {
        if !self.doc.styles().contains(&toc_style_id(level)) {
            self.usage.toc_levels.insert(level);
        }
    }

    fn num_pr(&self, numbering: &NumberingRef) -> Result<NumPr> {
        let registry = self.doc.numbering();
        registry.resolve(&numbering.id, numbering.level)?;
        let index = registry
            .index_of(&numbering.id)
            .ok_or_else(|| ModelError::UnknownNumbering(numbering.id.clone()))?;
        Ok(NumPr {
            num_id: num_id(index),
            level: numbering.level,
        })
    }
}

fn toc_paragraph_properties(level: u8) -> String {
    let style = toc_style_id(level);
    ParagraphXml {
        style: Some(&style),
        ..Default::default()
    }
    .render()
}

/// `w:w`/`w:type` attributes; percentages are written in fiftieths
fn width_attrs(width: Width) -> String {
    match width {
        Width::Dxa(twips) => format!("w:w=\"{}\" w:type=\"dxa\"", twips),
        Width::Percent(pct) => format!("w:w=\"{}\" w:type=\"pct\"", u32::from(pct) * 50),
        Width::Auto => "w:w=\"0\" w:type=\"auto\"".to_string(),
    }
}

fn border_xml(edge: &str, border: &Border) -> String {
    let val = match border.style {
        BorderStyle::Single => "single",
        BorderStyle::Double => "double",
        BorderStyle::Dotted => "dotted",
        BorderStyle::Dashed => "dashed",
        BorderStyle::Thick => "thick",
        BorderStyle::None => return format!("<w:{} w:val=\"nil\"/>\n", edge),
    };
    format!(
        "<w:{} w:val=\"{}\" w:sz=\"{}\" w:space=\"0\" w:color=\"{}\"/>\n",
        edge,
        val,
        border.size,
        border.color.hex()
    )
}

fn cell_borders(borders: &CellBorders) -> String {
    let mut xml = String::from("<w:tcBorders>\n");
    let edges = [
        ("top", &borders.top),
        ("left", &borders.left),
        ("bottom", &borders.bottom),
        ("right", &borders.right),
    ];
    for (edge, border) in edges {
        if let Some(border) = border {
            xml.push_str(&border_xml(edge, border));
        }
    }
    xml.push_str("</w:tcBorders>\n");
    xml
}

fn shading_xml(shading: &Shading) -> String {
    let fill = shading.fill.hex();
    match shading.pattern {
        ShadingPattern::Clear => {
            format!("<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>\n", fill)
        }
        ShadingPattern::Solid => format!(
            "<w:shd w:val=\"solid\" w:color=\"{0}\" w:fill=\"{0}\"/>\n",
            fill
        ),
    }
}

/// Render `word/settings.xml`
fn settings_xml(update_fields: bool) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!("<w:settings xmlns:w=\"{}\">\n", W_NS));
    xml.push_str("<w:defaultTabStop w:val=\"720\"/>\n");
    xml.push_str("<w:characterSpacingControl w:val=\"doNotCompress\"/>\n");
    if update_fields {
        xml.push_str("<w:updateFields w:val=\"true\"/>\n");
    }
    xml.push_str("</w:settings>");
    xml
}
