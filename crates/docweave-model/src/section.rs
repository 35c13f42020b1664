//! Sections: page geometry, header/footer bands and a body

use serde::{Deserialize, Serialize};

use crate::block::{Block, Paragraph, Table, TableOfContents};
use crate::error::{ModelError, Result};

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page dimensions in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub orientation: Orientation,
}

impl PageSize {
    /// ISO A4, 210 x 297 mm
    pub const A4: PageSize = PageSize {
        width: 11906,
        height: 16838,
        orientation: Orientation::Portrait,
    };

    /// US Letter, 8.5 x 11 in
    pub const LETTER: PageSize = PageSize {
        width: 12240,
        height: 15840,
        orientation: Orientation::Portrait,
    };

    /// Same paper turned sideways
    pub fn landscape(self) -> Self {
        Self {
            width: self.height.max(self.width),
            height: self.height.min(self.width),
            orientation: Orientation::Landscape,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page margins in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
    /// Distance from the page edge to the header
    pub header: u32,
    /// Distance from the page edge to the footer
    pub footer: u32,
    pub gutter: u32,
}

impl PageMargins {
    /// Same margin on all four sides, default header/footer distances
    pub fn uniform(twips: u32) -> Self {
        Self {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
            ..Default::default()
        }
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1440,
            bottom: 1440,
            left: 1440,
            header: 708,
            footer: 708,
            gutter: 0,
        }
    }
}

/// Paragraphs repeated on every page of a section, as header or footer
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFooterBand {
    paragraphs: Vec<Paragraph>,
}

impl HeaderFooterBand {
    pub fn new(paragraphs: Vec<Paragraph>) -> Result<Self> {
        if paragraphs.is_empty() {
            return Err(ModelError::validation(
                "header/footer must contain at least one paragraph",
            ));
        }
        Ok(Self { paragraphs })
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }
}

/// A run of pages sharing geometry, header and footer
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    page_size: PageSize,
    margins: PageMargins,
    header: Option<HeaderFooterBand>,
    footer: Option<HeaderFooterBand>,
    body: Vec<Block>,
}

impl Section {
    pub fn builder() -> SectionBuilder {
        SectionBuilder::default()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn margins(&self) -> PageMargins {
        self.margins
    }

    pub fn header(&self) -> Option<&HeaderFooterBand> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&HeaderFooterBand> {
        self.footer.as_ref()
    }

    pub fn body(&self) -> &[Block] {
        &self.body
    }
}

/// Builder for [`Section`]
#[derive(Debug, Clone, Default)]
pub struct SectionBuilder {
    page_size: PageSize,
    margins: PageMargins,
    header: Option<HeaderFooterBand>,
    footer: Option<HeaderFooterBand>,
    body: Vec<Block>,
}

impl SectionBuilder {
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    pub fn margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    pub fn header(mut self, band: HeaderFooterBand) -> Self {
        self.header = Some(band);
        self
    }

    pub fn footer(mut self, band: HeaderFooterBand) -> Self {
        self.footer = Some(band);
        self
    }

    pub fn block(mut self, block: impl Into<Block>) -> Self {
        self.body.push(block.into());
        self
    }

    pub fn blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.body.extend(blocks);
        self
    }

    pub fn paragraph(self, paragraph: Paragraph) -> Self {
        self.block(paragraph)
    }

    pub fn table(self, table: Table) -> Self {
        self.block(table)
    }

    pub fn page_break(mut self) -> Self {
        self.body.push(Block::PageBreak);
        self
    }

    pub fn table_of_contents(self, toc: TableOfContents) -> Self {
        self.block(toc)
    }

    /// Check page geometry and produce the section
    ///
    /// An empty body is accepted here and rejected when the document is
    /// assembled, where the section's position is known.
    pub fn build(self) -> Result<Section> {
        let size = self.page_size;
        let margins = self.margins;
        if size.width == 0 || size.height == 0 {
            return Err(ModelError::validation("page size must be positive"));
        }
        if margins.left + margins.right + margins.gutter >= size.width {
            return Err(ModelError::validation(
                "horizontal margins leave no room for content",
            ));
        }
        if margins.top + margins.bottom >= size.height {
            return Err(ModelError::validation(
                "vertical margins leave no room for content",
            ));
        }

        Ok(Section {
            page_size: size,
            margins,
            header: self.header,
            footer: self.footer,
            body: self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_section_is_a4() {
        let section = Section::builder()
            .paragraph(Paragraph::text("x"))
            .build()
            .unwrap();
        assert_eq!(section.page_size(), PageSize::A4);
        assert_eq!(section.margins().header, 708);
        assert_eq!(section.body().len(), 1);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let size = PageSize::A4.landscape();
        assert_eq!(size.width, 16838);
        assert_eq!(size.height, 11906);
        assert_eq!(size.orientation, Orientation::Landscape);
        assert_eq!(size.landscape(), size);
    }

    #[test]
    fn test_band_needs_paragraphs() {
        assert!(HeaderFooterBand::new(vec![]).is_err());
        assert!(HeaderFooterBand::new(vec![Paragraph::text("h")]).is_ok());
    }

    #[test]
    fn test_margins_must_leave_room() {
        let err = Section::builder()
            .margins(PageMargins::uniform(6000))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_page_setup_from_toml() {
        let margins: PageMargins = toml::from_str("top = 1440\nleft = 1080\nright = 1080").unwrap();
        assert_eq!(margins.left, 1080);
        assert_eq!(margins.bottom, 1440);
        assert_eq!(margins.footer, 708);

        let size: PageSize = toml::from_str("width = 12240\nheight = 15840").unwrap();
        assert_eq!(size, PageSize::LETTER);
    }
}
