//! Outline index: the ordered headings that drive the table of contents

use crate::document::Document;

/// Bookmark name prefix recognized by viewers as a TOC target
pub const ANCHOR_PREFIX: &str = "_Toc";

/// One heading in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Heading level, 1-based
    pub level: u8,
    /// Plain text of the heading
    pub text: String,
    /// Bookmark name of the heading paragraph
    pub anchor: String,
}

/// Ordered headings of a document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutlineIndex {
    entries: Vec<OutlineEntry>,
}

impl OutlineIndex {
    /// Collect headings in document order
    ///
    /// The anchor of the n-th heading depends only on n, so repeated builds
    /// of the same document agree.
    pub fn build(document: &Document) -> Self {
        let mut entries = Vec::new();
        document.for_each_body_paragraph(|paragraph| {
            if let Some(level) = document.heading_level(paragraph) {
                let ordinal = entries.len() + 1;
                entries.push(OutlineEntry {
                    level,
                    text: paragraph.text_content(),
                    anchor: anchor_name(ordinal),
                });
            }
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    /// Entries whose level falls in `from..=to`
    pub fn in_range(&self, from: u8, to: u8) -> impl Iterator<Item = &OutlineEntry> {
        self.entries
            .iter()
            .filter(move |entry| (from..=to).contains(&entry.level))
    }

    pub fn get(&self, index: usize) -> Option<&OutlineEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bookmark name for the n-th heading (1-based)
pub fn anchor_name(ordinal: usize) -> String {
    format!("{ANCHOR_PREFIX}{ordinal:08}")
}
