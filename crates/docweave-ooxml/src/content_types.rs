//! `[Content_Types].xml` generation

use std::collections::BTreeMap;

use crate::xml::{escape, XML_DECLARATION};

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub const DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub const SETTINGS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
pub const NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub const HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub const FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Content type declarations for a package
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Part name (leading `/`) to content type
    overrides: BTreeMap<String, &'static str>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the content type of a part, given its archive path
    pub fn add_override(&mut self, path: &str, content_type: &'static str) {
        self.overrides.insert(format!("/{}", path), content_type);
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!("<Types xmlns=\"{}\">\n", CONTENT_TYPES_NS));
        xml.push_str(&format!(
            "  <Default Extension=\"rels\" ContentType=\"{}\"/>\n",
            RELATIONSHIPS
        ));
        xml.push_str("  <Default Extension=\"xml\" ContentType=\"application/xml\"/>\n");
        for (part, content_type) in &self.overrides {
            xml.push_str(&format!(
                "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
                escape(part),
                content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_sorted_by_part() {
        let mut types = ContentTypes::new();
        types.add_override("word/styles.xml", STYLES);
        types.add_override("word/document.xml", DOCUMENT);
        let xml = types.to_xml();

        assert!(xml.contains("Extension=\"rels\""));
        let document = xml.find("PartName=\"/word/document.xml\"").unwrap();
        let styles = xml.find("PartName=\"/word/styles.xml\"").unwrap();
        assert!(document < styles);
    }
}
