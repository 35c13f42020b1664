//! Relationship parts (`_rels/*.rels`)
//!
//! OOXML maps relationship IDs to part targets. IDs are handed out in
//! insertion order (`rId1`, `rId2`, ...), which keeps output stable.

use crate::xml::escape;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Common relationship type URIs
impl Relationships {
    /// Main document part, from the package root
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Core properties, from the package root
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// Extended (application) properties, from the package root
    pub const TYPE_EXTENDED_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Numbering relationship type
    pub const TYPE_NUMBERING: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    /// Settings relationship type
    pub const TYPE_SETTINGS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    /// Header relationship type
    pub const TYPE_HEADER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    /// Footer relationship type
    pub const TYPE_FOOTER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}

/// An ordered set of relationships
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

/// A single relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    /// The relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's directory
    pub target: String,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its generated ID
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.into(),
            target: target.into(),
        });
        id
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');
        for rel in &self.entries {
            xml.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape(&rel.id),
                escape(&rel.rel_type),
                escape(&rel.target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    /// Target of a relationship ID
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|rel| rel.id == id)
            .map(|rel| rel.target.as_str())
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Relationships of one type, in insertion order
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.entries.iter().filter(move |rel| rel.rel_type == rel_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add("styles.xml", Relationships::TYPE_STYLES), "rId1");
        assert_eq!(rels.add("settings.xml", Relationships::TYPE_SETTINGS), "rId2");
        assert_eq!(rels.add("header1.xml", Relationships::TYPE_HEADER), "rId3");
        assert_eq!(rels.get("rId3"), Some("header1.xml"));
        assert_eq!(rels.len(), 3);
    }

    #[test]
    fn test_to_xml() {
        let mut rels = Relationships::new();
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        rels.add("footer1.xml", Relationships::TYPE_FOOTER);
        let xml = rels.to_xml();

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(RELATIONSHIPS_NS));
        let styles = xml.find("Id=\"rId1\"").unwrap();
        let footer = xml.find("Id=\"rId2\"").unwrap();
        assert!(styles < footer);
        assert!(xml.contains("Target=\"footer1.xml\""));
        assert!(xml.ends_with("</Relationships>"));
    }

    #[test]
    fn test_filter_by_type() {
        let mut rels = Relationships::new();
        rels.add("header1.xml", Relationships::TYPE_HEADER);
        rels.add("footer1.xml", Relationships::TYPE_FOOTER);
        rels.add("header2.xml", Relationships::TYPE_HEADER);
        let headers: Vec<_> = rels
            .of_type(Relationships::TYPE_HEADER)
            .map(|r| r.target.as_str())
            .collect();
        assert_eq!(headers, vec!["header1.xml", "header2.xml"]);
    }
}
