//! Package properties (docProps/core.xml and docProps/app.xml)

use docweave_model::DocumentMeta;

use crate::xml::{escape, XML_DECLARATION};

/// Render `docProps/core.xml`
///
/// Only fields present in the metadata are written; timestamps are copied
/// verbatim so the output never depends on the clock.
pub(crate) fn core_xml(meta: &DocumentMeta) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(concat!(
        "<cp:coreProperties",
        " xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\"",
        " xmlns:dc=\"http://purl.org/dc/elements/1.1/\"",
        " xmlns:dcterms=\"http://purl.org/dc/terms/\"",
        " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n"
    ));

    let text_fields = [
        ("dc:title", &meta.title),
        ("dc:subject", &meta.subject),
        ("dc:creator", &meta.creator),
        ("cp:keywords", &meta.keywords),
        ("dc:description", &meta.description),
        ("cp:lastModifiedBy", &meta.last_modified_by),
    ];
    for (tag, value) in text_fields {
        if let Some(value) = value {
            xml.push_str(&format!("<{0}>{1}</{0}>\n", tag, escape(value)));
        }
    }
    if let Some(revision) = meta.revision {
        xml.push_str(&format!("<cp:revision>{}</cp:revision>\n", revision));
    }
    for (tag, value) in [("dcterms:created", &meta.created), ("dcterms:modified", &meta.modified)] {
        if let Some(value) = value {
            xml.push_str(&format!(
                "<{0} xsi:type=\"dcterms:W3CDTF\">{1}</{0}>\n",
                tag,
                escape(&w3cdtf(value))
            ));
        }
    }

    xml.push_str("</cp:coreProperties>");
    xml
}

/// Widen a bare date (`2026-01-31`) to a full W3CDTF timestamp
fn w3cdtf(value: &str) -> String {
    if value.contains('T') {
        value.to_string()
    } else {
        format!("{}T00:00:00Z", value)
    }
}

/// Render `docProps/app.xml`
pub(crate) fn app_xml(application: &str) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(concat!(
        "<Properties",
        " xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\"",
        " xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">\n"
    ));
    xml.push_str(&format!("<Application>{}</Application>\n", escape(application)));
    xml.push_str("<DocSecurity>0</DocSecurity>\n");
    xml.push_str("</Properties>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_xml_fields() {
        let meta = DocumentMeta {
            title: Some("Q&A Report".to_string()),
            creator: Some("Docs Team".to_string()),
            revision: Some(3),
            modified: Some("2026-01-31".to_string()),
            ..Default::default()
        };
        let xml = core_xml(&meta);

        assert!(xml.contains("<dc:title>Q&amp;A Report</dc:title>"));
        assert!(xml.contains("<dc:creator>Docs Team</dc:creator>"));
        assert!(xml.contains("<cp:revision>3</cp:revision>"));
        assert!(xml.contains(
            "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">2026-01-31T00:00:00Z</dcterms:modified>"
        ));
        assert!(!xml.contains("dc:subject"));
        assert!(!xml.contains("dcterms:created"));
    }

    #[test]
    fn test_empty_meta() {
        let xml = core_xml(&DocumentMeta::default());
        assert!(xml.ends_with("\">\n</cp:coreProperties>"));
    }

    #[test]
    fn test_app_xml() {
        let xml = app_xml("docweave");
        assert!(xml.contains("<Application>docweave</Application>"));
    }
}
