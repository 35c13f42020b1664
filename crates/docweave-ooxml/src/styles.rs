//! Style definitions (word/styles.xml)
//!
//! Writes the registry's styles in registration order. Built-in styles the
//! body relies on (`Normal`, `HeadingN`, `TOCN`, `Hyperlink`) are added
//! when the registry does not define them, so every emitted style
//! reference has a definition. [`StyleSheet`] reads a styles part back.

use std::collections::{BTreeMap, BTreeSet};

pub use docweave_model::styles::{heading_style_id, toc_style_id, HYPERLINK, NORMAL};
use docweave_model::{
    Color, Indent, ParagraphProperties, RunProperties, Spacing, StyleDefinition, StyleKind,
    StyleRegistry,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::formatting::{run_properties, ParagraphXml};
use crate::xml::{escape, W_NS, XML_DECLARATION};

/// Built-in styles referenced by the generated body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StyleUsage {
    pub heading_levels: BTreeSet<u8>,
    pub toc_levels: BTreeSet<u8>,
    pub hyperlink: bool,
}

/// Render `word/styles.xml`
pub(crate) fn styles_xml(registry: &StyleRegistry, usage: &StyleUsage) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str(&format!("<w:styles xmlns:w=\"{}\">\n", W_NS));

    let defaults = registry.defaults();
    if !defaults.run.is_empty() || !defaults.paragraph.is_empty() {
        out.push_str("<w:docDefaults>\n");
        if !defaults.run.is_empty() {
            out.push_str("<w:rPrDefault>\n");
            out.push_str(&run_properties(None, &defaults.run));
            out.push_str("</w:rPrDefault>\n");
        }
        if !defaults.paragraph.is_empty() {
            out.push_str("<w:pPrDefault>\n");
            out.push_str(
                &ParagraphXml {
                    properties: Some(&defaults.paragraph),
                    ..Default::default()
                }
                .render(),
            );
            out.push_str("</w:pPrDefault>\n");
        }
        out.push_str("</w:docDefaults>\n");
    }

    if !registry.contains(NORMAL) {
        write_style(
            &mut out,
            &StyleDefinition::paragraph(NORMAL, "Normal").with_quick_format(),
            None,
        );
    }
    for style in registry.iter() {
        write_style(&mut out, style, None);
    }
    for &level in &usage.heading_levels {
        if !registry.contains(&heading_style_id(level)) {
            write_style(&mut out, &builtin_heading(level), Some(9));
        }
    }
    for &level in &usage.toc_levels {
        if !registry.contains(&toc_style_id(level)) {
            write_style(&mut out, &builtin_toc(level), Some(39));
        }
    }
    if usage.hyperlink && !registry.contains(HYPERLINK) {
        write_style(&mut out, &builtin_hyperlink(), Some(99));
    }

    out.push_str("</w:styles>");
    out
}

fn write_style(out: &mut String, style: &StyleDefinition, ui_priority: Option<u32>) {
    let default = style.kind == StyleKind::Paragraph && style.id == NORMAL;
    out.push_str(&format!(
        "<w:style w:type=\"{}\"{} w:styleId=\"{}\">\n",
        style.kind.as_str(),
        if default { " w:default=\"1\"" } else { "" },
        escape(&style.id)
    ));
    out.push_str(&format!("<w:name w:val=\"{}\"/>\n", escape(&style.name)));
    if let Some(parent) = &style.based_on {
        out.push_str(&format!("<w:basedOn w:val=\"{}\"/>\n", escape(parent)));
    }
    if let Some(next) = &style.next {
        out.push_str(&format!("<w:next w:val=\"{}\"/>\n", escape(next)));
    }
    if let Some(priority) = ui_priority {
        out.push_str(&format!("<w:uiPriority w:val=\"{}\"/>\n", priority));
    }
    if style.quick_format {
        out.push_str("<w:qFormat/>\n");
    }
    if style.kind != StyleKind::Character {
        out.push_str(
            &ParagraphXml {
                properties: Some(&style.paragraph),
                ..Default::default()
            }
            .render(),
        );
    }
    out.push_str(&run_properties(None, &style.run));
    out.push_str("</w:style>\n");
}

fn builtin_heading(level: u8) -> StyleDefinition {
    let size = match level {
        1 => 32,
        2 => 28,
        3 => 26,
        4 => 24,
        _ => 22,
    };
    StyleDefinition::paragraph(heading_style_id(level), format!("heading {}", level))
        .with_based_on(NORMAL)
        .with_next(NORMAL)
        .with_quick_format()
        .with_paragraph(ParagraphProperties {
            keep_next: Some(true),
            spacing: Some(Spacing::around(240, 120)),
            outline_level: Some(level - 1),
            ..Default::default()
        })
        .with_run(RunProperties::default().with_bold(true).with_size(size))
}

fn builtin_toc(level: u8) -> StyleDefinition {
    let mut paragraph = ParagraphProperties::default().with_spacing(Spacing::after(100));
    if level > 1 {
        paragraph = paragraph.with_indent(Indent {
            left: Some(220 * u32::from(level - 1)),
            ..Default::default()
        });
    }
    StyleDefinition::paragraph(toc_style_id(level), format!("toc {}", level))
        .with_based_on(NORMAL)
        .with_next(NORMAL)
        .with_paragraph(paragraph)
}

fn builtin_hyperlink() -> StyleDefinition {
    let mut run = RunProperties::default();
    if let Ok(color) = Color::parse("0563C1") {
        run = run.with_color(color);
    }
    run.underline = Some(true);
    StyleDefinition::character(HYPERLINK, HYPERLINK).with_run(run)
}

/// A style read back from a styles part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetStyle {
    pub id: String,
    pub name: String,
    /// `paragraph`, `character`, `table` or `numbering`
    pub style_type: String,
    pub based_on: Option<String>,
    /// Outline level, 0-based
    pub outline_level: Option<u8>,
}

/// Styles parsed from `word/styles.xml`
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: BTreeMap<String, SheetStyle>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut sheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current: Option<(SheetStyle, bool)> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"style" => {
                        let style = SheetStyle {
                            id: get_attr(e, b"w:styleId").unwrap_or_default(),
                            name: String::new(),
                            style_type: get_attr(e, b"w:type")
                                .unwrap_or_else(|| "paragraph".to_string()),
                            based_on: None,
                            outline_level: None,
                        };
                        let is_default = get_attr(e, b"w:default").as_deref() == Some("1");
                        current = Some((style, is_default));
                    }
                    b"name" => {
                        if let (Some((style, _)), Some(val)) =
                            (current.as_mut(), get_attr(e, b"w:val"))
                        {
                            style.name = val;
                        }
                    }
                    b"basedOn" => {
                        if let Some((style, _)) = current.as_mut() {
                            style.based_on = get_attr(e, b"w:val");
                        }
                    }
                    b"outlineLvl" => {
                        if let Some((style, _)) = current.as_mut() {
                            style.outline_level =
                                get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                    if let Some((style, is_default)) = current.take() {
                        if !style.id.is_empty() {
                            if is_default && style.style_type == "paragraph" {
                                sheet.default_paragraph = Some(style.id.clone());
                            }
                            sheet.styles.insert(style.id.clone(), style);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&SheetStyle> {
        self.styles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// All styles, sorted by ID
    pub fn all(&self) -> impl Iterator<Item = &SheetStyle> {
        self.styles.values()
    }

    /// Styles carrying an outline level
    pub fn heading_styles(&self) -> impl Iterator<Item = &SheetStyle> {
        self.styles.values().filter(|s| s.outline_level.is_some())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_model::DocDefaults;

    fn parse(xml: &str) -> StyleSheet {
        StyleSheet::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_builtins_fill_gaps() {
        let usage = StyleUsage {
            heading_levels: [1, 2].into_iter().collect(),
            toc_levels: [1, 2, 3].into_iter().collect(),
            hyperlink: true,
        };
        let sheet = parse(&styles_xml(&StyleRegistry::default(), &usage));

        assert_eq!(sheet.default_paragraph.as_deref(), Some("Normal"));
        for id in ["Normal", "Heading1", "Heading2", "TOC1", "TOC2", "TOC3", "Hyperlink"] {
            assert!(sheet.contains(id), "missing {}", id);
        }
        assert!(!sheet.contains("Heading3"));
        assert_eq!(sheet.get("Heading2").unwrap().outline_level, Some(1));
        assert_eq!(sheet.get("Hyperlink").unwrap().style_type, "character");
    }

    #[test]
    fn test_registered_styles_win() {
        let mut registry = StyleRegistry::new(DocDefaults::default());
        registry
            .define(StyleDefinition::paragraph("Normal", "Normal"))
            .unwrap();
        registry
            .define(
                StyleDefinition::paragraph("Heading1", "Heading 1")
                    .with_based_on("Normal")
                    .with_run(RunProperties::default().with_size(32)),
            )
            .unwrap();
        let usage = StyleUsage {
            heading_levels: [1].into_iter().collect(),
            ..Default::default()
        };
        let xml = styles_xml(&registry, &usage);

        assert_eq!(xml.matches("w:styleId=\"Normal\"").count(), 1);
        assert_eq!(xml.matches("w:styleId=\"Heading1\"").count(), 1);
        assert!(xml.contains("<w:name w:val=\"Heading 1\"/>"));
        assert!(xml.contains("w:default=\"1\" w:styleId=\"Normal\""));
    }

    #[test]
    fn test_doc_defaults() {
        let registry = StyleRegistry::new(DocDefaults {
            run: RunProperties::default().with_font("Arial").with_size(22),
            paragraph: ParagraphProperties::default(),
        });
        let xml = styles_xml(&registry, &StyleUsage::default());
        assert!(xml.contains("<w:rPrDefault>"));
        assert!(xml.contains("w:ascii=\"Arial\""));
        assert!(!xml.contains("<w:pPrDefault>"));
    }

    #[test]
    fn test_parse_escaped_names() {
        let sheet = parse(
            r#"<w:styles xmlns:w="x"><w:style w:type="character" w:styleId="RnD"><w:name w:val="R&amp;D"/></w:style></w:styles>"#,
        );
        assert_eq!(sheet.get("RnD").unwrap().name, "R&D");
        assert_eq!(sheet.heading_styles().count(), 0);
    }
}
