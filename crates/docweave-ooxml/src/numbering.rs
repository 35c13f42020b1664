//! Numbering definitions (word/numbering.xml)
//!
//! Each registry definition becomes one `w:abstractNum` (id = registration
//! index) and one `w:num` instance pointing at it (id = index + 1).

use docweave_model::{LevelFormat, NumberingLevel, NumberingRegistry};

use crate::formatting::{alignment_value, indent};
use crate::xml::{escape, W_NS, XML_DECLARATION};

/// Package `w:numId` for a registry index
pub(crate) fn num_id(index: usize) -> usize {
    index + 1
}

fn format_value(format: LevelFormat) -> &'static str {
    match format {
        LevelFormat::Bullet => "bullet",
        LevelFormat::Decimal => "decimal",
        LevelFormat::LowerLetter => "lowerLetter",
        LevelFormat::UpperLetter => "upperLetter",
        LevelFormat::LowerRoman => "lowerRoman",
        LevelFormat::UpperRoman => "upperRoman",
    }
}

/// Render `word/numbering.xml`
pub(crate) fn numbering_xml(registry: &NumberingRegistry) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!("<w:numbering xmlns:w=\"{}\">\n", W_NS));

    for (index, definition) in registry.iter().enumerate() {
        xml.push_str(&format!("<w:abstractNum w:abstractNumId=\"{}\">\n", index));
        let multi = if definition.levels().len() == 1 {
            "singleLevel"
        } else {
            "multilevel"
        };
        xml.push_str(&format!("<w:multiLevelType w:val=\"{}\"/>\n", multi));
        xml.push_str(&format!("<w:name w:val=\"{}\"/>\n", escape(definition.id())));
        for level in definition.levels() {
            write_level(&mut xml, level);
        }
        xml.push_str("</w:abstractNum>\n");
    }

    // w:num instances must follow every w:abstractNum
    for index in 0..registry.len() {
        xml.push_str(&format!("<w:num w:numId=\"{}\">\n", num_id(index)));
        xml.push_str(&format!("<w:abstractNumId w:val=\"{}\"/>\n", index));
        xml.push_str("</w:num>\n");
    }

    xml.push_str("</w:numbering>");
    xml
}

fn write_level(xml: &mut String, level: &NumberingLevel) {
    xml.push_str(&format!("<w:lvl w:ilvl=\"{}\">\n", level.level));
    xml.push_str(&format!("<w:start w:val=\"{}\"/>\n", level.start));
    xml.push_str(&format!("<w:numFmt w:val=\"{}\"/>\n", format_value(level.format)));
    xml.push_str(&format!("<w:lvlText w:val=\"{}\"/>\n", escape(&level.text)));
    xml.push_str(&format!("<w:lvlJc w:val=\"{}\"/>\n", alignment_value(level.alignment)));
    if !level.indent.is_empty() {
        xml.push_str("<w:pPr>\n");
        xml.push_str(&indent(&level.indent));
        xml.push_str("</w:pPr>\n");
    }
    xml.push_str("</w:lvl>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NumberingRegistry {
        let mut registry = NumberingRegistry::new();
        registry
            .define("bullets", vec![NumberingLevel::bullet(0, "•")])
            .unwrap();
        registry
            .define(
                "steps",
                vec![
                    NumberingLevel::ordinal(0, LevelFormat::Decimal, "%1."),
                    NumberingLevel::ordinal(1, LevelFormat::LowerLetter, "%2)").with_start(3),
                ],
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_abstract_nums_then_instances() {
        let xml = numbering_xml(&registry());

        assert!(xml.contains("<w:abstractNum w:abstractNumId=\"0\">"));
        assert!(xml.contains("<w:abstractNum w:abstractNumId=\"1\">"));
        let last_abstract = xml.rfind("<w:abstractNum ").unwrap();
        let first_num = xml.find("<w:num ").unwrap();
        assert!(last_abstract < first_num);
        assert!(xml.contains("<w:num w:numId=\"2\">\n<w:abstractNumId w:val=\"1\"/>"));
    }

    #[test]
    fn test_level_encoding() {
        let xml = numbering_xml(&registry());
        assert!(xml.contains("<w:numFmt w:val=\"bullet\"/>\n<w:lvlText w:val=\"•\"/>"));
        assert!(xml.contains("<w:ind w:left=\"720\" w:hanging=\"360\"/>"));
        assert!(xml.contains("<w:start w:val=\"3\"/>\n<w:numFmt w:val=\"lowerLetter\"/>"));
        assert!(xml.contains("<w:multiLevelType w:val=\"singleLevel\"/>"));
        assert!(xml.contains("<w:multiLevelType w:val=\"multilevel\"/>"));
    }

    #[test]
    fn test_well_formed() {
        crate::xml::check_well_formed(numbering_xml(&registry()).as_bytes()).unwrap();
    }
}
