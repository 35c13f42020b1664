//! `w:rPr` and `w:pPr` encoding
//!
//! Children are written in the order the WordprocessingML schema requires.

use docweave_model::{Alignment, Indent, ParagraphProperties, RunProperties, Spacing};

use crate::xml::escape;

/// Numbering reference already mapped to package ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumPr {
    pub num_id: usize,
    pub level: u8,
}

pub(crate) fn alignment_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

fn toggle(out: &mut String, name: &str, value: Option<bool>) {
    match value {
        Some(true) => out.push_str(&format!("<w:{}/>\n", name)),
        Some(false) => out.push_str(&format!("<w:{} w:val=\"0\"/>\n", name)),
        None => {}
    }
}

/// `w:rPr` for a run or style, empty when nothing is set
pub(crate) fn run_properties(style: Option<&str>, props: &RunProperties) -> String {
    if style.is_none() && props.is_empty() {
        return String::new();
    }

    let mut out = String::from("<w:rPr>\n");
    if let Some(style) = style {
        out.push_str(&format!("<w:rStyle w:val=\"{}\"/>\n", escape(style)));
    }
    if let Some(font) = &props.font {
        let font = escape(font);
        out.push_str(&format!(
            "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:eastAsia=\"{0}\" w:cs=\"{0}\"/>\n",
            font
        ));
    }
    toggle(&mut out, "b", props.bold);
    toggle(&mut out, "bCs", props.bold);
    toggle(&mut out, "i", props.italic);
    toggle(&mut out, "iCs", props.italic);
    toggle(&mut out, "strike", props.strike);
    if let Some(color) = &props.color {
        out.push_str(&format!("<w:color w:val=\"{}\"/>\n", color.hex()));
    }
    if let Some(size) = props.size {
        out.push_str(&format!("<w:sz w:val=\"{}\"/>\n", size));
        out.push_str(&format!("<w:szCs w:val=\"{}\"/>\n", size));
    }
    match props.underline {
        Some(true) => out.push_str("<w:u w:val=\"single\"/>\n"),
        Some(false) => out.push_str("<w:u w:val=\"none\"/>\n"),
        None => {}
    }
    out.push_str("</w:rPr>\n");
    out
}

fn spacing(spacing: &Spacing) -> String {
    let mut attrs = String::new();
    if let Some(before) = spacing.before {
        attrs.push_str(&format!(" w:before=\"{}\"", before));
    }
    if let Some(after) = spacing.after {
        attrs.push_str(&format!(" w:after=\"{}\"", after));
    }
    if let Some(line) = spacing.line {
        attrs.push_str(&format!(" w:line=\"{}\" w:lineRule=\"auto\"", line));
    }
    format!("<w:spacing{}/>\n", attrs)
}

pub(crate) fn indent(indent: &Indent) -> String {
    let mut attrs = String::new();
    if let Some(left) = indent.left {
        attrs.push_str(&format!(" w:left=\"{}\"", left));
    }
    if let Some(right) = indent.right {
        attrs.push_str(&format!(" w:right=\"{}\"", right));
    }
    if let Some(hanging) = indent.hanging {
        attrs.push_str(&format!(" w:hanging=\"{}\"", hanging));
    }
    if let Some(first_line) = indent.first_line {
        attrs.push_str(&format!(" w:firstLine=\"{}\"", first_line));
    }
    format!("<w:ind{}/>\n", attrs)
}

/// Inputs of a `w:pPr` element
#[derive(Debug, Default)]
pub(crate) struct ParagraphXml<'a> {
    pub style: Option<&'a str>,
    pub numbering: Option<NumPr>,
    pub properties: Option<&'a ParagraphProperties>,
    /// Outline level to write, overriding the one in `properties`
    pub outline_level: Option<u8>,
    /// Mark-run formatting (the paragraph mark's `w:rPr`)
    pub mark: Option<&'a RunProperties>,
    /// Pre-rendered `w:sectPr`
    pub section: Option<&'a str>,
}

impl ParagraphXml<'_> {
    /// Render the `w:pPr`, or nothing when every input is empty
    pub fn render(&self) -> String {
        let empty = ParagraphProperties::default();
        let props = self.properties.unwrap_or(&empty);
        let outline_level = self.outline_level.or(props.outline_level);
        let mark = self
            .mark
            .map(|mark| run_properties(None, mark))
            .unwrap_or_default();

        if self.style.is_none()
            && self.numbering.is_none()
            && props.is_empty()
            && outline_level.is_none()
            && mark.is_empty()
            && self.section.is_none()
        {
            return String::new();
        }

        let mut out = String::from("<w:pPr>\n");
        if let Some(style) = self.style {
            out.push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", escape(style)));
        }
        toggle(&mut out, "keepNext", props.keep_next);
        toggle(&mut out, "pageBreakBefore", props.page_break_before);
        if let Some(num) = self.numbering {
            out.push_str("<w:numPr>\n");
            out.push_str(&format!("<w:ilvl w:val=\"{}\"/>\n", num.level));
            out.push_str(&format!("<w:numId w:val=\"{}\"/>\n", num.num_id));
            out.push_str("</w:numPr>\n");
        }
        if let Some(s) = props.spacing.as_ref().filter(|s| !s.is_empty()) {
            out.push_str(&spacing(s));
        }
        if let Some(ind) = props.indent.as_ref().filter(|i| !i.is_empty()) {
            out.push_str(&indent(ind));
        }
        if let Some(alignment) = props.alignment {
            out.push_str(&format!("<w:jc w:val=\"{}\"/>\n", alignment_value(alignment)));
        }
        if let Some(level) = outline_level {
            out.push_str(&format!("<w:outlineLvl w:val=\"{}\"/>\n", level));
        }
        out.push_str(&mark);
        if let Some(section) = self.section {
            out.push_str(section);
        }
        out.push_str("</w:pPr>\n");
        out
    }
}
