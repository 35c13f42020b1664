//! Flat formatting records shared by styles and content nodes
//!
//! Every field is optional so that records can be layered: a child style
//! overrides its parent one field at a time via `merged_over`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// An RGB color written as six hexadecimal digits (e.g. `1F4E79`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse a color, accepting an optional leading `#`
    pub fn parse(value: &str) -> Result<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::validation(format!(
                "invalid color '{}', expected six hex digits",
                value
            )));
        }
        Ok(Self(hex.to_ascii_uppercase()))
    }

    /// The normalized uppercase hex digits
    pub fn hex(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reject characters that XML 1.0 cannot carry, even escaped
///
/// Tab, line feed and carriage return are allowed; other C0 controls and
/// the noncharacters U+FFFE and U+FFFF are not.
pub(crate) fn check_xml_text(what: &str, text: &str) -> Result<()> {
    let forbidden = |c: char| {
        matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
    };
    match text.char_indices().find(|&(_, c)| forbidden(c)) {
        Some((offset, c)) => Err(ModelError::validation(format!(
            "{} contains U+{:04X} at byte {}, which XML cannot represent",
            what, c as u32, offset
        ))),
        None => Ok(()),
    }
}

/// Horizontal paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical paragraph spacing, in twentieths of a point (twips)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// Space above the paragraph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<u32>,
    /// Space below the paragraph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<u32>,
    /// Line pitch (240 = single spacing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Spacing {
    /// Spacing with only `before` set
    pub fn before(twips: u32) -> Self {
        Self {
            before: Some(twips),
            ..Default::default()
        }
    }

    /// Spacing with only `after` set
    pub fn after(twips: u32) -> Self {
        Self {
            after: Some(twips),
            ..Default::default()
        }
    }

    /// Spacing with `before` and `after` set
    pub fn around(before: u32, after: u32) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
            line: None,
        }
    }

    /// Layer `self` over `base`, field by field
    pub fn merged_over(&self, base: &Spacing) -> Spacing {
        Spacing {
            before: self.before.or(base.before),
            after: self.after.or(base.after),
            line: self.line.or(base.line),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.line.is_none()
    }
}

/// Paragraph indentation, in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Indent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hanging: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line: Option<u32>,
}

impl Indent {
    /// Left indent with a hanging first line, the usual list layout
    pub fn hanging(left: u32, hanging: u32) -> Self {
        Self {
            left: Some(left),
            hanging: Some(hanging),
            ..Default::default()
        }
    }

    /// Layer `self` over `base`, field by field
    ///
    /// `hanging` and `first_line` are alternatives: whichever one the
    /// overriding record sets wins over both of the base's.
    pub fn merged_over(&self, base: &Indent) -> Indent {
        let (hanging, first_line) = if self.hanging.is_some() || self.first_line.is_some() {
            (self.hanging, self.first_line)
        } else {
            (base.hanging, base.first_line)
        };
        Indent {
            left: self.left.or(base.left),
            right: self.right.or(base.right),
            hanging,
            first_line,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.hanging.is_none()
            && self.first_line.is_none()
    }

    fn validate(&self) -> Result<()> {
        if self.hanging.is_some() && self.first_line.is_some() {
            return Err(ModelError::validation(
                "indent cannot set both hanging and first_line",
            ));
        }
        Ok(())
    }
}

/// Character-level formatting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProperties {
    /// Font family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Font size in half-points (22 = 11pt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl RunProperties {
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Layer `self` over `base`, field by field
    pub fn merged_over(&self, base: &RunProperties) -> RunProperties {
        RunProperties {
            font: self.font.clone().or_else(|| base.font.clone()),
            size: self.size.or(base.size),
            bold: self.bold.or(base.bold),
            italic: self.italic.or(base.italic),
            underline: self.underline.or(base.underline),
            strike: self.strike.or(base.strike),
            color: self.color.clone().or_else(|| base.color.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == RunProperties::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(font) = &self.font {
            if font.trim().is_empty() {
                return Err(ModelError::validation("font family must not be empty"));
            }
            check_xml_text("font family", font)?;
        }
        if self.size == Some(0) {
            return Err(ModelError::validation("font size must be positive"));
        }
        Ok(())
    }
}

/// Paragraph-level formatting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<Indent>,
    /// Outline level, 0-based (0 = Heading 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_next: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_break_before: Option<bool>,
}

/// Deepest outline level supported by the target format (Heading 9)
pub const MAX_OUTLINE_LEVEL: u8 = 8;

impl ParagraphProperties {
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn with_outline_level(mut self, level: u8) -> Self {
        self.outline_level = Some(level);
        self
    }

    /// Layer `self` over `base`, field by field
    pub fn merged_over(&self, base: &ParagraphProperties) -> ParagraphProperties {
        ParagraphProperties {
            alignment: self.alignment.or(base.alignment),
            spacing: merge_nested(self.spacing, base.spacing, Spacing::merged_over),
            indent: merge_nested(self.indent, base.indent, Indent::merged_over),
            outline_level: self.outline_level.or(base.outline_level),
            keep_next: self.keep_next.or(base.keep_next),
            page_break_before: self.page_break_before.or(base.page_break_before),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ParagraphProperties::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(level) = self.outline_level {
            if level > MAX_OUTLINE_LEVEL {
                return Err(ModelError::validation(format!(
                    "outline level {} exceeds {}",
                    level, MAX_OUTLINE_LEVEL
                )));
            }
        }
        if let Some(indent) = &self.indent {
            indent.validate()?;
        }
        Ok(())
    }
}

fn merge_nested<T: Copy>(child: Option<T>, base: Option<T>, merge: fn(&T, &T) -> T) -> Option<T> {
    match (child, base) {
        (Some(c), Some(b)) => Some(merge(&c, &b)),
        (c, b) => c.or(b),
    }
}
