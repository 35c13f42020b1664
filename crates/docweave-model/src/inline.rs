//! Runs: the atomic styled spans inside a paragraph

use crate::error::{ModelError, Result};
use crate::format::{Color, RunProperties};

/// A field whose value the viewer fills in when it lays out the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Number of the current page
    PageNumber,
    /// Total number of pages
    TotalPages,
}

/// Break type variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Line break within the paragraph
    Line,
    /// Page break
    Page,
}

/// What a run carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    Field(FieldKind),
    Break(BreakKind),
}

/// An immutable styled span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    content: RunContent,
    style: Option<String>,
    properties: RunProperties,
}

impl Run {
    /// Plain unformatted text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: RunContent::Text(text.into()),
            style: None,
            properties: RunProperties::default(),
        }
    }

    /// A bare field marker
    pub fn field(kind: FieldKind) -> Self {
        Self {
            content: RunContent::Field(kind),
            style: None,
            properties: RunProperties::default(),
        }
    }

    /// A bare page break
    pub fn page_break() -> Self {
        Self {
            content: RunContent::Break(BreakKind::Page),
            style: None,
            properties: RunProperties::default(),
        }
    }

    pub fn builder() -> RunBuilder {
        RunBuilder::default()
    }

    pub fn content(&self) -> &RunContent {
        &self.content
    }

    /// Character style ID
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Explicit formatting overrides
    pub fn properties(&self) -> &RunProperties {
        &self.properties
    }

    /// Text content, empty for fields and breaks
    pub fn plain_text(&self) -> &str {
        match &self.content {
            RunContent::Text(text) => text,
            _ => "",
        }
    }
}

/// Builder for [`Run`]
#[derive(Debug, Clone, Default)]
pub struct RunBuilder {
    content: Option<RunContent>,
    style: Option<String>,
    properties: RunProperties,
    color: Option<String>,
}

impl RunBuilder {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Some(RunContent::Text(text.into()));
        self
    }

    pub fn field(mut self, kind: FieldKind) -> Self {
        self.content = Some(RunContent::Field(kind));
        self
    }

    pub fn line_break(mut self) -> Self {
        self.content = Some(RunContent::Break(BreakKind::Line));
        self
    }

    pub fn page_break(mut self) -> Self {
        self.content = Some(RunContent::Break(BreakKind::Page));
        self
    }

    pub fn style(mut self, id: impl Into<String>) -> Self {
        self.style = Some(id.into());
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.properties.font = Some(font.into());
        self
    }

    /// Font size in half-points
    pub fn size(mut self, half_points: u32) -> Self {
        self.properties.size = Some(half_points);
        self
    }

    pub fn bold(mut self) -> Self {
        self.properties.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.properties.italic = Some(true);
        self
    }

    pub fn underline(mut self) -> Self {
        self.properties.underline = Some(true);
        self
    }

    pub fn strike(mut self) -> Self {
        self.properties.strike = Some(true);
        self
    }

    /// Text color as six hex digits, checked by `build`
    pub fn color(mut self, hex: impl Into<String>) -> Self {
        self.color = Some(hex.into());
        self
    }

    /// Replace all formatting overrides at once
    pub fn properties(mut self, properties: RunProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn build(self) -> Result<Run> {
        let content = self
            .content
            .ok_or_else(|| ModelError::validation("run has no content"))?;
        if let Some(style) = &self.style {
            if style.trim().is_empty() {
                return Err(ModelError::validation("run style id must not be empty"));
            }
        }

        let mut properties = self.properties;
        if let Some(hex) = self.color {
            properties.color = Some(Color::parse(&hex)?);
        }
        properties.validate()?;

        Ok(Run {
            content,
            style: self.style,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_run() {
        let run = Run::text("Hello");
        assert_eq!(run.plain_text(), "Hello");
        assert!(run.properties().is_empty());
        assert!(run.style().is_none());
    }

    #[test]
    fn test_builder_formats() {
        let run = Run::builder()
            .text("QEDMMA")
            .bold()
            .size(72)
            .font("Arial")
            .color("1f4e79")
            .build()
            .unwrap();
        assert_eq!(run.properties().bold, Some(true));
        assert_eq!(run.properties().size, Some(72));
        assert_eq!(run.properties().color.as_ref().unwrap().hex(), "1F4E79");
    }

    #[test]
    fn test_builder_is_deterministic() {
        let make = || {
            Run::builder()
                .text("same")
                .italic()
                .style("Emphasis")
                .build()
                .unwrap()
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn test_builder_rejects_invalid_input() {
        assert!(Run::builder().bold().build().is_err());
        assert!(Run::builder().text("x").color("red").build().is_err());
        assert!(Run::builder().text("x").size(0).build().is_err());
        assert!(Run::builder().text("x").style("").build().is_err());
    }

    #[test]
    fn test_field_run_has_no_text() {
        let run = Run::builder()
            .field(FieldKind::TotalPages)
            .size(18)
            .build()
            .unwrap();
        assert_eq!(run.plain_text(), "");
        assert_eq!(run.content(), &RunContent::Field(FieldKind::TotalPages));
    }
}
