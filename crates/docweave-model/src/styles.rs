//! Style registry
//!
//! Named paragraph, character and table styles with single-parent
//! inheritance (`based_on`). Parents must be registered before their
//! children, so every chain terminates and cycles cannot be built. Each
//! style's merged attribute set is computed once, at registration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::format::{check_xml_text, ParagraphProperties, RunProperties};

/// What a style applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
}

impl StyleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
        }
    }
}

/// Id of the default paragraph style
pub const NORMAL: &str = "Normal";
/// Character style applied to TOC entry links
pub const HYPERLINK: &str = "Hyperlink";

/// Id of the built-in heading style for a level (1-based)
pub fn heading_style_id(level: u8) -> String {
    format!("Heading{}", level)
}

/// Id of the built-in TOC entry style for a level (1-based)
pub fn toc_style_id(level: u8) -> String {
    format!("TOC{}", level)
}

/// A named formatting preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Style ID (used in node references)
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: StyleKind,
    /// Parent style ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    /// Style for the paragraph following this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Show in the viewer's quick style gallery
    #[serde(default)]
    pub quick_format: bool,
    #[serde(default)]
    pub run: RunProperties,
    #[serde(default)]
    pub paragraph: ParagraphProperties,
}

impl StyleDefinition {
    fn new(id: impl Into<String>, name: impl Into<String>, kind: StyleKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            based_on: None,
            next: None,
            quick_format: false,
            run: RunProperties::default(),
            paragraph: ParagraphProperties::default(),
        }
    }

    /// A paragraph style
    pub fn paragraph(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, StyleKind::Paragraph)
    }

    /// A character (run) style
    pub fn character(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, StyleKind::Character)
    }

    /// A table style
    pub fn table(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, StyleKind::Table)
    }

    pub fn with_based_on(mut self, parent: impl Into<String>) -> Self {
        self.based_on = Some(parent.into());
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_quick_format(mut self) -> Self {
        self.quick_format = true;
        self
    }

    pub fn with_run(mut self, run: RunProperties) -> Self {
        self.run = run;
        self
    }

    pub fn with_paragraph(mut self, paragraph: ParagraphProperties) -> Self {
        self.paragraph = paragraph;
        self
    }
}

/// Document-wide default formatting, applied beneath every style
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocDefaults {
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

/// A style with its inheritance chain folded in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub id: String,
    pub kind: StyleKind,
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

impl ResolvedStyle {
    /// Outline level carried by the style, 0-based
    pub fn outline_level(&self) -> Option<u8> {
        self.paragraph.outline_level
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StyleEntry {
    definition: StyleDefinition,
    resolved: ResolvedStyle,
}

/// Registry of named styles
///
/// Maintains registration order for deterministic serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleRegistry {
    defaults: DocDefaults,
    /// Style IDs in registration order
    order: Vec<String>,
    styles: HashMap<String, StyleEntry>,
}

impl StyleRegistry {
    /// Create an empty registry with the given document defaults
    pub fn new(defaults: DocDefaults) -> Self {
        Self {
            defaults,
            order: Vec::new(),
            styles: HashMap::new(),
        }
    }

    /// Register a style
    ///
    /// Fails with `DuplicateStyle` if the id is taken and with
    /// `DanglingParent` if `based_on` is not registered yet (a style based
    /// on itself is dangling too).
    pub fn define(&mut self, style: StyleDefinition) -> Result<()> {
        if style.id.trim().is_empty() {
            return Err(ModelError::validation("style id must not be empty"));
        }
        if self.styles.contains_key(&style.id) {
            return Err(ModelError::DuplicateStyle(style.id));
        }
        check_xml_text("style id", &style.id)?;
        check_xml_text("style name", &style.name)?;
        style.run.validate()?;
        style.paragraph.validate()?;

        let resolved = match &style.based_on {
            Some(parent_id) => {
                let parent = self
                    .styles
                    .get(parent_id)
                    .ok_or_else(|| ModelError::DanglingParent {
                        style: style.id.clone(),
                        parent: parent_id.clone(),
                    })?;
                if parent.definition.kind != style.kind {
                    return Err(ModelError::validation(format!(
                        "style '{}' ({}) cannot be based on '{}' ({})",
                        style.id,
                        style.kind.as_str(),
                        parent_id,
                        parent.definition.kind.as_str()
                    )));
                }
                ResolvedStyle {
                    id: style.id.clone(),
                    kind: style.kind,
                    run: style.run.merged_over(&parent.resolved.run),
                    paragraph: style.paragraph.merged_over(&parent.resolved.paragraph),
                }
            }
            None => ResolvedStyle {
                id: style.id.clone(),
                kind: style.kind,
                run: style.run.clone(),
                paragraph: style.paragraph.clone(),
            },
        };

        if let Some(next) = &style.next {
            if next != &style.id && !self.styles.contains_key(next) {
                return Err(ModelError::UnknownStyle(next.clone()));
            }
        }

        self.order.push(style.id.clone());
        self.styles.insert(
            style.id.clone(),
            StyleEntry {
                definition: style,
                resolved,
            },
        );
        Ok(())
    }

    /// The merged attribute set of a style
    pub fn resolve(&self, id: &str) -> Result<&ResolvedStyle> {
        self.styles
            .get(id)
            .map(|entry| &entry.resolved)
            .ok_or_else(|| ModelError::UnknownStyle(id.to_string()))
    }

    /// The style as it was defined
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id).map(|entry| &entry.definition)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// All styles in registration order
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.order
            .iter()
            .filter_map(|id| self.styles.get(id))
            .map(|entry| &entry.definition)
    }

    pub fn defaults(&self) -> &DocDefaults {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Color, Spacing};

    fn registry_with_normal() -> StyleRegistry {
        let mut registry = StyleRegistry::new(DocDefaults::default());
        registry
            .define(
                StyleDefinition::paragraph("Normal", "Normal")
                    .with_run(RunProperties::default().with_font("Arial").with_size(22)),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_define_and_resolve_inherits() {
        let mut registry = registry_with_normal();
        registry
            .define(
                StyleDefinition::paragraph("Heading1", "Heading 1")
                    .with_based_on("Normal")
                    .with_next("Normal")
                    .with_run(
                        RunProperties::default()
                            .with_size(32)
                            .with_bold(true)
                            .with_color(Color::parse("1F4E79").unwrap()),
                    )
                    .with_paragraph(
                        ParagraphProperties::default()
                            .with_spacing(Spacing::around(400, 200))
                            .with_outline_level(0),
                    ),
            )
            .unwrap();

        let resolved = registry.resolve("Heading1").unwrap();
        assert_eq!(resolved.run.font.as_deref(), Some("Arial"));
        assert_eq!(resolved.run.size, Some(32));
        assert_eq!(resolved.run.bold, Some(true));
        assert_eq!(resolved.outline_level(), Some(0));
    }

    #[test]
    fn test_duplicate_style_rejected() {
        let mut registry = registry_with_normal();
        let err = registry
            .define(StyleDefinition::paragraph("Normal", "Other"))
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateStyle("Normal".to_string()));
        // Original definition is untouched
        assert_eq!(registry.get("Normal").unwrap().name, "Normal");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let mut registry = StyleRegistry::default();
        let err = registry
            .define(StyleDefinition::paragraph("Heading1", "Heading 1").with_based_on("Normal"))
            .unwrap_err();
        assert!(matches!(err, ModelError::DanglingParent { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut registry = StyleRegistry::default();
        let err = registry
            .define(StyleDefinition::paragraph("Loop", "Loop").with_based_on("Loop"))
            .unwrap_err();
        assert!(matches!(err, ModelError::DanglingParent { .. }));
    }

    #[test]
    fn test_kind_mismatch_in_inheritance() {
        let mut registry = registry_with_normal();
        let err = registry
            .define(StyleDefinition::character("Strong", "Strong").with_based_on("Normal"))
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_style_name_with_control_character_rejected() {
        let mut registry = registry_with_normal();
        let err = registry
            .define(StyleDefinition::paragraph("Quote", "Quote\u{7}"))
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert!(!registry.contains("Quote"));
    }

    #[test]
    fn test_unknown_style() {
        let registry = registry_with_normal();
        assert_eq!(
            registry.resolve("Missing").unwrap_err(),
            ModelError::UnknownStyle("Missing".to_string())
        );
    }

    #[test]
    fn test_iteration_order_is_registration_order() {
        let mut registry = registry_with_normal();
        for id in ["Zeta", "Alpha", "Mid"] {
            registry
                .define(StyleDefinition::paragraph(id, id).with_based_on("Normal"))
                .unwrap();
        }
        let ids: Vec<_> = registry.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["Normal", "Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_three_level_chain() {
        let mut registry = registry_with_normal();
        registry
            .define(
                StyleDefinition::paragraph("Body", "Body")
                    .with_based_on("Normal")
                    .with_run(RunProperties::default().with_italic(true)),
            )
            .unwrap();
        registry
            .define(
                StyleDefinition::paragraph("Quote", "Quote")
                    .with_based_on("Body")
                    .with_run(RunProperties::default().with_size(20)),
            )
            .unwrap();

        let resolved = registry.resolve("Quote").unwrap();
        assert_eq!(resolved.run.font.as_deref(), Some("Arial"));
        assert_eq!(resolved.run.italic, Some(true));
        assert_eq!(resolved.run.size, Some(20));
    }

    #[test]
    fn test_style_definition_from_toml() {
        let style: StyleDefinition = toml::from_str(
            r#"
id = "Caption"
name = "Caption"
kind = "paragraph"
based_on = "Normal"

[run]
italic = true
size = 18
"#,
        )
        .unwrap();
        let mut registry = registry_with_normal();
        registry.define(style).unwrap();
        assert_eq!(registry.resolve("Caption").unwrap().run.size, Some(18));
    }
}
