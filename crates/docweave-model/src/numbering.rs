//! Numbering registry
//!
//! Leveled list-formatting schemes (bullets and ordinal counters)
//! referenced by paragraphs through a string id and a level.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::format::{check_xml_text, Alignment, Indent};

/// Maximum number of levels in one definition
pub const MAX_LEVELS: usize = 9;

/// How a level renders its marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelFormat {
    Bullet,
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
}

/// One level of a numbering definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingLevel {
    /// Level index, 0-based
    pub level: u8,
    pub format: LevelFormat,
    /// Bullet glyph, or a counter pattern such as `%1.`
    pub text: String,
    /// First counter value
    #[serde(default = "default_start")]
    pub start: u32,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub indent: Indent,
}

fn default_start() -> u32 {
    1
}

impl NumberingLevel {
    /// A bullet level with the usual hanging indent for its depth
    pub fn bullet(level: u8, glyph: impl Into<String>) -> Self {
        Self {
            level,
            format: LevelFormat::Bullet,
            text: glyph.into(),
            start: 1,
            alignment: Alignment::Left,
            indent: default_indent(level),
        }
    }

    /// A counter level, e.g. `NumberingLevel::ordinal(0, LevelFormat::Decimal, "%1.")`
    pub fn ordinal(level: u8, format: LevelFormat, pattern: impl Into<String>) -> Self {
        Self {
            level,
            format,
            text: pattern.into(),
            start: 1,
            alignment: Alignment::Left,
            indent: default_indent(level),
        }
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

fn default_indent(level: u8) -> Indent {
    Indent::hanging(720 * (u32::from(level) + 1), 360)
}

/// A named list-formatting scheme
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingDefinition {
    id: String,
    levels: Vec<NumberingLevel>,
}

impl NumberingDefinition {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn levels(&self) -> &[NumberingLevel] {
        &self.levels
    }
}

/// Registry of numbering definitions in registration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberingRegistry {
    definitions: Vec<NumberingDefinition>,
    index: HashMap<String, usize>,
}

impl NumberingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition
    ///
    /// Levels must be exactly `0..N-1` in order, with `1 <= N <= 9`.
    pub fn define(&mut self, id: impl Into<String>, levels: Vec<NumberingLevel>) -> Result<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::validation("numbering id must not be empty"));
        }
        if self.index.contains_key(&id) {
            return Err(ModelError::DuplicateNumbering(id));
        }

        let contiguous = levels
            .iter()
            .enumerate()
            .all(|(i, level)| usize::from(level.level) == i);
        if levels.is_empty() || levels.len() > MAX_LEVELS || !contiguous {
            return Err(ModelError::InvalidLevelSequence {
                numbering: id,
                found: levels.iter().map(|l| l.level).collect(),
            });
        }
        if let Some(level) = levels.iter().find(|l| l.text.is_empty()) {
            return Err(ModelError::validation(format!(
                "numbering '{}' level {} has no marker text",
                id, level.level
            )));
        }

        check_xml_text("numbering id", &id)?;
        for level in &levels {
            check_xml_text(&format!("numbering '{}' level {} text", id, level.level), &level.text)?;
        }

        self.index.insert(id.clone(), self.definitions.len());
        self.definitions.push(NumberingDefinition { id, levels });
        Ok(())
    }

    /// Look up one level of a definition
    pub fn resolve(&self, id: &str, level: u8) -> Result<&NumberingLevel> {
        let definition = self
            .get(id)
            .ok_or_else(|| ModelError::UnknownNumbering(id.to_string()))?;
        definition
            .levels
            .get(usize::from(level))
            .ok_or_else(|| ModelError::LevelOutOfRange {
                numbering: id.to_string(),
                level,
                max: (definition.levels.len() - 1) as u8,
            })
    }

    pub fn get(&self, id: &str) -> Option<&NumberingDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    /// Registration position of a definition, 0-based
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumberingDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_resolve() {
        let mut registry = NumberingRegistry::new();
        registry
            .define(
                "bullets",
                vec![NumberingLevel::bullet(0, "•"), NumberingLevel::bullet(1, "◦")],
            )
            .unwrap();

        let level = registry.resolve("bullets", 1).unwrap();
        assert_eq!(level.text, "◦");
        assert_eq!(level.indent, Indent::hanging(1440, 360));
        assert_eq!(registry.index_of("bullets"), Some(0));
    }

    #[test]
    fn test_non_contiguous_levels_rejected() {
        let mut registry = NumberingRegistry::new();
        let err = registry
            .define(
                "gaps",
                vec![NumberingLevel::bullet(0, "•"), NumberingLevel::bullet(2, "•")],
            )
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidLevelSequence {
                numbering: "gaps".to_string(),
                found: vec![0, 2],
            }
        );
    }

    #[test]
    fn test_levels_must_start_at_zero() {
        let mut registry = NumberingRegistry::new();
        assert!(registry
            .define("late", vec![NumberingLevel::bullet(1, "•")])
            .is_err());
        assert!(registry.define("empty", vec![]).is_err());
    }

    #[test]
    fn test_unknown_and_out_of_range() {
        let mut registry = NumberingRegistry::new();
        registry
            .define(
                "steps",
                vec![NumberingLevel::ordinal(0, LevelFormat::Decimal, "%1.")],
            )
            .unwrap();

        assert_eq!(
            registry.resolve("nope", 0).unwrap_err(),
            ModelError::UnknownNumbering("nope".to_string())
        );
        assert_eq!(
            registry.resolve("steps", 3).unwrap_err(),
            ModelError::LevelOutOfRange {
                numbering: "steps".to_string(),
                level: 3,
                max: 0,
            }
        );
    }

    #[test]
    fn test_duplicate_numbering_rejected() {
        let mut registry = NumberingRegistry::new();
        registry
            .define("bullets", vec![NumberingLevel::bullet(0, "•")])
            .unwrap();
        assert_eq!(
            registry
                .define("bullets", vec![NumberingLevel::bullet(0, "-")])
                .unwrap_err(),
            ModelError::DuplicateNumbering("bullets".to_string())
        );
        assert_eq!(registry.resolve("bullets", 0).unwrap().text, "•");
    }

    #[test]
    fn test_level_text_with_control_character_rejected() {
        let mut registry = NumberingRegistry::new();
        let err = registry
            .define("bullets", vec![NumberingLevel::bullet(0, "\u{1B}")])
            .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert!(registry.is_empty());
    }
}
