//! Error types for building and assembling documents

use thiserror::Error;

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A node was malformed when it was constructed
    Validation,
    /// A style or numbering id could not be found
    Reference,
    /// The document, a section or a table has no content
    Structure,
    /// Writing the output failed
    Io,
}

/// Errors raised by the registries, the node builders and the assembler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A node failed shape validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A style with this id is already registered
    #[error("Style already defined: {0}")]
    DuplicateStyle(String),

    /// A style is based on a parent that is not registered
    #[error("Style '{style}' is based on unknown style '{parent}'")]
    DanglingParent { style: String, parent: String },

    /// No style with this id is registered
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// A numbering definition with this id is already registered
    #[error("Numbering already defined: {0}")]
    DuplicateNumbering(String),

    /// Numbering levels are not contiguous from 0
    #[error("Numbering '{numbering}' has invalid level sequence {found:?}, expected 0..N-1")]
    InvalidLevelSequence { numbering: String, found: Vec<u8> },

    /// No numbering definition with this id is registered
    #[error("Unknown numbering: {0}")]
    UnknownNumbering(String),

    /// The numbering definition exists but has no such level
    #[error("Numbering '{numbering}' has no level {level} (highest is {max})")]
    LevelOutOfRange { numbering: String, level: u8, max: u8 },

    /// A node in the tree references a style that is not registered
    #[error("{location}: references unknown style '{id}'")]
    StyleReference { location: String, id: String },

    /// A node in the tree references a style of the wrong kind
    #[error("{location}: style '{id}' is a {found} style, expected a {expected} style")]
    StyleKindMismatch {
        location: String,
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A paragraph references a missing numbering definition or level
    #[error("{location}: {source}")]
    NumberingReference {
        location: String,
        #[source]
        source: Box<ModelError>,
    },

    /// The document has no sections
    #[error("Document has no sections")]
    EmptyDocument,

    /// A section has an empty body
    #[error("Section {index} has an empty body")]
    EmptySection { index: usize },

    /// A table has no rows
    #[error("Table has no rows")]
    EmptyTable,
}

impl ModelError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Validation(_)
            | ModelError::DuplicateStyle(_)
            | ModelError::DuplicateNumbering(_)
            | ModelError::InvalidLevelSequence { .. }
            | ModelError::StyleKindMismatch { .. } => ErrorKind::Validation,
            ModelError::DanglingParent { .. }
            | ModelError::UnknownStyle(_)
            | ModelError::UnknownNumbering(_)
            | ModelError::LevelOutOfRange { .. }
            | ModelError::StyleReference { .. }
            | ModelError::NumberingReference { .. } => ErrorKind::Reference,
            ModelError::EmptyDocument
            | ModelError::EmptySection { .. }
            | ModelError::EmptyTable => ErrorKind::Structure,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ModelError::Validation(message.into())
    }
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ModelError::validation("bad").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ModelError::UnknownStyle("X".into()).kind(),
            ErrorKind::Reference
        );
        assert_eq!(ModelError::EmptyDocument.kind(), ErrorKind::Structure);
        assert_eq!(
            ModelError::EmptySection { index: 2 }.kind(),
            ErrorKind::Structure
        );
    }

    #[test]
    fn test_numbering_reference_display() {
        let err = ModelError::NumberingReference {
            location: "section 0, block 3".to_string(),
            source: Box::new(ModelError::UnknownNumbering("bullets".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "section 0, block 3: Unknown numbering: bullets"
        );
        assert_eq!(err.kind(), ErrorKind::Reference);
    }
}
