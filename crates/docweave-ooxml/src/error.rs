//! Error types for OOXML operations

use docweave_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Errors that can occur while serializing a package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The document or one of its references is invalid
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The staged file could not be moved onto the destination path
    #[error("Failed to move staged package into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// A part contains a character XML cannot represent
    #[error("Character not allowed in XML at byte {offset}")]
    InvalidCharacter { offset: usize },

    /// Required part not found in archive
    #[error("Required part not found: {0}")]
    MissingPart(String),
}

impl OoxmlError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            OoxmlError::Model(err) => err.kind(),
            OoxmlError::Archive(_) | OoxmlError::Io(_) | OoxmlError::Persist(_) => ErrorKind::Io,
            OoxmlError::Xml(_) | OoxmlError::InvalidCharacter { .. } | OoxmlError::MissingPart(_) => {
                ErrorKind::Validation
            }
        }
    }
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
