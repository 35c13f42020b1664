//! Serializer options

use serde::{Deserialize, Serialize};

/// ZIP compression for package entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// Options controlling how a document is packaged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    pub compression: Compression,
    /// Ask the viewer to refresh fields (TOC, page numbers) on open
    pub update_fields_on_open: bool,
    /// Application name recorded in `docProps/app.xml`
    pub application: String,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            update_fields_on_open: true,
            application: "docweave".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PackageOptions::default();
        assert_eq!(options.compression, Compression::Deflated);
        assert!(options.update_fields_on_open);
    }

    #[test]
    fn test_partial_toml() {
        let options: PackageOptions = toml::from_str(r#"compression = "stored""#).unwrap();
        assert_eq!(options.compression, Compression::Stored);
        assert!(options.update_fields_on_open);
        assert_eq!(options.application, "docweave");
    }

    #[test]
    fn test_unknown_compression_rejected() {
        assert!(toml::from_str::<PackageOptions>(r#"compression = "bzip2""#).is_err());
    }
}
