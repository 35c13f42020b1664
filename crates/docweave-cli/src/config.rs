//! docweave.toml settings
//!
//! Every table and key is optional; missing entries take their defaults.
//!
//! ```toml
//! [package]
//! compression = "stored"
//!
//! [page]
//! size = "letter"
//! orientation = "landscape"
//!
//! [fonts]
//! family = "Calibri"
//! size = 24
//! ```

use std::path::PathBuf;

use docweave_model::{Orientation, PageMargins, PageSize};
use docweave_ooxml::PackageOptions;
use serde::{Deserialize, Serialize};

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "docweave.toml";

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub package: PackageOptions,
    pub page: PageSetup,
    pub fonts: FontSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// Named paper sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

/// Page geometry applied to every section of the generated document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub size: PaperSize,
    pub orientation: Orientation,
    pub margins: PageMargins,
}

impl PageSetup {
    pub fn page_size(&self) -> PageSize {
        let size = match self.size {
            PaperSize::A4 => PageSize::A4,
            PaperSize::Letter => PageSize::LETTER,
        };
        match self.orientation {
            Orientation::Portrait => size,
            Orientation::Landscape => size.landscape(),
        }
    }
}

/// Document default font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub family: String,
    /// Size in half-points
    pub size: u32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 22,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where `sample` writes when no `--output` is given
    pub path: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("docweave-sample.docx"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_ooxml::Compression;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.package, PackageOptions::default());
        assert_eq!(settings.page.page_size(), PageSize::A4);
        assert_eq!(settings.fonts.family, "Arial");
        assert_eq!(settings.output.path, PathBuf::from("docweave-sample.docx"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_full_config() {
        let settings = Settings::from_toml_str(
            r#"
[package]
compression = "stored"
update_fields_on_open = false

[page]
size = "letter"
orientation = "landscape"

[page.margins]
top = 720
bottom = 720

[fonts]
family = "Calibri"
size = 24

[output]
path = "out/report.docx"
"#,
        )
        .unwrap();

        assert_eq!(settings.package.compression, Compression::Stored);
        assert!(!settings.package.update_fields_on_open);
        assert_eq!(settings.package.application, "docweave");

        let size = settings.page.page_size();
        assert_eq!(size.orientation, Orientation::Landscape);
        assert_eq!((size.width, size.height), (15840, 12240));
        assert_eq!(settings.page.margins.top, 720);
        assert_eq!(settings.page.margins.left, 1440);

        assert_eq!(settings.fonts.family, "Calibri");
        assert_eq!(settings.fonts.size, 24);
        assert_eq!(settings.output.path, PathBuf::from("out/report.docx"));
    }

    #[test]
    fn test_unknown_paper_size_rejected() {
        assert!(Settings::from_toml_str("[page]\nsize = \"tabloid\"").is_err());
    }
}
