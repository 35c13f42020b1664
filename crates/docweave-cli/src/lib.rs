//! docweave CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docweave:
//! - Sample: Generate the bundled sample report as DOCX
//! - Inspect: List the parts and styles of a DOCX package
//!
//! # Library Usage
//!
//! ```no_run
//! use docweave_cli::{inspect_command, sample_command, OutputFormat};
//! use std::path::Path;
//!
//! let written = sample_command(Some(Path::new("report.docx")), None)?;
//! print!("{}", inspect_command(&written, OutputFormat::Json)?);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Generate the sample report with page settings from docweave.toml
//! docweave sample --output report.docx --config docweave.toml
//!
//! # List the parts of a package
//! docweave inspect report.docx --format json
//! ```

pub mod app;
pub mod config;
pub mod sample;

pub use app::{inspect_command, run_cli, sample_command, OutputFormat, PackageReport, PartInfo};
pub use config::Settings;
pub use sample::sample_report;
