//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use docweave_ooxml::{DocxWriter, OoxmlArchive, StyleSheet, STYLES_PART};

use crate::config::{Settings, CONFIG_FILE};
use crate::sample::sample_report;

/// Output format for package inspection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docweave")]
#[command(author, version, about = "Structured documents to DOCX", long_about = None)]
struct Cli {
    /// Log debug events (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the bundled sample report
    Sample {
        /// Output DOCX file (defaults to [output].path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the parts of a DOCX package
    Inspect {
        /// Input DOCX file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// Parses arguments, installs the log subscriber and dispatches to the
/// appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sample { output, config } => {
            let written = sample_command(output.as_deref(), config.as_deref())?;
            println!("Wrote {}", written.display());
        }
        Commands::Inspect { input, format } => {
            print!("{}", inspect_command(&input, format)?);
        }
    }

    Ok(())
}

/// Log to stderr, filtered by [`log_filter`]
fn init_logging(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, env.as_deref()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// A valid `RUST_LOG` value replaces the default level entirely;
/// otherwise `--verbose` selects debug over info.
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

/// Execute the sample command, returning the path written
pub fn sample_command(output: Option<&Path>, config: Option<&Path>) -> Result<PathBuf> {
    let settings = load_settings(config)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.output.path.clone());

    let document = sample_report(&settings).context("Failed to build sample report")?;
    tracing::debug!(
        sections = document.sections().len(),
        headings = document.outline().len(),
        "assembled sample report"
    );

    DocxWriter::new(settings.package.clone())
        .write_to_path(&document, &output)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    Ok(output)
}

/// One entry of an inspection report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartInfo {
    pub path: String,
    pub bytes: usize,
}

/// Summary of a DOCX package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    pub file: String,
    pub parts: Vec<PartInfo>,
    /// Style IDs defined in `word/styles.xml`
    pub styles: Vec<String>,
    /// Style IDs carrying an outline level
    pub heading_styles: Vec<String>,
}

impl PackageReport {
    pub fn from_archive(file: &Path, archive: &OoxmlArchive) -> Result<Self> {
        let parts = archive
            .parts()
            .map(|(path, bytes)| PartInfo {
                path: path.to_string(),
                bytes: bytes.len(),
            })
            .collect();

        let (styles, heading_styles) = match archive.get(STYLES_PART) {
            Some(xml) => {
                let sheet = StyleSheet::parse(xml).context("Failed to parse styles")?;
                let styles = sheet.all().map(|s| s.id.clone()).collect();
                let headings = sheet.heading_styles().map(|s| s.id.clone()).collect();
                (styles, headings)
            }
            None => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            file: file.display().to_string(),
            parts,
            styles,
            heading_styles,
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.file);
        for part in &self.parts {
            out.push_str(&format!("  {:>8}  {}\n", part.bytes, part.path));
        }
        out.push_str(&format!(
            "{} parts, {} styles ({} headings)\n",
            self.parts.len(),
            self.styles.len(),
            self.heading_styles.len()
        ));
        out
    }
}

/// Execute the inspect command, returning the rendered report
pub fn inspect_command(input: &Path, format: OutputFormat) -> Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let archive = OoxmlArchive::open(input)
        .with_context(|| format!("Failed to open DOCX file: {}", input.display()))?;
    let report = PackageReport::from_archive(input, &archive)?;

    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Load settings from a config file or use defaults
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            read_settings(path)
        }
        None if Path::new(CONFIG_FILE).exists() => read_settings(Path::new(CONFIG_FILE)),
        None => Ok(Settings::default()),
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let settings = Settings::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}
