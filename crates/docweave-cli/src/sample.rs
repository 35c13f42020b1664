//! Bundled sample report
//!
//! A two-section architecture report exercising every node type: a title
//! page and table of contents, then headed chapters with bullet lists,
//! styled tables, a right-aligned header and a "Page X of Y" footer.

use docweave_model::{
    Alignment, Border, CellBorders, CellMargins, Color, DocDefaults, Document, DocumentMeta,
    FieldKind, HeaderFooterBand, Indent, NumberingLevel, NumberingRegistry, Paragraph,
    ParagraphProperties, Result, Run, RunProperties, Section, SectionBuilder, Shading, Spacing,
    StyleDefinition, StyleRegistry, Table, TableCell, TableOfContents, TableRow, Width,
};

use crate::config::Settings;

const TITLE: &str = "Telemetry Pipeline Architecture";
const PRIMARY: &str = "1F4E79";
const BULLETS: &str = "bullets";

/// (level, size in half-points, color, spacing before, spacing after)
const HEADINGS: [(u8, u32, &str, u32, u32); 3] = [
    (1, 32, PRIMARY, 400, 200),
    (2, 26, "2E75B6", 300, 150),
    (3, 24, "5B9BD5", 200, 100),
];

fn color(hex: &str) -> Result<Color> {
    Color::parse(hex)
}

fn styles(settings: &Settings) -> Result<StyleRegistry> {
    let mut styles = StyleRegistry::new(DocDefaults {
        run: RunProperties::default()
            .with_font(settings.fonts.family.as_str())
            .with_size(settings.fonts.size),
        paragraph: ParagraphProperties::default(),
    });
    styles.define(StyleDefinition::paragraph("Normal", "Normal").with_quick_format())?;

    for (level, size, hex, before, after) in HEADINGS {
        styles.define(
            StyleDefinition::paragraph(format!("Heading{}", level), format!("Heading {}", level))
                .with_based_on("Normal")
                .with_next("Normal")
                .with_quick_format()
                .with_run(
                    RunProperties::default()
                        .with_size(size)
                        .with_bold(true)
                        .with_color(color(hex)?),
                )
                .with_paragraph(
                    ParagraphProperties::default()
                        .with_spacing(Spacing::around(before, after))
                        .with_outline_level(level - 1),
                ),
        )?;
    }
    Ok(styles)
}

fn numbering() -> Result<NumberingRegistry> {
    let mut numbering = NumberingRegistry::new();
    numbering.define(
        BULLETS,
        vec![NumberingLevel::bullet(0, "•").with_indent(Indent::hanging(720, 360))],
    )?;
    Ok(numbering)
}

fn centered(text: &str, size: u32, hex: Option<&str>, spacing_after: u32) -> Result<Paragraph> {
    let mut run = Run::builder().text(text).size(size);
    if let Some(hex) = hex {
        run = run.color(hex).bold();
    }
    Paragraph::builder()
        .run(run.build()?)
        .alignment(Alignment::Center)
        .spacing(Spacing::after(spacing_after))
        .build()
}

fn spacer(after: u32) -> Result<Paragraph> {
    Paragraph::builder().spacing(Spacing::after(after)).build()
}

fn bullet(text: &str) -> Result<Paragraph> {
    Paragraph::builder().numbering(BULLETS, 0).text(text).build()
}

fn header_cell(text: &str, width: u32) -> Result<TableCell> {
    let edge = Border::single(1, color(PRIMARY)?);
    TableCell::builder()
        .paragraph(
            Paragraph::builder()
                .run(
                    Run::builder()
                        .text(text)
                        .bold()
                        .color("FFFFFF")
                        .size(20)
                        .build()?,
                )
                .build()?,
        )
        .width(Width::Dxa(width))
        .borders(CellBorders::uniform(edge))
        .shading(Shading::clear(color(PRIMARY)?))
        .margins(CellMargins::new(80, 80, 120, 120))
        .build()
}

fn data_cell(text: &str, width: u32) -> Result<TableCell> {
    TableCell::builder()
        .paragraph(
            Paragraph::builder()
                .run(Run::builder().text(text).size(20).build()?)
                .build()?,
        )
        .width(Width::Dxa(width))
        .borders(CellBorders::uniform(Border::single(1, color("CCCCCC")?)))
        .margins(CellMargins::new(60, 60, 100, 100))
        .build()
}

/// A full-width table with one header row
fn grid(widths: &[u32], header: &[&str], rows: &[&[&str]]) -> Result<Table> {
    let cells = |texts: &[&str], make: fn(&str, u32) -> Result<TableCell>| {
        texts
            .iter()
            .zip(widths)
            .map(|(text, width)| make(text, *width))
            .collect::<Result<Vec<_>>>()
    };

    let mut builder = Table::builder()
        .column_widths(widths.iter().copied())
        .width(Width::Percent(100))
        .row(TableRow::header(cells(header, header_cell)?));
    for row in rows {
        builder = builder.row(TableRow::new(cells(*row, data_cell)?));
    }
    builder.build()
}

fn page_setup(builder: SectionBuilder, settings: &Settings) -> SectionBuilder {
    builder
        .page_size(settings.page.page_size())
        .margins(settings.page.margins)
}

fn title_section(settings: &Settings) -> Result<Section> {
    page_setup(Section::builder(), settings)
        .paragraph(spacer(400)?)
        .paragraph(spacer(400)?)
        .paragraph(centered("Telemetry Pipeline", 72, Some(PRIMARY), 0)?)
        .paragraph(centered("System Architecture Document", 36, Some("2E75B6"), 200)?)
        .paragraph(centered("Version 1.0", 28, None, 400)?)
        .paragraph(centered("Date: 31 January 2026", 20, None, 200)?)
        .page_break()
        .table_of_contents(TableOfContents::new(1, 3)?.with_title("Table of Contents"))
        .build()
}

fn body_section(settings: &Settings) -> Result<Section> {
    let header = HeaderFooterBand::new(vec![Paragraph::builder()
        .run(
            Run::builder()
                .text(format!("{} v1.0", TITLE))
                .size(18)
                .color("666666")
                .build()?,
        )
        .alignment(Alignment::Right)
        .build()?])?;

    let small = |text: &str| Run::builder().text(text).size(18).build();
    let small_field = |kind: FieldKind| Run::builder().field(kind).size(18).build();
    let footer = HeaderFooterBand::new(vec![Paragraph::builder()
        .run(small("Page ")?)
        .run(small_field(FieldKind::PageNumber)?)
        .run(small(" of ")?)
        .run(small_field(FieldKind::TotalPages)?)
        .alignment(Alignment::Center)
        .build()?])?;

    let components = grid(
        &[2600, 4000, 3146],
        &["Component", "Responsibility", "Interface"],
        &[
            &["Collector", "Receives agent batches", "gRPC stream"],
            &["Normalizer", "Maps fields to the schema", "In-process queue"],
            &["Store", "Persists time series", "Columnar files"],
        ],
    )?;
    let targets = grid(
        &[4000, 2600, 3146],
        &["Metric", "Target", "Measured"],
        &[
            &["Ingest latency (p99)", "< 250 ms", "180 ms"],
            &["Sustained throughput", "50k events/s", "62k events/s"],
        ],
    )?;

    page_setup(Section::builder(), settings)
        .header(header)
        .footer(footer)
        .paragraph(Paragraph::heading(1, "1. Executive Summary")?)
        .paragraph(Paragraph::text(
            "The pipeline collects telemetry from field agents, normalizes it and \
             stores it for query and alerting.",
        ))
        .paragraph(Paragraph::heading(2, "1.1 Goals")?)
        .paragraph(bullet("Bounded end-to-end latency")?)
        .paragraph(bullet("Loss-free delivery across restarts")?)
        .paragraph(bullet("Horizontal scaling of every stage")?)
        .paragraph(Paragraph::heading(1, "2. System Overview")?)
        .paragraph(Paragraph::heading(2, "2.1 Components")?)
        .table(components)
        .paragraph(Paragraph::heading(3, "2.1.1 Data Flow")?)
        .paragraph(Paragraph::text(
            "Agents → Collector → Normalizer → Store\nAlerts read from the Store.",
        ))
        .page_break()
        .paragraph(Paragraph::heading(1, "3. Performance Specifications")?)
        .table(targets)
        .paragraph(Paragraph::heading(1, "Document Control")?)
        .paragraph(Paragraph::text("Revision 1.0: initial release."))
        .build()
}

/// Build the sample report with page and font choices from `settings`
pub fn sample_report(settings: &Settings) -> Result<Document> {
    Document::builder(styles(settings)?, numbering()?)
        .meta(DocumentMeta {
            title: Some(TITLE.to_string()),
            subject: Some("System architecture".to_string()),
            creator: Some("docweave".to_string()),
            created: Some("2026-01-31".to_string()),
            ..Default::default()
        })
        .section(title_section(settings)?)
        .section(body_section(settings)?)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_model::{Block, Orientation};

    #[test]
    fn test_sample_assembles() {
        let doc = sample_report(&Settings::default()).unwrap();
        assert_eq!(doc.sections().len(), 2);
        assert!(doc.sections()[1].header().is_some());
        assert!(doc.sections()[0].footer().is_none());
    }

    #[test]
    fn test_sample_outline() {
        let doc = sample_report(&Settings::default()).unwrap();
        let outline = doc.outline();
        let titles: Vec<_> = outline.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "1. Executive Summary",
                "1.1 Goals",
                "2. System Overview",
                "2.1 Components",
                "2.1.1 Data Flow",
                "3. Performance Specifications",
                "Document Control",
            ]
        );
        assert_eq!(outline.get(4).unwrap().level, 3);
    }

    #[test]
    fn test_sample_follows_settings() {
        let settings =
            Settings::from_toml_str("[page]\norientation = \"landscape\"\n[fonts]\nfamily = \"Calibri\"")
                .unwrap();
        let doc = sample_report(&settings).unwrap();

        for section in doc.sections() {
            assert_eq!(section.page_size().orientation, Orientation::Landscape);
        }
        assert_eq!(doc.styles().defaults().run.font.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_sample_tables_have_header_rows() {
        let doc = sample_report(&Settings::default()).unwrap();
        let tables: Vec<_> = doc.sections()[1]
            .body()
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 2);
        for table in tables {
            assert!(table.rows()[0].is_header());
            assert!(table.rows().iter().skip(1).all(|row| !row.is_header()));
        }
    }
}
