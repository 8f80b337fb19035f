//! Extract command - show the fields found on each page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use shiplabel_core::{BolParser, PdfExtractor, PdfProcessor, ShipmentFields};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include pages without a shipment identifier
    #[arg(long)]
    all_pages: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Fields extracted from one page.
#[derive(Debug, Serialize)]
struct PageFields {
    page: usize,
    #[serde(flatten)]
    fields: ShipmentFields,
    warnings: Vec<String>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let pages = PdfExtractor::from_bytes(&data)?.extract_pages()?;
    let parser = BolParser::from_config(&config.extraction)?;

    let results: Vec<PageFields> = pages
        .iter()
        .enumerate()
        .map(|(i, text)| (i, parser.parse(text)))
        .filter(|(_, result)| args.all_pages || result.has_shipment())
        .map(|(i, result)| PageFields {
            page: i + 1,
            fields: result.fields,
            warnings: result.warnings,
        })
        .collect();

    if results.is_empty() {
        eprintln!(
            "{} No shipment identifier found in {}",
            style("⚠").yellow(),
            args.input.display()
        );
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&results)?,
        OutputFormat::Csv => format_csv(&results)?,
        OutputFormat::Text => format_text(&results),
    };
    println!("{}", output);

    Ok(())
}

fn format_csv(results: &[PageFields]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "page",
        "identifier",
        "order_number",
        "carrier_code",
        "tracking_number",
        "piece_count",
    ])?;

    for result in results {
        wtr.write_record([
            &result.page.to_string(),
            &result.fields.identifier,
            &result.fields.order_number,
            &result.fields.carrier_code,
            &result.fields.tracking_number,
            &result.fields.piece_count.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(results: &[PageFields]) -> String {
    let mut output = String::new();

    for result in results {
        let fields = &result.fields;
        output.push_str(&format!("Page {}\n", result.page));
        output.push_str(&format!("  Identifier: {}\n", fields.identifier));
        output.push_str(&format!("  Sales order: {}\n", fields.order_number));
        output.push_str(&format!("  Carrier: {}\n", fields.carrier_code));
        output.push_str(&format!("  Pro number: {}\n", fields.tracking_number));
        output.push_str(&format!("  Pieces: {}\n", fields.piece_count));
        for warning in &result.warnings {
            output.push_str(&format!("  Warning: {}\n", warning));
        }
    }

    output
}
