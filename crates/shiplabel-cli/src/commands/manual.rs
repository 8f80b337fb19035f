//! Manual command - labels from typed-in shipments.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use shiplabel_core::{BatchProcessor, ManualEntry, ManualEntryForm};

use super::{deliver, load_config, OutputArgs};

/// Arguments for the manual command.
#[derive(Args)]
pub struct ManualArgs {
    /// CSV file with columns order_number, tracking_number, carrier_code, piece_count
    #[arg(long)]
    csv: Option<PathBuf>,

    /// One shipment as "ORDER,PRO,SCAC,PIECES" (repeatable)
    #[arg(short, long)]
    entry: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ManualArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    args.output.apply(&mut config);

    let mut form = ManualEntryForm::new();

    if let Some(path) = &args.csv {
        for entry in read_csv(path)? {
            form.add_row(entry);
        }
    }
    for (i, raw) in args.entry.iter().enumerate() {
        let entry = parse_entry(raw).with_context(|| format!("Invalid --entry #{}: {:?}", i + 1, raw))?;
        form.add_row(entry);
    }

    if form.is_empty() {
        anyhow::bail!("No shipments given. Use --csv FILE or --entry \"ORDER,PRO,SCAC,PIECES\".");
    }

    let processor = BatchProcessor::from_config(&config)?;
    let report = processor.process_form(&form)?;

    deliver(&report, &config, &args.output.output_dir)?;
    Ok(())
}

fn read_csv(path: &PathBuf) -> anyhow::Result<Vec<ManualEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut entries = Vec::new();
    for (i, record) in reader.deserialize().enumerate() {
        let entry: ManualEntry =
            record.with_context(|| format!("{}: invalid row {}", path.display(), i + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Parse `ORDER,PRO,SCAC[,PIECES]`; pieces default to 1.
fn parse_entry(raw: &str) -> anyhow::Result<ManualEntry> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 4 {
        anyhow::bail!("expected ORDER,PRO,SCAC[,PIECES]");
    }

    let piece_count = match parts.get(3) {
        Some(pieces) if !pieces.is_empty() => pieces
            .parse::<i64>()
            .with_context(|| format!("piece count {:?} is not a number", pieces))?,
        _ => 1,
    };

    Ok(ManualEntry::new(parts[0], parts[1], parts[2], piece_count))
}
