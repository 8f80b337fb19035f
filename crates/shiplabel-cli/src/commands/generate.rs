//! Generate command - BOL PDFs to packaged labels.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use shiplabel_core::{BatchProcessor, SourceDocument};

use super::{deliver, load_config, OutputArgs};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.output.apply(&mut config);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} file(s) to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        pb.set_message(name.clone());
        documents.push(SourceDocument::new(name, fs::read(path)?));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let processor = BatchProcessor::from_config(&config)?;
    let report = processor.process_documents(&documents)?;

    deliver(&report, &config, &args.output.output_dir)?;

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}
