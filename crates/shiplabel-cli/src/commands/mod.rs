//! Subcommands and the helpers they share.

pub mod config;
pub mod extract;
pub mod generate;
pub mod manual;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use console::style;
use tracing::debug;

use shiplabel_core::models::config::{DeliveryMode, LabelConfig, LabelTemplate};
use shiplabel_core::{package, BatchOutcome, BatchReport};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shiplabel")
        .join("config.json")
}

/// The `--config` path if given, otherwise the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration: an explicit path must exist, the default one may not.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<LabelConfig> {
    match explicit {
        Some(path) => Ok(LabelConfig::from_file(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using configuration from {}", path.display());
                Ok(LabelConfig::from_file(&path)?)
            } else {
                Ok(LabelConfig::default())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TemplateArg {
    /// One page per piece
    Single,
    /// Two pages (A and B) per piece
    Dual,
}

impl From<TemplateArg> for LabelTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Single => LabelTemplate::Single,
            TemplateArg::Dual => LabelTemplate::Dual,
        }
    }
}

/// Layout and delivery flags shared by `generate` and `manual`.
#[derive(Args)]
pub struct OutputArgs {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Deliver one merged PDF instead of a ZIP archive
    #[arg(long)]
    pub merged: bool,

    /// Label template
    #[arg(short, long, value_enum)]
    pub template: Option<TemplateArg>,

    /// Do not draw barcodes
    #[arg(long)]
    pub no_barcode: bool,

    /// Timezone for the output file name (`local` or an IANA name)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Output file name prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

impl OutputArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut LabelConfig) {
        if self.merged {
            config.output.delivery = DeliveryMode::Merged;
        }
        if let Some(template) = self.template {
            config.layout.template = template.into();
        }
        if self.no_barcode {
            config.barcode.enabled = false;
        }
        if let Some(timezone) = &self.timezone {
            config.output.timezone = timezone.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.output.file_prefix = prefix.clone();
        }
    }
}

/// Print batch diagnostics, package the labels and write the deliverable.
///
/// Returns the written path, or `None` when the batch produced no labels.
pub fn deliver(
    report: &BatchReport,
    config: &LabelConfig,
    output_dir: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    for failure in &report.document_errors {
        eprintln!(
            "{} Could not read {}: {}",
            style("✗").red(),
            failure.document,
            failure.reason
        );
    }
    for skipped in &report.skipped {
        let location = if skipped.document.is_empty() {
            format!("row {}", skipped.page)
        } else {
            format!("{} page {}", skipped.document, skipped.page)
        };
        eprintln!(
            "{} Skipped {} ({}): {}",
            style("⚠").yellow(),
            skipped.reference,
            location,
            skipped.reason
        );
    }

    if report.outcome() == BatchOutcome::Empty {
        println!("{} {}", style("⚠").yellow(), report.summary());
        return Ok(None);
    }

    let timestamp = config.output.timestamp()?;
    let deliverable = package(&report.labels, &config.output, &timestamp)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&deliverable.filename);
    fs::write(&path, &deliverable.data)?;

    println!("{} {}", style("✓").green(), report.summary());
    println!(
        "{} Labels written to {}",
        style("✓").green(),
        path.display()
    );

    Ok(Some(path))
}
