//! Configuration structures for the label pipeline.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Main configuration for the shiplabel pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Label layout configuration.
    pub layout: LayoutConfig,

    /// Barcode rendering configuration.
    pub barcode: BarcodeConfig,

    /// Packaging and delivery configuration.
    pub output: OutputConfig,
}

/// How the carrier code is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierStrategy {
    /// `SCAC: <code>`.
    #[default]
    Scac,
    /// First word of the `Carrier: <name>` line.
    CarrierName,
    /// SCAC, falling back to the carrier name line.
    ScacThenCarrierName,
}

/// How the piece count is derived. Exactly one strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceCountStrategy {
    /// `Pieces: <n>` anywhere in the text.
    #[default]
    PiecesField,
    /// Count/weight pair in the lines preceding `GRAND TOTAL`.
    GrandTotalWindow,
    /// `Shipment Number: <n>`, then `Pieces: <n>`.
    ShipmentNumberThenPieces,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Labels introducing the shipment identifier, in priority order.
    pub identifier_labels: Vec<String>,

    /// Accepted identifier code prefixes (followed by digits).
    pub identifier_prefixes: Vec<String>,

    /// Carrier code strategy.
    pub carrier_strategy: CarrierStrategy,

    /// Piece count strategy.
    pub piece_count_strategy: PieceCountStrategy,

    /// Lines above `GRAND TOTAL` scanned by the grand-total strategy.
    pub grand_total_window: usize,

    /// Largest piece count accepted from a page; larger values fall back to 1.
    pub max_piece_count: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            identifier_labels: vec![
                "BOL Number".to_string(),
                "Primary Reference".to_string(),
                "Load Number".to_string(),
            ],
            identifier_prefixes: vec!["PLS".to_string()],
            carrier_strategy: CarrierStrategy::default(),
            piece_count_strategy: PieceCountStrategy::default(),
            grand_total_window: 3,
            max_piece_count: crate::extract::DEFAULT_MAX_PIECES,
        }
    }
}

/// Label page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelTemplate {
    /// One page per piece: order, carrier, piece position, tracking + barcode.
    #[default]
    Single,
    /// Two pages per piece: A (tracking, carrier, barcode) and B (order, piece).
    Dual,
}

/// Label layout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Page template.
    pub template: LabelTemplate,
}

/// Barcode rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeConfig {
    /// Embed a Code 128 barcode when a tracking number is present.
    pub enabled: bool,

    /// Width of one module in pixels.
    pub module_width: u32,

    /// Bar height in pixels.
    pub height: u32,

    /// Blank modules on each side of the symbol.
    pub quiet_zone: u32,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            module_width: 2,
            height: 80,
            quiet_zone: 10,
        }
    }
}

/// How generated labels are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// ZIP archive with one PDF per label.
    #[default]
    Archive,
    /// One multi-page PDF in generation order.
    Merged,
}

/// Packaging and delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Delivery mode.
    pub delivery: DeliveryMode,

    /// `local` for the system zone, otherwise an IANA name such as `America/Chicago`.
    pub timezone: String,

    /// Prefix of the delivered file name.
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::default(),
            timezone: "local".to_string(),
            file_prefix: "shipping_labels".to_string(),
        }
    }
}

impl OutputConfig {
    /// Format `at` in the configured timezone as `YYYYmmdd_HHMMSS`.
    pub fn timestamp_at(&self, at: DateTime<Utc>) -> Result<String, LabelError> {
        const FORMAT: &str = "%Y%m%d_%H%M%S";

        if self.timezone.eq_ignore_ascii_case("local") {
            return Ok(at.with_timezone(&Local).format(FORMAT).to_string());
        }

        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|e| LabelError::Config(format!("unknown timezone {:?}: {}", self.timezone, e)))?;
        Ok(at.with_timezone(&tz).format(FORMAT).to_string())
    }

    /// Current wall-clock timestamp in the configured timezone.
    pub fn timestamp(&self) -> Result<String, LabelError> {
        self.timestamp_at(Utc::now())
    }
}

impl LabelConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
