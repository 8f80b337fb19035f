//! Core library for bill-of-lading shipping labels.
//!
//! This crate provides:
//! - PDF text extraction per page
//! - Rule-based shipment field extraction (identifier, order, carrier, pro number, pieces)
//! - Fixed-layout label synthesis with Code 128 barcodes
//! - Packaging as a ZIP archive or a merged PDF
//! - A batch driver with per-batch deduplication

pub mod barcode;
pub mod batch;
pub mod error;
pub mod extract;
pub mod models;
pub mod package;
pub mod pdf;
pub mod synth;

pub use barcode::BarcodeImage;
pub use batch::{BatchOutcome, BatchProcessor, BatchReport, SourceDocument};
pub use error::{LabelError, Result};
pub use extract::{BolParser, ExtractionResult, ShipmentExtractor};
pub use models::config::{DeliveryMode, LabelConfig, LabelTemplate};
pub use models::form::{ManualEntry, ManualEntryForm};
pub use models::label::{LabelPage, LabelSide};
pub use models::shipment::ShipmentFields;
pub use package::{package, Deliverable};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use synth::{LabelGenerator, LabelSynthesizer};
