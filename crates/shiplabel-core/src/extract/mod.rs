//! Shipment field extraction from BOL page text.

mod parser;
pub mod rules;

pub use parser::{BolParser, ExtractionResult, DEFAULT_MAX_PIECES};

use crate::models::shipment::ShipmentFields;

/// Trait for shipment field extractors.
///
/// Extraction is total: a field that cannot be found is left empty and the
/// piece count falls back to 1.
pub trait ShipmentExtractor {
    /// Extract shipment fields from the plain text of one page.
    fn extract(&self, text: &str) -> ShipmentFields;
}
