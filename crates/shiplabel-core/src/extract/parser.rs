//! Bill-of-lading parser combining the field rules.

use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::config::{CarrierStrategy, ExtractionConfig, PieceCountStrategy};
use crate::models::shipment::ShipmentFields;

use super::rules::{
    CarrierExtractor, ExtractionMatch, FieldExtractor, IdentifierExtractor, LabeledField,
    PieceCountExtractor,
};
use super::ShipmentExtractor;

/// Result of parsing one page of text.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted shipment fields.
    pub fields: ShipmentFields,
    /// Matched source text per field name.
    pub sources: BTreeMap<&'static str, ExtractionMatch<String>>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in microseconds (always 0 on wasm32).
    pub processing_time_us: u64,
}

impl ExtractionResult {
    /// Whether the page carries a shipment (an identifier was found).
    pub fn has_shipment(&self) -> bool {
        !self.fields.identifier.is_empty()
    }
}

/// Rule-based BOL parser.
pub struct BolParser {
    identifier: IdentifierExtractor,
    carrier: CarrierExtractor,
    order_number: LabeledField,
    tracking_number: LabeledField,
    pieces: PieceCountExtractor,
    max_pieces: u32,
}

/// Default ceiling for an extracted piece count.
pub const DEFAULT_MAX_PIECES: u32 = 999;

impl BolParser {
    /// Create a new parser with the canonical rule chain.
    pub fn new() -> Self {
        Self {
            identifier: IdentifierExtractor::new(),
            carrier: CarrierExtractor::new(),
            order_number: LabeledField::order_number(),
            tracking_number: LabeledField::tracking_number(),
            pieces: PieceCountExtractor::new(),
            max_pieces: DEFAULT_MAX_PIECES,
        }
    }

    /// Build a parser from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let identifier = IdentifierExtractor::with_labels(
            &config.identifier_labels,
            &config.identifier_prefixes,
        )?;

        Ok(Self::new()
            .with_identifier_extractor(identifier)
            .with_carrier_strategy(config.carrier_strategy)
            .with_piece_count_strategy(config.piece_count_strategy, config.grand_total_window)
            .with_max_pieces(config.max_piece_count))
    }

    /// Replace the identifier rule chain.
    pub fn with_identifier_extractor(mut self, identifier: IdentifierExtractor) -> Self {
        self.identifier = identifier;
        self
    }

    /// Set the carrier strategy.
    pub fn with_carrier_strategy(mut self, strategy: CarrierStrategy) -> Self {
        self.carrier = CarrierExtractor::new().with_strategy(strategy);
        self
    }

    /// Set the piece count strategy and the grand-total window size.
    pub fn with_piece_count_strategy(mut self, strategy: PieceCountStrategy, window: usize) -> Self {
        self.pieces = PieceCountExtractor::new()
            .with_strategy(strategy)
            .with_window(window);
        self
    }

    /// Set the largest accepted piece count.
    pub fn with_max_pieces(mut self, max_pieces: u32) -> Self {
        self.max_pieces = max_pieces;
        self
    }

    /// Parse one page of text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        // Instant is unavailable on wasm32-unknown-unknown
        #[cfg(not(target_arch = "wasm32"))]
        let start = Instant::now();
        let mut sources = BTreeMap::new();
        let mut warnings = Vec::new();

        let mut take = |name: &'static str, found: Option<ExtractionMatch<String>>| -> String {
            match found {
                Some(m) => {
                    let value = m.value.clone();
                    sources.insert(name, m);
                    value
                }
                None => String::new(),
            }
        };

        let identifier = take("identifier", self.identifier.extract(text));
        let carrier_code = take("carrier_code", self.carrier.extract(text));
        let order_number = take("order_number", self.order_number.extract(text));
        let tracking_number = take("tracking_number", self.tracking_number.extract(text));
        let raw_pieces = take("piece_count", self.pieces.extract(text));

        let piece_count = if raw_pieces.is_empty() {
            1
        } else {
            match raw_pieces.parse::<u32>() {
                Ok(n) if n > 0 && n <= self.max_pieces => n,
                Ok(n) if n > self.max_pieces => {
                    warn!("Piece count {} exceeds {}, using 1", n, self.max_pieces);
                    warnings.push(format!(
                        "piece count {} exceeds the limit of {}, using 1",
                        n, self.max_pieces
                    ));
                    1
                }
                _ => {
                    warn!("Piece count {:?} is not a positive number, using 1", raw_pieces);
                    warnings.push(format!(
                        "piece count {:?} is not a positive number, using 1",
                        raw_pieces
                    ));
                    1
                }
            }
        };

        if identifier.is_empty() {
            warnings.push("no shipment identifier found".to_string());
        }
        if order_number.is_empty() {
            warnings.push("no sales order found".to_string());
        }

        let fields = ShipmentFields {
            identifier,
            order_number,
            carrier_code,
            tracking_number,
            piece_count,
        };

        debug!(
            "Extracted {:?} (order {:?}, {} piece(s)) from {} chars",
            fields.identifier,
            fields.order_number,
            fields.piece_count,
            text.len()
        );

        #[cfg(not(target_arch = "wasm32"))]
        let processing_time_us = start.elapsed().as_micros() as u64;
        #[cfg(target_arch = "wasm32")]
        let processing_time_us = 0;

        ExtractionResult {
            fields,
            sources,
            warnings,
            processing_time_us,
        }
    }
}

impl Default for BolParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentExtractor for BolParser {
    fn extract(&self, text: &str) -> ShipmentFields {
        self.parse(text).fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOL_PAGE: &str = r#"
        STRAIGHT BILL OF LADING - SHORT FORM
        BOL Number: PLS12345          Ship Date: 01/15/2024
        Carrier: ABCD Freight Systems
        SCAC: ABCD
        Sales Order: SO-9988-1
        Pro Number: 555666
        Pieces: 3
        HANDLING UNITS   WEIGHT   DESCRIPTION
    "#;

    #[test]
    fn test_parse_full_page() {
        let result = BolParser::new().parse(BOL_PAGE);

        assert_eq!(
            result.fields,
            ShipmentFields {
                identifier: "PLS12345".to_string(),
                order_number: "SO-9988-1".to_string(),
                carrier_code: "ABCD".to_string(),
                tracking_number: "555666".to_string(),
                piece_count: 3,
            }
        );
        assert!(result.warnings.is_empty());
        assert!(result.has_shipment());
        assert_eq!(result.sources["identifier"].source, "BOL Number: PLS12345");
    }

    #[test]
    fn test_no_identifier_is_not_a_shipment() {
        let result = BolParser::new().parse("Page 2 of 2\nTerms and conditions");

        assert_eq!(result.fields, ShipmentFields::default());
        assert!(!result.has_shipment());
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_zero_piece_count_clamped() {
        let result = BolParser::new().parse("BOL Number: PLS1\nPieces: 0");
        assert_eq!(result.fields.piece_count, 1);
        assert!(result.warnings.iter().any(|w| w.contains("piece count")));

        let huge = BolParser::new().parse("BOL Number: PLS1\nPieces: 99999999999");
        assert_eq!(huge.fields.piece_count, 1);
    }

    #[test]
    fn test_piece_count_above_limit_clamped() {
        let result = BolParser::new().parse("BOL Number: PLS1\nPieces: 125000");
        assert_eq!(result.fields.piece_count, 1);
        assert!(result.warnings.iter().any(|w| w.contains("exceeds the limit of 999")));

        let parser = BolParser::new().with_max_pieces(5);
        assert_eq!(parser.extract("BOL Number: PLS1\nPieces: 5").piece_count, 5);
        assert_eq!(parser.extract("BOL Number: PLS1\nPieces: 6").piece_count, 1);
    }

    #[test]
    fn test_missing_pieces_defaults_to_one() {
        let text = "BOL Number: PLS7\nSales Order: SO-1";
        assert_eq!(BolParser::new().extract(text).piece_count, 1);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let parser = BolParser::new();
        assert_eq!(parser.extract(BOL_PAGE), parser.extract(BOL_PAGE));
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            identifier_prefixes: vec!["PLS".to_string(), "LD".to_string()],
            carrier_strategy: CarrierStrategy::CarrierName,
            piece_count_strategy: PieceCountStrategy::GrandTotalWindow,
            max_piece_count: 2,
            ..Default::default()
        };
        let parser = BolParser::from_config(&config).unwrap();
        assert_eq!(parser.extract("BOL Number: PLS1\n3 640 GRAND TOTAL").piece_count, 1);

        let text = "Load Number: LD42\nCarrier: Saia LTL Freight\n2 640 GRAND TOTAL";
        let fields = parser.extract(text);
        assert_eq!(fields.identifier, "LD42");
        assert_eq!(fields.carrier_code, "Saia");
        assert_eq!(fields.piece_count, 2);
    }

    #[test]
    fn test_from_config_rejects_empty_labels() {
        let config = ExtractionConfig {
            identifier_labels: Vec::new(),
            ..Default::default()
        };
        assert!(BolParser::from_config(&config).is_err());
    }
}
