//! Piece count extraction strategies.
//!
//! The extractor returns the raw digits; turning them into a positive count
//! (and clamping bad values) is the parser's job.

use super::patterns::{COUNT_WEIGHT_PAIR, GRAND_TOTAL, PIECES, SHIPMENT_NUMBER};
use super::{first_group, ExtractionMatch, FieldExtractor};
use crate::models::config::PieceCountStrategy;

/// Piece count extractor.
pub struct PieceCountExtractor {
    strategy: PieceCountStrategy,
    window: usize,
}

impl PieceCountExtractor {
    /// Create a new extractor using the `Pieces` field.
    pub fn new() -> Self {
        Self {
            strategy: PieceCountStrategy::PiecesField,
            window: 3,
        }
    }

    /// Set the piece count strategy.
    pub fn with_strategy(mut self, strategy: PieceCountStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set how many lines above `GRAND TOTAL` are scanned.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    fn pieces_field(text: &str) -> Option<ExtractionMatch<String>> {
        PIECES.captures(text).and_then(|caps| first_group(&caps))
    }

    fn shipment_number(text: &str) -> Option<ExtractionMatch<String>> {
        SHIPMENT_NUMBER
            .captures(text)
            .and_then(|caps| first_group(&caps))
    }

    /// Count/weight pair right before the first `GRAND TOTAL`.
    fn grand_total_window(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let lines: Vec<&str> = text.lines().collect();
        let (index, total) = lines
            .iter()
            .enumerate()
            .find_map(|(i, line)| GRAND_TOTAL.find(line).map(|m| (i, m)))?;

        let start = index.saturating_sub(self.window);
        let mut scope: Vec<&str> = lines[start..index].to_vec();
        scope.push(&lines[index][..total.start()]);
        let scope = scope.join("\n");

        let caps = COUNT_WEIGHT_PAIR.captures(&scope)?;
        let count = caps.get(1)?;
        let weight = caps.get(2)?;
        Some(ExtractionMatch::new(
            count.as_str().to_string(),
            format!("{} {} {}", count.as_str(), weight.as_str(), total.as_str()),
        ))
    }
}

impl Default for PieceCountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PieceCountExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        match self.strategy {
            PieceCountStrategy::PiecesField => Self::pieces_field(text),
            PieceCountStrategy::GrandTotalWindow => self.grand_total_window(text),
            PieceCountStrategy::ShipmentNumberThenPieces => {
                Self::shipment_number(text).or_else(|| Self::pieces_field(text))
            }
        }
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        match self.strategy {
            PieceCountStrategy::PiecesField => PIECES
                .captures_iter(text)
                .filter_map(|caps| first_group(&caps))
                .collect(),
            _ => self.extract(text).into_iter().collect(),
        }
    }
}
