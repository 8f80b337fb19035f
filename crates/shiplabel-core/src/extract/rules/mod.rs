//! Rule-based field extractors for bill-of-lading text.

pub mod carrier;
pub mod identifier;
pub mod patterns;
pub mod pieces;
pub mod references;

pub use carrier::{extract_carrier, CarrierExtractor};
pub use identifier::{extract_identifier, IdentifierExtractor};
pub use patterns::*;
pub use pieces::PieceCountExtractor;
pub use references::{extract_order_number, extract_tracking_number, LabeledField};

use serde::Serialize;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched field value with the text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Build a match from capture group 1 of `caps`.
pub(crate) fn first_group(caps: &regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
    let value = caps.get(1)?;
    let full_match = caps.get(0)?;
    Some(
        ExtractionMatch::new(value.as_str().trim().to_string(), full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}
