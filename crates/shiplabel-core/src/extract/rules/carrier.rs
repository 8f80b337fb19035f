//! Carrier code extraction.

use super::patterns::{CARRIER_NAME, SCAC};
use super::{first_group, ExtractionMatch, FieldExtractor};
use crate::models::config::CarrierStrategy;

/// Carrier code extractor.
pub struct CarrierExtractor {
    strategy: CarrierStrategy,
}

impl CarrierExtractor {
    /// Create a new carrier extractor using the SCAC field.
    pub fn new() -> Self {
        Self {
            strategy: CarrierStrategy::Scac,
        }
    }

    /// Set the carrier strategy.
    pub fn with_strategy(mut self, strategy: CarrierStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn scac(text: &str) -> impl Iterator<Item = ExtractionMatch<String>> + '_ {
        SCAC.captures_iter(text).filter_map(|caps| first_group(&caps))
    }

    fn carrier_name(text: &str) -> impl Iterator<Item = ExtractionMatch<String>> + '_ {
        CARRIER_NAME
            .captures_iter(text)
            .filter_map(|caps| first_group(&caps))
            .filter_map(|mut m| {
                // Keep the first word, drop descriptive trailing words
                let token = m.value.split_whitespace().next()?.to_string();
                m.value = token;
                Some(m)
            })
    }
}

impl Default for CarrierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CarrierExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        match self.strategy {
            CarrierStrategy::Scac => Self::scac(text).next(),
            CarrierStrategy::CarrierName => Self::carrier_name(text).next(),
            CarrierStrategy::ScacThenCarrierName => Self::scac(text)
                .next()
                .or_else(|| Self::carrier_name(text).next()),
        }
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        match self.strategy {
            CarrierStrategy::Scac => Self::scac(text).collect(),
            CarrierStrategy::CarrierName => Self::carrier_name(text).collect(),
            CarrierStrategy::ScacThenCarrierName => {
                Self::scac(text).chain(Self::carrier_name(text)).collect()
            }
        }
    }
}

/// Extract the carrier code with the given strategy.
pub fn extract_carrier(text: &str, strategy: CarrierStrategy) -> Option<String> {
    CarrierExtractor::new()
        .with_strategy(strategy)
        .extract(text)
        .map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Carrier: ESTES Express Lines\nSCAC: EXLA\n";

    #[test]
    fn test_scac() {
        assert_eq!(extract_carrier(TEXT, CarrierStrategy::Scac), Some("EXLA".to_string()));
        assert_eq!(extract_carrier("no carrier here", CarrierStrategy::Scac), None);
    }

    #[test]
    fn test_carrier_name_first_token() {
        assert_eq!(
            extract_carrier(TEXT, CarrierStrategy::CarrierName),
            Some("ESTES".to_string())
        );
    }

    #[test]
    fn test_scac_then_carrier_name() {
        assert_eq!(
            extract_carrier(TEXT, CarrierStrategy::ScacThenCarrierName),
            Some("EXLA".to_string())
        );
        assert_eq!(
            extract_carrier("Carrier: Old Dominion", CarrierStrategy::ScacThenCarrierName),
            Some("Old".to_string())
        );
    }
}
