//! Shipment identifier (BOL / load number) extraction.

use regex::Regex;

use super::patterns::{BOL_NUMBER, LOAD_NUMBER, PRIMARY_REFERENCE};
use super::{first_group, ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;

/// Identifier extractor trying labeled patterns in priority order.
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    rules: Vec<Regex>,
}

impl IdentifierExtractor {
    /// The `BOL Number` / `Primary Reference` / `Load Number` chain for `PLS` codes.
    pub fn new() -> Self {
        Self {
            rules: vec![
                BOL_NUMBER.clone(),
                PRIMARY_REFERENCE.clone(),
                LOAD_NUMBER.clone(),
            ],
        }
    }

    /// Build a chain from custom labels (priority order) and code prefixes.
    pub fn with_labels<L, P>(labels: &[L], prefixes: &[P]) -> Result<Self, ExtractionError>
    where
        L: AsRef<str>,
        P: AsRef<str>,
    {
        if labels.is_empty() {
            return Err(invalid("at least one label is required"));
        }
        if prefixes.is_empty() || prefixes.iter().any(|p| p.as_ref().trim().is_empty()) {
            return Err(invalid("prefixes must be non-empty"));
        }

        let prefixes = prefixes
            .iter()
            .map(|p| regex::escape(p.as_ref().trim()))
            .collect::<Vec<_>>()
            .join("|");

        let rules = labels
            .iter()
            .map(|label| {
                let pattern = format!(
                    r"{}:\s*((?:{})\d+)",
                    regex::escape(label.as_ref().trim()),
                    prefixes
                );
                Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }
}

fn invalid(reason: &str) -> ExtractionError {
    ExtractionError::InvalidPattern {
        field: "identifier".to_string(),
        reason: reason.to_string(),
    }
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IdentifierExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // Rule order wins over position in the text
        self.rules
            .iter()
            .find_map(|rule| rule.captures(text).and_then(|caps| first_group(&caps)))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.rules
            .iter()
            .flat_map(|rule| rule.captures_iter(text))
            .filter_map(|caps| first_group(&caps))
            .collect()
    }
}

/// Extract the shipment identifier with the default rule chain.
pub fn extract_identifier(text: &str) -> Option<String> {
    IdentifierExtractor::new().extract(text).map(|m| m.value)
}
