//! Sales order and pro number extraction.

use regex::Regex;

use super::patterns::{PRO_NUMBER, SALES_ORDER};
use super::{first_group, ExtractionMatch, FieldExtractor};

/// Extractor for a single `Label: value` field.
pub struct LabeledField {
    pattern: &'static Regex,
}

impl LabeledField {
    /// `Sales Order: SO-…`.
    pub fn order_number() -> Self {
        Self {
            pattern: &SALES_ORDER,
        }
    }

    /// `Pro Number: <digits>`.
    pub fn tracking_number() -> Self {
        Self {
            pattern: &PRO_NUMBER,
        }
    }
}

impl FieldExtractor for LabeledField {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .captures(text)
            .and_then(|caps| first_group(&caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| first_group(&caps))
            .collect()
    }
}

/// Extract the sales order number.
pub fn extract_order_number(text: &str) -> Option<String> {
    LabeledField::order_number().extract(text).map(|m| m.value)
}

/// Extract the pro (tracking) number.
pub fn extract_tracking_number(text: &str) -> Option<String> {
    LabeledField::tracking_number().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_order_with_suffix() {
        assert_eq!(
            extract_order_number("Sales Order: SO-9988-1 Ship Date"),
            Some("SO-9988-1".to_string())
        );
        assert_eq!(extract_order_number("Sales Order: 9988"), None);
    }

    #[test]
    fn test_pro_number_digits_only() {
        assert_eq!(
            extract_tracking_number("Pro Number: 555666X"),
            Some("555666".to_string())
        );
        assert_eq!(extract_tracking_number("Pro Number: pending"), None);
    }

    #[test]
    fn test_extract_all() {
        let all = LabeledField::order_number().extract_all("Sales Order: SO-1\nSales Order: SO-2");
        let values: Vec<_> = all.into_iter().map(|m| m.value).collect();
        assert_eq!(values, vec!["SO-1", "SO-2"]);
    }
}
