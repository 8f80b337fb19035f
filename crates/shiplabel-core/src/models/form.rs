//! Manual-entry form model.
//!
//! The form is plain data owned by the caller: a front end passes it in,
//! edits it through these methods and gets it back. Nothing is kept between
//! requests.

use serde::{Deserialize, Serialize};

use super::shipment::ShipmentFields;
use crate::error::SynthesisError;

/// One manually entered shipment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualEntry {
    pub order_number: String,
    pub tracking_number: String,
    pub carrier_code: String,
    /// Raw piece count as typed; validated when converted to shipment fields.
    #[serde(default = "default_piece_count")]
    pub piece_count: i64,
}

fn default_piece_count() -> i64 {
    1
}

impl Default for ManualEntry {
    fn default() -> Self {
        Self {
            order_number: String::new(),
            tracking_number: String::new(),
            carrier_code: String::new(),
            piece_count: default_piece_count(),
        }
    }
}

impl ManualEntry {
    pub fn new(
        order_number: impl Into<String>,
        tracking_number: impl Into<String>,
        carrier_code: impl Into<String>,
        piece_count: i64,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            tracking_number: tracking_number.into(),
            carrier_code: carrier_code.into(),
            piece_count,
        }
    }

    /// A row with no text in any field is an unused form line.
    pub fn is_blank(&self) -> bool {
        self.order_number.trim().is_empty()
            && self.tracking_number.trim().is_empty()
            && self.carrier_code.trim().is_empty()
    }

    /// Convert to shipment fields; `row` is the 1-based form position.
    pub fn to_fields(&self, row: usize) -> Result<ShipmentFields, SynthesisError> {
        let order_number = self.order_number.trim().to_string();
        let identifier = if order_number.is_empty() {
            format!("MANUAL-{row}")
        } else {
            String::new()
        };

        let reference = if order_number.is_empty() {
            identifier.clone()
        } else {
            order_number.clone()
        };

        let piece_count = u32::try_from(self.piece_count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(SynthesisError::InvalidPieceCount {
                reference,
                count: self.piece_count,
            })?;

        Ok(ShipmentFields {
            identifier,
            order_number,
            carrier_code: self.carrier_code.trim().to_string(),
            tracking_number: self.tracking_number.trim().to_string(),
            piece_count,
        })
    }
}

/// Ordered rows of a manual-entry submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntryForm {
    rows: Vec<ManualEntry>,
}

impl ManualEntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from existing rows.
    pub fn from_rows(rows: Vec<ManualEntry>) -> Self {
        Self { rows }
    }

    /// Append a row and return its 1-based position.
    pub fn add_row(&mut self, entry: ManualEntry) -> usize {
        self.rows.push(entry);
        self.rows.len()
    }

    /// Replace the row at 1-based `row`. Returns false if there is no such row.
    pub fn update_row(&mut self, row: usize, entry: ManualEntry) -> bool {
        match row.checked_sub(1).and_then(|i| self.rows.get_mut(i)) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Remove the row at 1-based `row`.
    pub fn remove_row(&mut self, row: usize) -> Option<ManualEntry> {
        let index = row.checked_sub(1)?;
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[ManualEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert non-blank rows to shipment fields, keeping form order.
    ///
    /// Placeholder references use the row's position in the form, so they
    /// stay stable when blank rows are skipped.
    pub fn to_shipments(&self) -> Result<Vec<ShipmentFields>, SynthesisError> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_blank())
            .map(|(i, entry)| entry.to_fields(i + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_manual_row_to_fields() {
        let entry = ManualEntry::new(" SO-1 ", "", "XYZ", 2);
        let fields = entry.to_fields(1).unwrap();

        assert_eq!(
            fields,
            ShipmentFields {
                identifier: String::new(),
                order_number: "SO-1".to_string(),
                carrier_code: "XYZ".to_string(),
                tracking_number: String::new(),
                piece_count: 2,
            }
        );
    }

    #[test]
    fn test_missing_order_number_gets_placeholder() {
        let entry = ManualEntry::new("", "123", "ABCD", 1);
        let fields = entry.to_fields(4).unwrap();
        assert_eq!(fields.identifier, "MANUAL-4");
        assert_eq!(fields.reference(), "MANUAL-4");
    }

    #[test]
    fn test_non_positive_piece_count_rejected() {
        for count in [0, -3] {
            let err = ManualEntry::new("SO-9", "", "", count).to_fields(1).unwrap_err();
            match err {
                SynthesisError::InvalidPieceCount { reference, count: c } => {
                    assert_eq!(reference, "SO-9");
                    assert_eq!(c, count);
                }
            }
        }
    }

    #[test]
    fn test_missing_piece_count_defaults_to_one() {
        let entry: ManualEntry =
            serde_json::from_str(r#"{"order_number":"SO-1","carrier_code":"XYZ"}"#).unwrap();
        assert_eq!(entry.piece_count, 1);
        assert_eq!(ManualEntry::default().piece_count, 1);
        assert_eq!(entry.to_fields(1).unwrap().piece_count, 1);
    }

    #[test]
    fn test_form_edits() {
        let mut form = ManualEntryForm::new();
        assert_eq!(form.add_row(ManualEntry::new("SO-1", "", "", 1)), 1);
        assert_eq!(form.add_row(ManualEntry::new("SO-2", "", "", 1)), 2);

        assert!(form.update_row(2, ManualEntry::new("SO-3", "", "", 5)));
        assert!(!form.update_row(0, ManualEntry::default()));
        assert!(!form.update_row(9, ManualEntry::default()));
        assert_eq!(form.rows()[1].order_number, "SO-3");

        let removed = form.remove_row(1).unwrap();
        assert_eq!(removed.order_number, "SO-1");
        assert!(form.remove_row(5).is_none());
        assert_eq!(form.len(), 1);

        form.clear();
        assert!(form.is_empty());
    }

    #[test]
    fn test_blank_rows_skipped_but_positions_kept() {
        let form = ManualEntryForm::from_rows(vec![
            ManualEntry::default(),
            ManualEntry::new("", "999", "", 1),
        ]);

        let shipments = form.to_shipments().unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].identifier, "MANUAL-2");
    }
}
