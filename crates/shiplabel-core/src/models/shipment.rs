//! Shipment fields recovered from a bill of lading.

use serde::{Deserialize, Serialize};

/// Structured shipment fields produced by extraction or manual entry.
///
/// Every text field degrades to an empty string when it is unknown.
/// `piece_count` defaults to 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentFields {
    /// Primary shipment reference (BOL/load number).
    pub identifier: String,

    /// Sales order reference, printed as the label's main text.
    pub order_number: String,

    /// Carrier SCAC code or first token of the carrier name.
    pub carrier_code: String,

    /// Carrier pro/tracking number.
    pub tracking_number: String,

    /// Number of physical pieces, one label per piece.
    pub piece_count: u32,
}

impl Default for ShipmentFields {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            order_number: String::new(),
            carrier_code: String::new(),
            tracking_number: String::new(),
            piece_count: 1,
        }
    }
}

impl ShipmentFields {
    /// Reference used in label file names: order number, else identifier.
    pub fn reference(&self) -> &str {
        if !self.order_number.is_empty() {
            &self.order_number
        } else {
            &self.identifier
        }
    }

    /// Key used to recognize the same shipment on several pages of a batch.
    pub fn dedup_key(&self) -> Option<&str> {
        let key = self.reference();
        (!key.is_empty()).then_some(key)
    }

    /// Whether the shipment carries a tracking number (and thus a barcode).
    pub fn has_tracking(&self) -> bool {
        !self.tracking_number.is_empty()
    }
}
