//! Common regex patterns for bill-of-lading text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Shipment identifier, default `PLS` code space, in priority order
    pub static ref BOL_NUMBER: Regex = Regex::new(
        r"BOL Number:\s*((?:PLS)\d+)"
    ).unwrap();

    pub static ref PRIMARY_REFERENCE: Regex = Regex::new(
        r"Primary Reference:\s*((?:PLS)\d+)"
    ).unwrap();

    pub static ref LOAD_NUMBER: Regex = Regex::new(
        r"Load Number:\s*((?:PLS)\d+)"
    ).unwrap();

    // Carrier
    pub static ref SCAC: Regex = Regex::new(
        r"SCAC:\s*(\w+)"
    ).unwrap();

    pub static ref CARRIER_NAME: Regex = Regex::new(
        r"Carrier:\s*([^\r\n]+)"
    ).unwrap();

    // References
    pub static ref SALES_ORDER: Regex = Regex::new(
        r"Sales Order:\s*(SO-\d+[\w-]*)"
    ).unwrap();

    pub static ref PRO_NUMBER: Regex = Regex::new(
        r"Pro Number:\s*(\d+)"
    ).unwrap();

    // Piece count
    pub static ref PIECES: Regex = Regex::new(
        r"(?i)\bPieces\s*[:#=-]?\s*(\d+)"
    ).unwrap();

    pub static ref SHIPMENT_NUMBER: Regex = Regex::new(
        r"(?i)\bShipment\s+Number\s*[:#]?\s*(\d+)"
    ).unwrap();

    pub static ref GRAND_TOTAL: Regex = Regex::new(
        r"(?i)GRAND\s+TOTAL"
    ).unwrap();

    // Count followed by a weight (3+ digits) at the end of the scanned text
    pub static ref COUNT_WEIGHT_PAIR: Regex = Regex::new(
        r"(?:^|\s)(\d+)\s+(\d{3,})\s*$"
    ).unwrap();
}
