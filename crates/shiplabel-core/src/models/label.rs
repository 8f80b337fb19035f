//! Rendered label pages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of a dual-template label pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSide {
    /// Tracking, carrier and barcode.
    A,
    /// Order number and piece position.
    B,
}

impl fmt::Display for LabelSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// One rendered label page for a single physical piece.
#[derive(Debug, Clone)]
pub struct LabelPage {
    filename: String,
    data: Vec<u8>,
    piece_index: u32,
    piece_count: u32,
    side: Option<LabelSide>,
    has_barcode: bool,
}

impl LabelPage {
    pub(crate) fn new(
        filename: String,
        data: Vec<u8>,
        piece_index: u32,
        piece_count: u32,
        side: Option<LabelSide>,
        has_barcode: bool,
    ) -> Self {
        Self {
            filename,
            data,
            piece_index,
            piece_count,
            side,
            has_barcode,
        }
    }

    /// Deterministic file name, e.g. `SO-1_2_of_3.pdf`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// PDF bytes of the page.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 1-based piece position.
    pub fn piece_index(&self) -> u32 {
        self.piece_index
    }

    /// Total pieces in the shipment.
    pub fn piece_count(&self) -> u32 {
        self.piece_count
    }

    /// Template side, `None` for the single-page template.
    pub fn side(&self) -> Option<LabelSide> {
        self.side
    }

    /// Whether a barcode image is embedded in the page.
    pub fn has_barcode(&self) -> bool {
        self.has_barcode
    }
}
