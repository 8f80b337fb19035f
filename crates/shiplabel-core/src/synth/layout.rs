//! Fixed label geometry, text metrics and file naming.
//!
//! All coordinates are PDF points. Baselines and rectangle tops are measured
//! from the top edge of the page; the renderer flips them.

use crate::models::label::LabelSide;
use crate::models::shipment::ShipmentFields;

/// Landscape letter width (11 in).
pub const PAGE_WIDTH: f32 = 792.0;
/// Landscape letter height (8.5 in).
pub const PAGE_HEIGHT: f32 = 612.0;

/// Barcode rectangle width (6 in).
pub const BARCODE_WIDTH: f32 = 432.0;
/// Barcode rectangle height (1.5 in).
pub const BARCODE_HEIGHT: f32 = 108.0;

const HEADLINE: f32 = 60.0;

/// Helvetica-Bold advance widths for ASCII 32..=126, per 1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 278, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    278, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// One line of centered text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Printable ASCII text.
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Baseline distance from the top edge.
    pub baseline: f32,
}

impl TextBlock {
    fn new(text: &str, size: f32, baseline: f32) -> Self {
        Self {
            text: sanitize_text(text),
            size,
            baseline,
        }
    }

    /// Left edge that centers the block on the page.
    pub fn x(&self) -> f32 {
        (PAGE_WIDTH - text_width(&self.text, self.size)) / 2.0
    }
}

/// Content of one label page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Text lines, top to bottom.
    pub blocks: Vec<TextBlock>,
    /// Top edge of the barcode rectangle, when the page carries one.
    pub barcode_top: Option<f32>,
}

impl PageLayout {
    /// Left edge of the horizontally centered barcode rectangle.
    pub fn barcode_x() -> f32 {
        (PAGE_WIDTH - BARCODE_WIDTH) / 2.0
    }
}

/// Single template page for piece `index` of `count`.
pub fn single_page(fields: &ShipmentFields, index: u32, count: u32, barcode: bool) -> PageLayout {
    let mut blocks = vec![
        TextBlock::new(&format!("SALES ORDER: {}", fields.order_number), HEADLINE, 150.0),
        TextBlock::new(&format!("SCAC: {}", fields.carrier_code), HEADLINE, 255.0),
        TextBlock::new(&format!("PIECE {} of {}", index, count), HEADLINE, 360.0),
    ];

    if fields.has_tracking() {
        blocks.push(TextBlock::new(
            &format!("PRO: {}", fields.tracking_number),
            28.0,
            410.0,
        ));
    }

    PageLayout {
        blocks,
        barcode_top: barcode.then_some(440.0),
    }
}

/// Dual template pages A and B for piece `index` of `count`.
pub fn dual_pages(
    fields: &ShipmentFields,
    index: u32,
    count: u32,
    barcode: bool,
) -> (PageLayout, PageLayout) {
    let headline = if fields.has_tracking() {
        &fields.tracking_number
    } else {
        &fields.identifier
    };

    let side_a = PageLayout {
        blocks: vec![
            TextBlock::new(headline, 72.0, 170.0),
            TextBlock::new(&format!("SCAC: {}", fields.carrier_code), HEADLINE, 280.0),
        ],
        barcode_top: barcode.then_some(330.0),
    };

    let side_b = PageLayout {
        blocks: vec![
            TextBlock::new(&format!("SALES ORDER: {}", fields.order_number), HEADLINE, 230.0),
            TextBlock::new(&format!("PIECE {} of {}", index, count), HEADLINE, 350.0),
        ],
        barcode_top: None,
    };

    (side_a, side_b)
}

/// Replace characters outside printable ASCII with `?`.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, ' '..='~') { c } else { '?' })
        .collect()
}

/// Advance width of `text` set in Helvetica-Bold at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .bytes()
        .map(|b| match b {
            32..=126 => HELVETICA_BOLD_WIDTHS[(b - 32) as usize] as u32,
            _ => HELVETICA_BOLD_WIDTHS[(b'?' - 32) as usize] as u32,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Filesystem-safe form of a shipment reference; empty becomes `label`.
///
/// Distinct references can map to the same value, so batch callers must
/// keep the result unique themselves.
pub fn file_reference(reference: &str) -> String {
    if reference.is_empty() {
        "label".to_string()
    } else {
        sanitize_filename(reference)
    }
}

/// File name for one label page.
pub fn label_filename(reference: &str, side: Option<LabelSide>, index: u32, count: u32) -> String {
    let reference = file_reference(reference);

    match side {
        Some(side) => format!("{}_{}_{}_of_{}.pdf", reference, side, index, count),
        None => format!("{}_{}_of_{}.pdf", reference, index, count),
    }
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields() -> ShipmentFields {
        ShipmentFields {
            identifier: "PLS12345".to_string(),
            order_number: "SO-9988-1".to_string(),
            carrier_code: "ABCD".to_string(),
            tracking_number: "555666".to_string(),
            piece_count: 3,
        }
    }

    #[test]
    fn test_text_width() {
        // P=667 I=278 E=667 C=722 E=667 space=278 digit=556 ...
        assert_eq!(text_width("PIECE", 1000.0), 3001.0);
        assert_eq!(text_width("", 60.0), 0.0);
        assert_eq!(text_width("1", 100.0), 55.6);
    }

    #[test]
    fn test_text_is_centered() {
        let block = TextBlock::new("SCAC: ABCD", 60.0, 255.0);
        let width = text_width("SCAC: ABCD", 60.0);
        assert!((block.x() * 2.0 + width - PAGE_WIDTH).abs() < 0.001);
    }

    #[test]
    fn test_single_page_layout() {
        let page = single_page(&fields(), 2, 3, true);
        let texts: Vec<_> = page.blocks.iter().map(|b| b.text.as_str()).collect();

        assert_eq!(
            texts,
            vec!["SALES ORDER: SO-9988-1", "SCAC: ABCD", "PIECE 2 of 3", "PRO: 555666"]
        );
        assert_eq!(page.blocks[0].baseline, 150.0);
        assert_eq!(page.blocks[3].size, 28.0);
        assert_eq!(page.barcode_top, Some(440.0));
    }

    #[test]
    fn test_single_page_without_tracking() {
        let mut fields = fields();
        fields.tracking_number.clear();
        let page = single_page(&fields, 1, 1, false);

        assert_eq!(page.blocks.len(), 3);
        assert_eq!(page.barcode_top, None);
    }

    #[test]
    fn test_dual_pages_layout() {
        let (a, b) = dual_pages(&fields(), 1, 3, true);
        assert_eq!(a.blocks[0].text, "555666");
        assert_eq!(a.blocks[0].size, 72.0);
        assert_eq!(a.barcode_top, Some(330.0));
        assert_eq!(b.blocks[1].text, "PIECE 1 of 3");
        assert_eq!(b.barcode_top, None);

        let mut no_pro = fields();
        no_pro.tracking_number.clear();
        let (a, _) = dual_pages(&no_pro, 1, 3, false);
        assert_eq!(a.blocks[0].text, "PLS12345");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("SO-1 (ok)"), "SO-1 (ok)");
        assert_eq!(sanitize_text("Łódź\t1"), "??d??1");
    }

    #[test]
    fn test_label_filename() {
        assert_eq!(label_filename("SO-9988-1", None, 1, 3), "SO-9988-1_1_of_3.pdf");
        assert_eq!(
            label_filename("SO-9988-1", Some(LabelSide::B), 2, 3),
            "SO-9988-1_B_2_of_3.pdf"
        );
        assert_eq!(label_filename("SO 1/2", None, 1, 1), "SO_1_2_1_of_1.pdf");
        assert_eq!(label_filename("", None, 1, 1), "label_1_of_1.pdf");
    }

    #[test]
    fn test_file_reference_is_idempotent() {
        assert_eq!(file_reference("SO 1"), "SO_1");
        assert_eq!(file_reference("SO/1"), "SO_1");
        assert_eq!(file_reference(&file_reference("SO 1")), "SO_1");
        assert_eq!(label_filename("SO_1-2", None, 1, 1), "SO_1-2_1_of_1.pdf");
    }
}
