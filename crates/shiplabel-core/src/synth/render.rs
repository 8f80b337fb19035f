//! Single-page PDF writer for label layouts.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::layout::{PageLayout, BARCODE_HEIGHT, BARCODE_WIDTH, PAGE_HEIGHT, PAGE_WIDTH};
use crate::barcode::BarcodeImage;
use crate::error::PdfError;

const FONT: &str = "F1";
const BARCODE: &str = "Im1";

/// Render `layout` as a standalone one-page PDF.
///
/// `barcode` is drawn only when the layout reserves a barcode rectangle.
pub(crate) fn render_page(
    layout: &PageLayout,
    barcode: Option<&BarcodeImage>,
) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut operations = Vec::new();
    for block in &layout.blocks {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT.into(), block.size.into()]),
            Operation::new("Td", vec![block.x().into(), (PAGE_HEIGHT - block.baseline).into()]),
            Operation::new("Tj", vec![Object::string_literal(block.text.as_str())]),
            Operation::new("ET", vec![]),
        ]);
    }

    let mut resources = dictionary! {
        "Font" => dictionary! { FONT => font_id },
    };

    if let (Some(top), Some(barcode)) = (layout.barcode_top, barcode) {
        let image_id = doc.add_object(image_stream(barcode)?);
        resources.set("XObject", dictionary! { BARCODE => image_id });

        let bottom = PAGE_HEIGHT - top - BARCODE_HEIGHT;
        operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    BARCODE_WIDTH.into(),
                    0.into(),
                    0.into(),
                    BARCODE_HEIGHT.into(),
                    PageLayout::barcode_x().into(),
                    bottom.into(),
                ],
            ),
            Operation::new("Do", vec![BARCODE.into()]),
            Operation::new("Q", vec![]),
        ]);
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| PdfError::Write(e.to_string()))?;
    let mut content = Stream::new(dictionary! {}, content);
    content
        .compress()
        .map_err(|e| PdfError::Write(e.to_string()))?;
    let content_id = doc.add_object(content);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    Ok(out)
}

/// 8-bit DeviceGray image XObject, Flate-compressed.
fn image_stream(barcode: &BarcodeImage) -> Result<Stream, PdfError> {
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => barcode.width() as i64,
        "Height" => barcode.height() as i64,
        "ColorSpace" => "DeviceGray",
        "BitsPerComponent" => 8,
    };

    let mut stream = Stream::new(dict, barcode.pixels().to_vec());
    stream
        .compress()
        .map_err(|e| PdfError::Write(e.to_string()))?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode;
    use crate::models::config::BarcodeConfig;
    use crate::models::shipment::ShipmentFields;
    use crate::synth::layout::single_page;

    fn fields(tracking: &str) -> ShipmentFields {
        ShipmentFields {
            identifier: "PLS12345".to_string(),
            order_number: "SO-9988-1".to_string(),
            carrier_code: "ABCD".to_string(),
            tracking_number: tracking.to_string(),
            piece_count: 2,
        }
    }

    fn page_xobjects(data: &[u8]) -> usize {
        let doc = Document::load_mem(data).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page = doc.get_dictionary(pages[&1]).unwrap();
        let media_box = doc.get_dictionary(page.get(b"Parent").unwrap().as_reference().unwrap())
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(media_box[2].as_float().unwrap(), 792.0);
        assert_eq!(media_box[3].as_float().unwrap(), 612.0);

        page.get(b"Resources")
            .and_then(Object::as_dict)
            .ok()
            .and_then(|res| res.get(b"XObject").and_then(Object::as_dict).ok())
            .map(|xobjects| xobjects.len())
            .unwrap_or(0)
    }

    #[test]
    fn test_render_text_page() {
        let layout = single_page(&fields(""), 1, 2, false);
        let data = render_page(&layout, None).unwrap();

        assert!(data.starts_with(b"%PDF-1.5"));
        assert_eq!(page_xobjects(&data), 0);

        let text = pdf_extract::extract_text_from_mem(&data).unwrap();
        assert!(text.contains("SALES ORDER: SO-9988-1"));
        assert!(text.contains("SCAC: ABCD"));
        assert!(text.contains("PIECE 1 of 2"));
    }

    #[test]
    fn test_render_with_barcode() {
        let fields = fields("555666");
        let barcode = barcode::generate(&fields.tracking_number, &BarcodeConfig::default()).unwrap();
        let layout = single_page(&fields, 2, 2, true);
        let data = render_page(&layout, Some(&barcode)).unwrap();

        assert_eq!(page_xobjects(&data), 1);
        let text = pdf_extract::extract_text_from_mem(&data).unwrap();
        assert!(text.contains("PRO: 555666"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let layout = single_page(&fields("1"), 1, 1, false);
        assert_eq!(render_page(&layout, None).unwrap(), render_page(&layout, None).unwrap());
    }
}
