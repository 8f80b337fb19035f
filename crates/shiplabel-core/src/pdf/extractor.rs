//! Per-page text extraction using lopdf and pdf-extract.

use std::cell::OnceCell;

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// Page texts are extracted on first use and cached for the lifetime of the
/// loaded document.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    pages: OnceCell<Vec<String>>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            pages: OnceCell::new(),
        }
    }

    /// Load a document and return a ready extractor.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    fn page_texts(&self) -> Result<&Vec<String>> {
        if let Some(pages) = self.pages.get() {
            return Ok(pages);
        }
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let mut pages = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        // pdf-extract may emit fewer chunks than pages for blank trailing pages
        let expected = self.page_count() as usize;
        if pages.len() < expected {
            pages.resize(expected, String::new());
        }

        debug!(
            "Extracted {} chars of text from {} pages",
            pages.iter().map(String::len).sum::<usize>(),
            pages.len()
        );
        Ok(self.pages.get_or_init(|| pages))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.pages = OnceCell::new();
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        let pages = self.page_texts()?;
        pages
            .get((page - 1) as usize)
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        self.page_texts().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for lines in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("TL", vec![16.into()]),
                Operation::new("Td", vec![50.into(), 740.into()]),
            ];
            for line in lines.iter() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_pages().is_err());
    }

    #[test]
    fn test_extract_pages() {
        let data = text_pdf(&[&["BOL Number: PLS100", "SCAC: ABCD"], &["Terms and conditions"]]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();

        assert_eq!(extractor.page_count(), 2);
        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("BOL Number: PLS100"));
        assert!(pages[0].contains("SCAC: ABCD"));
        assert!(pages[1].contains("Terms and conditions"));
        assert!(!pages[1].contains("PLS100"));
    }

    #[test]
    fn test_invalid_page() {
        let data = text_pdf(&[&["only page"]]);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();

        assert!(matches!(extractor.extract_page_text(0), Err(PdfError::InvalidPage(0))));
        assert!(matches!(extractor.extract_page_text(2), Err(PdfError::InvalidPage(2))));
        assert!(extractor.extract_page_text(1).unwrap().contains("only page"));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = PdfExtractor::from_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
