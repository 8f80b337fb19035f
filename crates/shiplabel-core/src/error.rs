//! Error types for the shiplabel-core library.

use thiserror::Error;

/// Main error type for the shiplabel library.
#[derive(Error, Debug)]
pub enum LabelError {
    /// PDF reading or writing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Field extraction setup error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Label synthesis error.
    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Barcode encoding error.
    #[error("barcode error: {0}")]
    Barcode(#[from] BarcodeError),

    /// Archive or merged-document packaging error.
    #[error("packaging error: {0}")]
    Package(#[from] PackageError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// Failed to serialize a generated PDF.
    #[error("failed to write PDF: {0}")]
    Write(String),
}

/// Errors raised while building field extractors.
///
/// Extraction itself never fails; a missing field is an empty value.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A configured label or prefix produced an unusable pattern.
    #[error("invalid pattern for {field}: {reason}")]
    InvalidPattern { field: String, reason: String },
}

/// Errors related to label synthesis.
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Piece count is zero, negative or out of range.
    #[error("invalid piece count {count} for shipment {reference:?}")]
    InvalidPieceCount { reference: String, count: i64 },
}

/// Errors related to Code 128 encoding.
#[derive(Error, Debug)]
pub enum BarcodeError {
    /// Nothing to encode.
    #[error("barcode payload is empty")]
    EmptyPayload,

    /// The payload holds a character Code 128 cannot represent.
    #[error("character {character:?} at position {position} cannot be encoded as Code 128")]
    UnsupportedCharacter { character: char, position: usize },

    /// The raster could not be produced or encoded.
    #[error("failed to render barcode image: {0}")]
    Raster(String),
}

/// Errors related to packaging labels for delivery.
#[derive(Error, Debug)]
pub enum PackageError {
    /// There are no labels to package.
    #[error("no labels to package")]
    Empty,

    /// Failed to build the ZIP archive.
    #[error("failed to build archive: {0}")]
    Archive(String),

    /// Failed to merge label pages into one document.
    #[error("failed to merge labels: {0}")]
    Merge(String),
}

/// Result type for the shiplabel library.
pub type Result<T> = std::result::Result<T, LabelError>;
