//! Packaging generated labels for delivery.

mod merge;

pub use merge::merge_labels;

use tracing::info;

use crate::error::{LabelError, PackageError};
use crate::models::config::{DeliveryMode, OutputConfig};
use crate::models::label::LabelPage;

/// A packaged batch ready to hand to the user.
#[derive(Debug, Clone)]
pub struct Deliverable {
    /// File name, e.g. `shipping_labels_20240115_123005.zip`.
    pub filename: String,
    /// File contents.
    pub data: Vec<u8>,
    /// How the labels were packaged.
    pub mode: DeliveryMode,
}

impl Deliverable {
    /// MIME type of the deliverable.
    pub fn media_type(&self) -> &'static str {
        match self.mode {
            DeliveryMode::Archive => "application/zip",
            DeliveryMode::Merged => "application/pdf",
        }
    }
}

/// Bundle label PDFs into a ZIP archive, one deflated entry per label.
#[cfg(feature = "archive")]
pub fn write_archive(labels: &[LabelPage]) -> Result<Vec<u8>, PackageError> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    if labels.is_empty() {
        return Err(PackageError::Empty);
    }

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for label in labels {
        writer
            .start_file(label.filename(), options)
            .map_err(|e| PackageError::Archive(e.to_string()))?;
        writer
            .write_all(label.data())
            .map_err(|e| PackageError::Archive(e.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| PackageError::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Package labels according to `config`, naming the result with `timestamp`.
pub fn package(
    labels: &[LabelPage],
    config: &OutputConfig,
    timestamp: &str,
) -> Result<Deliverable, LabelError> {
    if labels.is_empty() {
        return Err(PackageError::Empty.into());
    }

    let (data, extension) = match config.delivery {
        DeliveryMode::Archive => (archive(labels)?, "zip"),
        DeliveryMode::Merged => (merge_labels(labels)?, "pdf"),
    };

    let filename = format!("{}_{}.{}", config.file_prefix, timestamp, extension);
    info!(
        "Packaged {} label(s) into {} ({} bytes)",
        labels.len(),
        filename,
        data.len()
    );

    Ok(Deliverable {
        filename,
        data,
        mode: config.delivery,
    })
}

#[cfg(feature = "archive")]
fn archive(labels: &[LabelPage]) -> Result<Vec<u8>, PackageError> {
    write_archive(labels)
}

#[cfg(not(feature = "archive"))]
fn archive(_labels: &[LabelPage]) -> Result<Vec<u8>, PackageError> {
    Err(PackageError::Archive(
        "built without the `archive` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shipment::ShipmentFields;
    use crate::synth::{LabelGenerator, LabelSynthesizer};
    use pretty_assertions::assert_eq;

    fn labels() -> Vec<LabelPage> {
        let fields = ShipmentFields {
            identifier: "PLS12345".to_string(),
            order_number: "SO-9988-1".to_string(),
            carrier_code: "ABCD".to_string(),
            tracking_number: "555666".to_string(),
            piece_count: 2,
        };
        LabelGenerator::new().synthesize(&fields).unwrap()
    }

    #[test]
    fn test_archive_entries_in_order() {
        let data = write_archive(&labels()).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["SO-9988-1_1_of_2.pdf", "SO-9988-1_2_of_2.pdf"]);
    }

    #[test]
    fn test_package_names() {
        let config = OutputConfig::default();
        let deliverable = package(&labels(), &config, "20240115_123005").unwrap();
        assert_eq!(deliverable.filename, "shipping_labels_20240115_123005.zip");
        assert_eq!(deliverable.media_type(), "application/zip");

        let merged = OutputConfig {
            delivery: DeliveryMode::Merged,
            file_prefix: "labels".to_string(),
            ..Default::default()
        };
        let deliverable = package(&labels(), &merged, "20240115_123005").unwrap();
        assert_eq!(deliverable.filename, "labels_20240115_123005.pdf");
        assert!(deliverable.data.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        assert!(matches!(write_archive(&[]), Err(PackageError::Empty)));
        assert!(matches!(
            package(&[], &OutputConfig::default(), "x"),
            Err(LabelError::Package(PackageError::Empty))
        ));
    }
}
