//! Batch driver: documents or manual entries in, ordered labels out.
//!
//! Each `process_*` call owns its own dedup and file-name state; nothing
//! survives between calls.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::LabelError;
use crate::extract::BolParser;
use crate::models::config::LabelConfig;
use crate::models::form::ManualEntryForm;
use crate::models::label::LabelPage;
use crate::models::shipment::ShipmentFields;
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::synth::layout::file_reference;
use crate::synth::LabelGenerator;

/// Message shown when a document batch yields no shipment.
pub const NO_SHIPMENTS_MESSAGE: &str = "No valid BOLs found in the uploaded file(s).";

/// Message shown when a manual-entry form has no usable row.
pub const NO_ENTRIES_MESSAGE: &str = "No manual entries to generate labels from.";

/// An uploaded BOL document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Display name, usually the file name.
    pub name: String,
    /// Raw PDF bytes.
    pub data: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A shipment that was found but produced no labels.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedShipment {
    /// Shipment reference (order number or identifier).
    pub reference: String,
    /// Document the shipment came from, empty for manual entry.
    pub document: String,
    /// 1-based page (or form row) number.
    pub page: usize,
    /// Why no labels were produced.
    pub reason: String,
}

/// A document that could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentError {
    pub document: String,
    pub reason: String,
}

/// Where a batch's shipments came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrigin {
    #[default]
    Documents,
    ManualEntry,
}

/// Whether a batch produced anything to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    /// At least one label was generated.
    Generated,
    /// No label was generated. Not an error.
    Empty,
}

/// Result of one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Labels in generation order.
    pub labels: Vec<LabelPage>,
    /// Shipments that produced labels, in discovery order.
    pub shipments: Vec<ShipmentFields>,
    /// Shipments that were found but skipped.
    pub skipped: Vec<SkippedShipment>,
    /// Documents that could not be read.
    pub document_errors: Vec<DocumentError>,
    /// Number of documents submitted.
    pub documents: usize,
    /// Input kind.
    pub origin: BatchOrigin,
}

impl BatchReport {
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn shipment_count(&self) -> usize {
        self.shipments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.is_empty() {
            BatchOutcome::Empty
        } else {
            BatchOutcome::Generated
        }
    }

    /// One-line user-facing summary.
    pub fn summary(&self) -> String {
        match (self.outcome(), self.origin) {
            (BatchOutcome::Empty, BatchOrigin::Documents) => NO_SHIPMENTS_MESSAGE.to_string(),
            (BatchOutcome::Empty, BatchOrigin::ManualEntry) => NO_ENTRIES_MESSAGE.to_string(),
            (BatchOutcome::Generated, BatchOrigin::Documents) => format!(
                "Generated {} label(s) for {} shipment(s) from {} document(s).",
                self.label_count(),
                self.shipment_count(),
                self.documents
            ),
            (BatchOutcome::Generated, BatchOrigin::ManualEntry) => format!(
                "Generated {} label(s) for {} shipment(s).",
                self.label_count(),
                self.shipment_count()
            ),
        }
    }
}

/// Per-batch bookkeeping.
#[derive(Debug, Default)]
struct BatchState {
    /// Dedup key to the page or row where it first appeared.
    seen: HashMap<String, usize>,
    /// File references already used for label names.
    names: HashSet<String>,
}

impl BatchState {
    /// Sanitized reference, suffixed `-2`, `-3`, ... when an earlier shipment
    /// already sanitized to the same name.
    fn file_reference(&self, reference: &str) -> String {
        let base = file_reference(reference);
        if !self.names.contains(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.names.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Runs extraction, deduplication and synthesis over a batch.
pub struct BatchProcessor {
    parser: BolParser,
    generator: LabelGenerator,
}

impl BatchProcessor {
    /// Create a processor with default extraction and layout.
    pub fn new() -> Self {
        Self {
            parser: BolParser::new(),
            generator: LabelGenerator::new(),
        }
    }

    /// Create a processor from configuration.
    pub fn from_config(config: &LabelConfig) -> Result<Self, LabelError> {
        Ok(Self {
            parser: BolParser::from_config(&config.extraction)?,
            generator: LabelGenerator::from_config(config),
        })
    }

    /// Replace the field parser.
    pub fn with_parser(mut self, parser: BolParser) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the label generator.
    pub fn with_generator(mut self, generator: LabelGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Process uploaded PDF documents.
    pub fn process_documents(&self, documents: &[SourceDocument]) -> Result<BatchReport, LabelError> {
        let mut report = BatchReport {
            documents: documents.len(),
            ..Default::default()
        };
        let mut state = BatchState::default();

        for document in documents {
            let pages = PdfExtractor::from_bytes(&document.data).and_then(|pdf| pdf.extract_pages());
            match pages {
                Ok(pages) => {
                    debug!("{}: {} page(s)", document.name, pages.len());
                    self.process_pages(&document.name, &pages, &mut state, &mut report)?;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", document.name, e);
                    report.document_errors.push(DocumentError {
                        document: document.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.finish(&report);
        Ok(report)
    }

    /// Process already-extracted page texts, grouped by document name.
    pub fn process_page_texts<I, N, P>(&self, documents: I) -> Result<BatchReport, LabelError>
    where
        I: IntoIterator<Item = (N, Vec<P>)>,
        N: AsRef<str>,
        P: AsRef<str>,
    {
        let mut report = BatchReport::default();
        let mut state = BatchState::default();

        for (name, pages) in documents {
            report.documents += 1;
            self.process_pages(name.as_ref(), &pages, &mut state, &mut report)?;
        }

        self.finish(&report);
        Ok(report)
    }

    /// Generate labels from a manual-entry form, bypassing extraction.
    ///
    /// A row repeating an earlier row's reference is reported in `skipped`.
    pub fn process_form(&self, form: &ManualEntryForm) -> Result<BatchReport, LabelError> {
        let mut report = BatchReport {
            origin: BatchOrigin::ManualEntry,
            ..Default::default()
        };
        let mut state = BatchState::default();

        let rows = form
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_blank());
        for (index, entry) in rows {
            let row = index + 1;
            let fields = entry.to_fields(row)?;
            self.accept(fields, "", row, &mut state, &mut report)?;
        }

        self.finish(&report);
        Ok(report)
    }

    fn process_pages<P: AsRef<str>>(
        &self,
        document: &str,
        pages: &[P],
        state: &mut BatchState,
        report: &mut BatchReport,
    ) -> Result<(), LabelError> {
        for (index, text) in pages.iter().enumerate() {
            let result = self.parser.parse(text.as_ref());
            if !result.has_shipment() {
                debug!("{} page {}: no shipment", document, index + 1);
                continue;
            }
            for warning in &result.warnings {
                debug!("{} page {}: {}", document, index + 1, warning);
            }
            self.accept(result.fields, document, index + 1, state, report)?;
        }
        Ok(())
    }

    /// Synthesize a shipment unless its dedup key was already seen.
    fn accept(
        &self,
        fields: ShipmentFields,
        document: &str,
        page: usize,
        state: &mut BatchState,
        report: &mut BatchReport,
    ) -> Result<(), LabelError> {
        let Some(key) = fields.dedup_key() else {
            return Ok(());
        };
        if let Some(&first) = state.seen.get(key) {
            match report.origin {
                // Multi-page BOLs repeat their fields on every page
                BatchOrigin::Documents => {
                    debug!("Duplicate shipment {:?} at {} page {}", key, document, page)
                }
                BatchOrigin::ManualEntry => {
                    warn!("Row {} repeats {:?} from row {}, skipping", page, key, first);
                    report.skipped.push(SkippedShipment {
                        reference: key.to_string(),
                        document: document.to_string(),
                        page,
                        reason: format!("duplicate of row {}", first),
                    });
                }
            }
            return Ok(());
        }
        state.seen.insert(key.to_string(), page);

        let name = state.file_reference(fields.reference());
        match self.generator.synthesize_as(&fields, &name) {
            Ok(labels) => {
                if name != file_reference(fields.reference()) {
                    info!("Labels for {:?} named {:?}", fields.reference(), name);
                }
                state.names.insert(name);
                report.labels.extend(labels);
                report.shipments.push(fields);
                Ok(())
            }
            Err(e @ LabelError::Synthesis(_)) => Err(e),
            Err(e) => {
                error!("Skipping shipment {:?}: {}", fields.reference(), e);
                report.skipped.push(SkippedShipment {
                    reference: fields.reference().to_string(),
                    document: document.to_string(),
                    page,
                    reason: e.to_string(),
                });
                Ok(())
            }
        }
    }

    fn finish(&self, report: &BatchReport) {
        match report.outcome() {
            BatchOutcome::Generated => info!("{}", report.summary()),
            BatchOutcome::Empty => warn!("{}", report.summary()),
        }
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}
