//! WASM bindings for shipping label generation.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Documents are passed in as byte arrays and labels come back as a single
//! ZIP or PDF buffer; nothing is stored between calls.

use wasm_bindgen::prelude::*;

use shiplabel_core::models::config::{DeliveryMode, LabelConfig};
use shiplabel_core::{
    package, BatchProcessor, BatchReport, BolParser, LabelError, ManualEntry, ManualEntryForm,
    SourceDocument,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Extract shipment fields from the text of one BOL page.
///
/// Returns `{ fields, warnings }`.
#[wasm_bindgen]
pub fn extract_fields(text: &str) -> Result<JsValue, JsValue> {
    let result = BolParser::new().parse(text);

    #[derive(serde::Serialize)]
    struct ExtractResult {
        fields: shiplabel_core::ShipmentFields,
        warnings: Vec<String>,
    }

    let output = ExtractResult {
        fields: result.fields,
        warnings: result.warnings,
    };

    serde_wasm_bindgen::to_value(&output).map_err(js_error)
}

/// Generate labels from BOL PDFs, delivered as a ZIP archive.
///
/// `documents` is an array of `{ name: string, data: Uint8Array }`.
/// `config` is optional: a configuration object or its JSON text.
#[wasm_bindgen]
pub fn generate_archive(documents: js_sys::Array, config: JsValue) -> Result<LabelBundle, JsValue> {
    let documents = read_documents(&documents)?;
    let config = parse_config(config)?;
    generate(&documents, config, DeliveryMode::Archive).map_err(js_error)
}

/// Generate labels from BOL PDFs, delivered as one merged PDF.
#[wasm_bindgen]
pub fn generate_merged(documents: js_sys::Array, config: JsValue) -> Result<LabelBundle, JsValue> {
    let documents = read_documents(&documents)?;
    let config = parse_config(config)?;
    generate(&documents, config, DeliveryMode::Merged).map_err(js_error)
}

fn read_documents(documents: &js_sys::Array) -> Result<Vec<SourceDocument>, JsValue> {
    documents
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let name = js_sys::Reflect::get(&item, &JsValue::from_str("name"))?
                .as_string()
                .unwrap_or_else(|| format!("document-{}.pdf", i + 1));
            let data = js_sys::Reflect::get(&item, &JsValue::from_str("data"))?;
            if !data.is_instance_of::<js_sys::Uint8Array>() {
                return Err(js_error(format!("{}: data must be a Uint8Array", name)));
            }
            Ok(SourceDocument::new(name, js_sys::Uint8Array::new(&data).to_vec()))
        })
        .collect()
}

fn parse_config(config: JsValue) -> Result<LabelConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(LabelConfig::default());
    }
    match config.as_string() {
        Some(json) => config_from_json(&json).map_err(js_error),
        None => serde_wasm_bindgen::from_value(config).map_err(js_error),
    }
}

fn config_from_json(json: &str) -> Result<LabelConfig, serde_json::Error> {
    serde_json::from_str(json)
}

fn generate(
    documents: &[SourceDocument],
    mut config: LabelConfig,
    mode: DeliveryMode,
) -> Result<LabelBundle, LabelError> {
    config.output.delivery = mode;
    let report = BatchProcessor::from_config(&config)?.process_documents(documents)?;
    LabelBundle::from_report(&report, &config)
}

/// Packaged labels plus the batch summary.
#[wasm_bindgen]
pub struct LabelBundle {
    filename: String,
    data: Vec<u8>,
    media_type: String,
    summary: String,
    label_count: usize,
    shipment_count: usize,
    skipped: Vec<String>,
}

impl LabelBundle {
    fn from_report(report: &BatchReport, config: &LabelConfig) -> Result<Self, LabelError> {
        let skipped = report
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.reference, s.reason))
            .chain(
                report
                    .document_errors
                    .iter()
                    .map(|d| format!("{}: {}", d.document, d.reason)),
            )
            .collect();

        if report.is_empty() {
            web_sys::console::warn_1(&JsValue::from_str(&report.summary()));
            return Ok(Self {
                filename: String::new(),
                data: Vec::new(),
                media_type: String::new(),
                summary: report.summary(),
                label_count: 0,
                shipment_count: 0,
                skipped,
            });
        }

        let timestamp = config.output.timestamp()?;
        let deliverable = package(&report.labels, &config.output, &timestamp)?;

        Ok(Self {
            media_type: deliverable.media_type().to_string(),
            filename: deliverable.filename,
            data: deliverable.data,
            summary: report.summary(),
            label_count: report.label_count(),
            shipment_count: report.shipment_count(),
            skipped,
        })
    }
}

#[wasm_bindgen]
impl LabelBundle {
    /// Suggested download name; empty when nothing was generated.
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// ZIP or PDF bytes.
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn media_type(&self) -> String {
        self.media_type.clone()
    }

    /// User-facing summary, or the empty-batch warning.
    #[wasm_bindgen(getter)]
    pub fn summary(&self) -> String {
        self.summary.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn label_count(&self) -> usize {
        self.label_count
    }

    #[wasm_bindgen(getter)]
    pub fn shipment_count(&self) -> usize {
        self.shipment_count
    }

    /// True when no label was generated.
    #[wasm_bindgen(getter)]
    pub fn empty(&self) -> bool {
        self.label_count == 0
    }

    /// Shipments and documents that were skipped, one message each.
    #[wasm_bindgen(getter)]
    pub fn skipped(&self) -> Vec<String> {
        self.skipped.clone()
    }
}

/// Manual-entry form for browser use.
///
/// Rows are addressed by 1-based position.
#[wasm_bindgen]
pub struct LabelForm {
    form: ManualEntryForm,
}

#[wasm_bindgen]
impl LabelForm {
    /// Create an empty form.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            form: ManualEntryForm::new(),
        }
    }

    /// Restore a form saved with `to_json`.
    #[wasm_bindgen]
    pub fn from_json(json: &str) -> Result<LabelForm, JsValue> {
        let form = serde_json::from_str(json).map_err(js_error)?;
        Ok(Self { form })
    }

    /// Serialize the form for later restoring.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.form).map_err(js_error)
    }

    /// Append a row and return its position.
    #[wasm_bindgen]
    pub fn add_row(
        &mut self,
        order_number: &str,
        tracking_number: &str,
        carrier_code: &str,
        piece_count: f64,
    ) -> usize {
        self.form
            .add_row(entry(order_number, tracking_number, carrier_code, piece_count))
    }

    /// Replace a row. Returns false if there is no such row.
    #[wasm_bindgen]
    pub fn update_row(
        &mut self,
        row: usize,
        order_number: &str,
        tracking_number: &str,
        carrier_code: &str,
        piece_count: f64,
    ) -> bool {
        self.form.update_row(
            row,
            entry(order_number, tracking_number, carrier_code, piece_count),
        )
    }

    /// Remove a row. Returns false if there is no such row.
    #[wasm_bindgen]
    pub fn remove_row(&mut self, row: usize) -> bool {
        self.form.remove_row(row).is_some()
    }

    /// Remove every row.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.form.clear();
    }

    /// Number of rows.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.form.len()
    }

    /// Rows as an array of plain objects.
    #[wasm_bindgen]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.form.rows()).map_err(js_error)
    }

    /// Generate labels for every non-blank row as a ZIP archive.
    #[wasm_bindgen]
    pub fn generate_archive(&self, config: JsValue) -> Result<LabelBundle, JsValue> {
        let config = parse_config(config)?;
        self.generate(config, DeliveryMode::Archive).map_err(js_error)
    }

    /// Generate labels for every non-blank row as one merged PDF.
    #[wasm_bindgen]
    pub fn generate_merged(&self, config: JsValue) -> Result<LabelBundle, JsValue> {
        let config = parse_config(config)?;
        self.generate(config, DeliveryMode::Merged).map_err(js_error)
    }
}

impl LabelForm {
    fn generate(
        &self,
        mut config: LabelConfig,
        mode: DeliveryMode,
    ) -> Result<LabelBundle, LabelError> {
        config.output.delivery = mode;
        let report = BatchProcessor::from_config(&config)?.process_form(&self.form)?;
        LabelBundle::from_report(&report, &config)
    }
}

impl Default for LabelForm {
    fn default() -> Self {
        Self::new()
    }
}

/// JS numbers arrive as f64; fractional or non-finite counts are rejected later.
fn entry(
    order_number: &str,
    tracking_number: &str,
    carrier_code: &str,
    piece_count: f64,
) -> ManualEntry {
    let piece_count = if piece_count.is_finite() && piece_count.fract() == 0.0 {
        piece_count as i64
    } else {
        0
    };
    ManualEntry::new(order_number, tracking_number, carrier_code, piece_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[wasm_bindgen_test]
    fn test_entry_piece_count() {
        assert_eq!(entry("SO-1", "", "X", 3.0).piece_count, 3);
        assert_eq!(entry("SO-1", "", "X", 2.5).piece_count, 0);
        assert_eq!(entry("SO-1", "", "X", f64::NAN).piece_count, 0);
    }

    #[wasm_bindgen_test]
    fn test_form_rows() {
        let mut form = LabelForm::new();
        assert_eq!(form.add_row("SO-1", "", "XYZ", 2.0), 1);
        assert_eq!(form.add_row("SO-2", "555666", "ABCD", 1.0), 2);
        assert!(form.update_row(2, "SO-3", "", "ABCD", 1.0));
        assert!(!form.update_row(5, "SO-9", "", "", 1.0));
        assert!(form.remove_row(1));
        assert_eq!(form.length(), 1);

        let restored = LabelForm::from_json(&form.to_json().unwrap()).unwrap();
        assert_eq!(restored.form, form.form);
    }

    #[wasm_bindgen_test]
    fn test_config_from_json() {
        let config = config_from_json(r#"{"layout":{"template":"dual"}}"#).unwrap();
        assert_eq!(config.layout.template, shiplabel_core::LabelTemplate::Dual);
        assert!(config_from_json("{").is_err());
    }
}
