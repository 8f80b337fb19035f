//! Label synthesis: shipment fields to printable label pages.

pub mod layout;
mod render;

use tracing::{debug, info};

use crate::barcode::{self, BarcodeImage};
use crate::error::{LabelError, SynthesisError};
use crate::models::config::{BarcodeConfig, LabelConfig, LabelTemplate};
use crate::models::label::{LabelPage, LabelSide};
use crate::models::shipment::ShipmentFields;

use layout::{dual_pages, file_reference, label_filename, single_page, PageLayout};

/// Trait for label synthesizers.
pub trait LabelSynthesizer {
    /// Produce the label pages for every piece of a shipment, in order.
    fn synthesize(&self, fields: &ShipmentFields) -> Result<Vec<LabelPage>, LabelError>;
}

/// Fixed-layout label generator.
pub struct LabelGenerator {
    template: LabelTemplate,
    barcode: Option<BarcodeConfig>,
}

impl LabelGenerator {
    /// Create a generator using the single template with barcodes enabled.
    pub fn new() -> Self {
        Self {
            template: LabelTemplate::Single,
            barcode: Some(BarcodeConfig::default()),
        }
    }

    /// Create a generator from configuration.
    pub fn from_config(config: &LabelConfig) -> Self {
        let barcode = config.barcode.enabled.then(|| config.barcode.clone());
        Self {
            template: config.layout.template,
            barcode,
        }
    }

    /// Set the page template.
    pub fn with_template(mut self, template: LabelTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set the barcode raster configuration, enabling barcodes.
    pub fn with_barcode(mut self, config: BarcodeConfig) -> Self {
        self.barcode = Some(config);
        self
    }

    /// Disable barcodes.
    pub fn without_barcode(mut self) -> Self {
        self.barcode = None;
        self
    }

    /// The active template.
    pub fn template(&self) -> LabelTemplate {
        self.template
    }

    fn page(
        &self,
        fields: &ShipmentFields,
        name: &str,
        layout: &PageLayout,
        barcode: Option<&BarcodeImage>,
        side: Option<LabelSide>,
        index: u32,
    ) -> Result<LabelPage, LabelError> {
        let count = fields.piece_count;
        let data = render::render_page(layout, barcode)?;
        let has_barcode = layout.barcode_top.is_some() && barcode.is_some();
        let filename = label_filename(name, side, index, count);

        debug!("Rendered {} ({} bytes)", filename, data.len());
        Ok(LabelPage::new(filename, data, index, count, side, has_barcode))
    }
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelSynthesizer for LabelGenerator {
    fn synthesize(&self, fields: &ShipmentFields) -> Result<Vec<LabelPage>, LabelError> {
        self.synthesize_as(fields, &file_reference(fields.reference()))
    }
}

impl LabelGenerator {
    /// Synthesize with `name` in place of the shipment reference in file names.
    pub fn synthesize_as(
        &self,
        fields: &ShipmentFields,
        name: &str,
    ) -> Result<Vec<LabelPage>, LabelError> {
        let count = fields.piece_count;
        if count == 0 {
            return Err(SynthesisError::InvalidPieceCount {
                reference: fields.reference().to_string(),
                count: 0,
            }
            .into());
        }

        // One raster per shipment, shared by every page and dropped on return
        let barcode = match &self.barcode {
            Some(config) if fields.has_tracking() => {
                Some(barcode::generate(&fields.tracking_number, config)?)
            }
            _ => None,
        };
        let with_barcode = barcode.is_some();

        let mut pages = Vec::new();
        for index in 1..=count {
            match self.template {
                LabelTemplate::Single => {
                    let layout = single_page(fields, index, count, with_barcode);
                    pages.push(self.page(fields, name, &layout, barcode.as_ref(), None, index)?);
                }
                LabelTemplate::Dual => {
                    let (a, b) = dual_pages(fields, index, count, with_barcode);
                    let side_a = Some(LabelSide::A);
                    pages.push(self.page(fields, name, &a, barcode.as_ref(), side_a, index)?);
                    pages.push(self.page(fields, name, &b, None, Some(LabelSide::B), index)?);
                }
            }
        }

        info!(
            "Synthesized {} label page(s) for {:?}",
            pages.len(),
            fields.reference()
        );
        Ok(pages)
    }
}
