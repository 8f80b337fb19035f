//! Data models for shipments, labels, manual entry and configuration.

pub mod config;
pub mod form;
pub mod label;
pub mod shipment;

pub use config::{
    BarcodeConfig, CarrierStrategy, DeliveryMode, ExtractionConfig, LabelConfig, LabelTemplate,
    LayoutConfig, OutputConfig, PieceCountStrategy,
};
pub use form::{ManualEntry, ManualEntryForm};
pub use label::{LabelPage, LabelSide};
pub use shipment::ShipmentFields;
