//! Barcode generation.
//!
//! Barcodes are rendered to an in-memory grayscale raster owned by the
//! caller. Nothing touches the filesystem.

pub mod code128;

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use tracing::trace;

use crate::error::BarcodeError;
use crate::models::config::BarcodeConfig;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// A rendered Code 128 barcode.
#[derive(Debug, Clone)]
pub struct BarcodeImage {
    payload: String,
    image: GrayImage,
}

impl BarcodeImage {
    /// Encoded payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 8-bit grayscale samples, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// The raster itself.
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Encode the raster as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, BarcodeError> {
        let mut data = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
            .map_err(|e| BarcodeError::Raster(e.to_string()))?;
        Ok(data)
    }
}

/// Render `payload` as a Code 128 barcode.
pub fn generate(payload: &str, config: &BarcodeConfig) -> Result<BarcodeImage, BarcodeError> {
    if config.module_width == 0 || config.height == 0 {
        return Err(BarcodeError::Raster(format!(
            "invalid raster geometry: module width {}, height {}",
            config.module_width, config.height
        )));
    }

    let modules = code128::encode(payload)?;
    let quiet = config.quiet_zone as usize;
    let width = (modules.len() + 2 * quiet) as u32 * config.module_width;

    let image = GrayImage::from_fn(width, config.height, |x, _| {
        let module = (x / config.module_width) as usize;
        match module.checked_sub(quiet).and_then(|m| modules.get(m)) {
            Some(true) => BLACK,
            _ => WHITE,
        }
    });

    trace!(
        "Rendered barcode {:?}: {} modules, {}x{} px",
        payload,
        modules.len(),
        image.width(),
        image.height()
    );

    Ok(BarcodeImage {
        payload: payload.to_string(),
        image,
    })
}
