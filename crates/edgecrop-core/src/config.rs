//! Cropper configuration.
//!
//! Every field has a production default, so hosts only set what they need.
//! The struct deserializes from partial input (e.g. a JS object through the
//! WASM binding); missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodeOptions;
use crate::encode::PngCompression;

/// Errors for configuration values that cannot work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_decoded_pixels must be greater than zero")]
    ZeroPixelBudget,

    #[error("output_file_name must not be empty")]
    EmptyFileName,
}

/// Tunables for one cropper instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Pixels a UI slider keeps between an edge and its opposite edge; at least 1.
    pub slider_margin: u32,
    /// Largest source accepted, in pixels (`width * height`).
    pub max_decoded_pixels: u64,
    /// Apply the EXIF orientation tag when decoding.
    pub apply_orientation: bool,
    /// PNG compression used for the confirmed output.
    pub png_compression: PngCompression,
    /// File name suggested for the confirmed output when attaching it to an upload.
    pub output_file_name: String,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            slider_margin: 10,
            max_decoded_pixels: 40_000_000,
            apply_orientation: true,
            png_compression: PngCompression::Default,
            output_file_name: "cropped-ecg.png".to_string(),
        }
    }
}

impl CropperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_decoded_pixels == 0 {
            return Err(ConfigError::ZeroPixelBudget);
        }
        if self.output_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        Ok(())
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_pixels: self.max_decoded_pixels,
            apply_orientation: self.apply_orientation,
        }
    }
}
