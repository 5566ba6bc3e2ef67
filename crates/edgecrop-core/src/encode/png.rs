//! PNG encoding for confirmed crops.
//!
//! This module provides PNG encoding using the `image` crate's PNG encoder.
//! The compression level trades encode time against buffer size; every level
//! is lossless.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ExtendedColorType;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Media type of every buffer produced by [`encode_png`].
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Why a crop could not be turned into a PNG buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("RGB buffer holds {actual} bytes, {expected} needed")]
    InvalidPixelData { expected: usize, actual: usize },

    #[error("cannot encode a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// PNG compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    /// Fastest encode, largest output.
    Fast,
    #[default]
    Default,
    /// Smallest output, slowest encode.
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(level: PngCompression) -> Self {
        match level {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Encode packed RGB8 pixels (row-major) as a PNG file.
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    compression: PngCompression,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut png = Vec::new();
    PngEncoder::new_with_quality(&mut png, compression.into(), FilterType::Adaptive)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(png)
}
