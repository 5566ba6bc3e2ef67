//! Core types for source decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ImageDimensions;

/// Error types for source decoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The declared media type is not an image type.
    #[error("Unsupported media type: {0:?}")]
    UnsupportedMediaType(String),

    /// The bytes are not in a recognized image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Header dimensions exceed the configured pixel budget.
    #[error("Image too large: {width}x{height} exceeds {limit} pixels")]
    TooLarge { width: u32, height: u32, limit: u64 },

    /// The image decoded to zero width or height.
    #[error("Image has no pixels")]
    EmptyImage,
}

/// How the camera says the stored pixels must be turned to display upright
/// (EXIF tag 0x0112). Unknown tag values read as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Mirrored along the top-left to bottom-right diagonal.
    Transpose,
    Rotate90CW,
    /// Mirrored along the top-right to bottom-left diagonal.
    Transverse,
    Rotate270CW,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A raw image handed over by the host: encoded bytes plus the media type the
/// host declared for them (e.g. a browser `File.type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImageResource {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Whether the declared type is an `image/*` type.
    ///
    /// An empty type is accepted, since hosts report it for files whose
    /// extension they do not recognize; the decoder sniffs the format anyway.
    pub fn is_image(&self) -> bool {
        let mime = self.mime_type.trim();
        mime.is_empty()
            || mime
                .get(..6)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }
}

/// Source pixels after decoding and orientation, upright as the user sees them.
///
/// `pixels` is packed RGB8, row-major, `width * height * 3` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgb_image(buffer: image::RgbImage) -> Self {
        let (width, height) = buffer.dimensions();
        Self::new(width, height, buffer.into_raw())
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// Expand to RGBA with opaque alpha, the layout canvas `ImageData` expects.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for rgb in self.pixels.chunks_exact(3) {
            rgba.extend_from_slice(rgb);
            rgba.push(u8::MAX);
        }
        rgba
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty() || self.dimensions().is_empty()
    }
}
