//! Source image decoding with media-type, size and EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};

use super::{DecodeError, DecodedImage, ImageResource, Orientation};
use crate::geometry::ImageDimensions;

/// Limits and options applied while decoding a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest accepted `width * height`, checked against the header before
    /// any pixel data is decoded.
    pub max_pixels: u64,
    /// Apply the EXIF orientation tag, matching how browsers display photos.
    pub apply_orientation: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_pixels: 40_000_000,
            apply_orientation: true,
        }
    }
}

/// Decode a source image into RGB pixels.
///
/// # Errors
///
/// - `DecodeError::UnsupportedMediaType` if the declared type is not `image/*`
/// - `DecodeError::InvalidFormat` if the format is unknown or not compiled in
/// - `DecodeError::TooLarge` if the header exceeds `options.max_pixels`
/// - `DecodeError::CorruptedFile` if decoding fails part-way
/// - `DecodeError::EmptyImage` if the image has no pixels
pub fn decode_source(
    resource: &ImageResource,
    options: &DecodeOptions,
) -> Result<DecodedImage, DecodeError> {
    if !resource.is_image() {
        return Err(DecodeError::UnsupportedMediaType(
            resource.mime_type().to_string(),
        ));
    }

    let bytes = resource.bytes();
    let header = probe_dimensions(bytes)?;
    check_pixel_budget(header, options.max_pixels)?;

    let orientation = if options.apply_orientation {
        extract_orientation(bytes)
    } else {
        Orientation::Normal
    };

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .decode()
        .map_err(map_image_error)?;

    let decoded = DecodedImage::from_rgb_image(apply_orientation(img, orientation).into_rgb8());
    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage);
    }

    log::debug!(
        "decoded {} source: {}x{} ({:?})",
        resource.mime_type(),
        decoded.width,
        decoded.height,
        orientation
    );
    Ok(decoded)
}

/// Read pixel dimensions from the image header without decoding pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<ImageDimensions, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let (width, height) = reader.into_dimensions().map_err(map_image_error)?;
    Ok(ImageDimensions::new(width, height))
}

fn check_pixel_budget(dims: ImageDimensions, limit: u64) -> Result<(), DecodeError> {
    let pixels = u64::from(dims.width) * u64::from(dims.height);
    if pixels == 0 {
        return Err(DecodeError::EmptyImage);
    }
    if pixels > limit {
        return Err(DecodeError::TooLarge {
            width: dims.width,
            height: dims.height,
            limit,
        });
    }
    Ok(())
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

/// Extract EXIF orientation from encoded bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
