//! Crop geometry: image dimensions, the crop rectangle, and the resolver that
//! derives one from the other.
//!
//! # Coordinate System
//!
//! - All values are in source pixels
//! - Origin is the top-left corner of the source image
//! - The crop rectangle is never stored; it is recomputed from the edge
//!   offsets whenever it is needed

use serde::{Deserialize, Serialize};

use crate::edges::{Axis, EdgeOffsets};

/// Pixel dimensions of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the image along one axis.
    #[inline]
    pub fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// True when either side is zero (nothing to crop or draw).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The region of the source image currently selected for output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRectangle {
    /// Left edge of the region.
    pub x: u32,
    /// Top edge of the region.
    pub y: u32,
    /// Region width, at least 1.
    pub width: u32,
    /// Region height, at least 1.
    pub height: u32,
}

impl CropRectangle {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering the whole image.
    pub fn full(dims: ImageDimensions) -> Self {
        Self::new(0, 0, dims.width.max(1), dims.height.max(1))
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// Check whether the rectangle lies entirely inside an image.
    pub fn fits_within(&self, dims: ImageDimensions) -> bool {
        self.right() <= dims.width && self.bottom() <= dims.height
    }
}

/// Derive the crop rectangle from edge offsets and source dimensions.
///
/// Pure and callable at any time. Width and height are floored at 1 so the
/// result is always renderable, even while offsets and dimensions briefly
/// disagree during an image replacement.
pub fn resolve_crop(edges: &EdgeOffsets, dims: ImageDimensions) -> CropRectangle {
    let width = dims
        .width
        .saturating_sub(edges.left)
        .saturating_sub(edges.right)
        .max(1);
    let height = dims
        .height
        .saturating_sub(edges.top)
        .saturating_sub(edges.bottom)
        .max(1);

    CropRectangle {
        x: edges.left,
        y: edges.top,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(left: u32, right: u32, top: u32, bottom: u32) -> EdgeOffsets {
        EdgeOffsets {
            left,
            right,
            top,
            bottom,
        }
    }

    #[test]
    fn test_zero_offsets_cover_image() {
        let dims = ImageDimensions::new(800, 600);
        let rect = resolve_crop(&EdgeOffsets::ZERO, dims);
        assert_eq!(rect, CropRectangle::new(0, 0, 800, 600));
        assert_eq!(rect, CropRectangle::full(dims));
    }

    #[test]
    fn test_symmetric_trim() {
        let dims = ImageDimensions::new(800, 600);
        let rect = resolve_crop(&offsets(100, 100, 50, 50), dims);
        assert_eq!(rect, CropRectangle::new(100, 50, 600, 500));
    }

    #[test]
    fn test_single_pixel_column() {
        let dims = ImageDimensions::new(10, 10);
        let rect = resolve_crop(&offsets(9, 0, 0, 0), dims);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 9);
    }

    #[test]
    fn test_inconsistent_offsets_floor_at_one() {
        // Offsets left over from a larger image
        let dims = ImageDimensions::new(20, 20);
        let rect = resolve_crop(&offsets(300, 300, 200, 200), dims);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_empty_dimensions_floor_at_one() {
        let rect = resolve_crop(&EdgeOffsets::ZERO, ImageDimensions::new(0, 0));
        assert_eq!(rect, CropRectangle::new(0, 0, 1, 1));
        assert!(ImageDimensions::new(0, 5).is_empty());
    }

    #[test]
    fn test_rectangle_edges() {
        let rect = CropRectangle::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert!(rect.fits_within(ImageDimensions::new(40, 60)));
        assert!(!rect.fits_within(ImageDimensions::new(39, 60)));
    }

    #[test]
    fn test_along_axis() {
        let dims = ImageDimensions::new(640, 480);
        assert_eq!(dims.along(Axis::Horizontal), 640);
        assert_eq!(dims.along(Axis::Vertical), 480);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
