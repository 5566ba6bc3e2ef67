//! Image cropping by pixel rectangle.
//!
//! This is what the preview surface holds: the exact pixels inside the
//! current crop rectangle, copied at 1:1 scale.

use crate::decode::DecodedImage;
use crate::geometry::CropRectangle;

/// Copy the pixels inside `rect` out of `image`.
///
/// # Behavior
///
/// - A rectangle reaching past the image is clipped to the image bounds
/// - Minimum output dimension is 1x1 pixels
/// - A rectangle covering the whole image returns a copy of the original
/// - An empty source yields a single black pixel
pub fn crop_region(image: &DecodedImage, rect: CropRectangle) -> DecodedImage {
    if image.is_empty() {
        return DecodedImage::new(1, 1, vec![0u8; 3]);
    }
    if rect.x == 0 && rect.y == 0 && rect.width >= image.width && rect.height >= image.height {
        return image.clone();
    }

    // origin pinned inside the image so at least one pixel survives
    let left = rect.x.min(image.width - 1);
    let top = rect.y.min(image.height - 1);
    let width = rect.right().min(image.width).saturating_sub(left).max(1);
    let height = rect.bottom().min(image.height).saturating_sub(top).max(1);

    let stride = image.width as usize * 3;
    let span = width as usize * 3;
    let pixels = image
        .pixels
        .chunks_exact(stride)
        .skip(top as usize)
        .take(height as usize)
        .flat_map(|row| &row[left as usize * 3..left as usize * 3 + span])
        .copied()
        .collect();

    DecodedImage::new(width, height, pixels)
}

/// Image whose pixel at (x, y) is `[x, y, 0]`, so crops can be checked by value.
#[cfg(test)]
fn coordinate_image(width: u32, height: u32) -> DecodedImage {
    let pixels = (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| [x as u8, y as u8, 0]))
        .collect();
    DecodedImage::new(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &DecodedImage, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * image.width + x) * 3) as usize;
        [image.pixels[i], image.pixels[i + 1], image.pixels[i + 2]]
    }

    #[test]
    fn test_whole_image_is_unchanged() {
        let img = coordinate_image(40, 30);
        let out = crop_region(&img, CropRectangle::new(0, 0, 40, 30));
        assert_eq!(out, img);
    }

    #[test]
    fn test_inner_region() {
        let img = coordinate_image(10, 10);
        let out = crop_region(&img, CropRectangle::new(2, 3, 6, 4));

        assert_eq!((out.width, out.height), (6, 4));
        assert_eq!(pixel(&out, 0, 0), [2, 3, 0]);
        assert_eq!(pixel(&out, 5, 3), [7, 6, 0]);
    }

    #[test]
    fn test_last_column() {
        let img = coordinate_image(10, 5);
        let out = crop_region(&img, CropRectangle::new(9, 0, 1, 5));

        assert_eq!((out.width, out.height), (1, 5));
        let xs: Vec<u8> = out.pixels.chunks(3).map(|p| p[0]).collect();
        let ys: Vec<u8> = out.pixels.chunks(3).map(|p| p[1]).collect();
        assert_eq!(xs, vec![9; 5]);
        assert_eq!(ys, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_overhanging_rect_is_clipped() {
        let img = coordinate_image(10, 10);
        let out = crop_region(&img, CropRectangle::new(8, 7, 5, 5));

        assert_eq!((out.width, out.height), (2, 3));
        assert_eq!(pixel(&out, 0, 0), [8, 7, 0]);
    }

    #[test]
    fn test_origin_past_image_keeps_corner() {
        let img = coordinate_image(10, 10);
        let out = crop_region(&img, CropRectangle::new(50, 50, 5, 5));

        assert_eq!((out.width, out.height), (1, 1));
        assert_eq!(out.pixels, vec![9, 9, 0]);
    }

    #[test]
    fn test_empty_source_gives_one_pixel() {
        let img = DecodedImage::new(0, 0, vec![]);
        let out = crop_region(&img, CropRectangle::new(0, 0, 1, 1));
        assert_eq!(out, DecodedImage::new(1, 1, vec![0, 0, 0]));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
