//! JavaScript-friendly views of cropper state.

use edgecrop_core::{CropOutput, OverlayInsets, PreviewSurface};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Overlay insets as CSS percentage strings, ready for `style.left` and friends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CssInsets {
    pub left: String,
    pub top: String,
    pub right: String,
    pub bottom: String,
}

impl From<OverlayInsets> for CssInsets {
    fn from(insets: OverlayInsets) -> Self {
        let [left, top, right, bottom] = insets.css_percentages();
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Metadata passed to the JavaScript `on_crop` callback next to the PNG bytes.
///
/// Keys stay snake_case, like the config object the constructor accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CropMetadata {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
    pub content_type: String,
}

impl From<&CropOutput> for CropMetadata {
    fn from(output: &CropOutput) -> Self {
        Self {
            x: output.rect.x,
            y: output.rect.y,
            width: output.rect.width,
            height: output.rect.height,
            file_name: output.file_name.clone(),
            content_type: output.content_type().to_string(),
        }
    }
}

/// The preview currently on screen, copied out of the session.
///
/// Pixels are RGBA so they can go straight into `ImageData`.
#[wasm_bindgen]
pub struct JsPreview {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    rgba: Vec<u8>,
}

impl From<&PreviewSurface> for JsPreview {
    fn from(surface: &PreviewSurface) -> Self {
        let rect = surface.rect();
        let image = surface.image();
        Self {
            width: image.width,
            height: image.height,
            x: rect.x,
            y: rect.y,
            rgba: image.to_rgba_bytes(),
        }
    }
}

#[wasm_bindgen]
impl JsPreview {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Left edge of the previewed region in source pixels
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Top edge of the previewed region in source pixels
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Returns RGBA pixel data as Uint8ClampedArray-compatible bytes.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn rgba(&self) -> Vec<u8> {
        self.rgba.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgecrop_core::{overlay_insets, CropRectangle, EdgeOffsets, ImageDimensions};

    #[test]
    fn test_css_insets_order() {
        let edges = EdgeOffsets {
            left: 200,
            right: 0,
            top: 50,
            bottom: 100,
        };
        let css = CssInsets::from(overlay_insets(&edges, Some(ImageDimensions::new(800, 200))));
        assert_eq!(css.left, "25%");
        assert_eq!(css.top, "25%");
        assert_eq!(css.right, "0%");
        assert_eq!(css.bottom, "50%");
    }

    #[test]
    fn test_crop_metadata() {
        let output = CropOutput {
            buffer: vec![1, 2, 3],
            rect: CropRectangle::new(4, 5, 6, 7),
            file_name: "cropped-ecg.png".to_string(),
        };
        let meta = CropMetadata::from(&output);
        assert_eq!((meta.x, meta.y, meta.width, meta.height), (4, 5, 6, 7));
        assert_eq!(meta.file_name, "cropped-ecg.png");
        assert_eq!(meta.content_type, "image/png");
    }
}
