//! The JavaScript cropper class and the inline job runner behind it.
//!
//! WASM runs single-threaded, so every ticket the session hands out is run
//! to completion before the call returns. Staleness never arises here, but
//! the session still applies its checks.

use edgecrop_core::session::RenderTicket;
use edgecrop_core::{CropOutput, CropSession, CropperConfig, Edge, ImageResource};
use wasm_bindgen::prelude::*;

use crate::types::{CropMetadata, CssInsets, JsPreview};

pub(crate) struct InlineCropper {
    session: CropSession,
}

impl InlineCropper {
    pub(crate) fn new(config: CropperConfig, on_crop: impl FnMut(&CropOutput) + 'static) -> Self {
        Self {
            session: CropSession::new(config, on_crop),
        }
    }

    pub(crate) fn session(&self) -> &CropSession {
        &self.session
    }

    /// Decode and preview a new source. Returns false if it could not be decoded.
    pub(crate) fn load(&mut self, resource: ImageResource) -> bool {
        let ticket = self.session.load(resource);
        let render = self.session.apply_decode(ticket.run());
        self.render(render)
    }

    pub(crate) fn clear(&mut self) {
        self.session.clear();
    }

    pub(crate) fn set_edge(&mut self, edge: Edge, value: u32) -> bool {
        let render = self.session.set_edge(edge, value);
        self.render(render)
    }

    pub(crate) fn reset(&mut self) -> bool {
        let render = self.session.reset();
        self.render(render)
    }

    pub(crate) fn confirm(&mut self) -> Option<CropOutput> {
        let ticket = self.session.begin_confirm()?;
        self.session.apply_encode(ticket.run())
    }

    fn render(&mut self, ticket: Option<RenderTicket>) -> bool {
        match ticket {
            Some(ticket) => self.session.apply_render(ticket.run()),
            None => false,
        }
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_edge(edge: &str) -> Result<Edge, JsValue> {
    edge.parse::<Edge>().map_err(to_js_error)
}

/// Interactive edge cropper for JavaScript hosts.
///
/// # Example
///
/// ```typescript
/// const cropper = new JsImageCropper((png: Uint8Array, meta) => {
///   form.append('file', new File([png], meta.file_name, { type: meta.content_type }));
/// });
/// cropper.load(new Uint8Array(await file.arrayBuffer()), file.type);
/// cropper.set_edge('left', 40);
/// cropper.confirm();
/// ```
#[wasm_bindgen]
pub struct JsImageCropper {
    inner: InlineCropper,
}

#[wasm_bindgen]
impl JsImageCropper {
    /// Create a cropper.
    ///
    /// `on_crop` is called with `(png: Uint8Array, meta)` each time a crop is
    /// confirmed. `config` may be `undefined` or a partial config object with
    /// snake_case keys (`{ slider_margin: 20 }`).
    #[wasm_bindgen(constructor)]
    pub fn new(on_crop: js_sys::Function, config: JsValue) -> Result<JsImageCropper, JsValue> {
        let config: CropperConfig = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        config.validate().map_err(to_js_error)?;

        let deliver = move |output: &CropOutput| {
            let buffer = js_sys::Uint8Array::from(output.buffer.as_slice());
            let meta = match serde_wasm_bindgen::to_value(&CropMetadata::from(output)) {
                Ok(meta) => meta,
                Err(err) => {
                    log::error!("could not convert crop metadata: {err}");
                    return;
                }
            };
            if let Err(err) = on_crop.call2(&JsValue::NULL, &buffer, &meta) {
                log::warn!("on_crop callback threw: {err:?}");
            }
        };

        Ok(JsImageCropper {
            inner: InlineCropper::new(config, deliver),
        })
    }

    /// Load a new source image, discarding any previous one.
    ///
    /// Returns false if it could not be decoded; the cropper is then empty.
    pub fn load(&mut self, bytes: Vec<u8>, mime_type: String) -> bool {
        self.inner.load(ImageResource::new(bytes, mime_type))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Move one edge (`"left"`, `"right"`, `"top"` or `"bottom"`).
    ///
    /// Returns false if the edit would collapse the crop or nothing is loaded.
    /// Throws on an unknown edge name.
    pub fn set_edge(&mut self, edge: &str, value: u32) -> Result<bool, JsValue> {
        Ok(self.inner.set_edge(parse_edge(edge)?, value))
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    /// Encode the current preview and hand it to `on_crop`.
    ///
    /// Returns false when there is nothing to confirm.
    pub fn confirm(&mut self) -> bool {
        self.inner.confirm().is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.session().phase().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_confirmed(&self) -> bool {
        self.inner.session().is_confirmed()
    }

    /// Source width in pixels, 0 when nothing is loaded
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.session().dimensions().map_or(0, |dims| dims.width)
    }

    /// Source height in pixels, 0 when nothing is loaded
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.session().dimensions().map_or(0, |dims| dims.height)
    }

    /// Current offsets as `{ left, right, top, bottom }`.
    pub fn edges(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.session().edges()).map_err(to_js_error)
    }

    /// Current crop as `{ x, y, width, height }`, or `null` when nothing is loaded.
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        match self.inner.session().crop_rect() {
            Some(rect) => serde_wasm_bindgen::to_value(&rect).map_err(to_js_error),
            None => Ok(JsValue::NULL),
        }
    }

    /// Guide insets as CSS percentages, or `null` before the source is decoded.
    pub fn overlay(&self) -> Result<JsValue, JsValue> {
        match self.inner.session().overlay() {
            Some(insets) => {
                serde_wasm_bindgen::to_value(&CssInsets::from(insets)).map_err(to_js_error)
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Largest value a slider for `edge` should offer, 0 when nothing is loaded.
    pub fn slider_max(&self, edge: &str) -> Result<u32, JsValue> {
        let edge = parse_edge(edge)?;
        Ok(self
            .inner
            .session()
            .slider_range(edge)
            .map_or(0, |range| *range.end()))
    }

    pub fn preview(&self) -> Option<JsPreview> {
        self.inner.session().preview().map(JsPreview::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgecrop_core::encode::{encode_png, PngCompression};
    use edgecrop_core::{CropPhase, CropRectangle, EdgeOffsets};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn png_resource(width: u32, height: u32) -> ImageResource {
        let pixels = vec![60u8; (width * height * 3) as usize];
        let bytes = encode_png(&pixels, width, height, PngCompression::Fast).unwrap();
        ImageResource::new(bytes, "image/png")
    }

    fn cropper() -> (InlineCropper, Rc<RefCell<Vec<CropOutput>>>) {
        let delivered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&delivered);
        let cropper = InlineCropper::new(CropperConfig::default(), move |output: &CropOutput| {
            sink.borrow_mut().push(output.clone())
        });
        (cropper, delivered)
    }

    #[test]
    fn test_load_renders_full_preview() {
        let (mut cropper, _) = cropper();
        assert!(cropper.load(png_resource(30, 20)));

        let session = cropper.session();
        assert_eq!(session.phase(), CropPhase::Loaded);
        assert_eq!(session.preview().unwrap().rect(), CropRectangle::new(0, 0, 30, 20));
    }

    #[test]
    fn test_bad_source_stays_empty() {
        let (mut cropper, _) = cropper();
        assert!(!cropper.load(ImageResource::new(vec![1, 2, 3], "image/png")));
        assert_eq!(cropper.session().phase(), CropPhase::Empty);
        assert!(cropper.confirm().is_none());
    }

    #[test]
    fn test_edit_and_confirm() {
        let (mut cropper, delivered) = cropper();
        assert!(cropper.load(png_resource(800, 600)));
        assert!(cropper.set_edge(Edge::Right, 100));
        assert!(!cropper.set_edge(Edge::Left, 750));
        assert_eq!(
            cropper.session().edges(),
            EdgeOffsets {
                right: 100,
                ..EdgeOffsets::ZERO
            }
        );

        let output = cropper.confirm().unwrap();
        assert_eq!(output.rect, CropRectangle::new(0, 0, 700, 600));
        assert_eq!(delivered.borrow().len(), 1);
        assert!(cropper.session().is_confirmed());
    }

    #[test]
    fn test_reset_and_clear() {
        let (mut cropper, _) = cropper();
        assert!(!cropper.reset());
        assert!(cropper.load(png_resource(50, 50)));
        assert!(cropper.set_edge(Edge::Top, 20));
        assert!(cropper.reset());
        assert_eq!(cropper.session().edges(), EdgeOffsets::ZERO);

        cropper.clear();
        assert_eq!(cropper.session().phase(), CropPhase::Empty);
        assert!(!cropper.set_edge(Edge::Top, 1));
    }
}
