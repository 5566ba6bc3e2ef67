//! Edgecrop WASM - WebAssembly bindings for the edgecrop cropping engine
//!
//! This crate exposes edgecrop-core's crop session to JavaScript/TypeScript.
//! Jobs run inline, so every call returns with the preview already updated.
//!
//! # Module Structure
//!
//! - `cropper` - The `JsImageCropper` class
//! - `types` - JavaScript-friendly views of previews, overlays and crop metadata
//! - `logger` - Console logging setup
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageCropper } from '@edgecrop/wasm';
//!
//! await init();
//!
//! const cropper = new JsImageCropper((png, meta) => upload(png, meta.file_name));
//! cropper.load(new Uint8Array(await file.arrayBuffer()), file.type);
//! cropper.set_edge('bottom', 120);
//! cropper.confirm();
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod logger;
mod types;

pub use cropper::JsImageCropper;
pub use types::JsPreview;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::install(log::LevelFilter::Warn);
}

/// Change how much the engine logs to the console (`"off"` up to `"trace"`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::install(logger::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
