//! Pixel transforms used by the preview pipeline.
//!
//! # Coordinate System
//!
//! - Crop rectangles are in source pixels
//! - Origin is top-left corner
//! - Output is always 1:1 with the source; nothing is resampled

mod crop;

pub use crop::crop_region;
