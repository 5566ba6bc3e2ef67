//! Source image decoding.
//!
//! This module provides functionality for:
//! - Checking the host-declared media type of a source
//! - Probing header dimensions and enforcing a pixel budget before decoding
//! - Decoding PNG and JPEG sources to RGB with EXIF orientation applied
//!
//! Decoding is synchronous and CPU-bound. The session hands it out as a
//! [`DecodeTicket`](crate::session::DecodeTicket) so the host decides where it
//! runs.

mod source;
mod types;

pub use source::{decode_source, probe_dimensions, DecodeOptions};
pub use types::{DecodeError, DecodedImage, ImageResource, Orientation};
