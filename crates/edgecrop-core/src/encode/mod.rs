//! Output encoding.
//!
//! Confirmed crops are encoded losslessly as PNG so the buffer can be attached
//! to an upload as-is. No EXIF or colour profile is carried over.

mod png;

pub use png::{encode_png, EncodeError, PngCompression, PNG_CONTENT_TYPE};
