//! Edgecrop Core - edge-based interactive cropping engine
//!
//! This crate tracks four crop-edge offsets over a source image, keeps the
//! derived crop rectangle from ever collapsing, renders a 1:1 preview of the
//! selected region, and encodes it as PNG once the user confirms.
//!
//! # Module Structure
//!
//! - `edges` - Edge offsets and the all-or-nothing edit rule
//! - `geometry` - Crop rectangle and the resolver deriving it from offsets
//! - `overlay` - Percentage insets for drawing the guide over a scaled image
//! - `decode` / `encode` / `transform` - Pixel work behind the preview and output
//! - `session` - The load/edit/confirm state machine and its job tickets
//! - `driver` - Tokio driver running those jobs in the background (feature `driver`)

pub mod config;
pub mod decode;
#[cfg(feature = "driver")]
pub mod driver;
pub mod edges;
pub mod encode;
pub mod geometry;
pub mod overlay;
pub mod session;
pub mod transform;

pub use config::{ConfigError, CropperConfig};
pub use decode::{DecodeError, DecodedImage, ImageResource};
#[cfg(feature = "driver")]
pub use driver::{CropEvent, Cropper};
pub use edges::{slider_range, Edge, EdgeOffsets, EdgeRejection, ParseEdgeError};
pub use encode::EncodeError;
pub use geometry::{resolve_crop, CropRectangle, ImageDimensions};
pub use overlay::{overlay_insets, OverlayInsets};
pub use session::{CropOutput, CropPhase, CropSession, PreviewSurface};
