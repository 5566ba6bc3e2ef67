//! One editing session: edge state, preview surface and the confirm step.
//!
//! # State Machine
//!
//! ```text
//!   Empty ──load+decode──▶ Loaded ──edit──▶ Previewing ──confirm──▶ Confirmed
//!     ▲                      ▲                  ▲  │                    │
//!     │                      └──────reset───────┼──┘◀───────edit────────┘
//!     └──── load / clear / undecodable source ──┘
//! ```
//!
//! # Asynchronous Work
//!
//! Decoding the source, redrawing the preview and encoding the output are
//! CPU-bound jobs. The session never runs them itself: each operation that
//! needs one returns a ticket ([`DecodeTicket`], [`RenderTicket`],
//! [`EncodeTicket`]) whose `run()` is pure and may execute on any thread, in
//! any order. Results come back through the matching `apply_*` method, which
//! drops them when they are stale:
//!
//! - every `load`/`clear` starts a new [`Generation`]; results from an older
//!   generation belong to a replaced image and are ignored
//! - previews carry the sequence number of the edit that requested them, and
//!   a preview older than the one installed never overwrites it
//! - an encoded buffer is only reported if no edit happened since confirm

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::config::CropperConfig;
use crate::decode::{decode_source, DecodeError, DecodeOptions, DecodedImage, ImageResource};
use crate::edges::{self, Edge, EdgeOffsets};
use crate::encode::{encode_png, EncodeError, PngCompression, PNG_CONTENT_TYPE};
use crate::geometry::{resolve_crop, CropRectangle, ImageDimensions};
use crate::overlay::{overlay_insets, OverlayInsets};
use crate::transform::crop_region;

/// Callback receiving every confirmed crop.
pub type OnCrop = Box<dyn FnMut(&CropOutput)>;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropPhase {
    /// No decoded source (nothing loaded, still decoding, or decode failed).
    Empty,
    /// Source decoded; edges at zero since load or reset.
    Loaded,
    /// Edges edited since load or reset.
    Previewing,
    /// Output delivered for the current edges.
    Confirmed,
}

impl CropPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            CropPhase::Empty => "empty",
            CropPhase::Loaded => "loaded",
            CropPhase::Previewing => "previewing",
            CropPhase::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for CropPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the source image a job was issued for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Pending decode of a newly supplied source.
#[derive(Debug, Clone)]
pub struct DecodeTicket {
    generation: Generation,
    resource: Arc<ImageResource>,
    options: DecodeOptions,
}

impl DecodeTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Decode the source. Pure; safe to run off the session's thread.
    pub fn run(&self) -> DecodeOutcome {
        DecodeOutcome {
            generation: self.generation,
            result: decode_source(&self.resource, &self.options),
        }
    }
}

/// Result of a [`DecodeTicket`].
#[derive(Debug)]
pub struct DecodeOutcome {
    generation: Generation,
    result: Result<DecodedImage, DecodeError>,
}

impl DecodeOutcome {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn result(&self) -> &Result<DecodedImage, DecodeError> {
        &self.result
    }
}

/// Pending redraw of the preview surface for one crop rectangle.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    generation: Generation,
    sequence: u64,
    source: Arc<DecodedImage>,
    rect: CropRectangle,
}

impl RenderTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn rect(&self) -> CropRectangle {
        self.rect
    }

    /// Draw the clipped region into a fresh surface sized to the rectangle.
    pub fn run(&self) -> PreviewSurface {
        PreviewSurface {
            generation: self.generation,
            sequence: self.sequence,
            rect: self.rect,
            image: crop_region(&self.source, self.rect),
        }
    }
}

/// The rendered preview: exactly the pixels inside `rect`, at 1:1 scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSurface {
    generation: Generation,
    sequence: u64,
    rect: CropRectangle,
    image: DecodedImage,
}

impl PreviewSurface {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn rect(&self) -> CropRectangle {
        self.rect
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }
}

/// Pending encode of the current preview into the output buffer.
#[derive(Debug, Clone)]
pub struct EncodeTicket {
    generation: Generation,
    surface: Arc<PreviewSurface>,
    compression: PngCompression,
}

impl EncodeTicket {
    pub fn rect(&self) -> CropRectangle {
        self.surface.rect
    }

    /// Encode the preview as PNG. Pure; safe to run off the session's thread.
    pub fn run(&self) -> EncodeOutcome {
        let image = &self.surface.image;
        EncodeOutcome {
            generation: self.generation,
            sequence: self.surface.sequence,
            rect: self.surface.rect,
            result: encode_png(&image.pixels, image.width, image.height, self.compression),
        }
    }
}

/// Result of an [`EncodeTicket`].
#[derive(Debug)]
pub struct EncodeOutcome {
    generation: Generation,
    sequence: u64,
    rect: CropRectangle,
    result: Result<Vec<u8>, EncodeError>,
}

impl EncodeOutcome {
    pub fn result(&self) -> &Result<Vec<u8>, EncodeError> {
        &self.result
    }
}

/// A confirmed crop, as handed to the `on_crop` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOutput {
    /// PNG-encoded pixels of the crop.
    pub buffer: Vec<u8>,
    /// Rectangle of the source the buffer was cut from.
    pub rect: CropRectangle,
    /// Suggested file name for attaching the buffer to an upload.
    pub file_name: String,
}

impl CropOutput {
    pub fn content_type(&self) -> &'static str {
        PNG_CONTENT_TYPE
    }
}

/// State of one cropper: the source, its edge offsets and the preview.
pub struct CropSession {
    config: CropperConfig,
    on_crop: OnCrop,
    generation: Generation,
    decode_pending: bool,
    source: Option<Arc<DecodedImage>>,
    edges: EdgeOffsets,
    phase: CropPhase,
    /// Sequence number of the most recently issued render.
    latest_render: u64,
    preview: Option<Arc<PreviewSurface>>,
}

impl fmt::Debug for CropSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropSession")
            .field("generation", &self.generation)
            .field("phase", &self.phase)
            .field("dimensions", &self.dimensions())
            .field("edges", &self.edges)
            .field("latest_render", &self.latest_render)
            .field("preview", &self.preview.as_ref().map(|p| (p.sequence, p.rect)))
            .finish_non_exhaustive()
    }
}

impl CropSession {
    pub fn new(config: CropperConfig, on_crop: impl FnMut(&CropOutput) + 'static) -> Self {
        Self {
            config,
            on_crop: Box::new(on_crop),
            generation: Generation::default(),
            decode_pending: false,
            source: None,
            edges: EdgeOffsets::ZERO,
            phase: CropPhase::Empty,
            latest_render: 0,
            preview: None,
        }
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    /// True only right after a delivered confirm, until the next edit or load.
    pub fn is_confirmed(&self) -> bool {
        self.phase == CropPhase::Confirmed
    }

    /// True while a decode for the current generation is outstanding.
    pub fn is_loading(&self) -> bool {
        self.decode_pending
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn edges(&self) -> EdgeOffsets {
        self.edges
    }

    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_deref()
    }

    /// Source dimensions, once the current source has been decoded.
    pub fn dimensions(&self) -> Option<ImageDimensions> {
        self.source.as_ref().map(|source| source.dimensions())
    }

    pub fn crop_rect(&self) -> Option<CropRectangle> {
        self.dimensions().map(|dims| resolve_crop(&self.edges, dims))
    }

    /// Guide insets for the source as displayed. `None` until the current
    /// source's dimensions are known, so nothing is drawn from a previous
    /// image's offsets.
    pub fn overlay(&self) -> Option<OverlayInsets> {
        let dims = self.dimensions()?;
        Some(overlay_insets(&self.edges, Some(dims)))
    }

    /// Range a slider for `edge` should offer right now.
    pub fn slider_range(&self, edge: Edge) -> Option<RangeInclusive<u32>> {
        let dims = self.dimensions()?;
        Some(edges::slider_range(
            &self.edges,
            edge,
            dims,
            self.config.slider_margin,
        ))
    }

    pub fn preview(&self) -> Option<&PreviewSurface> {
        self.preview.as_deref()
    }

    /// Start a new session on `resource`.
    ///
    /// Offsets, confirmation and preview are cleared immediately; the session
    /// stays `Empty` until the returned ticket's outcome is applied.
    pub fn load(&mut self, resource: ImageResource) -> DecodeTicket {
        self.start_generation();
        self.decode_pending = true;
        log::debug!(
            "loading {} byte {:?} source (generation {})",
            resource.bytes().len(),
            resource.mime_type(),
            self.generation.value()
        );

        DecodeTicket {
            generation: self.generation,
            resource: Arc::new(resource),
            options: self.config.decode_options(),
        }
    }

    /// Drop the current source and anything still in flight for it.
    pub fn clear(&mut self) {
        self.start_generation();
        log::debug!("session cleared (generation {})", self.generation.value());
    }

    fn start_generation(&mut self) {
        self.generation = self.generation.next();
        self.decode_pending = false;
        self.source = None;
        self.edges = EdgeOffsets::ZERO;
        self.phase = CropPhase::Empty;
        self.preview = None;
    }

    /// Apply a finished decode.
    ///
    /// Returns the ticket for the first full-image preview, or `None` when the
    /// outcome is stale or the source could not be decoded.
    pub fn apply_decode(&mut self, outcome: DecodeOutcome) -> Option<RenderTicket> {
        if outcome.generation != self.generation || !self.decode_pending {
            log::debug!(
                "dropping stale decode (generation {}, current {})",
                outcome.generation.value(),
                self.generation.value()
            );
            return None;
        }
        self.decode_pending = false;

        match outcome.result {
            Ok(image) => {
                log::debug!("source ready: {}x{}", image.width, image.height);
                self.source = Some(Arc::new(image));
                self.edges = EdgeOffsets::ZERO;
                self.phase = CropPhase::Loaded;
                self.issue_render()
            }
            Err(err) => {
                log::warn!("source could not be decoded: {err}");
                None
            }
        }
    }

    /// Propose a new offset for one edge.
    ///
    /// An edit that would leave less than one pixel of span is rejected in
    /// full and the offsets keep their previous values. Returns the redraw
    /// ticket for an accepted edit, `None` otherwise.
    pub fn set_edge(&mut self, edge: Edge, value: u32) -> Option<RenderTicket> {
        let dims = self.dimensions()?;

        match self.edges.with_edge(edge, value, dims) {
            Ok(next) => {
                self.edges = next;
                self.phase = CropPhase::Previewing;
                self.issue_render()
            }
            Err(rejection) => {
                log::trace!("{rejection}");
                None
            }
        }
    }

    /// Zero all offsets, restoring the full image as the crop.
    pub fn reset(&mut self) -> Option<RenderTicket> {
        self.source.as_ref()?;
        self.edges = EdgeOffsets::ZERO;
        self.phase = CropPhase::Loaded;
        self.issue_render()
    }

    fn issue_render(&mut self) -> Option<RenderTicket> {
        let source = self.source.clone()?;
        let rect = resolve_crop(&self.edges, source.dimensions());
        self.latest_render += 1;

        Some(RenderTicket {
            generation: self.generation,
            sequence: self.latest_render,
            source,
            rect,
        })
    }

    /// Install a rendered preview. Returns false if it was stale.
    pub fn apply_render(&mut self, surface: PreviewSurface) -> bool {
        if surface.generation != self.generation {
            log::debug!("dropping preview for a replaced source");
            return false;
        }
        if let Some(current) = &self.preview {
            if surface.sequence <= current.sequence {
                log::debug!(
                    "dropping preview {} (showing {})",
                    surface.sequence,
                    current.sequence
                );
                return false;
            }
        }

        self.preview = Some(Arc::new(surface));
        true
    }

    /// Start confirming the current preview.
    ///
    /// Returns `None` (and nothing happens) when there is no preview yet or
    /// the preview has not caught up with the latest edit.
    pub fn begin_confirm(&mut self) -> Option<EncodeTicket> {
        let Some(surface) = self.preview.clone() else {
            log::debug!("confirm ignored: no preview rendered");
            return None;
        };
        if surface.sequence != self.latest_render {
            log::debug!("confirm ignored: preview is behind the latest edit");
            return None;
        }

        Some(EncodeTicket {
            generation: self.generation,
            surface,
            compression: self.config.png_compression,
        })
    }

    /// Apply a finished encode, firing `on_crop` on success.
    pub fn apply_encode(&mut self, outcome: EncodeOutcome) -> Option<CropOutput> {
        if outcome.generation != self.generation || outcome.sequence != self.latest_render {
            log::debug!("dropping encode for an outdated crop");
            return None;
        }

        match outcome.result {
            Ok(buffer) => {
                let output = CropOutput {
                    buffer,
                    rect: outcome.rect,
                    file_name: self.config.output_file_name.clone(),
                };
                self.phase = CropPhase::Confirmed;
                log::debug!(
                    "crop confirmed: {:?}, {} bytes",
                    output.rect,
                    output.buffer.len()
                );
                (self.on_crop)(&output);
                Some(output)
            }
            Err(err) => {
                log::warn!("crop could not be encoded: {err}");
                None
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
