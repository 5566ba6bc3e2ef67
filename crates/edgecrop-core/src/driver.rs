//! Async driver running session jobs on tokio's blocking pool.
//!
//! [`Cropper`] owns a [`CropSession`] and executes every ticket it hands out
//! with [`tokio::task::spawn_blocking`] on the runtime behind its [`Handle`].
//! Finished jobs are funnelled through one channel and applied back on the
//! owner's task in arrival order; the session's generation and sequence checks
//! decide which of them still count.
//!
//! The edit methods are synchronous and may be called from any thread; only
//! [`Cropper::process_next`] and [`Cropper::settle`] need to be awaited.
//!
//! ```ignore
//! let mut cropper = Cropper::new(CropperConfig::default(), |output| upload(output))?;
//! cropper.load(ImageResource::new(bytes, "image/png"));
//! cropper.settle().await;
//! cropper.set_edge(Edge::Left, 40);
//! cropper.confirm();
//! cropper.settle().await;
//! ```

use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::mpsc;
use tokio::task::JoinError;

use crate::config::CropperConfig;
use crate::decode::{DecodeError, ImageResource};
use crate::edges::Edge;
use crate::geometry::{CropRectangle, ImageDimensions};
use crate::session::{
    CropOutput, CropSession, DecodeOutcome, EncodeOutcome, PreviewSurface, RenderTicket,
};

/// A finished job on its way back to the session.
#[derive(Debug)]
enum Completion {
    Decoded(DecodeOutcome),
    Rendered(PreviewSurface),
    Encoded(EncodeOutcome),
}

/// What applying one completion did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropEvent {
    /// The current source decoded; the first preview is being drawn.
    Loaded(ImageDimensions),
    /// The current source could not be decoded; the session stays empty.
    LoadFailed(DecodeError),
    /// A newer preview is installed.
    PreviewUpdated(CropRectangle),
    /// `on_crop` fired with this output.
    Confirmed(CropOutput),
    /// The job belonged to a replaced source or outdated edit, or it failed
    /// without changing anything.
    Discarded,
}

/// Session driver that runs decode, render and encode jobs in the background.
pub struct Cropper {
    session: CropSession,
    handle: Handle,
    completions_tx: mpsc::UnboundedSender<Result<Completion, JoinError>>,
    completions_rx: mpsc::UnboundedReceiver<Result<Completion, JoinError>>,
    in_flight: usize,
}

impl Cropper {
    /// Create a cropper on the runtime the caller is running in.
    ///
    /// Fails when called outside a tokio runtime; use [`Cropper::with_handle`]
    /// to bind to a runtime from elsewhere.
    pub fn new(
        config: CropperConfig,
        on_crop: impl FnMut(&CropOutput) + 'static,
    ) -> Result<Self, TryCurrentError> {
        Ok(Self::with_handle(Handle::try_current()?, config, on_crop))
    }

    /// Create a cropper whose jobs run on `handle`'s runtime.
    pub fn with_handle(
        handle: Handle,
        config: CropperConfig,
        on_crop: impl FnMut(&CropOutput) + 'static,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            session: CropSession::new(config, on_crop),
            handle,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn session(&self) -> &CropSession {
        &self.session
    }

    /// Number of jobs started but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Replace the source image and start decoding it.
    pub fn load(&mut self, resource: ImageResource) {
        let ticket = self.session.load(resource);
        self.spawn(move || Completion::Decoded(ticket.run()));
    }

    /// Discard the source image.
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Propose a new edge offset. Returns false if the edit was rejected or no
    /// source is loaded.
    pub fn set_edge(&mut self, edge: Edge, value: u32) -> bool {
        let ticket = self.session.set_edge(edge, value);
        self.spawn_render(ticket)
    }

    /// Zero all edges. Returns false if no source is loaded.
    pub fn reset(&mut self) -> bool {
        let ticket = self.session.reset();
        self.spawn_render(ticket)
    }

    /// Start encoding the current preview. Returns false when there is nothing
    /// to confirm yet.
    pub fn confirm(&mut self) -> bool {
        match self.session.begin_confirm() {
            Some(ticket) => {
                self.spawn(move || Completion::Encoded(ticket.run()));
                true
            }
            None => false,
        }
    }

    fn spawn_render(&mut self, ticket: Option<RenderTicket>) -> bool {
        match ticket {
            Some(ticket) => {
                self.spawn(move || Completion::Rendered(ticket.run()));
                true
            }
            None => false,
        }
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> Completion + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        let blocking = self.handle.spawn_blocking(job);
        // awaiting the blocking handle turns a panicked job into a JoinError
        self.handle.spawn(async move {
            let completion = blocking.await;
            // The receiver lives as long as the cropper; a send error means it
            // was dropped and nobody is waiting for the result.
            let _ = tx.send(completion);
        });
    }

    /// Wait for the next finished job and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn process_next(&mut self) -> Option<CropEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        self.in_flight -= 1;

        let completion = match completion {
            Ok(completion) => completion,
            Err(err) => {
                log::warn!("cropper job did not finish: {err}");
                return Some(CropEvent::Discarded);
            }
        };

        let event = match completion {
            Completion::Decoded(outcome) => {
                let current = outcome.generation() == self.session.generation();
                let failure = outcome.result().as_ref().err().cloned();
                match (self.session.apply_decode(outcome), failure) {
                    (Some(render), _) => {
                        let dims = render.rect().dimensions();
                        self.spawn_render(Some(render));
                        CropEvent::Loaded(dims)
                    }
                    (None, Some(err)) if current => CropEvent::LoadFailed(err),
                    (None, _) => CropEvent::Discarded,
                }
            }
            Completion::Rendered(surface) => {
                let rect = surface.rect();
                if self.session.apply_render(surface) {
                    CropEvent::PreviewUpdated(rect)
                } else {
                    CropEvent::Discarded
                }
            }
            Completion::Encoded(outcome) => match self.session.apply_encode(outcome) {
                Some(output) => CropEvent::Confirmed(output),
                None => CropEvent::Discarded,
            },
        };
        Some(event)
    }

    /// Apply completions until no job is in flight, returning every event in
    /// the order it was applied.
    pub async fn settle(&mut self) -> Vec<CropEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.process_next().await {
            events.push(event);
        }
        events
    }
}
