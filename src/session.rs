//! One user's analysis session
//!
//! The session owns the [`ViewState`] and is the only thing that writes it.
//! A submission is validated, moves the state to `Analyzing`, and the
//! backend call runs on a worker thread. The worker never touches the
//! state; it sends its outcome back over a channel and the owner applies it
//! on its next [`Session::poll`] (or [`Session::wait`]).
//!
//! There is no cancellation. A reset while a request is in flight just
//! makes the eventual completion stale, and the state machine drops it.

use crate::api::{AnalysisRequest, AnalysisResponse, Backend};
use crate::error::{ApiError, SubmitError};
use crate::input::Submission;
use crate::state::{Ticket, ViewState};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

struct Completion {
    ticket: Ticket,
    outcome: Result<AnalysisResponse, ApiError>,
}

/// Uploaded image bytes kept around so the result panel can show them.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct Session<B: Backend> {
    backend: Arc<B>,
    state: ViewState,
    preview: Option<Preview>,
    upload_preview_url: Option<String>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: Arc<B>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            state: ViewState::new(),
            preview: None,
            upload_preview_url: None,
            tx,
            rx,
        }
    }

    /// URL the result panel should use to display an uploaded image.
    pub fn with_upload_preview(mut self, url: impl Into<String>) -> Self {
        self.upload_preview_url = Some(url.into());
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Bytes of the uploaded image currently on screen.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Validate and start an analysis.
    ///
    /// Invalid input and a busy session are rejected without touching the
    /// state or the network.
    pub fn submit(&mut self, submission: Submission) -> Result<(), SubmitError> {
        if self.state.is_analyzing() {
            return Err(SubmitError::Busy);
        }
        let request = submission.validate()?;

        let (preview_url, preview) = match &request {
            AnalysisRequest::Upload {
                content_type, bytes, ..
            } => (
                self.upload_preview_url.clone(),
                Some(Preview {
                    content_type: *content_type,
                    bytes: bytes.clone(),
                }),
            ),
            AnalysisRequest::Url(url) => (Some(url.clone()), None),
        };

        let ticket = self.state.begin(request.display_name(), preview_url)?;
        self.preview = preview;
        info!(source = request.display_name(), "submitting for analysis");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("photoauth-analyze".into())
            .spawn(move || {
                let outcome = backend.analyze(&request);
                // The receiver only goes away with the session.
                let _ = tx.send(Completion { ticket, outcome });
            });

        if let Err(e) = spawned {
            warn!(error = %e, "could not start analysis worker");
            self.state
                .complete(ticket, Err(ApiError::Request(e.to_string())));
            self.drop_unused_preview();
        }
        Ok(())
    }

    /// Apply every finished request without blocking. Returns how many
    /// changed the state.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.rx.try_recv() {
            if self.apply(done) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the in-flight analysis finishes or `timeout` passes.
    /// Returns true once the session is no longer analyzing.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_analyzing() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    self.apply(done);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.preview = None;
    }

    fn apply(&mut self, done: Completion) -> bool {
        let applied = self.state.complete(done.ticket, done.outcome);
        if applied {
            self.drop_unused_preview();
        }
        applied
    }

    fn drop_unused_preview(&mut self) {
        if self.state.result().is_none() {
            self.preview = None;
        }
    }
}
