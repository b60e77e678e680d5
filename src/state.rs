//! View state machine
//!
//! ```text
//!            begin                 complete(Ok)
//!   Idle ───────────▶ Analyzing ───────────────▶ Result
//!    ▲                   │    complete(Err) /       │
//!    │                   └──── rejected resp ──▶ Error
//!    └──────────── reset (from anywhere) ───────────┘
//! ```
//!
//! `begin` is refused while analyzing. Every `begin` and `reset` bumps a
//! generation counter; a completion carrying an older ticket is dropped, which
//! is how a reset discards a request that is still in flight.

use crate::api::AnalysisResponse;
use crate::error::{ApiError, SubmitError};
use crate::format::{format_result, Analysis};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Idle,
    Analyzing {
        source: String,
        preview: Option<String>,
    },
    Result(Analysis),
    Error(String),
}

/// Identifies one `begin` so its completion can be matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    phase: Phase,
    image_url: Option<String>,
    generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            image_url: None,
            generation: 0,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Analyzing { .. })
    }

    pub fn result(&self) -> Option<&Analysis> {
        match &self.phase {
            Phase::Result(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Image shown next to the result. Only set while a result is shown.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Enter `Analyzing`. Clears any previous result or error.
    pub fn begin(
        &mut self,
        source: impl Into<String>,
        preview: Option<String>,
    ) -> Result<Ticket, SubmitError> {
        if self.is_analyzing() {
            return Err(SubmitError::Busy);
        }
        self.generation += 1;
        self.image_url = None;
        self.phase = Phase::Analyzing {
            source: source.into(),
            preview,
        };
        debug!(generation = self.generation, "analysis started");
        Ok(Ticket(self.generation))
    }

    /// Apply the outcome of the request started with `ticket`.
    ///
    /// Returns false (and changes nothing) when the ticket is stale or no
    /// analysis is running.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResponse, ApiError>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, generation = self.generation, "discarding stale result");
            return false;
        }
        let (source, preview) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Analyzing { source, preview } => (source, preview),
            other => {
                self.phase = other;
                return false;
            }
        };

        self.phase = match outcome {
            Ok(response) => match response.rejection() {
                Some(message) => Phase::Error(message),
                None => match format_result(Some(&response)) {
                    Some(formatted) => {
                        self.image_url = preview;
                        Phase::Result(Analysis::now(source, formatted))
                    }
                    None => Phase::Error("Something went wrong while analyzing the image.".into()),
                },
            },
            Err(err) => Phase::Error(err.user_message()),
        };
        debug!(generation = self.generation, error = ?self.error(), "analysis finished");
        true
    }

    /// Back to the initial state. An in-flight request's result will be ignored.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.image_url = None;
    }

    /// Same content as a fresh state, ignoring the generation counter.
    pub fn is_initial(&self) -> bool {
        self.phase == Phase::Idle && self.image_url.is_none()
    }
}
