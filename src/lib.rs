//! PhotoAuth - Is this image real?
//!
//! PhotoAuth is a client for an image-authenticity backend. You hand it an
//! image (a local file or a public URL), the backend runs its detectors, and
//! PhotoAuth shows the verdict: an authenticity score, a label, per-model
//! confidences, metadata findings and an optional Grad-CAM heatmap.
//!
//! # Overview
//!
//! The backend does all of the analysis. This crate is everything around
//! it: validating input before anything touches the network, talking to
//! the backend and normalizing its failures, turning raw responses into
//! display-ready results, and tracking what the user is looking at.
//!
//! # Quick Start
//!
//! ```no_run
//! use photoauth::{ApiClient, Config, Session, Submission};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let client = ApiClient::new(Config::from_env()).unwrap();
//! let mut session = Session::new(Arc::new(client));
//!
//! session
//!     .submit(Submission::Url("https://example.com/cat.jpg".into()))
//!     .unwrap();
//! session.wait(Duration::from_secs(20));
//!
//! if let Some(analysis) = session.state().result() {
//!     println!("{} {}%", analysis.result.label, analysis.result.score);
//! } else if let Some(error) = session.state().error() {
//!     println!("failed: {}", error);
//! }
//! ```
//!
//! # Verdicts
//!
//! | Label | Verdict | Meaning |
//! |-------|---------|---------|
//! | Authentic | ✅ | Minimal manipulation |
//! | Possibly Edited | ⚠️ | Some inconsistencies |
//! | AI/Edited | ❌ | Likely generated or manipulated |
//! | anything else | ⚪ | Backend could not decide |
//!
//! # Modules
//!
//! - [`api`]: Backend client and response types
//! - [`input`]: File and URL validation
//! - [`format`]: Response → display-ready result
//! - [`state`]: View state machine
//! - [`session`]: Submissions on worker threads, completions applied in order
//! - [`stats`]: Background statistics polling
//! - [`view`]: HTML components for the web UI
//! - [`report`]: Output formatters (terminal, HTML, JSON)
//! - [`serve`]: Local web UI

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod report;
pub mod serve;
pub mod session;
pub mod state;
pub mod stats;
pub mod view;

pub use api::{AnalysisResponse, ApiClient, Backend, BackendStats, BackendStatus};
pub use config::Config;
pub use error::{ApiError, InputError, ReportError, SubmitError};
pub use format::{format_result, summarize, Analysis, FormattedResult, Verdict};
pub use input::Submission;
pub use report::{ReportEntry, Summary};
pub use session::Session;
pub use state::ViewState;
pub use stats::StatsPoller;
