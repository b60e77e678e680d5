//! HTTP server for the interactive web UI
//!
//! `photoauth serve` → starts server, opens browser, renders the page
//!
//! One thread owns the [`Session`]. It alternates between answering a
//! single request and applying finished analyses, so the view state never
//! needs a lock. Pages are rendered server-side from the state; while an
//! analysis runs the page refreshes itself until the result lands.

use crate::api::{ApiClient, Backend, BackendStats};
use crate::config::Config;
use crate::error::SubmitError;
use crate::input::Submission;
use crate::session::Session;
use crate::stats::StatsPoller;
use crate::view::{self, PageModel};
use serde::Deserialize;
use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Deserialize, Default)]
struct FileQuery {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize, Default)]
struct UrlForm {
    #[serde(default)]
    url: String,
}

/// What a route decided to send back.
#[derive(Debug, PartialEq)]
enum Reply {
    Html(String),
    Json(String),
    Bytes {
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    /// 303 back to the page.
    SeeOther,
    NotFound,
}

/// Start server, open browser, serve UI
pub fn start(port: u16, config: Config, open_browser: bool) -> io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let client = ApiClient::new(config.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let backend = Arc::new(client);

    let (stats_tx, stats_rx) = mpsc::channel();
    let _poller = StatsPoller::spawn(Arc::clone(&backend), config.stats_interval, move |stats| {
        // The receiver lives as long as the server loop.
        let _ = stats_tx.send(stats);
    })?;

    let mut app = App::new(backend, stats_rx);

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32m🛡 PhotoAuth\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Backend: {}\n", config.api_url);
    info!(%addr, backend = %config.api_url, "server listening");

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "could not open browser");
        }
    }

    loop {
        if let Some(request) = server.recv_timeout(POLL_INTERVAL)? {
            if let Err(e) = app.handle(request) {
                warn!(error = %e, "request failed");
            }
        }
        app.tick();
    }
}

struct App<B: Backend> {
    session: Session<B>,
    stats: Option<BackendStats>,
    stats_rx: Receiver<BackendStats>,
    /// Validation message for the next page render only.
    alert: Option<String>,
}

impl<B: Backend> App<B> {
    fn new(backend: Arc<B>, stats_rx: Receiver<BackendStats>) -> Self {
        Self {
            session: Session::new(backend).with_upload_preview("/preview"),
            stats: None,
            stats_rx,
            alert: None,
        }
    }

    /// Apply finished analyses and the freshest stats reading.
    fn tick(&mut self) {
        self.session.poll();
        while let Ok(stats) = self.stats_rx.try_recv() {
            self.stats = Some(stats);
        }
    }

    fn handle(&mut self, mut request: Request) -> io::Result<()> {
        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, %url, "request");

        let mut body = Vec::new();
        if method == Method::Post {
            request.as_reader().read_to_end(&mut body)?;
        }

        // Apply anything that finished before rendering.
        self.tick();
        let reply = self.route(&method, &url, body);
        respond(request, reply)
    }

    fn route(&mut self, method: &Method, url: &str, body: Vec<u8>) -> Reply {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        match (method, path) {
            (&Method::Get, "/") => {
                let alert = self.alert.take();
                Reply::Html(view::render_page(&PageModel {
                    state: self.session.state(),
                    stats: self.stats.as_ref(),
                    alert: alert.as_deref(),
                }))
            }

            (&Method::Post, "/submit/file") => {
                let query: FileQuery = serde_urlencoded::from_str(query).unwrap_or_default();
                self.submit(Submission::File {
                    name: query.name,
                    bytes: body,
                });
                Reply::SeeOther
            }

            (&Method::Post, "/submit/url") => {
                let form: UrlForm = serde_urlencoded::from_bytes(&body).unwrap_or_default();
                self.submit(Submission::Url(form.url));
                Reply::SeeOther
            }

            (&Method::Post, "/reset") => {
                self.session.reset();
                Reply::SeeOther
            }

            (&Method::Get, "/preview") => match self.session.preview() {
                Some(preview) => Reply::Bytes {
                    content_type: preview.content_type,
                    bytes: preview.bytes.clone(),
                },
                None => Reply::NotFound,
            },

            (&Method::Get, "/api/stats") => {
                let stats = self.stats.clone().unwrap_or_default();
                Reply::Json(serde_json::to_string(&stats).unwrap_or_else(|_| "{}".to_string()))
            }

            (&Method::Get, "/api/state") => {
                let state = self.session.state();
                let body = serde_json::json!({
                    "analyzing": state.is_analyzing(),
                    "error": state.error(),
                    "has_result": state.result().is_some(),
                });
                Reply::Json(body.to_string())
            }

            _ => Reply::NotFound,
        }
    }

    fn submit(&mut self, submission: Submission) {
        match self.session.submit(submission) {
            Ok(()) => {}
            Err(SubmitError::Busy) => debug!("submission ignored, analysis in flight"),
            Err(SubmitError::Input(e)) => {
                debug!(error = %e, "submission rejected");
                self.alert = Some(e.to_string());
            }
        }
    }
}

fn respond(request: Request, reply: Reply) -> io::Result<()> {
    let response = match reply {
        Reply::Html(html) => Response::from_string(html)
            .with_header(header("Content-Type", "text/html; charset=utf-8")?),
        Reply::Json(json) => {
            Response::from_string(json).with_header(header("Content-Type", "application/json")?)
        }
        Reply::Bytes {
            content_type,
            bytes,
        } => Response::from_data(bytes)
            .with_header(header("Content-Type", content_type)?)
            .with_header(header("Cache-Control", "no-store")?),
        Reply::SeeOther => Response::from_data(Vec::new())
            .with_status_code(303)
            .with_header(header("Location", "/")?),
        Reply::NotFound => Response::from_string("Not found").with_status_code(404),
    };
    request.respond(response)
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid header {}", name)))
}
