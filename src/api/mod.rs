//! Transport adapter for the PhotoAuth analysis backend
//!
//! `ApiClient` issues the four calls the UI needs and folds every failure
//! into an [`ApiError`]:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`ApiClient::status`] | `GET /` |
//! | [`ApiClient::analyze_file`] | `POST /analyze` (multipart field `file`) |
//! | [`ApiClient::analyze_url`] | `POST /analyze/url` (JSON `{"url": ...}`) |
//! | [`ApiClient::stats`] | `GET /stats` |
//!
//! Non-2xx responses are expected to carry `{"detail": ...}`; that detail
//! becomes the user-facing message.

pub mod types;

use crate::config::Config;
use crate::error::ApiError;
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

pub use types::{
    AnalysisRequest, AnalysisResponse, BackendStats, BackendStatus, ElaReport, MetadataReport,
    ModelReport, SubModelScores,
};

/// What the session and the stats poller need from a backend.
pub trait Backend: Send + Sync + 'static {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError>;
    fn stats(&self) -> Result<BackendStats, ApiError>;
}

/// Blocking HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_url
    }

    /// Liveness check.
    pub fn status(&self) -> Result<BackendStatus, ApiError> {
        let url = self.config.endpoint("/");
        debug!(url = %url, "checking backend status");
        read_json(self.http.get(&url).send())
    }

    /// Upload image bytes for analysis.
    pub fn analyze_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisResponse, ApiError> {
        let url = self.config.endpoint("/analyze");
        info!(url = %url, file = file_name, size = bytes.len(), "uploading image");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        read_json(self.http.post(&url).multipart(form).send())
    }

    /// Ask the backend to fetch and analyse a remote image.
    pub fn analyze_url(&self, image_url: &str) -> Result<AnalysisResponse, ApiError> {
        let url = self.config.endpoint("/analyze/url");
        info!(url = %url, image = image_url, "submitting image url");
        read_json(
            self.http
                .post(&url)
                .json(&types::UrlBody { url: image_url })
                .send(),
        )
    }

    pub fn stats(&self) -> Result<BackendStats, ApiError> {
        let url = self.config.endpoint("/stats");
        debug!(url = %url, "fetching stats");
        read_json(self.http.get(&url).send())
    }
}

impl Backend for ApiClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError> {
        match request {
            AnalysisRequest::Upload {
                file_name,
                content_type,
                bytes,
            } => self.analyze_file(file_name, content_type, bytes.clone()),
            AnalysisRequest::Url(url) => self.analyze_url(url),
        }
    }

    fn stats(&self) -> Result<BackendStats, ApiError> {
        ApiClient::stats(self)
    }
}

/// Turn a send result into parsed JSON or a classified error.
fn read_json<T: DeserializeOwned>(sent: reqwest::Result<Response>) -> Result<T, ApiError> {
    let response = sent.map_err(classify)?;
    let status = response.status();
    let body = match response.text() {
        Ok(body) => body,
        // The server did answer, just not with a readable error body.
        Err(e) if !status.is_success() => {
            warn!(status = status.as_u16(), error = %e, "could not read error body");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: "Server error".to_string(),
            });
        }
        Err(e) => return Err(classify(e)),
    };

    if !status.is_success() {
        let message = detail_message(&body);
        warn!(status = status.as_u16(), message = %message, "backend returned an error");
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!(error = %e, "backend response was not the expected JSON");
        ApiError::Malformed(e)
    })
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::Request(err.to_string())
    } else {
        warn!(error = %err, "no response from backend");
        ApiError::NoResponse(err)
    }
}

/// Pull the user-facing message out of an error body.
///
/// FastAPI sends `detail` as a string for raised errors and as a list of
/// `{loc, msg, type}` objects for request validation failures.
fn detail_message(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                "Server error".to_string()
            } else {
                msgs.join("; ")
            }
        }
        _ => "Server error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NO_RESPONSE_MESSAGE;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    // ==========================================================================
    // FAKE BACKEND
    // ==========================================================================
    //
    // A throwaway tiny_http server that answers exactly one request with a
    // canned status/body and hands back what it received.
    // ==========================================================================

    struct Captured {
        method: String,
        url: String,
        content_type: String,
        body: Vec<u8>,
    }

    fn fake_backend(status: u16, body: &'static str) -> (Config, JoinHandle<Captured>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let handle = thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let mut received = Vec::new();
            request.as_reader().read_to_end(&mut received).unwrap();
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.to_string())
                .unwrap_or_default();
            let captured = Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body: received,
            };
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
            request.respond(response).unwrap();
            captured
        });
        let config = Config::default().with_api_url(Some(format!("http://127.0.0.1:{}", port)));
        (config, handle)
    }

    /// A base URL nothing is listening on.
    fn dead_backend() -> Config {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Config::default()
            .with_api_url(Some(format!("http://127.0.0.1:{}", port)))
            .with_timeout(Duration::from_secs(2))
    }

    const OK_BODY: &str = r#"{"filename":"cat.png","final_label":"Authentic","authenticity_score":0.91,
        "model":{"available":true,"label":"Authentic","confidence":88.0,"models":{"vit_conf":90.0,"clip_conf":86.0}},
        "metadata":{"exif_present":true,"possible_edit":false,"software":"Unknown"},"ela":{"ela_score":0.8}}"#;

    // ==========================================================================
    // REQUEST SHAPE
    // ==========================================================================

    #[test]
    fn test_analyze_file_sends_multipart_file_field() {
        let (config, handle) = fake_backend(200, OK_BODY);
        let client = ApiClient::new(config).unwrap();

        let resp = client
            .analyze_file("cat.png", "image/png", b"\x89PNG fake".to_vec())
            .unwrap();
        assert_eq!(resp.final_label.as_deref(), Some("Authentic"));

        let captured = handle.join().unwrap();
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.url, "/analyze");
        assert!(captured.content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&captured.body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"cat.png\""));
        assert!(body.contains("image/png"));
    }

    #[test]
    fn test_analyze_url_sends_json_body() {
        let (config, handle) = fake_backend(200, OK_BODY);
        let client = ApiClient::new(config).unwrap();

        client.analyze_url("https://img.test/cat.png").unwrap();

        let captured = handle.join().unwrap();
        assert_eq!(captured.method, "POST");
        assert_eq!(captured.url, "/analyze/url");
        assert!(captured.content_type.starts_with("application/json"));
        let sent: Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(sent, serde_json::json!({"url": "https://img.test/cat.png"}));
    }

    #[test]
    fn test_stats_and_status_use_get() {
        let (config, handle) = fake_backend(200, r#"{"total_images":3,"avg_time":0.5,"avg_accuracy":77.0}"#);
        let stats = ApiClient::new(config).unwrap().stats().unwrap();
        assert_eq!(stats.total_images, 3);
        let captured = handle.join().unwrap();
        assert_eq!((captured.method.as_str(), captured.url.as_str()), ("GET", "/stats"));

        let (config, handle) = fake_backend(200, r#"{"status":"ok","model_available":false}"#);
        let status = ApiClient::new(config).unwrap().status().unwrap();
        assert_eq!(status.status, "ok");
        let captured = handle.join().unwrap();
        assert_eq!((captured.method.as_str(), captured.url.as_str()), ("GET", "/"));
    }

    // ==========================================================================
    // FAILURE NORMALIZATION
    // ==========================================================================

    #[test]
    fn test_server_detail_surfaces_verbatim() {
        let (config, handle) = fake_backend(400, r#"{"detail":"bad file"}"#);
        let client = ApiClient::new(config).unwrap();

        let err = client.analyze_file("x.png", "image/png", vec![0]).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, ApiError::Server { status: 400, .. }));
        assert_eq!(err.user_message(), "bad file");
    }

    #[test]
    fn test_server_error_without_detail() {
        let (config, handle) = fake_backend(500, "Internal Server Error");
        let err = ApiClient::new(config).unwrap().stats().unwrap_err();
        handle.join().unwrap();
        assert_eq!(err.user_message(), "Server error");
    }

    #[test]
    fn test_validation_detail_list_is_joined() {
        let (config, handle) = fake_backend(
            422,
            r#"{"detail":[{"loc":["body","url"],"msg":"field required","type":"value_error.missing"}]}"#,
        );
        let err = ApiClient::new(config).unwrap().analyze_url("https://x.test/a.png").unwrap_err();
        handle.join().unwrap();
        assert_eq!(err.user_message(), "field required");
    }

    #[test]
    fn test_no_response_uses_fixed_message() {
        let client = ApiClient::new(dead_backend()).unwrap();
        let err = client.analyze_url("https://x.test/a.png").unwrap_err();

        assert!(matches!(err, ApiError::NoResponse(_)));
        assert_eq!(err.user_message(), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_timeout_counts_as_no_response() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let handle = thread::spawn(move || {
            // Hold the request without answering until the client gives up.
            let request = server.recv().unwrap();
            thread::sleep(Duration::from_millis(1500));
            drop(request);
        });

        let config = Config::default()
            .with_api_url(Some(format!("http://127.0.0.1:{}", port)))
            .with_timeout(Duration::from_millis(300));
        let err = ApiClient::new(config).unwrap().stats().unwrap_err();
        handle.join().unwrap();

        assert_eq!(err.user_message(), NO_RESPONSE_MESSAGE);
    }

    /// Answers one request with `head` and a body cut short of its
    /// declared length, then hangs up.
    fn truncated_backend(head: &'static str) -> (Config, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(b"Content-Length: 500\r\n\r\n{\"detail\":").unwrap();
            stream.flush().unwrap();
        });
        let config = Config::default()
            .with_api_url(Some(format!("http://127.0.0.1:{}", port)))
            .with_timeout(Duration::from_secs(5));
        (config, handle)
    }

    #[test]
    fn test_unreadable_error_body_is_still_a_server_error() {
        let (config, handle) = truncated_backend("HTTP/1.1 502 Bad Gateway\r\n");
        let err = ApiClient::new(config).unwrap().stats().unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, ApiError::Server { status: 502, .. }));
        assert_eq!(err.user_message(), "Server error");
    }

    #[test]
    fn test_malformed_body() {
        let (config, handle) = fake_backend(200, "<html>not json</html>");
        let err = ApiClient::new(config).unwrap().stats().unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn test_unbuildable_request() {
        let config = Config::default().with_api_url(Some("not a base url".into()));
        let err = ApiClient::new(config).unwrap().stats().unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn test_detail_message_fallbacks() {
        assert_eq!(detail_message(r#"{"detail":"nope"}"#), "nope");
        assert_eq!(detail_message(r#"{"detail":""}"#), "Server error");
        assert_eq!(detail_message(r#"{"detail":42}"#), "Server error");
        assert_eq!(detail_message(r#"{"detail":[]}"#), "Server error");
        assert_eq!(detail_message(""), "Server error");
    }
}
