//! Input validation
//!
//! Raw user input becomes an [`AnalysisRequest`] here or is rejected with
//! an [`InputError`]. Nothing in this module touches the network, so a
//! rejected submission can never reach the backend.

use crate::api::AnalysisRequest;
use crate::error::InputError;
use reqwest::Url;
use std::path::Path;

/// Image extensions the upload box accepts, with their MIME types.
pub const SUPPORTED_IMAGES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// Unvalidated input from either front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    File { name: String, bytes: Vec<u8> },
    Url(String),
}

impl Submission {
    /// Read a file from disk into a submission.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Check the type first so we don't read a 2GB video just to reject it.
        content_type_for(&name)?;
        let bytes = std::fs::read(path).map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Submission::File { name, bytes })
    }

    pub fn validate(self) -> Result<AnalysisRequest, InputError> {
        match self {
            Submission::File { name, bytes } => {
                let content_type = content_type_for(&name)?;
                Ok(AnalysisRequest::Upload {
                    file_name: name,
                    content_type,
                    bytes,
                })
            }
            Submission::Url(raw) => validate_url(&raw).map(AnalysisRequest::Url),
        }
    }
}

/// MIME type for a supported image file name.
pub fn content_type_for(file_name: &str) -> Result<&'static str, InputError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    SUPPORTED_IMAGES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .ok_or(InputError::UnsupportedFileType(ext))
}

pub fn is_supported_image(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| content_type_for(n).is_ok())
        .unwrap_or(false)
}

/// Trim and check that the text is an absolute http(s) URL with a host.
pub fn validate_url(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|_| InputError::InvalidUrl(trimmed.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(trimmed.to_string()),
        _ => Err(InputError::InvalidUrl(trimmed.to_string())),
    }
}

/// Does this CLI argument look like a URL rather than a path?
pub fn looks_like_url(arg: &str) -> bool {
    let lower = arg.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_case_insensitive() {
        assert_eq!(content_type_for("a.PNG").unwrap(), "image/png");
        assert_eq!(content_type_for("photo.JpEg").unwrap(), "image/jpeg");
        assert_eq!(content_type_for("x.webp").unwrap(), "image/webp");
        assert_eq!(content_type_for("anim.gif").unwrap(), "image/gif");
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            content_type_for("doc.pdf"),
            Err(InputError::UnsupportedFileType(ext)) if ext == "pdf"
        ));
        assert!(matches!(
            content_type_for("no_extension"),
            Err(InputError::UnsupportedFileType(ext)) if ext.is_empty()
        ));
    }

    #[test]
    fn test_file_submission_validates() {
        let request = Submission::File {
            name: "cat.jpg".into(),
            bytes: vec![0xFF, 0xD8],
        }
        .validate()
        .unwrap();
        assert_eq!(
            request,
            AnalysisRequest::Upload {
                file_name: "cat.jpg".into(),
                content_type: "image/jpeg",
                bytes: vec![0xFF, 0xD8],
            }
        );
    }

    #[test]
    fn test_url_is_trimmed() {
        let request = Submission::Url("  https://img.test/a.png \n".into())
            .validate()
            .unwrap();
        assert_eq!(request, AnalysisRequest::Url("https://img.test/a.png".into()));
    }

    #[test]
    fn test_rejected_urls() {
        assert!(matches!(validate_url(""), Err(InputError::EmptyUrl)));
        assert!(matches!(validate_url("   "), Err(InputError::EmptyUrl)));
        for bad in ["cat.png", "ftp://img.test/a.png", "file:///etc/passwd", "http://", "javascript:alert(1)"] {
            assert!(
                matches!(validate_url(bad), Err(InputError::InvalidUrl(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Submission::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, InputError::Unreadable { .. }));
    }

    #[test]
    fn test_from_path_wrong_type_is_rejected_before_reading() {
        let err = Submission::from_path(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, InputError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_from_path_reads_bytes() {
        let path = std::env::temp_dir().join(format!("photoauth_input_{}.png", std::process::id()));
        std::fs::write(&path, b"png bytes").unwrap();
        let submission = Submission::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        match submission {
            Submission::File { name, bytes } => {
                assert!(name.ends_with(".png"));
                assert_eq!(bytes, b"png bytes");
            }
            other => panic!("expected file submission, got {:?}", other),
        }
    }

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://a.test/x.png"));
        assert!(looks_like_url("HTTP://a.test/x.png"));
        assert!(!looks_like_url("./photos/x.png"));
        assert!(!looks_like_url("httpdocs/x.png"));
    }
}
