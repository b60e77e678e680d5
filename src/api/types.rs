//! Wire types for the analysis backend
//!
//! The schema is the one the backend's `/analyze` handler produces:
//! `final_label` plus `authenticity_score` as a fraction in [0, 1]. Every
//! field is optional on the wire; missing or `null` values fall back to
//! zero, `None` or `false` so the formatter never has to care.

use serde::{Deserialize, Deserializer, Serialize};

/// `null` and absent both become `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /analyze` and `POST /analyze/url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    pub filename: Option<String>,
    pub final_label: Option<String>,
    /// Fraction in [0, 1].
    pub authenticity_score: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub model: ModelReport,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: MetadataReport,
    #[serde(deserialize_with = "null_as_default")]
    pub ela: ElaReport,
    /// Set when the backend accepted the request but could not analyse it
    /// (e.g. the URL could not be fetched).
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl AnalysisResponse {
    /// The application-level error message, if this response carries one.
    pub fn rejection(&self) -> Option<String> {
        if self.error {
            Some(
                self.message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Analysis failed".to_string()),
            )
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelReport {
    #[serde(deserialize_with = "null_as_default")]
    pub available: bool,
    pub label: Option<String>,
    /// Percentage, 0-100.
    #[serde(deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub models: SubModelScores,
    /// Base64 JPEG Grad-CAM overlay.
    pub gradcam: Option<String>,
}

/// Per-detector confidences, percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubModelScores {
    #[serde(deserialize_with = "null_as_default")]
    pub vit_conf: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub clip_conf: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataReport {
    #[serde(deserialize_with = "null_as_default")]
    pub exif_present: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub possible_edit: bool,
    pub software: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElaReport {
    #[serde(deserialize_with = "null_as_default")]
    pub ela_score: f64,
}

/// Body of `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendStats {
    /// Percentage.
    #[serde(deserialize_with = "null_as_default")]
    pub avg_accuracy: f64,
    /// Seconds per image.
    #[serde(deserialize_with = "null_as_default")]
    pub avg_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_images: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendStatus {
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub model_available: bool,
}

/// Multipart upload or URL, exactly one per request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Upload {
        file_name: String,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    Url(String),
}

impl AnalysisRequest {
    /// What the result panel shows as the analysed image's name.
    pub fn display_name(&self) -> &str {
        match self {
            AnalysisRequest::Upload { file_name, .. } => file_name,
            AnalysisRequest::Url(url) => url,
        }
    }
}

/// JSON body of `POST /analyze/url`.
#[derive(Debug, Serialize)]
pub(crate) struct UrlBody<'a> {
    pub url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = r#"{
        "filename": "cat.jpg",
        "final_label": "Possibly Edited",
        "authenticity_score": 0.71,
        "model": {
            "available": true,
            "label": "Authentic",
            "confidence": 66.4,
            "models": {"vit_conf": 70.1, "clip_conf": 62.7},
            "gradcam": "aGVhdG1hcA=="
        },
        "metadata": {"exif_present": true, "possible_edit": true, "software": "gimp 2.10"},
        "ela": {"ela_score": 0.42, "note": "ignored"}
    }"#;

    #[test]
    fn test_parse_full_response() {
        let resp: AnalysisResponse = serde_json::from_str(FULL_RESPONSE).unwrap();
        assert_eq!(resp.filename.as_deref(), Some("cat.jpg"));
        assert_eq!(resp.final_label.as_deref(), Some("Possibly Edited"));
        assert_eq!(resp.authenticity_score, Some(0.71));
        assert!(resp.model.available);
        assert_eq!(resp.model.models.vit_conf, 70.1);
        assert_eq!(resp.model.gradcam.as_deref(), Some("aGVhdG1hcA=="));
        assert!(resp.metadata.possible_edit);
        assert_eq!(resp.ela.ela_score, 0.42);
        assert_eq!(resp.rejection(), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let resp: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, AnalysisResponse::default());
    }

    #[test]
    fn test_nulls_default() {
        // The backend sends `software: null` when EXIF is absent and an
        // unloaded model reports `models: {}`.
        let json = r#"{
            "final_label": "AI/Edited",
            "authenticity_score": null,
            "model": {"available": false, "label": "Model Not Loaded", "confidence": null, "models": {}},
            "metadata": {"exif_present": false, "possible_edit": false, "software": null},
            "ela": null
        }"#;
        let resp: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.authenticity_score, None);
        assert_eq!(resp.model.confidence, 0.0);
        assert_eq!(resp.model.models, SubModelScores::default());
        assert_eq!(resp.metadata.software, None);
        assert_eq!(resp.ela.ela_score, 0.0);
    }

    #[test]
    fn test_application_level_rejection() {
        let json = r#"{"error": true, "message": "Could not fetch image: 404"}"#;
        let resp: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.rejection().as_deref(), Some("Could not fetch image: 404"));

        let bare: AnalysisResponse = serde_json::from_str(r#"{"error": true}"#).unwrap();
        assert_eq!(bare.rejection().as_deref(), Some("Analysis failed"));
    }

    #[test]
    fn test_parse_stats() {
        let json = r#"{"total_images": 12, "avg_time": 1.37, "avg_accuracy": 81.25, "last_update": "2025-01-01T00:00:00"}"#;
        let stats: BackendStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_images, 12);
        assert_eq!(stats.avg_time, 1.37);
        assert_eq!(stats.avg_accuracy, 81.25);
        assert!(stats.last_update.is_some());
    }

    #[test]
    fn test_parse_status() {
        let status: BackendStatus =
            serde_json::from_str(r#"{"status": "ok", "model_available": true}"#).unwrap();
        assert_eq!(status.status, "ok");
        assert!(status.model_available);
    }

    #[test]
    fn test_display_name() {
        let upload = AnalysisRequest::Upload {
            file_name: "a.png".into(),
            content_type: "image/png",
            bytes: vec![1, 2, 3],
        };
        assert_eq!(upload.display_name(), "a.png");
        assert_eq!(
            AnalysisRequest::Url("https://x.test/a.png".into()).display_name(),
            "https://x.test/a.png"
        );
    }
}
