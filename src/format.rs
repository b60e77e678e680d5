//! Result formatting
//!
//! Turns the backend's [`AnalysisResponse`] into a flat [`FormattedResult`]
//! that every view (terminal, web page, report) can render without looking
//! at the wire format again.
//!
//! # Verdicts
//!
//! | Label | Colour | Icon |
//! |-------|--------|------|
//! | `Authentic` | green | ✅ |
//! | `Possibly Edited` | yellow | ⚠️ |
//! | `AI/Edited` | red | ❌ |
//! | anything else | gray | ⚪ |
//!
//! The score is `round(authenticity_score × 100)`, clamped to 0-100.

use crate::api::AnalysisResponse;
use chrono::Local;
use serde::Serialize;
use std::fmt;

/// Closed set of verdicts the backend can hand us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Authentic,
    PossiblyEdited,
    AiEdited,
    Unknown,
}

impl Verdict {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Authentic" => Verdict::Authentic,
            "Possibly Edited" => Verdict::PossiblyEdited,
            "AI/Edited" => Verdict::AiEdited,
            _ => Verdict::Unknown,
        }
    }

    /// Hex colour used by the web views.
    pub fn color(self) -> &'static str {
        match self {
            Verdict::Authentic => "#48BB78",
            Verdict::PossiblyEdited => "#F6E05E",
            Verdict::AiEdited => "#F56565",
            Verdict::Unknown => "#999999",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Verdict::Authentic => "✅",
            Verdict::PossiblyEdited => "⚠️",
            Verdict::AiEdited => "❌",
            Verdict::Unknown => "⚪",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Verdict::Authentic => "This image appears authentic with minimal manipulation.",
            Verdict::PossiblyEdited => "Some inconsistencies detected. Image may have been edited.",
            Verdict::AiEdited => "High probability of AI generation or photo manipulation.",
            Verdict::Unknown => "",
        }
    }

    /// ANSI escape for terminal output.
    pub fn ansi(self) -> &'static str {
        match self {
            Verdict::Authentic => "\x1b[32m",      // Green
            Verdict::PossiblyEdited => "\x1b[33m", // Yellow
            Verdict::AiEdited => "\x1b[31m",       // Red
            Verdict::Unknown => "\x1b[90m",        // Gray
        }
    }

    /// CSS class suffix used by the web views.
    pub fn css_class(self) -> &'static str {
        match self {
            Verdict::Authentic => "authentic",
            Verdict::PossiblyEdited => "possibly-edited",
            Verdict::AiEdited => "ai-edited",
            Verdict::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Authentic => write!(f, "AUTHENTIC"),
            Verdict::PossiblyEdited => write!(f, "EDITED?"),
            Verdict::AiEdited => write!(f, "AI/EDITED"),
            Verdict::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// UI-ready view of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedResult {
    pub label: String,
    pub verdict: Verdict,
    /// Authenticity, 0-100.
    pub score: u8,
    pub color: &'static str,
    pub status_icon: &'static str,
    pub description: &'static str,
    /// Combined model confidence, percent.
    pub confidence: f64,
    pub model_label: String,
    pub vit_conf: f64,
    pub clip_conf: f64,
    pub ela_score: f64,
    pub software: String,
    pub exif_present: bool,
    pub possible_edit: bool,
    /// Base64 JPEG Grad-CAM overlay, when the model produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl FormattedResult {
    /// Whether the software field names something real.
    pub fn has_software(&self) -> bool {
        !self.software.is_empty() && self.software != "Unknown"
    }
}

/// Format a backend response. `None` in, `None` out.
pub fn format_result(data: Option<&AnalysisResponse>) -> Option<FormattedResult> {
    let data = data?;

    let label = data
        .final_label
        .clone()
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let verdict = Verdict::from_label(&label);
    let model = &data.model;

    Some(FormattedResult {
        score: score_percent(data.authenticity_score),
        color: verdict.color(),
        status_icon: verdict.icon(),
        description: verdict.description(),
        label,
        verdict,
        confidence: finite_or_zero(model.confidence),
        model_label: model
            .label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "N/A".to_string()),
        vit_conf: finite_or_zero(model.models.vit_conf),
        clip_conf: finite_or_zero(model.models.clip_conf),
        ela_score: finite_or_zero(data.ela.ela_score),
        software: data
            .metadata
            .software
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        exif_present: data.metadata.exif_present,
        possible_edit: data.metadata.possible_edit,
        heatmap: model.gradcam.clone().filter(|g| !g.is_empty()),
        filename: data.filename.clone(),
    })
}

/// `authenticity_score` is a fraction; anything outside [0, 1] is clamped.
fn score_percent(raw: Option<f64>) -> u8 {
    let fraction = finite_or_zero(raw.unwrap_or(0.0)).clamp(0.0, 1.0);
    (fraction * 100.0).round() as u8
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// One-line summary, e.g. `✅ Authentic (91%) — This image appears...`.
pub fn summarize(result: Option<&FormattedResult>) -> String {
    match result {
        Some(r) => format!("{} {} ({}%) — {}", r.status_icon, r.label, r.score, r.description),
        None => String::new(),
    }
}

/// A formatted result together with where it came from and when.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// File name or URL that was submitted.
    pub source: String,
    pub analyzed_at: String,
    #[serde(flatten)]
    pub result: FormattedResult,
}

impl Analysis {
    pub fn now(source: impl Into<String>, result: FormattedResult) -> Self {
        Self {
            source: source.into(),
            analyzed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            result,
        }
    }
}
