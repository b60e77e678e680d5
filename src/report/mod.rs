//! Report generation for analysis results
//!
//! - **Terminal**: coloured one-line verdicts, optional detail, batch summary
//! - **HTML**: standalone page reusing the web UI's result panel (heatmaps inlined)
//! - **JSON**: machine-readable formatted results
//!
//! # Usage
//!
//! ```ignore
//! use photoauth::report;
//!
//! // Format picked from the extension
//! report::generate("report.html", &entries)?;  // HTML
//! report::generate("report.json", &entries)?;  // JSON
//! ```

pub mod html;
pub mod json;
pub mod terminal;

use crate::error::ReportError;
use crate::format::{Analysis, Verdict};
use serde::Serialize;
use std::path::Path;

/// One submitted input and how it went.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Analyzed {
        #[serde(flatten)]
        analysis: Analysis,
        /// URL or `file://` path of the analysed image, when displayable.
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    Failed {
        source: String,
        error: String,
    },
}

impl ReportEntry {
    pub fn source(&self) -> &str {
        match self {
            ReportEntry::Analyzed { analysis, .. } => &analysis.source,
            ReportEntry::Failed { source, .. } => source,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            ReportEntry::Analyzed { analysis, .. } => Some(analysis.result.verdict),
            ReportEntry::Failed { .. } => None,
        }
    }
}

/// Generate a report in the format matching the file extension.
pub fn generate<P: AsRef<Path>>(path: P, entries: &[ReportEntry]) -> Result<(), ReportError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "html" | "htm" => {
            let mut file = std::fs::File::create(path)?;
            html::write(&mut file, entries)?;
        }
        "json" => {
            let mut file = std::fs::File::create(path)?;
            json::write(&mut file, entries)?;
        }
        _ => return Err(ReportError::UnsupportedFormat(ext)),
    }
    Ok(())
}

/// Verdict counts for a batch of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub authentic: usize,
    pub possibly_edited: usize,
    pub ai_edited: usize,
    pub unknown: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_entries(entries: &[ReportEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Self::default()
        };

        for entry in entries {
            match entry.verdict() {
                Some(Verdict::Authentic) => summary.authentic += 1,
                Some(Verdict::PossiblyEdited) => summary.possibly_edited += 1,
                Some(Verdict::AiEdited) => summary.ai_edited += 1,
                Some(Verdict::Unknown) => summary.unknown += 1,
                None => summary.failed += 1,
            }
        }

        summary
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::AnalysisResponse;
    use crate::format::format_result;

    // ==========================================================================
    // SUMMARY STATISTICS TESTS
    // ==========================================================================
    //
    // The Summary struct aggregates verdict counts for a batch of inputs.
    // It is printed after a directory run and shown at the top of reports.
    // ==========================================================================

    pub(crate) fn analyzed(label: &str, score: f64) -> ReportEntry {
        let response = AnalysisResponse {
            final_label: Some(label.to_string()),
            authenticity_score: Some(score),
            ..Default::default()
        };
        ReportEntry::Analyzed {
            analysis: Analysis::now(format!("{}.png", label), format_result(Some(&response)).unwrap()),
            image: None,
        }
    }

    pub(crate) fn failed(source: &str) -> ReportEntry {
        ReportEntry::Failed {
            source: source.to_string(),
            error: "No response from backend. Is the server running?".to_string(),
        }
    }

    #[test]
    fn test_summary_empty() {
        let summary = Summary::from_entries(&[]);
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_summary_mixed() {
        let entries = vec![
            analyzed("Authentic", 0.9),
            analyzed("Authentic", 0.85),
            analyzed("Possibly Edited", 0.7),
            analyzed("AI/Edited", 0.2),
            analyzed("Model Not Loaded", 0.5),
            failed("broken.png"),
        ];
        let summary = Summary::from_entries(&entries);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.authentic, 2);
        assert_eq!(summary.possibly_edited, 1);
        assert_eq!(summary.ai_edited, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_entry_accessors() {
        let ok = analyzed("AI/Edited", 0.1);
        assert_eq!(ok.source(), "AI/Edited.png");
        assert_eq!(ok.verdict(), Some(Verdict::AiEdited));

        let bad = failed("x.png");
        assert_eq!(bad.source(), "x.png");
        assert_eq!(bad.verdict(), None);
    }

    // ==========================================================================
    // FILE GENERATION
    // ==========================================================================

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("photoauth_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_generate_json_by_extension() {
        let path = temp_path("report.json");
        generate(&path, &[analyzed("Authentic", 0.9), failed("b.png")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["results"][0]["label"], "Authentic");
        assert_eq!(value["results"][1]["error"], "No response from backend. Is the server running?");
    }

    #[test]
    fn test_generate_html_by_extension() {
        let path = temp_path("report.HTML");
        generate(&path, &[analyzed("Possibly Edited", 0.7)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains("70%"));
    }

    #[test]
    fn test_generate_rejects_unknown_extension() {
        let path = temp_path("report.csv");
        let err = generate(&path, &[]).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(ext) if ext == "csv"));
        assert!(!path.exists());
    }
}
