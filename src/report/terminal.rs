//! Terminal rendering: one coloured line per input, optional detail, summary

use crate::api::{BackendStats, BackendStatus};
use crate::error::ApiError;
use crate::format::Analysis;
use crate::report::{ReportEntry, Summary};

const RESET: &str = "\x1b[0m";
const GRAY: &str = "\x1b[90m";

pub const RULE_WIDTH: usize = 70;

pub fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// `[AUTHENTIC]   91%  conf 88.2%  photoshop     cat.jpg`
pub fn entry_line(entry: &ReportEntry) -> String {
    match entry {
        ReportEntry::Analyzed { analysis, .. } => verdict_line(analysis),
        ReportEntry::Failed { source, error } => format!(
            "{}{:<12}{} {:>4}  {:<11}  {:<12}  {}  {}",
            GRAY, "[ERROR]", RESET, "-", "", "", source, error
        ),
    }
}

pub fn verdict_line(analysis: &Analysis) -> String {
    let r = &analysis.result;
    let confidence = if r.confidence > 0.0 {
        format!("conf {:.1}%", r.confidence)
    } else {
        "conf -".to_string()
    };

    format!(
        "{}{:<12}{} {:>3}%  {:<11}  {:<12}  {}",
        r.verdict.ansi(),
        format!("[{}]", r.verdict),
        RESET,
        r.score,
        confidence,
        truncate(&r.software, 12),
        analysis.source
    )
}

/// Indented breakdown shown with `--verbose`.
pub fn detail_lines(analysis: &Analysis) -> Vec<String> {
    let r = &analysis.result;
    let mut lines = vec![format!("    {}", crate::format::summarize(Some(r)))];

    lines.push(format!(
        "    Models: vit={:.1}% clip={:.1}% | model label={}",
        r.vit_conf, r.clip_conf, r.model_label
    ));
    lines.push(format!(
        "    Metadata: exif={} possible_edit={} software={} | ela={}",
        yes_no(r.exif_present),
        yes_no(r.possible_edit),
        r.software,
        r.ela_score
    ));
    lines.push(format!(
        "    Heatmap: {} | analyzed {}",
        if r.heatmap.is_some() { "available" } else { "none" },
        analysis.analyzed_at
    ));
    lines
}

pub fn summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = vec![
        format!("\x1b[1mSummary:{}", RESET),
        format!("  \x1b[32m✓ Authentic:{}       {}", RESET, summary.authentic),
        format!("  \x1b[33m? Possibly edited:{} {}", RESET, summary.possibly_edited),
        format!("  \x1b[31m✗ AI/Edited:{}       {}", RESET, summary.ai_edited),
    ];
    if summary.unknown > 0 {
        lines.push(format!("  {}Unknown:{}           {}", GRAY, RESET, summary.unknown));
    }
    if summary.failed > 0 {
        lines.push(format!("  {}Errors:{}            {}", GRAY, RESET, summary.failed));
    }
    lines
}

pub fn stats_line(stats: &BackendStats) -> String {
    let updated = stats
        .last_update
        .as_deref()
        .map(|t| format!("  (updated {})", t))
        .unwrap_or_default();
    format!(
        "Accuracy {:.2}%  |  Avg time <{:.2}s  |  {}+ images analyzed{}",
        stats.avg_accuracy, stats.avg_time, stats.total_images, updated
    )
}

pub fn status_line(base_url: &str, status: &BackendStatus) -> String {
    let (color, model) = if status.model_available {
        ("\x1b[32m", "model loaded")
    } else {
        ("\x1b[33m", "model NOT loaded")
    };
    format!(
        "{}{}{}  {}  ({})",
        color,
        if status.status.is_empty() {
            "unknown"
        } else {
            status.status.as_str()
        },
        RESET,
        base_url,
        model
    )
}

/// Backend failure for the `status` and `stats` commands, with the HTTP
/// code when the server answered.
pub fn failure_line(err: &ApiError) -> String {
    match err.status() {
        Some(code) => format!("Backend returned HTTP {}: {}", code, err.user_message()),
        None => err.user_message(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
