//! Standalone HTML report, styled like the web UI

use crate::report::{ReportEntry, Summary};
use crate::view::{self, escape, result};
use chrono::Local;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, entries: &[ReportEntry]) -> io::Result<()> {
    let summary = Summary::from_entries(entries);

    // Most suspicious first, failures last
    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by_key(|entry| match entry {
        ReportEntry::Analyzed { analysis, .. } => analysis.result.score as u16,
        ReportEntry::Failed { .. } => u16::MAX,
    });

    let mut body = String::new();
    body.push_str(&header(&summary));

    for (panel, entry) in sorted.into_iter().enumerate() {
        match entry {
            ReportEntry::Analyzed { analysis, image } => {
                body.push_str(&format!(
                    "<h2 class=\"container source\">{}</h2>\n",
                    escape(&analysis.source)
                ));
                body.push_str(&result::result_panel(analysis, image.as_deref(), panel));
            }
            ReportEntry::Failed { source, error } => {
                body.push_str(&format!(
                    "<h2 class=\"container source\">{}</h2>\n",
                    escape(source)
                ));
                body.push_str(&view::layout::error_banner(error));
            }
        }
    }

    body.push_str(&view::layout::footer());

    writer.write_all(view::document("PhotoAuth Analysis Report", false, &body).as_bytes())
}

fn header(summary: &Summary) -> String {
    let tile = |value: usize, label: &str, class: &str| {
        format!(
            r#"        <div><div class="stat-value badge {class}">{value}</div><div class="stat-label">{label}</div></div>"#,
            class = class,
            value = value,
            label = label
        )
    };

    let mut tiles = vec![
        tile(summary.total, "Images", "unknown"),
        tile(summary.authentic, "Authentic", "authentic"),
        tile(summary.possibly_edited, "Possibly Edited", "possibly-edited"),
        tile(summary.ai_edited, "AI/Edited", "ai-edited"),
    ];
    if summary.unknown > 0 {
        tiles.push(tile(summary.unknown, "Unknown", "unknown"));
    }
    if summary.failed > 0 {
        tiles.push(tile(summary.failed, "Failed", "ai-edited"));
    }

    format!(
        r#"<section class="container" id="summary">
    <span class="logo">🛡 PhotoAuth</span>
    <p class="score-label">Analysis report generated {generated}</p>
    <div class="stats">
{tiles}
    </div>
</section>
"#,
        generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
        tiles = tiles.join("\n")
    )
}
