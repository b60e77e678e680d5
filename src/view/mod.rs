//! HTML views for the interactive UI
//!
//! Every component is a pure function from data to an HTML fragment; the
//! only composition logic lives in [`render_page`]:
//!
//! - no result: navbar, hero (upload + URL), features, footer
//! - result: navbar, result panel, "Analyze Another Image", features, footer
//! - analyzing: the same page under a loading overlay that refreshes itself
//! - error: an inline banner above the hero, new submissions still allowed

pub mod features;
pub mod hero;
pub mod layout;
pub mod result;

use crate::api::BackendStats;
use crate::state::ViewState;

/// Everything a page render needs.
pub struct PageModel<'a> {
    pub state: &'a ViewState,
    pub stats: Option<&'a BackendStats>,
    /// One-shot validation message shown as a blocking alert.
    pub alert: Option<&'a str>,
}

pub fn render_page(model: &PageModel<'_>) -> String {
    let state = model.state;
    let mut body = String::new();

    body.push_str(&layout::navbar());

    if state.is_analyzing() {
        body.push_str(&layout::loading_overlay());
    }
    if let Some(error) = state.error() {
        body.push_str(&layout::error_banner(error));
    }

    match state.result() {
        Some(analysis) => {
            body.push_str(&result::result_panel(analysis, state.image_url(), 0));
            body.push_str(&result::reset_button());
        }
        None => body.push_str(&hero::hero(state.is_analyzing())),
    }

    body.push_str(&features::features(model.stats));
    body.push_str(&layout::footer());

    if let Some(alert) = model.alert {
        body.push_str(&layout::alert_script(alert));
    }

    document("PhotoAuth — See What's Real", state.is_analyzing(), &body)
}

/// Wrap a body in the shared document shell.
pub fn document(title: &str, auto_refresh: bool, body: &str) -> String {
    let refresh = if auto_refresh {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {refresh}
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        refresh = refresh,
        title = escape(title),
        style = STYLE,
        body = body
    )
}

/// Escape text for use in HTML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
:root {
    --bg: #0A192F;
    --card: #112240;
    --border: #1e3a5f;
    --text: #e6edf3;
    --dim: #8892b0;
    --primary: #64ffda;
    --accent: #a371f7;
    --authentic: #48BB78;
    --possibly-edited: #F6E05E;
    --ai-edited: #F56565;
    --unknown: #999999;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    background: var(--bg);
    color: var(--text);
    line-height: 1.5;
    min-height: 100vh;
}
a { color: var(--text); text-decoration: none; }
a:hover { color: var(--primary); }
.container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
.logo { font-size: 1.6rem; font-weight: 800; color: var(--primary); }
nav { position: sticky; top: 0; z-index: 10; background: rgba(10,25,47,0.9); border-bottom: 1px solid var(--border); }
nav .container { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; }
nav .links { display: flex; gap: 2rem; }
.hero { text-align: center; padding: 5rem 2rem; }
.hero h1 { font-size: 4rem; margin-bottom: 1.5rem; }
.hero p.sub { color: var(--dim); font-size: 1.25rem; margin-bottom: 3rem; }
.dropzone {
    display: block; border: 2px dashed var(--border); border-radius: 16px;
    padding: 3rem; margin: 0 auto 1.5rem; max-width: 700px; cursor: pointer; background: var(--card);
}
.dropzone.active { border-color: var(--accent); }
.dropzone .hint { color: var(--dim); font-size: 0.875rem; }
.url-form { display: flex; gap: 0.75rem; max-width: 700px; margin: 0 auto; }
.url-form input {
    flex: 1; padding: 1rem; border-radius: 12px; border: 1px solid var(--border);
    background: var(--card); color: var(--text);
}
.btn {
    display: inline-block; padding: 0.9rem 1.5rem; border-radius: 12px; border: 1px solid var(--primary);
    background: transparent; color: var(--primary); cursor: pointer; font-size: 1rem;
}
.btn:hover { background: rgba(100,255,218,0.1); }
.btn[disabled] { opacity: 0.4; cursor: not-allowed; }
.error-banner { text-align: center; margin-top: 1rem; color: var(--ai-edited); font-weight: 600; }
.loading {
    position: fixed; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center;
    flex-direction: column; background: rgba(10,25,47,0.95);
}
.scanner {
    width: 8rem; height: 8rem; border-radius: 50%; border: 4px solid var(--border);
    border-top-color: var(--primary); animation: spin 1.2s linear infinite; margin-bottom: 2rem;
}
@keyframes spin { to { transform: rotate(360deg); } }
.panel {
    display: grid; grid-template-columns: 1fr 1fr; gap: 2rem;
    background: var(--card); border: 1px solid var(--border); border-radius: 16px; padding: 2rem;
}
.preview { position: relative; border-radius: 12px; overflow: hidden; border: 1px solid var(--border); }
.preview img { display: block; width: 100%; height: auto; }
.preview img.heatmap { position: absolute; inset: 0; height: 100%; object-fit: cover; opacity: 0.9; mix-blend-mode: overlay; display: none; }
.heatmap-toggle:checked ~ .preview img.heatmap { display: block; }
.heatmap-toggle ~ label .hide-label { display: none; }
.heatmap-toggle:checked ~ label .hide-label { display: inline; }
.heatmap-toggle:checked ~ label .show-label { display: none; }
.toggle { margin-top: 1rem; width: 100%; text-align: center; }
.score-label { color: var(--dim); font-size: 0.875rem; }
.score { font-size: 4rem; font-weight: 700; color: var(--primary); line-height: 1.1; }
.badge { padding: 1rem; border-radius: 12px; border: 1px solid; margin: 1.5rem 0; }
.badge.authentic { color: var(--authentic); border-color: var(--authentic); }
.badge.possibly-edited { color: var(--possibly-edited); border-color: var(--possibly-edited); }
.badge.ai-edited { color: var(--ai-edited); border-color: var(--ai-edited); }
.badge.unknown { color: var(--unknown); border-color: var(--unknown); }
.badge .desc { color: var(--dim); font-size: 0.875rem; }
.bar-row { display: flex; justify-content: space-between; font-size: 0.875rem; margin-top: 0.5rem; }
.bar { height: 0.5rem; background: var(--border); border-radius: 999px; overflow: hidden; }
.bar div { height: 100%; background: var(--primary); }
.card { display: flex; gap: 0.75rem; padding: 0.75rem; margin-top: 0.75rem; border-radius: 8px; background: rgba(30,58,95,0.4); }
.card .k { color: var(--dim); font-size: 0.75rem; }
.actions { text-align: center; padding: 2rem 0 3rem; }
.features { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1.5rem; }
.feature { background: var(--card); border: 1px solid var(--border); border-radius: 12px; padding: 1.5rem; }
.feature h3 { margin: 0.5rem 0; }
.feature p { color: var(--dim); font-size: 0.9rem; }
.stats { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1.5rem; margin-top: 2rem; text-align: center; }
.stat-value { font-size: 2.5rem; font-weight: 700; color: var(--primary); }
.stat-label { color: var(--dim); font-size: 0.875rem; text-transform: uppercase; letter-spacing: 0.05em; }
footer { border-top: 1px solid var(--border); margin-top: 4rem; }
footer .container { display: flex; justify-content: space-between; align-items: center; }
footer .links { display: flex; gap: 2rem; font-size: 0.875rem; }
footer p { color: var(--dim); font-size: 0.875rem; }
@media (max-width: 800px) {
    .panel, .features, .stats { grid-template-columns: 1fr; }
    nav .links { display: none; }
    .hero h1 { font-size: 2.5rem; }
}
"#;
