//! Page chrome: navbar, footer, loading overlay, error banner, alerts

use super::escape;
use chrono::{Datelike, Local};

pub fn navbar() -> String {
    r##"<nav>
    <div class="container">
        <a class="logo" href="/">🛡 PhotoAuth</a>
        <div class="links">
            <a href="/#home">Home</a>
            <a href="/#features">Features</a>
            <a href="/#api">API Access</a>
            <a href="/#about">About</a>
        </div>
    </div>
</nav>
"##
    .to_string()
}

pub fn footer() -> String {
    format!(
        r##"<footer>
    <div class="container">
        <span class="logo">🛡 PhotoAuth</span>
        <div class="links">
            <a href="#privacy">Privacy</a>
            <a href="#terms">Terms</a>
            <a href="#contact">Contact</a>
        </div>
        <p>© {year} PhotoAuth — Built to See the Truth.</p>
    </div>
</footer>
"##,
        year = Local::now().year()
    )
}

/// Blocking overlay shown while a request is in flight.
pub fn loading_overlay() -> String {
    r#"<div class="loading" role="status" aria-live="polite">
    <div class="scanner"></div>
    <h2>AI is thinking...</h2>
    <p class="score-label">Analyzing pixels and metadata</p>
</div>
"#
    .to_string()
}

pub fn error_banner(message: &str) -> String {
    format!(
        "<div class=\"error-banner\" role=\"alert\">⚠️ {}</div>\n",
        escape(message)
    )
}

/// Script that raises a blocking `alert()` with the given message.
pub fn alert_script(message: &str) -> String {
    let literal = serde_json::to_string(message)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    format!("<script>alert({});</script>\n", literal)
}
