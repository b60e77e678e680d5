//! Result panel
//!
//! Left column: the analysed image with an optional Grad-CAM overlay and a
//! CSS-only show/hide toggle. Right column: score, verdict badge, model
//! confidence breakdown, and metadata cards.

use super::escape;
use crate::format::{Analysis, FormattedResult};

/// Shown when the analysed image cannot be displayed.
const FALLBACK_IMAGE: &str = "https://images.unsplash.com/photo-1516035069371-29a1b244cc32";

/// `panel` keeps the heatmap toggle id unique when several panels share a page.
pub fn result_panel(analysis: &Analysis, image_url: Option<&str>, panel: usize) -> String {
    let r = &analysis.result;
    format!(
        r#"<section class="container" id="result">
<div class="panel">
    <div>
{preview}
    </div>
    <div>
        <p class="score-label">Authenticity Score</p>
        <div class="score">{score}%</div>
{badge}
{breakdown}
        <h3 class="score-label" style="margin-top:1.5rem">Image Metadata &amp; AI Analysis</h3>
{cards}
    </div>
</div>
</section>
"#,
        preview = preview(r, image_url, panel),
        score = r.score,
        badge = badge(r),
        breakdown = breakdown(r),
        cards = metadata_cards(analysis),
    )
}

/// "Analyze Another Image" reset affordance.
pub fn reset_button() -> String {
    r#"<div class="actions">
    <form method="post" action="/reset">
        <button class="btn" type="submit">Analyze Another Image</button>
    </form>
</div>
"#
    .to_string()
}

fn preview(r: &FormattedResult, image_url: Option<&str>, panel: usize) -> String {
    let src = escape(image_url.unwrap_or(FALLBACK_IMAGE));
    let fallback = escape(FALLBACK_IMAGE);

    match r.heatmap {
        Some(ref heatmap) => format!(
            r#"        <input type="checkbox" id="heatmap-toggle-{panel}" class="heatmap-toggle" hidden>
        <div class="preview">
            <img src="{src}" alt="Analyzed image" onerror="this.onerror=null;this.src='{fallback}'">
            <img class="heatmap" src="data:image/jpeg;base64,{heatmap}" alt="Grad-CAM heatmap">
        </div>
        <label for="heatmap-toggle-{panel}" class="btn toggle">👁 <span class="show-label">Show Heatmap</span><span class="hide-label">Hide Heatmap</span></label>"#,
            src = src,
            fallback = fallback,
            heatmap = escape(heatmap),
            panel = panel
        ),
        None => format!(
            r#"        <div class="preview">
            <img src="{src}" alt="Analyzed image" onerror="this.onerror=null;this.src='{fallback}'">
        </div>
        <button class="btn toggle" type="button" disabled>👁 No heatmap available</button>"#,
            src = src,
            fallback = fallback
        ),
    }
}

fn badge(r: &FormattedResult) -> String {
    let confidence = if r.confidence > 0.0 {
        format!(
            "\n            <p>Model Confidence: <strong>{:.1}%</strong> ({})</p>",
            r.confidence,
            escape(&r.model_label)
        )
    } else {
        String::new()
    };
    format!(
        r#"        <div class="badge {class}">
            <strong>{icon} {label}</strong>
            <p class="desc">{description}</p>{confidence}
        </div>"#,
        class = r.verdict.css_class(),
        icon = r.status_icon,
        label = escape(&r.label),
        description = escape(r.description),
        confidence = confidence
    )
}

fn breakdown(r: &FormattedResult) -> String {
    format!(
        r#"        <p class="score-label">Model Confidence Breakdown</p>
{vit}
{clip}"#,
        vit = bar("ViT Detector", r.vit_conf),
        clip = bar("CLIP Detector", r.clip_conf)
    )
}

fn bar(name: &str, percent: f64) -> String {
    format!(
        r#"        <div class="bar-row"><span>{name}</span><span>{value:.1}%</span></div>
        <div class="bar"><div style="width:{width:.1}%"></div></div>"#,
        name = name,
        value = percent,
        width = percent.clamp(0.0, 100.0)
    )
}

fn metadata_cards(analysis: &Analysis) -> String {
    let r = &analysis.result;
    let mut cards = Vec::new();

    if r.exif_present {
        cards.push(card("📷", "EXIF Data", "Present"));
    }
    if r.has_software() {
        cards.push(card("🖥", "Editing Software", &r.software));
    }
    if r.possible_edit {
        cards.push(card("✂️", "Possible Edit", "Editing software signature found"));
    }
    if r.ela_score != 0.0 {
        cards.push(card("🗄", "ELA Score", &format!("{}", r.ela_score)));
    }
    cards.push(card("📅", "Analyzed On", &analysis.analyzed_at));

    cards.join("\n")
}

fn card(icon: &str, key: &str, value: &str) -> String {
    format!(
        r#"        <div class="card"><span>{}</span><div><p class="k">{}</p><p>{}</p></div></div>"#,
        icon,
        escape(key),
        escape(value)
    )
}
