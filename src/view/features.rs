//! Feature cards and live backend statistics

use crate::api::BackendStats;

const FEATURES: &[(&str, &str, &str)] = &[
    (
        "🧠",
        "AI-Powered Detection",
        "Advanced neural networks analyze every pixel to detect manipulations and AI-generated content.",
    ),
    (
        "🔍",
        "Metadata Analyzer",
        "Deep inspection of EXIF data, editing history, and hidden information in image files.",
    ),
    (
        "🗺",
        "Heatmap Visualizer",
        "Visual representation of manipulation probability across different regions of the image.",
    ),
    (
        "📄",
        "Instant Reports",
        "Comprehensive analysis reports with authenticity scores and detailed findings.",
    ),
];

/// Feature grid plus the stats row. The stats refresh in place from
/// `/api/stats` every five seconds.
pub fn features(stats: Option<&BackendStats>) -> String {
    let cards: Vec<String> = FEATURES
        .iter()
        .map(|(icon, title, description)| {
            format!(
                r#"        <div class="feature"><div>{}</div><h3>{}</h3><p>{}</p></div>"#,
                icon, title, description
            )
        })
        .collect();

    let stats = stats.cloned().unwrap_or_default();
    let (accuracy, time, total) = stat_values(&stats);

    format!(
        r#"<section class="container" id="features">
    <div class="features">
{cards}
    </div>
    <div class="stats">
        <div><div class="stat-value" id="stat-accuracy">{accuracy}</div><div class="stat-label">Accuracy Rate</div></div>
        <div><div class="stat-value" id="stat-time">{time}</div><div class="stat-label">Analysis Time</div></div>
        <div><div class="stat-value" id="stat-total">{total}</div><div class="stat-label">Images Analyzed</div></div>
    </div>
</section>
<script>
(function () {{
    async function refresh() {{
        try {{
            const res = await fetch('/api/stats');
            if (!res.ok) return;
            const s = await res.json();
            document.getElementById('stat-accuracy').textContent = (s.avg_accuracy || 0).toFixed(2) + '%';
            document.getElementById('stat-time').textContent = '<' + (s.avg_time || 0).toFixed(2) + 's';
            document.getElementById('stat-total').textContent = (s.total_images || 0) + '+';
        }} catch (e) {{}}
    }}
    setInterval(refresh, 5000);
}})();
</script>
"#,
        cards = cards.join("\n"),
        accuracy = accuracy,
        time = time,
        total = total
    )
}

/// Display strings for accuracy, average time and image count.
fn stat_values(stats: &BackendStats) -> (String, String, String) {
    (
        format!("{:.2}%", stats.avg_accuracy),
        format!("&lt;{:.2}s", stats.avg_time),
        format!("{}+", stats.total_images),
    )
}
