//! Hero section: upload box and URL form

use crate::input::SUPPORTED_IMAGES;

/// Landing section. With `busy` set every submission control is disabled.
pub fn hero(busy: bool) -> String {
    let disabled = if busy { " disabled" } else { "" };
    let accept: Vec<String> = SUPPORTED_IMAGES
        .iter()
        .map(|(ext, _)| format!(".{}", ext))
        .collect();
    let listed: Vec<String> = SUPPORTED_IMAGES
        .iter()
        .filter(|(ext, _)| *ext != "jpeg")
        .map(|(ext, _)| ext.to_uppercase())
        .collect();

    format!(
        r#"<section class="hero" id="home">
    <h1>See What's Real.</h1>
    <p class="sub">AI-powered authenticity detection for photos, images, and generated media.</p>

    <label class="dropzone" id="dropzone" for="file-input">
        <input type="file" id="file-input" accept="{accept}" hidden{disabled}>
        <p>Drag &amp; drop an image</p>
        <p class="hint">or click to browse • {listed}</p>
    </label>

    <form class="url-form" method="post" action="/submit/url">
        <input type="text" name="url" placeholder="Paste image URL (e.g. https://...)" autocomplete="off"{disabled}>
        <button class="btn" type="submit"{disabled}>Analyze</button>
    </form>
</section>
<script>
(function () {{
    const input = document.getElementById('file-input');
    const zone = document.getElementById('dropzone');
    async function upload(file) {{
        if (!file || input.disabled) return;
        await fetch('/submit/file?name=' + encodeURIComponent(file.name), {{ method: 'POST', body: file }});
        location.href = '/';
    }}
    input.addEventListener('change', () => upload(input.files[0]));
    zone.addEventListener('dragover', (e) => {{ e.preventDefault(); zone.classList.add('active'); }});
    zone.addEventListener('dragleave', () => zone.classList.remove('active'));
    zone.addEventListener('drop', (e) => {{
        e.preventDefault();
        zone.classList.remove('active');
        upload(e.dataTransfer.files[0]);
    }});
}})();
</script>
"#,
        accept = accept.join(","),
        listed = listed.join(", "),
        disabled = disabled
    )
}
