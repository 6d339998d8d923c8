use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// GET a same-origin text resource (the bundled example profile). No
/// timeout and no cancellation; the browser's own error events are the only
/// failure path.
pub(super) async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("no window".to_string())?;

    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|_| format!("fetch: request for {url} failed"))?;
    let resp: web_sys::Response = resp
        .dyn_into()
        .map_err(|_| "fetch: expected a Response".to_string())?;

    if !resp.ok() {
        return Err(format!("fetch: {url} returned status {}", resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(|_| "fetch: text() threw".to_string())?)
        .await
        .map_err(|_| "fetch: body read failed".to_string())?;

    text.as_string()
        .ok_or_else(|| "fetch: expected a text body".to_string())
}
