use hostpie::profile::ChartRecord;

/// The last successfully parsed dataset, cached verbatim between visits.
const STORAGE_KEY_DATA: &str = "hostpie.performance_data.v1";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn local_storage_get_string(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

fn local_storage_set_string(key: &str, value: &str) {
    if let Some(s) = local_storage() {
        let _ = s.set_item(key, value);
    }
}

/// Missing or corrupt cached state loads as `None`; the caller falls back
/// to an empty page.
pub(super) fn load_cached_records() -> Option<Vec<ChartRecord>> {
    let raw = local_storage_get_string(STORAGE_KEY_DATA)?;
    serde_json::from_str(&raw).ok()
}

pub(super) fn save_cached_records(records: &[ChartRecord]) {
    if let Ok(raw) = serde_json::to_string(records) {
        local_storage_set_string(STORAGE_KEY_DATA, &raw);
    }
}
