use web_sys::Storage;

/// The only value the portal persists in the browser.
pub(crate) const TOKEN_KEY: &str = "intranet_jwt";

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn read_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub(crate) fn write_item(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            log::warn!("localStorage rejected write for {key}");
        }
    }
}

pub(crate) fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        if storage.remove_item(key).is_err() {
            log::warn!("localStorage rejected removal of {key}");
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_remove_item_clears_key_and_tolerates_absent_keys() {
        let key = "intranet_storage_test";
        write_item(key, "v");
        assert_eq!(read_item(key).as_deref(), Some("v"));

        remove_item(key);
        assert_eq!(read_item(key), None);
        remove_item(key);
        assert_eq!(read_item(key), None);
    }
}
