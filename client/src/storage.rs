//! Preference persistence in the page's localStorage. Values go through
//! the raw string API; the engine's preference layer owns the encodings.

use gloo_storage::Storage;
use pion_shared::PreferenceStore;

pub struct LocalPrefs;

impl PreferenceStore for LocalPrefs {
    fn get(&self, key: &str) -> Option<String> {
        gloo_storage::LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = gloo_storage::LocalStorage::raw().set_item(key, value) {
            log::warn!("preference write failed for {key}: {err:?}");
        }
    }
}
