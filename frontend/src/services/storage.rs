//! Best-effort local mirror of the last roster fetch.
//!
//! The mirror is advisory: the in-memory roster always wins, and the cache
//! is only consulted for people the roster does not know yet.

use crate::{Person, PEOPLE_CACHE_KEY};

pub trait RosterCache {
    fn load(&self) -> Option<Vec<Person>>;
    fn store(&self, people: &[Person]);
}

/// No mirroring at all.
impl RosterCache for () {
    fn load(&self) -> Option<Vec<Person>> {
        None
    }

    fn store(&self, _people: &[Person]) {}
}

/// Mirror kept in `window.localStorage`.
#[derive(Debug, Clone, Copy)]
pub struct LocalStorageCache {
    key: &'static str,
}

impl LocalStorageCache {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage() -> Option<web_sys::Storage> {
        gloo_utils::window().local_storage().ok().flatten()
    }
}

impl Default for LocalStorageCache {
    fn default() -> Self {
        Self::new(PEOPLE_CACHE_KEY)
    }
}

impl RosterCache for LocalStorageCache {
    fn load(&self) -> Option<Vec<Person>> {
        let raw = Self::storage()?.get_item(self.key).ok()??;
        match serde_json::from_str(&raw) {
            Ok(people) => Some(people),
            Err(e) => {
                log::warn!("Ignoring unreadable roster cache: {}", e);
                None
            }
        }
    }

    fn store(&self, people: &[Person]) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(people) {
            Ok(raw) => {
                if storage.set_item(self.key, &raw).is_err() {
                    log::warn!("Roster cache write rejected by the browser");
                }
            }
            Err(e) => log::warn!("Failed to serialize roster cache: {}", e),
        }
    }
}
