use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::warn;

/// Storage key for the favorited property id list.
pub const FAVORITES_KEY: &str = "immokraini_savedPropertyIds";
/// Storage key for the locale preference.
pub const LOCALE_KEY: &str = "locale";

/// Minimal persisted key-value surface (a browser localStorage stand-in).
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory storage, used by tests and as a default for embedders that
/// supply no persistence.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }
}

/// Client preference state: the favorited property ids and the locale.
///
/// Loaded from storage once at construction and written back on every
/// change; observers subscribe through `watch` channels instead of
/// touching a module-global.
pub struct PreferenceStore {
    storage: Box<dyn KeyValueStorage>,
    favorites: watch::Sender<Vec<String>>,
    locale: watch::Sender<Option<String>>,
}

impl PreferenceStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        let favorites = load_favorites(storage.as_ref());
        let locale = storage.get(LOCALE_KEY);

        let (favorites_tx, _) = watch::channel(favorites);
        let (locale_tx, _) = watch::channel(locale);

        Self {
            storage,
            favorites: favorites_tx,
            locale: locale_tx,
        }
    }

    pub fn favorites(&self) -> Vec<String> {
        self.favorites.borrow().clone()
    }

    pub fn is_favorite(&self, property_id: &str) -> bool {
        self.favorites
            .borrow()
            .iter()
            .any(|id| id == property_id)
    }

    /// Add or remove one property id, persisting the new list.
    pub fn toggle_favorite(&self, property_id: &str) {
        let mut ids = self.favorites.borrow().clone();
        match ids.iter().position(|id| id == property_id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(property_id.to_string()),
        }

        if let Ok(serialized) = serde_json::to_string(&ids) {
            self.storage.set(FAVORITES_KEY, &serialized);
        }
        let _ = self.favorites.send(ids);
    }

    pub fn locale(&self) -> Option<String> {
        self.locale.borrow().clone()
    }

    pub fn set_locale(&self, locale: &str) {
        self.storage.set(LOCALE_KEY, locale);
        let _ = self.locale.send(Some(locale.to_string()));
    }

    pub fn watch_favorites(&self) -> watch::Receiver<Vec<String>> {
        self.favorites.subscribe()
    }

    pub fn watch_locale(&self) -> watch::Receiver<Option<String>> {
        self.locale.subscribe()
    }
}

fn load_favorites(storage: &dyn KeyValueStorage) -> Vec<String> {
    let Some(saved) = storage.get(FAVORITES_KEY) else {
        return vec![];
    };
    match serde_json::from_str::<Vec<String>>(&saved) {
        Ok(ids) => ids,
        Err(e) => {
            warn!("discarding unparseable saved favorites: {}", e);
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_without_saved_state() {
        let store = PreferenceStore::new(Box::<MemoryStorage>::default());
        assert!(store.favorites().is_empty());
        assert_eq!(store.locale(), None);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let store = PreferenceStore::new(Box::<MemoryStorage>::default());
        store.toggle_favorite("prop-1");
        assert!(store.is_favorite("prop-1"));
        store.toggle_favorite("prop-1");
        assert!(!store.is_favorite("prop-1"));
    }

    #[test]
    fn favorites_survive_a_reload() {
        let storage = std::sync::Arc::new(MemoryStorage::default());
        {
            let store = PreferenceStore::new(Box::new(storage.clone()));
            store.toggle_favorite("prop-1");
            store.toggle_favorite("prop-2");
        }

        let reloaded = PreferenceStore::new(Box::new(storage));
        assert_eq!(reloaded.favorites(), vec!["prop-1", "prop-2"]);
    }

    #[test]
    fn corrupt_saved_favorites_fall_back_to_empty() {
        let storage = MemoryStorage::default();
        storage.set(FAVORITES_KEY, "{not json]");
        let store = PreferenceStore::new(Box::new(storage));
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn locale_round_trips_and_notifies() {
        let store = PreferenceStore::new(Box::<MemoryStorage>::default());
        let rx = store.watch_locale();
        store.set_locale("fr");
        assert_eq!(store.locale().as_deref(), Some("fr"));
        assert_eq!(rx.borrow().as_deref(), Some("fr"));
    }

    #[test]
    fn watchers_see_favorite_changes() {
        let store = PreferenceStore::new(Box::<MemoryStorage>::default());
        let rx = store.watch_favorites();
        store.toggle_favorite("prop-9");
        assert_eq!(rx.borrow().as_slice(), ["prop-9".to_string()]);
    }
}
