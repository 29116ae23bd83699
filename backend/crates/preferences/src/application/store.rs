//! Preference Store
//!
//! Sole owner of [`Preferences`]. Loads once from client storage, keeps the
//! current value in a watch cell and writes the full object back on every
//! change. Persistence is best-effort: the in-memory value is updated
//! even when the write fails.

use std::sync::Arc;

use platform::storage::{ClientStorage, keys};
use tokio::sync::watch;

use crate::application::i18n::Catalogs;
use crate::domain::preferences::Preferences;
use crate::error::PreferenceResult;

pub struct PreferenceStore {
    storage: Arc<dyn ClientStorage>,
    catalogs: Arc<Catalogs>,
    current: watch::Sender<Preferences>,
}

impl PreferenceStore {
    /// Load from storage, falling back to defaults if absent or unparsable
    pub fn load(storage: Arc<dyn ClientStorage>, catalogs: Arc<Catalogs>) -> Self {
        let preferences = match storage.get(keys::USER_PREFERENCES) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored preferences unparsable, using defaults");
                Preferences::default()
            }),
            None => Preferences::default(),
        };

        Self {
            storage,
            catalogs,
            current: watch::Sender::new(preferences),
        }
    }

    pub fn get(&self) -> Preferences {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.current.subscribe()
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Replace preferences and persist the whole object
    ///
    /// An `Err` means only the write failed; [`get`](Self::get) already
    /// returns the new value.
    pub fn set(&self, preferences: Preferences) -> PreferenceResult<()> {
        if !self.catalogs.supports(&preferences.language) {
            tracing::debug!(
                language = %preferences.language,
                "No catalog for language, translations will fall back"
            );
        }

        self.current.send_replace(preferences.clone());
        self.persist(&preferences)
    }

    /// Modify preferences in place and persist
    pub fn update<F>(&self, f: F) -> PreferenceResult<()>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Look up `key` in the active language
    pub fn translate(&self, key: &str) -> String {
        let language = self.current.borrow().language.clone();
        self.catalogs.translate(&language, key)
    }

    fn persist(&self, preferences: &Preferences) -> PreferenceResult<()> {
        let serialized = serde_json::to_string(preferences)?;
        self.storage
            .set(keys::USER_PREFERENCES, &serialized)
            .inspect_err(|e| tracing::warn!(error = %e, "Preferences kept in memory only"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::preferences::{Theme, Units};
    use crate::error::PreferenceError;
    use platform::storage::MemoryStorage;

    fn store_with(storage: Arc<MemoryStorage>) -> PreferenceStore {
        PreferenceStore::load(storage, Arc::new(Catalogs::builtin()))
    }

    #[test]
    fn test_load_defaults_when_absent() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        assert_eq!(store.get(), Preferences::default());
    }

    #[test]
    fn test_load_defaults_when_unparsable() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::USER_PREFERENCES, "{broken").unwrap();
        let store = store_with(storage);
        assert_eq!(store.get(), Preferences::default());
    }

    #[test]
    fn test_load_stored() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(keys::USER_PREFERENCES, r#"{"theme":"dark","currency":"INR"}"#)
            .unwrap();
        let store = store_with(storage);
        let prefs = store.get();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.currency, "INR");
    }

    #[test]
    fn test_set_persists_full_object() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone());

        store
            .update(|p| {
                p.units = Units::Imperial;
                p.language = "es".to_string();
            })
            .unwrap();

        let raw = storage.get(keys::USER_PREFERENCES).unwrap();
        let persisted: Preferences = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, store.get());
        assert_eq!(persisted.units, Units::Imperial);
        assert_eq!(persisted.currency, "USD");
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let store = store_with(Arc::new(MemoryStorage::read_only()));
        let err = tokio_test::assert_err!(store.update(|p| p.theme = Theme::Light));
        assert!(matches!(err, PreferenceError::Persist(_)));
        assert_eq!(store.get().theme, Theme::Light);
    }

    #[test]
    fn test_translate_uses_active_language() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        assert_eq!(store.translate("nav.settings"), "Settings");

        store.update(|p| p.language = "es".to_string()).unwrap();
        assert_eq!(store.translate("nav.settings"), "Ajustes");
        // only in the default language
        assert_eq!(store.translate("landing.headline"), "Measure, reduce and offset your carbon footprint");
        assert_eq!(store.translate("missing.key"), "missing.key");
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        let rx = store.subscribe();
        store.update(|p| p.currency = "EUR".to_string()).unwrap();
        assert_eq!(rx.borrow().currency, "EUR");
    }
}
