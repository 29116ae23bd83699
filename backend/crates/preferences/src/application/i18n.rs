//! Translation catalogs
//!
//! Nested JSON tables keyed first by language, then by dotted key path
//! (`nav.dashboard`). Lookup falls back to the default language, then to
//! the raw key.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{PreferenceError, PreferenceResult};

pub const DEFAULT_LANGUAGE: &str = "en";

const BUILTIN: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("es", include_str!("../../locales/es.json")),
    ("hi", include_str!("../../locales/hi.json")),
];

#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    tables: HashMap<String, Value>,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogs shipped with the crate
    pub fn builtin() -> Self {
        let mut catalogs = Self::new();
        for (language, source) in BUILTIN {
            if let Err(e) = catalogs.insert_json(language, source) {
                tracing::error!(language, error = %e, "Built-in catalog failed to load");
            }
        }
        catalogs
    }

    /// Add or replace a language table from JSON source
    pub fn insert_json(&mut self, language: &str, source: &str) -> PreferenceResult<()> {
        let table: Value =
            serde_json::from_str(source).map_err(|e| PreferenceError::InvalidCatalog {
                language: language.to_string(),
                reason: e.to_string(),
            })?;
        if !table.is_object() {
            return Err(PreferenceError::InvalidCatalog {
                language: language.to_string(),
                reason: "top level must be an object".to_string(),
            });
        }
        self.tables.insert(language.to_string(), table);
        Ok(())
    }

    /// Languages with a catalog, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn supports(&self, language: &str) -> bool {
        self.tables.contains_key(language)
    }

    /// Exact lookup in one language
    pub fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        let mut node = self.tables.get(language)?;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }
        node.as_str()
    }

    /// Active language → default language → raw key
    pub fn translate(&self, language: &str, key: &str) -> String {
        self.lookup(language, key)
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }
}
