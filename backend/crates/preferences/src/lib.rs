//! Preferences Module
//!
//! User-chosen settings (theme, language, currency, units, privacy),
//! persisted to client storage, plus the translation lookup and theme
//! application that read them.
//!
//! - `domain/` - Preferences model, theme resolution
//! - `application/` - preference store, translation catalogs, theme sync

pub mod application;
pub mod domain;
pub mod error;

pub use application::i18n::{Catalogs, DEFAULT_LANGUAGE};
pub use application::store::PreferenceStore;
pub use application::theme_sync::{apply_theme, spawn_theme_sync};
pub use domain::preferences::{PrivacySettings, Preferences, Theme, Units};
pub use domain::theme::{ColorScheme, ThemeFlag, ThemeTarget};
pub use error::{PreferenceError, PreferenceResult};
