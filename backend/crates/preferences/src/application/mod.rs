//! Application Layer

pub mod i18n;
pub mod store;
pub mod theme_sync;

pub use i18n::Catalogs;
pub use store::PreferenceStore;
pub use theme_sync::{apply_theme, spawn_theme_sync};
