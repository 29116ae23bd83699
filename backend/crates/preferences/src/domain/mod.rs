//! Domain Layer

pub mod preferences;
pub mod theme;

pub use preferences::{PrivacySettings, Preferences, Theme, Units};
pub use theme::{ColorScheme, ThemeFlag, ThemeTarget};
