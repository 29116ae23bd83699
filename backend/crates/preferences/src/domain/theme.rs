//! Theme application
//!
//! The document-level class toggle is abstracted as a [`ThemeTarget`].

use std::sync::atomic::{AtomicBool, Ordering};

use derive_more::Display;

/// System or effective color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ColorScheme {
    #[default]
    #[display("light")]
    Light,
    #[display("dark")]
    Dark,
}

impl ColorScheme {
    /// Parse a `Sec-CH-Prefers-Color-Scheme` client hint value
    pub fn from_client_hint(value: &str) -> Option<Self> {
        match value.trim().trim_matches('"') {
            "dark" => Some(ColorScheme::Dark),
            "light" => Some(ColorScheme::Light),
            _ => None,
        }
    }

    #[inline]
    pub fn is_dark(&self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

/// Something that can toggle the dark class on the document
pub trait ThemeTarget: Send + Sync {
    fn set_dark(&self, dark: bool);
}

/// Plain flag target
#[derive(Debug, Default)]
pub struct ThemeFlag(AtomicBool);

impl ThemeFlag {
    pub fn is_dark(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl ThemeTarget for ThemeFlag {
    fn set_dark(&self, dark: bool) {
        self.0.store(dark, Ordering::Release);
    }
}
