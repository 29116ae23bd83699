//! Theme synchronisation
//!
//! Applies the effective theme to a [`ThemeTarget`] and keeps it applied:
//! on preference changes, and on system color-scheme changes while the
//! theme is `system`. The task ends when the preference store is dropped.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::preferences::{Preferences, Theme};
use crate::domain::theme::{ColorScheme, ThemeTarget};

pub fn apply_theme(theme: Theme, system: ColorScheme, target: &dyn ThemeTarget) {
    target.set_dark(theme.resolve(system).is_dark());
}

pub fn spawn_theme_sync(
    mut preferences: watch::Receiver<Preferences>,
    mut system: watch::Receiver<ColorScheme>,
    target: Arc<dyn ThemeTarget>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut system_open = true;
        loop {
            let theme = preferences.borrow_and_update().theme;
            let scheme = *system.borrow_and_update();
            apply_theme(theme, scheme, target.as_ref());
            tracing::trace!(%theme, %scheme, "Theme applied");

            tokio::select! {
                changed = preferences.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = system.changed(), if system_open => {
                    if changed.is_err() {
                        // No more system signals; keep following preferences
                        system_open = false;
                    }
                }
            }
        }
        tracing::debug!("Theme sync stopped");
    })
}
