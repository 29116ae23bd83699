//! Login intent and post-login destination
//!
//! Guards record where an anonymous user was headed; the login flow
//! consumes it. Only same-origin absolute paths are ever returned.

use platform::storage::{ClientStorage, StorageResult, keys};

/// Record the intended destination and the login intent tag
pub fn record_login_intent(
    storage: &dyn ClientStorage,
    destination: &str,
    intent: &str,
) -> StorageResult<()> {
    storage.set(keys::INTENDED_DESTINATION, destination)?;
    storage.set(keys::LOGIN_INTENT, intent)?;
    Ok(())
}

/// Current login intent tag, if any
pub fn login_intent(storage: &dyn ClientStorage) -> Option<String> {
    storage.get(keys::LOGIN_INTENT)
}

/// Consume the stored destination, falling back to `fallback`
///
/// Both keys are cleared. Anything that is not a local absolute path
/// (`//evil.example`, `https://...`) is ignored.
pub fn take_intended_destination(storage: &dyn ClientStorage, fallback: &str) -> String {
    let destination = storage.get(keys::INTENDED_DESTINATION);

    for key in [keys::INTENDED_DESTINATION, keys::LOGIN_INTENT] {
        if let Err(e) = storage.remove(key) {
            tracing::warn!(key, error = %e, "Failed to clear login intent");
        }
    }

    match destination {
        Some(path) if is_local_path(&path) => path,
        Some(path) => {
            tracing::warn!(destination = %path, "Ignoring non-local intended destination");
            fallback.to_string()
        }
        None => fallback.to_string(),
    }
}

/// Mark the dashboard as visited for this browser session
///
/// Returns `true` the first time. Session-scoped storage is expected.
pub fn mark_dashboard_visited(session_storage: &dyn ClientStorage) -> bool {
    if session_storage.get(keys::DASHBOARD_VISITED).is_some() {
        return false;
    }
    if let Err(e) = session_storage.set(keys::DASHBOARD_VISITED, "true") {
        tracing::debug!(error = %e, "Could not persist dashboard visit flag");
    }
    true
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
