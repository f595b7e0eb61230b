//! Process-wide registry of custom logger backends.
//!
//! Entries map a non-empty kind name to a constructor. The whole map is
//! guarded by one lock; entries are written rarely and read at
//! initialization time.

use crate::initialize::LoggingInitialization;
use crate::logger::Logger;
use ctxlog_errors::{BoxError, LoggingError, Result};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Constructor for a custom backend.
///
/// `Ok(None)` is a valid outcome meaning "no logging".
pub type LoggerConstructor = Arc<
    dyn Fn(&LoggingInitialization) -> std::result::Result<Option<Arc<dyn Logger>>, BoxError>
        + Send
        + Sync,
>;

static REGISTRY: OnceLock<RwLock<HashMap<String, LoggerConstructor>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, LoggerConstructor>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a custom backend under `name`.
///
/// # Errors
///
/// - `InvalidArgument` if `name` is empty
/// - `Conflict` if `name` is already registered
pub fn register_logger<F>(name: &str, constructor: F) -> Result<()>
where
    F: Fn(&LoggingInitialization) -> std::result::Result<Option<Arc<dyn Logger>>, BoxError>
        + Send
        + Sync
        + 'static,
{
    if name.is_empty() {
        return Err(LoggingError::invalid_argument("logger kind name must be set"));
    }

    let mut entries = registry().write().unwrap_or_else(PoisonError::into_inner);
    if entries.contains_key(name) {
        return Err(LoggingError::Conflict {
            name: name.to_string(),
        });
    }
    entries.insert(name.to_string(), Arc::new(constructor));
    drop(entries);

    tracing::debug!(kind = name, "registered custom logger kind");
    Ok(())
}

/// Remove the backend registered under `name`; absent names are ignored
pub fn unregister_logger(name: &str) {
    let removed = registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(name)
        .is_some();

    if removed {
        tracing::debug!(kind = name, "unregistered custom logger kind");
    }
}

pub(crate) fn lookup(name: &str) -> Option<LoggerConstructor> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}
