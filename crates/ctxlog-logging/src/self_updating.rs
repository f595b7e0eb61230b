//! Self-updating logger decorator.
//!
//! A context must carry the active logger, and attaching a field produces a
//! new logger that must be reachable through an updated context. The
//! decorator only knows the narrow [`ContextWrapper`] capability, never the
//! breakdown type that lives in the context, so the logging crate does not
//! depend on the crate that owns the context machinery.
//!
//! Ownership runs one way: a bound decorator holds its wrapper, the wrapper
//! holds its context, and the context only ever stores unbound decorators.
//! No reference cycle is formed.

use crate::level::LogLevel;
use crate::logger::{FatalExitOverride, Fields, Logger};
use ctxlog_core_types::Context;
use serde_json::Value;
use std::fmt::{self, Arguments};
use std::sync::Arc;

/// Capability implemented by whatever owns the execution context
pub trait ContextWrapper: Send + Sync + fmt::Debug {
    /// The context this wrapper stands for
    fn context(&self) -> Context;

    /// A replacement wrapper whose context carries `logger`.
    ///
    /// `None` means the capability is not supported.
    fn update_logger(&self, _logger: Arc<dyn Logger>) -> Option<Arc<dyn ContextWrapper>> {
        None
    }
}

/// Decorator that keeps the carrying context in step with field attachment.
///
/// An unbound decorator has no wrapper; binding never mutates, it yields a
/// new decorator. Every `with_field` call allocates a fresh decorator.
#[derive(Clone)]
pub struct SelfUpdatingLogger {
    inner: Arc<dyn Logger>,
    wrapper: Option<Arc<dyn ContextWrapper>>,
}

impl SelfUpdatingLogger {
    /// An unbound decorator around a backend logger
    pub fn new(inner: Arc<dyn Logger>) -> Self {
        Self {
            inner,
            wrapper: None,
        }
    }

    /// A decorator around `inner` bound to `wrapper`
    pub fn bound(inner: Arc<dyn Logger>, wrapper: Arc<dyn ContextWrapper>) -> Self {
        Self {
            inner,
            wrapper: Some(wrapper),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.wrapper.is_some()
    }

    fn derive(&self, inner: Arc<dyn Logger>) -> Arc<dyn Logger> {
        let Some(wrapper) = &self.wrapper else {
            return Arc::new(Self::new(inner));
        };

        let unbound: Arc<dyn Logger> = Arc::new(Self::new(inner.clone()));
        match wrapper.update_logger(unbound) {
            Some(updated) => Arc::new(Self::bound(inner, updated)),
            None => {
                tracing::trace!("context wrapper cannot update its logger; field dropped");
                Arc::new(self.clone())
            }
        }
    }
}

impl fmt::Debug for SelfUpdatingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfUpdatingLogger")
            .field("inner", &self.inner)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl Logger for SelfUpdatingLogger {
    #[track_caller]
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.inner.log(level, args);
    }

    fn with_field(&self, key: &str, value: Value) -> Arc<dyn Logger> {
        self.derive(self.inner.with_field(key, value))
    }

    fn with_fields(&self, fields: Fields) -> Arc<dyn Logger> {
        self.derive(self.inner.with_fields(fields))
    }

    fn context(&self) -> Option<Context> {
        self.wrapper.as_ref().map(|wrapper| wrapper.context())
    }

    fn bind_context(&self, wrapper: Arc<dyn ContextWrapper>) -> Option<Arc<dyn Logger>> {
        Some(Arc::new(Self::bound(self.inner.clone(), wrapper)))
    }

    fn fatal_exit_override(&self) -> Option<&dyn FatalExitOverride> {
        self.inner.fatal_exit_override()
    }
}
