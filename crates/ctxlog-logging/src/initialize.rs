//! Logging initialization
//!
//! Single entry point that turns an initialization request into a logger.

use crate::formatter::Formatter;
use crate::level::{LogKind, LogLevel};
use crate::logger::{ExitHandler, Logger};
use crate::output::LogOutput;
use crate::registry;
use crate::self_updating::SelfUpdatingLogger;
use crate::tracing_backend::init_tracing;
use ctxlog_errors::{LoggingError, Result};
use std::fmt;
use std::sync::Arc;

/// Request describing which backend to build and how to configure it
#[derive(Clone, Default)]
pub struct LoggingInitialization {
    /// Backend selection
    pub kind: LogKind,
    /// Registered name, used only when `kind` is `LogKind::Custom`
    pub custom_kind: String,
    /// Destination sink; stderr when absent
    pub output: Option<LogOutput>,
    pub level: LogLevel,
    pub formatter: Formatter,
    /// Replacement for process exit on fatal calls
    pub fatal_exit: Option<ExitHandler>,
}

impl fmt::Debug for LoggingInitialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingInitialization")
            .field("kind", &self.kind)
            .field("custom_kind", &self.custom_kind)
            .field("output", &self.output)
            .field("level", &self.level)
            .field("formatter", &self.formatter)
            .field("fatal_exit", &self.fatal_exit.is_some())
            .finish()
    }
}

/// Initialize a logger from a request.
///
/// `None` means logging was not requested and yields `Ok(None)`. A custom
/// constructor may also decline with `Ok(None)`. Any logger returned is an
/// unbound [`SelfUpdatingLogger`] around the backend.
///
/// # Errors
///
/// - `InvalidArgument` if a custom kind is requested without a name
/// - `NotFound` if the custom kind is not registered
/// - `Constructor` if a custom constructor fails
/// - `InvalidArgument` if the built-in backend rejects the formatter
///
/// # Example
///
/// ```
/// use ctxlog_logging::{init_logging, LogLevel, LoggingInitialization};
///
/// assert!(init_logging(None).unwrap().is_none());
///
/// let init = LoggingInitialization {
///     level: LogLevel::Warn,
///     ..LoggingInitialization::default()
/// };
/// assert!(init_logging(Some(&init)).unwrap().is_some());
/// ```
pub fn init_logging(init: Option<&LoggingInitialization>) -> Result<Option<Arc<dyn Logger>>> {
    let Some(init) = init else {
        return Ok(None);
    };

    let backend = match init.kind {
        LogKind::Default | LogKind::Tracing => Some(init_tracing(init)?),
        LogKind::Custom => init_custom(init)?,
    };

    tracing::debug!(
        kind = %init.kind,
        custom_kind = init.custom_kind.as_str(),
        level = %init.level,
        built = backend.is_some(),
        "logging initialized"
    );

    Ok(backend.map(|logger| Arc::new(SelfUpdatingLogger::new(logger)) as Arc<dyn Logger>))
}

fn init_custom(init: &LoggingInitialization) -> Result<Option<Arc<dyn Logger>>> {
    if init.custom_kind.is_empty() {
        return Err(LoggingError::invalid_argument(
            "custom logger kind requested without a name",
        ));
    }

    let constructor = registry::lookup(&init.custom_kind).ok_or_else(|| LoggingError::NotFound {
        name: init.custom_kind.clone(),
    })?;

    constructor(init).map_err(|source| LoggingError::Constructor {
        kind: init.custom_kind.clone(),
        source,
    })
}
