//! Built-in backend on top of the `tracing` ecosystem.
//!
//! Every `TracingLogger` family owns a private `tracing::Dispatch`, built
//! from a `tracing_subscriber` registry plus an [`EntryLayer`] that renders
//! events into the configured output. Events are emitted inside
//! `dispatcher::with_default`, so the backend never touches, and is never
//! affected by, the process-global subscriber.
//!
//! Scoped entries (`with_field`/`with_fields`) share the dispatch and only
//! carry their own field map.

mod encoder;
mod layer;

pub use encoder::{
    Entry, EntryEncoder, BACKEND_LEVEL_KEY, BACKEND_MESSAGE_KEY, BACKEND_TIME_KEY,
};
pub use layer::EntryLayer;

use crate::initialize::LoggingInitialization;
use crate::level::LogLevel;
use crate::logger::{
    process_exit_handler, ExitHandler, FatalExitOverride, Fields, Logger, FATAL_EXIT_CODE,
};
use crate::output::LogOutput;
use chrono::Local;
use ctxlog_errors::Result;
use serde_json::Value;
use std::fmt::{self, Arguments};
use std::panic::Location;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

/// Threshold used when the request leaves the level at `LogLevel::Default`
pub const BACKEND_DEFAULT_LEVEL: LogLevel = LogLevel::Info;

struct Shared {
    dispatch: Dispatch,
    threshold: LogLevel,
    reports_caller: bool,
    exit: RwLock<ExitHandler>,
}

/// Logger implementation that delegates to the `tracing` crate.
///
/// # Example
///
/// ```
/// use ctxlog_logging::{Logger, LoggingInitialization, SharedBuffer, TracingLogger};
///
/// let buffer = SharedBuffer::new();
/// let init = LoggingInitialization {
///     output: Some(buffer.output()),
///     ..LoggingInitialization::default()
/// };
/// let logger = TracingLogger::new(&init).unwrap();
/// logger.infof(format_args!("Using tracing backend"));
/// assert!(buffer.contents().contains("Using tracing backend"));
/// ```
#[derive(Clone)]
pub struct TracingLogger {
    shared: Arc<Shared>,
    fields: Arc<Fields>,
}

impl TracingLogger {
    /// Build a backend logger from an initialization request.
    ///
    /// Applies, in order: output (stderr when absent), level (`Default`
    /// keeps `BACKEND_DEFAULT_LEVEL`), formatter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid time format.
    pub fn new(init: &LoggingInitialization) -> Result<Self> {
        let output = init.output.clone().unwrap_or_else(LogOutput::stderr);
        let threshold = match init.level {
            LogLevel::Default => BACKEND_DEFAULT_LEVEL,
            level => level,
        };
        let encoder = EntryEncoder::from_formatter(&init.formatter)?;
        let reports_caller = encoder.reports_caller();

        let subscriber = tracing_subscriber::registry().with(EntryLayer::new(encoder, output));
        let exit = init.fatal_exit.clone().unwrap_or_else(process_exit_handler);

        Ok(Self {
            shared: Arc::new(Shared {
                dispatch: Dispatch::new(subscriber),
                threshold,
                reports_caller,
                exit: RwLock::new(exit),
            }),
            fields: Arc::new(Fields::new()),
        })
    }

    /// The active filtering threshold
    pub fn level(&self) -> LogLevel {
        self.shared.threshold
    }

    /// Fields carried by this scoped entry
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    fn scoped(&self, fields: Fields) -> Self {
        Self {
            shared: self.shared.clone(),
            fields: Arc::new(fields),
        }
    }

    fn exit_handler(&self) -> ExitHandler {
        self.shared
            .exit
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn emit(&self, level: LogLevel, message: String, caller: Option<String>) {
        let entry = Entry {
            time: Local::now(),
            level,
            message,
            fields: self.fields.clone(),
            caller,
        };
        layer::dispatch_entry(&self.shared.dispatch, entry);
    }
}

impl fmt::Debug for TracingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingLogger")
            .field("level", &self.shared.threshold)
            .field("fields", &self.fields)
            .finish()
    }
}

impl Logger for TracingLogger {
    #[track_caller]
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        let enabled = level.passes(self.shared.threshold);
        if !enabled && level < LogLevel::Panic {
            return;
        }

        let message = args.to_string();
        if enabled {
            let caller = if self.shared.reports_caller {
                Some(Location::caller().to_string())
            } else {
                None
            };
            self.emit(level, message.clone(), caller);
        }

        match level {
            LogLevel::Panic => panic!("{message}"),
            LogLevel::Fatal => (self.exit_handler())(FATAL_EXIT_CODE),
            _ => {}
        }
    }

    fn with_field(&self, key: &str, value: Value) -> Arc<dyn Logger> {
        let mut fields = Fields::clone(&self.fields);
        fields.insert(key.to_string(), value);
        Arc::new(self.scoped(fields))
    }

    fn with_fields(&self, fields: Fields) -> Arc<dyn Logger> {
        let mut merged = Fields::clone(&self.fields);
        merged.extend(fields);
        Arc::new(self.scoped(merged))
    }

    fn fatal_exit_override(&self) -> Option<&dyn FatalExitOverride> {
        Some(self)
    }
}

impl FatalExitOverride for TracingLogger {
    fn set_fatal_exit_handler(&self, handler: ExitHandler) -> bool {
        *self
            .shared
            .exit
            .write()
            .unwrap_or_else(PoisonError::into_inner) = handler;
        true
    }
}

/// Built-in constructor used by `init_logging`
pub(crate) fn init_tracing(init: &LoggingInitialization) -> Result<Arc<dyn Logger>> {
    Ok(Arc::new(TracingLogger::new(init)?))
}
