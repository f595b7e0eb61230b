//! Structured logging facade
//!
//! Callers talk to the [`Logger`] trait; the concrete backend is chosen at
//! initialization time. Backends:
//!
//! - [`TracingLogger`], built on `tracing` and `tracing-subscriber`
//! - custom backends registered with [`register_logger`]
//! - [`NullLogger`], used where no logger was configured
//!
//! [`init_logging`] wraps whatever it builds in a [`SelfUpdatingLogger`] so
//! that attaching fields can keep a carrying context up to date.

pub mod macros;

pub mod collector;
pub mod formatter;
pub mod initialize;
pub mod level;
pub mod logger;
pub mod null;
pub mod output;
pub mod registry;
pub mod self_updating;
pub mod tracing_backend;

pub use collector::{DebugLogCollector, LOG_LEVEL_KEY, LOG_MESSAGE_KEY, LOG_TIME_KEY};
pub use formatter::{Formatter, FormatterType, RFC3339, RFC3339_NANO};
pub use initialize::{init_logging, LoggingInitialization};
pub use level::{LogKind, LogLevel};
pub use logger::{
    set_fatal_exit_handler, ExitHandler, FatalExitOverride, Fields, Logger, FATAL_EXIT_CODE,
};
pub use null::{null_logger, NullLogger};
pub use output::{LogOutput, SharedBuffer};
pub use registry::{register_logger, unregister_logger, LoggerConstructor};
pub use self_updating::{ContextWrapper, SelfUpdatingLogger};
pub use tracing_backend::TracingLogger;
