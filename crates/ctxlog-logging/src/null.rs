//! No-operation logger implementation.

use crate::level::LogLevel;
use crate::logger::{Fields, Logger, FATAL_EXIT_CODE};
use serde_json::Value;
use std::fmt::Arguments;
use std::sync::{Arc, OnceLock};

/// A logger that discards all messages.
///
/// Returned by `ctxlog::log` for contexts that carry no logger. Panic and
/// fatal calls keep their control-flow effect: a panic still unwinds and a
/// fatal call still ends the process.
///
/// # Example
///
/// ```
/// use ctxlog_logging::{null_logger, Logger};
///
/// let logger = null_logger();
/// logger.infof(format_args!("This message is discarded"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

static NULL_LOGGER: OnceLock<Arc<NullLogger>> = OnceLock::new();

/// The shared null-logger instance
pub fn null_logger() -> Arc<dyn Logger> {
    NULL_LOGGER.get_or_init(|| Arc::new(NullLogger)).clone()
}

impl Logger for NullLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Panic => panic!("{}", args),
            LogLevel::Fatal => std::process::exit(FATAL_EXIT_CODE),
            _ => {}
        }
    }

    fn with_field(&self, _key: &str, _value: Value) -> Arc<dyn Logger> {
        null_logger()
    }

    fn with_fields(&self, _fields: Fields) -> Arc<dyn Logger> {
        null_logger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn test_null_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NullLogger>();
    }

    #[test]
    fn test_null_logger_discards_messages() {
        let logger = null_logger();
        logger.debugf(format_args!("debug message"));
        logger.info(&[&"info", &"message"]);
        logger.warnln(&[&"warn", &"message"]);
        logger.errorf(format_args!("error message"));
    }

    #[test]
    fn test_with_field_returns_singleton() {
        let logger = null_logger();
        let scoped = logger.with_field("a", Value::from(1));
        let multi = scoped.with_fields(Fields::new());

        assert!(Arc::ptr_eq(&logger, &scoped));
        assert!(Arc::ptr_eq(&logger, &multi));
        assert!(scoped.context().is_none());
    }

    #[test]
    fn test_panic_still_unwinds() {
        let logger = null_logger();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            logger.panicf(format_args!("boom {}", 1));
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_logger_debug_impl() {
        assert_eq!(format!("{:?}", NullLogger), "NullLogger");
    }
}
