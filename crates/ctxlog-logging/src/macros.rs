//! Formatted logging macros
//!
//! Shorthand for the formatted call shape of [`crate::Logger`]. The logger
//! argument may be anything that derefs to a logger.

/// Log at debug level
///
/// # Example
///
/// ```
/// # use ctxlog_logging::{log_debug, null_logger};
/// let logger = null_logger();
/// log_debug!(logger, "cache miss for {}", "key");
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.debugf(format_args!($($arg)+))
    }};
}

/// Log at info level
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.infof(format_args!($($arg)+))
    }};
}

/// Log at warn level
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.warnf(format_args!($($arg)+))
    }};
}

/// Log at error level
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.errorf(format_args!($($arg)+))
    }};
}

/// Log at panic level, then panic
#[macro_export]
macro_rules! log_panic {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.panicf(format_args!($($arg)+))
    }};
}

/// Log at fatal level, then run the logger's exit handler
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.fatalf(format_args!($($arg)+))
    }};
}

#[cfg(test)]
mod tests {
    use crate::collector::DebugLogCollector;
    use crate::initialize::{init_logging, LoggingInitialization};
    use crate::level::LogLevel;

    #[test]
    fn test_macros_format_and_route_levels() {
        let collector = DebugLogCollector::new();
        let mut init = LoggingInitialization {
            level: LogLevel::Debug,
            ..LoggingInitialization::default()
        };
        collector.setup_initialization(&mut init);
        let logger = init_logging(Some(&init)).unwrap().unwrap();

        log_debug!(logger, "d{}", 1);
        log_info!(logger, "i{}", 2);
        log_warn!(logger, "w{}", 3);
        log_error!(logger, "e{}", 4);
        log_fatal!(logger, "f{}", 5);

        assert_eq!(collector.number_logs(), Some(5));
        assert_eq!(collector.message(0), "d1");
        assert_eq!(collector.log_level(3), Some(LogLevel::Error));
        assert_eq!(collector.message(4), "f5");
        assert_eq!(collector.fatal_exit_code(4), Some(1));
    }

    #[test]
    fn test_panic_macro_unwinds() {
        let logger = crate::null::null_logger();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log_panic!(logger, "boom {}", 1)
        }));
        assert!(result.is_err());
    }
}
