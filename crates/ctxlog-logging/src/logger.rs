//! Logger capability contract.

use crate::level::LogLevel;
use crate::self_updating::ContextWrapper;
use ctxlog_core_types::Context;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Arguments, Display, Write as _};
use std::sync::Arc;

/// Structured fields attached to a logger.
///
/// Keys are kept sorted, so the order in which fields were attached never
/// shows up in the output.
pub type Fields = BTreeMap<String, Value>;

/// Replacement for `std::process::exit`, invoked with the exit code of a
/// fatal log call
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Exit code used after a fatal log call
pub const FATAL_EXIT_CODE: i32 = 1;

/// The default exit handler: terminate the process
pub fn process_exit_handler() -> ExitHandler {
    Arc::new(|code| std::process::exit(code))
}

/// Logging interface shared by every backend and decorator.
///
/// Each severity comes in three call shapes:
/// - `infof(format_args!(..))`: formatted
/// - `info(&[&a, &b])`: arguments concatenated with no separator
/// - `infoln(&[&a, &b])`: arguments joined by single spaces
///
/// Panic-level calls log and then unwind. Fatal-level calls log and then
/// invoke the exit handler. No call reports an error.
pub trait Logger: Send + Sync + fmt::Debug {
    /// Log a message at the specified level.
    ///
    /// This is the core method that implementations must provide. Every
    /// call shape delegates here.
    #[track_caller]
    fn log(&self, level: LogLevel, args: Arguments<'_>);

    /// A new logger scoped with one more field. The receiver is unchanged.
    fn with_field(&self, key: &str, value: Value) -> Arc<dyn Logger>;

    /// A new logger scoped with all of `fields`. The receiver is unchanged.
    fn with_fields(&self, fields: Fields) -> Arc<dyn Logger>;

    /// The context this logger was retrieved from, if it is bound to one
    fn context(&self) -> Option<Context> {
        None
    }

    /// Bind this logger to a context wrapper.
    ///
    /// Returns `None` when the logger does not support binding.
    fn bind_context(&self, _wrapper: Arc<dyn ContextWrapper>) -> Option<Arc<dyn Logger>> {
        None
    }

    /// Exit-handler substitution, when supported
    fn fatal_exit_override(&self) -> Option<&dyn FatalExitOverride> {
        None
    }

    #[track_caller]
    fn debugf(&self, args: Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }
    #[track_caller]
    fn debug(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Debug, format_args!("{}", concat_args(args)));
    }
    #[track_caller]
    fn debugln(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Debug, format_args!("{}", join_args(args)));
    }

    #[track_caller]
    fn infof(&self, args: Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }
    #[track_caller]
    fn info(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Info, format_args!("{}", concat_args(args)));
    }
    #[track_caller]
    fn infoln(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Info, format_args!("{}", join_args(args)));
    }

    #[track_caller]
    fn warnf(&self, args: Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }
    #[track_caller]
    fn warn(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Warn, format_args!("{}", concat_args(args)));
    }
    #[track_caller]
    fn warnln(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Warn, format_args!("{}", join_args(args)));
    }

    #[track_caller]
    fn errorf(&self, args: Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }
    #[track_caller]
    fn error(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Error, format_args!("{}", concat_args(args)));
    }
    #[track_caller]
    fn errorln(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Error, format_args!("{}", join_args(args)));
    }

    #[track_caller]
    fn panicf(&self, args: Arguments<'_>) {
        self.log(LogLevel::Panic, args);
    }
    #[track_caller]
    fn panic(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Panic, format_args!("{}", concat_args(args)));
    }
    #[track_caller]
    fn panicln(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Panic, format_args!("{}", join_args(args)));
    }

    #[track_caller]
    fn fatalf(&self, args: Arguments<'_>) {
        self.log(LogLevel::Fatal, args);
    }
    #[track_caller]
    fn fatal(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Fatal, format_args!("{}", concat_args(args)));
    }
    #[track_caller]
    fn fatalln(&self, args: &[&dyn Display]) {
        self.log(LogLevel::Fatal, format_args!("{}", join_args(args)));
    }
}

/// Optional capability: replace the handler run after a fatal log call
pub trait FatalExitOverride {
    /// Returns false when the handler could not be installed
    fn set_fatal_exit_handler(&self, handler: ExitHandler) -> bool;
}

/// Install `handler` on `logger` if it supports exit-handler substitution
pub fn set_fatal_exit_handler(logger: &dyn Logger, handler: ExitHandler) -> bool {
    logger
        .fatal_exit_override()
        .map(|target| target.set_fatal_exit_handler(handler))
        .unwrap_or(false)
}

/// Concatenate arguments with no separator
pub fn concat_args(args: &[&dyn Display]) -> String {
    let mut out = String::new();
    for arg in args {
        let _ = write!(out, "{arg}");
    }
    out
}

/// Join arguments with single spaces
pub fn join_args(args: &[&dyn Display]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    out
}
