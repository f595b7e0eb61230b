//! Startup request types

use ctxlog_logging::LoggingInitialization;

/// Everything `startup` needs to build a context's cross-cutting state.
///
/// Tracing and metrics initialization are reserved and not implemented.
#[derive(Debug, Clone, Default)]
pub struct Initialization {
    /// Logging request; `None` means no logger is built
    pub logging: Option<LoggingInitialization>,
}
