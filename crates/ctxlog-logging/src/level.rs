//! Severity and backend-kind enumerations.

use ctxlog_errors::LoggingError;
use std::fmt;
use std::str::FromStr;

/// Log severity.
///
/// Ordering is monotonic by severity. `Default` is not a severity: it asks
/// the backend to keep its own default threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Use the backend's own default
    #[default]
    Default,
    /// Debugging information
    Debug,
    /// General information
    Info,
    /// Warning messages
    Warn,
    /// Error messages
    Error,
    /// Logged, then the current unit of work unwinds
    Panic,
    /// Logged, then the process exits
    Fatal,
}

impl LogLevel {
    /// Name used on the wire; empty for `Default`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Default => "",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Whether a message at this level passes `threshold`
    pub fn passes(&self, threshold: LogLevel) -> bool {
        *self != LogLevel::Default && *self >= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(LogLevel::Default),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(LoggingError::invalid_config(format!(
                "unknown log level: {other}"
            ))),
        }
    }
}

/// Which backend `init_logging` should construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogKind {
    /// The built-in backend
    #[default]
    Default,
    /// The built-in `tracing` backend, named explicitly
    Tracing,
    /// A backend registered with `register_logger`
    Custom,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Default => "default",
            LogKind::Tracing => "tracing",
            LogKind::Custom => "custom",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(LogKind::Default),
            "tracing" => Ok(LogKind::Tracing),
            "custom" => Ok(LogKind::Custom),
            other => Err(LoggingError::UnsupportedKind {
                kind: other.to_string(),
            }),
        }
    }
}
