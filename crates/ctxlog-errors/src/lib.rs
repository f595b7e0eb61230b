//! Error facility for ctxlog
//!
//! Errors are only ever surfaced from initialization-time calls
//! (registration, logger construction, startup, configuration). Logging
//! calls themselves never fail from the caller's point of view.

use thiserror::Error;

/// Result type alias using LoggingError
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Boxed error returned by logger constructors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorKind {
    /// A required input was missing or empty
    InvalidArgument,
    /// A custom logger kind is not registered
    NotFound,
    /// The requested logger kind is not known
    UnsupportedKind,
    /// A custom logger kind is already registered
    Conflict,
    /// A logger constructor failed
    Constructor,
    /// Configuration text could not be interpreted
    InvalidConfig,
}

impl LogErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            LogErrorKind::NotFound => "ERR_NOT_FOUND",
            LogErrorKind::UnsupportedKind => "ERR_UNSUPPORTED_KIND",
            LogErrorKind::Conflict => "ERR_CONFLICT",
            LogErrorKind::Constructor => "ERR_CONSTRUCTOR",
            LogErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }
}

/// Errors raised while setting up logging
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Custom logger kind is not registered: {name}")]
    NotFound { name: String },

    #[error("Unsupported logger kind: {kind}")]
    UnsupportedKind { kind: String },

    #[error("Logger kind '{name}' already registered")]
    Conflict { name: String },

    #[error("Logger constructor for '{kind}' failed: {source}")]
    Constructor {
        kind: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl LoggingError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        LoggingError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InvalidConfig` error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        LoggingError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> LogErrorKind {
        match self {
            LoggingError::InvalidArgument { .. } => LogErrorKind::InvalidArgument,
            LoggingError::NotFound { .. } => LogErrorKind::NotFound,
            LoggingError::UnsupportedKind { .. } => LogErrorKind::UnsupportedKind,
            LoggingError::Conflict { .. } => LogErrorKind::Conflict,
            LoggingError::Constructor { .. } => LogErrorKind::Constructor,
            LoggingError::InvalidConfig { .. } => LogErrorKind::InvalidConfig,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
