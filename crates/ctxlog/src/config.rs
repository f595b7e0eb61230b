//! TOML configuration for startup.
//!
//! ```toml
//! [logging]
//! kind = "tracing"
//! level = "info"
//! output = "stderr"
//!
//! [logging.formatter]
//! encoding = "json"
//! message_key = "~"
//! ```
//!
//! A missing `[logging]` table means no logger is built.

use crate::types::Initialization;
use ctxlog_errors::{LoggingError, Result};
use ctxlog_logging::{
    Formatter, FormatterType, LogKind, LogLevel, LogOutput, LoggingInitialization,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration document
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InitializationConfig {
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub kind: String,
    pub custom_kind: String,
    pub level: String,
    /// `"stderr"` or `"stdout"`; empty keeps the backend default
    pub output: String,
    pub formatter: FormatterConfig,
}

/// `[logging.formatter]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    pub encoding: String,
    pub time_key: String,
    pub message_key: String,
    pub level_key: String,
    pub function_key: String,
    pub time_format: String,
}

impl InitializationConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the text is not valid TOML or does not
    /// match the expected tables.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| LoggingError::invalid_config(err.to_string()))
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            LoggingError::invalid_config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Convert into a startup request.
    ///
    /// # Errors
    ///
    /// - `UnsupportedKind` for an unknown logger kind
    /// - `InvalidConfig` for an unknown level, encoding or output
    pub fn into_initialization(self) -> Result<Initialization> {
        let logging = self
            .logging
            .map(LoggingConfig::into_logging_initialization)
            .transpose()?;
        Ok(Initialization { logging })
    }
}

impl LoggingConfig {
    fn into_logging_initialization(self) -> Result<LoggingInitialization> {
        let output = match self.output.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "stderr" => Some(LogOutput::stderr()),
            "stdout" => Some(LogOutput::stdout()),
            other => {
                return Err(LoggingError::invalid_config(format!(
                    "unknown log output: {other}"
                )))
            }
        };

        Ok(LoggingInitialization {
            kind: self.kind.parse::<LogKind>()?,
            custom_kind: self.custom_kind,
            output,
            level: self.level.parse::<LogLevel>()?,
            formatter: self.formatter.into_formatter()?,
            fatal_exit: None,
        })
    }
}

impl FormatterConfig {
    fn into_formatter(self) -> Result<Formatter> {
        Ok(Formatter {
            encoding: self.encoding.parse::<FormatterType>()?,
            time_key: self.time_key,
            message_key: self.message_key,
            level_key: self.level_key,
            function_key: self.function_key,
            time_format: self.time_format,
        })
    }
}
