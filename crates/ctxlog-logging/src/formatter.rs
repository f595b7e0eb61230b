//! Output encoding and field-key configuration.

use ctxlog_core_types::schema::{KEY_CANONICAL, KEY_SKIP};
use ctxlog_errors::LoggingError;
use std::fmt;
use std::str::FromStr;

/// RFC 3339 with seconds precision, the backend default time format
pub const RFC3339: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// RFC 3339 with nanosecond precision
pub const RFC3339_NANO: &str = "%Y-%m-%dT%H:%M:%S%.9f%:z";

/// Record encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatterType {
    /// Keep whatever encoding the backend already uses
    #[default]
    Default,
    /// `key=value` pairs on one line
    Text,
    /// One JSON object per line
    Json,
}

impl fmt::Display for FormatterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormatterType::Default => "",
            FormatterType::Text => "text",
            FormatterType::Json => "json",
        })
    }
}

impl FromStr for FormatterType {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(FormatterType::Default),
            "text" => Ok(FormatterType::Text),
            "json" => Ok(FormatterType::Json),
            other => Err(LoggingError::invalid_config(format!(
                "unknown formatter encoding: {other}"
            ))),
        }
    }
}

/// Formatter configuration.
///
/// Each key accepts:
/// - `""`: no override, the backend default name is used
/// - `"-"`: the field is skipped (only the time field supports this)
/// - `"~"`: the canonical name from `ctxlog_core_types::schema`
/// - anything else: used verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formatter {
    pub encoding: FormatterType,
    pub time_key: String,
    pub message_key: String,
    pub level_key: String,
    pub function_key: String,
    /// chrono strftime string; empty means `RFC3339`
    pub time_format: String,
}

/// What a single key setting asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySetting<'a> {
    Unspecified,
    Skip,
    Canonical,
    Named(&'a str),
}

impl<'a> KeySetting<'a> {
    pub fn parse(key: &'a str) -> Self {
        match key {
            "" => KeySetting::Unspecified,
            KEY_SKIP => KeySetting::Skip,
            KEY_CANONICAL => KeySetting::Canonical,
            name => KeySetting::Named(name),
        }
    }

    /// Resolve to a field name, or `None` when the field is skipped.
    ///
    /// `allow_skip` is false for fields the backend cannot drop; those fall
    /// back to `backend_default` instead.
    pub fn resolve(
        self,
        backend_default: &str,
        canonical: &str,
        allow_skip: bool,
    ) -> Option<String> {
        match self {
            KeySetting::Unspecified => Some(backend_default.to_string()),
            KeySetting::Skip if allow_skip => None,
            KeySetting::Skip => Some(backend_default.to_string()),
            KeySetting::Canonical => Some(canonical.to_string()),
            KeySetting::Named(name) => Some(name.to_string()),
        }
    }
}
