//! Record rendering for the tracing backend.
//!
//! Turns one log entry into a single output line, either `key=value` text
//! or a JSON object, honouring the formatter's key remapping.

use crate::formatter::{Formatter, FormatterType, KeySetting, RFC3339};
use crate::level::LogLevel;
use crate::logger::Fields;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use ctxlog_core_types::schema::{
    FIELD_CLASH_PREFIX, FIELD_FUNCTION, FIELD_LEVEL, FIELD_MESSAGE, FIELD_TIME,
};
use ctxlog_errors::{LoggingError, Result};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::sync::Arc;

// The backend's own default key names
pub const BACKEND_TIME_KEY: &str = "time";
pub const BACKEND_MESSAGE_KEY: &str = "msg";
pub const BACKEND_LEVEL_KEY: &str = "level";

/// One log entry, ready to render
#[derive(Debug, Clone)]
pub struct Entry {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// Shared with the scoped logger that produced the entry
    pub fields: Arc<Fields>,
    pub caller: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Text,
    Json,
}

/// Renders entries according to a `Formatter`
#[derive(Debug, Clone)]
pub struct EntryEncoder {
    encoding: Encoding,
    time_key: Option<String>,
    message_key: String,
    level_key: String,
    function_key: Option<String>,
    time_format: String,
}

impl Default for EntryEncoder {
    fn default() -> Self {
        Self {
            encoding: Encoding::Text,
            time_key: Some(BACKEND_TIME_KEY.to_string()),
            message_key: BACKEND_MESSAGE_KEY.to_string(),
            level_key: BACKEND_LEVEL_KEY.to_string(),
            function_key: None,
            time_format: RFC3339.to_string(),
        }
    }
}

impl EntryEncoder {
    /// Build an encoder from formatter configuration.
    ///
    /// `FormatterType::Default` keeps the current encoding and only patches
    /// the keys that were explicitly requested.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `time_format` is not a valid strftime string.
    pub fn from_formatter(formatter: &Formatter) -> Result<Self> {
        let mut encoder = Self::default();

        encoder.encoding = match formatter.encoding {
            FormatterType::Default => encoder.encoding,
            FormatterType::Text => Encoding::Text,
            FormatterType::Json => Encoding::Json,
        };

        encoder.time_key =
            KeySetting::parse(&formatter.time_key).resolve(BACKEND_TIME_KEY, FIELD_TIME, true);
        if let Some(key) = KeySetting::parse(&formatter.message_key).resolve(
            BACKEND_MESSAGE_KEY,
            FIELD_MESSAGE,
            false,
        ) {
            encoder.message_key = key;
        }
        if let Some(key) =
            KeySetting::parse(&formatter.level_key).resolve(BACKEND_LEVEL_KEY, FIELD_LEVEL, false)
        {
            encoder.level_key = key;
        }
        // Caller reporting is off unless a function key is requested
        encoder.function_key = match KeySetting::parse(&formatter.function_key) {
            KeySetting::Unspecified | KeySetting::Skip => None,
            KeySetting::Canonical => Some(FIELD_FUNCTION.to_string()),
            KeySetting::Named(name) => Some(name.to_string()),
        };

        if !formatter.time_format.is_empty() {
            let invalid = StrftimeItems::new(&formatter.time_format)
                .any(|item| matches!(item, Item::Error));
            if invalid {
                return Err(LoggingError::invalid_argument(format!(
                    "invalid time format: {}",
                    formatter.time_format
                )));
            }
            encoder.time_format = formatter.time_format.clone();
        }

        Ok(encoder)
    }

    /// Whether entries carry the caller location
    pub fn reports_caller(&self) -> bool {
        self.function_key.is_some()
    }

    /// Render one entry as a complete line
    pub fn encode(&self, entry: &Entry) -> String {
        let reserved = self.reserved_pairs(entry);
        let fields = entry.fields.iter().map(|(key, value)| {
            let clashes = reserved.iter().any(|(reserved_key, _)| reserved_key == key);
            let key = if clashes {
                format!("{FIELD_CLASH_PREFIX}{key}")
            } else {
                key.clone()
            };
            (key, value.clone())
        });

        match self.encoding {
            Encoding::Json => {
                let mut object: Map<String, Value> = fields.collect();
                for (key, value) in reserved {
                    object.insert(key, Value::String(value));
                }
                let mut line = Value::Object(object).to_string();
                line.push('\n');
                line
            }
            Encoding::Text => {
                let mut line = String::new();
                for (key, value) in &reserved {
                    push_pair(&mut line, key, &quote_if_needed(value));
                }
                for (key, value) in fields {
                    push_pair(&mut line, &key, &text_value(&value));
                }
                line.push('\n');
                line
            }
        }
    }

    fn reserved_pairs(&self, entry: &Entry) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(key) = &self.time_key {
            pairs.push((key.clone(), self.format_time(&entry.time)));
        }
        pairs.push((self.level_key.clone(), entry.level.as_str().to_string()));
        pairs.push((self.message_key.clone(), entry.message.clone()));
        if let (Some(key), Some(caller)) = (&self.function_key, &entry.caller) {
            pairs.push((key.clone(), caller.clone()));
        }
        pairs
    }

    fn format_time(&self, time: &DateTime<Local>) -> String {
        let mut out = String::new();
        if write!(out, "{}", time.format(&self.time_format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", time.format(RFC3339));
        }
        out
    }
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(key);
    line.push('=');
    line.push_str(value);
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => quote_if_needed(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => quote_if_needed(&other.to_string()),
    }
}

fn needs_quoting(text: &str) -> bool {
    !text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

fn quote_if_needed(text: &str) -> String {
    if needs_quoting(text) {
        format!("{text:?}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry(fields: Value) -> Entry {
        let fields: Fields = match fields {
            Value::Object(map) => map.into_iter().collect(),
            _ => Fields::new(),
        };
        Entry {
            time: Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap(),
            level: LogLevel::Info,
            message: "Hello World".to_string(),
            fields: Arc::new(fields),
            caller: Some("src/main.rs:10:5".to_string()),
        }
    }

    fn encoder(formatter: Formatter) -> EntryEncoder {
        EntryEncoder::from_formatter(&formatter).unwrap()
    }

    #[test]
    fn test_default_is_text_with_backend_keys() {
        let line = encoder(Formatter::default())
            .encode(&entry(json!({"testInt": 128, "testStr": "hello"})));

        assert!(line.ends_with('\n'));
        assert!(line.contains("level=info"));
        assert!(line.contains("msg=\"Hello World\""));
        assert!(line.contains("testInt=128 testStr=hello"));
        assert!(line.starts_with("time=\""));
        assert!(!line.contains("function"));
    }

    #[test]
    fn test_json_with_canonical_message_key() {
        let formatter = Formatter {
            encoding: FormatterType::Json,
            message_key: "~".to_string(),
            ..Formatter::default()
        };
        let line = encoder(formatter).encode(&entry(json!({"a": 1})));
        let decoded: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(decoded["message"], json!("Hello World"));
        assert_eq!(decoded["level"], json!("info"));
        assert_eq!(decoded["a"], json!(1));
        assert!(decoded.get("msg").is_none());
    }

    #[test]
    fn test_time_can_be_skipped() {
        let formatter = Formatter {
            encoding: FormatterType::Json,
            time_key: "-".to_string(),
            ..Formatter::default()
        };
        let line = encoder(formatter).encode(&entry(json!({})));
        let decoded: Value = serde_json::from_str(&line).unwrap();

        assert!(decoded.get("time").is_none());
        assert_eq!(decoded.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_skip_on_message_falls_back_to_backend_name() {
        let formatter = Formatter {
            encoding: FormatterType::Json,
            message_key: "-".to_string(),
            ..Formatter::default()
        };
        let line = encoder(formatter).encode(&entry(json!({})));
        let decoded: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(decoded["msg"], json!("Hello World"));
    }

    #[test]
    fn test_named_keys_and_time_format() {
        let formatter = Formatter {
            encoding: FormatterType::Text,
            time_key: "when".to_string(),
            level_key: "bubbleScale".to_string(),
            time_format: "%Y/%m/%d".to_string(),
            ..Formatter::default()
        };
        let line = encoder(formatter).encode(&entry(json!({})));

        assert_eq!(line, "when=2024/03/01 bubbleScale=info msg=\"Hello World\"\n");
    }

    #[test]
    fn test_function_key_reports_caller() {
        let formatter = Formatter {
            encoding: FormatterType::Json,
            function_key: "~".to_string(),
            ..Formatter::default()
        };
        let encoder = encoder(formatter);
        assert!(encoder.reports_caller());

        let decoded: Value = serde_json::from_str(&encoder.encode(&entry(json!({})))).unwrap();
        assert_eq!(decoded["function"], json!("src/main.rs:10:5"));
    }

    #[test]
    fn test_clashing_field_is_prefixed() {
        let formatter = Formatter {
            encoding: FormatterType::Json,
            ..Formatter::default()
        };
        let line = encoder(formatter).encode(&entry(json!({"level": "mine"})));
        let decoded: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(decoded["level"], json!("info"));
        assert_eq!(decoded["fields.level"], json!("mine"));
    }

    #[test]
    fn test_invalid_time_format_is_rejected() {
        let formatter = Formatter {
            time_format: "%Q%".to_string(),
            ..Formatter::default()
        };
        assert!(EntryEncoder::from_formatter(&formatter).is_err());
    }

    #[test]
    fn test_quoting_rules() {
        assert_eq!(quote_if_needed("plain-value_1.2/x@y^z+w"), "plain-value_1.2/x@y^z+w");
        assert_eq!(quote_if_needed("two words"), "\"two words\"");
        assert_eq!(quote_if_needed(""), "");
        assert_eq!(text_value(&json!(true)), "true");
        assert_eq!(text_value(&json!([1, 2])), "\"[1,2]\"");
    }
}
