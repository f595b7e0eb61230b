//! Deterministic capture of emitted records for tests.
//!
//! The collector configures an initialization request so the built-in
//! backend writes newline-delimited JSON into an in-memory buffer, and
//! routes fatal exits into a recorded list instead of ending the process.
//! Accessors decode the buffer lazily and fail soft.

use crate::formatter::{FormatterType, RFC3339_NANO};
use crate::initialize::LoggingInitialization;
use crate::level::{LogKind, LogLevel};
use crate::logger::ExitHandler;
use crate::output::SharedBuffer;
use chrono::{DateTime, FixedOffset};
use serde_json::{Deserializer, Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Key the collector assigns to the message
pub const LOG_MESSAGE_KEY: &str = "lc_log_message";
/// Key the collector assigns to the level
pub const LOG_LEVEL_KEY: &str = "lc_log_level";
/// Key the collector assigns to the timestamp
pub const LOG_TIME_KEY: &str = "lc_log_time";

type Record = Map<String, Value>;

#[derive(Debug, Default)]
struct CollectorState {
    // Bytes drained from the buffer but not yet forming a complete record
    pending: Vec<u8>,
    logs: Vec<Record>,
    exit_codes: Vec<i32>,
}

/// In-memory log capture with exit-code correlation
///
/// # Example
///
/// ```
/// use ctxlog_logging::{init_logging, DebugLogCollector, LogLevel, Logger, LoggingInitialization};
///
/// let collector = DebugLogCollector::new();
/// let mut init = LoggingInitialization::default();
/// collector.setup_initialization(&mut init);
///
/// let logger = init_logging(Some(&init)).unwrap().unwrap();
/// logger.warnf(format_args!("disk {}% full", 91));
///
/// assert_eq!(collector.number_logs(), Some(1));
/// assert_eq!(collector.message(0), "disk 91% full");
/// assert_eq!(collector.log_level(0), Some(LogLevel::Warn));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DebugLogCollector {
    buffer: SharedBuffer,
    state: Arc<Mutex<CollectorState>>,
}

impl DebugLogCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `init` at this collector: built-in backend, JSON records with
    /// collector keys and nanosecond timestamps, fatal exits recorded.
    pub fn setup_initialization(&self, init: &mut LoggingInitialization) {
        init.kind = LogKind::Tracing;
        init.output = Some(self.buffer.output());
        init.formatter.encoding = FormatterType::Json;
        init.formatter.message_key = LOG_MESSAGE_KEY.to_string();
        init.formatter.level_key = LOG_LEVEL_KEY.to_string();
        init.formatter.time_key = LOG_TIME_KEY.to_string();
        init.formatter.time_format = RFC3339_NANO.to_string();
        init.fatal_exit = Some(self.exit_handler());
    }

    /// Record an exit code in arrival order
    pub fn on_exit_code(&self, code: i32) {
        self.lock().exit_codes.push(code);
    }

    /// Exit handler that feeds `on_exit_code`
    pub fn exit_handler(&self) -> ExitHandler {
        let collector = self.clone();
        Arc::new(move |code| collector.on_exit_code(code))
    }

    /// Decode pending output, then drop every record and exit code
    pub fn clear(&self) {
        let mut state = self.lock();
        let _ = self.populate(&mut state);
        state.logs.clear();
        state.exit_codes.clear();
    }

    /// Number of records received, or `None` if the output does not decode
    pub fn number_logs(&self) -> Option<usize> {
        let mut state = self.lock();
        self.populate(&mut state).ok()?;
        Some(state.logs.len())
    }

    /// Message of record `index`, or text describing why it is unavailable
    pub fn message(&self, index: usize) -> String {
        match self.log_field(index, LOG_MESSAGE_KEY) {
            Ok(Some(Value::String(message))) => message,
            Ok(_) => "unknown type of log message, expected string".to_string(),
            Err(reason) => reason,
        }
    }

    /// Level of record `index`.
    ///
    /// `None` if the record or its level is missing. Unrecognized level
    /// names yield `LogLevel::Default`.
    pub fn log_level(&self, index: usize) -> Option<LogLevel> {
        match self.log_field(index, LOG_LEVEL_KEY).ok()?? {
            Value::String(level) => Some(level.parse().unwrap_or_default()),
            _ => None,
        }
    }

    /// Timestamp of record `index`
    pub fn time(&self, index: usize) -> Option<DateTime<FixedOffset>> {
        match self.log_field(index, LOG_TIME_KEY).ok()?? {
            Value::String(time) => DateTime::parse_from_rfc3339(&time).ok(),
            _ => None,
        }
    }

    /// User field `name` of record `index`; the collector keys are not fields
    pub fn field(&self, index: usize, name: &str) -> Option<Value> {
        if matches!(name, LOG_MESSAGE_KEY | LOG_LEVEL_KEY | LOG_TIME_KEY) {
            return None;
        }
        self.log_field(index, name).ok()?
    }

    /// Exit code caused by record `index`.
    ///
    /// Fatal records are matched to recorded exit codes in emission order.
    /// `None` if the record is not fatal or records and codes are out of
    /// sync.
    pub fn fatal_exit_code(&self, index: usize) -> Option<i32> {
        let mut state = self.lock();
        if index >= state.logs.len() {
            self.populate(&mut state).ok()?;
        }
        if index >= state.logs.len() {
            return None;
        }

        let mut codes = state.exit_codes.iter();
        for (position, record) in state.logs.iter().enumerate().take(index + 1) {
            let is_fatal = record.get(LOG_LEVEL_KEY).and_then(Value::as_str) == Some("fatal");
            if !is_fatal {
                if position == index {
                    return None;
                }
                continue;
            }
            let code = codes.next()?;
            if position == index {
                return Some(*code);
            }
        }
        None
    }

    fn lock(&self) -> MutexGuard<'_, CollectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_field(&self, index: usize, name: &str) -> Result<Option<Value>, String> {
        let mut state = self.lock();
        if index >= state.logs.len() {
            self.populate(&mut state).map_err(|err| err.to_string())?;
        }
        let record = state
            .logs
            .get(index)
            .ok_or_else(|| "log index exceeds number of logs received".to_string())?;
        Ok(record.get(name).cloned())
    }

    // Partial trailing records stay pending for the next call. Undecodable
    // bytes are discarded along with the error.
    fn populate(&self, state: &mut CollectorState) -> serde_json::Result<()> {
        state.pending.extend(self.buffer.take());

        let mut decoded = Vec::new();
        let mut consumed = 0;
        let mut failure = None;
        loop {
            let mut stream =
                Deserializer::from_slice(&state.pending[consumed..]).into_iter::<Record>();
            match stream.next() {
                Some(Ok(record)) => {
                    consumed += stream.byte_offset();
                    decoded.push(record);
                }
                Some(Err(err)) if !err.is_eof() => {
                    failure = Some(err);
                    break;
                }
                Some(Err(_)) | None => break,
            }
        }

        state.logs.extend(decoded);
        match failure {
            Some(err) => {
                state.pending.clear();
                Err(err)
            }
            None => {
                state.pending.drain(..consumed);
                Ok(())
            }
        }
    }
}
