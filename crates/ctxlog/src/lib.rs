//! Context-carried structured logging
//!
//! [`startup`] builds a [`Context`] carrying a logger; [`log`] retrieves it
//! anywhere the context travels. Loggers retrieved this way are bound to
//! their context, so attaching a field yields a logger whose `context()`
//! carries the field onward.
//!
//! ```
//! use ctxlog::{log, startup, Initialization};
//! use ctxlog_logging::{DebugLogCollector, Logger, LoggingInitialization};
//! use serde_json::json;
//!
//! let collector = DebugLogCollector::new();
//! let mut logging = LoggingInitialization::default();
//! collector.setup_initialization(&mut logging);
//! let ctx = startup(None, Some(&Initialization { logging: Some(logging) })).unwrap();
//!
//! let ctx = log(&ctx).with_field("request", json!(42)).context().unwrap();
//! log(&ctx).infof(format_args!("handled"));
//!
//! assert_eq!(collector.field(0, "request"), Some(json!(42)));
//! ```

pub mod breakdown;
pub mod config;
pub mod initialize;
pub mod logging;
pub mod types;

pub use breakdown::{breakdown, Breakdown};
pub use config::InitializationConfig;
pub use ctxlog_core_types::Context;
pub use initialize::startup;
pub use logging::log;
pub use types::Initialization;
