//! Logger retrieval

use crate::breakdown::breakdown;
use ctxlog_core_types::Context;
use ctxlog_logging::{null_logger, Logger};
use std::sync::Arc;

/// The logger carried by `ctx`, or the shared null logger.
///
/// Never fails. The returned logger is bound to `ctx`: attaching fields to it
/// yields a logger whose `context()` carries those fields.
///
/// # Example
///
/// ```
/// use ctxlog::log;
/// use ctxlog_core_types::Context;
/// use ctxlog_logging::Logger;
///
/// log(&Context::background()).infof(format_args!("discarded"));
/// ```
pub fn log(ctx: &Context) -> Arc<dyn Logger> {
    breakdown(ctx).log.unwrap_or_else(null_logger)
}
