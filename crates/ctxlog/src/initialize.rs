//! Context startup

use crate::breakdown::{with_state, BreakdownState};
use crate::types::Initialization;
use ctxlog_core_types::Context;
use ctxlog_errors::{LoggingError, Result};
use ctxlog_logging::init_logging;

/// Build a context carrying the cross-cutting state described by `init`.
///
/// The state is attached to `base`, or to a background context when `base`
/// is `None`. A request without logging yields a context whose logger is
/// the null logger.
///
/// # Errors
///
/// - `InvalidArgument` if `init` is `None`
/// - any error from `ctxlog_logging::init_logging`
///
/// # Example
///
/// ```
/// use ctxlog::{log, startup, Initialization};
/// use ctxlog_logging::{DebugLogCollector, Logger, LoggingInitialization};
///
/// let collector = DebugLogCollector::new();
/// let mut logging = LoggingInitialization::default();
/// collector.setup_initialization(&mut logging);
///
/// let ctx = startup(None, Some(&Initialization { logging: Some(logging) })).unwrap();
/// log(&ctx).info(&[&"Hello Tester"]);
///
/// assert_eq!(collector.message(0), "Hello Tester");
/// ```
pub fn startup(base: Option<&Context>, init: Option<&Initialization>) -> Result<Context> {
    let init =
        init.ok_or_else(|| LoggingError::invalid_argument("initialization values must be set"))?;

    let logger = init_logging(init.logging.as_ref())?;
    tracing::debug!(logging = logger.is_some(), "context started");

    let base = base.cloned().unwrap_or_else(Context::background);
    Ok(with_state(&base, BreakdownState::new(logger)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::breakdown;
    use ctxlog_errors::LogErrorKind;

    #[test]
    fn test_missing_initialization_is_rejected() {
        let err = startup(None, None).unwrap_err();
        assert_eq!(err.kind(), LogErrorKind::InvalidArgument);
    }

    #[test]
    fn test_base_values_are_kept() {
        #[derive(Debug, PartialEq)]
        struct RequestId(u32);

        let base = Context::background().with_value(RequestId(7));
        let ctx = startup(Some(&base), Some(&Initialization::default())).unwrap();

        assert_eq!(ctx.value::<RequestId>(), Some(&RequestId(7)));
        assert!(base.value::<BreakdownState>().is_none());
    }

    #[test]
    fn test_no_logging_request_stores_no_logger() {
        let ctx = startup(None, Some(&Initialization::default())).unwrap();
        let breakdown = breakdown(&ctx);

        assert!(breakdown.log.is_none());
        assert!(breakdown.ctx.is_some());
    }
}
