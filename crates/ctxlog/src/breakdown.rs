//! Cross-cutting state carried by a context.
//!
//! The value stored in a [`Context`] holds only the unbound logger. Reading
//! it back through [`breakdown`] binds that logger to the context it was read
//! from, so attaching fields later produces a context that carries them.

use ctxlog_core_types::Context;
use ctxlog_logging::{ContextWrapper, Logger};
use std::fmt;
use std::sync::Arc;

/// Stored form of a breakdown. Never holds a bound logger.
#[derive(Clone, Default)]
pub(crate) struct BreakdownState {
    log: Option<Arc<dyn Logger>>,
}

impl BreakdownState {
    pub(crate) fn new(log: Option<Arc<dyn Logger>>) -> Self {
        Self { log }
    }
}

/// The cross-cutting state of a context, as seen by callers
#[derive(Clone, Default)]
pub struct Breakdown {
    /// Active logger, bound to `ctx`
    pub log: Option<Arc<dyn Logger>>,
    /// The context this breakdown was read from
    pub ctx: Option<Context>,
}

impl fmt::Debug for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breakdown")
            .field("log", &self.log.is_some())
            .field("ctx", &self.ctx)
            .finish()
    }
}

/// Read the breakdown carried by `ctx`.
///
/// A context that was never started yields an empty breakdown.
pub fn breakdown(ctx: &Context) -> Breakdown {
    let Some(state) = ctx.value::<BreakdownState>() else {
        return Breakdown::default();
    };

    let log = state.log.as_ref().map(|log| {
        let wrapper = Arc::new(BreakdownContextWrapper { ctx: ctx.clone() });
        log.bind_context(wrapper).unwrap_or_else(|| log.clone())
    });

    Breakdown {
        log,
        ctx: Some(ctx.clone()),
    }
}

pub(crate) fn with_state(ctx: &Context, state: BreakdownState) -> Context {
    ctx.with_value(state)
}

/// Lets a bound logger replace itself in the context it came from
#[derive(Clone)]
struct BreakdownContextWrapper {
    ctx: Context,
}

impl fmt::Debug for BreakdownContextWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakdownContextWrapper")
            .field("ctx", &self.ctx)
            .finish()
    }
}

impl ContextWrapper for BreakdownContextWrapper {
    fn context(&self) -> Context {
        self.ctx.clone()
    }

    fn update_logger(&self, logger: Arc<dyn Logger>) -> Option<Arc<dyn ContextWrapper>> {
        let Some(state) = self.ctx.value::<BreakdownState>() else {
            return Some(Arc::new(self.clone()));
        };

        let mut state = state.clone();
        state.log = Some(logger);
        Some(Arc::new(BreakdownContextWrapper {
            ctx: with_state(&self.ctx, state),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxlog_logging::{null_logger, LogLevel, SelfUpdatingLogger};
    use serde_json::json;

    fn started() -> Context {
        let logger: Arc<dyn Logger> = Arc::new(SelfUpdatingLogger::new(null_logger()));
        with_state(&Context::background(), BreakdownState::new(Some(logger)))
    }

    #[test]
    fn test_empty_context_has_empty_breakdown() {
        let breakdown = breakdown(&Context::background());
        assert!(breakdown.log.is_none());
        assert!(breakdown.ctx.is_none());
    }

    #[test]
    fn test_breakdown_binds_logger_to_its_context() {
        let ctx = started();
        let breakdown = breakdown(&ctx);

        assert!(breakdown.ctx.unwrap().same(&ctx));
        let log = breakdown.log.unwrap();
        assert!(log.context().unwrap().same(&ctx));
    }

    #[test]
    fn test_stored_logger_stays_unbound() {
        let ctx = started();
        let scoped = breakdown(&ctx).log.unwrap().with_field("a", json!(1));
        let next = scoped.context().unwrap();

        let stored = next.value::<BreakdownState>().unwrap();
        assert!(stored.log.as_ref().unwrap().context().is_none());
        assert!(!next.same(&ctx));
    }

    #[test]
    fn test_update_without_state_keeps_context() {
        let ctx = Context::background();
        let wrapper = BreakdownContextWrapper { ctx: ctx.clone() };

        let updated = wrapper.update_logger(null_logger()).unwrap();
        assert!(updated.context().same(&ctx));
    }

    #[test]
    fn test_logger_without_binding_is_returned_as_is() {
        let ctx = with_state(
            &Context::background(),
            BreakdownState::new(Some(null_logger())),
        );

        let log = breakdown(&ctx).log.unwrap();
        assert!(log.context().is_none());
        log.log(LogLevel::Info, format_args!("discarded"));
    }
}
