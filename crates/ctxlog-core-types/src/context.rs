//! Request-scoped execution context
//!
//! A `Context` is an immutable bag of typed values. Attaching a value never
//! edits the receiver: it returns a new `Context` that shares every other
//! value with its parent. This makes a context safe to hand across threads
//! without locking.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ValueMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Immutable, cheaply clonable execution context
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<ValueMap>,
}

impl Context {
    /// An empty context with no values attached
    pub fn background() -> Self {
        Self::default()
    }

    /// Return a new context carrying `value`, replacing any value of the same type
    pub fn with_value<T>(&self, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        let mut values = ValueMap::clone(&self.values);
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// Get the value of type `T`, if one is attached
    pub fn value<T>(&self) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Number of values attached
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are attached
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether both handles refer to the same context value
    pub fn same(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct RequestTag(&'static str);

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.is_empty());
        assert!(ctx.value::<RequestTag>().is_none());
    }

    #[test]
    fn test_with_value_leaves_parent_untouched() {
        let parent = Context::background();
        let child = parent.with_value(RequestTag("a"));

        assert!(parent.value::<RequestTag>().is_none());
        assert_eq!(child.value::<RequestTag>(), Some(&RequestTag("a")));
    }

    #[test]
    fn test_with_value_replaces_same_type() {
        let ctx = Context::background()
            .with_value(RequestTag("a"))
            .with_value(RequestTag("b"));

        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.value::<RequestTag>(), Some(&RequestTag("b")));
    }

    #[test]
    fn test_values_of_different_types_coexist() {
        let ctx = Context::background()
            .with_value(RequestTag("a"))
            .with_value(42u32);

        assert_eq!(ctx.value::<u32>(), Some(&42));
        assert_eq!(ctx.value::<RequestTag>(), Some(&RequestTag("a")));
    }

    #[test]
    fn test_same_tracks_identity() {
        let ctx = Context::background().with_value(1u8);
        let clone = ctx.clone();
        let rebuilt = ctx.with_value(1u8);

        assert!(ctx.same(&clone));
        assert!(!ctx.same(&rebuilt));
    }

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
