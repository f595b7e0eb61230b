//! Canonical schema constants for structured log records
//!
//! These names give emitted records a stable, backend-independent schema.

// Key sentinels accepted by formatter configuration
pub const KEY_SKIP: &str = "-";
pub const KEY_CANONICAL: &str = "~";

// Canonical field keys, selected with `KEY_CANONICAL`
pub const FIELD_TIME: &str = "time";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_FUNCTION: &str = "function";

// Prefix applied to user fields that collide with a reserved key
pub const FIELD_CLASH_PREFIX: &str = "fields.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_distinct() {
        assert_ne!(KEY_SKIP, KEY_CANONICAL);
        assert!(!KEY_SKIP.is_empty());
        assert!(!KEY_CANONICAL.is_empty());
    }

    #[test]
    fn test_canonical_keys_are_distinct() {
        let keys = [FIELD_TIME, FIELD_MESSAGE, FIELD_LEVEL, FIELD_FUNCTION];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
