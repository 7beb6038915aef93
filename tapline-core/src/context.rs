//! Per-invocation shared context.

use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// A per-invocation record shared by context-opted taps and interceptors.
///
/// A fresh `Context` is created for each invocation of a hook whose taps or
/// interceptors opted into context passing, and the same record is handed to
/// every opted-in participant of that invocation. It is never reused across
/// invocations.
///
/// The context option is deprecated; it is kept for compatibility with
/// plugins that coordinate through it.
#[derive(Debug, Default)]
pub struct Context {
    values: Mutex<HashMap<String, Value>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a value, returning the previous value for the key if any.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values().insert(key.into(), value.into())
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values().get(key).cloned()
    }

    /// Remove a value by key.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.values().remove(key)
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values().contains_key(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Check whether the context holds no values.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_round_trip() {
        let context = Context::new();
        assert!(context.is_empty());

        assert_eq!(context.insert("count", 1), None);
        assert_eq!(context.insert("count", 2), Some(Value::from(1)));
        assert_eq!(context.get("count"), Some(Value::from(2)));
        assert!(context.contains("count"));
        assert_eq!(context.len(), 1);

        assert_eq!(context.remove("count"), Some(Value::from(2)));
        assert!(context.is_empty());
    }
}
