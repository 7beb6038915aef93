//! Keyed collections of hooks.

use std::collections::HashMap;
use std::hash::Hash;

/// A lazily-populating keyed collection of hooks.
///
/// Hosts with an open-ended family of extension points (one hook per asset
/// type, per rule name, ...) use a `HookMap` instead of a struct field per
/// hook: [`for_key`](Self::for_key) creates the hook through the stored
/// factory on first access and returns the same hook afterwards.
///
/// ```rust,ignore
/// let mut by_rule: HookMap<String, SyncBailHook<Source, Rewrite>> =
///     HookMap::new(|| SyncBailHook::new(&["source"]));
///
/// by_rule.for_key("imports".to_owned()).tap("resolver", resolve_import);
///
/// if let Some(hook) = by_rule.get("imports") {
///     hook.call(&source)?;
/// }
/// ```
pub struct HookMap<K, H> {
    factory: Box<dyn Fn() -> H + Send + Sync>,
    hooks: HashMap<K, H>,
}

impl<K: Eq + Hash, H> HookMap<K, H> {
    /// Create an empty map with the factory used to build missing hooks.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> H + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            hooks: HashMap::new(),
        }
    }

    /// The hook for `key`, created through the factory on first access.
    pub fn for_key(&mut self, key: K) -> &mut H {
        self.hooks.entry(key).or_insert_with(&self.factory)
    }

    /// The hook for `key`, if one was ever created.
    pub fn get(&self, key: &K) -> Option<&H> {
        self.hooks.get(key)
    }

    /// Mutable access to the hook for `key`, if one was ever created.
    ///
    /// Unlike [`for_key`](Self::for_key) this never creates.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut H> {
        self.hooks.get_mut(key)
    }

    /// Iterate over the created `(key, hook)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &H)> {
        self.hooks.iter()
    }

    /// Number of hooks created so far.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hook was created yet.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavors::SyncHook;

    #[test]
    fn test_for_key_creates_once() {
        let mut map: HookMap<&str, SyncHook<u32>> = HookMap::new(|| SyncHook::new(&["n"]));
        assert!(map.is_empty());
        assert!(map.get(&"emit").is_none());

        map.for_key("emit").tap("count", |_| Ok(None));
        map.for_key("emit").tap("report", |_| Ok(None));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"emit").map(|hook| hook.taps().len()), Some(2));
    }
}
