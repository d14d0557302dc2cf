//! Interface coverage registry
//!
//! Maps each declared interface to whether at least one implementor has been
//! seen. Updates are atomic per key, so visitation threads can register
//! declarations and mark implementations concurrently and in any order.

use dashmap::DashMap;
use std::collections::HashMap;
use std::hash::Hash;

/// Concurrent interface → "implemented" map for one analysis run
///
/// Entries are never removed and a flag never goes from `true` back to
/// `false`, so every operation is idempotent and the final state does not
/// depend on the order of calls.
#[derive(Debug)]
pub struct CoverageRegistry<K: Eq + Hash> {
    flags: DashMap<K, bool>,
}

impl<K: Eq + Hash> CoverageRegistry<K> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            flags: DashMap::new(),
        }
    }

    /// Record a declared interface as not yet implemented
    ///
    /// Returns `true` when the interface was not known before. An interface
    /// that is already present, implemented or not, is left untouched.
    pub fn register_if_absent(&self, interface: K) -> bool {
        let mut inserted = false;
        self.flags.entry(interface).or_insert_with(|| {
            inserted = true;
            false
        });
        inserted
    }

    /// Record that `interface` has at least one implementor
    ///
    /// An interface may be reached through an implementor before its own
    /// declaration is visited, so an absent key is inserted as implemented.
    /// Returns `true` when this call changed the recorded state.
    pub fn mark_implemented(&self, interface: K) -> bool {
        let mut flag = self.flags.entry(interface).or_insert(false);
        let changed = !*flag;
        *flag = true;
        changed
    }

    /// Current flag for `interface`, or `None` if it has not been seen
    pub fn is_implemented(&self, interface: &K) -> Option<bool> {
        self.flags.get(interface).map(|flag| *flag)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of interfaces still without an implementor
    pub fn unimplemented_count(&self) -> usize {
        self.flags.iter().filter(|entry| !*entry.value()).count()
    }

    /// Copy of the current state
    ///
    /// Only meaningful once every producer has finished; the registry itself
    /// does not enforce that ordering.
    pub fn snapshot(&self) -> HashMap<K, bool>
    where
        K: Clone,
    {
        self.flags
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Consume the registry, yielding its final state
    pub fn into_snapshot(self) -> HashMap<K, bool> {
        self.flags.into_iter().collect()
    }
}

impl<K: Eq + Hash> Default for CoverageRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
