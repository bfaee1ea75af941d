//! The child-name → child-handle table owned by each [`crate::node::Node`].
//!
//! Kept as a small, separate module in the teacher's style (`nox-recycling-tree`'s
//! `map` module) even though its implementation here is a thin wrapper: the
//! monitor module should not know anything about hashing or string keys.

use crate::node::Node;
use fxhash::FxHashMap;
use std::sync::Arc;

/// The children of a single folder, keyed by name.
///
/// This type carries no synchronization of its own: it lives inside a
/// [`crate::monitor::Monitor`] and is only ever touched while that
/// monitor's mutex is held, as either a reader (read-only access) or a
/// writer (mutating access).
#[derive(Default)]
pub struct ChildTable {
    inner: FxHashMap<Box<str>, Arc<Node>>,
}

impl ChildTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Node>> {
        self.inner.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Inserts `child` under `name`, overwriting any previous entry. Callers
    /// are expected to have already checked [`ChildTable::contains`] where
    /// the protocol requires rejecting an existing name.
    pub fn insert(&mut self, name: &str, child: Arc<Node>) {
        self.inner.insert(name.into(), child);
    }

    /// Removes and returns the child bound to `name`, if any.
    pub fn remove(&mut self, name: &str) -> Option<Arc<Node>> {
        self.inner.remove(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the child names in ascending lexicographic order. The
    /// protocol only requires *some* stable order for `list`'s output;
    /// sorting is a conforming special case and makes CLI/test output
    /// deterministic.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(Box::as_ref).collect();
        names.sort_unstable();
        names
    }

    /// Returns every child handle, in no particular order. Used by
    /// [`crate::node::Node::drain_subtree`] to recurse into the subtree
    /// during a quiescence barrier.
    pub fn all(&self) -> Vec<Arc<Node>> {
        self.inner.values().cloned().collect()
    }
}
