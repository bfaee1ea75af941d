//! A single folder in the tree: a synchronization [`Monitor`] plus the
//! `Arc` handle discipline described in `SPEC_FULL.md` §3/§9.

use crate::children::ChildTable;
use crate::monitor::Monitor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Number of `Node`s currently allocated, process-wide. Bumped in
/// `Node::new`, decremented by `Node`'s `Drop` impl. Exists so tests can
/// assert that a tree's nodes are freed exactly once — the "no leak / no
/// double-free" property of `SPEC_FULL.md` §8 scenario 6 — without an
/// external allocator-checking dependency.
static LIVE_NODES: AtomicUsize = AtomicUsize::new(0);

/// Returns the current value of the process-wide live-node counter.
pub fn live_node_count() -> usize {
    LIVE_NODES.load(Ordering::SeqCst)
}

/// A folder node.
///
/// Nodes are always held behind `Arc<Node>`. The parent's child table
/// contributes one strong reference; every in-flight `read`/`write` call
/// holds its own clone for the call's duration. When `remove` unlinks a
/// node from its parent and marks it `to_delete`, the parent's owning
/// clone is dropped; the node itself is only actually freed once the last
/// remaining clone — held by whichever reader/writer/cleaner call is still
/// in flight — is also dropped. That is the reference-counted realization
/// of "the last reader frees the node" from `SPEC_FULL.md` §9.
pub struct Node {
    monitor: Monitor,
}

impl Node {
    /// Creates a new, empty, unattached node.
    pub(crate) fn new() -> Arc<Node> {
        LIVE_NODES.fetch_add(1, Ordering::SeqCst);
        Arc::new(Node {
            monitor: Monitor::new(),
        })
    }

    /// Acquires this node in read mode, blocking until admitted.
    pub(crate) fn read(self: &Arc<Self>) -> ReadGuard {
        self.monitor.start_reading();
        ReadGuard {
            node: Arc::clone(self),
        }
    }

    /// Acquires this node in write mode, blocking until admitted.
    pub(crate) fn write(self: &Arc<Self>) -> WriteGuard {
        self.monitor.start_writing();
        WriteGuard {
            node: Arc::clone(self),
        }
    }

    pub(crate) fn waiting_writers(&self) -> usize {
        self.monitor.waiting_writers()
    }

    pub(crate) fn set_to_delete(&self) {
        self.monitor.set_to_delete();
    }

    /// Blocks until every active and waiting reader/writer on this node,
    /// and recursively on every descendant, has drained — the "quiescence
    /// barrier" of `SPEC_FULL.md` §4.3 step 6.
    ///
    /// The caller must already hold an ancestor of this node write-locked,
    /// so that no new traversal can reach this subtree while draining is in
    /// progress; see `tree::move_path`.
    pub(crate) fn drain_subtree(self: &Arc<Self>) {
        self.monitor.start_cleaning();
        // SAFETY: `start_cleaning` just established that no reader, writer
        // or other cleaner is active or waiting anywhere on this node, and
        // the caller's held ancestor write-lock prevents any new traversal
        // from reaching it in the meantime, so reading the child table here
        // without going through a guard is sound; nothing else can be
        // concurrently touching it.
        let children = unsafe { self.monitor.children() }.all();
        for child in children {
            child.drain_subtree();
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        LIVE_NODES.fetch_sub(1, Ordering::SeqCst);
    }
}

/// RAII read access to a node: exists only while [`Monitor::start_reading`]
/// has been called and not yet matched by `finish_reading`. Every exit path
/// out of a tree operation — including an early `?` return from deep inside
/// traversal — releases the monitor by simply letting this guard (and any
/// guard for an ancestor still in scope) drop, which is the Rust
/// counterpart to §7's "every operation performs all acquired releases on
/// every exit path".
pub struct ReadGuard {
    node: Arc<Node>,
}

impl ReadGuard {
    pub(crate) fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub(crate) fn children(&self) -> &ChildTable {
        // SAFETY: holding a `ReadGuard` is exactly holding read admission.
        unsafe { self.node.monitor.children() }
    }
}

impl Drop for ReadGuard {
    fn drop(&mut self) {
        self.node.monitor.finish_reading();
    }
}

/// RAII write access to a node; see [`ReadGuard`].
pub struct WriteGuard {
    node: Arc<Node>,
}

impl WriteGuard {
    pub(crate) fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub(crate) fn children(&self) -> &ChildTable {
        // SAFETY: holding a `WriteGuard` is exactly holding write admission.
        unsafe { self.node.monitor.children() }
    }

    pub(crate) fn children_mut(&mut self) -> &mut ChildTable {
        // SAFETY: see `children`.
        unsafe { self.node.monitor.children_mut() }
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        self.node.monitor.finish_writing();
    }
}
