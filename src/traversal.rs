//! Hand-over-hand path traversal.
//!
//! `reach_node`/`reach_node_from` mirror the original `Tree.c` functions of
//! the same name: descend the tree one segment at a time, holding at most
//! two nodes locked at once (the current node and the next one down), so
//! that a concurrent mutation elsewhere in the tree never has to wait on a
//! traversal that has already moved past it.

use crate::error::{TreeError, TreeResult};
use crate::node::{Node, ReadGuard, WriteGuard};
use crate::path::split_path;
use std::sync::Arc;

/// Whether a traversal should end with its final node read-locked or
/// write-locked.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Read,
    Write,
}

/// The lock held on the node a traversal ended at.
pub(crate) enum NodeGuard {
    Read(ReadGuard),
    Write(WriteGuard),
}

impl NodeGuard {
    fn acquire(node: &Arc<Node>, mode: Mode) -> NodeGuard {
        match mode {
            Mode::Read => NodeGuard::Read(node.read()),
            Mode::Write => NodeGuard::Write(node.write()),
        }
    }

    pub(crate) fn node(&self) -> &Arc<Node> {
        match self {
            NodeGuard::Read(g) => g.node(),
            NodeGuard::Write(g) => g.node(),
        }
    }

    pub(crate) fn as_read(&self) -> &ReadGuard {
        match self {
            NodeGuard::Read(g) => g,
            NodeGuard::Write(_) => unreachable!("traversal requested a write guard as read"),
        }
    }

    pub(crate) fn into_write(self) -> WriteGuard {
        match self {
            NodeGuard::Write(g) => g,
            NodeGuard::Read(_) => unreachable!("traversal requested a read guard as write"),
        }
    }

    fn child(&self, name: &str) -> Option<Arc<Node>> {
        match self {
            NodeGuard::Read(g) => g.children().get(name),
            NodeGuard::Write(g) => g.children().get(name),
        }
    }
}

/// Descends from `start` (already held in some lock mode, not necessarily
/// `mode`) along `rest`, hand-over-hand: each next node is locked in `mode`
/// before the current one is released, except that every *intermediate*
/// node (every node but the last) is always locked in read mode regardless
/// of `mode` — only the final destination needs `mode`'s stronger lock, and
/// locking every intermediate node for write would serialize unrelated
/// traversals through a shared ancestor for no reason.
fn walk(start: NodeGuard, rest: &str, mode: Mode) -> TreeResult<NodeGuard> {
    let mut current = start;
    let mut rest = rest;

    loop {
        let Some((name, tail)) = split_path(rest) else {
            return Ok(current);
        };

        let child = current.child(name).ok_or(TreeError::NotFound)?;

        let next_mode = if split_path(tail).is_none() {
            mode
        } else {
            Mode::Read
        };
        let next = NodeGuard::acquire(&child, next_mode);

        // Drop the parent's guard only after the child is admitted, giving
        // the hand-over-hand overlap that keeps a slow writer elsewhere in
        // the tree from blocking this traversal past the point it needs to.
        drop(current);
        current = next;
        rest = tail;
    }
}

/// Locks the root in `mode` and walks down `path` from there.
pub(crate) fn reach_node(root: &Arc<Node>, path: &str, mode: Mode) -> TreeResult<NodeGuard> {
    let root_mode = if split_path(path).is_none() {
        mode
    } else {
        Mode::Read
    };
    let root_guard = NodeGuard::acquire(root, root_mode);
    walk(root_guard, path, mode)
}

/// Walks down `rest` starting from an already write-locked `start`, without
/// releasing or re-locking `start` itself — only `start`'s borrow is used,
/// to look up its first child; the caller goes on holding `start` for as
/// long as it needs to (the LCA case in `Tree::move_path`, which reaches
/// both a source and a target parent from the same held ancestor).
///
/// `rest` must name at least one segment (i.e. not be `"/"`): a caller
/// whose relative path is already `"/"` already holds its destination in
/// `start` and has no reason to call this function.
pub(crate) fn reach_node_from(start: &WriteGuard, rest: &str, mode: Mode) -> TreeResult<NodeGuard> {
    let (name, tail) = split_path(rest).expect("reach_node_from requires a non-root relative path");

    let child = start.children().get(name).ok_or(TreeError::NotFound)?;
    let next_mode = if split_path(tail).is_none() {
        mode
    } else {
        Mode::Read
    };
    let next = NodeGuard::acquire(&child, next_mode);
    walk(next, tail, mode)
}
