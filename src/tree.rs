//! The four public tree operations: `list`, `create`, `remove`, `move_path`.
//!
//! Built entirely on top of [`crate::monitor`] and [`crate::traversal`]; this
//! module owns no synchronization primitive of its own beyond what a `Tree`'s
//! root node already carries.

use crate::error::{TreeError, TreeResult};
use crate::node::{Node, WriteGuard};
use crate::path::{self, is_path_valid_within, make_path_to_lca, make_path_to_parent, relative_to};
use crate::traversal::{reach_node, reach_node_from, Mode};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Configurable limits on path syntax, defaulting to the original
/// implementation's constants ([`path::MAX_NAME`], [`path::MAX_PATH`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    pub max_name_len: usize,
    pub max_path_len: usize,
}

impl Default for TreeLimits {
    fn default() -> Self {
        TreeLimits {
            max_name_len: path::MAX_NAME,
            max_path_len: path::MAX_PATH,
        }
    }
}

/// A concurrent, in-memory hierarchical folder namespace.
///
/// A `Tree` is meant to be shared across threads behind an `Arc<Tree>` (or
/// simply `&Tree`): every public method takes `&self` and all interior
/// synchronization lives in the per-node monitors.
pub struct Tree {
    root: Arc<Node>,
    limits: TreeLimits,
}

impl Tree {
    /// Creates an empty tree with the default [`TreeLimits`].
    pub fn new() -> Self {
        Self::with_limits(TreeLimits::default())
    }

    /// Creates an empty tree with custom path limits.
    pub fn with_limits(limits: TreeLimits) -> Self {
        Tree {
            root: Node::new(),
            limits,
        }
    }

    fn validate(&self, path: &str) -> TreeResult<()> {
        if is_path_valid_within(path, self.limits.max_name_len, self.limits.max_path_len) {
            Ok(())
        } else {
            Err(TreeError::InvalidPath)
        }
    }

    /// Returns the child names of `path`, in ascending lexicographic order,
    /// joined by commas (empty string for a childless folder).
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self, path: &str) -> TreeResult<String> {
        self.validate(path)?;
        let guard = reach_node(&self.root, path, Mode::Read)?;
        let listing = guard.as_read().children().sorted_names().join(",");
        debug!(path, listing = %listing, "listed folder");
        Ok(listing)
    }

    /// Creates an empty folder at `path`. Fails with [`TreeError::Exists`]
    /// if `path` is already bound, or is `/`.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, path: &str) -> TreeResult<()> {
        self.validate(path)?;
        if path == "/" {
            return Err(TreeError::Exists);
        }
        let (parent, leaf) = make_path_to_parent(path).expect("non-root path always has a parent");

        let mut guard = reach_node(&self.root, &parent, Mode::Write)?.into_write();
        if guard.children().contains(&leaf) {
            return Err(TreeError::Exists);
        }
        let child = Node::new();
        guard.children_mut().insert(&leaf, child);
        debug!(path, "created folder");
        Ok(())
    }

    /// Removes the empty folder at `path`. Fails with
    /// [`TreeError::NotEmpty`] if it has children or a pending writer, or
    /// with [`TreeError::Busy`] for `/`.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, path: &str) -> TreeResult<()> {
        self.validate(path)?;
        if path == "/" {
            return Err(TreeError::Busy);
        }
        let (parent, leaf) = make_path_to_parent(path).expect("non-root path always has a parent");

        let mut guard = reach_node(&self.root, &parent, Mode::Write)?.into_write();
        let child = guard.children().get(&leaf).ok_or(TreeError::NotFound)?;

        // Taking the child as a reader exposes a stable snapshot of its
        // child count and pending-writer count: a writer already admitted
        // past us toward a grandchild (a concurrent `create`) is either
        // finished, in which case its effect is visible here, or still
        // counted in `waiting_writers`.
        let read = child.read();
        if read.children().len() + child.waiting_writers() > 0 {
            return Err(TreeError::NotEmpty);
        }

        guard.children_mut().remove(&leaf);
        child.set_to_delete();
        drop(read);
        debug!(path, "removed folder");
        Ok(())
    }

    /// Moves the subtree at `source` so that it is reachable at `target`
    /// instead. `move_path(p, p)` is an accepted no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn move_path(&self, source: &str, target: &str) -> TreeResult<()> {
        self.validate(source)?;
        self.validate(target)?;

        if source == "/" {
            return Err(TreeError::Busy);
        }
        if target == "/" {
            return Err(TreeError::Exists);
        }
        if path::is_strict_descendant(source, target) {
            return Err(TreeError::MoveIntoOwnSubtree);
        }

        let (source_parent, source_leaf) =
            make_path_to_parent(source).expect("non-root path always has a parent");
        let (target_parent, target_leaf) =
            make_path_to_parent(target).expect("non-root path always has a parent");
        let lca_path = make_path_to_lca(&source_parent, &target_parent);

        let lca = reach_node(&self.root, &lca_path, Mode::Write)?.into_write();
        let mut slots = ParentSlots::new(lca, &lca_path, &source_parent, &target_parent)?;

        let src = slots
            .source()
            .children()
            .get(&source_leaf)
            .ok_or(TreeError::NotFound)?;

        if slots.target().children().contains(&target_leaf) {
            return if source == target {
                Ok(())
            } else {
                Err(TreeError::Exists)
            };
        }

        // Quiescence barrier: drain every in-flight operation in `src`'s
        // subtree before the edge switch below could let an observer see it
        // reachable under two names (or none) at once.
        src.drain_subtree();

        slots
            .target_mut()
            .children_mut()
            .insert(&target_leaf, Arc::clone(&src));
        slots.source_mut().children_mut().remove(&source_leaf);

        debug!(source, target, "moved folder");
        Ok(())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the write-locked ancestors a `move_path` call needs: the LCA, the
/// source's parent, and the target's parent. Because `source_parent` and/or
/// `target_parent` may each individually coincide with the LCA (though a
/// node's monitor cannot be locked twice by the same thread), the guard for
/// each distinct node is kept exactly once and shared by reference where two
/// roles land on the same node.
enum ParentSlots {
    /// `source_parent == target_parent == lca_path`.
    Same(WriteGuard),
    /// `source_parent == lca_path`, target descends further.
    SourceAtLca { lca: WriteGuard, tp: WriteGuard },
    /// `target_parent == lca_path`, source descends further.
    TargetAtLca { lca: WriteGuard, sp: WriteGuard },
    /// Both parents are proper descendants of the LCA.
    Distinct {
        lca: WriteGuard,
        sp: WriteGuard,
        tp: WriteGuard,
    },
}

impl ParentSlots {
    fn new(
        lca: WriteGuard,
        lca_path: &str,
        source_parent: &str,
        target_parent: &str,
    ) -> TreeResult<ParentSlots> {
        let source_is_lca = source_parent == lca_path;
        let target_is_lca = target_parent == lca_path;

        match (source_is_lca, target_is_lca) {
            (true, true) => Ok(ParentSlots::Same(lca)),
            (true, false) => {
                let rel = relative_to(lca_path, target_parent);
                let tp = reach_node_from(&lca, rel, Mode::Write)?.into_write();
                Ok(ParentSlots::SourceAtLca { lca, tp })
            }
            (false, true) => {
                let rel = relative_to(lca_path, source_parent);
                let sp = reach_node_from(&lca, rel, Mode::Write)?.into_write();
                Ok(ParentSlots::TargetAtLca { lca, sp })
            }
            (false, false) => {
                let sp_rel = relative_to(lca_path, source_parent);
                let sp = reach_node_from(&lca, sp_rel, Mode::Write)?.into_write();
                let tp_rel = relative_to(lca_path, target_parent);
                let tp = reach_node_from(&lca, tp_rel, Mode::Write)?.into_write();
                Ok(ParentSlots::Distinct { lca, sp, tp })
            }
        }
    }

    fn source(&self) -> &WriteGuard {
        match self {
            ParentSlots::Same(g) => g,
            ParentSlots::SourceAtLca { lca, .. } => lca,
            ParentSlots::TargetAtLca { sp, .. } => sp,
            ParentSlots::Distinct { sp, .. } => sp,
        }
    }

    fn target(&self) -> &WriteGuard {
        match self {
            ParentSlots::Same(g) => g,
            ParentSlots::SourceAtLca { tp, .. } => tp,
            ParentSlots::TargetAtLca { lca, .. } => lca,
            ParentSlots::Distinct { tp, .. } => tp,
        }
    }

    fn source_mut(&mut self) -> &mut WriteGuard {
        match self {
            ParentSlots::Same(g) => g,
            ParentSlots::SourceAtLca { lca, .. } => lca,
            ParentSlots::TargetAtLca { sp, .. } => sp,
            ParentSlots::Distinct { sp, .. } => sp,
        }
    }

    fn target_mut(&mut self) -> &mut WriteGuard {
        match self {
            ParentSlots::Same(g) => g,
            ParentSlots::SourceAtLca { tp, .. } => tp,
            ParentSlots::TargetAtLca { lca, .. } => lca,
            ParentSlots::Distinct { tp, .. } => tp,
        }
    }
}
