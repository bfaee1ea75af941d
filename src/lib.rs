//! A concurrent, in-memory hierarchical folder namespace.
//!
//! The tree is purely a naming structure: folders contain named child
//! folders, nothing else. Four operations — [`Tree::list`],
//! [`Tree::create`], [`Tree::remove`], [`Tree::move_path`] — are safe to
//! call from any number of threads at once; every concurrent history is
//! linearizable. See the `monitor` module for the per-node synchronization
//! protocol this rests on.

mod children;
mod error;
mod monitor;
mod node;
mod path;
mod traversal;
mod tree;

pub use crate::error::{TreeError, TreeResult};
pub use crate::node::live_node_count;
pub use crate::path::{MAX_NAME, MAX_PATH};
pub use crate::tree::{Tree, TreeLimits};
