//! Path-to-tree materialization for datalib.
//!
//! The backend only ever returns flat lists of file paths. This crate turns
//! those lists into a navigable, de-duplicated directory tree:
//!
//! - **Build** a tree from a batch of [`PathRecord`]s
//! - **Merge** further pages into an existing tree without losing structure
//! - **Navigate** by path with [`PathTree::child`] and enumerate folders with
//!   [`NodeRef::dir`]
//!
//! ```rust
//! use datalib_core::PathTree;
//!
//! let tree = PathTree::build(["a/b/f1.txt", "a/b/f2.txt"]);
//! let tree = tree.merge(["a/c/f3.txt"]);
//!
//! let names: Vec<_> = tree.child("a").dir().map(|n| n.name()).collect();
//! assert_eq!(names, ["b", "c"]);
//! ```

mod config;
mod error;
mod node;
mod record;
mod tree;
mod view;

pub use config::{TreeConfig, TreeConfigBuilder};
pub use error::{BuildWarning, TreeError, WarningKind};
pub use node::{NodeId, TreeNode};
pub use record::{PathRecord, Record};
pub use tree::{PathTree, TreeStats};
pub use view::{NodeRef, Walk};
