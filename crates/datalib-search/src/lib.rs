//! Search over datalib path trees.
//!
//! A search projects a [`PathTree`] onto the files whose path contains the
//! query, case-insensitively, and rebuilds just enough of the directory
//! structure to keep every match reachable from the root:
//!
//! ```rust
//! use datalib_core::PathTree;
//! use datalib_search::search;
//!
//! let tree = PathTree::build(["a/b/f1.txt", "a/b/f2.txt", "a/c/f3.txt"]);
//! let results = search(&tree, "F1");
//!
//! let leaves: Vec<_> = results.leaf_paths().collect();
//! assert_eq!(leaves, ["a/b/f1.txt"]);
//! ```
//!
//! A blank query yields an empty tree rather than the whole listing.

mod search;

pub use search::{MatchTarget, SearchConfig, SearchConfigBuilder, Searcher, search};

// Re-export core types
pub use datalib_core::{PathRecord, PathTree};
