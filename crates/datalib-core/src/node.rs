//! Tree node types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The implicit root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new NodeId from an arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single directory or file in the tree.
///
/// A node with children is a directory. A node without children is a file
/// and holds the record it was built from. The root is the only node that
/// can be an empty directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode<R> {
    /// Final path segment (not full path).
    pub name: CompactString,

    /// Full path of the parent directory; empty for top-level nodes.
    pub prefix: CompactString,

    /// Number of segments in the full path; 0 for the root.
    pub depth: u32,

    /// Children in the order they were first seen.
    pub(crate) children: Vec<NodeId>,

    /// Source record (files only).
    pub(crate) payload: Option<R>,
}

impl<R> TreeNode<R> {
    /// Create the root node.
    pub(crate) fn root() -> Self {
        Self {
            name: CompactString::default(),
            prefix: CompactString::default(),
            depth: 0,
            children: Vec::new(),
            payload: None,
        }
    }

    /// Create an empty node below `prefix`.
    pub(crate) fn new(name: impl Into<CompactString>, prefix: impl Into<CompactString>, depth: u32) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            depth,
            children: Vec::new(),
            payload: None,
        }
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if this node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check if this is the implicit root.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_root() || self.has_children()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        !self.is_dir()
    }

    /// The record this file was built from.
    pub fn payload(&self) -> Option<&R> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::ROOT.index(), 0);
    }

    #[test]
    fn test_root_is_dir() {
        let root: TreeNode<()> = TreeNode::root();
        assert!(root.is_root());
        assert!(root.is_dir());
        assert!(!root.has_children());
    }

    #[test]
    fn test_file_and_directory() {
        let mut dir: TreeNode<&str> = TreeNode::new("b", "a", 2);
        assert!(dir.is_file());

        dir.children.push(NodeId::new(3));
        assert!(dir.is_dir());
        assert!(dir.has_children());
        assert_eq!(dir.child_count(), 1);
        assert!(dir.payload().is_none());
    }
}
