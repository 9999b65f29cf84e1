//! Borrowed views for navigating a tree.

use crate::node::{NodeId, TreeNode};
use crate::tree::PathTree;

/// A handle to a node (or to a path that does not exist) within a tree.
///
/// Missing nodes behave as empty folders: they have no name, no payload
/// and no children, and navigating below them stays missing.
#[derive(Debug)]
pub struct NodeRef<'a, R> {
    tree: &'a PathTree<R>,
    id: Option<NodeId>,
}

impl<R> Clone for NodeRef<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for NodeRef<'_, R> {}

impl<'a, R> NodeRef<'a, R> {
    pub(crate) fn new(tree: &'a PathTree<R>, id: Option<NodeId>) -> Self {
        Self { tree, id }
    }

    /// Id of the node, if it exists.
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    /// Check if the path resolved to a node.
    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// The underlying node.
    pub fn node(&self) -> Option<&'a TreeNode<R>> {
        self.id.and_then(|id| self.tree.node(id))
    }

    /// Final path segment.
    pub fn name(&self) -> &'a str {
        self.node().map(|node| node.name.as_str()).unwrap_or_default()
    }

    /// Full path of the parent directory.
    pub fn prefix(&self) -> &'a str {
        self.node().map(|node| node.prefix.as_str()).unwrap_or_default()
    }

    /// Full path of this node.
    pub fn full_path(&self) -> Option<&'a str> {
        self.id.and_then(|id| self.tree.full_path(id))
    }

    /// Check if this node has children.
    pub fn has_children(&self) -> bool {
        self.node().is_some_and(TreeNode::has_children)
    }

    /// Check if this is an existing directory.
    pub fn is_dir(&self) -> bool {
        self.node().is_some_and(TreeNode::is_dir)
    }

    /// Check if this is an existing file.
    pub fn is_file(&self) -> bool {
        self.node().is_some_and(TreeNode::is_file)
    }

    /// The record a file was built from.
    pub fn payload(&self) -> Option<&'a R> {
        self.node().and_then(TreeNode::payload)
    }

    /// Direct children in insertion order.
    pub fn dir(&self) -> impl Iterator<Item = NodeRef<'a, R>> + use<'a, R> {
        let tree = self.tree;
        self.node()
            .map(TreeNode::children)
            .unwrap_or_default()
            .iter()
            .map(move |&id| NodeRef::new(tree, Some(id)))
    }

    /// Child directories, for folder listings.
    pub fn folders(&self) -> impl Iterator<Item = NodeRef<'a, R>> + use<'a, R> {
        self.dir().filter(NodeRef::has_children)
    }

    /// Child files.
    pub fn files(&self) -> impl Iterator<Item = NodeRef<'a, R>> + use<'a, R> {
        self.dir().filter(NodeRef::is_file)
    }

    /// Navigate to a path relative to this node.
    pub fn child(&self, path: &str) -> NodeRef<'a, R> {
        let config = self.tree.config();
        let mut current = self.id;
        for segment in config.segments(path) {
            current = current.and_then(|id| {
                self.tree
                    .node(id)?
                    .children()
                    .iter()
                    .copied()
                    .find(|&child| self.tree.node(child).is_some_and(|n| n.name == segment))
            });
        }
        NodeRef::new(self.tree, current)
    }

    /// Depth-first walk over everything below this node.
    pub fn walk(&self) -> Walk<'a, R> {
        match self.id {
            Some(id) => Walk::new(self.tree, id),
            None => Walk::empty(self.tree),
        }
    }
}

/// Depth-first, pre-order iterator over the descendants of a node.
pub struct Walk<'a, R> {
    tree: &'a PathTree<R>,
    stack: Vec<NodeId>,
}

impl<'a, R> Walk<'a, R> {
    pub(crate) fn new(tree: &'a PathTree<R>, start: NodeId) -> Self {
        let stack = tree
            .node(start)
            .map(|node| node.children().iter().rev().copied().collect())
            .unwrap_or_default();
        Self { tree, stack }
    }

    fn empty(tree: &'a PathTree<R>) -> Self {
        Self {
            tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, R> Iterator for Walk<'a, R> {
    type Item = NodeRef<'a, R>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.node(id) {
            self.stack.extend(node.children().iter().rev().copied());
        }
        Some(NodeRef::new(self.tree, Some(id)))
    }
}
