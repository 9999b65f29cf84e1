//! Path tree container and statistics.
//!
//! Nodes live in an insertion-ordered arena keyed by their full path, so
//! every path maps to exactly one node and a [`NodeId`] stays valid for the
//! lifetime of the tree. Trees only ever grow: merging a page of records
//! extends the existing structure and never removes nodes.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TreeConfig;
use crate::error::{BuildWarning, TreeError};
use crate::node::{NodeId, TreeNode};
use crate::record::PathRecord;
use crate::view::{NodeRef, Walk};

/// Summary statistics for a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories (excluding the root).
    pub total_dirs: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file.
    pub fn record_file(&mut self, depth: u32) {
        self.total_files += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// A virtual directory tree materialized from flat path records.
///
/// Deserialized trees are checked for a well-formed arena before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "RawPathTree<R>",
    bound(deserialize = "R: Deserialize<'de>")
)]
pub struct PathTree<R> {
    /// All nodes keyed by full path; the root is at index 0 under "".
    nodes: IndexMap<CompactString, TreeNode<R>>,

    /// Configuration used to split paths.
    config: TreeConfig,

    /// Warnings encountered while ingesting records.
    warnings: Vec<BuildWarning>,
}

/// Serialized form of a [`PathTree`], not yet checked.
#[derive(Deserialize)]
struct RawPathTree<R> {
    nodes: IndexMap<CompactString, TreeNode<R>>,
    #[serde(default)]
    config: TreeConfig,
    #[serde(default)]
    warnings: Vec<BuildWarning>,
}

impl<R> TryFrom<RawPathTree<R>> for PathTree<R> {
    type Error = TreeError;

    /// Accept only arenas that could have been built by [`PathTree::insert`]:
    /// the root first under the empty path, every other node reached from
    /// exactly one earlier parent, and no node that is both file and folder.
    fn try_from(raw: RawPathTree<R>) -> Result<Self, TreeError> {
        let config = TreeConfig::builder()
            .separator(raw.config.separator)
            .alt_separators(raw.config.alt_separators)
            .max_warnings(raw.config.max_warnings)
            .build()?;

        match raw.nodes.get_index(NodeId::ROOT.index()) {
            Some((key, root)) if key.is_empty() && root.payload.is_none() => {}
            _ => return Err(TreeError::invalid_tree("first node must be the root under \"\"")),
        }

        let mut has_parent = vec![false; raw.nodes.len()];
        for (index, (key, node)) in raw.nodes.iter().enumerate() {
            if node.has_children() && node.payload.is_some() {
                return Err(TreeError::invalid_tree(format!("{key:?} is both a file and a directory")));
            }
            for child in &node.children {
                let child = child.index();
                if child <= index || child >= raw.nodes.len() {
                    return Err(TreeError::invalid_tree(format!("{key:?} has out-of-order child {child}")));
                }
                if std::mem::replace(&mut has_parent[child], true) {
                    return Err(TreeError::invalid_tree(format!("node {child} has more than one parent")));
                }
            }
        }
        if let Some(orphan) = has_parent.iter().skip(1).position(|seen| !seen) {
            return Err(TreeError::invalid_tree(format!("node {} has no parent", orphan + 1)));
        }

        Ok(Self {
            nodes: raw.nodes,
            config,
            warnings: raw.warnings,
        })
    }
}

impl<R> Default for PathTree<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PathTree<R> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree with a custom configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(CompactString::default(), TreeNode::root());
        Self {
            nodes,
            config,
            warnings: Vec::new(),
        }
    }

    /// Create an empty tree sharing this tree's configuration.
    pub fn empty_like(&self) -> Self {
        Self::with_config(self.config.clone())
    }

    /// Configuration used to build this tree.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The implicit root node.
    pub fn root(&self) -> &TreeNode<R> {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode<R>> {
        self.nodes.get_index(id.index()).map(|(_, node)| node)
    }

    /// Full path of a node, segments joined by the canonical separator.
    pub fn full_path(&self, id: NodeId) -> Option<&str> {
        self.nodes.get_index(id.index()).map(|(key, _)| key.as_str())
    }

    /// Resolve a path to a node id.
    ///
    /// Leading, trailing and doubled separators are ignored, so `"/a/b/"`
    /// and `"a/b"` name the same node. The empty path names the root.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let key = self.canonical_key(path);
        self.nodes.get_index_of(key.as_str()).map(NodeId::new)
    }

    /// Look up a node by path, failing if it does not exist.
    pub fn find(&self, path: &str) -> Result<&TreeNode<R>, TreeError> {
        self.resolve(path)
            .and_then(|id| self.node(id))
            .ok_or_else(|| TreeError::not_found(path))
    }

    /// Navigate to the node at `path`.
    ///
    /// A missing path yields an empty view rather than an error, so a folder
    /// that does not exist renders as an empty folder.
    pub fn child(&self, path: &str) -> NodeRef<'_, R> {
        NodeRef::new(self, self.resolve(path))
    }

    /// View of the root node.
    pub fn root_ref(&self) -> NodeRef<'_, R> {
        NodeRef::new(self, Some(NodeId::ROOT))
    }

    /// Top-level entries in insertion order.
    pub fn dir(&self) -> impl Iterator<Item = NodeRef<'_, R>> {
        self.root_ref().dir()
    }

    /// Depth-first, pre-order walk over every node except the root.
    pub fn walk(&self) -> Walk<'_, R> {
        Walk::new(self, NodeId::ROOT)
    }

    /// Full paths of every file, in walk order.
    pub fn leaf_paths(&self) -> impl Iterator<Item = &str> {
        self.walk().filter(NodeRef::is_file).filter_map(|node| node.full_path())
    }

    /// Number of nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Check if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        !self.root().has_children()
    }

    /// Compute summary statistics.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::new();
        for (_, node) in self.nodes.iter().skip(1) {
            if node.has_children() {
                stats.record_dir(node.depth);
            } else {
                stats.record_file(node.depth);
            }
        }
        stats
    }

    /// Warnings recorded while ingesting records.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Check if there were any warnings during construction.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn canonical_key(&self, path: &str) -> CompactString {
        let mut key = CompactString::default();
        for segment in self.config.segments(path) {
            if !key.is_empty() {
                key.push(self.config.separator);
            }
            key.push_str(segment);
        }
        key
    }

    fn record_warning(&mut self, warning: BuildWarning) {
        if self.warnings.len() < self.config.max_warnings {
            self.warnings.push(warning);
        }
    }
}

impl<R: PathRecord> PathTree<R> {
    /// Build a tree from a batch of records.
    pub fn build(records: impl IntoIterator<Item = R>) -> Self {
        Self::build_with_config(TreeConfig::default(), records)
    }

    /// Build a tree from a batch of records with a custom configuration.
    pub fn build_with_config(config: TreeConfig, records: impl IntoIterator<Item = R>) -> Self {
        let mut tree = Self::with_config(config);
        tree.extend_records(records);
        tree
    }

    /// Merge another batch of records into this tree.
    ///
    /// Existing nodes keep their position; new entries are appended after
    /// them at each level. Membership does not depend on how records are
    /// split into batches, but child order does.
    pub fn merge(mut self, records: impl IntoIterator<Item = R>) -> Self {
        self.extend_records(records);
        self
    }

    /// Merge a batch in place, returning the number of nodes added.
    pub fn extend_records(&mut self, records: impl IntoIterator<Item = R>) -> usize {
        let before = self.nodes.len();
        let mut ingested = 0usize;
        for record in records {
            self.insert(record);
            ingested += 1;
        }
        let added = self.nodes.len() - before;
        debug!(records = ingested, added, total = self.len(), "merged record batch");
        added
    }

    /// Insert a single record.
    ///
    /// Returns the id of the file node that holds the record's path, or
    /// `None` if the record was skipped or dropped. A duplicate path leaves
    /// the first record in place.
    pub fn insert(&mut self, record: R) -> Option<NodeId> {
        let segments: Vec<CompactString> = match record.path() {
            Some(path) => self.config.segments(path).map(CompactString::from).collect(),
            None => Vec::new(),
        };

        if segments.is_empty() {
            let warning = BuildWarning::malformed(record.path());
            debug!(path = ?record.path(), "skipping record without path segments");
            self.record_warning(warning);
            return None;
        }

        let separator = self.config.separator;
        let last = segments.len() - 1;
        let mut current = NodeId::ROOT;
        let mut key = CompactString::default();

        for (depth, segment) in segments.into_iter().enumerate() {
            let prefix = key.clone();
            if !key.is_empty() {
                key.push(separator);
            }
            key.push_str(&segment);

            let id = match self.nodes.get_index_of(key.as_str()) {
                Some(index) => NodeId::new(index),
                None => {
                    let node = TreeNode::new(segment, prefix, depth as u32 + 1);
                    let (index, _) = self.nodes.insert_full(key.clone(), node);
                    self.nodes[current.index()].children.push(NodeId::new(index));
                    NodeId::new(index)
                }
            };

            if depth < last {
                // A file being extended into a directory loses its record.
                if self.nodes[id.index()].payload.take().is_some() {
                    warn!(path = %key, "file path reused as directory; dropping file record");
                    self.record_warning(BuildWarning::file_became_dir(key.clone()));
                }
            }
            current = id;
        }

        let node = &mut self.nodes[current.index()];
        if node.has_children() {
            warn!(path = %key, "file record names an existing directory; dropping it");
            self.record_warning(BuildWarning::dir_shadows_file(key));
            return None;
        }
        if node.payload.is_none() {
            node.payload = Some(record);
        }
        Some(current)
    }

    /// Records of the files directly below `prefix`.
    ///
    /// Builds a throwaway tree from a prefix-filtered listing and returns
    /// only the immediate files under `prefix`, in first-seen order.
    pub fn file_list(records: impl IntoIterator<Item = R>, prefix: &str) -> Vec<R> {
        let mut tree = Self::build(records);
        let ids: Vec<NodeId> = tree.child(prefix).files().filter_map(|node| node.id()).collect();

        let mut files = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = tree.nodes[id.index()].payload.take() {
                files.push(record);
            }
        }
        files
    }
}

/// Two trees are equal when they hold the same paths, records and child
/// order. Configuration and warnings are not compared.
impl<R: PartialEq> PartialEq for PathTree<R> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.nodes.iter().all(|(key, node)| {
                other.nodes.get(key).is_some_and(|theirs| {
                    node.payload == theirs.payload
                        && node.children.len() == theirs.children.len()
                        && node
                            .children
                            .iter()
                            .zip(&theirs.children)
                            .all(|(a, b)| self.full_path(*a) == other.full_path(*b))
                })
            })
    }
}
