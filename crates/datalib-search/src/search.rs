//! Case-insensitive substring search projecting a tree into a filtered tree.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use datalib_core::{NodeRef, PathRecord, PathTree};

/// What part of a file a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchTarget {
    /// The file's full path in the tree (default).
    #[default]
    FullPath,
    /// The file name only.
    Name,
}

impl MatchTarget {
    /// Get a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullPath => "path",
            Self::Name => "name",
        }
    }
}

/// Configuration for tree search.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct SearchConfig {
    /// What each file is matched against.
    #[builder(default)]
    #[serde(default)]
    pub target: MatchTarget,

    /// Match case exactly instead of ignoring it.
    #[builder(default = "false")]
    #[serde(default)]
    pub case_sensitive: bool,

    /// Maximum number of matching files (0 = unlimited).
    #[builder(default = "0")]
    #[serde(default)]
    pub max_matches: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: MatchTarget::FullPath,
            case_sensitive: false,
            max_matches: 0,
        }
    }
}

impl SearchConfig {
    /// Create a new config builder.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Substring searcher over path trees.
pub struct Searcher {
    config: SearchConfig,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    /// Create a new searcher with default config.
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Create a new searcher with custom config.
    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Files in `tree` matching `query`, in walk order.
    ///
    /// Directories never match on their own; they are kept only as
    /// ancestors of matching files. A blank query matches nothing; any other
    /// query is matched exactly as given, surrounding spaces included.
    pub fn matches<'a, R: PathRecord>(&self, tree: &'a PathTree<R>, query: &str) -> Vec<NodeRef<'a, R>> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = self.normalize(query);
        let limit = match self.config.max_matches {
            0 => usize::MAX,
            n => n,
        };

        tree.walk()
            .filter(NodeRef::is_file)
            .filter(|node| self.haystack(node).is_some_and(|h| self.normalize(h).contains(&needle)))
            .take(limit)
            .collect()
    }

    /// Project `tree` onto the files matching `query`.
    ///
    /// The result is a new tree containing every matching file plus the
    /// directories needed to reach it from the root. The source tree is
    /// left untouched.
    pub fn search<R: PathRecord + Clone>(&self, tree: &PathTree<R>, query: &str) -> PathTree<R> {
        let matches = self.matches(tree, query);
        let mut result = tree.empty_like();
        result.extend_records(matches.iter().filter_map(|node| node.payload().cloned()));

        debug!(
            query,
            target = self.config.target.label(),
            matches = matches.len(),
            "search complete"
        );
        result
    }

    /// Text a file is matched against.
    ///
    /// Full-path matching uses the node's path in the tree, so records written
    /// with an alternate separator match queries written with the canonical one.
    fn haystack<'a, R: PathRecord>(&self, node: &NodeRef<'a, R>) -> Option<&'a str> {
        match self.config.target {
            MatchTarget::FullPath => node.full_path(),
            MatchTarget::Name => Some(node.name()),
        }
    }

    fn normalize(&self, text: &str) -> String {
        if self.config.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }
}

/// Search `tree` for `query` with the default configuration.
pub fn search<R: PathRecord + Clone>(tree: &PathTree<R>, query: &str) -> PathTree<R> {
    Searcher::new().search(tree, query)
}
