//! Error and warning types for tree construction and lookup.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TreeConfigBuilderError;

/// Errors that can occur while working with a path tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// No node exists at the requested path.
    #[error("Path not found: {path}")]
    NotFound { path: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Serialized tree data that does not describe a well-formed tree.
    #[error("Invalid tree data: {message}")]
    InvalidTree { message: String },
}

impl TreeError {
    /// Create a not-found error for a path.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an invalid-tree error.
    pub fn invalid_tree(message: impl Into<String>) -> Self {
        Self::InvalidTree {
            message: message.into(),
        }
    }
}

impl From<TreeConfigBuilderError> for TreeError {
    fn from(err: TreeConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

/// Kind of build warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Record had a missing or empty path and was skipped.
    MalformedRecord,
    /// Path was seen both as a file and as a directory.
    AmbiguousNode,
}

/// Non-fatal condition encountered while ingesting records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildWarning {
    /// Path the warning refers to (as given, for malformed records).
    pub path: CompactString,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl BuildWarning {
    /// Create a new build warning.
    pub fn new(path: impl Into<CompactString>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a record without a usable path.
    pub fn malformed(path: Option<&str>) -> Self {
        let message = match path {
            Some(p) => format!("Record path has no segments: {p:?}"),
            None => "Record has no path".to_string(),
        };
        Self {
            path: path.unwrap_or_default().into(),
            message,
            kind: WarningKind::MalformedRecord,
        }
    }

    /// Create a warning for a file that was turned into a directory.
    pub fn file_became_dir(path: impl Into<CompactString>) -> Self {
        let path = path.into();
        Self {
            message: format!("File {path} is also a directory prefix; file payload dropped"),
            path,
            kind: WarningKind::AmbiguousNode,
        }
    }

    /// Create a warning for a file record naming an existing directory.
    pub fn dir_shadows_file(path: impl Into<CompactString>) -> Self {
        let path = path.into();
        Self {
            message: format!("File record {path} names an existing directory; record dropped"),
            path,
            kind: WarningKind::AmbiguousNode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = TreeError::not_found("a/b");
        assert!(matches!(err, TreeError::NotFound { .. }));
        assert_eq!(err.to_string(), "Path not found: a/b");
    }

    #[test]
    fn test_invalid_config_from_builder() {
        let err: TreeError = crate::config::TreeConfig::builder()
            .separator(' ')
            .build()
            .unwrap_err()
            .into();
        assert!(matches!(err, TreeError::InvalidConfig { .. }));
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn test_malformed_warning() {
        let warning = BuildWarning::malformed(None);
        assert_eq!(warning.kind, WarningKind::MalformedRecord);
        assert!(warning.path.is_empty());

        let warning = BuildWarning::malformed(Some("//"));
        assert_eq!(warning.path, "//");
        assert!(warning.message.contains("no segments"));
    }

    #[test]
    fn test_ambiguous_warnings() {
        let warning = BuildWarning::file_became_dir("a/b");
        assert_eq!(warning.kind, WarningKind::AmbiguousNode);
        assert!(warning.message.contains("payload dropped"));

        let warning = BuildWarning::dir_shadows_file("a");
        assert_eq!(warning.kind, WarningKind::AmbiguousNode);
        assert!(warning.message.contains("record dropped"));
    }
}
