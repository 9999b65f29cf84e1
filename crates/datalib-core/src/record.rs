//! Input records: a path plus an opaque payload.

use serde::{Deserialize, Serialize};

/// Anything that can be placed in a path tree.
///
/// Only the path is ever inspected; everything else about the value is
/// carried through to the leaf node untouched.
pub trait PathRecord {
    /// The record's slash-delimited path, if it has one.
    fn path(&self) -> Option<&str>;
}

impl PathRecord for &str {
    fn path(&self) -> Option<&str> {
        Some(self)
    }
}

impl PathRecord for String {
    fn path(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: PathRecord> PathRecord for Option<T> {
    fn path(&self) -> Option<&str> {
        self.as_ref().and_then(PathRecord::path)
    }
}

/// A path record with a typed payload.
///
/// Deserializes from the file listings returned by the imaging API, where
/// the path lives in `fname` and every other field is payload. A plain
/// `path` key is accepted too; when both are present `fname` wins and
/// `path` is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "RawRecord<P>",
    bound(deserialize = "P: Deserialize<'de>")
)]
pub struct Record<P> {
    /// Slash-delimited file path.
    pub path: Option<String>,

    /// Everything else about the file.
    #[serde(flatten)]
    pub payload: P,
}

#[derive(Deserialize)]
struct RawRecord<P> {
    #[serde(default)]
    fname: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(flatten)]
    payload: P,
}

impl<P> From<RawRecord<P>> for Record<P> {
    fn from(raw: RawRecord<P>) -> Self {
        Self {
            path: raw.fname.or(raw.path),
            payload: raw.payload,
        }
    }
}

impl<P> Record<P> {
    /// Create a record for a path.
    pub fn new(path: impl Into<String>, payload: P) -> Self {
        Self {
            path: Some(path.into()),
            payload,
        }
    }

    /// Create a record with no path.
    pub fn pathless(payload: P) -> Self {
        Self {
            path: None,
            payload,
        }
    }
}

impl<P> PathRecord for Record<P> {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
