//! Loading record pages saved from the imaging API.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result, bail};
use serde_json::{Map, Value};
use tracing::info;

use datalib_core::{PathTree, Record, TreeConfig};

/// A file record with its API fields kept as raw JSON.
pub type FileRecord = Record<Map<String, Value>>;

/// Parse one page of records.
///
/// Accepts either a bare JSON array of file objects or a paginated
/// response object carrying them under `results`.
pub fn parse_page(text: &str) -> Result<Vec<FileRecord>> {
    let value: Value = serde_json::from_str(text).context("Page is not valid JSON")?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(items)) => items,
            _ => bail!("Expected an array of records or an object with a `results` array"),
        },
        _ => bail!("Expected an array of records or an object with a `results` array"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<FileRecord>(item).with_context(|| format!("Invalid record at index {i}"))
        })
        .collect()
}

/// Read and parse one page file.
pub fn load_page(path: &Path) -> Result<Vec<FileRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_page(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Build a tree by merging pages in the order given.
pub fn load_tree(pages: &[PathBuf], config: TreeConfig) -> Result<PathTree<FileRecord>> {
    let mut tree = PathTree::with_config(config);
    for page in pages {
        let records = load_page(page)?;
        let count = records.len();
        let added = tree.extend_records(records);
        info!(page = %page.display(), records = count, added, "merged page");
    }
    Ok(tree)
}

/// File size reported by the API, if present.
pub fn file_size(record: &FileRecord) -> Option<u64> {
    record.payload.get("fsize").and_then(Value::as_u64)
}
