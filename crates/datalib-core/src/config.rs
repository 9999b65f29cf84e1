//! Tree construction configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for building path trees.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TreeConfig {
    /// Canonical path separator.
    #[builder(default = "'/'")]
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Additional characters treated as separators (e.g. `\\`).
    #[builder(default)]
    #[serde(default)]
    pub alt_separators: Vec<char>,

    /// Maximum number of warnings kept on a tree (later ones are only logged).
    #[builder(default = "1000")]
    #[serde(default = "default_max_warnings")]
    pub max_warnings: usize,
}

fn default_separator() -> char {
    '/'
}

fn default_max_warnings() -> usize {
    1000
}

impl TreeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let separator = self.separator.unwrap_or('/');
        if separator.is_whitespace() {
            return Err("Separator cannot be whitespace".to_string());
        }
        if let Some(ref alts) = self.alt_separators {
            if alts.contains(&separator) {
                return Err(format!(
                    "Separator {separator:?} cannot also be an alternate separator"
                ));
            }
            if alts.iter().any(|c| c.is_whitespace()) {
                return Err("Alternate separators cannot be whitespace".to_string());
            }
        }
        Ok(())
    }
}

impl TreeConfig {
    /// Create a new tree config builder.
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::default()
    }

    /// Check whether a character separates path segments.
    pub fn is_separator(&self, c: char) -> bool {
        c == self.separator || self.alt_separators.contains(&c)
    }

    /// Split a path into its meaningful segments.
    ///
    /// Empty segments (leading, trailing or doubled separators) and `.`
    /// segments are dropped.
    pub fn segments<'p>(&self, path: &'p str) -> impl Iterator<Item = &'p str> {
        path.split(|c| self.is_separator(c))
            .filter(|segment| !segment.is_empty() && *segment != ".")
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            separator: '/',
            alt_separators: Vec::new(),
            max_warnings: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = TreeConfig::builder()
            .alt_separators(vec!['\\'])
            .max_warnings(10usize)
            .build()
            .unwrap();

        assert_eq!(config.separator, '/');
        assert_eq!(config.alt_separators, vec!['\\']);
        assert_eq!(config.max_warnings, 10);
    }

    #[test]
    fn test_config_rejects_conflicting_separators() {
        let result = TreeConfig::builder()
            .separator('\\')
            .alt_separators(vec!['\\'])
            .build();
        assert!(result.is_err());

        let result = TreeConfig::builder().separator(' ').build();
        assert!(result.is_err());
    }

    #[test]
    fn test_segments() {
        let config = TreeConfig::default();
        let segments: Vec<_> = config.segments("/a//b/./c.txt/").collect();
        assert_eq!(segments, vec!["a", "b", "c.txt"]);

        assert_eq!(config.segments("").count(), 0);
        assert_eq!(config.segments("///").count(), 0);
    }

    #[test]
    fn test_segments_with_alt_separator() {
        let config = TreeConfig::builder()
            .alt_separators(vec!['\\'])
            .build()
            .unwrap();
        let segments: Vec<_> = config.segments("SERVICES\\PACS/study").collect();
        assert_eq!(segments, vec!["SERVICES", "PACS", "study"]);
    }
}
