//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub posts_dir: String,
    pub pages_dir: String,
    pub meta_dir: String,
    pub index_file: String,

    // Index
    pub index_summary_size: usize,

    // Related posts
    pub related_article_list_size: usize,
    pub exclude_current_post: bool,

    // Rendering
    #[serde(default)]
    pub math: MathConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            pages_dir: "static-md".to_string(),
            meta_dir: "meta".to_string(),
            index_file: "index.json".to_string(),

            index_summary_size: 400,

            related_article_list_size: 5,
            exclude_current_post: false,

            math: MathConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// A pair of math delimiters, e.g. `$$` / `$$`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathDelimiter {
    pub open: String,
    pub close: String,
}

impl MathDelimiter {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
        }
    }
}

/// Math protection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub enable: bool,
    /// Tried in order at each position, so longer openers go first
    pub delimiters: Vec<MathDelimiter>,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enable: true,
            delimiters: vec![MathDelimiter::new("$$", "$$"), MathDelimiter::new("$", "$")],
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.related_article_list_size, 5);
        assert_eq!(config.index_summary_size, 400);
        assert!(!config.exclude_current_post);
        assert_eq!(config.math.delimiters.len(), 2);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
posts_dir: articles
related_article_list_size: 3
exclude_current_post: true
math:
  delimiters:
    - open: "\\("
      close: "\\)"
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.posts_dir, "articles");
        assert_eq!(config.meta_dir, "meta");
        assert_eq!(config.related_article_list_size, 3);
        assert!(config.exclude_current_post);
        assert!(config.math.enable);
        assert_eq!(config.math.delimiters, vec![MathDelimiter::new("\\(", "\\)")]);
    }
}
