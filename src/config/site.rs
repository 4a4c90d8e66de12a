//! Blog configuration (_config.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    pub tag_dir: String,

    // Content pipeline
    /// Tags assumed for a post that specifies none
    pub default_tags: Vec<String>,
    /// Reading speed used for the "N min read" estimate
    pub words_per_minute: usize,
    /// Maximum number of related posts attached to a post
    pub related_limit: usize,
    /// Acronyms auto-linked in rendered HTML; map order is application order,
    /// so longer acronyms must come before their prefixes (AMI/AMS before AMI)
    pub acronym_links: IndexMap<String, String>,

    // Date / Time format
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        let mut acronym_links = IndexMap::new();
        acronym_links.insert("MACTE".to_string(), "https://www.macte.org/".to_string());
        acronym_links.insert(
            "AMI/AMS".to_string(),
            "https://montessori-ami.org/".to_string(),
        );
        acronym_links.insert("AMI".to_string(), "https://montessori-ami.org/".to_string());
        acronym_links.insert("AMS".to_string(), "https://amshq.org/".to_string());

        Self {
            title: "Guidepost".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            posts_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            tag_dir: "tags".to_string(),

            default_tags: vec![
                "Education".to_string(),
                "Montessori".to_string(),
                "School Choice".to_string(),
            ],
            words_per_minute: 200,
            related_limit: 3,
            acronym_links,

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
