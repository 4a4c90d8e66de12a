//! Build cache for incremental generation
//!
//! Tracks content hashes per slug so `build` only rewrites output for
//! posts whose source actually changed. A config change invalidates
//! everything.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Cache file name
const CACHE_FILE: &str = ".guidepost-cache/db.json";

/// Cached entry for a single post, keyed by slug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content hash of the source file
    pub content_hash: u64,
    /// Output path relative to the public dir
    pub output_path: String,
}

/// Cache database for tracking file changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of the site config (changes trigger full rebuild)
    pub config_hash: u64,
    /// Cached entries, keyed by slug
    pub posts: HashMap<String, CacheEntry>,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding cache");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_dir = base_dir.join(".guidepost-cache");
        fs::create_dir_all(&cache_dir)?;

        let cache_path = base_dir.join(CACHE_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Create a new cache with version set
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            ..Default::default()
        }
    }
}

/// Change detection result
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Slugs that need regeneration
    pub changed_posts: Vec<String>,
    /// Slugs whose output should be removed
    pub deleted_posts: Vec<String>,
    /// Whether the index page and metadata need regeneration
    pub rebuild_index: bool,
    /// Whether tag pages need regeneration
    pub rebuild_tags: bool,
    /// Whether to regenerate everything (config changed or cache empty)
    pub full_rebuild: bool,
}

impl ChangeSet {
    /// Create a changeset indicating full rebuild is needed
    pub fn full_rebuild() -> Self {
        Self {
            changed_posts: Vec::new(),
            deleted_posts: Vec::new(),
            rebuild_index: true,
            rebuild_tags: true,
            full_rebuild: true,
        }
    }

    /// Create an empty changeset (no changes)
    pub fn empty() -> Self {
        Self {
            changed_posts: Vec::new(),
            deleted_posts: Vec::new(),
            rebuild_index: false,
            rebuild_tags: false,
            full_rebuild: false,
        }
    }

    /// Check if any changes were detected
    pub fn has_changes(&self) -> bool {
        self.full_rebuild
            || !self.changed_posts.is_empty()
            || !self.deleted_posts.is_empty()
            || self.rebuild_index
            || self.rebuild_tags
    }

    /// Get summary of changes for logging
    pub fn summary(&self) -> String {
        if self.full_rebuild {
            return "full rebuild required".to_string();
        }

        let mut parts = Vec::new();
        if !self.changed_posts.is_empty() {
            parts.push(format!("{} posts changed", self.changed_posts.len()));
        }
        if !self.deleted_posts.is_empty() {
            parts.push(format!("{} posts deleted", self.deleted_posts.len()));
        }
        if self.rebuild_index {
            parts.push("index pages".to_string());
        }
        if self.rebuild_tags {
            parts.push("tag pages".to_string());
        }

        if parts.is_empty() {
            "no changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Calculate a hash for a file on disk
pub fn hash_file(path: &Path) -> Result<u64> {
    let content = fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Detect changes between current state and cached state.
///
/// `current_posts` is (slug, content hash) for every post on disk.
pub fn detect_changes(
    cache: &CacheDb,
    base_dir: &Path,
    current_posts: &[(String, u64)],
) -> Result<ChangeSet> {
    // Check config changes
    let config_path = base_dir.join("_config.yml");
    let config_hash = if config_path.exists() {
        hash_file(&config_path)?
    } else {
        0
    };

    if config_hash != cache.config_hash && cache.config_hash != 0 {
        tracing::info!("Config changed, full rebuild required");
        return Ok(ChangeSet::full_rebuild());
    }

    let mut changeset = ChangeSet::empty();

    // Changed or new posts. Tag pages embed every post's description and
    // reading time, so any content change invalidates them too.
    for (slug, hash) in current_posts {
        match cache.posts.get(slug) {
            Some(cached) if cached.content_hash == *hash => {}
            Some(_) => {
                tracing::debug!("Post changed: {}", slug);
                changeset.changed_posts.push(slug.clone());
                changeset.rebuild_index = true;
                changeset.rebuild_tags = true;
            }
            None => {
                tracing::debug!("New post: {}", slug);
                changeset.changed_posts.push(slug.clone());
                changeset.rebuild_index = true;
                changeset.rebuild_tags = true;
            }
        }
    }

    // Deleted posts
    let current_slugs: HashSet<&str> = current_posts
        .iter()
        .map(|(slug, _)| slug.as_str())
        .collect();

    for slug in cache.posts.keys() {
        if !current_slugs.contains(slug.as_str()) {
            tracing::debug!("Deleted post: {}", slug);
            changeset.deleted_posts.push(slug.clone());
            changeset.rebuild_index = true;
            changeset.rebuild_tags = true;
        }
    }

    Ok(changeset)
}

/// Update cache with current state.
///
/// `posts` is (slug, content hash, output path) for every post.
pub fn update_cache(
    cache: &mut CacheDb,
    base_dir: &Path,
    posts: &[(String, u64, String)],
) -> Result<()> {
    cache.version = CacheDb::VERSION;

    let config_path = base_dir.join("_config.yml");
    cache.config_hash = if config_path.exists() {
        hash_file(&config_path)?
    } else {
        0
    };

    cache.posts.clear();
    for (slug, hash, output_path) in posts {
        cache.posts.insert(
            slug.clone(),
            CacheEntry {
                content_hash: *hash,
                output_path: output_path.clone(),
            },
        );
    }

    Ok(())
}
