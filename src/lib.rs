//! guidepost: a markdown blog pipeline and static generator
//!
//! This crate loads markdown posts with YAML front-matter from a posts
//! directory, renders them to styled HTML through a fixed post-processing
//! pipeline, and answers the read-only queries a blog front-end needs:
//! all post metadata, post by slug, posts by tag, and all tags.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::Result;
use std::path::Path;

/// The main Blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Posts source directory
    pub posts_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
        })
    }

    /// Generate the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self, false)
    }

    /// Clean the public directory and the build cache
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post scaffold
    pub fn new_post(&self, title: &str) -> Result<()> {
        commands::new::run(self, title)
    }
}
