//! Content loader - loads posts from the posts directory
//!
//! Every query re-reads the markdown files on disk; the files themselves
//! are the only source of truth.

use anyhow::Result;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{
    estimate_reading_time, find_related, slug_from_filename, FrontMatter, MarkdownRenderer, Post,
    PostMeta, Rewriter,
};
use crate::Blog;

/// Loads and renders content from the posts directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    rewriter: Rewriter,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self {
            blog,
            renderer: MarkdownRenderer::new(),
            rewriter: Rewriter::new(&blog.config),
        }
    }

    /// Load metadata for all posts, newest first.
    ///
    /// Only top-level `.md` files count as posts, so every listed slug
    /// resolves back to `posts_dir/{slug}.md`. Posts missing a required
    /// front-matter field (title, date, description) are skipped with a
    /// warning.
    pub fn load_all_meta(&self) -> Result<Vec<PostMeta>> {
        if !self.blog.posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.blog.posts_dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_meta(path) {
                    Ok(Some(meta)) => posts.push(meta),
                    Ok(None) => {
                        tracing::warn!(
                            "Skipping {:?}: missing required front-matter fields",
                            path
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort by date string descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a fully rendered post by slug.
    ///
    /// Returns `Ok(None)` when the file does not exist or its front-matter
    /// is missing required fields; callers surface that as "not found".
    pub fn load_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let path = self.blog.posts_dir.join(format!("{}.md", slug));
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let (fm, body) = FrontMatter::parse(&content);
        if !fm.is_complete() {
            return Ok(None);
        }

        let meta = self.build_meta(slug, &fm, body);

        let rendered = self.renderer.render(body)?;
        let content_html = self.rewriter.apply(&rendered);

        let all_posts = self.load_all_meta()?;
        let related_posts = find_related(
            slug,
            &meta.tags,
            &all_posts,
            self.blog.config.related_limit,
        );

        Ok(Some(Post {
            meta,
            content_html,
            related_posts,
        }))
    }

    /// All posts carrying the given tag (case-insensitive match)
    pub fn posts_by_tag(&self, tag: &str) -> Result<Vec<PostMeta>> {
        let needle = tag.to_lowercase();
        let posts = self.load_all_meta()?;
        Ok(posts
            .into_iter()
            .filter(|post| post.tags.iter().any(|t| t.to_lowercase() == needle))
            .collect())
    }

    /// All unique tags across all posts, sorted
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let posts = self.load_all_meta()?;
        let tags: BTreeSet<String> = posts
            .into_iter()
            .flat_map(|post| post.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Load listing metadata for a single file
    fn load_meta(&self, path: &Path) -> Result<Option<PostMeta>> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content);
        if !fm.is_complete() {
            return Ok(None);
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let slug = slug_from_filename(filename);

        Ok(Some(self.build_meta(&slug, &fm, body)))
    }

    fn build_meta(&self, slug: &str, fm: &FrontMatter, body: &str) -> PostMeta {
        let (description, author) = fm.clean_description();

        PostMeta {
            slug: slug.to_string(),
            title: fm.title.clone().unwrap_or_default(),
            date: fm.date.clone().unwrap_or_default(),
            description,
            author,
            cover_image: fm.cover_image.clone(),
            tags: fm.tags_or_default(&self.blog.config.default_tags),
            reading_time: estimate_reading_time(body, self.blog.config.words_per_minute),
        }
    }
}

/// Check if a file is a post source file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
