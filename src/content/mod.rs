//! Content module - posts, front-matter, rendering, and queries

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod related;
mod rewrite;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{estimate_reading_time, slug_from_filename, Post, PostMeta};
pub use related::find_related;
pub use rewrite::Rewriter;
