//! Print a rendered post to stdout

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::Blog;

/// Render a single post by slug and print its HTML
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let loader = ContentLoader::new(blog);

    match loader.load_by_slug(slug)? {
        Some(post) => {
            println!("{}", post.content_html);
            Ok(())
        }
        None => anyhow::bail!("post not found: {}", slug),
    }
}
