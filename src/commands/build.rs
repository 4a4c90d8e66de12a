//! Build command - generates the static site incrementally
//!
//! Only posts whose source changed since the last build are re-rendered;
//! index and tag pages are regenerated when the post set or tags change.

use anyhow::Result;
use std::fs;
use std::time::Instant;

use crate::cache::{self, CacheDb, ChangeSet};
use crate::content::{ContentLoader, Post, PostMeta};
use crate::helpers::{html_escape, list_posts, list_tags, url_for};
use crate::Blog;

/// Generate the static site into the public directory
pub fn run(blog: &Blog, force: bool) -> Result<()> {
    let start = Instant::now();
    let loader = ContentLoader::new(blog);

    let metas = loader.load_all_meta()?;

    // Current on-disk state: (slug, content hash)
    let mut current = Vec::with_capacity(metas.len());
    for meta in &metas {
        let path = blog.posts_dir.join(format!("{}.md", meta.slug));
        let hash = cache::hash_file(&path)?;
        current.push((meta.slug.clone(), hash));
    }

    let mut db = CacheDb::load(&blog.base_dir);
    let changes = if force || db.posts.is_empty() {
        ChangeSet::full_rebuild()
    } else {
        cache::detect_changes(&db, &blog.base_dir, &current)?
    };

    if !changes.has_changes() {
        tracing::info!("No changes detected, nothing to build");
        return Ok(());
    }
    tracing::info!("Building: {}", changes.summary());

    fs::create_dir_all(&blog.public_dir)?;

    // Render changed (or, on full rebuild, all) post pages
    let to_render: Vec<&str> = if changes.full_rebuild {
        metas.iter().map(|m| m.slug.as_str()).collect()
    } else {
        changes.changed_posts.iter().map(|s| s.as_str()).collect()
    };

    let mut rendered = 0;
    for slug in &to_render {
        if let Some(post) = loader.load_by_slug(slug)? {
            let out_dir = blog.public_dir.join("posts").join(slug);
            fs::create_dir_all(&out_dir)?;
            fs::write(out_dir.join("index.html"), render_post_page(blog, &post))?;
            rendered += 1;
        }
    }

    // Remove output for posts that no longer exist
    for slug in &changes.deleted_posts {
        let out_dir = blog.public_dir.join("posts").join(slug);
        if out_dir.exists() {
            fs::remove_dir_all(&out_dir)?;
        }
    }

    if changes.rebuild_index {
        fs::write(
            blog.public_dir.join("index.html"),
            render_index_page(blog, &metas),
        )?;
        fs::write(
            blog.public_dir.join("posts.json"),
            serde_json::to_string_pretty(&metas)?,
        )?;
    }

    if changes.rebuild_tags {
        let tags_root = blog.public_dir.join(&blog.config.tag_dir);
        if tags_root.exists() {
            fs::remove_dir_all(&tags_root)?;
        }
        for tag in loader.all_tags()? {
            let tagged = loader.posts_by_tag(&tag)?;
            let out_dir = tags_root.join(slug::slugify(&tag));
            fs::create_dir_all(&out_dir)?;
            fs::write(
                out_dir.join("index.html"),
                render_tag_page(blog, &tag, &tagged),
            )?;
        }
    }

    // Persist the new cache state: (slug, hash, output path)
    let entries: Vec<_> = current
        .into_iter()
        .map(|(slug, hash)| {
            let output = format!("posts/{}/index.html", slug);
            (slug, hash, output)
        })
        .collect();
    cache::update_cache(&mut db, &blog.base_dir, &entries)?;
    db.save(&blog.base_dir)?;

    tracing::info!(
        "Built {} post pages in {:.2}s",
        rendered,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn page(blog: &Blog, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{} | {}</title>
</head>
<body>
{}
</body>
</html>
"#,
        html_escape(title),
        html_escape(&blog.config.title),
        body
    )
}

fn render_post_page(blog: &Blog, post: &Post) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<article class=\"post\">\n<h1>{}</h1>\n<p class=\"post-meta\">{} &middot; {}</p>\n",
        html_escape(&post.meta.title),
        html_escape(&post.meta.date),
        html_escape(&post.meta.reading_time)
    ));
    body.push_str(&post.content_html);
    body.push_str("\n</article>\n");

    if !post.related_posts.is_empty() {
        body.push_str("<aside class=\"related-posts\">\n<h2>Related Posts</h2>\n<ul>\n");
        for related in &post.related_posts {
            let url = url_for(&blog.config, &format!("posts/{}/", related.slug));
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                url,
                html_escape(&related.title)
            ));
        }
        body.push_str("</ul>\n</aside>\n");
    }

    page(blog, &post.meta.title, &body)
}

fn render_index_page(blog: &Blog, posts: &[PostMeta]) -> String {
    let mut body = format!("<h1>{}</h1>\n", html_escape(&blog.config.title));
    body.push_str(&list_posts(&blog.config, posts));
    body.push('\n');
    body.push_str(&list_tags(&blog.config, posts, true));
    page(blog, "Posts", &body)
}

fn render_tag_page(blog: &Blog, tag: &str, posts: &[PostMeta]) -> String {
    let mut body = format!("<h1>Posts tagged &ldquo;{}&rdquo;</h1>\n", html_escape(tag));
    body.push_str(&list_posts(&blog.config, posts));
    page(blog, tag, &body)
}
