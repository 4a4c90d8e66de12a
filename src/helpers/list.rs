//! List helpers for generated listing pages

use std::collections::HashMap;

use super::html::html_escape;
use super::url::url_for;
use crate::config::BlogConfig;
use crate::content::PostMeta;

/// Generate a tag list with counts as HTML
pub fn list_tags(config: &BlogConfig, posts: &[PostMeta], show_count: bool) -> String {
    let mut tags: HashMap<String, usize> = HashMap::new();

    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    if tags.is_empty() {
        return String::new();
    }

    let mut html = r#"<ul class="tag-list">"#.to_string();

    let mut sorted: Vec<_> = tags.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    for (name, count) in sorted {
        let slug = slug::slugify(name);
        let url = url_for(config, &format!("{}/{}/", config.tag_dir, slug));

        html.push_str(&format!(
            r#"<li class="tag-list-item"><a class="tag-list-link" href="{}">{}</a>"#,
            url,
            html_escape(name)
        ));

        if show_count {
            html.push_str(&format!(r#"<span class="tag-list-count">{}</span>"#, count));
        }

        html.push_str("</li>");
    }

    html.push_str("</ul>");
    html
}

/// Generate a post listing as HTML
pub fn list_posts(config: &BlogConfig, posts: &[PostMeta]) -> String {
    let mut html = r#"<ul class="post-list">"#.to_string();

    for post in posts {
        let url = url_for(config, &format!("posts/{}/", post.slug));
        html.push_str(&format!(
            r#"<li class="post-list-item"><a class="post-list-link" href="{}">{}</a><span class="post-list-date">{}</span><span class="post-list-reading-time">{}</span><p class="post-list-description">{}</p></li>"#,
            url,
            html_escape(&post.title),
            html_escape(&post.date),
            html_escape(&post.reading_time),
            html_escape(&post.description)
        ));
    }

    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(slug: &str, tags: &[&str]) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            date: "2024-01-01".to_string(),
            description: "A description.".to_string(),
            author: None,
            cover_image: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            reading_time: "1 min read".to_string(),
        }
    }

    #[test]
    fn test_list_tags_counts() {
        let config = BlogConfig::default();
        let posts = vec![meta("a", &["Education"]), meta("b", &["Education", "Play"])];
        let html = list_tags(&config, &posts, true);
        assert!(html.contains(">Education</a>"));
        assert!(html.contains(r#"<span class="tag-list-count">2</span>"#));
        assert!(html.contains("/tags/education/"));
    }

    #[test]
    fn test_list_tags_empty() {
        let config = BlogConfig::default();
        assert_eq!(list_tags(&config, &[], true), "");
    }

    #[test]
    fn test_list_posts_links() {
        let config = BlogConfig::default();
        let posts = vec![meta("my-post", &["A"])];
        let html = list_posts(&config, &posts);
        assert!(html.contains(r#"href="/posts/my-post/""#));
        assert!(html.contains("Title my-post"));
    }
}
