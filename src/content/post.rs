//! Post models

use serde::Serialize;

/// Metadata for a single post, as shown in listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// Filename without extension; uniqueness is enforced by the filesystem
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date, exactly as written in front-matter
    pub date: String,

    /// Cleaned description
    pub description: String,

    /// Post author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Cover image path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    /// Resolved tag list (never empty unless configured so)
    pub tags: Vec<String>,

    /// Estimated reading time, e.g. "4 min read"
    pub reading_time: String,
}

/// A fully rendered post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Rendered HTML content
    pub content_html: String,

    /// Up to `related_limit` posts sharing tags with this one
    pub related_posts: Vec<PostMeta>,
}

/// Estimate reading time from the raw markdown body.
///
/// Words are whitespace-separated; the count is ceil-divided by the reading
/// speed, never below one minute.
pub fn estimate_reading_time(content: &str, words_per_minute: usize) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1)).max(1);
    format!("{} min read", minutes)
}

/// Derive the canonical slug from a markdown filename
pub fn slug_from_filename(filename: &str) -> String {
    filename.trim_end_matches(".md").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_filename() {
        assert_eq!(slug_from_filename("my-post.md"), "my-post");
        assert_eq!(slug_from_filename("another-post.md"), "another-post");
    }

    #[test]
    fn test_reading_time_short_text() {
        assert_eq!(
            estimate_reading_time("This is a five word test.", 200),
            "1 min read"
        );
    }

    #[test]
    fn test_reading_time_long_text() {
        let text = "This is a longer test. ".repeat(250);
        assert_eq!(estimate_reading_time(&text, 200), "7 min read");
    }

    #[test]
    fn test_reading_time_empty_text() {
        assert_eq!(estimate_reading_time("", 200), "1 min read");
    }
}
